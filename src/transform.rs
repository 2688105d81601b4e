use jiff::{Timestamp, civil, tz::TimeZone};
use rand::Rng;

use crate::{
    feed::{RawLink, RawRecord},
    models::{Category, DownloadLink, NewMovie, dedup},
};

pub const FALLBACK_YEAR: i32 = 2019;
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/400x600/333/fff?text=No+Image";
pub const DEFAULT_QUALITY: &str = "720p";
pub const DEFAULT_LANGUAGE: &str = "Hindi";

const TEXT_DATE_FORMATS: [&str; 6] =
    ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y", "%Y/%m/%d", "%m/%d/%Y"];

const GENRE_KEYWORDS: [(&[&str], &str); 7] = [
    (&["action", "fight", "battle"], "Action"),
    (&["love", "romance"], "Romance"),
    (&["comedy", "funny"], "Comedy"),
    (&["thriller", "suspense"], "Thriller"),
    (&["crime", "police"], "Crime"),
    (&["horror", "scary"], "Horror"),
    (&["adventure"], "Adventure"),
];

pub fn transform_all<R: Rng>(records: &[RawRecord], rng: &mut R) -> Vec<NewMovie> {
    records.iter().map(|record| transform(record, rng)).collect()
}

/// Maps one upstream record onto the catalog shape. Rating and the featured
/// flag are drawn from `rng`; everything else is derived from the record.
pub fn transform<R: Rng>(record: &RawRecord, rng: &mut R) -> NewMovie {
    let date = non_empty(&record.release_date)
        .or_else(|| non_empty(&record.created_at))
        .and_then(parse_date);

    let poster_url = record
        .images
        .iter()
        .find(|img| img.kind.as_deref() == Some("Poster"))
        .and_then(|img| non_empty(&img.url))
        .unwrap_or(PLACEHOLDER_POSTER)
        .to_string();

    let screenshots: Vec<String> = record
        .images
        .iter()
        .filter(|img| img.kind.as_deref() == Some("Screenshot"))
        .filter_map(|img| img.url.clone())
        .collect();

    let mut qualities =
        dedup(record.links.iter().filter_map(|l| non_empty(&l.resolution)).map(String::from));
    if qualities.is_empty() {
        qualities.push(DEFAULT_QUALITY.to_string());
    }

    let download_links: Vec<String> = record
        .links
        .iter()
        .filter(|l| is_download(l))
        .filter_map(|l| {
            let url = non_empty(&l.url)?;
            let link = DownloadLink {
                resolution: non_empty(&l.resolution).unwrap_or("Unknown").to_string(),
                url: url.to_string(),
                size: non_empty(&l.size).map(String::from),
            };
            Some(link.encode())
        })
        .collect();

    let download_url =
        record.links.iter().find(|l| is_download(l)).and_then(|l| non_empty(&l.url));

    NewMovie {
        title: non_empty(&record.title).unwrap_or("Unknown Title").to_string(),
        year: date.map(|d| i32::from(d.year())).unwrap_or(FALLBACK_YEAR),
        poster_url,
        screenshot_urls: (!screenshots.is_empty()).then_some(screenshots),
        rating: format!("{:.1}", rng.gen_range(6.0..9.0_f64)),
        genres: infer_genres(record.plot.as_deref().unwrap_or_default()),
        languages: vec![non_empty(&record.language).unwrap_or(DEFAULT_LANGUAGE).to_string()],
        qualities,
        category: infer_category(record),
        synopsis: Some(non_empty(&record.plot).unwrap_or("No synopsis available.").to_string()),
        trailer_url: None,
        download_url: download_url.map(String::from),
        download_links: Some(download_links),
        featured: rng.gen_bool(0.3),
        release_date: date.map(display_date).unwrap_or_else(|| "Unknown".to_string()),
    }
}

/// Series first, then Indian origin; dual-audio, telugu and tamil are never inferred.
pub fn infer_category(record: &RawRecord) -> Category {
    let is_series =
        record.kind.as_deref().is_some_and(|k| k.to_lowercase().contains("series"));
    if is_series {
        Category::TvShows
    } else if record.language.as_deref() == Some("Hindi")
        || record.country.as_deref() == Some("India")
    {
        Category::Bollywood
    } else {
        Category::Hollywood
    }
}

pub fn infer_genres(plot: &str) -> Vec<String> {
    let plot = plot.to_lowercase();
    let matched = GENRE_KEYWORDS
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| plot.contains(*k)))
        .map(|(_, genre)| *genre);

    dedup(std::iter::once("Drama").chain(matched).map(String::from))
}

pub fn parse_date(raw: &str) -> Option<civil::Date> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts.to_zoned(TimeZone::UTC).date());
    }
    if let Ok(dt) = raw.parse::<civil::DateTime>() {
        return Some(dt.date());
    }
    if let Ok(date) = raw.parse::<civil::Date>() {
        return Some(date);
    }
    TEXT_DATE_FORMATS.iter().find_map(|fmt| civil::Date::strptime(fmt, raw).ok())
}

/// `Jan 5, 2023`
pub fn display_date(date: civil::Date) -> String {
    date.strftime("%b %-d, %Y").to_string()
}

fn is_download(link: &RawLink) -> bool {
    link.link_type.as_deref() == Some("Download")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
