use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GENRES: [&str; 15] = [
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Drama",
    "Family",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Sports",
    "Thriller",
    "War",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Bollywood,
    Hollywood,
    DualAudio,
    Telugu,
    Tamil,
    TvShows,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Bollywood,
        Category::Hollywood,
        Category::DualAudio,
        Category::Telugu,
        Category::Tamil,
        Category::TvShows,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Bollywood => "bollywood",
            Category::Hollywood => "hollywood",
            Category::DualAudio => "dual-audio",
            Category::Telugu => "telugu",
            Category::Tamil => "tamil",
            Category::TvShows => "tv-shows",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Bollywood => "Bollywood Movies",
            Category::Hollywood => "Hollywood Movies",
            Category::DualAudio => "Dual Audio",
            Category::Telugu => "Telugu",
            Category::Tamil => "Tamil",
            Category::TvShows => "TV Shows",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Bollywood => "fas fa-star",
            Category::Hollywood => "fas fa-globe",
            Category::DualAudio => "fas fa-language",
            Category::Telugu => "fas fa-video",
            Category::Tamil => "fas fa-play-circle",
            Category::TvShows => "fas fa-tv",
        }
    }

    pub fn info(self) -> CategoryInfo {
        CategoryInfo { id: self.as_str(), name: self.name(), icon: self.icon() }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

/// One entry of `Movie::download_links`, stored as JSON text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub resolution: String,
    pub url: String,
    #[serde(default)]
    pub size: Option<String>,
}

impl DownloadLink {
    pub fn encode(&self) -> String {
        serde_json::json!({
            "resolution": self.resolution,
            "url": self.url,
            "size": self.size,
        })
        .to_string()
    }

    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    pub screenshot_urls: Option<Vec<String>>,
    pub rating: String,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub qualities: Vec<String>,
    pub category: Category,
    pub synopsis: Option<String>,
    pub trailer_url: Option<String>,
    pub download_url: Option<String>,
    pub download_links: Option<Vec<String>>,
    pub featured: bool,
    pub release_date: String,
    pub created_at: Timestamp,
}

impl Movie {
    pub fn from_new(id: Uuid, created_at: Timestamp, new: NewMovie) -> Self {
        Self {
            id,
            title: new.title,
            year: new.year,
            poster_url: new.poster_url,
            screenshot_urls: new.screenshot_urls,
            rating: new.rating,
            genres: new.genres,
            languages: new.languages,
            qualities: new.qualities,
            category: new.category,
            synopsis: new.synopsis,
            trailer_url: new.trailer_url,
            download_url: new.download_url,
            download_links: new.download_links,
            featured: new.featured,
            release_date: new.release_date,
            created_at,
        }
    }

    /// Decoded download links; entries that are not valid records are skipped.
    pub fn download_options(&self) -> Vec<DownloadLink> {
        self.download_links
            .iter()
            .flatten()
            .filter_map(|raw| DownloadLink::decode(raw))
            .collect()
    }

    pub fn language_badge(&self) -> &str {
        let has = |lang: &str| self.languages.iter().any(|l| l == lang);
        if has("Hindi") && has("English") {
            "Dual Audio"
        } else {
            self.languages.first().map(String::as_str).unwrap_or_default()
        }
    }
}

/// A movie that passed validation and is ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    pub screenshot_urls: Option<Vec<String>>,
    pub rating: String,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub qualities: Vec<String>,
    pub category: Category,
    pub synopsis: Option<String>,
    pub trailer_url: Option<String>,
    pub download_url: Option<String>,
    pub download_links: Option<Vec<String>>,
    pub featured: bool,
    pub release_date: String,
}

/// Body of `POST /api/movies`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    #[serde(default)]
    pub screenshot_urls: Option<Vec<String>>,
    pub rating: String,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub qualities: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub download_links: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    pub release_date: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
}

impl MovieInput {
    pub fn validate(self) -> Result<NewMovie, ValidationError> {
        let category = self.category.parse()?;

        Ok(NewMovie {
            title: required("title", self.title)?,
            year: self.year,
            poster_url: required("posterUrl", self.poster_url)?,
            screenshot_urls: self.screenshot_urls,
            rating: required("rating", self.rating)?,
            genres: required_set("genres", self.genres)?,
            languages: required_set("languages", self.languages)?,
            qualities: required_set("qualities", self.qualities)?,
            category,
            synopsis: self.synopsis,
            trailer_url: self.trailer_url,
            download_url: self.download_url,
            download_links: self.download_links,
            featured: self.featured.unwrap_or(false),
            release_date: required("releaseDate", self.release_date)?,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(trimmed.to_string())
}

fn required_set(field: &'static str, values: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let out = dedup(values.into_iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()));
    if out.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(out)
}

/// Removes repeats while keeping first-seen order.
pub fn dedup(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// One page of a filtered listing plus the size of the whole filtered set.
#[derive(Clone, Debug)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub total_movies: usize,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl MovieListResponse {
    pub fn new(page: MoviePage, number: u32, size: u32) -> Self {
        let total = page.total as u64;
        let size = u64::from(size.max(1));
        Self {
            movies: page.movies,
            total_movies: page.total,
            current_page: number,
            total_pages: total.div_ceil(size) as u32,
            has_next_page: u64::from(number) * size < total,
            has_prev_page: number > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MovieInput {
        serde_json::from_value(serde_json::json!({
            "title": "  Dune  ",
            "year": 2021,
            "posterUrl": "https://img/dune.jpg",
            "rating": "8.1",
            "genres": ["Sci-Fi", "Adventure", "Sci-Fi"],
            "languages": ["English"],
            "qualities": ["1080p", " ", "720p"],
            "category": "Hollywood",
            "releaseDate": "Oct 22, 2021"
        }))
        .unwrap()
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("TV-Shows".parse::<Category>().unwrap(), Category::TvShows);
        assert_eq!("dual-audio".parse::<Category>().unwrap(), Category::DualAudio);
        assert!(matches!(
            "anime".parse::<Category>(),
            Err(ValidationError::UnknownCategory(c)) if c == "anime"
        ));
    }

    #[test]
    fn category_serializes_as_kebab_id() {
        assert_eq!(serde_json::to_string(&Category::TvShows).unwrap(), "\"tv-shows\"");
        let info = serde_json::to_value(Category::Tamil.info()).unwrap();
        assert_eq!(info["id"], "tamil");
        assert_eq!(info["icon"], "fas fa-play-circle");
    }

    #[test]
    fn validate_trims_and_dedups() {
        let movie = input().validate().unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.genres, vec!["Sci-Fi", "Adventure"]);
        assert_eq!(movie.qualities, vec!["1080p", "720p"]);
        assert_eq!(movie.category, Category::Hollywood);
        assert!(!movie.featured);
    }

    #[test]
    fn validate_rejects_empty_sets_and_unknown_category() {
        let mut bad = input();
        bad.languages = vec!["  ".into()];
        assert_eq!(bad.validate().unwrap_err(), ValidationError::Empty("languages"));

        let mut bad = input();
        bad.category = "anime".into();
        assert!(matches!(bad.validate(), Err(ValidationError::UnknownCategory(_))));
    }

    #[test]
    fn input_rejects_unknown_fields() {
        let res = serde_json::from_value::<MovieInput>(serde_json::json!({
            "title": "X", "year": 2000, "posterUrl": "p", "rating": "7.0",
            "genres": ["Drama"], "languages": ["Hindi"], "qualities": ["720p"],
            "category": "bollywood", "releaseDate": "Jan 1, 2000", "director": "someone"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn download_options_skip_malformed_entries() {
        let link = DownloadLink {
            resolution: "1080p".into(),
            url: "https://dl/1080".into(),
            size: Some("2.1 GB".into()),
        };
        let new = input().validate().unwrap();
        let mut movie = Movie::from_new(Uuid::new_v4(), Timestamp::now(), new);
        movie.download_links = Some(vec![link.encode(), "{not json".into(), "42".into()]);

        assert_eq!(movie.download_options(), vec![link]);
    }

    #[test]
    fn language_badge_prefers_dual_audio() {
        let new = input().validate().unwrap();
        let mut movie = Movie::from_new(Uuid::new_v4(), Timestamp::now(), new);
        assert_eq!(movie.language_badge(), "English");
        movie.languages = vec!["English".into(), "Hindi".into()];
        assert_eq!(movie.language_badge(), "Dual Audio");
    }

    #[test]
    fn list_response_page_math() {
        let page = MoviePage { movies: vec![], total: 50 };
        let res = MovieListResponse::new(page, 2, 24);
        assert_eq!(res.total_pages, 3);
        assert!(res.has_next_page);
        assert!(res.has_prev_page);

        let res = MovieListResponse::new(MoviePage { movies: vec![], total: 0 }, 1, 24);
        assert_eq!(res.total_pages, 0);
        assert!(!res.has_next_page);
        assert!(!res.has_prev_page);
    }
}
