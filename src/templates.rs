use maud::{DOCTYPE, Markup, html};

use crate::models::{Category, GENRES, Movie, MovieListResponse};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Filters currently applied on the browse page, echoed into links.
#[derive(Clone, Debug, Default)]
pub struct BrowseState {
    pub search: String,
    pub category: String,
    pub genre: String,
}

impl BrowseState {
    fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.category.is_empty() || !self.genre.is_empty()
    }

    fn href(&self, page: u32) -> String {
        let mut params = Vec::new();
        if !self.search.is_empty() {
            params.push(format!("search={}", urlencoding::encode(&self.search)));
        }
        if !self.category.is_empty() {
            params.push(format!("category={}", urlencoding::encode(&self.category)));
        }
        if !self.genre.is_empty() {
            params.push(format!("genre={}", urlencoding::encode(&self.genre)));
        }
        params.push(format!("page={page}"));
        format!("/?{}", params.join("&"))
    }
}

pub fn home_page(state: &BrowseState, list: &MovieListResponse, featured: Option<&Movie>) -> String {
    page(
        "Movies",
        html! {
            (header(&state.search))
            div class="container mx-auto px-6 py-8 flex gap-8" {
                (sidebar(state))
                main class="flex-1" {
                    @if let Some(movie) = featured.filter(|_| !state.is_filtered() && list.current_page == 1) {
                        (featured_hero(movie))
                    }

                    p class="mb-6 text-sm text-gray-400" {
                        (list.total_movies) " movies available • Page " (list.current_page)
                        " of " (list.total_pages.max(1))
                    }

                    @if list.movies.is_empty() {
                        div class="rounded-xl bg-gray-800 p-8 text-center" {
                            p class="text-gray-400" { "No movies found." }
                        }
                    } @else {
                        div class="grid grid-cols-2 gap-6 md:grid-cols-4 xl:grid-cols-6" {
                            @for movie in &list.movies {
                                (movie_card(movie))
                            }
                        }
                    }

                    (pagination(state, list))
                }
            }
        },
    )
}

pub fn movie_page(movie: &Movie) -> String {
    let downloads = movie.download_options();

    page(
        &movie.title,
        html! {
            (header(""))
            div class="container mx-auto px-6 py-8" {
                a class="mb-6 inline-block text-gray-300 hover:text-blue-400" href="/" { "← Back to Movies" }

                div class="grid grid-cols-1 gap-8 lg:grid-cols-3" {
                    div class="overflow-hidden rounded-xl border border-gray-800" {
                        img class="h-auto w-full object-cover" src=(movie.poster_url) alt={ (movie.title) " poster" };
                    }

                    div class="lg:col-span-2" {
                        h1 class="mb-2 text-3xl font-bold text-white" { (movie.title) }
                        div class="flex flex-wrap gap-4 text-sm text-gray-400" {
                            span { (movie.year) }
                            span { "★ " (movie.rating) }
                            span { (movie.languages.join(", ")) }
                            span { (movie.release_date) }
                        }

                        div class="my-6 flex flex-wrap gap-2" {
                            @for quality in &movie.qualities {
                                span class="rounded bg-blue-500/20 px-2 py-1 text-xs text-blue-300" { (quality) }
                            }
                            @for genre in &movie.genres {
                                span class="rounded border border-gray-600 px-2 py-1 text-xs" { (genre) }
                            }
                        }

                        @if let Some(url) = &movie.trailer_url {
                            a class="mb-6 inline-block rounded bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700"
                                href=(url) target="_blank" rel="noopener noreferrer" { "▶ Watch Trailer" }
                        }

                        @if let Some(synopsis) = &movie.synopsis {
                            h2 class="mb-2 text-xl font-semibold text-white" { "Synopsis" }
                            p class="mb-6 text-gray-300" { (synopsis) }
                        }

                        @if let Some(shots) = &movie.screenshot_urls {
                            h2 class="mb-2 text-xl font-semibold text-white" { "Screenshots" }
                            div class="mb-6 grid grid-cols-2 gap-3" {
                                @for shot in shots {
                                    img class="rounded-lg" src=(shot) alt="screenshot";
                                }
                            }
                        }

                        @if !downloads.is_empty() {
                            h2 class="mb-2 text-xl font-semibold text-white" { "Download Links" }
                            div class="grid grid-cols-1 gap-3 sm:grid-cols-2 lg:grid-cols-3" {
                                @for link in &downloads {
                                    a class="flex flex-col items-center gap-1 rounded border border-orange-500 p-4 text-orange-400 hover:bg-orange-500 hover:text-white"
                                        href=(link.url) target="_blank" rel="noopener noreferrer" {
                                        span class="font-semibold" { "⬇ " (link.resolution) }
                                        @if let Some(size) = &link.size {
                                            span class="text-xs opacity-75" { (size) }
                                        }
                                    }
                                }
                            }
                        } @else if let Some(url) = &movie.download_url {
                            a class="inline-block rounded border border-orange-500 px-4 py-2 text-orange-400"
                                href=(url) target="_blank" rel="noopener noreferrer" { "Download" }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page(message: &str) -> String {
    page(
        "Not found",
        html! {
            (header(""))
            div class="container mx-auto px-6 py-16 text-center" {
                h1 class="mb-4 text-2xl font-bold text-white" { (message) }
                a class="inline-block rounded bg-blue-600 px-4 py-2 text-white hover:bg-blue-700" href="/" { "Back to Movies" }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · cinedex" }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-950 text-gray-200" { (body) }
        }
    }
    .into_string()
}

fn header(search: &str) -> Markup {
    html! {
        header class="border-b border-gray-800 bg-gray-900" {
            div class="container mx-auto flex items-center justify-between gap-6 px-6 py-4" {
                a class="text-2xl font-bold text-blue-400" href="/" { "cinedex" }
                form class="flex-1 max-w-xl" method="get" action="/" {
                    input class="w-full rounded border border-gray-700 bg-gray-800 px-3 py-2"
                        type="search" name="search" value=(search) placeholder="Search movies, TV shows...";
                }
            }
        }
    }
}

fn sidebar(state: &BrowseState) -> Markup {
    html! {
        aside class="hidden w-56 shrink-0 lg:block" {
            h3 class="mb-3 font-semibold text-white" { "Categories" }
            ul class="mb-8 space-y-1" {
                li { (filter_link("All", "/", state.category.is_empty())) }
                @for category in Category::ALL {
                    li {
                        (filter_link(
                            category.name(),
                            &format!("/?category={}", category.as_str()),
                            state.category.eq_ignore_ascii_case(category.as_str()),
                        ))
                    }
                }
            }

            h3 class="mb-3 font-semibold text-white" { "Genres" }
            ul class="space-y-1" {
                li { (filter_link("All", "/", state.genre.is_empty())) }
                @for genre in GENRES {
                    li {
                        (filter_link(
                            genre,
                            &format!("/?genre={}", urlencoding::encode(genre)),
                            state.genre.eq_ignore_ascii_case(genre),
                        ))
                    }
                }
            }
        }
    }
}

fn filter_link(label: &str, href: &str, active: bool) -> Markup {
    let class = if active { "text-blue-400 font-semibold" } else { "text-gray-400 hover:text-white" };
    html! { a class=(class) href=(href) { (label) } }
}

fn featured_hero(movie: &Movie) -> Markup {
    html! {
        section class="mb-10 flex items-center gap-8 rounded-2xl bg-gray-900 p-8" {
            div class="flex-1" {
                p class="mb-2 text-sm uppercase tracking-wide text-orange-400" { "Featured" }
                h2 class="mb-4 text-3xl font-bold text-white" { (movie.title) }
                p class="mb-4 text-gray-400" {
                    "Watch the latest Bollywood, Hollywood, and regional movies in HD quality."
                }
                a class="inline-block rounded bg-blue-600 px-4 py-2 text-white hover:bg-blue-700"
                    href=(format!("/movie/{}", movie.id)) { "View details" }
            }
            img class="hidden h-64 rounded-xl md:block" src=(movie.poster_url) alt={ (movie.title) " poster" };
        }
    }
}

fn movie_card(movie: &Movie) -> Markup {
    html! {
        a class="group block" href=(format!("/movie/{}", movie.id)) {
            div class="relative overflow-hidden rounded-xl border border-gray-800 group-hover:border-blue-500/50" {
                img class="h-72 w-full object-cover" src=(movie.poster_url) alt={ (movie.title) " poster" };
                @if let Some(quality) = movie.qualities.first() {
                    span class="absolute left-2 top-2 rounded bg-blue-600/90 px-2 py-1 text-xs font-semibold text-white" { (quality) }
                }
                span class="absolute right-2 top-2 rounded bg-orange-500/90 px-2 py-1 text-xs font-semibold text-white" {
                    (movie.language_badge())
                }
            }
            div class="p-3" {
                h3 class="mb-1 font-semibold text-white group-hover:text-blue-400" { (movie.title) }
                p class="mb-1 text-sm text-gray-500" { (movie.year) }
                div class="flex items-center justify-between text-xs text-gray-400" {
                    span { (movie.genres.iter().take(2).cloned().collect::<Vec<_>>().join(", ")) }
                    span { "★ " (movie.rating) }
                }
            }
        }
    }
}

fn pagination(state: &BrowseState, list: &MovieListResponse) -> Markup {
    html! {
        @if list.total_pages > 1 {
            nav class="mt-12 flex items-center justify-center gap-2" {
                @if list.has_prev_page {
                    a class="rounded px-3 py-2 hover:bg-gray-800" href=(state.href(list.current_page - 1)) { "‹ Prev" }
                }
                @for slot in page_window(list.current_page, list.total_pages) {
                    @match slot {
                        Some(n) if n == list.current_page => {
                            span class="rounded bg-blue-600 px-3 py-2 font-bold text-white" { (n) }
                        }
                        Some(n) => {
                            a class="rounded px-3 py-2 hover:bg-gray-800" href=(state.href(n)) { (n) }
                        }
                        None => {
                            span class="px-2 text-gray-500" { "…" }
                        }
                    }
                }
                @if list.has_next_page {
                    a class="rounded px-3 py-2 hover:bg-gray-800" href=(state.href(list.current_page + 1)) { "Next ›" }
                }
            }
        }
    }
}

/// Page numbers to show: the first and last page plus two on either side of
/// `current`. `None` marks a gap.
pub fn page_window(current: u32, total: u32) -> Vec<Option<u32>> {
    const DELTA: i64 = 2;
    let (current, total) = (i64::from(current), i64::from(total));

    let mut out = vec![Some(1)];
    if current - DELTA > 2 {
        out.push(None);
    }
    let start = (current - DELTA).max(2);
    let end = (current + DELTA).min(total - 1);
    out.extend((start..=end).map(|n| Some(n as u32)));
    if current + DELTA < total - 1 {
        out.push(None);
        out.push(Some(total as u32));
    } else if total > 1 {
        out.push(Some(total as u32));
    }
    out
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;
    use crate::models::{DownloadLink, MoviePage};

    fn sample() -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: "Dangal".into(),
            year: 2016,
            poster_url: "https://img/dangal.jpg".into(),
            screenshot_urls: None,
            rating: "8.4".into(),
            genres: vec!["Drama".into(), "Sports".into()],
            languages: vec!["Hindi".into(), "English".into()],
            qualities: vec!["1080p".into()],
            category: Category::Bollywood,
            synopsis: Some("A wrestler trains his daughters.".into()),
            trailer_url: None,
            download_url: Some("https://dl/legacy".into()),
            download_links: None,
            featured: true,
            release_date: "Dec 23, 2016".into(),
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn window_edges() {
        assert_eq!(page_window(1, 1), vec![Some(1)]);
        assert_eq!(page_window(1, 3), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(page_window(1, 10), vec![Some(1), Some(2), Some(3), None, Some(10)]);
        assert_eq!(
            page_window(6, 10),
            vec![Some(1), None, Some(4), Some(5), Some(6), Some(7), Some(8), None, Some(10)]
        );
        assert_eq!(page_window(10, 10), vec![Some(1), None, Some(8), Some(9), Some(10)]);
    }

    #[test]
    fn detail_page_skips_malformed_links() {
        let mut movie = sample();
        let good = DownloadLink {
            resolution: "720p".into(),
            url: "https://dl/720".into(),
            size: Some("1.1 GB".into()),
        };
        movie.download_links = Some(vec!["{broken".into(), good.encode()]);

        let html = movie_page(&movie);
        assert!(html.contains("https://dl/720"));
        assert!(html.contains("1.1 GB"));
        assert!(!html.contains("https://dl/legacy"));
    }

    #[test]
    fn detail_page_falls_back_to_legacy_link() {
        let html = movie_page(&sample());
        assert!(html.contains("https://dl/legacy"));
    }

    #[test]
    fn detail_page_links_trailer() {
        let mut movie = sample();
        movie.trailer_url = Some("https://yt/x".into());

        let html = movie_page(&movie);
        assert!(html.contains("Watch Trailer"));
        assert!(html.contains(r#"href="https://yt/x""#));
    }

    #[test]
    fn detail_page_without_trailer() {
        let html = movie_page(&sample());
        assert!(!html.contains("Watch Trailer"));
    }

    #[test]
    fn home_page_lists_cards_and_escapes_search() {
        let movie = sample();
        let list = MovieListResponse::new(
            MoviePage { movies: vec![movie.clone()], total: 30 },
            1,
            24,
        );
        let state = BrowseState { search: "<dan>".into(), ..Default::default() };

        let html = home_page(&state, &list, Some(&movie));
        assert!(html.contains(&format!("/movie/{}", movie.id)));
        assert!(html.contains("Dual Audio"));
        assert!(html.contains("&lt;dan&gt;"));
        assert!(html.contains("search=%3Cdan%3E&amp;page=2"));
        // Hero only shows on the unfiltered listing.
        assert!(!html.contains("View details"));
    }
}
