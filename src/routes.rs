use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Category, CategoryInfo, GENRES, Movie, MovieInput, MovieListResponse},
    store::{MovieFilter, Page},
    templates::{self, BrowseState},
};

#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    search: Option<String>,
    category: Option<String>,
    genre: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

impl MovieQuery {
    /// Only one filter applies: search, then category, then genre.
    pub fn filter(&self) -> MovieFilter {
        if let Some(search) = given(&self.search) {
            MovieFilter::Search(search.to_string())
        } else if let Some(category) = given(&self.category).filter(|c| *c != "all") {
            MovieFilter::Category(category.to_string())
        } else if let Some(genre) = given(&self.genre).filter(|g| *g != "all") {
            MovieFilter::Genre(genre.to_string())
        } else {
            MovieFilter::All
        }
    }

    pub fn page(&self, default_size: u32) -> Page {
        Page::new(positive(&self.page).unwrap_or(1), positive(&self.limit).unwrap_or(default_size))
    }

    fn browse_state(&self) -> BrowseState {
        match self.filter() {
            MovieFilter::Search(search) => BrowseState { search, ..Default::default() },
            MovieFilter::Category(category) => BrowseState { category, ..Default::default() },
            MovieFilter::Genre(genre) => BrowseState { genre, ..Default::default() },
            MovieFilter::All => BrowseState::default(),
        }
    }
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn positive(value: &Option<String>) -> Option<u32> {
    value.as_deref().and_then(|s| s.trim().parse().ok()).filter(|&n: &u32| n > 0)
}

async fn list(state: &AppState, q: &MovieQuery) -> MovieListResponse {
    let filter = q.filter();
    let page = q.page(state.config.page_size);
    debug!(?filter, page = page.number, limit = page.size, "listing movies");

    let result = state.store.query(&filter, page).await;
    MovieListResponse::new(result, page.number, page.size)
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieQuery>,
) -> Json<MovieListResponse> {
    Json(list(&state, &q).await)
}

pub async fn featured_movies(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.store.featured_movies().await)
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .store
        .movie_by_id(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;
    Ok(Json(movie))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(input) = body?;
    let new = input.validate()?;

    let movie = state.store.create_movie(new).await;
    debug!(id = %movie.id, title = %movie.title, "created movie");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn categories() -> Json<Vec<CategoryInfo>> {
    Json(Category::ALL.into_iter().map(Category::info).collect())
}

pub async fn genres() -> Json<Vec<&'static str>> {
    Json(GENRES.to_vec())
}

pub async fn home(State(state): State<Arc<AppState>>, Query(q): Query<MovieQuery>) -> Html<String> {
    let list = list(&state, &q).await;
    let featured = state.store.featured_movies().await;
    Html(templates::home_page(&q.browse_state(), &list, featured.first()))
}

pub async fn movie_page(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.movie_by_id(&id).await {
        Some(movie) => Html(templates::movie_page(&movie)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(templates::not_found_page("Movie not found")))
            .into_response(),
    }
}
