pub mod config;
pub mod error;
pub mod feed;
pub mod ingest;
pub mod models;
pub mod routes;
pub mod store;
pub mod templates;
pub mod transform;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<MovieStore>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/movie/{id}", get(routes::movie_page))
        .route("/api/movies", get(routes::list_movies).post(routes::create_movie))
        // Registered ahead of `{id}`; the literal segment always wins.
        .route("/api/movies/featured", get(routes::featured_movies))
        .route("/api/movies/{id}", get(routes::get_movie))
        .route("/api/categories", get(routes::categories))
        .route("/api/genres", get(routes::genres))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
