use std::{sync::Arc, time::Duration};

use anyhow::Context;
use cinedex::{AppState, config::Config, feed::FeedClient, ingest, store::MovieStore};
use rand::{SeedableRng, rngs::StdRng};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinedex=debug".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = wreq::Client::builder()
        .timeout(Duration::from_secs(config.feed_timeout_secs))
        .build()
        .context("building feed client")?;

    let store = Arc::new(MovieStore::loading());
    let feed = FeedClient::new(http, config.feed_url.clone());

    tokio::spawn({
        let store = store.clone();
        async move {
            ingest::run(&store, &feed, StdRng::from_entropy()).await;
        }
    });

    let state = Arc::new(AppState { config: config.clone(), store });
    let app = cinedex::app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
