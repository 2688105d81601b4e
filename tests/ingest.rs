use std::{net::SocketAddr, time::Duration};

use axum::{Json, Router, routing::get};
use cinedex::{
    feed::FeedClient,
    ingest,
    models::{Category, DownloadLink},
    store::{MovieStore, Page},
};
use rand::rngs::mock::StepRng;
use serde_json::{Value, json};

async fn serve_feed(body: Value) -> SocketAddr {
    let app = Router::new().route("/feed.json", get(move || async move { Json(body) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client() -> wreq::Client {
    wreq::Client::builder().timeout(Duration::from_secs(5)).build().unwrap()
}

#[tokio::test]
async fn seeds_store_from_feed() {
    let addr = serve_feed(json!([
        {
            "title": "Sacred Games",
            "type": "Web Series",
            "language": "Hindi",
            "release date": "2018-07-06",
            "plot": "A police officer hunts a crime lord."
        },
        null,
        {
            "title": "Edge of Night",
            "country": "USA",
            "language": "English",
            "created_at": "2023-01-05T10:30:00Z",
            "images": [{"type": "Poster", "url": "X"}],
            "links": [{"resolution": "1080p", "link_type": "Download", "url": "Y", "size": "2 GB"}],
            "plot": "an action thriller"
        }
    ]))
    .await;

    let store = MovieStore::loading();
    let feed = FeedClient::new(client(), format!("http://{addr}/feed.json"));

    let inserted = ingest::run(&store, &feed, StepRng::new(0, 0)).await;
    assert_eq!(inserted, 2);
    assert!(store.is_ready());

    let all = store.all_movies(Page::new(1, 24)).await;
    assert_eq!(all.total, 2);
    assert_eq!(all.movies[0].title, "Edge of Night");

    let edge = &all.movies[0];
    assert_eq!(edge.category, Category::Hollywood);
    assert_eq!(edge.poster_url, "X");
    assert_eq!(edge.release_date, "Jan 5, 2023");
    assert_eq!(edge.rating, "6.0");
    assert!(edge.featured);
    assert_eq!(
        edge.download_options(),
        vec![DownloadLink { resolution: "1080p".into(), url: "Y".into(), size: Some("2 GB".into()) }]
    );

    let shows = store.movies_by_category("tv-shows", Page::new(1, 24)).await;
    assert_eq!(shows.movies[0].title, "Sacred Games");
    assert_eq!(shows.movies[0].year, 2018);
    assert!(shows.movies[0].genres.contains(&"Crime".to_string()));
}

#[tokio::test]
async fn failed_fetch_leaves_empty_ready_store() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let store = MovieStore::loading();
    let feed = FeedClient::new(client(), format!("http://{addr}/feed.json"));

    let inserted = ingest::run(&store, &feed, StepRng::new(0, 0)).await;
    assert_eq!(inserted, 0);
    assert!(store.is_ready());

    let all = store.all_movies(Page::new(1, 24)).await;
    assert_eq!(all.total, 0);
    assert!(store.featured_movies().await.is_empty());
}

#[tokio::test]
async fn keyed_export_is_accepted() {
    let addr = serve_feed(json!({
        "-a": {"title": "Dangal", "country": "India"},
        "-b": {"title": "Inception", "country": "USA"}
    }))
    .await;

    let store = MovieStore::loading();
    let feed = FeedClient::new(client(), format!("http://{addr}/feed.json"));
    ingest::run(&store, &feed, StepRng::new(0, 0)).await;

    let bollywood = store.movies_by_category("bollywood", Page::new(1, 24)).await;
    assert_eq!(bollywood.total, 1);
    assert_eq!(bollywood.movies[0].title, "Dangal");
}
