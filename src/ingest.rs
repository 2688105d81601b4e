use rand::Rng;
use tracing::{debug, info, warn};

use crate::{feed::FeedClient, store::MovieStore, transform};

/// Seeds the store from the feed once. A failed fetch leaves the store empty;
/// either way the store is marked ready so waiting readers proceed.
pub async fn run<R: Rng>(store: &MovieStore, feed: &FeedClient, mut rng: R) -> usize {
    info!("loading catalog from feed");

    let records = match feed.fetch().await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "failed to fetch feed, starting with an empty catalog");
            Vec::new()
        },
    };

    debug!(records = records.len(), "fetched feed records");

    let movies = transform::transform_all(&records, &mut rng);
    let inserted = store.insert_many(movies).await;
    store.mark_ready();

    info!(movies = inserted, "catalog ready");
    inserted
}
