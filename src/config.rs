use std::net::SocketAddr;

use anyhow::Context;

pub const DEFAULT_FEED_URL: &str = "https://extrademo-e605b-default-rtdb.firebaseio.com/.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub feed_url: String,
    pub feed_timeout_secs: u64,
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let feed_url = var("FEED_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

        let feed_timeout_secs: u64 =
            var("FEED_TIMEOUT_SECS").and_then(|s| s.parse().ok()).unwrap_or(30);

        let page_size: u32 = var("PAGE_SIZE")
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(24);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            feed_url,
            feed_timeout_secs,
            page_size,
        })
    }
}
