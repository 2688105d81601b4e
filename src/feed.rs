use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::error::AppResult;

/// Client for the upstream JSON export the catalog is seeded from.
pub struct FeedClient {
    client: wreq::Client,
    url: String,
}

impl FeedClient {
    pub fn new(client: wreq::Client, url: String) -> Self {
        Self { client, url }
    }

    pub async fn fetch(&self) -> AppResult<Vec<RawRecord>> {
        debug!(url = %self.url, "fetching feed");

        let body: Value =
            self.client.get(self.url.as_str()).send().await?.error_for_status()?.json().await?;

        Ok(records_from_value(body))
    }
}

/// Accepts an array of records or an object keyed by record id. Anything
/// else, and any entry that is not an object, yields nothing.
pub fn records_from_value(body: Value) -> Vec<RawRecord> {
    let entries = match body {
        Value::Array(items) => items,
        Value::Object(map) => map.into_values().collect(),
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(rename = "release date", default, deserialize_with = "lenient::text")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub images: Vec<RawImage>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub links: Vec<RawLink>,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub plot: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawImage {
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawLink {
    #[serde(default, deserialize_with = "lenient::text")]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub link_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_or_number")]
    pub size: Option<String>,
}

/// Field readers that treat a value of the wrong JSON type as absent.
mod lenient {
    use super::*;
    use serde::Deserializer;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn text_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
