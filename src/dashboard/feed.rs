//! Item Feed Client
//!
//! Fetches `/items-list` from the backend and normalizes the payload into an
//! `ItemCollection`. Missing or unusable fields fall back to defaults; only a
//! payload that cannot be read at all is an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Item, ItemCollection, ItemKind};

pub const ITEMS_PATH: &str = "items-list";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300?text=No+Image";
/// The backend does not report where an item was found yet, so every item
/// gets the campus name.
pub const PLACEHOLDER_LOCATION: &str = "RV University";
const UNKNOWN_NAME: &str = "Unknown Item";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("backend responded with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("backend reported an error: {0}")]
    Backend(String),
}

impl FetchError {
    /// Message shown in the dashboard error view
    pub fn user_message(&self) -> String {
        let reason = match self {
            FetchError::Network(_) => "the server could not be reached".to_string(),
            FetchError::Status(code) => format!("the server responded with status {}", code),
            FetchError::Malformed(_) => "the server sent an unexpected response".to_string(),
            FetchError::Backend(message) => message.clone(),
        };
        format!("Failed to load items: {}", reason)
    }
}

// ========================
// Wire Format
// ========================

#[derive(Debug, Default, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawItem {
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    thumbnail: Option<String>,
}

/// Non-empty trimmed string, or None for blanks and non-string values
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from))
}

fn raw_item(value: serde_json::Value) -> RawItem {
    if !value.is_object() {
        return RawItem::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}

// ========================
// Normalization
// ========================

/// Parse an `/items-list` body. `now` stamps every item.
pub fn parse_items(body: &str, now: DateTime<Utc>) -> Result<ItemCollection, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(FetchError::Malformed("expected a JSON object".to_string()));
    }
    let response: ItemsResponse =
        serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if response.status.as_deref() == Some("error") {
        let message = response.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(FetchError::Backend(message));
    }

    let raw = response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(raw_item)
        .collect();
    Ok(normalize(raw, now))
}

fn normalize(raw: Vec<RawItem>, now: DateTime<Utc>) -> ItemCollection {
    let mut seen = HashSet::new();
    let items = raw
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            // Ids follow the backend name so unchanged items keep their id
            // across refetches. Unnamed items only get a positional id.
            let (mut id, display_name) = match raw.name {
                Some(name) => (name.clone(), name),
                None => (format!("item-{}", index), format!("{} #{}", UNKNOWN_NAME, index + 1)),
            };
            while seen.contains(&id) {
                id = format!("{}-{}", id, index);
            }
            seen.insert(id.clone());

            Item {
                id,
                display_name,
                location_label: PLACEHOLDER_LOCATION.to_string(),
                images: vec![raw.thumbnail.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())],
                reported_at: now,
                kind: ItemKind::Found,
            }
        })
        .collect();
    ItemCollection::new(items)
}

// ========================
// Client
// ========================

/// Reads the found-items feed from the backend
#[derive(Debug, Clone)]
pub struct ItemFeedClient {
    endpoint: String,
}

impl ItemFeedClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            endpoint: config.endpoint(ITEMS_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET request. Every failure comes back as a `FetchError`.
    pub async fn fetch_items(&self) -> Result<ItemCollection, FetchError> {
        log::debug!("[ItemFeed] GET {}", self.endpoint);
        let response = Request::get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let items = parse_items(&body, Utc::now())?;
        log::info!("[ItemFeed] Loaded {} items", items.len());
        Ok(items)
    }
}
