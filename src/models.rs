//! Frontend Models
//!
//! Item data shown on the dashboard, normalized from the backend feed.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Whether an item was reported lost or registered as found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    #[default]
    Found,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Lost => "Lost",
            ItemKind::Found => "Found",
        }
    }
}

/// A reported item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Stable across refetches when the backend supplies a name
    pub id: String,
    pub display_name: String,
    pub location_label: String,
    /// Never empty
    pub images: Vec<String>,
    pub reported_at: DateTime<Utc>,
    pub kind: ItemKind,
}

impl Item {
    /// First image, used as the card thumbnail
    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or_default()
    }

    /// "Found at RV University"
    pub fn summary(&self) -> String {
        format!("{} at {}", self.kind.label(), self.location_label)
    }

    /// Report time in the viewer's local time zone
    pub fn reported_at_display(&self) -> String {
        self.reported_at
            .with_timezone(&Local)
            .format("%b %-d, %Y %H:%M")
            .to_string()
    }
}

/// Ordered items from one successful fetch.
///
/// Replaced wholesale on every fetch; the items behind it are never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCollection(Arc<[Item]>);

impl ItemCollection {
    pub fn new(items: Vec<Item>) -> Self {
        Self(Arc::from(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.0.iter().find(|item| item.id == id)
    }

    pub fn to_vec(&self) -> Vec<Item> {
        self.0.to_vec()
    }
}

impl Default for ItemCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A point on the map in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl MapCoordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
