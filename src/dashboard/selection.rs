//! Selection Overlay
//!
//! The item currently open in the detail overlay. At most one is open;
//! opening another replaces it.

use crate::models::Item;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionOverlay {
    open: Option<Item>,
}

impl SelectionOverlay {
    pub fn open(&mut self, item: Item) {
        log::debug!("[Selection] Open {}", item.id);
        self.open = Some(item);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&Item> {
        self.open.as_ref()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn content(&self) -> Option<OverlayContent> {
        self.open.as_ref().map(OverlayContent::from)
    }
}

/// What the detail overlay renders for an item
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayContent {
    pub title: String,
    pub images: Vec<String>,
    pub status: &'static str,
    pub location: String,
    pub reported: String,
}

impl From<&Item> for OverlayContent {
    fn from(item: &Item) -> Self {
        Self {
            title: item.display_name.clone(),
            images: item.images.clone(),
            status: item.kind.label(),
            location: item.location_label.clone(),
            reported: item.reported_at_display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemCollection, ItemKind};
    use chrono::{TimeZone, Utc};

    fn make_item(id: &str, kind: ItemKind) -> Item {
        Item {
            id: id.to_string(),
            display_name: format!("{} name", id),
            location_label: "RV University".to_string(),
            images: vec!["http://x/1.png".to_string(), "http://x/2.png".to_string()],
            reported_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            kind,
        }
    }

    #[test]
    fn test_open_replaces_previous() {
        let mut selection = SelectionOverlay::default();
        assert!(!selection.is_open());

        selection.open(make_item("a", ItemKind::Found));
        selection.open(make_item("b", ItemKind::Found));
        assert_eq!(selection.current().map(|i| i.id.as_str()), Some("b"));

        selection.close();
        assert!(selection.current().is_none());
        assert!(selection.content().is_none());
    }

    #[test]
    fn test_close_leaves_items_untouched() {
        let items = ItemCollection::new(vec![make_item("a", ItemKind::Found)]);
        let before = items.clone();
        let mut selection = SelectionOverlay::default();

        selection.open(items.iter().next().unwrap().clone());
        selection.close();
        selection.close();
        assert_eq!(items, before);
    }

    #[test]
    fn test_content_shows_every_field() {
        let mut selection = SelectionOverlay::default();
        selection.open(make_item("a", ItemKind::Lost));

        let content = selection.content().unwrap();
        assert_eq!(content.title, "a name");
        assert_eq!(content.images.len(), 2);
        assert_eq!(content.status, "Lost");
        assert_eq!(content.location, "RV University");
        assert!(content.reported.contains("2025"));
    }
}
