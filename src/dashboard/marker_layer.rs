//! Marker Layer
//!
//! One map marker per item. Every resync tears the whole set down and
//! rebuilds it from the new collection; there is no per-item diffing.

use std::rc::Rc;

use super::map_surface::{MapDriver, MapSurface};
use crate::config::MapConfig;
use crate::models::{Item, ItemCollection, MapCoordinate};

/// Invoked with the item whose marker was clicked
pub type SelectHandler = Rc<dyn Fn(Item)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncOutcome {
    /// Markers drawn
    Drawn(usize),
    /// Map not active yet; the collection is kept for `flush`
    Deferred,
}

struct MarkerHandle<M> {
    item_id: String,
    marker: M,
}

pub struct MarkerLayer<D: MapDriver> {
    anchor: MapCoordinate,
    spread: f64,
    on_select: SelectHandler,
    markers: Vec<MarkerHandle<D::Marker>>,
    pending: Option<ItemCollection>,
}

impl<D: MapDriver> MarkerLayer<D> {
    pub fn new(config: &MapConfig, on_select: SelectHandler) -> Self {
        Self {
            anchor: config.center,
            spread: config.marker_spread,
            on_select,
            markers: Vec::new(),
            pending: None,
        }
    }

    #[cfg(test)]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[cfg(test)]
    pub fn marker_item_ids(&self) -> Vec<&str> {
        self.markers.iter().map(|h| h.item_id.as_str()).collect()
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace every marker with one per item in `items`
    pub fn resync(&mut self, surface: &MapSurface<D>, items: &ItemCollection) -> ResyncOutcome {
        self.teardown(surface);

        let Some(overlay) = surface.overlay() else {
            log::debug!("[MarkerLayer] Map not active, deferring {} markers", items.len());
            self.pending = Some(items.clone());
            return ResyncOutcome::Deferred;
        };
        self.pending = None;

        for item in items {
            let at = placeholder_coordinate(self.anchor, self.spread, &item.id);
            let on_select = self.on_select.clone();
            let selected = item.clone();
            match overlay.add_marker(at, Box::new(move || on_select(selected.clone()))) {
                Ok(marker) => self.markers.push(MarkerHandle {
                    item_id: item.id.clone(),
                    marker,
                }),
                Err(e) => log::warn!("[MarkerLayer] Skipping marker for {}: {}", item.id, e),
            }
        }

        log::debug!("[MarkerLayer] Drew {} of {} markers", self.markers.len(), items.len());
        ResyncOutcome::Drawn(self.markers.len())
    }

    /// Draw a collection deferred while the map was inactive
    pub fn flush(&mut self, surface: &MapSurface<D>) -> Option<ResyncOutcome> {
        if !surface.is_active() {
            return None;
        }
        let items = self.pending.take()?;
        Some(self.resync(surface, &items))
    }

    /// Remove all markers and forget any deferred collection
    pub fn clear(&mut self, surface: &MapSurface<D>) {
        self.teardown(surface);
        self.pending = None;
    }

    fn teardown(&mut self, surface: &MapSurface<D>) {
        let markers = std::mem::take(&mut self.markers);
        // Without an active map the markers went away with it.
        if let Some(overlay) = surface.overlay() {
            for handle in markers {
                log::trace!("[MarkerLayer] Removing marker for {}", handle.item_id);
                overlay.remove_marker(handle.marker);
            }
        }
    }
}

/// Placeholder geodata. The backend has no item locations yet, so each item
/// sits at a pseudo-random offset from `anchor` derived from its id: the same
/// id always lands on the same spot, within `spread` degrees.
pub fn placeholder_coordinate(anchor: MapCoordinate, spread: f64, id: &str) -> MapCoordinate {
    let digest = blake3::hash(id.as_bytes());
    let bytes = digest.as_bytes();
    let lat = unit_fraction(&bytes[0..8]);
    let lng = unit_fraction(&bytes[8..16]);
    MapCoordinate::new(
        anchor.lat + (lat - 0.5) * spread,
        anchor.lng + (lng - 0.5) * spread,
    )
}

/// Map 8 bytes onto [0, 1)
fn unit_fraction(bytes: &[u8]) -> f64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    (u64::from_le_bytes(word) >> 11) as f64 / (1u64 << 53) as f64
}
