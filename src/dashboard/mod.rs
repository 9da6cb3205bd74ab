//! Map Dashboard
//!
//! The synchronization engine behind the dashboard page: feed client, map
//! surface, marker layer, selection overlay and the controller tying them
//! together. Everything except `feed::ItemFeedClient::fetch_items` and the
//! Leaflet driver runs natively, so the engine is tested without a browser.

pub mod controller;
pub mod feed;
pub mod leaflet;
pub mod map_surface;
pub mod marker_layer;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{Activation, DashboardController, DashboardView, MapStatus};
pub use feed::{ItemFeedClient, PLACEHOLDER_IMAGE};
pub use leaflet::LeafletDriver;
pub use marker_layer::SelectHandler;
pub use selection::{OverlayContent, SelectionOverlay};
