//! Dashboard State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The controller
//! owns the authoritative state; the store mirrors it for the view.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::dashboard::{DashboardController, DashboardView, MapStatus, SelectionOverlay};
use crate::dashboard::map_surface::MapDriver;
use crate::models::Item;

/// Dashboard state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// Loading, error or content
    pub view: DashboardView,
    pub map_status: MapStatus,
    /// Item open in the detail overlay
    pub selection: SelectionOverlay,
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy the controller's state into the store, touching only changed fields
pub fn store_sync<D: MapDriver>(store: &DashboardStore, controller: &DashboardController<D>) {
    let view = controller.view();
    if *store.view().read_untracked() != view {
        *store.view().write() = view;
    }
    if *store.map_status().read_untracked() != *controller.map_status() {
        *store.map_status().write() = controller.map_status().clone();
    }
}

/// Open an item in the detail overlay (card click and marker click)
pub fn store_open_item(store: &DashboardStore, item: Item) {
    store.selection().write().open(item);
}

/// Dismiss the detail overlay
pub fn store_close_item(store: &DashboardStore) {
    store.selection().write().close();
}
