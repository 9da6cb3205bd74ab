//! Dashboard Controller
//!
//! Orchestrates one dashboard activation: the item fetch, the map surface
//! and the marker layer. The controller itself is synchronous; the view
//! shell runs the fetch and library polling and reports back with the
//! `Activation` ticket it was handed, so results from an earlier activation
//! (or arriving after deactivation) are dropped instead of applied.

use super::feed::FetchError;
use super::map_surface::{MapDriver, MapError, MapSurface};
use super::marker_layer::{MarkerLayer, ResyncOutcome, SelectHandler};
use crate::config::MapConfig;
use crate::models::ItemCollection;

/// Ticket identifying one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Loading,
    /// User-facing message
    Error(String),
    Ready(ItemCollection),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum MapStatus {
    /// Waiting for the drawing library or the map container
    #[default]
    Pending,
    Ready,
    /// The dashboard renders without the map
    Unavailable(String),
}

/// What the dashboard should render
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardView {
    #[default]
    Loading,
    Error(String),
    Content { items: ItemCollection, show_map: bool },
}

pub struct DashboardController<D: MapDriver> {
    generation: u64,
    live: bool,
    fetch: FetchState,
    map_status: MapStatus,
    surface: MapSurface<D>,
    markers: MarkerLayer<D>,
}

impl<D: MapDriver> DashboardController<D> {
    pub fn new(driver: D, config: &MapConfig, on_select: SelectHandler) -> Self {
        Self {
            generation: 0,
            live: false,
            fetch: FetchState::Loading,
            map_status: MapStatus::Pending,
            surface: MapSurface::new(driver, config),
            markers: MarkerLayer::new(config, on_select),
        }
    }

    /// Start a new activation (mount or retry). The caller fetches items and
    /// reports back through `complete_fetch` with the returned ticket.
    ///
    /// A still-live activation is torn down first: the loading view unmounts
    /// the map container, so every activation gets a map of its own.
    pub fn activate(&mut self) -> Activation {
        if self.live {
            self.release_map();
        }
        self.generation += 1;
        self.live = true;
        self.fetch = FetchState::Loading;
        self.map_status = MapStatus::Pending;
        log::info!("[Dashboard] Activation {}", self.generation);
        Activation(self.generation)
    }

    fn accepts(&self, ticket: Activation) -> bool {
        self.live && ticket.0 == self.generation
    }

    /// Apply a fetch result. Returns false when the result was discarded.
    pub fn complete_fetch(&mut self, ticket: Activation, result: Result<ItemCollection, FetchError>) -> bool {
        if !self.accepts(ticket) {
            log::debug!("[Dashboard] Discarding fetch result of stale activation {}", ticket.0);
            return false;
        }

        match result {
            Ok(items) => {
                match self.markers.resync(&self.surface, &items) {
                    ResyncOutcome::Drawn(count) => log::debug!("[Dashboard] {} markers on map", count),
                    ResyncOutcome::Deferred => log::debug!("[Dashboard] Markers wait for the map"),
                }
                self.fetch = FetchState::Ready(items);
            }
            Err(e) => {
                log::warn!("[Dashboard] Fetch failed: {}", e);
                // The error view has no map container
                self.release_map();
                if self.map_status == MapStatus::Ready {
                    self.map_status = MapStatus::Pending;
                }
                self.fetch = FetchState::Error(e.user_message());
            }
        }
        true
    }

    /// The drawing library is loaded and `target` is mounted: create the map
    /// and draw any markers that were waiting for it.
    ///
    /// Returns `Ok(false)` when the ticket is stale.
    pub fn attach_map(&mut self, ticket: Activation, target: &D::Target) -> Result<bool, MapError> {
        if !self.accepts(ticket) {
            log::debug!("[Dashboard] Ignoring map attach for stale activation {}", ticket.0);
            return Ok(false);
        }

        if let Err(e) = self.surface.activate(target) {
            log::warn!("[Dashboard] Map unavailable: {}", e);
            self.map_status = MapStatus::Unavailable(e.to_string());
            return Err(e);
        }
        self.map_status = MapStatus::Ready;
        if let Some(ResyncOutcome::Drawn(count)) = self.markers.flush(&self.surface) {
            log::debug!("[Dashboard] Drew {} deferred markers", count);
        }
        Ok(true)
    }

    /// The drawing library never showed up
    pub fn mark_map_unavailable(&mut self, ticket: Activation, reason: &str) {
        if !self.accepts(ticket) {
            return;
        }
        log::warn!("[Dashboard] Map unavailable: {}", reason);
        self.map_status = MapStatus::Unavailable(reason.to_string());
    }

    /// Release the map. Later results for any earlier ticket are ignored.
    pub fn deactivate(&mut self) {
        self.release_map();
        self.live = false;
        log::info!("[Dashboard] Deactivated activation {}", self.generation);
    }

    /// Markers first, then the map they live on
    fn release_map(&mut self) {
        self.markers.clear(&self.surface);
        self.surface.deactivate();
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn map_library_ready(&self) -> bool {
        self.surface.driver().library_ready()
    }

    #[cfg(test)]
    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn map_status(&self) -> &MapStatus {
        &self.map_status
    }

    #[cfg(test)]
    pub fn marker_count(&self) -> usize {
        self.markers.marker_count()
    }

    #[cfg(test)]
    pub fn surface_phase(&self) -> super::map_surface::SurfacePhase {
        self.surface.phase()
    }

    pub fn view(&self) -> DashboardView {
        match &self.fetch {
            FetchState::Loading => DashboardView::Loading,
            FetchState::Error(message) => DashboardView::Error(message.clone()),
            FetchState::Ready(items) => DashboardView::Content {
                items: items.clone(),
                show_map: !matches!(self.map_status, MapStatus::Unavailable(_)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::feed::parse_items;
    use crate::dashboard::map_surface::SurfacePhase;
    use crate::dashboard::selection::{OverlayContent, SelectionOverlay};
    use crate::dashboard::testing::RecordingDriver;
    use crate::models::Item;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    const BLUE_BACKPACK: &str = r#"{"items":[{"name":"Blue Backpack","thumbnail":"http://x/1.png"}]}"#;

    struct Fixture {
        driver: RecordingDriver,
        controller: DashboardController<RecordingDriver>,
        selection: Rc<RefCell<SelectionOverlay>>,
    }

    fn fixture() -> Fixture {
        let driver = RecordingDriver::ready();
        let selection = Rc::new(RefCell::new(SelectionOverlay::default()));
        let sink = selection.clone();
        let controller = DashboardController::new(
            driver.clone(),
            &MapConfig::default(),
            Rc::new(move |item: Item| sink.borrow_mut().open(item)),
        );
        Fixture {
            driver,
            controller,
            selection,
        }
    }

    fn items(body: &str) -> ItemCollection {
        parse_items(body, Utc::now()).unwrap()
    }

    #[test]
    fn test_blue_backpack_scenario() {
        let mut f = fixture();
        let ticket = f.controller.activate();
        assert_eq!(f.controller.view(), DashboardView::Loading);

        let loaded = items(BLUE_BACKPACK);
        assert!(f.controller.complete_fetch(ticket, Ok(loaded.clone())));
        assert_eq!(f.controller.attach_map(ticket, &()), Ok(true));

        assert_eq!(f.controller.marker_count(), 1);
        assert_eq!(
            f.controller.view(),
            DashboardView::Content {
                items: loaded.clone(),
                show_map: true
            }
        );

        f.driver.click_marker(0);
        let from_marker = f.selection.borrow().content().unwrap();
        assert_eq!(from_marker.title, "Blue Backpack");
        assert_eq!(from_marker.location, "RV University");
        assert_eq!(from_marker.status, "Found");

        // Card click opens the same item from the collection
        let card = loaded.get("Blue Backpack").unwrap();
        assert_eq!(OverlayContent::from(card), from_marker);
    }

    #[test]
    fn test_empty_list_renders_without_error() {
        let mut f = fixture();
        let ticket = f.controller.activate();
        f.controller.complete_fetch(ticket, Ok(items(r#"{"items":[]}"#)));
        f.controller.attach_map(ticket, &()).unwrap();

        assert_eq!(f.controller.marker_count(), 0);
        assert!(matches!(f.controller.view(), DashboardView::Content { ref items, .. } if items.is_empty()));
    }

    #[test]
    fn test_fetch_failure_shows_error_without_markers() {
        let mut f = fixture();
        let ticket = f.controller.activate();
        f.controller.complete_fetch(ticket, Err(FetchError::Network("connection refused".into())));

        assert_eq!(
            f.controller.view(),
            DashboardView::Error("Failed to load items: the server could not be reached".to_string())
        );
        assert_eq!(f.driver.marker_calls(), 0);
        assert_eq!(f.controller.marker_count(), 0);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut f = fixture();
        let first = f.controller.activate();
        f.controller.complete_fetch(first, Err(FetchError::Status(500)));

        let retry = f.controller.activate();
        assert_eq!(f.controller.view(), DashboardView::Loading);
        assert!(!f.controller.complete_fetch(first, Ok(items(BLUE_BACKPACK))));
        assert!(f.controller.complete_fetch(retry, Ok(items(BLUE_BACKPACK))));
        f.controller.attach_map(retry, &()).unwrap();
        assert_eq!(f.controller.marker_count(), 1);
    }

    #[test]
    fn test_late_result_after_deactivation_is_discarded() {
        let mut f = fixture();
        let ticket = f.controller.activate();
        f.controller.deactivate();

        assert!(!f.controller.complete_fetch(ticket, Ok(items(BLUE_BACKPACK))));
        assert_eq!(f.controller.attach_map(ticket, &()), Ok(false));
        assert_eq!(f.controller.fetch_state(), &FetchState::Loading);
        assert_eq!(f.driver.marker_calls(), 0);
        assert_eq!(f.driver.maps_created(), 0);
    }

    #[test]
    fn test_markers_wait_for_map() {
        let mut f = fixture();
        let ticket = f.controller.activate();
        f.controller.complete_fetch(ticket, Ok(items(r#"{"items":[{"name":"a"},{"name":"b"}]}"#)));
        assert_eq!(f.driver.marker_calls(), 0);
        assert_eq!(f.controller.map_status(), &MapStatus::Pending);

        f.controller.attach_map(ticket, &()).unwrap();
        assert_eq!(f.controller.map_status(), &MapStatus::Ready);
        assert_eq!(f.driver.live_markers(), 2);
    }

    #[test]
    fn test_one_map_per_activation() {
        let mut f = fixture();
        for _ in 0..3 {
            let ticket = f.controller.activate();
            f.controller.complete_fetch(ticket, Ok(items(BLUE_BACKPACK)));
            f.controller.attach_map(ticket, &()).unwrap();
            f.controller.attach_map(ticket, &()).unwrap();
            assert_eq!(f.driver.live_maps(), 1);

            f.controller.deactivate();
            assert_eq!(f.controller.surface_phase(), SurfacePhase::Destroyed);
            assert_eq!(f.driver.live_maps(), 0);
            assert_eq!(f.driver.live_markers(), 0);
        }
        assert_eq!(f.driver.maps_created(), 3);
    }

    #[test]
    fn test_missing_library_degrades_to_list() {
        let driver = RecordingDriver::default();
        let mut controller = DashboardController::new(driver.clone(), &MapConfig::default(), Rc::new(|_: Item| {}));
        let ticket = controller.activate();
        controller.complete_fetch(ticket, Ok(items(BLUE_BACKPACK)));

        assert!(!controller.map_library_ready());
        assert_eq!(controller.attach_map(ticket, &()), Err(MapError::LibraryUnavailable));
        assert!(matches!(
            controller.view(),
            DashboardView::Content { show_map: false, ref items } if items.len() == 1
        ));
        assert_eq!(driver.maps_created(), 0);
    }

    #[test]
    fn test_mark_map_unavailable_respects_ticket() {
        let mut f = fixture();
        let stale = f.controller.activate();
        let current = f.controller.activate();

        f.controller.mark_map_unavailable(stale, "timed out");
        assert_eq!(f.controller.map_status(), &MapStatus::Pending);

        f.controller.mark_map_unavailable(current, "timed out");
        assert_eq!(f.controller.map_status(), &MapStatus::Unavailable("timed out".to_string()));
    }

    #[test]
    fn test_selection_survives_marker_rebuild() {
        let mut f = fixture();
        let ticket = f.controller.activate();
        f.controller.complete_fetch(ticket, Ok(items(BLUE_BACKPACK)));
        f.controller.attach_map(ticket, &()).unwrap();
        f.driver.click_marker(0);

        let retry = f.controller.activate();
        f.controller.complete_fetch(retry, Ok(items(r#"{"items":[{"name":"Keys"}]}"#)));
        f.controller.attach_map(retry, &()).unwrap();
        assert_eq!(f.controller.marker_count(), 1);
        assert_eq!(
            f.selection.borrow().current().map(|item| item.id.as_str()),
            Some("Blue Backpack")
        );
    }

    #[test]
    fn test_reactivation_while_live_gets_fresh_map() {
        let mut f = fixture();
        let first = f.controller.activate();
        f.controller.complete_fetch(first, Ok(items(BLUE_BACKPACK)));
        f.controller.attach_map(first, &()).unwrap();
        assert_eq!(f.driver.live_markers(), 1);

        let second = f.controller.activate();
        assert_eq!(f.controller.view(), DashboardView::Loading);
        assert_eq!(f.controller.map_status(), &MapStatus::Pending);
        assert_eq!(f.controller.surface_phase(), SurfacePhase::Destroyed);
        assert_eq!(f.driver.live_maps(), 0);
        assert_eq!(f.driver.live_markers(), 0);

        f.controller.complete_fetch(second, Ok(items(r#"{"items":[{"name":"a"},{"name":"b"}]}"#)));
        assert_eq!(f.controller.attach_map(second, &()), Ok(true));
        assert_eq!(f.driver.maps_created(), 2);
        assert_eq!(f.driver.live_maps(), 1);
        assert_eq!(f.driver.live_markers(), 2);
        assert_eq!(f.controller.map_status(), &MapStatus::Ready);
    }
}
