//! Recording `MapDriver` for engine tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::map_surface::{MapDriver, MapError, TileSource, Viewport};
use crate::models::MapCoordinate;

struct RecordedMarker {
    id: u32,
    overlay: u32,
    at: MapCoordinate,
    on_click: Rc<dyn Fn()>,
}

#[derive(Default)]
struct DriverLog {
    ready: Cell<bool>,
    fail_base_layer: Cell<bool>,
    fail_marker_call: Cell<Option<usize>>,
    next_handle: Cell<u32>,
    maps_created: Cell<usize>,
    live_maps: RefCell<Vec<u32>>,
    overlays: RefCell<Vec<(u32, u32)>>,
    base_layers: Cell<usize>,
    viewport: Cell<Option<Viewport>>,
    marker_calls: Cell<usize>,
    markers: RefCell<Vec<RecordedMarker>>,
}

impl DriverLog {
    fn handle(&self) -> u32 {
        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);
        id
    }
}

/// Cheap to clone; clones share one log
#[derive(Clone, Default)]
pub struct RecordingDriver {
    log: Rc<DriverLog>,
}

impl RecordingDriver {
    pub fn ready() -> Self {
        let driver = Self::default();
        driver.set_ready(true);
        driver
    }

    pub fn set_ready(&self, ready: bool) {
        self.log.ready.set(ready);
    }

    pub fn fail_base_layer(&self, fail: bool) {
        self.log.fail_base_layer.set(fail);
    }

    /// Make the n-th `add_marker` call (0-based, counted over the driver's life) fail
    pub fn fail_marker_call(&self, call: usize) {
        self.log.fail_marker_call.set(Some(call));
    }

    pub fn maps_created(&self) -> usize {
        self.log.maps_created.get()
    }

    pub fn live_maps(&self) -> usize {
        self.log.live_maps.borrow().len()
    }

    pub fn base_layers(&self) -> usize {
        self.log.base_layers.get()
    }

    pub fn last_viewport(&self) -> Option<Viewport> {
        self.log.viewport.get()
    }

    pub fn marker_calls(&self) -> usize {
        self.log.marker_calls.get()
    }

    pub fn live_markers(&self) -> usize {
        self.log.markers.borrow().len()
    }

    pub fn marker_positions(&self) -> Vec<MapCoordinate> {
        self.log.markers.borrow().iter().map(|m| m.at).collect()
    }

    /// Fire the click handler of the n-th live marker
    pub fn click_marker(&self, index: usize) {
        let on_click = self.log.markers.borrow().get(index).map(|m| m.on_click.clone());
        if let Some(on_click) = on_click {
            on_click();
        }
    }
}

impl MapDriver for RecordingDriver {
    type Target = ();
    type Map = u32;
    type Overlay = u32;
    type Marker = u32;

    fn library_ready(&self) -> bool {
        self.log.ready.get()
    }

    fn create_map(&self, _target: &(), viewport: &Viewport) -> Result<u32, MapError> {
        let map = self.log.handle();
        self.log.maps_created.set(self.log.maps_created.get() + 1);
        self.log.live_maps.borrow_mut().push(map);
        self.log.viewport.set(Some(*viewport));
        Ok(map)
    }

    fn add_base_layer(&self, _map: &u32, _tiles: &TileSource) -> Result<(), MapError> {
        if self.log.fail_base_layer.get() {
            return Err(MapError::Library("tile layer rejected".to_string()));
        }
        self.log.base_layers.set(self.log.base_layers.get() + 1);
        Ok(())
    }

    fn create_overlay(&self, map: &u32) -> Result<u32, MapError> {
        let overlay = self.log.handle();
        self.log.overlays.borrow_mut().push((overlay, *map));
        Ok(overlay)
    }

    fn add_marker(&self, overlay: &u32, at: MapCoordinate, on_click: Box<dyn Fn()>) -> Result<u32, MapError> {
        let call = self.log.marker_calls.get();
        self.log.marker_calls.set(call + 1);
        if self.log.fail_marker_call.get() == Some(call) {
            return Err(MapError::Library("marker rejected".to_string()));
        }
        let id = self.log.handle();
        self.log.markers.borrow_mut().push(RecordedMarker {
            id,
            overlay: *overlay,
            at,
            on_click: Rc::from(on_click),
        });
        Ok(id)
    }

    fn remove_marker(&self, _overlay: &u32, marker: u32) {
        self.log.markers.borrow_mut().retain(|m| m.id != marker);
    }

    fn destroy_map(&self, map: u32) {
        self.log.live_maps.borrow_mut().retain(|m| *m != map);
        let overlays: Vec<u32> = self
            .log
            .overlays
            .borrow()
            .iter()
            .filter(|(_, owner)| *owner == map)
            .map(|(overlay, _)| *overlay)
            .collect();
        self.log
            .markers
            .borrow_mut()
            .retain(|m| !overlays.contains(&m.overlay));
    }
}
