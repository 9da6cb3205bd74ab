//! Map Surface
//!
//! Owns the single map instance of an activation:
//! `Uninitialized -> Active -> Destroyed`, and back to `Active` on the next
//! activation. The drawing library is reached through `MapDriver`, so the
//! lifecycle rules hold for any backend (Leaflet in the browser, a recording
//! fake in tests).

use thiserror::Error;

use crate::config::MapConfig;
use crate::models::MapCoordinate;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// The drawing library has not loaded (or never will)
    #[error("map library unavailable")]
    LibraryUnavailable,
    #[error("map library error: {0}")]
    Library(String),
}

/// Initial camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: MapCoordinate,
    pub zoom: u8,
    pub zoom_control: bool,
    pub attribution_control: bool,
}

/// Base imagery layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    pub url_template: String,
    pub subdomains: String,
    pub max_zoom: u8,
}

/// Imperative drawing library behind the map.
///
/// Handles are owned values: `destroy_map` and `remove_marker` consume them,
/// so a released handle cannot be used again.
pub trait MapDriver {
    /// Element the map is drawn into
    type Target;
    type Map;
    /// Container that markers are added to
    type Overlay;
    type Marker;

    fn library_ready(&self) -> bool;
    fn create_map(&self, target: &Self::Target, viewport: &Viewport) -> Result<Self::Map, MapError>;
    fn add_base_layer(&self, map: &Self::Map, tiles: &TileSource) -> Result<(), MapError>;
    fn create_overlay(&self, map: &Self::Map) -> Result<Self::Overlay, MapError>;
    fn add_marker(
        &self,
        overlay: &Self::Overlay,
        at: MapCoordinate,
        on_click: Box<dyn Fn()>,
    ) -> Result<Self::Marker, MapError>;
    fn remove_marker(&self, overlay: &Self::Overlay, marker: Self::Marker);
    /// Release the map and everything attached to it, overlays included
    fn destroy_map(&self, map: Self::Map);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    Uninitialized,
    Active,
    Destroyed,
}

enum SurfaceState<M, O> {
    Uninitialized,
    Active { map: M, overlay: O },
    Destroyed,
}

/// Borrowed access to the marker container of an active surface
pub struct OverlayHandle<'a, D: MapDriver> {
    driver: &'a D,
    overlay: &'a D::Overlay,
}

impl<'a, D: MapDriver> OverlayHandle<'a, D> {
    pub fn add_marker(&self, at: MapCoordinate, on_click: Box<dyn Fn()>) -> Result<D::Marker, MapError> {
        self.driver.add_marker(self.overlay, at, on_click)
    }

    pub fn remove_marker(&self, marker: D::Marker) {
        self.driver.remove_marker(self.overlay, marker);
    }
}

pub struct MapSurface<D: MapDriver> {
    driver: D,
    viewport: Viewport,
    tiles: TileSource,
    state: SurfaceState<D::Map, D::Overlay>,
}

impl<D: MapDriver> MapSurface<D> {
    pub fn new(driver: D, config: &MapConfig) -> Self {
        Self {
            driver,
            viewport: Viewport {
                center: config.center,
                zoom: config.zoom,
                zoom_control: config.zoom_control,
                attribution_control: config.attribution_control,
            },
            tiles: TileSource {
                url_template: config.tile_url.clone(),
                subdomains: config.tile_subdomains.clone(),
                max_zoom: config.max_zoom,
            },
            state: SurfaceState::Uninitialized,
        }
    }

    pub fn phase(&self) -> SurfacePhase {
        match self.state {
            SurfaceState::Uninitialized => SurfacePhase::Uninitialized,
            SurfaceState::Active { .. } => SurfacePhase::Active,
            SurfaceState::Destroyed => SurfacePhase::Destroyed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == SurfacePhase::Active
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Create the map in `target`. A no-op while a map already exists.
    ///
    /// On failure the surface stays where it was, so activation can be
    /// retried once the library is available.
    pub fn activate(&mut self, target: &D::Target) -> Result<(), MapError> {
        if self.is_active() {
            log::debug!("[MapSurface] Already active, ignoring activation");
            return Ok(());
        }
        if !self.driver.library_ready() {
            return Err(MapError::LibraryUnavailable);
        }

        let map = self.driver.create_map(target, &self.viewport)?;
        let overlay = match self.attach_layers(&map) {
            Ok(overlay) => overlay,
            Err(e) => {
                log::warn!("[MapSurface] Layer setup failed, discarding map: {}", e);
                self.driver.destroy_map(map);
                return Err(e);
            }
        };

        self.state = SurfaceState::Active { map, overlay };
        log::info!(
            "[MapSurface] Active at {:.4},{:.4} zoom {}",
            self.viewport.center.lat,
            self.viewport.center.lng,
            self.viewport.zoom
        );
        Ok(())
    }

    fn attach_layers(&self, map: &D::Map) -> Result<D::Overlay, MapError> {
        self.driver.add_base_layer(map, &self.tiles)?;
        self.driver.create_overlay(map)
    }

    /// Destroy the map, if there is one
    pub fn deactivate(&mut self) {
        match std::mem::replace(&mut self.state, SurfaceState::Destroyed) {
            SurfaceState::Active { map, .. } => {
                self.driver.destroy_map(map);
                log::info!("[MapSurface] Destroyed");
            }
            SurfaceState::Uninitialized => self.state = SurfaceState::Uninitialized,
            SurfaceState::Destroyed => {}
        }
    }

    /// The marker container, while the surface is active
    pub fn overlay(&self) -> Option<OverlayHandle<'_, D>> {
        match &self.state {
            SurfaceState::Active { overlay, .. } => Some(OverlayHandle {
                driver: &self.driver,
                overlay,
            }),
            _ => None,
        }
    }
}
