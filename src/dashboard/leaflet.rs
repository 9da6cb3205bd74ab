//! Leaflet-backed `MapDriver` used in the browser.

use leaflet_bindings::{IconOptions, LayerGroup, MapOptions, MarkerBinding, TileLayerOptions};

use super::map_surface::{MapDriver, MapError, TileSource, Viewport};
use crate::config::MapConfig;
use crate::models::MapCoordinate;

pub struct LeafletDriver {
    icon: IconOptions,
}

impl LeafletDriver {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            icon: IconOptions {
                icon_url: config.icon.icon_url.clone(),
                icon_retina_url: config.icon.icon_retina_url.clone(),
                shadow_url: config.icon.shadow_url.clone(),
            },
        }
    }
}

impl MapDriver for LeafletDriver {
    type Target = web_sys::HtmlElement;
    type Map = leaflet_bindings::Map;
    type Overlay = LayerGroup;
    type Marker = MarkerBinding;

    fn library_ready(&self) -> bool {
        leaflet_bindings::is_loaded()
    }

    fn create_map(&self, target: &web_sys::HtmlElement, viewport: &Viewport) -> Result<Self::Map, MapError> {
        // Markers still render with Leaflet's broken default path, just without images
        if let Err(e) = leaflet_bindings::set_default_icon(&self.icon) {
            log::warn!("[Leaflet] Could not set marker icon: {}", e);
        }
        let options = MapOptions {
            center: [viewport.center.lat, viewport.center.lng],
            zoom: viewport.zoom,
            zoom_control: viewport.zoom_control,
            attribution_control: viewport.attribution_control,
        };
        leaflet_bindings::map(target, &options).map_err(MapError::Library)
    }

    fn add_base_layer(&self, map: &Self::Map, tiles: &TileSource) -> Result<(), MapError> {
        let options = TileLayerOptions {
            subdomains: tiles.subdomains.clone(),
            max_zoom: tiles.max_zoom,
        };
        let layer = leaflet_bindings::tile_layer(&tiles.url_template, &options).map_err(MapError::Library)?;
        layer.add_to(map);
        Ok(())
    }

    fn create_overlay(&self, map: &Self::Map) -> Result<LayerGroup, MapError> {
        let group = leaflet_bindings::layer_group().map_err(MapError::Library)?;
        group.add_to(map);
        Ok(group)
    }

    fn add_marker(
        &self,
        overlay: &LayerGroup,
        at: MapCoordinate,
        on_click: Box<dyn Fn()>,
    ) -> Result<MarkerBinding, MapError> {
        MarkerBinding::place(overlay, at.lat, at.lng, on_click).map_err(MapError::Library)
    }

    fn remove_marker(&self, overlay: &LayerGroup, marker: MarkerBinding) {
        marker.detach(overlay);
    }

    fn destroy_map(&self, map: Self::Map) {
        map.destroy();
    }
}
