//! Application Configuration
//!
//! Backend location and map settings. The backend URL is baked in at build
//! time from `LOSTFOUND_BACKEND_URL`; a `window.__LOSTFOUND_CONFIG__` object
//! set by the hosting page can override selected fields at runtime.

use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::models::MapCoordinate;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

const BUILD_BACKEND_URL: Option<&str> = option_env!("LOSTFOUND_BACKEND_URL");
const RUNTIME_CONFIG_KEY: &str = "__LOSTFOUND_CONFIG__";

/// Default marker images (Leaflet cannot resolve its own when bundled)
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIconConfig {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
}

/// Embedded map settings
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Initial viewport center, also the anchor for placeholder marker positions
    pub center: MapCoordinate,
    pub zoom: u8,
    pub tile_url: String,
    pub tile_subdomains: String,
    pub max_zoom: u8,
    pub zoom_control: bool,
    pub attribution_control: bool,
    /// Width in degrees of the box placeholder markers are spread over
    pub marker_spread: f64,
    pub icon: MarkerIconConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: MapCoordinate::new(12.9249, 77.498),
            zoom: 15,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            tile_subdomains: "abcd".to_string(),
            max_zoom: 20,
            zoom_control: false,
            attribution_control: false,
            marker_spread: 0.01,
            icon: MarkerIconConfig {
                icon_url: "https://unpkg.com/leaflet@1.7.1/dist/images/marker-icon.png".to_string(),
                icon_retina_url: "https://unpkg.com/leaflet@1.7.1/dist/images/marker-icon-2x.png".to_string(),
                shadow_url: "https://unpkg.com/leaflet@1.7.1/dist/images/marker-shadow.png".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the matching/storage backend, without trailing slash
    pub backend_url: String,
    pub log_level: LevelFilter,
    pub map: MapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            log_level: LevelFilter::Info,
            map: MapConfig::default(),
        }
    }
}

/// Fields the hosting page may override
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Defaults plus the build-time backend URL
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = BUILD_BACKEND_URL.filter(|url| !url.trim().is_empty()) {
            config.backend_url = normalize_base_url(url);
        }
        config
    }

    /// Apply runtime overrides; invalid values are ignored
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = normalize_base_url(&url);
        }
        if let Some([lat, lng]) = overrides.center {
            if lat.is_finite() && lng.is_finite() {
                self.map.center = MapCoordinate::new(lat, lng);
            }
        }
        if let Some(zoom) = overrides.zoom {
            self.map.zoom = zoom.min(self.map.max_zoom);
        }
        if let Some(level) = overrides.log_level.and_then(|l| LevelFilter::from_str(&l).ok()) {
            self.log_level = level;
        }
    }

    /// Absolute URL of a backend route
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Read `window.__LOSTFOUND_CONFIG__`, if the page defined one
pub fn runtime_overrides() -> Result<Option<ConfigOverrides>, String> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_KEY))
        .map_err(|e| format!("{:?}", e))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| format!("Invalid {}: {}", RUNTIME_CONFIG_KEY, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let mut config = AppConfig::default();
        config.apply(ConfigOverrides {
            backend_url: Some("https://api.example.com/".to_string()),
            ..Default::default()
        });
        assert_eq!(config.endpoint("/items-list"), "https://api.example.com/items-list");
        assert_eq!(config.endpoint("items-list"), "https://api.example.com/items-list");
    }

    #[test]
    fn test_overrides_ignore_invalid_values() {
        let mut config = AppConfig::default();
        config.apply(ConfigOverrides {
            backend_url: Some("   ".to_string()),
            center: Some([f64::NAN, 77.0]),
            zoom: Some(40),
            log_level: Some("chatty".to_string()),
        });
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.map.center, MapConfig::default().center);
        assert_eq!(config.map.zoom, 20);
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = AppConfig::default();
        let overrides: ConfigOverrides = serde_json::from_str(
            r#"{"backendUrl":"http://10.0.0.2:9000","center":[1.5,2.5],"zoom":12,"logLevel":"debug"}"#,
        )
        .unwrap();
        config.apply(overrides);
        assert_eq!(config.backend_url, "http://10.0.0.2:9000");
        assert_eq!(config.map.center, MapCoordinate::new(1.5, 2.5));
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_map_defaults_hide_controls() {
        let map = MapConfig::default();
        assert!(!map.zoom_control);
        assert!(!map.attribution_control);
        assert_eq!(map.zoom, 15);
    }
}
