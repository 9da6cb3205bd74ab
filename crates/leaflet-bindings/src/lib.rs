//! Leaflet Bindings
//!
//! Minimal wasm-bindgen surface over the global `L` object that index.html
//! loads from a script tag. Only what the dashboard map needs is bound.
//! Constructors are imported with `catch` so a missing or broken library
//! comes back as an `Err` instead of a trap.

use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// `L.Map`
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(container: &web_sys::HtmlElement, options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_map(this: &Map);

    /// `L.TileLayer`
    pub type TileLayer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = tileLayer)]
    fn create_tile_layer(url_template: &str, options: &JsValue) -> Result<TileLayer, JsValue>;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_tile_layer_to(this: &TileLayer, map: &Map);

    /// `L.LayerGroup`
    pub type LayerGroup;

    #[wasm_bindgen(catch, js_namespace = L, js_name = layerGroup)]
    fn create_layer_group() -> Result<LayerGroup, JsValue>;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_group_to(this: &LayerGroup, map: &Map);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LayerGroup, layer: &Marker);

    /// `L.Marker`
    pub type Marker;

    #[wasm_bindgen(catch, js_namespace = L, js_name = marker)]
    fn create_marker(lat_lng: &JsValue) -> Result<Marker, JsValue>;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_marker_to(this: &Marker, group: &LayerGroup);

    #[wasm_bindgen(method, js_name = on)]
    fn on(this: &Marker, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = off)]
    fn off(this: &Marker, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(catch, js_namespace = ["L", "Icon", "Default"], js_name = mergeOptions)]
    fn merge_default_icon_options(options: &JsValue) -> Result<(), JsValue>;
}

// ========================
// Options
// ========================

/// Options for `L.map`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub center: [f64; 2],
    pub zoom: u8,
    pub zoom_control: bool,
    pub attribution_control: bool,
}

/// Options for `L.tileLayer`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    pub subdomains: String,
    pub max_zoom: u8,
}

/// Image URLs for `L.Icon.Default`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconOptions {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
}

// ========================
// Safe Wrappers
// ========================

/// True once the Leaflet script has defined `window.L`
pub fn is_loaded() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    js_sys::Reflect::get(&window, &JsValue::from_str("L"))
        .map(|value| value.is_object() || value.is_function())
        .unwrap_or(false)
}

fn js_error(err: JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    match err.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => format!("{:?}", err),
    }
}

fn to_js<T: Serialize>(options: &T) -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(options).map_err(|e| e.to_string())
}

/// Create a map inside `container`
pub fn map(container: &web_sys::HtmlElement, options: &MapOptions) -> Result<Map, String> {
    create_map(container, &to_js(options)?).map_err(js_error)
}

impl Map {
    /// Tear the map down: removes its layers, DOM nodes and event listeners
    pub fn destroy(self) {
        self.remove_map();
    }
}

pub fn tile_layer(url_template: &str, options: &TileLayerOptions) -> Result<TileLayer, String> {
    create_tile_layer(url_template, &to_js(options)?).map_err(js_error)
}

impl TileLayer {
    pub fn add_to(&self, map: &Map) {
        self.add_tile_layer_to(map);
    }
}

pub fn layer_group() -> Result<LayerGroup, String> {
    create_layer_group().map_err(js_error)
}

impl LayerGroup {
    pub fn add_to(&self, map: &Map) {
        self.add_group_to(map);
    }
}

/// Point the default marker icon at explicit image URLs (bundlers break the
/// path Leaflet derives from its own script location)
pub fn set_default_icon(options: &IconOptions) -> Result<(), String> {
    merge_default_icon_options(&to_js(options)?).map_err(js_error)
}

/// A marker placed in a layer group, together with its click callback.
///
/// The closure lives as long as the binding. `detach` unhooks and drops it,
/// so removed markers do not leave callbacks behind.
pub struct MarkerBinding {
    marker: Marker,
    on_click: Closure<dyn FnMut()>,
}

impl MarkerBinding {
    pub fn place(group: &LayerGroup, lat: f64, lng: f64, on_click: Box<dyn Fn()>) -> Result<Self, String> {
        let lat_lng = js_sys::Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng));
        let marker = create_marker(&lat_lng).map_err(js_error)?;
        let on_click = Closure::<dyn FnMut()>::new(move || on_click());
        marker.on("click", on_click.as_ref().unchecked_ref());
        marker.add_marker_to(group);
        Ok(Self { marker, on_click })
    }

    pub fn detach(self, group: &LayerGroup) {
        self.marker.off("click", self.on_click.as_ref().unchecked_ref());
        group.remove_layer(&self.marker);
    }
}
