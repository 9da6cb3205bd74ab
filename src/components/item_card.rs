//! Item Card Component

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::dashboard::PLACEHOLDER_IMAGE;
use crate::models::Item;

/// Card in the item list. Clicking it opens the same overlay a marker click does.
#[component]
pub fn ItemCard(item: Item, #[prop(into)] on_open: Callback<Item>) -> impl IntoView {
    let title = item.display_name.clone();
    let image = item.primary_image().to_string();
    let summary = item.summary();

    view! {
        <div class="item-card" on:click=move |_| on_open.run(item.clone())>
            <img
                class="item-card-image"
                src=image
                alt=title.clone()
                on:error=|ev| {
                    let img = ev
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlImageElement>().ok());
                    if let Some(img) = img {
                        if img.src() != PLACEHOLDER_IMAGE {
                            img.set_src(PLACEHOLDER_IMAGE);
                        }
                    }
                }
            />
            <div class="item-card-body">
                <h3 class="item-card-title">{title}</h3>
                <p class="item-card-summary">{summary}</p>
                <span class="item-card-hint">"Tap to view details"</span>
            </div>
        </div>
    }
}
