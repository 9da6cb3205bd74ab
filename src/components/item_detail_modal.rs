//! Item Detail Modal
//!
//! Renders the open selection. Independent of the map: markers can be
//! rebuilt underneath without closing it.

use leptos::prelude::*;

use crate::dashboard::OverlayContent;
use crate::store::{store_close_item, use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn ItemDetailModal() -> impl IntoView {
    let store = use_dashboard_store();
    let content = Memo::new(move |_| store.selection().read().content());

    view! {
        {move || content.get().map(|content| view! { <DetailBody content=content /> })}
    }
}

#[component]
fn DetailBody(content: OverlayContent) -> impl IntoView {
    let store = use_dashboard_store();
    let close = move |_| store_close_item(&store);
    let images = content.images.clone();

    view! {
        <div class="modal-backdrop" on:click=close>
            <div class="modal item-detail" on:click=|ev| ev.stop_propagation()>
                <button class="modal-close" on:click=close>"✕"</button>
                <h2 class="item-detail-title">{content.title}</h2>
                <div class="item-detail-images">
                    {images
                        .into_iter()
                        .map(|src| view! { <img class="item-detail-image" src=src /> })
                        .collect_view()}
                </div>
                <p class="item-detail-row">
                    <strong>"Status: "</strong>
                    <span class="item-detail-status">{content.status}</span>
                </p>
                <p class="item-detail-row">
                    <strong>"Location: "</strong>
                    {content.location}
                </p>
                <p class="item-detail-reported">"Reported on " {content.reported}</p>
            </div>
        </div>
    }
}
