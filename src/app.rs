//! Lost & Found Frontend App
//!
//! Root component: provides configuration and the dashboard store.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{DashboardPage, ItemDetailModal};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::store::DashboardState;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let reload_trigger = signal(0u32);

    // Provide context to all children
    provide_context(AppContext::new(config, reload_trigger));
    provide_context(Store::new(DashboardState::default()));

    view! {
        <div class="app-layout">
            <DashboardPage />
            <ItemDetailModal />
        </div>
    }
}
