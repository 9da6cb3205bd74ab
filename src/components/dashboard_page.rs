//! Dashboard Page
//!
//! Hosts the map and the item list. The `DashboardController` lives in a
//! thread-local slot: it holds JS handles (not `Send`), and the page's
//! cleanup hook has to reach it to release the map.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{ErrorView, ItemCard, LoadingView};
use crate::context::AppContext;
use crate::dashboard::{
    Activation, DashboardController, DashboardView, ItemFeedClient, LeafletDriver, MapStatus, SelectHandler,
};
use crate::models::{Item, ItemCollection};
use crate::store::{store_open_item, store_sync, use_dashboard_store, DashboardStore, DashboardStateStoreFields};

/// How often to look for the Leaflet global before giving up on the map
pub const MAP_LOAD_ATTEMPTS: u32 = 50;
pub const MAP_LOAD_RETRY_MS: u32 = 100;

thread_local! {
    static CONTROLLER: RefCell<Option<DashboardController<LeafletDriver>>> = const { RefCell::new(None) };
}

fn with_controller<R>(f: impl FnOnce(&mut DashboardController<LeafletDriver>) -> R) -> Option<R> {
    CONTROLLER.with(|slot| slot.borrow_mut().as_mut().map(f))
}

#[derive(Clone, Copy, PartialEq)]
enum Screen {
    Loading,
    Error,
    Content,
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_dashboard_store();
    let map_ref = NodeRef::<leptos::html::Div>::new();
    let (ticket, set_ticket) = signal(None::<Activation>);

    // One controller per page lifetime; remounts reuse it so tickets keep counting up
    CONTROLLER.with(|slot| {
        slot.borrow_mut().get_or_insert_with(|| {
            let on_select: SelectHandler = Rc::new(move |item: Item| store_open_item(&store, item));
            DashboardController::new(LeafletDriver::new(&ctx.config.map), &ctx.config.map, on_select)
        });
    });

    // Activate on mount and on every retry
    let feed = ItemFeedClient::new(&ctx.config);
    let reload_trigger = ctx.reload_trigger;
    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        let Some(activation) = with_controller(|c| {
            let activation = c.activate();
            store_sync(&store, c);
            activation
        }) else {
            return;
        };
        log::debug!("[Dashboard] Fetching items, trigger={}", trigger);
        set_ticket.set(Some(activation));

        let feed = feed.clone();
        spawn_local(async move {
            let result = feed.fetch_items().await;
            if let Err(e) = &result {
                log::error!("[Dashboard] {}: {}", feed.endpoint(), e);
            }
            with_controller(|c| {
                c.complete_fetch(activation, result);
                store_sync(&store, c);
            });
        });
    });

    // Attach the map once its container is mounted
    Effect::new(move |_| {
        let Some(container) = map_ref.get() else {
            return;
        };
        let Some(activation) = ticket.get_untracked() else {
            return;
        };
        spawn_local(attach_when_loaded(activation, container.into(), store));
    });

    on_cleanup(|| {
        with_controller(|c| c.deactivate());
    });

    let screen = Memo::new(move |_| match &*store.view().read() {
        DashboardView::Loading => Screen::Loading,
        DashboardView::Error(_) => Screen::Error,
        DashboardView::Content { .. } => Screen::Content,
    });
    let error_message = Memo::new(move |_| match &*store.view().read() {
        DashboardView::Error(message) => message.clone(),
        _ => String::new(),
    });
    let items = Memo::new(move |_| match &*store.view().read() {
        DashboardView::Content { items, .. } => items.clone(),
        _ => ItemCollection::default(),
    });
    let show_map = Memo::new(move |_| {
        matches!(&*store.view().read(), DashboardView::Content { show_map: true, .. })
    });
    let map_pending = move || *store.map_status().read() == MapStatus::Pending;

    let on_retry = {
        let ctx = ctx.clone();
        Callback::new(move |_: ()| ctx.reload())
    };
    let on_open = Callback::new(move |item: Item| store_open_item(&store, item));

    view! {
        <div class="dashboard">
            <header class="dashboard-header">
                <h1>"Lost & Found"</h1>
                <p class="dashboard-subtitle">"Items reported around campus"</p>
            </header>
            {move || match screen.get() {
                Screen::Loading => view! { <LoadingView /> }.into_any(),
                Screen::Error => view! { <ErrorView message=error_message.get() on_retry=on_retry /> }.into_any(),
                Screen::Content => view! {
                    <section class="dashboard-content">
                        <Show
                            when=move || show_map.get()
                            fallback=|| view! { <div class="map-unavailable">"Map unavailable. Showing the list only."</div> }
                        >
                            <div class="map-frame">
                                <div class="map-container" node_ref=map_ref></div>
                                <Show when=map_pending>
                                    <div class="map-loading">"Loading map…"</div>
                                </Show>
                            </div>
                        </Show>
                        <Show
                            when=move || !items.get().is_empty()
                            fallback=|| view! { <p class="empty-list">"No items reported yet."</p> }
                        >
                            <div class="item-list">
                                <For
                                    each=move || items.get().to_vec()
                                    key=|item| item.id.clone()
                                    children=move |item| view! { <ItemCard item=item on_open=on_open /> }
                                />
                            </div>
                        </Show>
                    </section>
                }.into_any(),
            }}
        </div>
    }
}

/// Wait for the Leaflet global, then create the map in `container`
async fn attach_when_loaded(activation: Activation, container: web_sys::HtmlElement, store: DashboardStore) {
    for attempt in 0..MAP_LOAD_ATTEMPTS {
        let Some((live, ready)) = with_controller(|c| (c.is_live(), c.map_library_ready())) else {
            return;
        };
        if !live {
            return;
        }
        if ready {
            with_controller(|c| {
                if let Err(e) = c.attach_map(activation, &container) {
                    log::error!("[Dashboard] Map setup failed: {}", e);
                }
                store_sync(&store, c);
            });
            return;
        }
        log::debug!("[Dashboard] Leaflet not loaded yet (attempt {})", attempt + 1);
        TimeoutFuture::new(MAP_LOAD_RETRY_MS).await;
    }

    with_controller(|c| {
        c.mark_map_unavailable(activation, "map library did not load");
        store_sync(&store, c);
    });
}
