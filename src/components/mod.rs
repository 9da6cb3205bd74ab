//! UI Components
//!
//! Leptos components of the dashboard.

mod dashboard_page;
mod item_card;
mod item_detail_modal;
mod status_views;

pub use dashboard_page::DashboardPage;
pub use item_card::ItemCard;
pub use item_detail_modal::ItemDetailModal;
pub use status_views::{ErrorView, LoadingView};
