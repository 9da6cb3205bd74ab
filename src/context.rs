//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::config::AppConfig;

/// App-wide configuration and signals provided via context
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    /// Bumped to start a fresh dashboard activation - read
    pub reload_trigger: ReadSignal<u32>,
    /// Bumped to start a fresh dashboard activation - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(config: AppConfig, reload_trigger: (ReadSignal<u32>, WriteSignal<u32>)) -> Self {
        Self {
            config,
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
        }
    }

    /// Refetch items
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}
