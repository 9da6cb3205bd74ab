//! Loading and error views of the dashboard.

use leptos::prelude::*;

/// Lines of recent log output shown under an error
const DIAGNOSTIC_LINES: usize = 20;

#[component]
pub fn LoadingView() -> impl IntoView {
    view! {
        <div class="status-view loading">
            <div class="spinner"></div>
            <p>"Loading campus database…"</p>
        </div>
    }
}

/// Error message with a retry button and the tail of the log
#[component]
pub fn ErrorView(message: String, #[prop(into)] on_retry: Callback<()>) -> impl IntoView {
    let lines = rolling_logger::recent_lines();
    let diagnostics = lines[lines.len().saturating_sub(DIAGNOSTIC_LINES)..].join("\n");

    view! {
        <div class="status-view error">
            <p class="error-message">{message}</p>
            <button class="retry-btn" on:click=move |_| on_retry.run(())>"Retry"</button>
            <details class="diagnostics">
                <summary>"Details"</summary>
                <pre>{diagnostics}</pre>
            </details>
        </div>
    }
}
