//! App Root Component
//!
//! Page layout and global providers.

use leptos::*;

use crate::api;
use crate::components::{CapturePanel, Leaderboard, ReportPanel, Toast, TrendChart};
use crate::state::global::{provide_global_state, use_global_state, NoticeKind};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = provide_global_state();

    // Both panels load once on mount, independently
    create_effect(move |_| {
        state.load_trend();
        state.load_leaderboard();
    });

    // Leaving the page drops any pending detection
    on_cleanup(move || state.abort_detection());

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <header class="border-b border-gray-800">
                <div class="container mx-auto px-4 py-4 flex items-center justify-between">
                    <h1 class="text-2xl font-bold text-green-400">"GreenBite"</h1>
                    <BackendSetting />
                </div>
            </header>

            <main class="flex-1 container mx-auto px-4 py-8 grid gap-6 lg:grid-cols-2">
                <div class="space-y-6">
                    <CapturePanel />
                    <ReportPanel />
                </div>
                <div class="space-y-6">
                    <TrendChart />
                    <Leaderboard />
                </div>
            </main>

            <Toast />
        </div>
    }
}

/// Backend URL field, persisted in local storage
#[component]
fn BackendSetting() -> impl IntoView {
    let state = use_global_state();

    let on_change = move |ev: ev::Event| {
        let url = event_target_value(&ev);
        let url = url.trim();
        if url.is_empty() {
            return;
        }

        api::set_backend_base(url);
        state.notify(NoticeKind::BackendChanged, format!("Backend set to {}", url));
        state.load_trend();
        state.load_leaderboard();
    };

    view! {
        <label class="flex items-center space-x-2 text-sm text-gray-400">
            <span>"Backend"</span>
            <input
                type="url"
                value=api::get_backend_base()
                on:change=on_change
                class="bg-gray-800 border border-gray-700 rounded px-2 py-1 text-gray-200"
            />
        </label>
    }
}
