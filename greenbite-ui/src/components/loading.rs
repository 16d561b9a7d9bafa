//! Loading Component
//!
//! Spinners and skeleton states.

use leptos::*;

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}

/// Skeleton loader for the trend chart
#[component]
pub fn ChartSkeleton() -> impl IntoView {
    view! {
        <div class="animate-pulse">
            <div class="h-64 bg-gray-700 rounded" />
        </div>
    }
}
