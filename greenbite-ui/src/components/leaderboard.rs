//! Leaderboard Component
//!
//! Users by cumulative CO₂ saved, in backend order. The first three rows
//! get medal styling by position.

use leptos::*;

use greenbite::view::{format_saved, Badge, LEADERBOARD_LOADING_MESSAGE, LEADERBOARD_TITLE};

use crate::state::global::use_global_state;

/// Row accent for a badge
fn badge_class(badge: Badge) -> &'static str {
    match badge {
        Badge::Gold => "border-amber-400 bg-amber-400/10",
        Badge::Silver => "border-slate-300 bg-slate-300/10",
        Badge::Bronze => "border-orange-500 bg-orange-500/10",
        Badge::Position(_) => "border-gray-700 bg-gray-800",
    }
}

/// Podium names stand out
fn name_class(badge: Badge) -> &'static str {
    if badge.is_medal() {
        "text-white font-semibold"
    } else {
        "text-gray-300"
    }
}

#[component]
pub fn Leaderboard() -> impl IntoView {
    let state = use_global_state();

    let rows = move || {
        state.leaderboard.with(|panel| {
            panel
                .rows()
                .into_iter()
                .map(|row| {
                    (
                        row.badge,
                        row.entry.user_name.clone(),
                        row.entry.total_co2_saved,
                    )
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-6">
            <h2 class="text-xl font-semibold mb-4">{LEADERBOARD_TITLE}</h2>

            {move || {
                if state.leaderboard.with(|p| p.state.is_loading()) {
                    view! {
                        <p class="text-sm text-gray-400">{LEADERBOARD_LOADING_MESSAGE}</p>
                    }
                    .into_view()
                } else {
                    view! {
                        <ol class="space-y-2">
                            {rows()
                                .into_iter()
                                .map(|(badge, name, saved)| view! {
                                    <li class=format!(
                                        "flex items-center justify-between border rounded-lg px-4 py-2 {}",
                                        badge_class(badge)
                                    )>
                                        <span class="flex items-center space-x-3">
                                            <span class="w-8 text-lg">{badge.label()}</span>
                                            <span class=name_class(badge)>{name}</span>
                                        </span>
                                        <span class="text-sm text-green-400">{format_saved(saved)}</span>
                                    </li>
                                })
                                .collect_view()}
                        </ol>
                    }
                    .into_view()
                }
            }}

            {move || state.leaderboard.with(|p| p.state.failure().is_some()).then(|| view! {
                <p class="mt-2 text-sm text-red-400">"Leaderboard unavailable"</p>
            })}
        </div>
    }
}
