//! Report Component
//!
//! Footprint, detected items and greener swaps for the last good detection.

use leptos::*;

use greenbite::api::{DetectionReport, SwapSuggestion};
use greenbite::view::{
    format_footprint, format_swap_saving, quote_metaphor, FOOTPRINT_HEADLINE, SWAPS_TITLE,
};

use crate::state::global::use_global_state;

#[component]
pub fn ReportPanel() -> impl IntoView {
    let state = use_global_state();
    let report = create_memo(move |_| state.session.with(|s| s.report().cloned()));

    view! {
        {move || match report.get() {
            // Hidden while a newer meal is being analyzed
            Some(_) if state.is_analyzing() => view! {}.into_view(),
            Some(report) => view! { <ReportCard report=report /> }.into_view(),
            None => view! {
                <div class="bg-gray-800 rounded-lg p-6 text-center text-gray-400">
                    "Snap or upload a photo of your meal to see its footprint."
                </div>
            }
            .into_view(),
        }}
    }
}

#[component]
fn ReportCard(report: DetectionReport) -> impl IntoView {
    let has_swaps = report.has_swaps();
    let savings = report.potential_savings();

    view! {
        <div class="bg-gray-800 rounded-lg p-6 space-y-4">
            <div>
                <p class="text-sm text-gray-400">{FOOTPRINT_HEADLINE}</p>
                <p class="text-4xl font-bold text-white">{format_footprint(report.total_co2)}</p>
                <p class="mt-1 text-gray-300 italic">{quote_metaphor(&report.metaphor)}</p>
            </div>

            <div class="flex flex-wrap gap-2">
                {report.detected_items.iter().map(|item| view! {
                    <span class="px-3 py-1 rounded-full bg-gray-700 text-sm text-gray-200 capitalize">
                        {item.clone()}
                    </span>
                }).collect_view()}
            </div>

            {report.leaderboard_rank.map(|rank| view! {
                <p class="text-sm text-green-400">{format!("You are #{} on the leaderboard", rank)}</p>
            })}

            {has_swaps.then(|| view! {
                <div class="space-y-2">
                    <h3 class="text-lg font-semibold text-green-400">{SWAPS_TITLE}</h3>
                    {report.swaps.iter().cloned().map(|swap| view! { <SwapRow swap=swap /> }).collect_view()}
                    <p class="text-sm text-gray-400">
                        {format!("Up to {:.1} kg CO₂ saved with these swaps", savings)}
                    </p>
                </div>
            })}
        </div>
    }
}

#[component]
fn SwapRow(swap: SwapSuggestion) -> impl IntoView {
    view! {
        <div class="bg-gray-700 rounded-lg p-3">
            <div class="flex justify-between items-center">
                <span class="text-gray-200">
                    {swap.original_item}" → "
                    <span class="font-medium text-green-300">{swap.swap_item}</span>
                </span>
                <span class="text-sm text-green-400">{format_swap_saving(swap.co2_saved)}</span>
            </div>
            <p class="mt-1 text-sm text-gray-400">{swap.reasoning}</p>
        </div>
    }
}
