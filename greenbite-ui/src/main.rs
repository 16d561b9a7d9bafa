//! GreenBite Dashboard
//!
//! Meal carbon footprint dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Camera snapshot or photo upload for detection
//! - Footprint report with greener swaps
//! - Weekly emissions trend chart
//! - Leaderboard
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Models, the detection session and view helpers come from the `greenbite`
//! crate; this crate adds the browser capture surface and HTTP via `gloo-net`.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
