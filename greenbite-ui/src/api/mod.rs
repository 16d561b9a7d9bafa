//! Backend API
//!
//! HTTP calls to the GreenBite backend through `gloo-net`.

pub mod client;

pub use client::{detect, fetch_leaderboard, fetch_trend, get_backend_base, set_backend_base};
