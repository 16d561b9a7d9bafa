//! GreenBite Backend API
//!
//! Wire types and the HTTP client for the detection backend.
//!
//! # Endpoints
//!
//! - `POST /detect` - Multipart upload (field `image`), returns a [`DetectionReport`]
//! - `GET /leaderboard` - Users ranked by CO₂ saved
//! - `GET /trend/{user_id}` - Daily emissions for one user
//! - `GET /health` - Liveness probe
//!
//! The wire types build on every target; the client needs the `native` feature.

pub mod dto;

/// Backend origin used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod error;

pub use dto::{DetectionReport, HealthStatus, LeaderboardEntry, SwapSuggestion, TrendPoint};

#[cfg(feature = "native")]
pub use client::{ApiClient, ClientConfig};
#[cfg(feature = "native")]
pub use error::{ApiError, ApiResult};
