//! # GreenBite
//!
//! Photograph a meal, get its estimated carbon footprint, greener swaps,
//! your emissions trend and the leaderboard.
//!
//! Inference, footprint computation and ranking all live in the backend;
//! this crate captures the image, calls the backend and presents the answers.
//!
//! ## Modules
//!
//! - [`api`]: Wire types and the backend HTTP client
//! - [`capture`]: Camera snapshot / file picker surface
//! - [`session`]: Single-flight detection state machine
//! - [`panels`]: Trend and leaderboard load state
//! - [`view`]: Formatting and plain-text rendering
//! - [`config`]: TOML + environment configuration
//!
//! Everything except the HTTP client and config builds without the default
//! `native` feature, so the browser frontend shares the same logic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use greenbite::api::{ApiClient, ClientConfig};
//! use greenbite::capture::CapturedImage;
//! use greenbite::session::DetectionSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::new("http://localhost:8000"))?;
//!     let mut session = DetectionSession::new();
//!
//!     let image = CapturedImage::from_path("lunch.jpg".as_ref())?;
//!     let ticket = session.submit(image)?;
//!     let (id, result) = client.detect_ticket(ticket).await;
//!     session.resolve(id, result.map_err(|e| e.to_string()));
//!
//!     if let Some(report) = session.report() {
//!         println!("{}", greenbite::view::render_report(report));
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod capture;
pub mod panels;
pub mod session;
pub mod view;

#[cfg(feature = "native")]
pub mod config;

// Re-export top-level types for convenience
pub use api::{DetectionReport, LeaderboardEntry, SwapSuggestion, TrendPoint};

#[cfg(feature = "native")]
pub use api::{ApiClient, ApiError, ApiResult, ClientConfig};

pub use capture::{CaptureError, CaptureSurface, CapturedImage, FileFrameSource, FrameSource};

pub use session::{DetectionSession, DetectionTicket, SessionError, SessionState, TicketId};

pub use panels::{LeaderboardPanel, LoadState, TrendPanel};

pub use view::Badge;

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
