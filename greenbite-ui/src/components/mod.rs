//! UI Components
//!
//! Leptos components for the GreenBite dashboard.

pub mod capture;
pub mod leaderboard;
pub mod loading;
pub mod report;
pub mod toast;
pub mod trend_chart;

pub use capture::CapturePanel;
pub use leaderboard::Leaderboard;
pub use report::ReportPanel;
pub use toast::Toast;
pub use trend_chart::TrendChart;
