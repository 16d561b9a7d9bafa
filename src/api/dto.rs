//! Data Transfer Objects
//!
//! Value records exchanged verbatim with the GreenBite backend.
//! Field names match the backend's snake_case JSON.

use serde::{Deserialize, Serialize};

// ============================================
// DETECTION DTOs
// ============================================

/// Result of analyzing one meal photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Food items recognized in the photo
    pub detected_items: Vec<String>,
    /// Estimated footprint of the whole meal (kg CO₂)
    pub total_co2: f64,
    /// Relatable comparison for the footprint
    pub metaphor: String,
    /// Lower-footprint substitutes, possibly empty
    #[serde(default)]
    pub swaps: Vec<SwapSuggestion>,
    /// Position on the leaderboard after this meal, if the backend knows it
    #[serde(default)]
    pub leaderboard_rank: Option<u32>,
}

impl DetectionReport {
    /// Whether the swaps panel has anything to show
    pub fn has_swaps(&self) -> bool {
        !self.swaps.is_empty()
    }

    /// Total CO₂ that could be saved by taking every suggested swap
    pub fn potential_savings(&self) -> f64 {
        self.swaps.iter().map(|s| s.co2_saved).sum()
    }
}

/// A recommended lower-footprint substitute for a detected item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSuggestion {
    pub original_item: String,
    pub swap_item: String,
    /// kg CO₂ saved by making the swap
    pub co2_saved: f64,
    pub reasoning: String,
}

// ============================================
// LEADERBOARD DTOs
// ============================================

/// One user's ranking record by cumulative emissions saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub user_name: String,
    /// Cumulative kg CO₂ saved
    pub total_co2_saved: f64,
    /// Backend-assigned rank (1-based). Not used for styling.
    #[serde(default)]
    pub rank: Option<u32>,
}

// ============================================
// TREND DTOs
// ============================================

/// One day's aggregate emissions for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// kg CO₂ emitted that day
    pub co2_emitted: f64,
}

impl TrendPoint {
    pub fn new(date: impl Into<String>, co2_emitted: f64) -> Self {
        Self {
            date: date.into(),
            co2_emitted,
        }
    }

    /// Parse the date string, if it is a well-formed `YYYY-MM-DD`
    pub fn day(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Backend health probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
