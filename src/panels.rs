//! Dashboard Panels
//!
//! View state for the two load-on-mount panels, the emissions trend and
//! the leaderboard. A failed load is kept as an explicit state so the view
//! can show it instead of an unexplained empty panel.

use serde::Serialize;
use std::fmt;

use crate::api::{LeaderboardEntry, TrendPoint};
use crate::view::{day_label, Badge};

/// Progress of a one-shot load
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    /// Settle a load from its result, logging failures
    pub fn settle<E: fmt::Display>(result: Result<T, E>, what: &str) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => {
                tracing::error!("Failed to load {}: {}", what, e);
                LoadState::Failed(e.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ============================================
// Trend
// ============================================

/// A user's daily emissions series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPanel {
    pub user_id: String,
    pub state: LoadState<Vec<TrendPoint>>,
}

impl TrendPanel {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            state: LoadState::Loading,
        }
    }

    pub fn finish<E: fmt::Display>(&mut self, result: Result<Vec<TrendPoint>, E>) {
        self.state = LoadState::settle(result, "emissions trend");
    }

    /// Points to plot, in the order the backend returned them. Empty unless loaded.
    pub fn points(&self) -> &[TrendPoint] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// X-axis labels, one per point
    pub fn labels(&self) -> Vec<&str> {
        self.points().iter().map(|p| day_label(&p.date)).collect()
    }

    pub fn total(&self) -> f64 {
        self.points().iter().map(|p| p.co2_emitted).sum()
    }

    /// Mean daily emissions, if any points were loaded
    pub fn average(&self) -> Option<f64> {
        let points = self.points();
        if points.is_empty() {
            return None;
        }
        Some(self.total() / points.len() as f64)
    }

    /// Last point minus first point; negative means emissions went down
    pub fn change(&self) -> Option<f64> {
        let points = self.points();
        match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 => {
                Some(last.co2_emitted - first.co2_emitted)
            }
            _ => None,
        }
    }
}

// ============================================
// Leaderboard
// ============================================

/// One rendered leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow<'a> {
    pub badge: Badge,
    pub entry: &'a LeaderboardEntry,
}

/// Users ranked by cumulative CO₂ saved
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LeaderboardPanel {
    pub state: LoadState<Vec<LeaderboardEntry>>,
}

impl LeaderboardPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish<E: fmt::Display>(&mut self, result: Result<Vec<LeaderboardEntry>, E>) {
        self.state = LoadState::settle(result, "leaderboard");

        for entry in self.rank_mismatches() {
            tracing::warn!(
                user_id = %entry.user_id,
                rank = ?entry.rank,
                "Leaderboard order disagrees with rank field; styling by position"
            );
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows in backend order. Badges come from position, not from `rank`.
    pub fn rows(&self) -> Vec<LeaderboardRow<'_>> {
        self.entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| LeaderboardRow {
                badge: Badge::for_index(index),
                entry,
            })
            .collect()
    }

    /// Entries whose `rank` field does not match their position
    pub fn rank_mismatches(&self) -> Vec<&LeaderboardEntry> {
        self.entries()
            .iter()
            .enumerate()
            .filter(|(index, entry)| matches!(entry.rank, Some(rank) if rank as usize != index + 1))
            .map(|(_, entry)| entry)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, saved: f64, rank: Option<u32>) -> LeaderboardEntry {
        LeaderboardEntry {
            user_id: id.to_string(),
            user_name: id.to_uppercase(),
            total_co2_saved: saved,
            rank,
        }
    }

    #[test]
    fn test_trend_labels_use_day_of_month() {
        let mut panel = TrendPanel::new("user_1");
        panel.finish::<String>(Ok(vec![
            TrendPoint::new("2024-01-05", 2.3),
            TrendPoint::new("2024-01-06", 1.9),
        ]));

        assert_eq!(panel.labels(), vec!["05", "06"]);
        assert!((panel.total() - 4.2).abs() < 1e-9);
        assert!((panel.change().unwrap() + 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_trend_failure_renders_empty() {
        let mut panel = TrendPanel::new("user_1");
        assert!(panel.state.is_loading());

        panel.finish::<String>(Err("connection refused".to_string()));

        assert!(panel.points().is_empty());
        assert_eq!(panel.state.failure(), Some("connection refused"));
        assert_eq!(panel.average(), None);
        assert_eq!(panel.change(), None);
    }

    #[test]
    fn test_leaderboard_badges_are_positional() {
        let mut panel = LeaderboardPanel::new();
        panel.finish::<String>(Ok(vec![
            entry("a", 30.0, Some(3)),
            entry("b", 25.0, Some(1)),
            entry("c", 20.0, None),
            entry("d", 15.0, Some(4)),
            entry("e", 10.0, Some(5)),
        ]));

        let badges: Vec<_> = panel.rows().iter().map(|r| r.badge).collect();
        assert_eq!(
            badges,
            vec![
                Badge::Gold,
                Badge::Silver,
                Badge::Bronze,
                Badge::Position(4),
                Badge::Position(5)
            ]
        );
        assert_eq!(panel.rows()[3].badge.label(), "#4");
        assert_eq!(panel.rows()[4].badge.label(), "#5");
        assert_eq!(panel.rows()[0].entry.user_id, "a");
    }

    #[test]
    fn test_rank_mismatches() {
        let mut panel = LeaderboardPanel::new();
        panel.finish::<String>(Ok(vec![
            entry("a", 30.0, Some(2)),
            entry("b", 25.0, Some(1)),
            entry("c", 20.0, Some(3)),
        ]));

        let ids: Vec<_> = panel.rank_mismatches().iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_load_state_json() {
        let mut panel = TrendPanel::new("user_1");
        panel.finish::<String>(Ok(vec![TrendPoint::new("2024-01-05", 2.3)]));
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["state"]["status"], "ready");
        assert_eq!(json["state"]["data"][0]["date"], "2024-01-05");

        panel.finish::<String>(Err("down".to_string()));
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["state"]["status"], "failed");
        assert_eq!(json["state"]["data"], "down");
    }

    #[test]
    fn test_leaderboard_failure_clears_loading() {
        let mut panel = LeaderboardPanel::new();
        assert!(panel.state.is_loading());

        panel.finish::<String>(Err("503".to_string()));

        assert!(!panel.state.is_loading());
        assert!(panel.rows().is_empty());
    }
}
