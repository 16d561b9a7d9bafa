//! Presentation
//!
//! Formatting shared by the terminal and browser front ends, plus the
//! plain-text renderings used by the CLI.

use std::fmt::Write;

use crate::api::DetectionReport;
use crate::panels::{LeaderboardPanel, LoadState, TrendPanel};

/// Shown while a detection is in flight
pub const ANALYZING_MESSAGE: &str = "Analyzing carbon footprint...";

/// Shown while the leaderboard loads
pub const LEADERBOARD_LOADING_MESSAGE: &str = "Loading leaderboard...";

/// Alert raised when a detection fails
pub const DETECTION_FAILED_ALERT: &str = "Failed to connect to backend. Ensure it is running.";

/// Label above the report's total
pub const FOOTPRINT_HEADLINE: &str = "Total Estimated Footprint";

pub const TREND_TITLE: &str = "Your Weekly Trend";
pub const LEADERBOARD_TITLE: &str = "Hostel Leaderboard";
pub const SWAPS_TITLE: &str = "Greener Alternatives";

/// X-axis label for a trend date: the day-of-month part of `YYYY-MM-DD`.
///
/// Dates without a third `-` separated part are shown whole.
pub fn day_label(date: &str) -> &str {
    date.split('-').nth(2).unwrap_or(date)
}

/// Leaderboard position styling, decided by row index alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
    /// 1-based position for rows after the podium
    Position(usize),
}

impl Badge {
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Badge::Gold,
            1 => Badge::Silver,
            2 => Badge::Bronze,
            n => Badge::Position(n + 1),
        }
    }

    pub fn is_medal(&self) -> bool {
        !matches!(self, Badge::Position(_))
    }

    pub fn label(&self) -> String {
        match self {
            Badge::Gold => "🥇".to_string(),
            Badge::Silver => "🥈".to_string(),
            Badge::Bronze => "🥉".to_string(),
            Badge::Position(n) => format!("#{}", n),
        }
    }
}

/// Headline footprint, e.g. `4.12 kg CO₂`
pub fn format_footprint(total_co2: f64) -> String {
    format!("{} kg CO₂", total_co2)
}

/// Saving of one swap, with the value exactly as the backend sent it
pub fn format_swap_saving(co2_saved: f64) -> String {
    format!("Save {} kg", co2_saved)
}

/// The report's metaphor, quoted
pub fn quote_metaphor(metaphor: &str) -> String {
    format!("\"{}\"", metaphor)
}

/// Savings column of the leaderboard, one decimal
pub fn format_saved(total_co2_saved: f64) -> String {
    format!("{:.1} kg CO₂ saved", total_co2_saved)
}

/// Vertical scale for the trend chart.
///
/// Pads the data range by 10% on both sides so lines never touch the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScale {
    pub min: f64,
    pub max: f64,
}

impl ChartScale {
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }

        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }

        let range = max - min;
        let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
        Self {
            min: min - padding,
            max: max + padding,
        }
    }

    /// Position of `value` from the top, 0.0 (max) to 1.0 (min)
    pub fn fraction_from_top(&self, value: f64) -> f64 {
        ((self.max - value) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Value at the given gridline, counting `steps` gridlines from the top
    pub fn tick(&self, i: usize, steps: usize) -> f64 {
        self.max - (i as f64 / steps as f64) * (self.max - self.min)
    }
}

// ============================================
// Plain-text rendering
// ============================================

/// Detection report card
pub fn render_report(report: &DetectionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}: {}",
        FOOTPRINT_HEADLINE,
        format_footprint(report.total_co2)
    );
    if !report.detected_items.is_empty() {
        let _ = writeln!(out, "Detected: {}", report.detected_items.join(", "));
    }
    let _ = writeln!(out, "{}", quote_metaphor(&report.metaphor));

    if let Some(rank) = report.leaderboard_rank {
        let _ = writeln!(out, "Leaderboard rank: #{}", rank);
    }

    if report.has_swaps() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", SWAPS_TITLE);
        for swap in &report.swaps {
            let _ = writeln!(
                out,
                "  {} -> {}  ({})",
                swap.original_item,
                swap.swap_item,
                format_swap_saving(swap.co2_saved)
            );
            let _ = writeln!(out, "    {}", swap.reasoning);
        }
    }

    out
}

/// Leaderboard list
pub fn render_leaderboard(panel: &LeaderboardPanel) -> String {
    let mut out = String::new();

    if panel.state.is_loading() {
        let _ = writeln!(out, "{}", LEADERBOARD_LOADING_MESSAGE);
        return out;
    }

    let _ = writeln!(out, "{}", LEADERBOARD_TITLE);
    let _ = writeln!(out, "{}", "-".repeat(44));

    for row in panel.rows() {
        let _ = writeln!(
            out,
            "{:<4} {:<20} {}",
            row.badge.label(),
            row.entry.user_name,
            format_saved(row.entry.total_co2_saved)
        );
    }

    if let Some(message) = panel.state.failure() {
        let _ = writeln!(out, "(leaderboard unavailable: {})", message);
    }

    out
}

/// Line chart of the trend drawn with text, `height` rows tall
pub fn render_trend(panel: &TrendPanel, height: usize) -> String {
    const COL_WIDTH: usize = 4;
    const AXIS_WIDTH: usize = 7;

    let mut out = String::new();
    let _ = writeln!(out, "{}", TREND_TITLE);

    if let LoadState::Loading = panel.state {
        let _ = writeln!(out, "Loading...");
        return out;
    }

    let points = panel.points();
    if points.is_empty() {
        match panel.state.failure() {
            Some(message) => {
                let _ = writeln!(out, "(trend unavailable: {})", message);
            }
            None => {
                let _ = writeln!(out, "No data yet");
            }
        }
        return out;
    }

    let height = height.max(2);
    let scale = ChartScale::fit(points.iter().map(|p| p.co2_emitted));
    let rows: Vec<usize> = points
        .iter()
        .map(|p| (scale.fraction_from_top(p.co2_emitted) * (height - 1) as f64).round() as usize)
        .collect();

    for line in 0..height {
        let tick = scale.tick(line, height - 1);
        let _ = write!(out, "{:>5.1} |", tick);
        for row in &rows {
            let cell = if *row == line { "●" } else { " " };
            let _ = write!(out, "{:^width$}", cell, width = COL_WIDTH);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "{}+{}",
        " ".repeat(AXIS_WIDTH - 1),
        "-".repeat(points.len() * COL_WIDTH)
    );
    let _ = write!(out, "{}", " ".repeat(AXIS_WIDTH));
    for label in panel.labels() {
        let _ = write!(out, "{:^width$}", label, width = COL_WIDTH);
    }
    let _ = writeln!(out);

    out
}
