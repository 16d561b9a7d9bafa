//! Trend Chart Component
//!
//! Daily emissions line chart using HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use greenbite::panels::TrendPanel;
use greenbite::view::{ChartScale, TREND_TITLE};

use crate::components::loading::ChartSkeleton;
use crate::state::global::use_global_state;

const LINE_COLOR: &str = "#22c55e"; // green-500
const GRID_STEPS: usize = 5;

/// Drawable region inside the canvas margins
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn inside(canvas_width: f64, canvas_height: f64) -> Self {
        let (margin_left, margin_right, margin_top, margin_bottom) = (50.0, 20.0, 20.0, 30.0);
        Self {
            left: margin_left,
            top: margin_top,
            width: canvas_width - margin_left - margin_right,
            height: canvas_height - margin_top - margin_bottom,
        }
    }

    /// Canvas coordinates for each value, spread evenly left to right
    fn points(&self, values: &[f64], scale: &ChartScale) -> Vec<(f64, f64)> {
        let gaps = values.len().saturating_sub(1).max(1) as f64;
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let x = if values.len() == 1 {
                    self.left + self.width / 2.0
                } else {
                    self.left + (i as f64 / gaps) * self.width
                };
                let y = self.top + scale.fraction_from_top(*value) * self.height;
                (x, y)
            })
            .collect()
    }
}

#[component]
pub fn TrendChart() -> impl IntoView {
    let state = use_global_state();
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw whenever the panel settles
    create_effect(move |_| {
        state.trend.with(|panel| {
            if let Some(canvas) = canvas_ref.get() {
                draw_chart(&canvas, panel);
            }
        });
    });

    let loading = move || state.trend.with(|p| p.state.is_loading());
    let failure = move || state.trend.with(|p| p.state.failure().map(str::to_string));
    let average = move || state.trend.with(|p| p.average());
    let range = move || {
        state.trend.with(|p| {
            let first = p.points().first().and_then(|point| point.day())?;
            let last = p.points().last().and_then(|point| point.day())?;
            Some(format!("{} to {}", first.format("%b %d"), last.format("%b %d")))
        })
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-6">
            <div class="flex justify-between items-baseline mb-4">
                <h2 class="text-xl font-semibold">{TREND_TITLE}</h2>
                {move || average().map(|avg| view! {
                    <span class="text-sm text-gray-400">{format!("avg {:.1} kg CO₂/day", avg)}</span>
                })}
            </div>

            <Show when=loading>
                <ChartSkeleton />
            </Show>

            <canvas
                node_ref=canvas_ref
                width="600"
                height="260"
                class=move || if loading() { "hidden" } else { "w-full h-64 rounded-lg" }
            />

            {move || range().map(|range| view! {
                <p class="mt-2 text-xs text-gray-500">{range}</p>
            })}

            {move || failure().map(|_| view! {
                <p class="mt-2 text-sm text-red-400">"Trend unavailable"</p>
            })}
        </div>
    }
}

/// Draw the trend on canvas
fn draw_chart(canvas: &HtmlCanvasElement, panel: &TrendPanel) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let area = PlotArea::inside(width, height);

    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    let values: Vec<f64> = panel.points().iter().map(|p| p.co2_emitted).collect();
    if values.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No emissions recorded yet", width / 2.0 - 90.0, height / 2.0);
        return;
    }

    let scale = ChartScale::fit(values.iter().copied());

    // Grid and y-axis labels
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=GRID_STEPS {
        let y = area.top + (i as f64 / GRID_STEPS as f64) * area.height;
        ctx.begin_path();
        ctx.move_to(area.left, y);
        ctx.line_to(area.left + area.width, y);
        ctx.stroke();

        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&format!("{:.1}", scale.tick(i, GRID_STEPS)), 5.0, y + 4.0);
    }

    let points = area.points(&values, &scale);

    ctx.set_stroke_style(&LINE_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(*x, *y);
        } else {
            ctx.line_to(*x, *y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&LINE_COLOR.into());
    for (x, y) in &points {
        ctx.begin_path();
        let _ = ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }

    // X-axis: day of month
    ctx.set_fill_style(&"#9ca3af".into());
    for ((x, _), label) in points.iter().zip(panel.labels()) {
        let _ = ctx.fill_text(label, x - 8.0, height - 10.0);
    }
}
