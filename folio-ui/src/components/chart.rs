//! Chart Component
//!
//! Small line/bar charts for the weather panel, drawn on an HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

struct Palette {
    background: &'static str,
    grid: &'static str,
    text: &'static str,
}

const LIGHT: Palette = Palette {
    background: "#f3f4f6", // gray-100
    grid: "#e5e7eb",       // gray-200
    text: "#4b5563",       // gray-600
};

const DARK: Palette = Palette {
    background: "#1a1a1a",
    grid: "#374151", // gray-700
    text: "#9ca3af", // gray-400
};

/// Canvas chart that redraws when the theme flips or `redraw` is bumped
#[component]
pub fn SeriesChart(
    kind: ChartKind,
    labels: Vec<String>,
    series: Vec<Series>,
    /// Fixed y-axis maximum (e.g. 100 for percentages)
    #[prop(optional)]
    max: Option<f64>,
    #[prop(into)] dark: Signal<bool>,
    #[prop(into)] redraw: Signal<u32>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let dark = dark.get();
        let _ = redraw.get();

        if let Some(canvas) = canvas_ref.get() {
            draw(&canvas, kind, &labels, &series, max, dark);
        }
    });

    view! {
        <canvas
            node_ref=canvas_ref
            width="480"
            height="300"
            class="w-full h-[300px] rounded-lg"
        />
    }
}

fn draw(
    canvas: &HtmlCanvasElement,
    kind: ChartKind,
    labels: &[String],
    series: &[Series],
    max: Option<f64>,
    dark: bool,
) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };
    let palette = if dark { &DARK } else { &LIGHT };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_left = 40.0;
    let margin_right = 12.0;
    let margin_top = 28.0;
    let margin_bottom = 28.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    ctx.set_fill_style(&palette.background.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    let values = series.iter().flat_map(|s| s.values.iter().copied());
    let (mut y_min, mut y_max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !y_min.is_finite() {
        ctx.set_fill_style(&palette.text.into());
        ctx.set_font("14px sans-serif");
        let _ = ctx.fill_text("No data", width / 2.0 - 25.0, height / 2.0);
        return;
    }
    if kind == ChartKind::Bar {
        y_min = y_min.min(0.0);
    }
    if let Some(max) = max {
        y_max = y_max.max(max);
    }
    if y_max == y_min {
        y_max += 1.0;
    }
    let y_range = y_max - y_min;

    // Grid and y-axis labels
    ctx.set_stroke_style(&palette.grid.into());
    ctx.set_line_width(1.0);
    ctx.set_font("11px sans-serif");
    for i in 0..=4 {
        let y = margin_top + (i as f64 / 4.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = y_max - (i as f64 / 4.0) * y_range;
        ctx.set_fill_style(&palette.text.into());
        let _ = ctx.fill_text(&format!("{:.0}", value), 4.0, y + 4.0);
    }

    let count = labels.len().max(1);
    let slot = chart_width / count as f64;
    let x_at = |i: usize| margin_left + slot * (i as f64 + 0.5);
    let y_at = |v: f64| margin_top + ((y_max - v) / y_range) * chart_height;

    for (idx, s) in series.iter().enumerate() {
        ctx.set_stroke_style(&s.color.into());
        ctx.set_fill_style(&s.color.into());

        match kind {
            ChartKind::Line => {
                ctx.set_line_width(2.0);
                ctx.begin_path();
                for (i, v) in s.values.iter().enumerate() {
                    if i == 0 {
                        ctx.move_to(x_at(i), y_at(*v));
                    } else {
                        ctx.line_to(x_at(i), y_at(*v));
                    }
                }
                ctx.stroke();

                for (i, v) in s.values.iter().enumerate() {
                    ctx.begin_path();
                    let _ = ctx.arc(x_at(i), y_at(*v), 3.0, 0.0, std::f64::consts::PI * 2.0);
                    ctx.fill();
                }
            }
            ChartKind::Bar => {
                let bar_width = slot * 0.6 / series.len() as f64;
                for (i, v) in s.values.iter().enumerate() {
                    let x = x_at(i) - slot * 0.3 + bar_width * idx as f64;
                    let top = y_at(*v);
                    ctx.fill_rect(x, top, bar_width, y_at(y_min.max(0.0)) - top);
                }
            }
        }

        // Legend
        let legend_x = margin_left + idx as f64 * 120.0;
        ctx.fill_rect(legend_x, 8.0, 10.0, 10.0);
        ctx.set_fill_style(&palette.text.into());
        let _ = ctx.fill_text(s.label, legend_x + 14.0, 17.0);
    }

    // X-axis labels
    ctx.set_fill_style(&palette.text.into());
    for (i, label) in labels.iter().enumerate() {
        let text_width = ctx.measure_text(label).map(|m| m.width()).unwrap_or(0.0);
        let _ = ctx.fill_text(label, x_at(i) - text_width / 2.0, height - 8.0);
    }
}
