//! History chart rendering
//!
//! Turns a trailing close-price series into a small inline SVG line chart,
//! base64-encoded so the dispatcher can embed it as a data URI.

use crate::models::PricePoint;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::fmt::Write;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 220.0;
const MARGIN: f64 = 30.0;

/// Render a close-price polyline chart and return its base64 payload.
/// Needs at least two points to draw a line; otherwise a miss (`None`).
pub fn render_history_chart(symbol: &str, points: &[PricePoint]) -> Option<String> {
    if points.len() < 2 {
        return None;
    }

    let min = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);
    // Flat series still needs a non-zero vertical span
    let span = if (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        max - min
    };

    let inner_w = WIDTH - 2.0 * MARGIN;
    let inner_h = HEIGHT - 2.0 * MARGIN;
    let step = inner_w / (points.len() - 1) as f64;

    let mut polyline = String::new();
    for (i, point) in points.iter().enumerate() {
        let x = MARGIN + step * i as f64;
        let y = MARGIN + inner_h * (1.0 - (point.close - min) / span);
        let _ = write!(polyline, "{:.1},{:.1} ", x, y);
    }

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\
         <rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\
         <text x=\"{tx}\" y=\"20\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"13\">{symbol} - Last {n} days</text>\
         <polyline fill=\"none\" stroke=\"#1f77b4\" stroke-width=\"1.5\" points=\"{points}\"/>\
         <text x=\"{lx}\" y=\"{ly_max}\" font-family=\"sans-serif\" font-size=\"10\">{max:.2}</text>\
         <text x=\"{lx}\" y=\"{ly_min}\" font-family=\"sans-serif\" font-size=\"10\">{min:.2}</text>\
         </svg>",
        w = WIDTH,
        h = HEIGHT,
        tx = WIDTH / 2.0,
        symbol = symbol,
        n = points.len(),
        points = polyline.trim_end(),
        lx = 2.0,
        ly_max = MARGIN,
        ly_min = HEIGHT - MARGIN,
        max = max,
        min = min,
    );

    Some(BASE64.encode(svg.as_bytes()))
}
