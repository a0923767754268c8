//! Server-side SVG chart: variation band, target line and actual line.

use crate::models::{Analysis, CpaRow};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 540.0;
const PADDING_LEFT: f64 = 72.0;
const PADDING_RIGHT: f64 = 28.0;
const TOP: f64 = 64.0;
const BOTTOM: f64 = 100.0;
const TICKS: usize = 4;
const MAX_X_LABELS: usize = 12;

const BAND_FILL: &str = "#add8e6";
const TARGET_STROKE: &str = "#0000ff";
const ACTUAL_STROKE: &str = "#00008b";

pub const CHART_TITLE: &str =
    "Comparison of Actual CPA, Target CPA, and Dynamically Shaped Typical Variation";

struct Scale {
    min: f64,
    max: f64,
    count: usize,
}

impl Scale {
    fn for_rows(rows: &[CpaRow]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in rows {
            min = min.min(row.lower_bound).min(row.target_cpa);
            max = max.max(row.upper_bound).max(row.target_cpa);
        }
        if min == max {
            min -= 1.0;
            max += 1.0;
        } else {
            let pad = (max - min) * 0.1;
            min -= pad;
            max += pad;
        }
        Self {
            min,
            max,
            count: rows.len(),
        }
    }

    fn x(&self, index: usize) -> f64 {
        let plot_width = WIDTH - PADDING_LEFT - PADDING_RIGHT;
        if self.count > 1 {
            PADDING_LEFT + index as f64 * plot_width / (self.count - 1) as f64
        } else {
            PADDING_LEFT + plot_width / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        let scale = (HEIGHT - TOP - BOTTOM) / (self.max - self.min);
        HEIGHT - BOTTOM - (value - self.min) * scale
    }
}

/// Renders the analysis as a standalone `<svg>` element.
pub fn render_chart(analysis: &Analysis) -> String {
    let rows = &analysis.rows;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="cpa-chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="CPA chart" font-family="Space Grotesk, Trebuchet MS, sans-serif">"#
    );
    svg.push_str(&format!(
        r##"<text x="{}" y="28" text-anchor="middle" font-size="17" font-weight="600" fill="#2b2a28">{CHART_TITLE}</text>"##,
        WIDTH / 2.0
    ));

    if rows.is_empty() {
        svg.push_str(r##"<text x="50%" y="50%" text-anchor="middle" font-size="13" fill="#7a746d">No data yet</text></svg>"##);
        return svg;
    }

    let scale = Scale::for_rows(rows);
    svg.push_str(&grid(&scale, rows));
    svg.push_str(&band(&scale, rows));
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{TARGET_STROKE}" stroke-width="2" stroke-dasharray="8 6" />"#,
        points(&scale, rows.iter().map(|row| row.target_cpa))
    ));
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{ACTUAL_STROKE}" stroke-width="2.5" />"#,
        points(&scale, rows.iter().map(|row| row.actual_cpa))
    ));
    for (index, row) in rows.iter().enumerate() {
        svg.push_str(&format!(
            r#"<circle class="actual-point" cx="{:.2}" cy="{:.2}" r="4.5" fill="{ACTUAL_STROKE}"><title>{}: {}</title></circle>"#,
            scale.x(index),
            scale.y(row.actual_cpa),
            row.date,
            format_axis_value(row.actual_cpa)
        ));
    }
    svg.push_str(&axis_titles());
    svg.push_str(&legend());
    svg.push_str("</svg>");
    svg
}

fn grid(scale: &Scale, rows: &[CpaRow]) -> String {
    let mut out = String::new();
    let right = WIDTH - PADDING_RIGHT;
    let range = scale.max - scale.min;

    for i in 0..=TICKS {
        let value = scale.min + range * i as f64 / TICKS as f64;
        let y = scale.y(value);
        out.push_str(&format!(
            r##"<line x1="{PADDING_LEFT}" y1="{y:.2}" x2="{right}" y2="{y:.2}" stroke="#2f4858" stroke-opacity="0.12" />"##
        ));
        out.push_str(&format!(
            r##"<text x="{}" y="{:.2}" text-anchor="end" font-size="11" fill="#7a746d">{}</text>"##,
            PADDING_LEFT - 10.0,
            y + 4.0,
            format_axis_value(value)
        ));
    }

    let label_every = rows.len().div_ceil(MAX_X_LABELS).max(1);
    let bottom = HEIGHT - BOTTOM;
    for (index, row) in rows.iter().enumerate() {
        let x = scale.x(index);
        out.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{TOP}" x2="{x:.2}" y2="{bottom}" stroke="#2f4858" stroke-opacity="0.08" />"##
        ));
        if index % label_every == 0 {
            let label_y = bottom + 16.0;
            out.push_str(&format!(
                r##"<text class="x-label" x="{x:.2}" y="{label_y}" text-anchor="end" font-size="11" fill="#7a746d" transform="rotate(-45 {x:.2} {label_y})">{}</text>"##,
                row.date.format("%Y-%m-%d")
            ));
        }
    }
    out
}

fn band(scale: &Scale, rows: &[CpaRow]) -> String {
    let upper = rows
        .iter()
        .enumerate()
        .map(|(index, row)| (index, row.upper_bound));
    let lower = rows
        .iter()
        .enumerate()
        .rev()
        .map(|(index, row)| (index, row.lower_bound));
    let outline: Vec<String> = upper
        .chain(lower)
        .map(|(index, value)| format!("{:.2},{:.2}", scale.x(index), scale.y(value)))
        .collect();
    format!(
        r#"<polygon class="variation-band" points="{}" fill="{BAND_FILL}" fill-opacity="0.5" stroke="{BAND_FILL}" />"#,
        outline.join(" ")
    )
}

fn points(scale: &Scale, values: impl Iterator<Item = f64>) -> String {
    values
        .enumerate()
        .map(|(index, value)| format!("{:.2},{:.2}", scale.x(index), scale.y(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn axis_titles() -> String {
    let center_x = PADDING_LEFT + (WIDTH - PADDING_LEFT - PADDING_RIGHT) / 2.0;
    let center_y = TOP + (HEIGHT - TOP - BOTTOM) / 2.0;
    format!(
        r##"<text x="{center_x}" y="{}" text-anchor="middle" font-size="13" fill="#2b2a28">Date</text><text x="18" y="{center_y}" text-anchor="middle" font-size="13" fill="#2b2a28" transform="rotate(-90 18 {center_y})">CPA Value</text>"##,
        HEIGHT - 12.0
    )
}

fn legend() -> String {
    let x = WIDTH - PADDING_RIGHT - 170.0;
    let y = TOP + 8.0;
    format!(
        concat!(
            r##"<g class="legend" font-size="12" fill="#2b2a28">"##,
            r##"<rect x="{x}" y="{y}" width="162" height="70" rx="6" fill="white" fill-opacity="0.85" stroke="#2f4858" stroke-opacity="0.15" />"##,
            r##"<rect x="{x1}" y="{r1}" width="24" height="10" fill="{band}" fill-opacity="0.5" />"##,
            r##"<text x="{tx}" y="{t1}">Typical Variation</text>"##,
            r##"<line x1="{x1}" y1="{l2}" x2="{x2}" y2="{l2}" stroke="{target}" stroke-width="2" stroke-dasharray="8 6" />"##,
            r##"<text x="{tx}" y="{t2}">Target CPA</text>"##,
            r##"<line x1="{x1}" y1="{l3}" x2="{x2}" y2="{l3}" stroke="{actual}" stroke-width="2.5" />"##,
            r##"<circle cx="{cx}" cy="{l3}" r="4" fill="{actual}" />"##,
            r##"<text x="{tx}" y="{t3}">Actual CPA</text>"##,
            "</g>"
        ),
        x = x,
        y = y,
        x1 = x + 10.0,
        x2 = x + 34.0,
        cx = x + 22.0,
        tx = x + 42.0,
        r1 = y + 10.0,
        t1 = y + 19.0,
        l2 = y + 36.0,
        t2 = y + 40.0,
        l3 = y + 56.0,
        t3 = y + 60.0,
        band = BAND_FILL,
        target = TARGET_STROKE,
        actual = ACTUAL_STROKE,
    )
}

/// Rounds to one decimal, dropping a trailing `.0`.
pub fn format_axis_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0 + 0.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
