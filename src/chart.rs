//! Chart rendering for the dashboard: score-breakdown bars and the
//! compound-score distribution, emitted as base64-encoded SVG documents.

use base64::{engine::general_purpose::STANDARD, Engine as _};

const POSITIVE_COLOR: &str = "#4caf50";
const NEUTRAL_COLOR: &str = "#ff9800";
const NEGATIVE_COLOR: &str = "#f44336";

fn encode(svg: String) -> String {
    STANDARD.encode(svg)
}

/// Three-bar breakdown of positive/neutral/negative percentages.
pub fn breakdown_svg(positive: f64, neutral: f64, negative: f64) -> String {
    let width = 640.0;
    let height = 320.0;
    let plot_left = 60.0;
    let plot_bottom = height - 40.0;
    let plot_height = plot_bottom - 30.0;
    let bar_width = 120.0;

    let bars = [
        ("Positive", positive, POSITIVE_COLOR),
        ("Neutral", neutral, NEUTRAL_COLOR),
        ("Negative", negative, NEGATIVE_COLOR),
    ];

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg.push_str(&format!(
        r#"<text x="{}" y="20" text-anchor="middle" font-size="15">Sentiment Analysis Score Breakdown</text>"#,
        width / 2.0
    ));

    // y gridlines every 25%
    for step in 0..=4 {
        let value = step as f64 * 25.0;
        let y = plot_bottom - plot_height * value / 100.0;
        svg.push_str(&format!(
            r##"<line x1="{plot_left}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e0e0e0"/>"##,
            width - 20.0
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="#666">{value:.0}%</text>"##,
            plot_left - 8.0,
            y + 4.0
        ));
    }

    for (i, (label, value, color)) in bars.iter().enumerate() {
        let clamped = value.clamp(0.0, 100.0);
        let x = plot_left + 40.0 + i as f64 * (bar_width + 40.0);
        let bar_height = plot_height * clamped / 100.0;
        let y = plot_bottom - bar_height;
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width}" height="{bar_height:.1}" fill="{color}"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{clamped:.1}%</text>"#,
            x + bar_width / 2.0,
            y - 6.0
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{label}</text>"#,
            x + bar_width / 2.0,
            plot_bottom + 18.0
        ));
    }

    svg.push_str("</svg>");
    encode(svg)
}

/// Histogram of compound scores over [-1, 1] with a dashed mean line.
pub fn distribution_svg(scores: &[f64]) -> String {
    const BINS: usize = 20;
    let width = 760.0;
    let height = 420.0;
    let plot_left = 60.0;
    let plot_right = width - 30.0;
    let plot_bottom = height - 50.0;
    let plot_top = 40.0;
    let plot_width = plot_right - plot_left;
    let plot_height = plot_bottom - plot_top;

    let mut counts = [0usize; BINS];
    for &score in scores {
        let clamped = score.clamp(-1.0, 1.0);
        let idx = (((clamped + 1.0) / 2.0) * BINS as f64) as usize;
        counts[idx.min(BINS - 1)] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg.push_str(&format!(
        r#"<text x="{}" y="24" text-anchor="middle" font-size="15">Distribution of Comment Sentiment Scores</text>"#,
        width / 2.0
    ));

    let bin_width = plot_width / BINS as f64;
    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar_height = plot_height * count as f64 / max_count as f64;
        let x = plot_left + i as f64 * bin_width;
        let y = plot_bottom - bar_height;
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{bar_height:.1}" fill="skyblue" stroke="white"/>"#,
            bin_width - 1.0
        ));
    }

    // x axis labels at -1, -0.5, 0, 0.5, 1
    for step in 0..=4 {
        let value = -1.0 + step as f64 * 0.5;
        let x = plot_left + plot_width * (value + 1.0) / 2.0;
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="11" fill="#666">{value:.1}</text>"##,
            plot_bottom + 18.0
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{}" y="{:.1}" text-anchor="middle" font-size="12">Compound Sentiment Score</text>"#,
        width / 2.0,
        height - 12.0
    ));

    if !scores.is_empty() {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let x = plot_left + plot_width * (mean.clamp(-1.0, 1.0) + 1.0) / 2.0;
        svg.push_str(&format!(
            r#"<line x1="{x:.1}" y1="{plot_top}" x2="{x:.1}" y2="{plot_bottom}" stroke="red" stroke-dasharray="6 4"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12" fill="red">Average Score: {mean:.2}</text>"#,
            x + 8.0,
            plot_top + 14.0
        ));
    }

    svg.push_str("</svg>");
    encode(svg)
}
