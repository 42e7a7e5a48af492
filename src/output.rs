// Terminal and JSON rendering of a built `Report`.
use crate::reports::FUTURE_FEATURE_NOTE;
use crate::types::{ChannelRow, Distribution, Gauge, MetricRow, Report, ReportView, StackedBarChart};
use crate::util::format_number;
use chrono::NaiveDateTime;
use std::fmt::Write;
use tabled::{settings::Style, Table};

const GAUGE_WIDTH: usize = 40;
/// Cap on how far an out-of-range needle is drawn past the scale.
const GAUGE_OVERFLOW: usize = 10;
/// Characters per 100 percentage points in the stacked bars.
const BAR_WIDTH: usize = 50;
const SEGMENT_CHARS: [char; 2] = ['#', '='];

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub generated_at: NaiveDateTime,
    /// Show the collapsible detail sections (type description, advisory).
    pub expand_details: bool,
}

fn markdown_table(rows: &[MetricRow]) -> String {
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn render_text(report: &Report, opts: &RenderOptions) -> String {
    let mut out = String::with_capacity(4096);
    match report {
        Report::NoData { title, warning } => {
            let _ = writeln!(out, "=== {} ===", title);
            let _ = writeln!(out, "Generated: {}", opts.generated_at.format("%Y-%m-%d %H:%M"));
            let _ = writeln!(out);
            let _ = writeln!(out, "WARNING: {}", warning);
        }
        Report::Full(view) => render_view(&mut out, view, opts),
    }
    out
}

fn render_view(out: &mut String, view: &ReportView, opts: &RenderOptions) {
    let _ = writeln!(out, "=== {} ===", view.title);
    let _ = writeln!(out, "Generated: {}", opts.generated_at.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(out);
    let _ = writeln!(out, "INFO: {}", view.period_note);
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Diagnosis summary: your risk management type ---");
    let _ = writeln!(out, "Main risk environment:      {}", view.summary.major_risk_category);
    let _ = writeln!(out, "Recommended strategy:       {}", view.summary.management_type);
    if opts.expand_details {
        let _ = writeln!(out);
        let _ = writeln!(out, "  > Type description and recommended strategy");
        let _ = writeln!(out, "    {}", view.summary.description);
    } else {
        let _ = writeln!(out, "  > Type description and recommended strategy (collapsed)");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Indicator analysis: strengths and weaknesses ---");
    let _ = writeln!(out, "Climate & environment");
    let _ = writeln!(out, "{}", markdown_table(&view.metrics.climate));
    let _ = writeln!(out);
    let _ = writeln!(out, "Market & profitability");
    let _ = writeln!(out, "{}", markdown_table(&view.metrics.market));
    if opts.expand_details {
        let _ = writeln!(out);
        let _ = writeln!(out, "  > Financial strategies per indicator");
        for line in &view.advisory {
            let _ = writeln!(out, "    - {}", line);
        }
    } else {
        let _ = writeln!(out, "  > Financial strategies per indicator (collapsed)");
    }
    let _ = writeln!(out);

    if let Some(distribution) = &view.distribution {
        let _ = writeln!(out, "--- Distribution structure and income analysis ---");
        match distribution {
            Distribution::Missing { warning } => {
                let _ = writeln!(out, "WARNING: {}", warning);
            }
            Distribution::Chart {
                chart,
                recovery_index,
            } => {
                render_chart(out, chart);
                let _ = writeln!(out);
                let _ = writeln!(out, "{}: {}", recovery_index.label, recovery_index.value);
                if let Some(help) = &recovery_index.help {
                    let _ = writeln!(out, "  ({})", help);
                }
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "--- Key indicators ---");
    for g in &view.gauges {
        let _ = writeln!(out, "{}", gauge_line(g));
    }
}

fn render_chart(out: &mut String, chart: &StackedBarChart) {
    let _ = writeln!(out, "{}", chart.title);

    let rows: Vec<ChannelRow> = chart
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| ChannelRow {
            channel: category.clone(),
            receipt_rate: label_at(chart, 0, i),
            cost_rate: label_at(chart, 1, i),
        })
        .collect();
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::markdown()).to_string());
    let _ = writeln!(out);

    let name_width = chart.categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);
    for (i, category) in chart.categories.iter().enumerate() {
        let _ = writeln!(out, "{}", stacked_bar_line(chart, i, category, name_width));
    }
    let legend: Vec<String> = chart
        .series
        .iter()
        .zip(SEGMENT_CHARS.iter().cycle())
        .map(|(s, c)| format!("{} {}", c, s.name))
        .collect();
    let _ = writeln!(out, "{}", legend.join("   "));
}

fn label_at(chart: &StackedBarChart, series: usize, category: usize) -> String {
    chart
        .series
        .get(series)
        .and_then(|s| s.labels.get(category))
        .cloned()
        .unwrap_or_default()
}

fn stacked_bar_line(chart: &StackedBarChart, idx: usize, category: &str, name_width: usize) -> String {
    let mut bar = String::new();
    let mut labels = Vec::new();
    for (series, fill) in chart.series.iter().zip(SEGMENT_CHARS.iter().cycle()) {
        let value = series.values.get(idx).copied().unwrap_or(0.0);
        let cells = (value.max(0.0) / 100.0 * BAR_WIDTH as f64).round();
        let cap = BAR_WIDTH + GAUGE_OVERFLOW;
        if cells > cap as f64 {
            // Segment is drawn at the cap and marked; the label keeps the value.
            bar.extend(std::iter::repeat(*fill).take(cap));
            bar.push('>');
        } else {
            bar.extend(std::iter::repeat(*fill).take(cells as usize));
        }
        if let Some(label) = series.labels.get(idx) {
            labels.push(label.as_str());
        }
    }
    let pad = " ".repeat(name_width.saturating_sub(category.chars().count()));
    format!(
        "{pad}{category} |{bar} {} (total {}%)",
        labels.join(" + "),
        format_number(chart.stack_total(idx), 1)
    )
}

/// ASCII gauge over `[min, max]`. Values outside the range are drawn past
/// the scale ends instead of being clamped.
pub fn gauge_line(g: &Gauge) -> String {
    let span = g.max - g.min;
    let pos = if span > 0.0 {
        ((g.value - g.min) / span * GAUGE_WIDTH as f64).round()
    } else {
        0.0
    };

    let (under, filled, over) = if pos < 0.0 {
        ((-pos as usize).min(GAUGE_OVERFLOW), 0, 0)
    } else if pos > GAUGE_WIDTH as f64 {
        (0, GAUGE_WIDTH, (pos as usize - GAUGE_WIDTH).min(GAUGE_OVERFLOW))
    } else {
        (0, pos as usize, 0)
    };

    let mut line = String::new();
    if under > 0 {
        line.push('<');
        line.push_str(&"-".repeat(under));
    }
    line.push('[');
    line.push_str(&"#".repeat(filled));
    line.push_str(&".".repeat(GAUGE_WIDTH - filled));
    line.push(']');
    if over > 0 {
        line.push_str(&"#".repeat(over));
        line.push('>');
    }
    format!(
        "{} ({}): {} {} / {}",
        g.title,
        g.color,
        line,
        format_number(g.value, 1),
        format_number(g.max, 0)
    )
}

pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn sidebar_note() -> String {
    format!("[Upcoming] {}", FUTURE_FEATURE_NOTE)
}
