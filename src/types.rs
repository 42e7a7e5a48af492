use serde::Serialize;
use tabled::Tabled;

/// One row of the risk table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRecord {
    pub region: String,
    pub item: String,
    pub climate_season: String,
    pub major_risk_category: String,
    pub management_type: String,
    pub climate_resilience_score: f64,
    pub regional_portfolio_index: f64,
    pub price_volatility_alert: String,
    pub shipment_timing_index: f64,
    pub growth_cycle_risk_index: f64,
}

/// The representative risk row for a (region, item) pair.
///
/// `record` is the first matching row in table order; `seasons` holds the
/// distinct climate-season labels of every matching row, first seen first.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRisk {
    pub record: RiskRecord,
    pub seasons: Vec<String>,
    pub matched_rows: usize,
}

impl ResolvedRisk {
    pub fn season_summary(&self) -> String {
        self.seasons.join(", ")
    }
}

/// One row of the income / distribution table. Rates are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeRecord {
    pub item: String,
    pub conventional_receipt_rate: f64,
    pub direct_receipt_rate: f64,
    pub conventional_cost_rate: f64,
    pub direct_cost_rate: f64,
    pub income_recovery_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl MetricRow {
    pub fn new(label: &str, value: String) -> Self {
        MetricRow {
            label: label.to_string(),
            value,
            help: None,
        }
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

/// Circular gauge bounded to `[min, max]`. `value` is kept as read from the
/// data even when it falls outside the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub title: String,
    pub color: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

/// Bars per category, each bar stacking one segment per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBarChart {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl StackedBarChart {
    /// Height of the stacked bar for a category.
    pub fn stack_total(&self, category: usize) -> f64 {
        self.series
            .iter()
            .filter_map(|s| s.values.get(category))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ChannelRow {
    #[tabled(rename = "Channel")]
    pub channel: String,
    #[tabled(rename = "Receipt rate")]
    pub receipt_rate: String,
    #[tabled(rename = "Distribution cost rate")]
    pub cost_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub major_risk_category: String,
    pub management_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub climate: Vec<MetricRow>,
    pub market: Vec<MetricRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Distribution {
    Missing {
        warning: String,
    },
    Chart {
        chart: StackedBarChart,
        recovery_index: MetricRow,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub title: String,
    pub period_note: String,
    pub summary: Summary,
    pub metrics: Metrics,
    pub advisory: Vec<&'static str>,
    /// `None` when no income table is configured.
    pub distribution: Option<Distribution>,
    pub gauges: Vec<Gauge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    NoData { title: String, warning: String },
    Full(ReportView),
}
