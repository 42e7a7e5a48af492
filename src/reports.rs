use crate::types::{
    BarSeries, Distribution, Gauge, IncomeRecord, MetricRow, Metrics, Report, ReportView,
    ResolvedRisk, StackedBarChart, Summary,
};
use crate::util::format_number;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const NO_DESCRIPTION: &str = "No description is available for this type yet.";
pub const NO_DATA_WARNING: &str = "There is no analysis data for the selected combination.";
pub const NO_INCOME_WARNING: &str =
    "There is no distribution structure data for this item, so the analysis is unavailable.";
pub const FUTURE_FEATURE_NOTE: &str = "Coming soon: an AI finance consultant will recommend \
     the loan and insurance products that best match your diagnosis.";

const GAUGE_MIN: f64 = 0.0;
const GAUGE_MAX: f64 = 100.0;

/// Descriptions for the six known risk-management types. The data column is
/// open-ended, so lookups go through `management_description`.
static MANAGEMENT_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "기후변화 고위험군",
            "A high-risk group whose business can be shaken by sudden weather shifts \
             (cold snaps, heat waves, heavy rain) regardless of season. Direct preparation \
             for climate risk, such as facility upgrades and disaster insurance, comes first.",
        ),
        (
            "다각화 안정 추구 타입",
            "Spreads item-specific risk by growing several items. Individual items may have \
             somewhat low climate resilience, so investment that strengthens the overall \
             production base works best.",
        ),
        (
            "고효율 집중 성장 타입",
            "Concentrates on a few climate-resistant core items to maximise efficiency. \
             Protecting the core items and investing for economies of scale is needed.",
        ),
        (
            "시장 관망 타입 (출하 조절)",
            "Product quality is stable but current market prices are low, so shipments are \
             held back and cash flow can suffer. Securing short-term operating funds until \
             the market turns favourable is an effective strategy.",
        ),
        (
            "수익 극대화 타입 (출하 적기)",
            "Market prices are currently very favourable and now is the best time to sell. \
             Quickly committing short-term funds for harvest and distribution realises the \
             largest return.",
        ),
        (
            "특이 패턴형 (전문 컨설팅 필요)",
            "Deviates from the usual risk patterns, so standard strategies are hard to apply. \
             If finances are in crisis, review farm-recovery funds first and have an expert \
             diagnose the root cause.",
        ),
    ])
});

/// Financial-strategy guidance shown with every report.
pub const ADVISORY: [&str; 5] = [
    "Climate resilience score: low-scoring (high-risk) farms should consider crop disaster \
     insurance first; the score can also support facility loans for irrigation and ventilation.",
    "Price volatility: at the 'warning' grade, contract farming or forward contracts help \
     manage price risk.",
    "Growth-cycle risk: a large absolute index means uncertain future income; plan disaster \
     reserves and use it as a risk indicator when setting loan limits.",
    "Current sale suitability: when low, a shipment-linked bridge loan can fund waiting for \
     the best shipping window; when high, expect demand for short-term working capital \
     (labour and logistics).",
    "Regional portfolio: high-index regions tend to have climate-stable income, making them \
     strategic targets for new-farmer and young-farmer loan products.",
];

pub fn management_description(management_type: &str) -> &'static str {
    MANAGEMENT_DESCRIPTIONS
        .get(management_type)
        .copied()
        .unwrap_or(NO_DESCRIPTION)
}

/// Management types seen in the data that have no description.
pub fn undescribed_types(types: &[String]) -> Vec<&str> {
    types
        .iter()
        .map(String::as_str)
        .filter(|t| !MANAGEMENT_DESCRIPTIONS.contains_key(*t))
        .collect()
}

/// Outcome of the income-table lookup for the selected item.
#[derive(Debug, Clone, Copy)]
pub enum IncomeLookup<'a> {
    /// No income table configured; the section is left out.
    Disabled,
    /// The income table could not be loaded or read.
    Unavailable(&'a str),
    NotFound,
    Found(&'a IncomeRecord),
}

pub fn report_title(region: &str, item: &str) -> String {
    format!("'{} - {}' Overall Diagnosis", region, item)
}

/// Build the report for one selection. Pure: the same inputs always give the
/// same `Report`.
pub fn build_report(
    region: &str,
    item: &str,
    risk: Option<&ResolvedRisk>,
    income: IncomeLookup<'_>,
) -> Report {
    let title = report_title(region, item);
    let Some(risk) = risk else {
        return Report::NoData {
            title,
            warning: NO_DATA_WARNING.to_string(),
        };
    };
    let r = &risk.record;

    let period_note = format!(
        "Analysis period: this is an annual diagnosis combining a full year of data, \
         including {}.",
        risk.season_summary()
    );

    let summary = Summary {
        major_risk_category: r.major_risk_category.clone(),
        management_type: r.management_type.clone(),
        description: management_description(&r.management_type).to_string(),
    };

    let metrics = Metrics {
        climate: vec![
            MetricRow::new(
                "Climate resilience score",
                format!("{} pts", format_number(r.climate_resilience_score, 1)),
            ),
            MetricRow::new(
                "Regional portfolio",
                format!("{} pts", format_number(r.regional_portfolio_index, 1)),
            ),
        ],
        market: vec![
            MetricRow::new("Price volatility", r.price_volatility_alert.clone()),
            MetricRow::new(
                "Current sale suitability",
                format!("{} pts", format_number(r.shipment_timing_index, 1)),
            ),
            MetricRow::new("Growth risk", format_number(r.growth_cycle_risk_index, 2)),
        ],
    };

    let distribution = match income {
        IncomeLookup::Disabled => None,
        IncomeLookup::Unavailable(reason) => Some(Distribution::Missing {
            warning: reason.to_string(),
        }),
        IncomeLookup::NotFound => Some(Distribution::Missing {
            warning: NO_INCOME_WARNING.to_string(),
        }),
        IncomeLookup::Found(rec) => Some(build_distribution(rec)),
    };

    let gauges = vec![
        gauge("Climate response capability", "green", r.climate_resilience_score),
        gauge("Current sale suitability", "blue", r.shipment_timing_index),
    ];

    Report::Full(ReportView {
        title,
        period_note,
        summary,
        metrics,
        advisory: ADVISORY.to_vec(),
        distribution,
        gauges,
    })
}

fn gauge(title: &str, color: &str, value: f64) -> Gauge {
    Gauge {
        title: title.to_string(),
        color: color.to_string(),
        value,
        min: GAUGE_MIN,
        max: GAUGE_MAX,
    }
}

fn percent_labels(values: &[f64]) -> Vec<String> {
    values
        .iter()
        .map(|v| format!("{}%", format_number(*v, 1)))
        .collect()
}

fn build_distribution(rec: &IncomeRecord) -> Distribution {
    let receipt = vec![rec.conventional_receipt_rate, rec.direct_receipt_rate];
    let cost = vec![rec.conventional_cost_rate, rec.direct_cost_rate];
    let chart = StackedBarChart {
        title: format!("'{}' price composition by distribution channel", rec.item),
        categories: vec!["conventional".to_string(), "direct-sale".to_string()],
        series: vec![
            BarSeries {
                name: "receipt rate".to_string(),
                labels: percent_labels(&receipt),
                values: receipt,
            },
            BarSeries {
                name: "distribution cost rate".to_string(),
                labels: percent_labels(&cost),
                values: cost,
            },
        ],
    };
    let recovery_index = MetricRow::new(
        "Income recovery index",
        format!("{}%", format_number(rec.income_recovery_index, 1)),
    )
    .with_help(
        "How quickly income recovers after a price collapse. Higher means a faster recovery.",
    );
    Distribution::Chart {
        chart,
        recovery_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{self, tests::sample_risk_table};
    use crate::types::RiskRecord;
    use std::collections::BTreeSet;

    fn resolved(management_type: &str, resilience: f64, timing: f64) -> ResolvedRisk {
        ResolvedRisk {
            record: RiskRecord {
                region: "경북".to_string(),
                item: "사과".to_string(),
                climate_season: "여름".to_string(),
                major_risk_category: "기후 민감형".to_string(),
                management_type: management_type.to_string(),
                climate_resilience_score: resilience,
                regional_portfolio_index: 61.04,
                price_volatility_alert: "경고".to_string(),
                shipment_timing_index: timing,
                growth_cycle_risk_index: -0.416,
            },
            seasons: vec!["여름".to_string(), "겨울".to_string()],
            matched_rows: 2,
        }
    }

    fn income(conv_receipt: f64, conv_cost: f64) -> IncomeRecord {
        IncomeRecord {
            item: "사과".to_string(),
            conventional_receipt_rate: conv_receipt,
            direct_receipt_rate: 71.0,
            conventional_cost_rate: conv_cost,
            direct_cost_rate: 29.0,
            income_recovery_index: 63.5,
        }
    }

    fn full(report: Report) -> ReportView {
        match report {
            Report::Full(view) => view,
            Report::NoData { .. } => panic!("expected a full report"),
        }
    }

    #[test]
    fn unknown_management_type_gets_placeholder() {
        assert_eq!(management_description("신규 유형"), NO_DESCRIPTION);
        assert_eq!(management_description(""), NO_DESCRIPTION);

        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("신규 유형", 50.0, 50.0)),
            IncomeLookup::Disabled,
        ));
        assert_eq!(view.summary.description, NO_DESCRIPTION);
    }

    #[test]
    fn known_management_type_gets_its_description() {
        let text = management_description("기후변화 고위험군");
        assert_ne!(text, NO_DESCRIPTION);
        assert!(text.contains("disaster insurance"));
        assert_eq!(MANAGEMENT_DESCRIPTIONS.len(), 6);
    }

    #[test]
    fn description_keys_appear_in_data() {
        let t = sample_risk_table();
        let in_data = resolver::management_types(&t).unwrap();
        let in_data: BTreeSet<&str> = in_data.iter().map(String::as_str).collect();

        for key in MANAGEMENT_DESCRIPTIONS.keys() {
            assert!(in_data.contains(*key), "description key '{}' not in data", key);
        }
    }

    #[test]
    fn undescribed_types_are_listed() {
        let types = vec![
            "기후변화 고위험군".to_string(),
            "신규 유형".to_string(),
            "".to_string(),
        ];
        assert_eq!(undescribed_types(&types), vec!["신규 유형", ""]);
    }

    #[test]
    fn no_match_renders_warning_only() {
        let report = build_report("경북", "배", None, IncomeLookup::NotFound);
        assert_eq!(
            report,
            Report::NoData {
                title: report_title("경북", "배"),
                warning: NO_DATA_WARNING.to_string(),
            }
        );
    }

    #[test]
    fn empty_selection_from_resolver_takes_warning_path() {
        let t = sample_risk_table();
        let risk = resolver::resolve_risk(&t, "전남", "사과").unwrap();
        let report = build_report("전남", "사과", risk.as_ref(), IncomeLookup::Disabled);
        assert!(matches!(report, Report::NoData { .. }));
    }

    #[test]
    fn metrics_are_formatted_to_fixed_decimals() {
        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("고효율 집중 성장 타입", 72.44, 55.35)),
            IncomeLookup::Disabled,
        ));
        let values: Vec<&str> = view
            .metrics
            .climate
            .iter()
            .chain(view.metrics.market.iter())
            .map(|m| m.value.as_str())
            .collect();
        assert_eq!(values, vec!["72.4 pts", "61.0 pts", "경고", "55.4 pts", "-0.42"]);
        assert!(view.period_note.contains("여름, 겨울"));
        assert_eq!(view.advisory.len(), ADVISORY.len());
        assert!(view.distribution.is_none());
    }

    #[test]
    fn missing_income_keeps_gauges() {
        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("고효율 집중 성장 타입", 72.4, 55.3)),
            IncomeLookup::NotFound,
        ));
        assert_eq!(
            view.distribution,
            Some(Distribution::Missing {
                warning: NO_INCOME_WARNING.to_string()
            })
        );
        assert_eq!(view.gauges.len(), 2);
        assert_eq!(view.gauges[0].value, 72.4);
        assert_eq!(view.gauges[1].value, 55.3);
    }

    #[test]
    fn unavailable_income_table_reports_reason() {
        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("고효율 집중 성장 타입", 72.4, 55.3)),
            IncomeLookup::Unavailable("income.xlsx was not found"),
        ));
        assert!(matches!(
            view.distribution,
            Some(Distribution::Missing { ref warning }) if warning == "income.xlsx was not found"
        ));
        assert_eq!(view.gauges.len(), 2);
    }

    #[test]
    fn stacked_values_are_not_renormalized() {
        let rec = income(45.2, 54.8);
        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("고효율 집중 성장 타입", 72.4, 55.3)),
            IncomeLookup::Found(&rec),
        ));
        let Some(Distribution::Chart {
            chart,
            recovery_index,
        }) = view.distribution
        else {
            panic!("expected a chart");
        };

        assert_eq!(chart.categories, vec!["conventional", "direct-sale"]);
        assert_eq!(chart.series[0].values, vec![45.2, 71.0]);
        assert_eq!(chart.series[1].values, vec![54.8, 29.0]);
        assert_eq!(chart.series[0].labels, vec!["45.2%", "71.0%"]);
        assert_eq!(chart.series[1].labels, vec!["54.8%", "29.0%"]);
        assert!((chart.stack_total(0) - 100.0).abs() < 1e-9);
        assert_eq!(format_number(chart.stack_total(0), 1), "100.0");
        assert_eq!(recovery_index.value, "63.5%");
        assert!(recovery_index.help.is_some());
    }

    #[test]
    fn skewed_shares_pass_through_unchanged() {
        let rec = income(30.0, 30.0);
        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("고효율 집중 성장 타입", 72.4, 55.3)),
            IncomeLookup::Found(&rec),
        ));
        let Some(Distribution::Chart { chart, .. }) = view.distribution else {
            panic!("expected a chart");
        };
        assert_eq!(chart.stack_total(0), 60.0);
    }

    #[test]
    fn gauge_values_are_not_clamped() {
        let view = full(build_report(
            "경북",
            "사과",
            Some(&resolved("고효율 집중 성장 타입", 130.0, -5.0)),
            IncomeLookup::Disabled,
        ));
        assert_eq!(view.gauges[0].value, 130.0);
        assert_eq!(view.gauges[0].max, 100.0);
        assert_eq!(view.gauges[1].value, -5.0);
        assert_eq!(view.gauges[0].color, "green");
        assert_eq!(view.gauges[1].color, "blue");
    }
}
