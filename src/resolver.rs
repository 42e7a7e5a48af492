// Selection lookups over the loaded tables.
//
// Keys are compared with exact, case-sensitive string equality. Only the
// key columns are read until a match is found.
use crate::error::ReportError;
use crate::loader::{Row, Table};
use crate::schema::{income, risk};
use crate::types::{IncomeRecord, ResolvedRisk, RiskRecord};
use std::collections::BTreeSet;
use tracing::debug;

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Distinct regions, ascending.
pub fn regions(table: &Table) -> Result<Vec<String>, ReportError> {
    let region_col = table.column_index(risk::REGION)?;
    Ok(distinct_sorted(table.rows().map(|r| r.cell(region_col))))
}

/// Distinct items grown in `region`, ascending. Unknown regions give an
/// empty list.
pub fn items(table: &Table, region: &str) -> Result<Vec<String>, ReportError> {
    let region_col = table.column_index(risk::REGION)?;
    let item_col = table.column_index(risk::ITEM)?;
    Ok(distinct_sorted(
        table
            .rows()
            .filter(|r| r.cell(region_col) == region)
            .map(|r| r.cell(item_col)),
    ))
}

/// Distinct management-type labels present in the risk table.
pub fn management_types(table: &Table) -> Result<Vec<String>, ReportError> {
    let col = table.column_index(risk::MANAGEMENT_TYPE)?;
    Ok(distinct_sorted(table.rows().map(|r| r.cell(col))))
}

fn risk_record(row: &Row<'_>) -> Result<RiskRecord, ReportError> {
    Ok(RiskRecord {
        region: row.text(risk::REGION)?.to_string(),
        item: row.text(risk::ITEM)?.to_string(),
        climate_season: row.text(risk::CLIMATE_SEASON)?.to_string(),
        major_risk_category: row.text(risk::MAJOR_RISK_CATEGORY)?.to_string(),
        management_type: row.text(risk::MANAGEMENT_TYPE)?.to_string(),
        climate_resilience_score: row.number(risk::CLIMATE_RESILIENCE_SCORE)?,
        regional_portfolio_index: row.number(risk::REGIONAL_PORTFOLIO_INDEX)?,
        price_volatility_alert: row.text(risk::PRICE_VOLATILITY_ALERT)?.to_string(),
        shipment_timing_index: row.number(risk::SHIPMENT_TIMING_INDEX)?,
        growth_cycle_risk_index: row.number(risk::GROWTH_CYCLE_RISK_INDEX)?,
    })
}

/// Resolve the representative risk row for (region, item).
///
/// When several rows match (one per climate season), the first row in table
/// order supplies every non-season field; its values are not averaged or
/// otherwise combined with the others.
pub fn resolve_risk(
    table: &Table,
    region: &str,
    item: &str,
) -> Result<Option<ResolvedRisk>, ReportError> {
    let region_col = table.column_index(risk::REGION)?;
    let item_col = table.column_index(risk::ITEM)?;
    let matches: Vec<Row<'_>> = table
        .rows()
        .filter(|r| r.cell(region_col) == region && r.cell(item_col) == item)
        .collect();

    let Some(first) = matches.first() else {
        return Ok(None);
    };
    let record = risk_record(first)?;

    let mut seasons: Vec<String> = Vec::new();
    for row in &matches {
        let season = row.text(risk::CLIMATE_SEASON)?;
        if !season.is_empty() && !seasons.iter().any(|s| s == season) {
            seasons.push(season.to_string());
        }
    }

    // Season rows are expected to agree on everything but the season.
    let diverging = matches[1..]
        .iter()
        .filter_map(|row| risk_record(row).ok())
        .any(|other| {
            RiskRecord {
                climate_season: record.climate_season.clone(),
                ..other
            } != record
        });
    if diverging {
        debug!(region, item, rows = matches.len(), "season rows disagree; first row wins");
    }

    Ok(Some(ResolvedRisk {
        record,
        seasons,
        matched_rows: matches.len(),
    }))
}

/// Resolve the income row for `item`, regardless of region. First match wins.
pub fn resolve_income(table: &Table, item: &str) -> Result<Option<IncomeRecord>, ReportError> {
    let item_col = table.column_index(income::ITEM)?;
    let Some(row) = table.rows().find(|r| r.cell(item_col) == item) else {
        return Ok(None);
    };
    Ok(Some(IncomeRecord {
        item: row.text(income::ITEM)?.to_string(),
        conventional_receipt_rate: row.number(income::CONVENTIONAL_RECEIPT_RATE)?,
        direct_receipt_rate: row.number(income::DIRECT_RECEIPT_RATE)?,
        conventional_cost_rate: row.number(income::CONVENTIONAL_COST_RATE)?,
        direct_cost_rate: row.number(income::DIRECT_COST_RATE)?,
        income_recovery_index: row.number(income::INCOME_RECOVERY_INDEX)?,
    }))
}
