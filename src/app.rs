use crate::config::AppConfig;
use crate::error::{AppError, LoadError};
use crate::loader::{Table, TableCache};
use crate::reports::{build_report, undescribed_types, IncomeLookup};
use crate::resolver;
use crate::types::{IncomeRecord, Report};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session state: the configuration plus the tables parsed so far.
pub struct App {
    config: AppConfig,
    cache: TableCache,
    risk_rows: usize,
}

enum IncomeState {
    Disabled,
    Unavailable(String),
    Resolved(Option<IncomeRecord>),
}

impl IncomeState {
    fn as_lookup(&self) -> IncomeLookup<'_> {
        match self {
            IncomeState::Disabled => IncomeLookup::Disabled,
            IncomeState::Unavailable(reason) => IncomeLookup::Unavailable(reason),
            IncomeState::Resolved(None) => IncomeLookup::NotFound,
            IncomeState::Resolved(Some(rec)) => IncomeLookup::Found(rec),
        }
    }
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        App {
            config,
            cache: TableCache::new(),
            risk_rows: 0,
        }
    }

    /// Create the session and load the risk table up front. Without it no
    /// report can be shown, so a failure here ends the session.
    pub fn open(config: AppConfig) -> Result<Self, LoadError> {
        let mut app = App::new(config);
        let table = app.risk_table()?;
        if table.is_empty() {
            warn!("risk table has no data rows");
        }
        // Descriptions are maintained separately from the data; flag drift.
        if let Ok(types) = resolver::management_types(&table) {
            for t in undescribed_types(&types) {
                warn!(management_type = t, "no description for management type");
            }
        }
        app.risk_rows = table.len();
        info!(rows = app.risk_rows, "risk table ready");
        Ok(app)
    }

    pub fn risk_rows(&self) -> usize {
        self.risk_rows
    }

    fn risk_table(&mut self) -> Result<Arc<Table>, LoadError> {
        let path = self.config.risk_path();
        self.cache.get_or_load(&path)
    }

    pub fn regions(&mut self) -> Result<Vec<String>, AppError> {
        let table = self.risk_table()?;
        Ok(resolver::regions(&table)?)
    }

    pub fn items(&mut self, region: &str) -> Result<Vec<String>, AppError> {
        let table = self.risk_table()?;
        Ok(resolver::items(&table, region)?)
    }

    /// Resolve and build the report for one selection, from scratch.
    pub fn report(&mut self, region: &str, item: &str) -> Result<Report, AppError> {
        let table = self.risk_table()?;
        let risk = resolver::resolve_risk(&table, region, item)?;
        let income = match &risk {
            Some(resolved) => {
                debug!(region, item, matched = resolved.matched_rows, "risk row resolved");
                self.income_state(item)
            }
            None => {
                info!(region, item, "no risk data for selection");
                IncomeState::Disabled
            }
        };
        Ok(build_report(region, item, risk.as_ref(), income.as_lookup()))
    }

    fn income_state(&mut self, item: &str) -> IncomeState {
        let Some(path) = self.config.income_path() else {
            return IncomeState::Disabled;
        };
        let table = match self.cache.get_or_load(&path) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "income table unavailable");
                return IncomeState::Unavailable(e.to_string());
            }
        };
        match resolver::resolve_income(&table, item) {
            Ok(rec) => IncomeState::Resolved(rec),
            Err(e) => {
                warn!(error = %e, item, "income row unreadable");
                IncomeState::Unavailable(e.to_string())
            }
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &TableCache {
        &self.cache
    }
}
