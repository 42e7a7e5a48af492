use crate::schema::files;
use std::path::PathBuf;

/// Where the input tables live. Both files are expected next to the
/// process's working directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_dir: PathBuf,
    pub risk_table: String,
    /// `None` disables the distribution analysis section entirely.
    pub income_table: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        AppConfig::in_dir(base_dir)
    }
}

impl AppConfig {
    pub fn in_dir(base_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            base_dir: base_dir.into(),
            risk_table: files::RISK_TABLE.to_string(),
            income_table: Some(files::INCOME_TABLE.to_string()),
        }
    }

    pub fn risk_path(&self) -> PathBuf {
        self.base_dir.join(&self.risk_table)
    }

    pub fn income_path(&self) -> Option<PathBuf> {
        self.income_table.as_ref().map(|name| self.base_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn paths_are_joined_onto_base_dir() {
        let cfg = AppConfig::in_dir("/data/farm");
        assert_eq!(cfg.risk_path(), Path::new("/data/farm").join(files::RISK_TABLE));
        assert_eq!(
            cfg.income_path(),
            Some(Path::new("/data/farm").join(files::INCOME_TABLE))
        );
    }

    #[test]
    fn income_table_can_be_disabled() {
        let mut cfg = AppConfig::in_dir(".");
        cfg.income_table = None;
        assert!(cfg.income_path().is_none());
    }
}
