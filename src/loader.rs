use crate::error::{LoadError, ReportError};
use crate::util::parse_f64_safe;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A rectangular table of string cells with named columns.
///
/// Nothing about the columns is checked on load; resolvers ask for the
/// columns they need and get a `ReportError::MissingColumn` if absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, ReportError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell at a column position; short rows read as empty cells.
    pub fn cell(&self, idx: usize) -> &'a str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn text(&self, column: &str) -> Result<&'a str, ReportError> {
        Ok(self.cell(self.table.column_index(column)?))
    }

    pub fn number(&self, column: &str) -> Result<f64, ReportError> {
        let raw = self.text(column)?;
        parse_f64_safe(Some(raw)).ok_or_else(|| ReportError::InvalidNumber {
            column: column.to_string(),
            value: raw.to_string(),
        })
    }
}

/// Read a `.csv`, `.xlsx` or `.xls` file into a `Table`, picking the parser
/// from the file extension.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(not_found(path));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xls" => load_excel(path),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }
}

fn not_found(path: &Path) -> LoadError {
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let location = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.display().to_string(),
        _ => ".".to_string(),
    };
    LoadError::FileNotFound { file, location }
}

fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    // pandas exports often carry a UTF-8 BOM in front of the first header.
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }
    debug!(path = %path.display(), rows = rows.len(), "parsed csv");
    Ok(Table::new(headers, rows))
}

fn load_excel(path: &Path) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Excel(e.to_string()))?;
    let shown = path.display().to_string();

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::EmptyWorkbook(shown.clone()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Excel(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| LoadError::EmptyWorkbook(shown.clone()))?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for data_row in sheet_rows {
        let cells: Vec<String> = data_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }
    debug!(path = %shown, sheet = %sheet_name, rows = rows.len(), "parsed workbook");
    Ok(Table::new(headers, rows))
}

/// Parsed tables keyed by path. Populated on first access and never
/// invalidated; failed loads are not remembered.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, Arc<Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Table>, LoadError> {
        if let Some(table) = self.entries.get(path) {
            debug!(path = %path.display(), "table cache hit");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load(path)?);
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers().len(),
            "table loaded"
        );
        self.entries.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
