use thiserror::Error;

/// Failures while turning a file on disk into a `Table`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("'{file}' was not found. Make sure it is in the same folder as the program ({location}).")]
    FileNotFound { file: String, location: String },

    #[error("Unsupported file format: '{0}' (only .csv, .xlsx and .xls are supported)")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel parse error: {0}")]
    Excel(String),

    #[error("Workbook '{0}' has no worksheet with a header row")]
    EmptyWorkbook(String),
}

/// Failures while reading typed values out of a loaded `Table`.
///
/// Tables are not validated when loaded, so a wrong header only shows up
/// here, the first time a resolver asks for the column.
#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid number in column '{column}': '{value}'")]
    InvalidNumber { column: String, value: String },
}

/// Anything that can stop one report from being produced.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
