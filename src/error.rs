use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Input table has no rows; there is no contract to report on")]
    EmptyInput,

    #[error("Amounts of contract '{contract}' exceed the supported range")]
    AmountOverflow { contract: String },

    #[error("Report totals exceed the supported range")]
    TotalsOverflow,

    #[error("Invalid --as-of value '{0}'. Use YYYY-MM-DD, DD/MM/YYYY or YYYY-MM-DDTHH:MM:SS")]
    InvalidAsOf(String),

    #[error("Invalid delimiter '{0}'. Expected a single ASCII character (e.g. ';')")]
    InvalidDelimiter(String),

    #[error("Invalid report format '{0}'. Use 'csv', 'xlsx' or 'json'")]
    InvalidFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Excel writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
