//! Report renderer: turns an `Aggregation` into the consolidated sheet file.

mod format;
mod preview;
mod sheet;
mod workbook;

pub use format::{format_date, format_money, format_period, sanitize_file_stem};
pub use preview::preview_table;
pub use sheet::{write_csv, write_json, REPORT_HEADERS};
pub use workbook::{money_number_format, write_xlsx};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{OutputFormat, ReportSettings};
use crate::engine::Aggregation;
use crate::error::Result;

/// Render the report document fully in memory
pub fn render_bytes(aggregation: &Aggregation, settings: &ReportSettings) -> Result<Vec<u8>> {
    match settings.format {
        OutputFormat::Csv => write_csv(aggregation, &settings.currency_symbol),
        OutputFormat::Xlsx => write_xlsx(aggregation, &settings.currency_symbol),
        OutputFormat::Json => write_json(aggregation),
    }
}

/// `{loteamento}_{DD-MM-YYYY}.{ext}`, made safe for the file system
pub fn report_file_name(aggregation: &Aggregation, format: OutputFormat) -> String {
    format!(
        "{}.{}",
        sanitize_file_stem(&aggregation.file_stem()),
        format.extension()
    )
}

/// Write the report into `output_dir` (created if needed) and return its path.
/// Nothing is written unless the whole document rendered.
pub fn render_report(
    aggregation: &Aggregation,
    settings: &ReportSettings,
    output_dir: &Path,
) -> Result<PathBuf> {
    let bytes = render_bytes(aggregation, settings)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(aggregation, settings.format));
    fs::write(&path, bytes)?;

    tracing::debug!(path = %path.display(), "report written");
    Ok(path)
}
