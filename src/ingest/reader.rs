use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::InputSettings;
use crate::error::{ReportError, Result};
use crate::ingest::workbook::{is_workbook, read_workbook};
use crate::ingest::{Cell, Table};

/// Load an export from disk, as a workbook when the extension names one and
/// as delimited text otherwise.
pub fn read_input(path: &Path, settings: &InputSettings) -> Result<Table> {
    if is_workbook(path) {
        read_workbook(path)
    } else {
        read_csv(path, settings)
    }
}

/// Load a CSV export from disk into a `Table`
pub fn read_csv(path: &Path, settings: &InputSettings) -> Result<Table> {
    if !path.exists() {
        return Err(ReportError::InputNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    read_table(file, settings)
}

/// Parse CSV content from any reader. The first record is the header row.
pub fn read_table<R: Read>(reader: R, settings: &InputSettings) -> Result<Table> {
    let delimiter = settings.delimiter_byte()?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        // a malformed record aborts the load; a partial table would misreport totals
        let record = record?;
        table.push_row(record.iter().map(Cell::from));
    }

    Ok(table)
}
