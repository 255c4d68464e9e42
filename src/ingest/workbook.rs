use std::path::Path;
use std::str::FromStr;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{ReportError, Result};
use crate::ingest::{Cell, Table};

/// Spreadsheet extensions read through calamine
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Load the first worksheet of a workbook. Its first row is the header row.
/// Numeric cells become `Cell::Number` and date-formatted cells `Cell::Date`
/// (or `Cell::DateTime` when they carry a time of day).
pub fn read_workbook(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(ReportError::InputNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Table::default()),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|h| h.to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(workbook_cell));
    }

    tracing::debug!(path = %path.display(), rows = table.len(), "workbook loaded");
    Ok(table)
}

fn workbook_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(text) | Data::DateTimeIso(text) => Cell::from(text.as_str()),
        Data::Int(n) => Cell::Number(Decimal::from(*n)),
        Data::Float(f) => float_cell(*f),
        Data::DateTime(moment) => match moment.as_datetime() {
            Some(moment) => moment_cell(moment),
            None => Cell::Text(value.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

/// Floats go through their shortest decimal text so `0.1` stays `0.1`.
fn float_cell(f: f64) -> Cell {
    let text = f.to_string();
    match Decimal::from_str(&text) {
        Ok(number) => Cell::Number(number),
        Err(_) => Cell::Text(text),
    }
}

fn moment_cell(moment: NaiveDateTime) -> Cell {
    if moment.time() == NaiveTime::MIN {
        Cell::Date(moment.date())
    } else {
        Cell::DateTime(moment)
    }
}
