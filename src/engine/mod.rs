//! Aggregation engine: one consolidated record per sale contract.
//!
//! The engine is a pure function of the input table and a reference moment.
//! It performs no I/O; coercion problems are returned as warnings on the
//! `Aggregation` for the caller to log.

mod coerce;
mod columns;
mod model;
mod money;
mod summary;

pub use coerce::{
    cell_text, parse_amount, parse_date, parse_period, CoercionWarning, Coerced, Unparsable,
    ValueKind,
};
pub use columns::{ColumnEntry, ColumnMap};
pub use model::{Aggregation, ContractSummary, InstallmentRow, Totals, UNTITLED_REPORT};
pub use money::{Money, Period};

use chrono::{Local, NaiveDateTime};

use crate::error::{ReportError, Result};
use crate::ingest::{Cell, Table};
use columns::{Column, ResolvedColumns};
use summary::{group_by_contract, summarize};

static EMPTY_CELL: Cell = Cell::Empty;

/// Consolidate `table` as of `reference`.
///
/// Fails with `EmptyInput` when there is no row to report on, with
/// `Schema` when required columns are absent and with `AmountOverflow` when
/// a sum leaves the representable range.
pub fn aggregate(
    table: &Table,
    columns: &ColumnMap,
    reference: NaiveDateTime,
) -> Result<Aggregation> {
    if table.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    let resolved = columns.resolve(table)?;

    let mut warnings = Vec::new();
    let rows: Vec<InstallmentRow> = table
        .rows()
        .enumerate()
        .filter_map(|(idx, cells)| read_row(idx + 2, cells, &resolved, &mut warnings))
        .collect();

    let groups = group_by_contract(rows);
    let title = match groups.first() {
        Some(group) => group[0].loteamento.clone(),
        // every row lacked a contract identifier
        None => return Err(ReportError::EmptyInput),
    };

    let contracts = groups
        .iter()
        .map(|group| summarize(group, reference))
        .collect::<Result<Vec<_>>>()?;
    let totals = contracts
        .iter()
        .try_fold(Totals::default(), Totals::checked_add)
        .ok_or(ReportError::TotalsOverflow)?;

    Ok(Aggregation {
        title,
        reference,
        contracts,
        totals,
        warnings,
    })
}

/// `aggregate` against the local wall clock
pub fn aggregate_now(table: &Table, columns: &ColumnMap) -> Result<Aggregation> {
    aggregate(table, columns, Local::now().naive_local())
}

fn cell<'a>(cells: &'a [Cell], column: &Column) -> &'a Cell {
    cells.get(column.index).unwrap_or(&EMPTY_CELL)
}

fn coerce_into<T>(
    line: usize,
    cells: &[Cell],
    column: Option<&Column>,
    expected: ValueKind,
    parse: fn(&Cell) -> Coerced<T>,
    warnings: &mut Vec<CoercionWarning>,
) -> Option<T> {
    let column = column?;
    let value = cell(cells, column);
    match parse(value) {
        Ok(parsed) => parsed,
        Err(Unparsable) => {
            warnings.push(CoercionWarning {
                line,
                column: column.header.clone(),
                value: cell_text(value),
                expected,
            });
            None
        }
    }
}

fn read_row(
    line: usize,
    cells: &[Cell],
    columns: &ResolvedColumns,
    warnings: &mut Vec<CoercionWarning>,
) -> Option<InstallmentRow> {
    let contract_id = cell_text(cell(cells, &columns.contract_id));
    if contract_id.is_empty() {
        warnings.push(CoercionWarning {
            line,
            column: columns.contract_id.header.clone(),
            value: contract_id,
            expected: ValueKind::Identifier,
        });
        return None;
    }

    let mut amount = |column: Option<&Column>| {
        coerce_into(line, cells, column, ValueKind::Amount, parse_amount, warnings)
    };
    let scheduled = amount(Some(&columns.scheduled_amount));
    let principal = amount(columns.principal.as_ref());
    let paid = amount(Some(&columns.paid_amount));
    let adjustment = amount(columns.adjustment.as_ref());
    let interest = amount(columns.interest.as_ref());
    let penalty = amount(columns.penalty.as_ref());

    let due_date = coerce_into(
        line,
        cells,
        Some(&columns.due_date),
        ValueKind::Date,
        parse_date,
        warnings,
    );
    let cancellation_date = coerce_into(
        line,
        cells,
        columns.cancellation_date.as_ref(),
        ValueKind::Date,
        parse_date,
        warnings,
    );
    let period = coerce_into(
        line,
        cells,
        Some(&columns.period),
        ValueKind::Period,
        parse_period,
        warnings,
    );

    Some(InstallmentRow {
        contract_id,
        client_id: cell_text(cell(cells, &columns.client_id)),
        client_name: cell_text(cell(cells, &columns.client_name)),
        loteamento: cell_text(cell(cells, &columns.loteamento)),
        scheduled,
        principal,
        paid,
        due_date,
        period,
        adjustment,
        interest,
        penalty,
        cancellation_date,
    })
}
