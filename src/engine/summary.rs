use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::engine::model::{ContractSummary, InstallmentRow};
use crate::engine::money::Money;
use crate::error::{ReportError, Result};

/// Partition rows by contract identifier, keeping first-seen order.
pub(crate) fn group_by_contract(rows: Vec<InstallmentRow>) -> Vec<Vec<InstallmentRow>> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<InstallmentRow>> = Vec::new();

    for row in rows {
        match positions.get(&row.contract_id) {
            Some(&idx) => groups[idx].push(row),
            None => {
                positions.insert(row.contract_id.clone(), groups.len());
                groups.push(vec![row]);
            }
        }
    }

    groups
}

fn total<F>(rows: &[InstallmentRow], field: F) -> Option<Money>
where
    F: Fn(&InstallmentRow) -> Option<Money>,
{
    Money::checked_sum(rows.iter().filter_map(field))
}

/// Due dates are compared at the start of their day.
fn due_moment(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// Scheduled amounts of unpaid rows whose due moment satisfies `keep`
fn unpaid_scheduled<F>(rows: &[InstallmentRow], keep: F) -> Option<Money>
where
    F: Fn(NaiveDateTime) -> bool,
{
    Money::checked_sum(
        rows.iter()
            .filter(|r| !r.is_paid())
            .filter(|r| r.due_date.is_some_and(|d| keep(due_moment(d))))
            .filter_map(|r| r.scheduled),
    )
}

/// Reduce one contract's rows into its consolidated record. `rows` is never
/// empty: groups are created from an existing row.
pub(crate) fn summarize(
    rows: &[InstallmentRow],
    reference: NaiveDateTime,
) -> Result<ContractSummary> {
    let first = &rows[0];
    let overflow = || ReportError::AmountOverflow {
        contract: first.contract_id.clone(),
    };

    Ok(ContractSummary {
        contract_id: first.contract_id.clone(),
        client_id: first.client_id.clone(),
        client_name: first.client_name.clone(),
        principal: total(rows, |r| r.principal).ok_or_else(overflow)?,
        adjustment: total(rows, |r| r.adjustment).ok_or_else(overflow)?,
        interest: total(rows, |r| r.interest).ok_or_else(overflow)?,
        penalty: total(rows, |r| r.penalty).ok_or_else(overflow)?,
        receivable: unpaid_scheduled(rows, |due| due > reference).ok_or_else(overflow)?,
        overdue: unpaid_scheduled(rows, |due| due < reference).ok_or_else(overflow)?,
        received: total(rows, |r| r.paid).ok_or_else(overflow)?,
        last_payment_period: rows
            .iter()
            .filter(|r| r.is_paid())
            .filter_map(|r| r.period)
            .max(),
        cancellation_date: first.cancellation_date,
        first_due_date: rows.iter().filter_map(|r| r.due_date).min(),
    })
}
