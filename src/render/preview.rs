use tabled::{settings::Style, Table, Tabled};

use crate::engine::{Aggregation, Money};
use crate::render::format::{format_date, format_money, format_period};

#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "CONTRACT")]
    contract: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "PRINCIPAL")]
    principal: String,
    #[tabled(rename = "RECEIVABLE")]
    receivable: String,
    #[tabled(rename = "OVERDUE")]
    overdue: String,
    #[tabled(rename = "RECEIVED")]
    received: String,
    #[tabled(rename = "LAST PAID")]
    last_paid: String,
    #[tabled(rename = "FIRST DUE")]
    first_due: String,
    #[tabled(rename = "CANCELLED")]
    cancelled: String,
}

/// Terminal table of the consolidated rows with a closing TOTAL row
pub fn preview_table(aggregation: &Aggregation, currency_symbol: &str) -> String {
    let money = |amount: Money| format_money(amount, currency_symbol);

    let mut rows: Vec<PreviewRow> = aggregation
        .contracts
        .iter()
        .map(|c| PreviewRow {
            contract: c.contract_id.clone(),
            client: format!("{} - {}", c.client_id, c.client_name),
            principal: money(c.principal),
            receivable: money(c.receivable),
            overdue: money(c.overdue),
            received: money(c.received),
            last_paid: format_period(c.last_payment_period),
            first_due: format_date(c.first_due_date),
            cancelled: format_date(c.cancellation_date),
        })
        .collect();

    let totals = aggregation.totals;
    rows.push(PreviewRow {
        contract: "TOTAL".to_string(),
        client: format!("{} contract(s)", aggregation.contracts.len()),
        principal: money(totals.principal),
        receivable: money(totals.receivable),
        overdue: money(totals.overdue),
        received: money(totals.received),
        last_paid: String::new(),
        first_due: String::new(),
        cancelled: String::new(),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}
