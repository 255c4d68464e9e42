use serde::{Serialize, Serializer};

use crate::engine::{Aggregation, ContractSummary, Money, Totals};
use crate::error::{ReportError, Result};
use crate::render::format::{format_date, format_money, format_period};

/// Column headers of the consolidated sheet, in output order
pub const REPORT_HEADERS: [&str; 13] = [
    "CódigoContrato",
    "CódigoCliente",
    "NomeCliente",
    "Valor Total Principal",
    "Valor Reajuste",
    "Valor Juros",
    "Valor Multa",
    "Valor a Receber",
    "Valor Atrasado",
    "Recebido",
    "Ultima Data de Pagamento",
    "Data de Cancelamento",
    "Primeiro Vencimento",
];

#[derive(Debug, Serialize)]
struct SheetRowEntity {
    #[serde(rename = "CódigoContrato")]
    contract_id: String,
    #[serde(rename = "CódigoCliente")]
    client_id: String,
    #[serde(rename = "NomeCliente")]
    client_name: String,
    #[serde(rename = "Valor Total Principal")]
    principal: String,
    #[serde(rename = "Valor Reajuste")]
    adjustment: String,
    #[serde(rename = "Valor Juros")]
    interest: String,
    #[serde(rename = "Valor Multa")]
    penalty: String,
    #[serde(rename = "Valor a Receber")]
    receivable: String,
    #[serde(rename = "Valor Atrasado")]
    overdue: String,
    #[serde(rename = "Recebido")]
    received: String,
    #[serde(rename = "Ultima Data de Pagamento")]
    last_payment_period: String,
    #[serde(rename = "Data de Cancelamento")]
    cancellation_date: String,
    #[serde(rename = "Primeiro Vencimento")]
    first_due_date: String,
}

impl SheetRowEntity {
    fn from_summary(summary: &ContractSummary, currency_symbol: &str) -> Self {
        let money = |amount: Money| format_money(amount, currency_symbol);
        Self {
            contract_id: summary.contract_id.clone(),
            client_id: summary.client_id.clone(),
            client_name: summary.client_name.clone(),
            principal: money(summary.principal),
            adjustment: money(summary.adjustment),
            interest: money(summary.interest),
            penalty: money(summary.penalty),
            receivable: money(summary.receivable),
            overdue: money(summary.overdue),
            received: money(summary.received),
            last_payment_period: format_period(summary.last_payment_period),
            cancellation_date: format_date(summary.cancellation_date),
            first_due_date: format_date(summary.first_due_date),
        }
    }
}

/// Render the consolidated sheet as CSV
pub fn write_csv(aggregation: &Aggregation, currency_symbol: &str) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for summary in &aggregation.contracts {
        wtr.serialize(SheetRowEntity::from_summary(summary, currency_symbol))?;
    }

    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| ReportError::from(std::io::Error::other(e.to_string())))
}

fn fixed_cents<S: Serializer>(amount: &Money, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{:.2}", amount.to_cents()))
}

#[derive(Debug, Serialize)]
struct JsonContractEntity<'a> {
    contract_id: &'a str,
    client_id: &'a str,
    client_name: &'a str,
    #[serde(serialize_with = "fixed_cents")]
    principal: Money,
    #[serde(serialize_with = "fixed_cents")]
    adjustment: Money,
    #[serde(serialize_with = "fixed_cents")]
    interest: Money,
    #[serde(serialize_with = "fixed_cents")]
    penalty: Money,
    #[serde(serialize_with = "fixed_cents")]
    receivable: Money,
    #[serde(serialize_with = "fixed_cents")]
    overdue: Money,
    #[serde(serialize_with = "fixed_cents")]
    received: Money,
    last_payment_period: Option<String>,
    cancellation_date: Option<String>,
    first_due_date: Option<String>,
}

impl<'a> JsonContractEntity<'a> {
    fn from_summary(summary: &'a ContractSummary) -> Self {
        Self {
            contract_id: &summary.contract_id,
            client_id: &summary.client_id,
            client_name: &summary.client_name,
            principal: summary.principal,
            adjustment: summary.adjustment,
            interest: summary.interest,
            penalty: summary.penalty,
            receivable: summary.receivable,
            overdue: summary.overdue,
            received: summary.received,
            last_payment_period: summary.last_payment_period.map(|p| p.to_string()),
            cancellation_date: summary
                .cancellation_date
                .map(|d| d.format("%d/%m/%Y").to_string()),
            first_due_date: summary
                .first_due_date
                .map(|d| d.format("%d/%m/%Y").to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonTotalsEntity {
    #[serde(serialize_with = "fixed_cents")]
    principal: Money,
    #[serde(serialize_with = "fixed_cents")]
    adjustment: Money,
    #[serde(serialize_with = "fixed_cents")]
    interest: Money,
    #[serde(serialize_with = "fixed_cents")]
    penalty: Money,
    #[serde(serialize_with = "fixed_cents")]
    receivable: Money,
    #[serde(serialize_with = "fixed_cents")]
    overdue: Money,
    #[serde(serialize_with = "fixed_cents")]
    received: Money,
}

impl From<Totals> for JsonTotalsEntity {
    fn from(totals: Totals) -> Self {
        Self {
            principal: totals.principal,
            adjustment: totals.adjustment,
            interest: totals.interest,
            penalty: totals.penalty,
            receivable: totals.receivable,
            overdue: totals.overdue,
            received: totals.received,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReportEntity<'a> {
    title: &'a str,
    reference_date: String,
    contracts: Vec<JsonContractEntity<'a>>,
    totals: JsonTotalsEntity,
}

/// Render the consolidated sheet as a JSON document
pub fn write_json(aggregation: &Aggregation) -> Result<Vec<u8>> {
    let report = JsonReportEntity {
        title: &aggregation.title,
        reference_date: aggregation.reference.format("%d/%m/%Y").to_string(),
        contracts: aggregation
            .contracts
            .iter()
            .map(JsonContractEntity::from_summary)
            .collect(),
        totals: aggregation.totals.into(),
    };
    let mut bytes = serde_json::to_vec_pretty(&report)?;
    bytes.push(b'\n');
    Ok(bytes)
}
