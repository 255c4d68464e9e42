use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::ingest::Table;

/// Input header names for each installment attribute
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMap {
    pub contract_id: String,
    pub client_id: String,
    pub client_name: String,
    pub loteamento: String,
    pub scheduled_amount: String,
    pub principal: String,
    pub paid_amount: String,
    pub due_date: String,
    pub period: String,
    pub adjustment: String,
    pub interest: String,
    pub penalty: String,
    pub cancellation_date: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            contract_id: "CódigoContrato".to_string(),
            client_id: "CódigoCliente".to_string(),
            client_name: "NomeCliente".to_string(),
            loteamento: "NomeLoteamento".to_string(),
            scheduled_amount: "Valor Total".to_string(),
            principal: "Valor Parcela Inicial".to_string(),
            paid_amount: "Valor Pagamento".to_string(),
            due_date: "DataVencimento".to_string(),
            period: "MesAnoRef".to_string(),
            adjustment: "Valor Reajuste".to_string(),
            interest: "Valor Juros".to_string(),
            penalty: "Valor Multa".to_string(),
            cancellation_date: "Data Cancelamento".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEntry<'a> {
    pub attribute: &'static str,
    pub header: &'a str,
    pub required: bool,
}

impl ColumnMap {
    /// Every mapped attribute, required ones first
    pub fn entries(&self) -> Vec<ColumnEntry<'_>> {
        let required = [
            ("contract id", &self.contract_id),
            ("client id", &self.client_id),
            ("client name", &self.client_name),
            ("loteamento", &self.loteamento),
            ("scheduled amount", &self.scheduled_amount),
            ("paid amount", &self.paid_amount),
            ("due date", &self.due_date),
            ("period reference", &self.period),
        ];
        let optional = [
            ("initial principal", &self.principal),
            ("adjustment", &self.adjustment),
            ("interest", &self.interest),
            ("penalty", &self.penalty),
            ("cancellation date", &self.cancellation_date),
        ];

        required
            .into_iter()
            .map(|(attribute, header)| (attribute, header, true))
            .chain(
                optional
                    .into_iter()
                    .map(|(attribute, header)| (attribute, header, false)),
            )
            .map(|(attribute, header, required)| ColumnEntry {
                attribute,
                header: header.as_str(),
                required,
            })
            .collect()
    }

    /// Locate every mapped column in `table`. All missing required headers
    /// are reported together.
    pub(crate) fn resolve(&self, table: &Table) -> Result<ResolvedColumns> {
        let mut missing = Vec::new();
        let mut require = |header: &str| match table.column_index(header) {
            Some(index) => Column::new(index, header),
            None => {
                missing.push(header.to_string());
                Column::new(0, header)
            }
        };

        let contract_id = require(&self.contract_id);
        let client_id = require(&self.client_id);
        let client_name = require(&self.client_name);
        let loteamento = require(&self.loteamento);
        let scheduled_amount = require(&self.scheduled_amount);
        let paid_amount = require(&self.paid_amount);
        let due_date = require(&self.due_date);
        let period = require(&self.period);

        if !missing.is_empty() {
            return Err(ReportError::Schema { missing });
        }

        let optional =
            |header: &str| table.column_index(header).map(|index| Column::new(index, header));

        Ok(ResolvedColumns {
            contract_id,
            client_id,
            client_name,
            loteamento,
            scheduled_amount,
            paid_amount,
            due_date,
            period,
            principal: optional(&self.principal),
            adjustment: optional(&self.adjustment),
            interest: optional(&self.interest),
            penalty: optional(&self.penalty),
            cancellation_date: optional(&self.cancellation_date),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub index: usize,
    pub header: String,
}

impl Column {
    fn new(index: usize, header: &str) -> Self {
        Self {
            index,
            header: header.to_string(),
        }
    }
}

/// Column positions validated against one input table
#[derive(Debug, Clone)]
pub(crate) struct ResolvedColumns {
    pub contract_id: Column,
    pub client_id: Column,
    pub client_name: Column,
    pub loteamento: Column,
    pub scheduled_amount: Column,
    pub paid_amount: Column,
    pub due_date: Column,
    pub period: Column,
    pub principal: Option<Column>,
    pub adjustment: Option<Column>,
    pub interest: Option<Column>,
    pub penalty: Option<Column>,
    pub cancellation_date: Option<Column>,
}
