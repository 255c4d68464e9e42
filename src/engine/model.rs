use chrono::{NaiveDate, NaiveDateTime};

use crate::engine::coerce::CoercionWarning;
use crate::engine::money::{Money, Period};

/// One installment of a contract after coercion. Amounts are `None` when the
/// cell was blank, unparsable, or its column is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentRow {
    pub contract_id: String,
    pub client_id: String,
    pub client_name: String,
    pub loteamento: String,
    pub scheduled: Option<Money>,
    pub principal: Option<Money>,
    pub paid: Option<Money>,
    pub due_date: Option<NaiveDate>,
    pub period: Option<Period>,
    pub adjustment: Option<Money>,
    pub interest: Option<Money>,
    pub penalty: Option<Money>,
    pub cancellation_date: Option<NaiveDate>,
}

impl InstallmentRow {
    /// A payment is recorded whenever the paid cell holds a value, zero included.
    pub fn is_paid(&self) -> bool {
        self.paid.is_some()
    }
}

/// The consolidated record for one contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSummary {
    pub contract_id: String,
    pub client_id: String,
    pub client_name: String,
    pub principal: Money,
    pub adjustment: Money,
    pub interest: Money,
    pub penalty: Money,
    pub receivable: Money,
    pub overdue: Money,
    pub received: Money,
    pub last_payment_period: Option<Period>,
    pub cancellation_date: Option<NaiveDate>,
    pub first_due_date: Option<NaiveDate>,
}

/// Grand totals of the money fields across every contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub principal: Money,
    pub adjustment: Money,
    pub interest: Money,
    pub penalty: Money,
    pub receivable: Money,
    pub overdue: Money,
    pub received: Money,
}

impl Totals {
    /// Add one contract's figures; `None` on overflow.
    pub(crate) fn checked_add(self, c: &ContractSummary) -> Option<Totals> {
        Some(Totals {
            principal: self.principal.checked_add(c.principal)?,
            adjustment: self.adjustment.checked_add(c.adjustment)?,
            interest: self.interest.checked_add(c.interest)?,
            penalty: self.penalty.checked_add(c.penalty)?,
            receivable: self.receivable.checked_add(c.receivable)?,
            overdue: self.overdue.checked_add(c.overdue)?,
            received: self.received.checked_add(c.received)?,
        })
    }
}

/// Title used when the first contract carries no loteamento name
pub const UNTITLED_REPORT: &str = "relatorio";

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Loteamento name of the first contract seen in the input.
    pub title: String,
    pub reference: NaiveDateTime,
    pub contracts: Vec<ContractSummary>,
    pub totals: Totals,
    pub warnings: Vec<CoercionWarning>,
}

impl Aggregation {
    /// `{loteamento}_{DD-MM-YYYY}` using the reference date. A blank title
    /// becomes `relatorio`.
    pub fn file_stem(&self) -> String {
        let title = match self.title.trim() {
            "" => UNTITLED_REPORT,
            title => title,
        };
        format!("{}_{}", title, self.reference.format("%d-%m-%Y"))
    }
}
