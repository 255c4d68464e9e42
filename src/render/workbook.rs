use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::engine::{Aggregation, ContractSummary, Money};
use crate::error::Result;
use crate::render::format::{format_date, format_period};
use crate::render::sheet::REPORT_HEADERS;

const FONT_NAME: &str = "Arial";
const FONT_SIZE: f64 = 11.0;
const COLUMN_WIDTH: f64 = 20.0;

/// Excel number format for the money columns, e.g. `"R$" #,##0.00`
pub fn money_number_format(currency_symbol: &str) -> String {
    if currency_symbol.is_empty() {
        "#,##0.00".to_string()
    } else {
        format!("\"{}\" #,##0.00", currency_symbol.replace('"', ""))
    }
}

struct SheetFormats {
    header: Format,
    text: Format,
    money: Format,
}

impl SheetFormats {
    fn new(currency_symbol: &str) -> Self {
        let text = Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(FONT_SIZE)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        Self {
            header: text.clone().set_bold(),
            money: text.clone().set_num_format(money_number_format(currency_symbol)),
            text,
        }
    }
}

/// Render the consolidated sheet as an `.xlsx` workbook. Money columns hold
/// numbers rounded to cents with the currency number format; every cell is
/// centered in Arial 11.
pub fn write_xlsx(aggregation: &Aggregation, currency_symbol: &str) -> Result<Vec<u8>> {
    let formats = SheetFormats::new(currency_symbol);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        worksheet.write_string_with_format(0, col, *header, &formats.header)?;
    }

    for (idx, summary) in aggregation.contracts.iter().enumerate() {
        write_summary(worksheet, idx as u32 + 1, summary, &formats)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_summary(
    worksheet: &mut Worksheet,
    row: u32,
    summary: &ContractSummary,
    formats: &SheetFormats,
) -> Result<()> {
    let texts = [
        (0, summary.contract_id.clone()),
        (1, summary.client_id.clone()),
        (2, summary.client_name.clone()),
        (10, format_period(summary.last_payment_period)),
        (11, format_date(summary.cancellation_date)),
        (12, format_date(summary.first_due_date)),
    ];
    for (col, text) in texts {
        if text.is_empty() {
            worksheet.write_blank(row, col, &formats.text)?;
        } else {
            worksheet.write_string_with_format(row, col, text.as_str(), &formats.text)?;
        }
    }

    let amounts = [
        summary.principal,
        summary.adjustment,
        summary.interest,
        summary.penalty,
        summary.receivable,
        summary.overdue,
        summary.received,
    ];
    for (offset, amount) in amounts.into_iter().enumerate() {
        worksheet.write_number_with_format(
            row,
            3 + offset as u16,
            money_value(amount),
            &formats.money,
        )?;
    }

    Ok(())
}

fn money_value(amount: Money) -> f64 {
    // every Decimal has an f64 approximation
    amount.to_cents().to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_carries_the_currency_symbol() {
        assert_eq!(money_number_format("R$"), "\"R$\" #,##0.00");
        assert_eq!(money_number_format(""), "#,##0.00");
    }
}
