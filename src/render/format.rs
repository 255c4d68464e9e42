use chrono::NaiveDate;

use crate::engine::{Money, Period, UNTITLED_REPORT};

/// Currency text in `{symbol} #,##0.00` form, e.g. `R$ 1,234.56`
pub fn format_money(amount: Money, currency_symbol: &str) -> String {
    let cents = amount.to_cents();
    let text = format!("{:.2}", cents.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_thousands(whole);
    let sign = if cents.is_sign_negative() && !cents.is_zero() {
        "-"
    } else {
        ""
    };

    if currency_symbol.is_empty() {
        format!("{sign}{grouped}.{frac}")
    } else {
        format!("{sign}{currency_symbol} {grouped}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn format_period(period: Option<Period>) -> String {
    period.map(|p| p.to_string()).unwrap_or_default()
}

/// Make a report title usable as a file name on every platform
pub fn sanitize_file_stem(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        UNTITLED_REPORT.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn money(value: &str) -> Money {
        Money::new(Decimal::from_str(value).unwrap())
    }

    #[test]
    fn money_uses_grouping_and_two_decimals() {
        assert_eq!(format_money(money("1234567.891"), "R$"), "R$ 1,234,567.89");
        assert_eq!(format_money(money("0"), "R$"), "R$ 0.00");
        assert_eq!(format_money(money("999.5"), "$"), "$ 999.50");
        assert_eq!(format_money(money("-1500"), "R$"), "-R$ 1,500.00");
        assert_eq!(format_money(money("12.345"), ""), "12.35");
    }

    #[test]
    fn file_stems_lose_path_separators() {
        assert_eq!(sanitize_file_stem("Jardim A/B_18-10-2026"), "Jardim A_B_18-10-2026");
        assert_eq!(sanitize_file_stem("  "), "relatorio");
    }
}
