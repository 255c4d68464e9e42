//! Cell coercion policy.
//!
//! Blank cells are null. A non-blank cell that cannot be read as the expected
//! kind is also treated as null, and the caller records a `CoercionWarning`
//! for it instead of failing the run.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::engine::money::{Money, Period};
use crate::ingest::Cell;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Marker for a non-blank cell that does not hold the expected kind of value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unparsable;

pub type Coerced<T> = std::result::Result<Option<T>, Unparsable>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Amount,
    Date,
    Period,
    Identifier,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Amount => "amount",
            ValueKind::Date => "date",
            ValueKind::Period => "period (MM/YYYY)",
            ValueKind::Identifier => "contract identifier",
        };
        f.write_str(label)
    }
}

/// A cell that was coerced to null. `line` is the 1-based line in the
/// source, counting the header as line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionWarning {
    pub line: usize,
    pub column: String,
    pub value: String,
    pub expected: ValueKind,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected == ValueKind::Identifier {
            return write!(
                f,
                "line {}: blank {} in column '{}', row skipped",
                self.line, self.expected, self.column
            );
        }
        write!(
            f,
            "line {}: '{}' in column '{}' is not a valid {}, treated as empty",
            self.line, self.value, self.column, self.expected
        )
    }
}

/// Read a monetary amount. Accepts `1234.56`, `1.234,56`, `1,234.56`,
/// `R$ 1.234,56`, `-10`, `(10,00)`.
pub fn parse_amount(cell: &Cell) -> Coerced<Money> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(value) => Ok(Some(Money::new(*value))),
        Cell::Text(text) if text.trim().is_empty() => Ok(None),
        Cell::Text(text) => parse_amount_text(text).map(Some).ok_or(Unparsable),
        Cell::Date(_) | Cell::DateTime(_) => Err(Unparsable),
    }
}

fn parse_amount_text(raw: &str) -> Option<Money> {
    let mut body: String = raw
        .replace("R$", "")
        .replace('$', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut negative = false;
    if body.starts_with('(') && body.ends_with(')') {
        negative = true;
        body = body[1..body.len() - 1].to_string();
    }
    if let Some(rest) = body.strip_prefix('-') {
        negative = !negative;
        body = rest.to_string();
    }

    let normalized = match (body.rfind('.'), body.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => body.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => body.replace(',', ""),
        (None, Some(_)) if body.matches(',').count() == 1 => body.replace(',', "."),
        (None, Some(_)) => body.replace(',', ""),
        (Some(_), None) if body.matches('.').count() > 1 => body.replace('.', ""),
        _ => body,
    };

    if normalized.is_empty() || !normalized.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value = Decimal::from_str(&normalized).ok()?;
    Some(Money::new(if negative { -value } else { value }))
}

/// Read a calendar date; any time of day is discarded.
pub fn parse_date(cell: &Cell) -> Coerced<NaiveDate> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Date(date) => Ok(Some(*date)),
        Cell::DateTime(moment) => Ok(Some(moment.date())),
        Cell::Text(text) if text.trim().is_empty() => Ok(None),
        Cell::Text(text) => parse_date_text(text.trim()).map(Some).ok_or(Unparsable),
        Cell::Number(_) => Err(Unparsable),
    }
}

pub(crate) fn parse_date_text(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|moment| moment.date())
        })
}

/// Read a month/year period reference.
pub fn parse_period(cell: &Cell) -> Coerced<Period> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Date(date) => Ok(Some(Period::from_date(*date))),
        Cell::DateTime(moment) => Ok(Some(Period::from_date(moment.date()))),
        Cell::Text(text) if text.trim().is_empty() => Ok(None),
        Cell::Text(text) => {
            let text = text.trim();
            parse_period_text(text)
                .or_else(|| parse_date_text(text).map(Period::from_date))
                .map(Some)
                .ok_or(Unparsable)
        }
        Cell::Number(_) => Err(Unparsable),
    }
}

fn parse_period_text(text: &str) -> Option<Period> {
    let mut parts = text.split(['/', '-']);
    let (first, second) = (parts.next()?.trim(), parts.next()?.trim());
    if parts.next().is_some() {
        return None;
    }
    let (month, year) = match (first.len(), second.len()) {
        (4, 1..=2) => (second, first),
        (1..=2, 4) => (first, second),
        _ => return None,
    };
    Period::new(year.parse().ok()?, month.parse().ok()?)
}

/// Render any cell as identifier/name text.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(text) => text.trim().to_string(),
        Cell::Number(value) => value.normalize().to_string(),
        Cell::Date(date) => date.format("%d/%m/%Y").to_string(),
        Cell::DateTime(moment) => moment.format("%d/%m/%Y %H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn amount(text: &str) -> Coerced<Money> {
        parse_amount(&Cell::from(text))
    }

    fn money(value: &str) -> Money {
        Money::new(Decimal::from_str(value).unwrap())
    }

    #[test]
    fn amounts_accept_both_separator_conventions() {
        assert_eq!(amount("1234.56"), Ok(Some(money("1234.56"))));
        assert_eq!(amount("1.234,56"), Ok(Some(money("1234.56"))));
        assert_eq!(amount("1,234.56"), Ok(Some(money("1234.56"))));
        assert_eq!(amount("R$ 1.234,56"), Ok(Some(money("1234.56"))));
        assert_eq!(amount("150,5"), Ok(Some(money("150.5"))));
        assert_eq!(amount("1.234.567"), Ok(Some(money("1234567"))));
    }

    #[test]
    fn amounts_accept_negative_forms() {
        assert_eq!(amount("-10,00"), Ok(Some(money("-10"))));
        assert_eq!(amount("(10,00)"), Ok(Some(money("-10"))));
        assert_eq!(amount("-R$ 3,50"), Ok(Some(money("-3.5"))));
    }

    #[test]
    fn blank_amount_is_null_and_garbage_is_unparsable() {
        assert_eq!(amount(""), Ok(None));
        assert_eq!(amount("   "), Ok(None));
        assert_eq!(amount("abc"), Err(Unparsable));
        assert_eq!(amount("12a"), Err(Unparsable));
        assert_eq!(
            parse_amount(&Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
            Err(Unparsable)
        );
    }

    #[test]
    fn dates_accept_iso_and_brazilian_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        for text in [
            "2024-03-15",
            "15/03/2024",
            "15-03-2024",
            "2024/03/15",
            "2024-03-15 00:00:00",
            "2024-03-15T10:30:00",
            "15/03/2024 08:00",
        ] {
            assert_eq!(parse_date(&Cell::from(text)), Ok(expected), "{text}");
        }
        assert_eq!(parse_date(&Cell::from("31/02/2024")), Err(Unparsable));
        assert_eq!(parse_date(&Cell::Empty), Ok(None));
    }

    #[test]
    fn periods_compare_chronologically() {
        let early = parse_period(&Cell::from("12/2023")).unwrap().unwrap();
        let late = parse_period(&Cell::from("01/2024")).unwrap().unwrap();
        assert!(late > early);
        assert_eq!(late.to_string(), "01/2024");
    }

    #[test]
    fn periods_accept_several_layouts() {
        let expected = Period::new(2024, 5);
        for text in ["05/2024", "5/2024", "05-2024", "2024-05", "2024/05", "2024-05-10"] {
            assert_eq!(parse_period(&Cell::from(text)), Ok(expected), "{text}");
        }
        assert_eq!(parse_period(&Cell::from("13/2024")), Err(Unparsable));
        assert_eq!(parse_period(&Cell::from("maio")), Err(Unparsable));
    }

    #[test]
    fn numeric_identifiers_drop_trailing_zeros() {
        assert_eq!(cell_text(&Cell::Number(Decimal::from_str("123.0").unwrap())), "123");
        assert_eq!(cell_text(&Cell::from("  ABC-1 ")), "ABC-1");
    }
}
