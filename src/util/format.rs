//! Display formatting shared by list and report views.
//!
//! Numbers follow `en-US` grouping with two fraction digits; amounts are in
//! Naira. Dates accept ISO dates, RFC 3339 timestamps and the backend's
//! `YYYY-MM-DD HH:MM:SS` columns; anything else is shown unchanged.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const CURRENCY_SYMBOL: &str = "₦";

/// Upper-case the first character. `None` and `""` give `""`.
pub fn capitalize(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `1234.5` -> `"1,234.50"`.
///
/// Rounds half away from zero on the shortest decimal form of `value`, so
/// `1.005` gives `"1.01"`. Negative values keep their sign even when they
/// round to zero; `-0.0` prints as `"0.00"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (int, frac) = two_decimals(value.abs());
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}.{frac}", group_thousands(&int))
}

/// `1234.5` -> `"₦1,234.50"`, `-3.0` -> `"-₦3.00"`.
pub fn format_currency(value: f64) -> String {
    let number = format_number(value);
    match number.strip_prefix('-') {
        Some(abs) => format!("-{CURRENCY_SYMBOL}{abs}"),
        None => format!("{CURRENCY_SYMBOL}{number}"),
    }
}

/// `"2024-01-05"` -> `"01/05/2024"`.
pub fn format_date(raw: &str) -> String {
    parse_date(raw).map_or_else(|| raw.to_owned(), |d| d.format("%m/%d/%Y").to_string())
}

/// `"2024-01-05"` -> `"January 5, 2024"`.
pub fn format_long_date(raw: &str) -> String {
    parse_date(raw).map_or_else(|| raw.to_owned(), |d| d.format("%B %-d, %Y").to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date())
}

fn two_decimals(abs: f64) -> (String, String) {
    let repr = abs.to_string();
    let (int, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut digits: Vec<u8> = int.bytes().chain(frac.bytes().chain(std::iter::repeat(b'0')).take(2)).collect();

    if frac.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let text: String = digits.into_iter().map(char::from).collect();
    let (int, frac) = text.split_at(text.len() - 2);
    (int.to_owned(), frac.to_owned())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
