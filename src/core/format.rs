//! Display formatting for indicator values

use super::indicator::{IndicatorKind, parse_date};

/// Shown wherever a value is missing or unusable.
pub const PLACEHOLDER: &str = "-";

const CURRENCY_SYMBOL: &str = "$";
const THOUSANDS_SEPARATOR: char = '.';

/// Formats an amount as Chilean pesos without decimals, e.g. `$36.512`.
///
/// Missing, `NaN` and infinite values render as [`PLACEHOLDER`].
pub fn format_amount(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let digits = format!("{:.0}", value.abs());
    let grouped = group_thousands(&digits);
    let negative = value.is_sign_negative() && digits.chars().any(|c| c != '0');

    if negative {
        format!("-{CURRENCY_SYMBOL}{grouped}")
    } else {
        format!("{CURRENCY_SYMBOL}{grouped}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Formats a date as `DD/MM/YYYY`.
///
/// Empty input renders as [`PLACEHOLDER`]; text that is not a date is returned unchanged.
pub fn format_date(value: &str) -> String {
    if value.trim().is_empty() {
        return PLACEHOLDER.to_string();
    }
    match parse_date(value) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => value.to_string(),
    }
}

/// Human readable name for a backend code, falling back to the code itself.
pub fn label_for(code: &str) -> String {
    if code.trim().is_empty() {
        return PLACEHOLDER.to_string();
    }
    IndicatorKind::from_code(code).label()
}

impl IndicatorKind {
    pub fn label(&self) -> String {
        match self {
            IndicatorKind::UnitOfAccount => "Unidad de Fomento".to_string(),
            IndicatorKind::ObservedRate => "Dólar Observado".to_string(),
            IndicatorKind::Other(code) if code.trim().is_empty() => PLACEHOLDER.to_string(),
            IndicatorKind::Other(code) => code.clone(),
        }
    }
}
