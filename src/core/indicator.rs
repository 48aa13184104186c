//! Indicator records and the source abstraction

use super::error::IndicatorError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Display;

/// Date layouts the backend has been seen to emit for `fecha`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    /// Unidad de Fomento
    UnitOfAccount,
    /// Dólar observado
    ObservedRate,
    /// A code outside the synonym table, kept verbatim. Empty when the item had none.
    Other(String),
}

impl IndicatorKind {
    /// Resolves a backend code against the synonym table, ignoring case.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "UF" => IndicatorKind::UnitOfAccount,
            "DOLAR" | "DÓLAR" | "USD" => IndicatorKind::ObservedRate,
            _ => IndicatorKind::Other(code.to_string()),
        }
    }

    /// Canonical backend code for the kind.
    pub fn code(&self) -> &str {
        match self {
            IndicatorKind::UnitOfAccount => "UF",
            IndicatorKind::ObservedRate => "DOLAR",
            IndicatorKind::Other(code) => code,
        }
    }
}

impl Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    pub kind: IndicatorKind,
    /// Date text exactly as the backend sent it.
    pub effective_date: String,
    pub amount: Option<f64>,
    pub document_url: Option<String>,
}

impl IndicatorRecord {
    pub fn new(kind: IndicatorKind, effective_date: &str, amount: Option<f64>) -> Self {
        IndicatorRecord {
            kind,
            effective_date: effective_date.to_string(),
            amount,
            document_url: None,
        }
    }

    pub fn with_document(mut self, url: &str) -> Self {
        self.document_url = Some(url.to_string());
        self
    }

    /// Calendar date of the record, if the source text is a recognizable date.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.effective_date)
    }
}

/// Parses the date part of `value`, accepting plain dates, naive date-times and RFC 3339.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// A backend that publishes indicator records and can be asked to create today's UF.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn fetch_indicators(&self) -> Result<Vec<IndicatorRecord>, IndicatorError>;

    /// Asks the backend to generate today's value. The echoed payload is not interpreted.
    async fn trigger_generation(&self) -> Result<serde_json::Value, IndicatorError>;
}
