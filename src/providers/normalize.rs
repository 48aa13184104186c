//! Decoding of the `/indicadores` payload.
//!
//! The backend has answered in several layouts over time. Each body is
//! classified into exactly one [`ResponseShape`], tried in a fixed order:
//!
//! 1. an object with per-family arrays (`uf`, `dolar`), unless they are all
//!    empty and an `Items` array is present
//! 2. an object with a generic `Items` array
//! 3. a bare array
//!
//! Anything else is [`ResponseShape::Unrecognized`] and yields no records.

use crate::core::error::IndicatorError;
use crate::core::indicator::{IndicatorKind, IndicatorRecord};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const UNIT_OF_ACCOUNT_FIELD: &str = "uf";
const OBSERVED_RATE_FIELD: &str = "dolar";
const ITEMS_FIELD: &str = "Items";

#[derive(Debug, PartialEq)]
pub enum ResponseShape {
    Families {
        unit_of_account: Vec<Value>,
        observed_rate: Vec<Value>,
    },
    Items(Vec<Value>),
    Bare(Vec<Value>),
    Unrecognized,
}

impl ResponseShape {
    pub fn classify(body: Value) -> Self {
        match body {
            Value::Object(mut map) => {
                let unit_of_account = take_array(&mut map, UNIT_OF_ACCOUNT_FIELD);
                let observed_rate = take_array(&mut map, OBSERVED_RATE_FIELD);
                let items = take_array(&mut map, ITEMS_FIELD);
                let has_families = unit_of_account.is_some() || observed_rate.is_some();
                let families_empty = unit_of_account.as_ref().is_none_or(Vec::is_empty)
                    && observed_rate.as_ref().is_none_or(Vec::is_empty);

                match items {
                    // empty family arrays do not shadow a populated Items list
                    Some(items) if !has_families || families_empty => ResponseShape::Items(items),
                    _ if has_families => ResponseShape::Families {
                        unit_of_account: unit_of_account.unwrap_or_default(),
                        observed_rate: observed_rate.unwrap_or_default(),
                    },
                    _ => ResponseShape::Unrecognized,
                }
            }
            Value::Array(items) => ResponseShape::Bare(items),
            _ => ResponseShape::Unrecognized,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::Families { .. } => "families",
            ResponseShape::Items(_) => "items",
            ResponseShape::Bare(_) => "bare",
            ResponseShape::Unrecognized => "unrecognized",
        }
    }

    pub fn into_records(self) -> Vec<IndicatorRecord> {
        match self {
            ResponseShape::Families {
                unit_of_account,
                observed_rate,
            } => {
                let uf = unit_of_account
                    .into_iter()
                    .filter_map(|item| record_for_family(item, IndicatorKind::UnitOfAccount));
                let dolar = observed_rate
                    .into_iter()
                    .filter_map(|item| record_for_family(item, IndicatorKind::ObservedRate));
                uf.chain(dolar).collect()
            }
            ResponseShape::Items(items) | ResponseShape::Bare(items) => {
                items.into_iter().filter_map(record_from_code).collect()
            }
            ResponseShape::Unrecognized => Vec::new(),
        }
    }
}

fn take_array(map: &mut serde_json::Map<String, Value>, field: &str) -> Option<Vec<Value>> {
    match map.remove(field) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// One entry as the backend writes it. Every field is optional and loosely typed.
#[derive(Debug, Default, Deserialize)]
struct RawItem {
    #[serde(default)]
    codigo: Value,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    fecha: Value,
    #[serde(default)]
    valor: Value,
    #[serde(default)]
    s3_url: Value,
    #[serde(default, rename = "urlPdf")]
    url_pdf: Value,
}

impl RawItem {
    fn parse(item: Value) -> Option<Self> {
        // derived Deserialize also accepts sequences, decoding them by position
        if !item.is_object() {
            debug!(entry = %item, "Skipping indicator entry that is not an object");
            return None;
        }
        match serde_json::from_value(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable indicator entry");
                None
            }
        }
    }

    fn code(&self) -> String {
        text(&self.codigo)
            .or_else(|| text(&self.id))
            .unwrap_or_default()
    }

    fn into_record(self, kind: IndicatorKind) -> IndicatorRecord {
        IndicatorRecord {
            kind,
            effective_date: text(&self.fecha).unwrap_or_default(),
            amount: amount(&self.valor),
            document_url: text(&self.s3_url).or_else(|| text(&self.url_pdf)),
        }
    }
}

fn record_for_family(item: Value, kind: IndicatorKind) -> Option<IndicatorRecord> {
    RawItem::parse(item).map(|raw| raw.into_record(kind))
}

fn record_from_code(item: Value) -> Option<IndicatorRecord> {
    RawItem::parse(item).map(|raw| {
        let kind = IndicatorKind::from_code(&raw.code());
        raw.into_record(kind)
    })
}

/// Non-empty text, with numbers rendered as text.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|v| v.is_finite())
}

/// Reads a response body into JSON, unwrapping bodies that were JSON-encoded twice.
pub fn parse_body(body: &str) -> Result<Value, IndicatorError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        IndicatorError::FormatMismatch(format!("response is not JSON ({e}): '{body}'"))
    })?;

    match value {
        Value::String(inner) => serde_json::from_str(&inner).map_err(|e| {
            IndicatorError::FormatMismatch(format!(
                "response is a string that does not contain JSON ({e}): '{inner}'"
            ))
        }),
        other => Ok(other),
    }
}

/// Turns a raw response body into records. Unknown layouts give an empty list.
pub fn normalize(body: &str) -> Result<Vec<IndicatorRecord>, IndicatorError> {
    let shape = ResponseShape::classify(parse_body(body)?);
    let shape_name = shape.name();
    let records = shape.into_records();
    debug!(shape = shape_name, count = records.len(), "Normalized indicator payload");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_family_shape() {
        let body = r#"{
            "uf": [{"fecha": "2024-01-01", "valor": 36000}],
            "dolar": [{"fecha": "2024-01-01", "valor": 950}]
        }"#;

        let records = normalize(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, IndicatorKind::UnitOfAccount);
        assert_eq!(records[0].effective_date, "2024-01-01");
        assert_eq!(records[0].amount, Some(36000.0));
        assert_eq!(records[1].kind, IndicatorKind::ObservedRate);
        assert_eq!(records[1].amount, Some(950.0));
    }

    #[test]
    fn test_family_kind_ignores_item_code() {
        let body = json!({"dolar": [{"codigo": "UF", "fecha": "2024-01-01", "valor": 950}]});
        let records = ResponseShape::classify(body).into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, IndicatorKind::ObservedRate);
    }

    #[test]
    fn test_single_family_present() {
        let body = json!({"uf": [{"fecha": "2024-01-02", "valor": 36010.5}]});
        match ResponseShape::classify(body) {
            ResponseShape::Families {
                unit_of_account,
                observed_rate,
            } => {
                assert_eq!(unit_of_account.len(), 1);
                assert!(observed_rate.is_empty());
            }
            other => panic!("Expected families shape, got {other:?}"),
        }
    }

    #[test]
    fn test_items_shape_uses_item_codes() {
        let body = r#"{"Items": [
            {"codigo": "uf", "fecha": "2024-02-01", "valor": "36100.25"},
            {"id": "USD", "fecha": "2024-02-01", "valor": 940},
            {"codigo": "IPC", "fecha": "2024-02-01", "valor": 0.4}
        ]}"#;

        let records = normalize(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind, IndicatorKind::UnitOfAccount);
        assert_eq!(records[0].amount, Some(36100.25));
        assert_eq!(records[1].kind, IndicatorKind::ObservedRate);
        assert_eq!(records[2].kind, IndicatorKind::Other("IPC".to_string()));
    }

    #[test]
    fn test_kind_is_stable_across_shapes() {
        let family = normalize(r#"{"uf": [{"fecha": "2024-01-01", "valor": 1}]}"#).unwrap();
        let items =
            normalize(r#"{"Items": [{"codigo": "UF", "fecha": "2024-01-01", "valor": 1}]}"#)
                .unwrap();
        let bare = normalize(r#"[{"id": "uf", "fecha": "2024-01-01", "valor": 1}]"#).unwrap();

        assert_eq!(family[0].kind, items[0].kind);
        assert_eq!(items[0].kind, bare[0].kind);
        assert_eq!(family[0].kind.label(), bare[0].kind.label());
    }

    #[test]
    fn test_bare_list_shape() {
        let body = json!([
            {"codigo": "DOLAR", "fecha": "2024-03-01", "valor": 980, "urlPdf": "https://x/d.pdf"},
            {"fecha": "2024-03-01", "valor": 1}
        ]);
        let shape = ResponseShape::classify(body);
        assert_eq!(shape.name(), "bare");

        let records = shape.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_url.as_deref(), Some("https://x/d.pdf"));
        assert_eq!(records[1].kind, IndicatorKind::Other(String::new()));
    }

    #[test]
    fn test_families_take_priority_over_items() {
        let body = json!({
            "uf": [{"fecha": "2024-01-01", "valor": 36000}],
            "Items": [{"codigo": "UF", "fecha": "2024-01-01", "valor": 36000}]
        });
        let records = ResponseShape::classify(body).into_records();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_families_fall_through_to_items() {
        let body = json!({
            "uf": [],
            "dolar": [],
            "Items": [
                {"codigo": "UF", "fecha": "2024-01-01", "valor": 36000},
                {"codigo": "DOLAR", "fecha": "2024-01-01", "valor": 950}
            ]
        });
        let shape = ResponseShape::classify(body);
        assert_eq!(shape.name(), "items");
        assert_eq!(shape.into_records().len(), 2);

        // empty families with nothing else are still the families shape
        let shape = ResponseShape::classify(json!({"uf": []}));
        assert_eq!(shape.name(), "families");
        assert!(shape.into_records().is_empty());
    }

    #[test]
    fn test_array_entries_are_skipped() {
        let records = normalize(r#"[["UF", "x", "2024-01-01", 36000]]"#).unwrap();
        assert!(records.is_empty());

        let records =
            normalize(r#"{"uf": [["UF", "x", "2024-01-01", 36000], {"fecha": "2024-01-02"}]}"#)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].effective_date, "2024-01-02");
    }

    #[test]
    fn test_unrecognized_shapes_yield_nothing() {
        assert_eq!(normalize(r#"{"message": "ok"}"#).unwrap(), vec![]);
        assert_eq!(normalize(r#"{"uf": "not a list"}"#).unwrap(), vec![]);
        assert_eq!(normalize("42").unwrap(), vec![]);
        assert_eq!(normalize("null").unwrap(), vec![]);
    }

    #[test]
    fn test_document_url_preference() {
        let body = json!({"uf": [
            {"fecha": "2024-01-01", "valor": 1, "s3_url": "s3://a.pdf", "urlPdf": "http://b.pdf"},
            {"fecha": "2024-01-02", "valor": 1, "urlPdf": "http://b.pdf"},
            {"fecha": "2024-01-03", "valor": 1, "s3_url": "", "urlPdf": "http://c.pdf"},
            {"fecha": "2024-01-04", "valor": 1}
        ]});
        let records = ResponseShape::classify(body).into_records();
        assert_eq!(records[0].document_url.as_deref(), Some("s3://a.pdf"));
        assert_eq!(records[1].document_url.as_deref(), Some("http://b.pdf"));
        assert_eq!(records[2].document_url.as_deref(), Some("http://c.pdf"));
        assert_eq!(records[3].document_url, None);
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let body = json!({"uf": [
            {"fecha": null, "valor": "abc"},
            {"valor": true},
            "not an object"
        ]});
        let records = ResponseShape::classify(body).into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].effective_date, "");
        assert_eq!(records[0].amount, None);
        assert_eq!(records[1].amount, None);
    }

    #[test]
    fn test_string_encoded_body() {
        let inner = r#"{"uf": [{"fecha": "2024-01-01", "valor": 36000}]}"#;
        let body = serde_json::to_string(inner).unwrap();

        let records = normalize(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, IndicatorKind::UnitOfAccount);
    }

    #[test]
    fn test_non_json_body_is_format_mismatch() {
        let result = normalize("<html>Bad gateway</html>");
        assert!(matches!(result, Err(IndicatorError::FormatMismatch(_))));

        let result = normalize(r#""plain text""#);
        assert!(matches!(result, Err(IndicatorError::FormatMismatch(_))));
    }
}
