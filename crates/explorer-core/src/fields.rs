//! Field extraction from backend JSON.
//!
//! Backend records are loosely typed: the same field can arrive as a JSON
//! string, a number, a tagged `{"kind", "value"}` object, or not at all.
//! These helpers validate one field at a time. The `require_*` forms fail
//! the caller; the others log and return `None` so a view can degrade per
//! field.

use serde_json::{Map, Value};
use tracing::warn;
use zond_codec::amount::parse_base_units;
use zond_codec::{AmountEncoding, ByteEncoding, RawAmount};

use crate::error::ExplorerError;

pub type Object = Map<String, Value>;

/// Borrows a value as a JSON object.
pub fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, ExplorerError> {
    value
        .as_object()
        .ok_or_else(|| ExplorerError::invalid(what, "expected a JSON object"))
}

/// A present, non-null field.
fn present<'a>(obj: &'a Object, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

/// A string field the record cannot do without.
///
/// # Returns
///
/// `MissingField` when absent or null, `InvalidField` when not a string.
pub fn require_str<'a>(obj: &'a Object, field: &str) -> Result<&'a str, ExplorerError> {
    match present(obj, field) {
        None => Err(ExplorerError::MissingField(field.to_string())),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ExplorerError::invalid(field, "expected a string")),
    }
}

/// An optional string field; other JSON types are logged and ignored.
pub fn opt_str<'a>(obj: &'a Object, field: &str) -> Option<&'a str> {
    match present(obj, field)? {
        Value::String(s) => Some(s),
        other => {
            warn!(field, value = %other, "expected a string, ignoring field");
            None
        }
    }
}

/// An optional boolean, also accepted as the text `"true"`/`"false"`.
pub fn opt_bool(obj: &Object, field: &str) -> Option<bool> {
    match present(obj, field)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" || s == "false" => Some(s == "true"),
        other => {
            warn!(field, value = %other, "expected a boolean, ignoring field");
            None
        }
    }
}

/// An optional float from a JSON number or numeric text.
pub fn opt_f64(obj: &Object, field: &str) -> Option<f64> {
    let parsed = match present(obj, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warn!(field, "expected a number, ignoring field");
    }
    parsed
}

/// Parses an unsigned integer given as a JSON number, decimal text or `0x`
/// hex text.
pub fn parse_u64(field: &str, value: &Value) -> Result<u64, ExplorerError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ExplorerError::invalid(field, format!("not an unsigned integer: {n}"))),
        Value::String(s) => {
            let wide = parse_base_units(s)?;
            u64::try_from(wide).map_err(|_| ExplorerError::invalid(field, format!("{s} out of range")))
        }
        other => Err(ExplorerError::invalid(field, format!("unexpected value {other}"))),
    }
}

/// An optional unsigned integer; see [`parse_u64`] for accepted shapes.
pub fn opt_u64(obj: &Object, field: &str) -> Option<u64> {
    let value = present(obj, field)?;
    parse_u64(field, value)
        .map_err(|e| warn!(error = %e, "ignoring field"))
        .ok()
}

/// An unsigned integer the record cannot do without.
pub fn require_u64(obj: &Object, field: &str) -> Result<u64, ExplorerError> {
    let value = present(obj, field).ok_or_else(|| ExplorerError::MissingField(field.to_string()))?;
    parse_u64(field, value)
}

/// Unix seconds. Negative numbers are accepted as JSON numbers only.
pub fn opt_timestamp(obj: &Object, field: &str) -> Option<i64> {
    match present(obj, field)? {
        Value::Number(n) if n.is_i64() => n.as_i64(),
        other => parse_u64(field, other)
            .and_then(|v| {
                i64::try_from(v).map_err(|_| ExplorerError::invalid(field, "timestamp out of range"))
            })
            .map_err(|e| warn!(error = %e, "ignoring field"))
            .ok(),
    }
}

/// A byte-string field: tagged, or sniffed from a plain string.
pub fn opt_bytes(obj: &Object, field: &str) -> Option<ByteEncoding> {
    match present(obj, field)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(ByteEncoding::sniff(s)),
        tagged @ Value::Object(_) => serde_json::from_value(tagged.clone())
            .map_err(|e| warn!(field, error = %e, "malformed tagged byte string"))
            .ok(),
        other => {
            warn!(field, value = %other, "expected a byte string, ignoring field");
            None
        }
    }
}

/// An amount field as received.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountField {
    /// The producer said how the amount is encoded.
    Tagged(AmountEncoding),
    /// Untagged; the encoding has to be sniffed.
    Raw(RawAmount),
}

/// Reads an amount field without interpreting it.
///
/// # Returns
///
/// `Tagged` for a `{"kind", "value"}` object, otherwise `Raw` with strings
/// and numbers kept as received. Absent, null or mistyped fields are
/// `Raw(RawAmount::Missing)`.
pub fn amount(obj: &Object, field: &str) -> AmountField {
    let raw = match present(obj, field) {
        None => RawAmount::Missing,
        Some(Value::String(s)) => RawAmount::Text(s.clone()),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(int) => RawAmount::from(int),
            None => n.as_f64().map_or(RawAmount::Missing, RawAmount::Number),
        },
        Some(tagged @ Value::Object(_)) => {
            return match serde_json::from_value(tagged.clone()) {
                Ok(encoding) => AmountField::Tagged(encoding),
                Err(e) => {
                    warn!(field, error = %e, "malformed tagged amount");
                    AmountField::Raw(RawAmount::Missing)
                }
            };
        }
        Some(other) => {
            warn!(field, value = %other, "expected an amount, ignoring field");
            RawAmount::Missing
        }
    };
    AmountField::Raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn require_str_reports_missing_and_mistyped() {
        let o = obj(json!({"a": "x", "b": 1, "c": null}));
        assert_eq!(require_str(&o, "a").unwrap(), "x");
        assert!(matches!(require_str(&o, "b"), Err(ExplorerError::InvalidField { .. })));
        assert!(matches!(require_str(&o, "c"), Err(ExplorerError::MissingField(_))));
        assert!(matches!(require_str(&o, "d"), Err(ExplorerError::MissingField(_))));
    }

    #[test]
    fn integers_from_numbers_and_text() {
        let o = obj(json!({"n": 42, "d": "1234", "h": "0x10", "neg": -1, "big": "0x1ffffffffffffffff"}));
        assert_eq!(opt_u64(&o, "n"), Some(42));
        assert_eq!(opt_u64(&o, "d"), Some(1234));
        assert_eq!(opt_u64(&o, "h"), Some(16));
        assert_eq!(opt_u64(&o, "neg"), None);
        assert_eq!(opt_u64(&o, "big"), None);
        assert_eq!(opt_u64(&o, "missing"), None);
    }

    #[test]
    fn required_integers() {
        let o = obj(json!({"n": "0x400", "bad": true, "nil": null}));
        assert_eq!(require_u64(&o, "n").unwrap(), 1024);
        assert!(matches!(require_u64(&o, "bad"), Err(ExplorerError::InvalidField { .. })));
        assert!(matches!(require_u64(&o, "nil"), Err(ExplorerError::MissingField(_))));
    }

    #[test]
    fn parse_u64_surfaces_codec_errors() {
        let err = parse_u64("blockNumber", &json!("12x")).unwrap_err();
        assert!(matches!(err, ExplorerError::Codec(_)));
    }

    #[test]
    fn timestamps() {
        let o = obj(json!({"t": 1700000000, "s": "1700000000", "z": 0}));
        assert_eq!(opt_timestamp(&o, "t"), Some(1_700_000_000));
        assert_eq!(opt_timestamp(&o, "s"), Some(1_700_000_000));
        assert_eq!(opt_timestamp(&o, "z"), Some(0));
        assert_eq!(opt_timestamp(&o, "none"), None);
    }

    #[test]
    fn bytes_sniffed_or_tagged() {
        let o = obj(json!({
            "hex": "0xabcd",
            "b64": "q80=",
            "tagged": {"kind": "base64", "value": "q80="},
            "bad": {"kind": "rot13", "value": "x"},
            "empty": ""
        }));
        assert_eq!(opt_bytes(&o, "hex").unwrap().to_hex(), "abcd");
        assert_eq!(opt_bytes(&o, "b64").unwrap().to_hex(), "abcd");
        assert_eq!(opt_bytes(&o, "tagged").unwrap().to_hex(), "abcd");
        assert!(opt_bytes(&o, "bad").is_none());
        assert!(opt_bytes(&o, "empty").is_none());
    }

    #[test]
    fn amounts_keep_their_shape() {
        let o = obj(json!({
            "text": "1000000000000000000",
            "int": 5,
            "float": 1.5,
            "tagged": {"kind": "hex", "value": "0x10"}
        }));
        assert_eq!(
            amount(&o, "text"),
            AmountField::Raw(RawAmount::Text("1000000000000000000".into()))
        );
        assert_eq!(amount(&o, "int"), AmountField::Raw(RawAmount::from(5u64)));
        assert_eq!(amount(&o, "float"), AmountField::Raw(RawAmount::Number(1.5)));
        assert_eq!(
            amount(&o, "tagged"),
            AmountField::Tagged(AmountEncoding::BaseUnitsHex("0x10".into()))
        );
        assert_eq!(amount(&o, "missing"), AmountField::Raw(RawAmount::Missing));
    }

    #[test]
    fn booleans() {
        let o = obj(json!({"a": true, "b": "false", "c": 1}));
        assert_eq!(opt_bool(&o, "a"), Some(true));
        assert_eq!(opt_bool(&o, "b"), Some(false));
        assert_eq!(opt_bool(&o, "c"), None);
    }
}
