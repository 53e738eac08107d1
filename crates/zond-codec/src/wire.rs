//! Tagged wire encodings.
//!
//! Backend endpoints disagree on how byte strings and amounts are encoded.
//! Once the encoding of a field is known it is carried as one of these
//! variants, serialised as `{"kind": ..., "value": ...}`, and decoded without
//! any guessing. Sniffing the encoding from an untagged value only happens at
//! the JSON boundary.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::canonicalize_address;
use crate::encoding::{decode_base64_to_hex, is_hex, strip_hex_prefix};

/// Encoding of a byte string (address, hash, public key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ByteEncoding {
    Base64(String),
    /// `0x`-prefixed, `Z`-prefixed or bare hex.
    Hex(String),
}

impl ByteEncoding {
    /// Guesses the encoding of an untagged byte string.
    ///
    /// Text that is hex after an optional `0x`/`Z` prefix is hex; anything
    /// else is taken to be base64. Base64 can itself start with `Z` or `0x`,
    /// so the prefix alone decides nothing. A string that is both valid hex
    /// and valid base64 is read as hex.
    pub fn sniff(value: &str) -> Self {
        if is_hex(strip_hex_prefix(value)) {
            ByteEncoding::Hex(value.to_string())
        } else {
            debug!(value, "treating untagged byte string as base64");
            ByteEncoding::Base64(value.to_string())
        }
    }

    /// Lowercase hex without any prefix; empty on malformed input.
    pub fn to_hex(&self) -> String {
        match self {
            ByteEncoding::Base64(v) => decode_base64_to_hex(v),
            ByteEncoding::Hex(v) => {
                let body = strip_hex_prefix(v);
                if is_hex(body) {
                    body.to_ascii_lowercase()
                } else {
                    String::new()
                }
            }
        }
    }

    /// `0x`-prefixed hex, as hashes are displayed; empty on malformed input.
    pub fn to_prefixed_hex(&self) -> String {
        let hex = self.to_hex();
        if hex.is_empty() {
            hex
        } else {
            format!("0x{hex}")
        }
    }

    /// Canonical display address; empty on malformed input.
    pub fn to_address(&self) -> String {
        match self {
            ByteEncoding::Hex(v)
                if (v.starts_with('Z') || v.starts_with("0x")) && is_hex(strip_hex_prefix(v)) =>
            {
                canonicalize_address(v)
            }
            _ => {
                let hex = self.to_hex();
                if hex.is_empty() {
                    hex
                } else {
                    canonicalize_address(&format!("0x{hex}"))
                }
            }
        }
    }
}

/// Encoding of an amount field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AmountEncoding {
    /// Decimal integer of base units.
    #[serde(rename = "decimal")]
    BaseUnits(String),
    /// `0x`-prefixed hex integer of base units.
    #[serde(rename = "hex")]
    BaseUnitsHex(String),
    /// Decimal number already divided down to display units.
    #[serde(rename = "display")]
    Display(String),
}
