//! Byte-string decoding: base64 to hex and hex prefix normalization.
//!
//! The backend hands out byte strings in three shapes: base64 (legacy
//! endpoints), `0x`-prefixed hex, and `Z`-prefixed hex. Everything here
//! converges on plain lowercase hex.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::warn;

use crate::error::CodecError;

/// Decodes standard (non URL-safe) base64 into raw bytes.
pub fn base64_to_bytes(input: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(input)
        .map_err(|e| CodecError::InvalidBase64(e.to_string()))
}

/// Decodes a base64 byte string into lowercase hex, two characters per byte.
///
/// Malformed base64 yields an empty string and a warning.
pub fn decode_base64_to_hex(input: &str) -> String {
    match base64_to_bytes(input) {
        Ok(bytes) => hex::encode(bytes),
        Err(e) => {
            warn!(input, error = %e, "could not decode base64 field");
            String::new()
        }
    }
}

/// Strips exactly one leading `0x` or `Z` prefix, if present.
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix('Z'))
        .unwrap_or(input)
}

/// Returns true for a non-empty string of ASCII hex digits.
pub fn is_hex(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Strips a `0x` or `Z` prefix and checks that the remainder is hex.
///
/// Returns an empty string for anything that is not valid hex so that one
/// malformed field does not take down the rest of a page.
pub fn normalize_hex(input: &str) -> String {
    let body = strip_hex_prefix(input);
    if is_hex(body) {
        body.to_string()
    } else {
        if !input.is_empty() {
            warn!(input, "dropping non-hex field");
        }
        String::new()
    }
}

/// Decodes a prefixed or bare hex string into bytes.
///
/// Odd-length input is left-padded with one zero nibble (`"f4240"` decodes
/// like `"0f4240"`).
pub fn hex_to_bytes(input: &str) -> Result<Vec<u8>, CodecError> {
    let body = strip_hex_prefix(input);
    if !is_hex(body) {
        return Err(CodecError::InvalidHex(input.to_string()));
    }
    let padded = if body.len() % 2 != 0 {
        format!("0{body}")
    } else {
        body.to_string()
    };
    hex::decode(&padded).map_err(|e| CodecError::InvalidHex(format!("{input}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_decodes_to_lowercase_hex() {
        // "AQID/w==" is [0x01, 0x02, 0x03, 0xff].
        assert_eq!(decode_base64_to_hex("AQID/w=="), "010203ff");
    }

    #[test]
    fn base64_pads_single_digit_bytes() {
        // [0x05] must render as "05", not "5".
        assert_eq!(decode_base64_to_hex("BQ=="), "05");
    }

    #[test]
    fn base64_keeps_leading_zero_bytes() {
        let bytes = [0u8, 0, 0x7a, 0x10];
        let encoded = STANDARD.encode(bytes);
        assert_eq!(decode_base64_to_hex(&encoded), "00007a10");
    }

    #[test]
    fn base64_matches_hex_encoding_for_many_inputs() {
        let samples: Vec<Vec<u8>> = vec![
            vec![],
            vec![0],
            vec![0xff; 20],
            (0u8..=255).collect(),
            vec![0x00, 0x01, 0x00, 0x10, 0xab],
        ];
        for bytes in samples {
            let encoded = STANDARD.encode(&bytes);
            assert_eq!(decode_base64_to_hex(&encoded), hex::encode(&bytes));
        }
    }

    #[test]
    fn base64_malformed_returns_empty() {
        assert_eq!(decode_base64_to_hex("not base64!"), "");
    }

    #[test]
    fn normalize_strips_0x_prefix() {
        assert_eq!(normalize_hex("0xdeadBEEF"), "deadBEEF");
    }

    #[test]
    fn normalize_strips_z_prefix() {
        assert_eq!(normalize_hex("Z20fa"), "20fa");
    }

    #[test]
    fn normalize_is_idempotent_on_bare_hex() {
        let once = normalize_hex("00ab");
        assert_eq!(once, "00ab");
        assert_eq!(normalize_hex(&once), once);
    }

    #[test]
    fn normalize_strips_only_one_prefix() {
        // After removing "0x" the remainder "Zab" is not hex.
        assert_eq!(normalize_hex("0xZab"), "");
    }

    #[test]
    fn normalize_rejects_invalid_hex() {
        assert_eq!(normalize_hex("0xnothex"), "");
        assert_eq!(normalize_hex("0x"), "");
        assert_eq!(normalize_hex(""), "");
    }

    #[test]
    fn hex_to_bytes_pads_odd_length() {
        assert_eq!(hex_to_bytes("0xf4240").unwrap(), vec![0x0f, 0x42, 0x40]);
    }

    #[test]
    fn hex_to_bytes_rejects_garbage() {
        assert!(matches!(hex_to_bytes("0xzz"), Err(CodecError::InvalidHex(_))));
    }
}
