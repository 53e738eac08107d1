use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::{debug, warn};

use crate::abi::{self, encode_function_call, AbiParam, SELECTOR_LEN};
use crate::address::{is_valid_address, ADDRESS_PREFIX};
use crate::encoding::strip_hex_prefix;
use crate::error::CodecError;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `transferFrom(address,address,uint256)`: `0x23b872dd`.
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];

/// Selectors of the QRC-20 methods the explorer can name.
const KNOWN_METHODS: &[([u8; 4], &str)] = &[
    (TRANSFER_SELECTOR, "transfer"),
    (TRANSFER_FROM_SELECTOR, "transferFrom"),
    ([0x09, 0x5e, 0xa7, 0xb3], "approve"),
    ([0x70, 0xa0, 0x82, 0x31], "balanceOf"),
    ([0x18, 0x16, 0x0d, 0xdd], "totalSupply"),
    ([0x06, 0xfd, 0xde, 0x03], "name"),
    ([0x95, 0xd8, 0x9b, 0x41], "symbol"),
    ([0x31, 0x3c, 0xe5, 0x67], "decimals"),
];

/// Token transfer methods whose calldata can be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferMethod {
    #[serde(rename = "transfer")]
    Transfer,
    #[serde(rename = "transferFrom")]
    TransferFrom,
}

impl TransferMethod {
    /// ABI function name, as shown in the method column.
    pub fn name(&self) -> &'static str {
        match self {
            TransferMethod::Transfer => "transfer",
            TransferMethod::TransferFrom => "transferFrom",
        }
    }

    /// First four bytes of the keccak hash of the canonical signature.
    pub fn selector(&self) -> [u8; 4] {
        match self {
            TransferMethod::Transfer => TRANSFER_SELECTOR,
            TransferMethod::TransferFrom => TRANSFER_FROM_SELECTOR,
        }
    }

    /// Number of 32-byte parameter words after the selector.
    pub fn word_count(&self) -> usize {
        match self {
            TransferMethod::Transfer => 2,
            TransferMethod::TransferFrom => 3,
        }
    }

    /// Length of well-formed `0x`-prefixed calldata for this method
    /// (138 for `transfer`, 202 for `transferFrom`).
    pub fn calldata_hex_len(&self) -> usize {
        2 + 2 * (SELECTOR_LEN + self.word_count() * abi::WORD_LEN)
    }

    fn from_selector(selector: [u8; 4]) -> Option<Self> {
        match selector {
            TRANSFER_SELECTOR => Some(TransferMethod::Transfer),
            TRANSFER_FROM_SELECTOR => Some(TransferMethod::TransferFrom),
            _ => None,
        }
    }
}

/// A decoded token transfer as shown on transaction pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    /// Recipient, `Z`-prefixed.
    pub to: String,
    /// Amount in token base units, as a decimal string.
    pub amount: String,
    #[serde(rename = "methodName")]
    pub method: TransferMethod,
}

/// Full decode of a transfer call, including the `from` word of
/// `transferFrom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    pub method: TransferMethod,
    pub from: Option<String>,
    pub to: String,
    pub amount: U256,
}

fn format_address(addr: &[u8; 20]) -> String {
    format!("{ADDRESS_PREFIX}{}", hex::encode(addr))
}

fn selector_from_hex(calldata: &str) -> Option<[u8; 4]> {
    let body = strip_hex_prefix(calldata);
    let selector_hex = body.get(..2 * SELECTOR_LEN)?;
    let bytes = hex::decode(selector_hex).ok()?;
    bytes.try_into().ok()
}

/// Decodes `transfer`/`transferFrom` calldata given as hex.
///
/// Returns `None` for empty input, a bare `0x`, anything shorter than a
/// selector, other selectors, and calldata whose length is not exactly right
/// for its selector. Nothing is partially decoded.
pub fn decode_transfer_call(calldata: &str) -> Option<TransferCall> {
    if !calldata.starts_with("0x") {
        return None;
    }
    let selector = selector_from_hex(calldata)?;
    let method = TransferMethod::from_selector(selector)?;

    if calldata.len() != method.calldata_hex_len() {
        debug!(
            method = method.name(),
            len = calldata.len(),
            expected = method.calldata_hex_len(),
            "transfer calldata has wrong length"
        );
        return None;
    }

    match decode_words(calldata, method) {
        Ok(call) => Some(call),
        Err(e) => {
            warn!(error = %e, "could not decode transfer calldata");
            None
        }
    }
}

fn decode_words(calldata: &str, method: TransferMethod) -> Result<TransferCall, CodecError> {
    let data = hex::decode(&calldata[2..]).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
    let (_, words) = abi::split_call(&data, method.word_count())?;

    let (from, to_word, amount_word) = match method {
        TransferMethod::Transfer => (None, &words[0], &words[1]),
        TransferMethod::TransferFrom => (
            Some(format_address(&abi::decode_address(&words[0]))),
            &words[1],
            &words[2],
        ),
    };

    Ok(TransferCall {
        method,
        from,
        to: format_address(&abi::decode_address(to_word)),
        amount: abi::decode_uint256(amount_word),
    })
}

/// Decodes QRC-20 transfer calldata into recipient, amount and method name.
///
/// The sender of `transferFrom` is not part of the result; use
/// [`decode_transfer_call`] for it.
pub fn decode_token_transfer_input(calldata: &str) -> Option<TokenTransfer> {
    decode_transfer_call(calldata).map(|call| TokenTransfer {
        to: call.to,
        amount: call.amount.to_string(),
        method: call.method,
    })
}

/// Names the QRC-20 method a piece of calldata invokes, if it is a known one.
///
/// # Parameters
///
/// * `calldata` - `0x`-prefixed hex; unprefixed input is not calldata
///
/// # Returns
///
/// The method name, or `None` for unknown selectors and malformed input.
pub fn identify_method(calldata: &str) -> Option<&'static str> {
    if !calldata.starts_with("0x") {
        return None;
    }
    let selector = selector_from_hex(calldata)?;
    KNOWN_METHODS
        .iter()
        .find(|(known, _)| *known == selector)
        .map(|(_, name)| *name)
}

/// Computes the 4-byte selector of a canonical function signature, e.g.
/// `transfer(address,uint256)`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Parses a `Z`- or `0x`-prefixed 40-hex-character address.
fn parse_address(address: &str) -> Result<[u8; 20], CodecError> {
    if !is_valid_address(address) {
        return Err(CodecError::InvalidHex(format!("not an address: {address}")));
    }
    let bytes = hex::decode(strip_hex_prefix(address))
        .map_err(|e| CodecError::InvalidHex(format!("{address}: {e}")))?;
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Encodes `transfer(address,uint256)` calldata.
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, CodecError> {
    let params = [AbiParam::Address(parse_address(to)?), AbiParam::Uint256(amount)];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}

/// Encodes `transferFrom(address,address,uint256)` calldata.
pub fn encode_transfer_from(from: &str, to: &str, amount: U256) -> Result<Vec<u8>, CodecError> {
    let params = [
        AbiParam::Address(parse_address(from)?),
        AbiParam::Address(parse_address(to)?),
        AbiParam::Uint256(amount),
    ];
    Ok(encode_function_call(TRANSFER_FROM_SELECTOR, &params))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "Zaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SENDER: &str = "Z2019ea08f4e24201b98f9154906da4b924a04892";

    fn to_hex(data: &[u8]) -> String {
        format!("0x{}", hex::encode(data))
    }

    #[test]
    fn decodes_literal_transfer() {
        let calldata = "0xa9059cbb000000000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa0000000000000000000000000000000000000000000000000000000000000064";
        let decoded = decode_token_transfer_input(calldata).unwrap();
        assert_eq!(
            decoded,
            TokenTransfer {
                to: RECIPIENT.into(),
                amount: "100".into(),
                method: TransferMethod::Transfer,
            }
        );
    }

    #[test]
    fn decodes_transfer_from_with_sender() {
        let amount = U256::from(10u64).pow(U256::from(30u64));
        let data = encode_transfer_from(SENDER, RECIPIENT, amount).unwrap();
        let calldata = to_hex(&data);
        assert_eq!(calldata.len(), 202);

        let call = decode_transfer_call(&calldata).unwrap();
        assert_eq!(call.method, TransferMethod::TransferFrom);
        assert_eq!(call.from.as_deref(), Some(SENDER));
        assert_eq!(call.to, RECIPIENT);
        assert_eq!(call.amount, amount);

        let transfer = decode_token_transfer_input(&calldata).unwrap();
        assert_eq!(transfer.amount, "1000000000000000000000000000000");
        assert_eq!(transfer.method.name(), "transferFrom");
    }

    #[test]
    fn amount_keeps_full_uint256_precision() {
        let data = encode_transfer(RECIPIENT, U256::MAX).unwrap();
        let decoded = decode_token_transfer_input(&to_hex(&data)).unwrap();
        assert_eq!(
            decoded.amount,
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn rejects_short_or_empty_input() {
        assert!(decode_token_transfer_input("").is_none());
        assert!(decode_token_transfer_input("0x").is_none());
        assert!(decode_token_transfer_input("0xa9059c").is_none());
        assert!(decode_token_transfer_input("0xa9059cbb").is_none());
    }

    #[test]
    fn rejects_wrong_length_for_selector() {
        let data = encode_transfer(RECIPIENT, U256::from(1u64)).unwrap();
        let calldata = to_hex(&data);
        assert!(decode_token_transfer_input(&calldata[..136]).is_none());
        assert!(decode_token_transfer_input(&format!("{calldata}00")).is_none());

        // transferFrom selector with transfer-sized payload.
        let mismatched = format!("0x23b872dd{}", &calldata[10..]);
        assert!(decode_token_transfer_input(&mismatched).is_none());
    }

    #[test]
    fn rejects_unknown_selector() {
        let data = encode_transfer(RECIPIENT, U256::from(1u64)).unwrap();
        let calldata = format!("0x095ea7b3{}", &to_hex(&data)[10..]);
        assert!(decode_token_transfer_input(&calldata).is_none());
    }

    #[test]
    fn rejects_malformed_hex() {
        let bad = format!("0xa9059cbb{}", "zz".repeat(64));
        assert!(decode_token_transfer_input(&bad).is_none());
    }

    #[test]
    fn rejects_non_ascii_without_panicking() {
        assert!(decode_token_transfer_input("0xa9059cbé").is_none());
    }

    #[test]
    fn selector_constants_match_signatures() {
        assert_eq!(function_selector("transfer(address,uint256)"), TRANSFER_SELECTOR);
        assert_eq!(
            function_selector("transferFrom(address,address,uint256)"),
            TRANSFER_FROM_SELECTOR
        );
        for (selector, name) in KNOWN_METHODS {
            let signature = match *name {
                "transfer" => "transfer(address,uint256)".to_string(),
                "transferFrom" => "transferFrom(address,address,uint256)".to_string(),
                "approve" => "approve(address,uint256)".to_string(),
                "balanceOf" => "balanceOf(address)".to_string(),
                other => format!("{other}()"),
            };
            assert_eq!(function_selector(&signature), *selector, "{name}");
        }
    }

    #[test]
    fn identifies_known_methods() {
        assert_eq!(identify_method("0x70a08231000000"), Some("balanceOf"));
        assert_eq!(identify_method("0x18160ddd"), Some("totalSupply"));
        assert_eq!(identify_method("0xdeadbeef"), None);
        assert_eq!(identify_method("0x"), None);
    }

    #[test]
    fn identify_requires_0x_prefix() {
        assert_eq!(identify_method("70a08231"), None);
        assert_eq!(identify_method("Z70a08231"), None);
        assert_eq!(identify_method("0X70a08231"), None);
    }

    #[test]
    fn calldata_lengths() {
        assert_eq!(TransferMethod::Transfer.calldata_hex_len(), 138);
        assert_eq!(TransferMethod::TransferFrom.calldata_hex_len(), 202);
    }

    #[test]
    fn serializes_method_name() {
        let transfer = TokenTransfer {
            to: RECIPIENT.into(),
            amount: "1".into(),
            method: TransferMethod::TransferFrom,
        };
        let json = serde_json::to_value(&transfer).unwrap();
        assert_eq!(json["methodName"], "transferFrom");
    }

    #[test]
    fn encode_rejects_bad_address() {
        assert!(encode_transfer("Z1234", U256::ZERO).is_err());
    }
}
