//! Minimal ABI word codec for contract calldata.
//!
//! Calldata is `selector || word_0 || word_1 || ...` where the selector is 4
//! bytes and every parameter is one 32-byte word. Only static `address` and
//! `uint256` parameters are needed for the token methods the explorer
//! recognizes, so there is no dynamic-type support here.

use alloy_primitives::U256;

use crate::error::CodecError;

/// Size of a function selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// Size of one ABI word in bytes.
pub const WORD_LEN: usize = 32;

/// A single ABI-encoded parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiParam {
    /// A 20-byte address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer.
    Uint256(U256),
}

/// Encodes a function call: the selector followed by one word per parameter.
pub fn encode_function_call(selector: [u8; SELECTOR_LEN], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(SELECTOR_LEN + params.len() * WORD_LEN);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

fn encode_param(param: &AbiParam) -> [u8; WORD_LEN] {
    match param {
        AbiParam::Address(addr) => {
            let mut word = [0u8; WORD_LEN];
            word[12..].copy_from_slice(addr);
            word
        }
        AbiParam::Uint256(value) => value.to_be_bytes::<WORD_LEN>(),
    }
}

/// Splits calldata into its selector and parameter words.
///
/// Fails unless the data is exactly a selector plus `word_count` words.
pub fn split_call(
    data: &[u8],
    word_count: usize,
) -> Result<([u8; SELECTOR_LEN], Vec<[u8; WORD_LEN]>), CodecError> {
    let expected = SELECTOR_LEN + word_count * WORD_LEN;
    if data.len() != expected {
        return Err(CodecError::InvalidCalldata(format!(
            "expected {expected} bytes, got {}",
            data.len()
        )));
    }

    let mut selector = [0u8; SELECTOR_LEN];
    selector.copy_from_slice(&data[..SELECTOR_LEN]);

    let words = data[SELECTOR_LEN..]
        .chunks_exact(WORD_LEN)
        .map(|chunk| {
            let mut word = [0u8; WORD_LEN];
            word.copy_from_slice(chunk);
            word
        })
        .collect();

    Ok((selector, words))
}

/// Reads the low 20 bytes of a word as an address.
pub fn decode_address(word: &[u8; WORD_LEN]) -> [u8; 20] {
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&word[12..]);
    addr
}

/// Reads a word as a big-endian unsigned 256-bit integer.
pub fn decode_uint256(word: &[u8; WORD_LEN]) -> U256 {
    U256::from_be_bytes(*word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_address_param() {
        let mut addr = [0u8; 20];
        addr[0] = 0xde;
        addr[19] = 0xad;

        let word = encode_param(&AbiParam::Address(addr));

        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &addr);
    }

    #[test]
    fn encode_uint256_param_is_big_endian() {
        let word = encode_param(&AbiParam::Uint256(U256::from(42u64)));
        assert_eq!(word[31], 42);
        assert_eq!(&word[..31], &[0u8; 31]);
    }

    #[test]
    fn encode_function_call_with_params() {
        let selector = [0xa9, 0x05, 0x9c, 0xbb];
        let mut addr = [0u8; 20];
        addr[19] = 0x01;

        let params = [AbiParam::Address(addr), AbiParam::Uint256(U256::from(100u64))];
        let data = encode_function_call(selector, &params);

        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &selector);
        assert_eq!(data[35], 0x01);
        assert_eq!(data[67], 100);
    }

    #[test]
    fn split_call_returns_words() {
        let data = encode_function_call(
            [1, 2, 3, 4],
            &[
                AbiParam::Uint256(U256::from(7u64)),
                AbiParam::Uint256(U256::from(9u64)),
            ],
        );
        let (selector, words) = split_call(&data, 2).unwrap();
        assert_eq!(selector, [1, 2, 3, 4]);
        assert_eq!(words.len(), 2);
        assert_eq!(decode_uint256(&words[1]), U256::from(9u64));
    }

    #[test]
    fn split_call_rejects_wrong_length() {
        let data = vec![0u8; 4 + 32 + 1];
        assert!(matches!(split_call(&data, 1), Err(CodecError::InvalidCalldata(_))));
        assert!(split_call(&data[..36], 2).is_err());
    }

    #[test]
    fn decode_address_takes_low_twenty_bytes() {
        let mut word = [0xffu8; 32];
        word[..12].copy_from_slice(&[0u8; 12]);
        assert_eq!(decode_address(&word), [0xff; 20]);
    }

    #[test]
    fn decode_uint256_max() {
        assert_eq!(decode_uint256(&[0xff; 32]), U256::MAX);
    }
}
