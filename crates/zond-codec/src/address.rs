use crate::encoding::is_hex;

/// Prefix carried by regular account addresses in canonical form.
pub const ADDRESS_PREFIX: char = 'Z';

/// Hex prefix that contract addresses keep in canonical form.
pub const CONTRACT_PREFIX: &str = "0x7";

/// Number of hex characters in a 20-byte address body.
pub const ADDRESS_HEX_LEN: usize = 40;

/// Converts an address into its canonical display form.
///
/// - `Z…` is already canonical and returned unchanged.
/// - `0x7…` is contract address space and keeps its `0x` prefix.
/// - any other `0x…` hex address has `0x` replaced by `Z`.
/// - bare hex gets `Z` prepended.
/// - anything else (empty, not hex) is returned unchanged.
///
/// The mapping is idempotent.
pub fn canonicalize_address(address: &str) -> String {
    if address.starts_with(ADDRESS_PREFIX) || address.starts_with(CONTRACT_PREFIX) {
        return address.to_string();
    }

    let body = address.strip_prefix("0x").unwrap_or(address);
    if is_hex(body) {
        format!("{ADDRESS_PREFIX}{body}")
    } else {
        address.to_string()
    }
}

/// Returns true for `0x7…` contract-space addresses.
pub fn is_contract_address(address: &str) -> bool {
    address.starts_with(CONTRACT_PREFIX)
}

/// Checks the shape of a user-supplied address: `Z` or `0x` followed by
/// exactly 40 hex characters.
pub fn is_valid_address(address: &str) -> bool {
    let body = match address.strip_prefix(ADDRESS_PREFIX) {
        Some(body) => body,
        None => match address.strip_prefix("0x") {
            Some(body) => body,
            None => return false,
        },
    };
    body.len() == ADDRESS_HEX_LEN && is_hex(body)
}

/// Shortens a long identifier to `start…end` for list views.
///
/// Strings that already fit are returned unchanged.
pub fn truncate_middle(value: &str, start_chars: usize, end_chars: usize) -> String {
    let len = value.chars().count();
    if len <= start_chars + end_chars {
        return value.to_string();
    }
    let head: String = value.chars().take(start_chars).collect();
    let tail: String = value.chars().skip(len - end_chars).collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "abc0000000000000000000000000000000000def";

    #[test]
    fn z_prefixed_is_unchanged() {
        let addr = format!("Z{BODY}");
        assert_eq!(canonicalize_address(&addr), addr);
    }

    #[test]
    fn contract_space_keeps_0x() {
        let addr = "0x7abc000000000000000000000000000000000001";
        assert_eq!(canonicalize_address(addr), addr);
    }

    #[test]
    fn regular_0x_becomes_z() {
        let addr = format!("0x{BODY}");
        assert_eq!(canonicalize_address(&addr), format!("Z{BODY}"));
    }

    #[test]
    fn bare_hex_gets_z_prefix() {
        assert_eq!(canonicalize_address(BODY), format!("Z{BODY}"));
    }

    #[test]
    fn invalid_input_is_returned_unchanged() {
        assert_eq!(canonicalize_address(""), "");
        assert_eq!(canonicalize_address("0x"), "0x");
        assert_eq!(canonicalize_address("hello world"), "hello world");
        assert_eq!(canonicalize_address("0xnothex"), "0xnothex");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let inputs = [
            format!("Z{BODY}"),
            format!("0x{BODY}"),
            BODY.to_string(),
            "0x7fff000000000000000000000000000000000000".to_string(),
            "0x0123".to_string(),
            "garbage".to_string(),
        ];
        for input in &inputs {
            let once = canonicalize_address(input);
            assert_eq!(canonicalize_address(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn contract_detection() {
        assert!(is_contract_address("0x7abc"));
        assert!(!is_contract_address("0xabc"));
        assert!(!is_contract_address("Z7abc"));
    }

    #[test]
    fn valid_address_shapes() {
        assert!(is_valid_address(&format!("Z{BODY}")));
        assert!(is_valid_address(&format!("0x{BODY}")));
        assert!(!is_valid_address(BODY));
        assert!(!is_valid_address("Z1234"));
        assert!(!is_valid_address(&format!("Z{}", "g".repeat(40))));
    }

    #[test]
    fn truncate_middle_shortens_long_values() {
        let hash = "0x1234567890abcdef1234567890abcdef";
        assert_eq!(truncate_middle(hash, 6, 6), "0x1234...abcdef");
    }

    #[test]
    fn truncate_middle_keeps_short_values() {
        assert_eq!(truncate_middle("0x1234", 6, 6), "0x1234");
        assert_eq!(truncate_middle("", 6, 6), "");
    }
}
