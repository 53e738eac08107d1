//! Classification of free-text search queries.

use serde::Serialize;

use crate::address::{canonicalize_address, is_valid_address};
use crate::encoding::is_hex;

/// Hex characters in a transaction hash, without prefix.
const TX_HASH_HEX_LEN: usize = 64;

/// What a search query points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SearchTarget {
    Block(u64),
    /// `0x`-prefixed lowercase hash.
    Transaction(String),
    /// Canonical address.
    Address(String),
}

/// Classifies a query as a block number, transaction hash or address.
///
/// Surrounding whitespace is ignored. Returns `None` for anything else.
pub fn classify_query(query: &str) -> Option<SearchTarget> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if query.bytes().all(|b| b.is_ascii_digit()) {
        return query.parse().ok().map(SearchTarget::Block);
    }

    if let Some(hash) = query.strip_prefix("0x") {
        if hash.len() == TX_HASH_HEX_LEN && is_hex(hash) {
            return Some(SearchTarget::Transaction(format!(
                "0x{}",
                hash.to_ascii_lowercase()
            )));
        }
    }

    if is_valid_address(query) {
        return Some(SearchTarget::Address(canonicalize_address(query)));
    }

    None
}
