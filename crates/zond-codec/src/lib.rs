//! Display codec for the QRL Zond block explorer.
//!
//! This crate turns the backend's raw wire values into display-safe strings:
//! - base64 and hex byte strings, and `Z`/`0x` address canonicalization
//! - fixed-point amounts at 18 and 9 decimals, without floating-point loss
//! - QRC-20 `transfer`/`transferFrom` calldata decoding
//! - epoch timestamps and validator epoch ages
//! - compact and grouped number formatting
//!
//! Every public formatter is total: malformed input degrades to a documented
//! default and a `tracing` warning instead of an error.

pub mod abi;
pub mod address;
pub mod amount;
pub mod encoding;
pub mod error;
pub mod network;
pub mod number;
pub mod qrc20;
pub mod search;
pub mod time;
pub mod wire;

pub use address::canonicalize_address;
pub use amount::{format_amount, format_token_amount, Denomination, FixedPoint, RawAmount};
pub use encoding::{decode_base64_to_hex, normalize_hex};
pub use error::CodecError;
pub use network::{get_network, NetworkParams, ZOND_MAINNET, ZOND_TESTNET};
pub use number::{format_compact_number, format_currency, format_number_with_commas};
pub use qrc20::{decode_token_transfer_input, TokenTransfer, TransferMethod};
pub use time::{epoch_to_iso_date, epochs_to_elapsed_days, format_timestamp};
pub use wire::{AmountEncoding, ByteEncoding};
