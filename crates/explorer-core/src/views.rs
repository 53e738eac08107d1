//! Display-ready view models built from backend records.
//!
//! Each view validates its record field by field. Only the identifying field
//! of a record is required; everything else that is missing or malformed is
//! logged and rendered as the codec's default.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use zond_codec::address::{canonicalize_address, is_contract_address, truncate_middle};
use zond_codec::amount::{format_amount_in, format_encoded_amount, format_transaction_fee};
use zond_codec::qrc20::identify_method;
use zond_codec::time::{format_elapsed_days, has_activity};
use zond_codec::{
    decode_token_transfer_input, epoch_to_iso_date, format_number_with_commas, format_timestamp,
    format_token_amount, AmountEncoding, ByteEncoding, Denomination, RawAmount, TokenTransfer,
};

use crate::error::ExplorerError;
use crate::fields::{self, AmountField, Object};

/// Decimals assumed for a token whose metadata is missing.
const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// A record the explorer can render.
pub trait View: Serialize + Sized {
    /// Validates one backend record and builds its view.
    fn from_json(value: &Value) -> Result<Self, ExplorerError>;
}

/// Builds a view for every record, logging and skipping the ones that fail
/// validation.
pub fn collect_views<V: View>(records: &[Value]) -> Vec<V> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match V::from_json(record) {
            Ok(view) => Some(view),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

/// `(value, unit)` pair as shown next to each other in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayAmount {
    pub value: String,
    pub unit: String,
}

impl From<(String, String)> for DisplayAmount {
    fn from((value, unit): (String, String)) -> Self {
        Self { value, unit }
    }
}

fn display_amount(field: AmountField, denomination: &Denomination) -> DisplayAmount {
    match field {
        AmountField::Tagged(encoding) => format_encoded_amount(&encoding, denomination),
        AmountField::Raw(raw) => format_amount_in(raw, denomination),
    }
    .into()
}

fn address_field(obj: &Object, field: &str) -> String {
    fields::opt_bytes(obj, field)
        .map(|bytes| bytes.to_address())
        .unwrap_or_default()
}

fn required_bytes(obj: &Object, field: &str) -> Result<ByteEncoding, ExplorerError> {
    fields::opt_bytes(obj, field).ok_or_else(|| ExplorerError::MissingField(field.to_string()))
}

/// First key of `keys` present in the record.
fn first_key<'a>(obj: &Object, keys: &[&'a str]) -> &'a str {
    keys.iter()
        .copied()
        .find(|k| obj.get(*k).is_some_and(|v| !v.is_null()))
        .unwrap_or(keys[0])
}

/// One transaction on the transaction detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub hash: String,
    pub block_number: Option<u64>,
    pub from: String,
    pub to: String,
    pub value: DisplayAmount,
    pub fee: Option<DisplayAmount>,
    pub date: String,
    pub timestamp: Option<String>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub token_transfer: Option<TokenTransfer>,
}

impl View for TransactionView {
    fn from_json(value: &Value) -> Result<Self, ExplorerError> {
        let obj = fields::as_object(value, "transaction")?;

        let hash_key = first_key(obj, &["hash", "txHash"]);
        let hash = required_bytes(obj, hash_key)?.to_prefixed_hex();
        if hash.is_empty() {
            return Err(ExplorerError::invalid(hash_key, "not a hex or base64 hash"));
        }

        let fee = match (fields::opt_u64(obj, "gasUsed"), fields::opt_u64(obj, "gasPrice")) {
            (Some(used), Some(price)) => {
                Some(format_transaction_fee(&used.to_string(), &price.to_string()).into())
            }
            _ => None,
        };

        let timestamp = fields::opt_timestamp(obj, "timestamp");
        let input = fields::opt_bytes(obj, first_key(obj, &["input", "data"]))
            .map(|bytes| bytes.to_prefixed_hex())
            .filter(|hex| !hex.is_empty());

        Ok(Self {
            hash,
            block_number: fields::opt_u64(obj, "blockNumber"),
            from: address_field(obj, "from"),
            to: address_field(obj, "to"),
            value: display_amount(fields::amount(obj, "value"), &Denomination::QRL),
            fee,
            date: epoch_to_iso_date(timestamp),
            timestamp: timestamp.map(format_timestamp),
            status: fields::opt_str(obj, "status").map(str::to_string),
            method: input
                .as_deref()
                .and_then(identify_method)
                .map(str::to_string),
            token_transfer: input.as_deref().and_then(decode_token_transfer_input),
        })
    }
}

/// Summary block of the address page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressActivityView {
    pub address: String,
    pub is_contract: bool,
    pub balance: DisplayAmount,
    pub rank: Option<u64>,
    pub first_seen: String,
    pub last_seen: String,
    pub has_activity: bool,
}

impl View for AddressActivityView {
    fn from_json(value: &Value) -> Result<Self, ExplorerError> {
        let obj = fields::as_object(value, "address")?;

        let address = required_bytes(obj, "address")?.to_address();
        if address.is_empty() {
            return Err(ExplorerError::invalid("address", "not a hex or base64 address"));
        }

        let first_seen = fields::opt_timestamp(obj, "firstSeen");
        let last_seen = fields::opt_timestamp(obj, "lastSeen");

        Ok(Self {
            is_contract: is_contract_address(&address),
            address,
            balance: display_amount(fields::amount(obj, "balance"), &Denomination::QRL),
            rank: fields::opt_u64(obj, "rank"),
            first_seen: epoch_to_iso_date(first_seen),
            last_seen: epoch_to_iso_date(last_seen),
            has_activity: has_activity(first_seen, last_seen),
        })
    }
}

/// One row of the validator table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorView {
    /// `0x`-prefixed hex of the validator's address bytes.
    pub address: String,
    pub short_address: String,
    pub uptime: Option<f64>,
    pub age_epochs: u64,
    pub age: String,
    pub staked: DisplayAmount,
    pub is_active: bool,
    pub status: &'static str,
}

impl View for ValidatorView {
    fn from_json(value: &Value) -> Result<Self, ExplorerError> {
        let obj = fields::as_object(value, "validator")?;

        let address = required_bytes(obj, "address")?.to_prefixed_hex();
        if address.is_empty() {
            return Err(ExplorerError::invalid("address", "not a hex or base64 address"));
        }

        let age_epochs = fields::opt_u64(obj, "age").unwrap_or(0);
        let is_active = fields::opt_bool(obj, "isActive").unwrap_or(false);

        Ok(Self {
            short_address: truncate_middle(&address, 10, 8),
            address,
            uptime: fields::opt_f64(obj, "uptime"),
            age_epochs,
            age: format_elapsed_days(age_epochs),
            staked: display_amount(fields::amount(obj, "stakedAmount"), &Denomination::QRL),
            is_active,
            status: if is_active { "Active" } else { "Inactive" },
        })
    }
}

/// One QRC-20 transfer in a token's transfer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransferView {
    pub tx_hash: String,
    pub contract: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub symbol: String,
    pub date: String,
}

impl TokenTransferView {
    /// Builds the row for a transfer decoded from a transaction's calldata.
    pub fn from_decoded(
        tx: &TransactionView,
        transfer: &TokenTransfer,
        decimals: u8,
        symbol: &str,
    ) -> Self {
        Self {
            tx_hash: tx.hash.clone(),
            contract: tx.to.clone(),
            from: tx.from.clone(),
            to: canonicalize_address(&transfer.to),
            amount: format_token_amount(&transfer.amount, decimals),
            symbol: symbol.to_string(),
            date: tx.date.clone(),
        }
    }
}

impl View for TokenTransferView {
    fn from_json(value: &Value) -> Result<Self, ExplorerError> {
        let obj = fields::as_object(value, "token transfer")?;

        let tx_hash = required_bytes(obj, "txHash")?.to_prefixed_hex();
        if tx_hash.is_empty() {
            return Err(ExplorerError::invalid("txHash", "not a hex or base64 hash"));
        }

        let decimals = match fields::opt_u64(obj, "tokenDecimals") {
            Some(d) => u8::try_from(d).unwrap_or_else(|_| {
                warn!(decimals = d, "token decimals out of range, using default");
                DEFAULT_TOKEN_DECIMALS
            }),
            None => DEFAULT_TOKEN_DECIMALS,
        };
        let amount = match fields::amount(obj, "amount") {
            AmountField::Raw(RawAmount::Text(text)) => text,
            AmountField::Tagged(AmountEncoding::BaseUnits(text))
            | AmountField::Tagged(AmountEncoding::BaseUnitsHex(text)) => text,
            other => {
                warn!(amount = ?other, "token amount is not an integer string");
                String::new()
            }
        };

        Ok(Self {
            tx_hash,
            contract: address_field(obj, "contractAddress"),
            from: address_field(obj, "from"),
            to: address_field(obj, "to"),
            amount: format_token_amount(&amount, decimals),
            symbol: fields::opt_str(obj, "tokenSymbol").unwrap_or_default().to_string(),
            date: epoch_to_iso_date(fields::opt_timestamp(obj, "blockTimestamp")),
        })
    }
}

/// Block detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub miner: String,
    pub date: String,
    pub timestamp: Option<String>,
    /// Thousands-grouped, e.g. `"1,234,567"`.
    pub gas_used: String,
    pub gas_limit: String,
    pub base_fee: Option<DisplayAmount>,
    pub size: Option<u64>,
    /// Number of entries in the record's transaction list, including any
    /// that could not be rendered.
    pub transaction_count: usize,
    pub transactions: Vec<TransactionView>,
}

fn grouped_integer(obj: &Object, field: &str) -> String {
    let value = fields::opt_u64(obj, field).map(|v| v.to_string());
    format_number_with_commas(value.as_deref())
}

/// Block transactions arrive either as full records or as bare hashes.
fn block_transactions(obj: &Object) -> (usize, Vec<TransactionView>) {
    let Some(Value::Array(entries)) = obj.get("transactions") else {
        return (0, Vec::new());
    };
    let records: Vec<Value> = entries
        .iter()
        .map(|entry| match entry {
            Value::String(hash) => serde_json::json!({ "hash": hash }),
            other => other.clone(),
        })
        .collect();
    (entries.len(), collect_views(&records))
}

impl View for BlockView {
    fn from_json(value: &Value) -> Result<Self, ExplorerError> {
        let obj = fields::as_object(value, "block")?;

        let number = fields::require_u64(obj, "number")?;
        let timestamp = fields::opt_timestamp(obj, "timestamp");
        let base_fee = match fields::amount(obj, "baseFeePerGas") {
            AmountField::Raw(RawAmount::Missing) => None,
            field => Some(display_amount(field, &Denomination::GAS_PRICE)),
        };
        let (transaction_count, transactions) = block_transactions(obj);

        Ok(Self {
            number,
            hash: fields::opt_bytes(obj, "hash")
                .map(|bytes| bytes.to_prefixed_hex())
                .unwrap_or_default(),
            parent_hash: fields::opt_bytes(obj, "parentHash")
                .map(|bytes| bytes.to_prefixed_hex())
                .unwrap_or_default(),
            miner: address_field(obj, "miner"),
            date: epoch_to_iso_date(timestamp),
            timestamp: timestamp.map(format_timestamp),
            gas_used: grouped_integer(obj, "gasUsed"),
            gas_limit: grouped_integer(obj, "gasLimit"),
            base_fee,
            size: fields::opt_u64(obj, "size"),
            transaction_count,
            transactions,
        })
    }
}
