//! Fixed-point amount formatting.
//!
//! Amounts arrive as integers of the network's smallest unit (10^-18 QRL for
//! values and fees, 10^-9 for gas-price-like fields), encoded as decimal or
//! `0x` hex text, and sometimes already divided down by the backend. All
//! arithmetic is done on 512-bit integers and all display work on digit
//! strings: no step goes through a float, so values beyond 2^256 keep every
//! digit.

use alloy_primitives::aliases::U512;
use tracing::{debug, warn};

use crate::encoding::is_hex;
use crate::error::CodecError;
use crate::number::{expand_scientific, group_thousands};
use crate::wire::AmountEncoding;

/// Number of decimals and display symbol of an amount field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denomination {
    pub decimals: u8,
    pub symbol: &'static str,
}

impl Denomination {
    /// Values and fees: 18 decimals.
    pub const QRL: Denomination = Denomination {
        decimals: 18,
        symbol: "QRL",
    };

    /// Gas-price-like fields: 9 decimals.
    pub const GAS_PRICE: Denomination = Denomination {
        decimals: 9,
        symbol: "QRL",
    };

    /// `10^decimals` as a big integer.
    pub fn scale(&self) -> Result<U512, CodecError> {
        pow10(self.decimals)
    }
}

impl Default for Denomination {
    fn default() -> Self {
        Denomination::QRL
    }
}

fn pow10(exp: u8) -> Result<U512, CodecError> {
    U512::from(10u64)
        .checked_pow(U512::from(exp))
        .ok_or_else(|| CodecError::Overflow(format!("10^{exp}")))
}

/// An amount as it comes off the wire, before its encoding is known.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAmount {
    Text(String),
    Number(f64),
    Missing,
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

impl From<&String> for RawAmount {
    fn from(value: &String) -> Self {
        RawAmount::Text(value.clone())
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<u64> for RawAmount {
    fn from(value: u64) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<u128> for RawAmount {
    fn from(value: u128) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl<T: Into<RawAmount>> From<Option<T>> for RawAmount {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawAmount::Missing, Into::into)
    }
}

impl RawAmount {
    /// Works out how an untagged amount is encoded.
    ///
    /// `0x` text is hex base units. Decimal text and numbers are classified by
    /// magnitude: below one whole display unit's worth of base units
    /// (`10^decimals`) they are taken to be pre-divided display values, at or
    /// above it they are raw base units. Upstream endpoints pre-convert some
    /// fields and not others, so this can misread a display value of 10^18
    /// QRL or more as base units.
    ///
    /// Returns `Ok(None)` for a missing amount.
    pub fn sniff(&self, denomination: &Denomination) -> Result<Option<AmountEncoding>, CodecError> {
        let text = match self {
            RawAmount::Missing => return Ok(None),
            RawAmount::Text(t) => t.trim().to_string(),
            RawAmount::Number(n) => {
                if !n.is_finite() {
                    return Err(CodecError::InvalidAmount(n.to_string()));
                }
                // f64 Display never uses exponent notation.
                n.to_string()
            }
        };

        if text.starts_with("0x") || text.starts_with("0X") {
            return Ok(Some(AmountEncoding::BaseUnitsHex(text)));
        }

        let plain = expand_scientific(&text)?;
        if plain.starts_with('-') {
            return Err(CodecError::InvalidAmount(text));
        }

        let whole = plain.split('.').next().unwrap_or("0");
        let whole_value = parse_decimal(whole)?;
        if whole_value >= denomination.scale()? {
            debug!(amount = %text, "amount at or above one display unit, reading as base units");
            Ok(Some(AmountEncoding::BaseUnits(whole.to_string())))
        } else {
            Ok(Some(AmountEncoding::Display(plain)))
        }
    }
}

fn parse_decimal(digits: &str) -> Result<U512, CodecError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::InvalidAmount(digits.to_string()));
    }
    U512::from_str_radix(digits, 10).map_err(|e| CodecError::Overflow(format!("{digits}: {e}")))
}

fn parse_hex(value: &str) -> Result<U512, CodecError> {
    let body = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if !is_hex(body) {
        return Err(CodecError::InvalidHex(value.to_string()));
    }
    U512::from_str_radix(body, 16).map_err(|e| CodecError::Overflow(format!("{value}: {e}")))
}

/// Parses an integer of base units given as `0x` hex or decimal text.
pub fn parse_base_units(value: &str) -> Result<U512, CodecError> {
    let value = value.trim();
    if value.starts_with("0x") || value.starts_with("0X") {
        parse_hex(value)
    } else {
        parse_decimal(value)
    }
}

/// An exact amount: an integer of base units and its number of decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    base_units: U512,
    decimals: u8,
}

impl FixedPoint {
    /// Wraps an integer count of base units.
    ///
    /// # Parameters
    ///
    /// * `base_units` - the amount in the smallest unit
    /// * `decimals` - how many of its digits sit after the point
    pub fn from_base_units(base_units: U512, decimals: u8) -> Self {
        Self {
            base_units,
            decimals,
        }
    }

    /// Zero at the given precision.
    pub fn zero(decimals: u8) -> Self {
        Self::from_base_units(U512::ZERO, decimals)
    }

    /// Decodes a tagged amount without any magnitude guessing.
    pub fn from_encoding(encoding: &AmountEncoding, decimals: u8) -> Result<Self, CodecError> {
        let base_units = match encoding {
            AmountEncoding::BaseUnits(v) => parse_decimal(v.trim())?,
            AmountEncoding::BaseUnitsHex(v) => parse_hex(v.trim())?,
            AmountEncoding::Display(v) => display_to_units(v, decimals)?,
        };
        Ok(Self::from_base_units(base_units, decimals))
    }

    /// The underlying integer, unscaled.
    pub fn base_units(&self) -> U512 {
        self.base_units
    }

    /// Digits after the point.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.base_units.is_zero()
    }

    /// Integer part in display units.
    pub fn whole(&self) -> Result<U512, CodecError> {
        Ok(self.base_units / pow10(self.decimals)?)
    }

    /// Remainder below one display unit, in base units.
    pub fn fraction(&self) -> Result<U512, CodecError> {
        Ok(self.base_units % pow10(self.decimals)?)
    }

    /// `whole * 10^decimals + fraction`, which is always the original value.
    pub fn to_base_units(&self) -> Result<U512, CodecError> {
        let scale = pow10(self.decimals)?;
        (self.base_units / scale)
            .checked_mul(scale)
            .and_then(|w| w.checked_add(self.base_units % scale))
            .ok_or_else(|| CodecError::Overflow("fixed-point reconstruction".into()))
    }

    /// Whole part and zero-padded fraction digits, as decimal strings.
    fn digit_parts(&self) -> Result<(String, String), CodecError> {
        let whole = self.whole()?.to_string();
        let fraction = self.fraction()?.to_string();
        let width = self.decimals as usize;
        Ok((whole, format!("{fraction:0>width$}")))
    }

    /// Full precision with trailing zeros stripped (`"1"`, `"0.000001"`).
    pub fn to_plain_string(&self) -> Result<String, CodecError> {
        let (whole, fraction) = self.digit_parts()?;
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            Ok(whole)
        } else {
            Ok(format!("{whole}.{fraction}"))
        }
    }

    /// Magnitude-dependent display precision.
    ///
    /// - zero: `0.00`
    /// - below 10^-6: scientific notation with every significant digit
    /// - below 1: up to 6 fractional digits
    /// - below 1000: up to 4
    /// - otherwise: up to 2
    ///
    /// Digits past the limit are truncated and trailing zeros stripped; a
    /// value with nothing left after the point renders with `.00`.
    pub fn to_display_string(&self) -> Result<String, CodecError> {
        if self.is_zero() {
            return Ok("0.00".to_string());
        }

        let (whole, fraction) = self.digit_parts()?;
        let max_digits = if whole == "0" {
            let leading_zeros = fraction.bytes().take_while(|b| *b == b'0').count();
            if leading_zeros >= 6 {
                return Ok(scientific(&fraction, leading_zeros));
            }
            6
        } else if whole.len() <= 3 {
            4
        } else {
            2
        };

        let kept = &fraction[..fraction.len().min(max_digits)];
        let kept = kept.trim_end_matches('0');
        if kept.is_empty() {
            Ok(format!("{whole}.00"))
        } else {
            Ok(format!("{whole}.{kept}"))
        }
    }
}

/// `d.ddde-N` for a pure fraction with `leading_zeros` zeros after the point.
fn scientific(fraction: &str, leading_zeros: usize) -> String {
    let significant = fraction[leading_zeros..].trim_end_matches('0');
    let exponent = leading_zeros + 1;
    let (first, rest) = significant.split_at(1);
    if rest.is_empty() {
        format!("{first}e-{exponent}")
    } else {
        format!("{first}.{rest}e-{exponent}")
    }
}

/// Converts a display-unit decimal into base units, truncating digits past
/// `decimals`.
fn display_to_units(display: &str, decimals: u8) -> Result<U512, CodecError> {
    let plain = expand_scientific(display)?;
    if plain.starts_with('-') {
        return Err(CodecError::InvalidAmount(display.to_string()));
    }
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
    let width = decimals as usize;
    let fraction: String = fraction.chars().take(width).collect();
    let digits = format!("{whole}{fraction:0<width$}");
    parse_decimal(&digits)
}

/// Formats an amount for display as `(value, unit)` in QRL.
///
/// Accepts decimal text, `0x` hex text, numbers and `None`. Zero-like and
/// unparseable inputs render as `("0.00", "QRL")`.
pub fn format_amount(raw: impl Into<RawAmount>) -> (String, String) {
    format_amount_in(raw, &Denomination::QRL)
}

/// [`format_amount`] for an arbitrary denomination.
pub fn format_amount_in(raw: impl Into<RawAmount>, denomination: &Denomination) -> (String, String) {
    let raw = raw.into();
    let result = raw.sniff(denomination).and_then(|encoding| match encoding {
        Some(encoding) => FixedPoint::from_encoding(&encoding, denomination.decimals),
        None => Ok(FixedPoint::zero(denomination.decimals)),
    });
    display_or_default(result, denomination, &raw)
}

/// Formats an amount whose encoding is already known.
pub fn format_encoded_amount(
    encoding: &AmountEncoding,
    denomination: &Denomination,
) -> (String, String) {
    let result = FixedPoint::from_encoding(encoding, denomination.decimals);
    display_or_default(result, denomination, encoding)
}

fn display_or_default(
    result: Result<FixedPoint, CodecError>,
    denomination: &Denomination,
    input: &dyn std::fmt::Debug,
) -> (String, String) {
    let symbol = denomination.symbol.to_string();
    match result.and_then(|fp| fp.to_display_string()) {
        Ok(value) => (value, symbol),
        Err(e) => {
            warn!(input = ?input, error = %e, "could not format amount");
            ("0.00".to_string(), symbol)
        }
    }
}

/// Formats a token balance with the token's own decimal count.
///
/// The whole part gets thousands separators and the fraction keeps every
/// significant digit. Empty or unparseable input renders as `"0"`.
pub fn format_token_amount(raw: &str, decimals: u8) -> String {
    if raw.trim().is_empty() {
        return "0".to_string();
    }
    let value = match parse_base_units(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(raw, error = %e, "could not parse token amount");
            return "0".to_string();
        }
    };

    let digits = value.to_string();
    let width = decimals as usize;
    let padded = format!("{digits:0>w$}", w = width + 1);
    let (whole, fraction) = padded.split_at(padded.len() - width);
    let whole = group_thousands(whole);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Exact base-units to display-units conversion (`"1500000000000000000"` to
/// `"1.5"`), `"0"` on malformed input.
pub fn base_units_to_display(raw: &str, denomination: &Denomination) -> String {
    parse_base_units(raw)
        .and_then(|units| FixedPoint::from_base_units(units, denomination.decimals).to_plain_string())
        .unwrap_or_else(|e| {
            warn!(raw, error = %e, "could not convert base units");
            "0".to_string()
        })
}

/// Exact display-units to base-units conversion (`"1.5"` to
/// `"1500000000000000000"`), `"0"` on malformed input.
pub fn display_to_base_units(display: &str, denomination: &Denomination) -> String {
    display_to_units(display, denomination.decimals)
        .map(|units| units.to_string())
        .unwrap_or_else(|e| {
            let input = display;
            warn!(display = input, error = %e, "could not convert display amount");
            "0".to_string()
        })
}

/// Transaction fee in base units: `gas_used * gas_price`.
///
/// Both inputs are integers given as decimal or `0x` hex text.
pub fn transaction_fee(gas_used: &str, gas_price: &str) -> Result<U512, CodecError> {
    let used = parse_base_units(gas_used)?;
    let price = parse_base_units(gas_price)?;
    used.checked_mul(price)
        .ok_or_else(|| CodecError::Overflow(format!("{gas_used} * {gas_price}")))
}

/// Display form of [`transaction_fee`], `("0.00", "QRL")` on malformed input.
pub fn format_transaction_fee(gas_used: &str, gas_price: &str) -> (String, String) {
    let result = transaction_fee(gas_used, gas_price)
        .map(|fee| FixedPoint::from_base_units(fee, Denomination::QRL.decimals));
    display_or_default(result, &Denomination::QRL, &(gas_used, gas_price))
}
