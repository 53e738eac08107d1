//! Timestamp and epoch formatting.
//!
//! Every rendering uses UTC so the same string comes out wherever it is
//! produced.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::CodecError;
use crate::network::{NetworkParams, ZOND_MAINNET};

/// Date rendered for a missing or zero timestamp. Callers compare against it
/// to detect "never happened".
pub const EPOCH_SENTINEL: &str = "1970-01-01";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// `en-US` numeric date and 12-hour time, e.g. `11/14/2023, 10:13:20 PM`.
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

fn to_datetime(seconds: i64) -> Result<DateTime<Utc>, CodecError> {
    DateTime::from_timestamp(seconds, 0).ok_or(CodecError::InvalidTimestamp(seconds))
}

/// Renders unix seconds as a UTC `YYYY-MM-DD` date.
///
/// `None` and `0` give [`EPOCH_SENTINEL`], as does anything chrono cannot
/// represent.
pub fn epoch_to_iso_date(seconds: Option<i64>) -> String {
    let seconds = match seconds {
        None | Some(0) => return EPOCH_SENTINEL.to_string(),
        Some(s) => s,
    };
    match to_datetime(seconds) {
        Ok(dt) => dt.format(ISO_DATE_FORMAT).to_string(),
        Err(e) => {
            warn!(error = %e, "timestamp out of range, using sentinel date");
            EPOCH_SENTINEL.to_string()
        }
    }
}

/// Renders unix seconds as a UTC date and time, `M/D/YYYY, h:mm:ss AM`.
///
/// Out-of-range input renders as the unix epoch.
pub fn format_timestamp(seconds: i64) -> String {
    let dt = to_datetime(seconds).unwrap_or_else(|e| {
        warn!(error = %e, "timestamp out of range, rendering unix epoch");
        DateTime::<Utc>::UNIX_EPOCH
    });
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Converts an epoch count into elapsed days using mainnet timing.
pub fn epochs_to_elapsed_days(epoch_count: u64) -> f64 {
    epochs_to_elapsed_days_on(&ZOND_MAINNET, epoch_count)
}

/// Converts an epoch count into elapsed days for a given network.
///
/// # Parameters
///
/// * `network` - slot timing to apply
/// * `epoch_count` - epochs since activation
///
/// # Returns
///
/// Fractional days; saturates instead of overflowing for huge parameters.
pub fn epochs_to_elapsed_days_on(network: &NetworkParams, epoch_count: u64) -> f64 {
    network.epochs_to_elapsed_days(epoch_count)
}

/// Validator age for tables: days with one decimal, e.g. `"60.0 days"`.
pub fn format_elapsed_days(epoch_count: u64) -> String {
    format!("{:.1} days", epochs_to_elapsed_days(epoch_count))
}

/// True unless both timestamps render as the sentinel date.
pub fn has_activity(first_seen: Option<i64>, last_seen: Option<i64>) -> bool {
    epoch_to_iso_date(first_seen) != EPOCH_SENTINEL
        || epoch_to_iso_date(last_seen) != EPOCH_SENTINEL
}
