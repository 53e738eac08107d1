use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Display and consensus parameters of a Zond network.
///
/// Epoch timing is a fixed network parameter: if a network changes its slot
/// or epoch length it gets a new definition here, the explorer never infers
/// it from observed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub name: Cow<'static, str>,
    pub symbol: Cow<'static, str>,
    pub decimals: u8,
    pub slots_per_epoch: u64,
    pub seconds_per_slot: u64,
    pub address_prefix: char,
}

const SECONDS_PER_DAY: f64 = 86_400.0;

impl NetworkParams {
    /// Wall-clock duration of one epoch, saturating at `u64::MAX`.
    pub fn seconds_per_epoch(&self) -> u64 {
        self.slots_per_epoch.saturating_mul(self.seconds_per_slot)
    }

    /// Converts a count of epochs into elapsed days.
    pub fn epochs_to_elapsed_days(&self, epoch_count: u64) -> f64 {
        epoch_count as f64 * self.seconds_per_epoch() as f64 / SECONDS_PER_DAY
    }
}

/// Zond mainnet.
pub const ZOND_MAINNET: NetworkParams = NetworkParams {
    name: Cow::Borrowed("mainnet"),
    symbol: Cow::Borrowed("QRL"),
    decimals: 18,
    slots_per_epoch: 128,
    seconds_per_slot: 60,
    address_prefix: 'Z',
};

/// Zond public testnet.
pub const ZOND_TESTNET: NetworkParams = NetworkParams {
    name: Cow::Borrowed("testnet"),
    symbol: Cow::Borrowed("QRL"),
    decimals: 18,
    slots_per_epoch: 128,
    seconds_per_slot: 60,
    address_prefix: 'Z',
};

const ALL_NETWORKS: &[&NetworkParams] = &[&ZOND_MAINNET, &ZOND_TESTNET];

/// Returns the network definition for a name, or `None` if unknown.
pub fn get_network(name: &str) -> Option<&'static NetworkParams> {
    ALL_NETWORKS
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name))
        .copied()
}
