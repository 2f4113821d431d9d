//! Bitcoin denominations and their per-network labels

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

use super::settings::Network;

/// Display unit for bitcoin amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenominationType {
    Btc,
    Mbtc,
    Ubtc,
    Bits,
    Sats,
}

impl DenominationType {
    /// All denominations in picker order
    pub const ALL: [DenominationType; 5] = [
        DenominationType::Btc,
        DenominationType::Mbtc,
        DenominationType::Ubtc,
        DenominationType::Bits,
        DenominationType::Sats,
    ];

    /// Key used by the wallet engine (`btc`, `mbtc`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            DenominationType::Btc => "btc",
            DenominationType::Mbtc => "mbtc",
            DenominationType::Ubtc => "ubtc",
            DenominationType::Bits => "bits",
            DenominationType::Sats => "sats",
        }
    }

    /// Parse an engine key
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.key() == key)
            .ok_or_else(|| Error::UnknownDenomination(key.to_string()))
    }

    /// Label on the Bitcoin network; this is what `Settings::unit` stores
    pub fn btc_label(&self) -> &'static str {
        match self {
            DenominationType::Btc => "BTC",
            DenominationType::Mbtc => "mBTC",
            DenominationType::Ubtc => "µBTC",
            DenominationType::Bits => "bits",
            DenominationType::Sats => "sats",
        }
    }

    /// Label on Liquid
    pub fn liquid_label(&self) -> &'static str {
        match self {
            DenominationType::Btc => "L-BTC",
            DenominationType::Mbtc => "L-mBTC",
            DenominationType::Ubtc => "L-µBTC",
            DenominationType::Bits => "L-bits",
            DenominationType::Sats => "L-sats",
        }
    }

    /// Label for the given network
    pub fn label(&self, network: Network) -> &'static str {
        if network.is_liquid() {
            self.liquid_label()
        } else {
            self.btc_label()
        }
    }

    /// Reverse of [`label`](Self::label); anything unrecognized is BTC
    pub fn from_label(label: &str, network: Network) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| d.label(network) == label)
            .unwrap_or(DenominationType::Btc)
    }

    /// Number of fractional digits shown for this unit
    pub fn decimals(&self) -> u32 {
        match self {
            DenominationType::Btc => 8,
            DenominationType::Mbtc => 5,
            DenominationType::Ubtc | DenominationType::Bits => 2,
            DenominationType::Sats => 0,
        }
    }

    /// Satoshis per whole unit
    pub fn satoshi_per_unit(&self) -> u64 {
        10u64.pow(self.decimals())
    }
}

impl Default for DenominationType {
    fn default() -> Self {
        DenominationType::Btc
    }
}
