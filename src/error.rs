//! Error types for the settings and conversion layers
//!
//! The screen lock itself never fails: missing settings fall back to the
//! default timeout. Everything that parses user input or touches the
//! settings file reports through this enum.

use std::path::PathBuf;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet shell errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Amount text could not be parsed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount does not fit into the satoshi range
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Fiat conversion requested without a usable exchange rate
    #[error("Missing exchange rate: {0}")]
    MissingRate(String),

    /// Pricing block has no currency
    #[error("Settings pricing has no currency")]
    MissingCurrency,

    /// Denomination key not recognized
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(String),

    /// Conversion input carried zero or several amounts
    #[error("Conversion needs exactly one amount, got {0}")]
    AmbiguousAmount(usize),

    /// Settings file could not be read or written
    #[error("Settings I/O error at {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file contents are not valid
    #[error("Settings format error: {0}")]
    SettingsFormat(#[from] serde_json::Error),
}
