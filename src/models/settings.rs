//! Wallet settings document and the enums derived from it

use std::{collections::HashMap, fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

use super::denomination::DenominationType;

/// Autolock timeout applied when no settings are stored
pub const DEFAULT_AUTOLOCK_MINUTES: u32 = 5;

/// Network the wallet is connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Liquid,
}

impl Network {
    pub fn is_liquid(&self) -> bool {
        matches!(self, Network::Liquid)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Liquid => "liquid",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Email notification toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsNotifications {
    pub email_incoming: bool,
    pub email_outgoing: bool,
}

impl SettingsNotifications {
    pub fn all(enabled: bool) -> Self {
        Self {
            email_incoming: enabled,
            email_outgoing: enabled,
        }
    }
}

/// Settings as the wallet engine stores them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub required_num_blocks: u32,
    /// Autolock timeout in minutes
    pub altimeout: u32,
    /// Denomination label, Bitcoin-network form (`BTC`, `mBTC`, ...)
    pub unit: String,
    pub pricing: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fee_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgp: Option<String>,
    #[serde(default)]
    pub sound: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<SettingsNotifications>,
}

impl Settings {
    pub fn denomination(&self) -> DenominationType {
        DenominationType::ALL
            .into_iter()
            .find(|d| d.btc_label() == self.unit)
            .unwrap_or_default()
    }

    pub fn set_denomination(&mut self, denomination: DenominationType) {
        self.unit = denomination.btc_label().to_string();
    }

    pub fn transaction_priority(&self) -> TransactionPriority {
        TransactionPriority::from_blocks(self.required_num_blocks).unwrap_or(TransactionPriority::Medium)
    }

    pub fn set_transaction_priority(&mut self, priority: TransactionPriority) {
        self.required_num_blocks = priority.blocks();
    }

    pub fn autolock(&self) -> AutoLockType {
        AutoLockType::from_minutes(self.altimeout).unwrap_or(AutoLockType::FiveMinutes)
    }

    pub fn set_autolock(&mut self, autolock: AutoLockType) {
        self.altimeout = autolock.minutes();
    }

    /// Autolock timeout as stored, without snapping to an [`AutoLockType`]
    pub fn autolock_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.altimeout) * 60)
    }

    pub fn currency(&self) -> Result<&str> {
        self.pricing
            .get("currency")
            .map(String::as_str)
            .ok_or(Error::MissingCurrency)
    }

    pub fn exchange(&self) -> Option<&str> {
        self.pricing.get("exchange").map(String::as_str)
    }

    /// Whether outgoing-email notifications (recovery transaction emails) are on
    pub fn lock_time_recovery_enabled(&self) -> bool {
        self.notifications.map(|n| n.email_outgoing).unwrap_or(false)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut pricing = HashMap::new();
        pricing.insert("currency".to_string(), "USD".to_string());
        pricing.insert("exchange".to_string(), "bitfinex".to_string());
        Self {
            required_num_blocks: TransactionPriority::Medium.blocks(),
            altimeout: DEFAULT_AUTOLOCK_MINUTES,
            unit: DenominationType::Btc.btc_label().to_string(),
            pricing,
            custom_fee_rate: None,
            pgp: None,
            sound: false,
            notifications: None,
        }
    }
}

/// Autolock choices offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoLockType {
    Minute,
    TwoMinutes,
    FiveMinutes,
    TenMinutes,
    SixtyMinutes,
}

impl AutoLockType {
    pub const ALL: [AutoLockType; 5] = [
        AutoLockType::Minute,
        AutoLockType::TwoMinutes,
        AutoLockType::FiveMinutes,
        AutoLockType::TenMinutes,
        AutoLockType::SixtyMinutes,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            AutoLockType::Minute => 1,
            AutoLockType::TwoMinutes => 2,
            AutoLockType::FiveMinutes => 5,
            AutoLockType::TenMinutes => 10,
            AutoLockType::SixtyMinutes => 60,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.minutes() == minutes)
    }

    /// Parse a display string; unrecognized input maps to ten minutes
    pub fn from_display(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|a| a.to_string() == value)
            .unwrap_or(AutoLockType::TenMinutes)
    }
}

impl fmt::Display for AutoLockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoLockType::Minute => write!(f, "1 minute"),
            other => write!(f, "{} minutes", other.minutes()),
        }
    }
}

/// Fee priority expressed as a confirmation target in blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionPriority {
    Low,
    Medium,
    High,
    Custom,
}

impl TransactionPriority {
    pub fn blocks(&self) -> u32 {
        match self {
            TransactionPriority::Low => 24,
            TransactionPriority::Medium => 12,
            TransactionPriority::High => 3,
            TransactionPriority::Custom => 0,
        }
    }

    pub fn from_blocks(blocks: u32) -> Option<Self> {
        match blocks {
            24 => Some(TransactionPriority::Low),
            12 => Some(TransactionPriority::Medium),
            3 => Some(TransactionPriority::High),
            0 => Some(TransactionPriority::Custom),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionPriority::Low => "Slow",
            TransactionPriority::Medium => "Medium",
            TransactionPriority::High => "Fast",
            TransactionPriority::Custom => "Custom",
        }
    }

    /// Reverse of [`label`](Self::label); unknown labels are Medium
    pub fn from_label(label: &str) -> Self {
        [
            TransactionPriority::Low,
            TransactionPriority::Medium,
            TransactionPriority::High,
            TransactionPriority::Custom,
        ]
        .into_iter()
        .find(|p| p.label() == label)
        .unwrap_or(TransactionPriority::Medium)
    }

    /// Expected confirmation time, e.g. `"2 hours"` or `"30 minutes"`
    pub fn time(&self, network: Network) -> String {
        let blocks_per_hour = if network.is_liquid() { 60 } else { 6 };
        let blocks = self.blocks();
        if blocks % blocks_per_hour == 0 {
            let hours = blocks / blocks_per_hour;
            let unit = if blocks == blocks_per_hour { "hour" } else { "hours" };
            format!("{} {}", hours, unit)
        } else {
            format!("{} minutes", blocks * (60 / blocks_per_hour))
        }
    }

    pub fn description(&self, network: Network) -> String {
        format!(
            "Confirmation in {} blocks, {} on average",
            self.blocks(),
            self.time(network)
        )
    }
}

/// How the wallet is protected on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenLockType {
    None,
    Pin,
    TouchId,
    FaceId,
    All,
}

/// Kind of biometric sensor on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometryType {
    TouchId,
    FaceId,
}

impl ScreenLockType {
    /// Derive the lock type from the stored authentication methods
    pub fn from_auth(pin: bool, biometric: bool, biometry: BiometryType) -> Self {
        match (pin, biometric) {
            (true, true) => ScreenLockType::All,
            (false, true) => match biometry {
                BiometryType::FaceId => ScreenLockType::FaceId,
                BiometryType::TouchId => ScreenLockType::TouchId,
            },
            (true, false) => ScreenLockType::Pin,
            (false, false) => ScreenLockType::None,
        }
    }

    pub fn has_pin(&self) -> bool {
        matches!(self, ScreenLockType::Pin | ScreenLockType::All)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScreenLockType::None => "None",
            ScreenLockType::Pin => "Pin",
            ScreenLockType::TouchId => "Touch ID",
            ScreenLockType::FaceId => "Face ID",
            ScreenLockType::All => "",
        }
    }
}

impl Default for ScreenLockType {
    fn default() -> Self {
        ScreenLockType::None
    }
}
