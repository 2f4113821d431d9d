//! Wallet settings, amounts and menu model
//!
//! Pure data and conversions. Nothing in here does I/O.

pub mod assets;
pub mod balance;
pub mod denomination;
pub mod menu;
pub mod settings;
pub mod two_factor;

// Re-export main types
pub use assets::{AssetInfo, AssetRegistry};
pub use balance::{AmountInput, Balance, BalanceTag, ExchangeRate};
pub use denomination::DenominationType;
pub use menu::{SettingsAction, SettingsItem, SettingsMenu, SettingsSection, SettingsType, WalletMode};
pub use settings::{
    AutoLockType, BiometryType, Network, ScreenLockType, Settings, SettingsNotifications,
    TransactionPriority, DEFAULT_AUTOLOCK_MINUTES,
};
pub use two_factor::{LimitInput, TwoFactorConfig, TwoFactorConfigLimits, TwoFactorReset};
