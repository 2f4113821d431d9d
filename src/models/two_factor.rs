//! Two-factor configuration and spending-threshold limits

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Error, Result};

use super::{
    balance::{parse_fixed, AmountInput, Balance, ExchangeRate},
    denomination::DenominationType,
    settings::{Network, Settings},
};

/// Pending two-factor reset as reported by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorReset {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_disputed: bool,
    #[serde(default)]
    pub days_remaining: i64,
}

/// Spending limit below which no second factor is needed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorConfigLimits {
    pub is_fiat: bool,
    #[serde(default)]
    pub fiat: String,
    #[serde(default)]
    pub btc: String,
    #[serde(default)]
    pub mbtc: String,
    #[serde(default)]
    pub ubtc: String,
    #[serde(default)]
    pub bits: String,
    #[serde(default)]
    pub sats: String,
    #[serde(default)]
    pub satoshi: u64,
}

impl TwoFactorConfigLimits {
    pub fn get(&self, denomination: DenominationType) -> &str {
        match denomination {
            DenominationType::Btc => &self.btc,
            DenominationType::Mbtc => &self.mbtc,
            DenominationType::Ubtc => &self.ubtc,
            DenominationType::Bits => &self.bits,
            DenominationType::Sats => &self.sats,
        }
    }

    /// `(amount, unit)` of the current threshold in the user's units
    pub fn threshold(&self, settings: &Settings, network: Network) -> Result<(String, String)> {
        if self.is_fiat {
            Ok((self.fiat.clone(), settings.currency()?.to_string()))
        } else {
            let denomination = settings.denomination();
            Ok((
                self.get(denomination).to_string(),
                denomination.label(network).to_string(),
            ))
        }
    }

    /// Threshold rendered as `"<amount> <unit>"`
    pub fn threshold_display(&self, settings: &Settings, network: Network) -> Result<String> {
        let (amount, unit) = self.threshold(settings, network)?;
        Ok(format!("{} {}", amount, unit))
    }
}

/// Two-factor state of the account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorConfig {
    #[serde(default)]
    pub any_enabled: bool,
    #[serde(default)]
    pub all_methods: Vec<String>,
    #[serde(default)]
    pub enabled_methods: Vec<String>,
    #[serde(default)]
    pub limits: TwoFactorConfigLimits,
    #[serde(default)]
    pub twofactor_reset: TwoFactorReset,
}

impl TwoFactorConfig {
    pub fn is_reset_active(&self) -> bool {
        self.twofactor_reset.is_active
    }

    pub fn is_dispute_active(&self) -> bool {
        self.twofactor_reset.is_disputed
    }

    pub fn is_method_enabled(&self, method: &str) -> bool {
        self.enabled_methods.iter().any(|m| m == method)
    }
}

/// A threshold the user typed, normalized for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitInput {
    pub is_fiat: bool,
    pub denomination: DenominationType,
    /// Normalized amount: `.` separator, never empty
    pub amount: String,
}

impl LimitInput {
    /// Normalize typed text. `,` becomes `.`, empty reads as `0`,
    /// negative or non-numeric input is rejected, and so is a denominated
    /// amount that does not fit in satoshis.
    pub fn parse(text: &str, is_fiat: bool, denomination: DenominationType) -> Result<Self> {
        let amount = text.trim().replace(',', ".");
        let amount = if amount.is_empty() { "0".to_string() } else { amount };
        let input = Self {
            is_fiat,
            denomination,
            amount,
        };
        if is_fiat {
            // the satoshi range is checked once a rate is known
            parse_fixed(&input.amount, 8)?;
        } else {
            Balance::convert(&input.amount_input(), None)?;
        }
        Ok(input)
    }

    fn amount_input(&self) -> AmountInput {
        if self.is_fiat {
            AmountInput::Fiat(self.amount.clone())
        } else {
            AmountInput::Denominated {
                denomination: self.denomination,
                amount: self.amount.clone(),
            }
        }
    }

    /// Satoshi value of the input
    pub fn satoshi(&self, rate: Option<&ExchangeRate>) -> Result<u64> {
        Ok(Balance::convert(&self.amount_input(), rate)?.satoshi)
    }

    /// Same threshold expressed on the other side of the fiat toggle
    pub fn toggled(&self, rate: &ExchangeRate) -> Result<Self> {
        let balance = Balance::convert(&self.amount_input(), Some(rate))?;
        let amount = if self.is_fiat {
            balance.amount(self.denomination).to_string()
        } else {
            balance
                .fiat
                .ok_or_else(|| Error::MissingRate(rate.currency.clone()))?
        };
        Ok(Self {
            is_fiat: !self.is_fiat,
            denomination: self.denomination,
            amount,
        })
    }

    /// Request body for the engine's set-limit call
    pub fn details(&self) -> Value {
        limit_details(self.is_fiat, &self.amount, self.denomination)
    }
}

/// `{"is_fiat": true, "fiat": amount}` or `{"is_fiat": false, "<unit>": amount}`
pub fn limit_details(is_fiat: bool, amount: &str, denomination: DenominationType) -> Value {
    if is_fiat {
        json!({ "is_fiat": true, "fiat": amount })
    } else {
        let mut details = json!({ "is_fiat": false });
        details[denomination.key()] = Value::String(amount.to_string());
        details
    }
}
