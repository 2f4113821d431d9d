//! Satoshi, denomination and fiat conversion
//!
//! Amounts move through fixed-point integers only. Denominated amounts are
//! scaled by the unit's decimal count (which is also log10 of satoshis per
//! unit), fiat amounts and rates by 10^8.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

use super::{assets::AssetInfo, denomination::DenominationType, settings::Network};

const FIAT_SCALE: u32 = 8;
const FIAT_DISPLAY_DECIMALS: u32 = 2;

/// Price of one BTC in a fiat currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub currency: String,
    #[serde(default)]
    pub exchange: String,
    /// Decimal string, e.g. `"27123.45"`
    pub rate: String,
}

impl ExchangeRate {
    fn rate_e8(&self) -> Result<u128> {
        let rate = parse_fixed(&self.rate, FIAT_SCALE)?;
        if rate == 0 {
            return Err(Error::MissingRate(format!("zero rate for {}", self.currency)));
        }
        Ok(rate)
    }
}

/// The single amount a conversion starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountInput {
    Satoshi(u64),
    Denominated {
        denomination: DenominationType,
        amount: String,
    },
    Fiat(String),
}

impl AmountInput {
    /// Build from an engine-style details object such as `{"mbtc": "1.5"}`
    pub fn from_details(details: &Map<String, Value>) -> Result<Self> {
        let mut found = Vec::new();
        for (key, value) in details {
            let input = match key.as_str() {
                "satoshi" => {
                    let sat = value
                        .as_u64()
                        .ok_or_else(|| Error::InvalidAmount(value.to_string()))?;
                    AmountInput::Satoshi(sat)
                }
                "fiat" => AmountInput::Fiat(value_as_text(value)?),
                other => match DenominationType::from_key(other) {
                    Ok(denomination) => AmountInput::Denominated {
                        denomination,
                        amount: value_as_text(value)?,
                    },
                    // unrelated keys such as "is_fiat" are ignored
                    Err(_) => continue,
                },
            };
            found.push(input);
        }
        if found.len() != 1 {
            return Err(Error::AmbiguousAmount(found.len()));
        }
        Ok(found.remove(0))
    }
}

fn value_as_text(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::InvalidAmount(other.to_string())),
    }
}

/// What [`Balance::get`] should render
#[derive(Debug, Clone, Copy)]
pub enum BalanceTag<'a> {
    Btc,
    Fiat,
    Asset(&'a AssetInfo),
}

/// An amount rendered in every unit the wallet can display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub satoshi: u64,
    pub btc: String,
    pub mbtc: String,
    pub ubtc: String,
    pub bits: String,
    pub sats: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat_rate: Option<String>,
}

impl Balance {
    /// Convert `input` into every display unit. Fiat output needs `rate`.
    pub fn convert(input: &AmountInput, rate: Option<&ExchangeRate>) -> Result<Self> {
        let satoshi = match input {
            AmountInput::Satoshi(sat) => *sat,
            AmountInput::Denominated { denomination, amount } => {
                to_u64(parse_fixed(amount, denomination.decimals())?, amount)?
            }
            AmountInput::Fiat(amount) => {
                let rate = rate.ok_or_else(|| Error::MissingRate("fiat amount given".into()))?;
                let fiat_e8 = parse_fixed(amount, FIAT_SCALE)?;
                let sat = fiat_e8
                    .checked_mul(DenominationType::Btc.satoshi_per_unit() as u128)
                    .ok_or_else(|| Error::AmountOverflow(amount.clone()))?
                    / rate.rate_e8()?;
                to_u64(sat, amount)?
            }
        };
        Self::from_satoshi(satoshi, rate)
    }

    pub fn from_satoshi(satoshi: u64, rate: Option<&ExchangeRate>) -> Result<Self> {
        let render = |d: DenominationType| format_fixed(satoshi as u128, d.decimals());
        let fiat = match rate {
            Some(rate) => {
                // cents = sat * rate_e8 / 10^14, half up
                let divisor = 10u128.pow(FIAT_SCALE + FIAT_SCALE - FIAT_DISPLAY_DECIMALS);
                let scaled = (satoshi as u128)
                    .checked_mul(rate.rate_e8()?)
                    .ok_or_else(|| Error::AmountOverflow(satoshi.to_string()))?;
                let cents = (scaled + divisor / 2) / divisor;
                Some(format_fixed(cents, FIAT_DISPLAY_DECIMALS))
            }
            None => None,
        };
        Ok(Self {
            satoshi,
            btc: render(DenominationType::Btc),
            mbtc: render(DenominationType::Mbtc),
            ubtc: render(DenominationType::Ubtc),
            bits: render(DenominationType::Bits),
            sats: render(DenominationType::Sats),
            fiat,
            fiat_currency: rate.map(|r| r.currency.clone()),
            fiat_rate: rate.map(|r| r.rate.clone()),
        })
    }

    /// Amount string in the given denomination
    pub fn amount(&self, denomination: DenominationType) -> &str {
        match denomination {
            DenominationType::Btc => &self.btc,
            DenominationType::Mbtc => &self.mbtc,
            DenominationType::Ubtc => &self.ubtc,
            DenominationType::Bits => &self.bits,
            DenominationType::Sats => &self.sats,
        }
    }

    /// `(amount, unit label)` for display
    pub fn get(&self, tag: BalanceTag<'_>, denomination: DenominationType, network: Network) -> (String, String) {
        match tag {
            BalanceTag::Btc => (
                self.amount(denomination).to_string(),
                denomination.label(network).to_string(),
            ),
            BalanceTag::Fiat => (
                self.fiat.clone().unwrap_or_default(),
                self.fiat_currency.clone().unwrap_or_default(),
            ),
            BalanceTag::Asset(asset) => (
                format_fixed(self.satoshi as u128, u32::from(asset.precision.unwrap_or(0))),
                asset.display_ticker().to_string(),
            ),
        }
    }
}

fn to_u64(value: u128, original: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::AmountOverflow(original.to_string()))
}

/// Parse a non-negative decimal string into an integer scaled by 10^scale.
///
/// `,` is accepted as the decimal separator and empty input reads as zero.
pub fn parse_fixed(text: &str, scale: u32) -> Result<u128> {
    let normalized = text.trim().replace(',', ".");
    let normalized = if normalized.is_empty() { "0".to_string() } else { normalized };
    let invalid = || Error::InvalidAmount(text.to_string());

    let (int_part, frac_part) = match normalized.split_once('.') {
        Some((i, f)) => (i, f),
        None => (normalized.as_str(), ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }
    if frac_part.len() > scale as usize {
        return Err(Error::InvalidAmount(format!(
            "{} has more than {} decimals",
            text, scale
        )));
    }

    let overflow = || Error::AmountOverflow(text.to_string());
    let mut value: u128 = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        let digit = u128::from(c as u8 - b'0');
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(overflow)?;
    }
    let padding = scale - frac_part.len() as u32;
    value.checked_mul(10u128.pow(padding)).ok_or_else(overflow)
}

/// Render an integer scaled by 10^scale with exactly `scale` decimals.
///
/// Works on the digit string, so any `scale` is accepted, including asset
/// precisions beyond what a `u128` power of ten can hold.
pub fn format_fixed(value: u128, scale: u32) -> String {
    let digits = value.to_string();
    let scale = scale as usize;
    if scale == 0 {
        return digits;
    }
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{}.{}", int_part, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn usd(rate: &str) -> ExchangeRate {
        ExchangeRate {
            currency: "USD".into(),
            exchange: "bitstamp".into(),
            rate: rate.into(),
        }
    }

    #[test]
    fn satoshi_renders_every_unit() {
        let b = Balance::from_satoshi(123_456_789, None).unwrap();
        assert_eq!(b.btc, "1.23456789");
        assert_eq!(b.mbtc, "1234.56789");
        assert_eq!(b.ubtc, "1234567.89");
        assert_eq!(b.bits, "1234567.89");
        assert_eq!(b.sats, "123456789");
        assert!(b.fiat.is_none());
    }

    #[test]
    fn denominated_input_is_exact() {
        let input = AmountInput::Denominated {
            denomination: DenominationType::Mbtc,
            amount: "0,00001".into(),
        };
        assert_eq!(Balance::convert(&input, None).unwrap().satoshi, 1);

        let too_precise = AmountInput::Denominated {
            denomination: DenominationType::Bits,
            amount: "1.005".into(),
        };
        assert!(Balance::convert(&too_precise, None).is_err());
    }

    #[test]
    fn fiat_round_trip() {
        let rate = usd("20000");
        let b = Balance::from_satoshi(100_000, Some(&rate)).unwrap();
        assert_eq!(b.fiat.as_deref(), Some("20.00"));

        let back = Balance::convert(&AmountInput::Fiat("20".into()), Some(&rate)).unwrap();
        assert_eq!(back.satoshi, 100_000);
    }

    #[test]
    fn fiat_rounds_half_up() {
        // 1 sat at 50000 USD/BTC = 0.0005 USD
        let b = Balance::from_satoshi(1, Some(&usd("50000"))).unwrap();
        assert_eq!(b.fiat.as_deref(), Some("0.00"));
        let b = Balance::from_satoshi(10, Some(&usd("50000"))).unwrap();
        assert_eq!(b.fiat.as_deref(), Some("0.01"));
    }

    #[test]
    fn fiat_without_rate_fails() {
        let err = Balance::convert(&AmountInput::Fiat("1".into()), None).unwrap_err();
        assert!(matches!(err, Error::MissingRate(_)));
        let err = Balance::convert(&AmountInput::Fiat("1".into()), Some(&usd("0"))).unwrap_err();
        assert!(matches!(err, Error::MissingRate(_)));
    }

    #[test]
    fn parse_rules() {
        assert_eq!(parse_fixed("", 2).unwrap(), 0);
        assert_eq!(parse_fixed("1,5", 2).unwrap(), 150);
        assert_eq!(parse_fixed(".5", 2).unwrap(), 50);
        assert_eq!(parse_fixed("7.", 2).unwrap(), 700);
        assert!(parse_fixed("-1", 2).is_err());
        assert!(parse_fixed("1.2.3", 2).is_err());
        assert!(parse_fixed("abc", 2).is_err());
        assert!(parse_fixed(".", 2).is_err());
        assert!(matches!(
            parse_fixed("99999999999999999999999999999999999999999", 8),
            Err(Error::AmountOverflow(_))
        ));
    }

    #[test]
    fn details_need_exactly_one_amount() {
        let details = json!({"is_fiat": false, "mbtc": "2"});
        let input = AmountInput::from_details(details.as_object().unwrap()).unwrap();
        assert_eq!(
            input,
            AmountInput::Denominated {
                denomination: DenominationType::Mbtc,
                amount: "2".into()
            }
        );

        let details = json!({"satoshi": 5, "fiat": "1"});
        assert!(matches!(
            AmountInput::from_details(details.as_object().unwrap()),
            Err(Error::AmbiguousAmount(2))
        ));
    }

    #[test]
    fn get_uses_network_labels() {
        let b = Balance::from_satoshi(2_500, Some(&usd("40000"))).unwrap();
        assert_eq!(
            b.get(BalanceTag::Btc, DenominationType::Bits, Network::Liquid),
            ("25.00".to_string(), "L-bits".to_string())
        );
        assert_eq!(
            b.get(BalanceTag::Fiat, DenominationType::Btc, Network::Mainnet),
            ("1.00".to_string(), "USD".to_string())
        );
    }

    #[test]
    fn format_fixed_handles_any_scale() {
        assert_eq!(format_fixed(0, 8), "0.00000000");
        assert_eq!(format_fixed(150_000_000, 8), "1.50000000");
        assert_eq!(format_fixed(42, 0), "42");
        assert_eq!(format_fixed(u128::MAX, 39).len(), u128::MAX.to_string().len() + 2);
    }

    #[test]
    fn get_asset_with_huge_precision() {
        let asset = AssetInfo {
            asset_id: "cd".repeat(32),
            name: "Odd Token".into(),
            precision: Some(40),
            ticker: Some("ODD".into()),
            entity: None,
        };
        let b = Balance::from_satoshi(150_000_000, None).unwrap();
        let (amount, ticker) = b.get(BalanceTag::Asset(&asset), DenominationType::Btc, Network::Liquid);
        assert_eq!(ticker, "ODD");
        assert_eq!(amount.len(), 42);
        assert!(amount.starts_with("0.0000"));
        assert!(amount.ends_with("150000000"));
    }

    #[test]
    fn get_asset_uses_precision() {
        let asset = AssetInfo {
            asset_id: "ab".repeat(32),
            name: "Tether USD".into(),
            precision: Some(8),
            ticker: Some("USDt".into()),
            entity: None,
        };
        let b = Balance::from_satoshi(150_000_000, None).unwrap();
        assert_eq!(
            b.get(BalanceTag::Asset(&asset), DenominationType::Btc, Network::Liquid),
            ("1.50000000".to_string(), "USDt".to_string())
        );
    }
}
