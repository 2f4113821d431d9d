//! Liquid asset registry

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

use super::settings::Network;

/// Policy asset (L-BTC) on Liquid mainnet
pub const LIQUID_POLICY_ASSET: &str =
    "6f0279e9ed041c3d710a9f57d0c02928416460c4b722ae3457a11eec381c526d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntity {
    pub domain: String,
}

/// Registry metadata for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub asset_id: String,
    pub name: String,
    #[serde(default)]
    pub precision: Option<u8>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub entity: Option<AssetEntity>,
}

impl AssetInfo {
    pub fn display_ticker(&self) -> &str {
        self.ticker.as_deref().unwrap_or(&self.name)
    }
}

/// Asset metadata and icons as refreshed from the wallet engine
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    pub info: HashMap<String, AssetInfo>,
    pub icons: HashMap<String, String>,
}

impl AssetRegistry {
    /// Build from the engine's refresh payload (`{"assets": {...}, "icons": {...}}`).
    /// The `last_modified` bookkeeping entries are dropped.
    pub fn from_engine(data: &Value) -> Result<Self> {
        let mut assets = data.get("assets").cloned().unwrap_or_else(|| Value::Object(Default::default()));
        let mut icons = data.get("icons").cloned().unwrap_or_else(|| Value::Object(Default::default()));
        for section in [&mut assets, &mut icons] {
            if let Some(map) = section.as_object_mut() {
                map.remove("last_modified");
            }
        }
        Ok(Self {
            info: serde_json::from_value(assets)?,
            icons: serde_json::from_value(icons)?,
        })
    }

    /// Registry key for a balance tag; `btc` means the network's policy asset
    pub fn resolve<'a>(&self, tag: &'a str, network: Network) -> &'a str {
        if tag == "btc" && network.is_liquid() {
            LIQUID_POLICY_ASSET
        } else {
            tag
        }
    }

    pub fn asset(&self, tag: &str, network: Network) -> Option<&AssetInfo> {
        self.info.get(self.resolve(tag, network))
    }

    /// Base64 icon, if the registry has one
    pub fn icon(&self, tag: &str, network: Network) -> Option<&str> {
        self.icons.get(self.resolve(tag, network)).map(String::as_str)
    }
}
