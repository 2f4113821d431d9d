//! Settings menu assembly
//!
//! The menu is a pure function of the wallet mode: watch-only logins,
//! Liquid and accounts with a pending two-factor reset each hide a
//! different subset of entries.

use serde::{Deserialize, Serialize};

use super::{
    settings::{BiometryType, Network, Settings},
    two_factor::TwoFactorConfig,
};

pub const TERMS_OF_USE_URL: &str = "https://blockstream.com/green/terms/";
pub const PRIVACY_POLICY_URL: &str = "https://blockstream.com/green/privacy/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSection {
    Network,
    Account,
    TwoFactor,
    Security,
    Advanced,
    About,
}

impl SettingsSection {
    pub fn title(&self) -> &'static str {
        match self {
            SettingsSection::Network => "Network",
            SettingsSection::Account => "Account",
            SettingsSection::TwoFactor => "Two Factor",
            SettingsSection::Security => "Security",
            SettingsSection::Advanced => "Advanced",
            SettingsSection::About => "About",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsType {
    SetupPin,
    WatchOnly,
    Logout,
    BitcoinDenomination,
    ReferenceExchangeRate,
    SetupTwoFactor,
    ThresholdTwoFactor,
    LockTimeRecovery,
    LockTimeRequest,
    ResetTwoFactor,
    DisputeTwoFactor,
    CancelTwoFactor,
    Mnemonic,
    Autolock,
    Pgp,
    Sweep,
    Version,
    TermsOfUse,
    PrivacyPolicy,
}

/// Dialogs a menu entry can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    Denomination,
    WatchOnly,
    Autolock,
    ResetTwoFactor,
    DisputeTwoFactor,
    LockTimeRecovery,
}

/// What selecting a menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SettingsAction {
    Navigate { screen: &'static str },
    Prompt { prompt: Prompt },
    OpenUrl { url: &'static str },
    Logout,
    CancelTwoFactorReset,
    RequestRecoveryTransactions,
    Nothing,
}

impl SettingsType {
    pub fn action(&self) -> SettingsAction {
        let prompt = |prompt| SettingsAction::Prompt { prompt };
        let navigate = |screen| SettingsAction::Navigate { screen };
        match self {
            SettingsType::BitcoinDenomination => prompt(Prompt::Denomination),
            SettingsType::SetupPin => navigate("screen_lock"),
            SettingsType::Logout => SettingsAction::Logout,
            SettingsType::WatchOnly => prompt(Prompt::WatchOnly),
            SettingsType::ReferenceExchangeRate => navigate("currency"),
            SettingsType::SetupTwoFactor => navigate("setup_two_factor"),
            SettingsType::ThresholdTwoFactor => navigate("two_factor_limit"),
            SettingsType::ResetTwoFactor => prompt(Prompt::ResetTwoFactor),
            SettingsType::DisputeTwoFactor => prompt(Prompt::DisputeTwoFactor),
            SettingsType::CancelTwoFactor => SettingsAction::CancelTwoFactorReset,
            SettingsType::LockTimeRecovery => prompt(Prompt::LockTimeRecovery),
            SettingsType::LockTimeRequest => SettingsAction::RequestRecoveryTransactions,
            SettingsType::Mnemonic => navigate("recovery"),
            SettingsType::Autolock => prompt(Prompt::Autolock),
            SettingsType::Pgp => navigate("pgp"),
            SettingsType::Sweep => navigate("sweep_to_wallets"),
            SettingsType::TermsOfUse => SettingsAction::OpenUrl { url: TERMS_OF_USE_URL },
            SettingsType::PrivacyPolicy => SettingsAction::OpenUrl { url: PRIVACY_POLICY_URL },
            SettingsType::Version => SettingsAction::Nothing,
        }
    }

    /// Entries rendered without a disclosure indicator
    pub fn is_terminal(&self) -> bool {
        matches!(self, SettingsType::Version | SettingsType::Logout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsItem {
    pub title: String,
    pub subtitle: String,
    pub section: SettingsSection,
    #[serde(rename = "type")]
    pub kind: SettingsType,
}

impl SettingsItem {
    fn new(title: impl Into<String>, subtitle: impl Into<String>, section: SettingsSection, kind: SettingsType) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            section,
            kind,
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Everything the menu depends on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletMode {
    #[serde(default)]
    pub watch_only: bool,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub two_factor: Option<TwoFactorConfig>,
    /// Watch-only username, when one is set up
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub settings: Option<Settings>,
    /// Biometric sensor, `None` when the device has none
    #[serde(default)]
    pub biometry: Option<BiometryType>,
    #[serde(default = "default_version")]
    pub version: String,
}

impl WalletMode {
    pub fn is_liquid(&self) -> bool {
        self.network.is_liquid()
    }

    pub fn is_reset_active(&self) -> bool {
        self.two_factor.as_ref().map(|c| c.is_reset_active()).unwrap_or(false)
    }

    pub fn is_dispute_active(&self) -> bool {
        self.two_factor.as_ref().map(|c| c.is_dispute_active()).unwrap_or(false)
    }
}

/// Sections and their entries, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct SettingsMenu {
    pub sections: Vec<SettingsSection>,
    pub items: Vec<SettingsItem>,
}

impl SettingsMenu {
    pub fn assemble(mode: &WalletMode) -> Self {
        let mut items = Vec::new();
        items.extend(network_items(mode));
        items.extend(account_items(mode));
        items.extend(two_factor_items(mode));
        items.extend(security_items(mode));
        items.extend(advanced_items(mode));
        items.extend(about_items(mode));
        Self {
            sections: sections(mode),
            items,
        }
    }

    /// Entries of one section in display order
    pub fn items_in(&self, section: SettingsSection) -> Vec<&SettingsItem> {
        self.items.iter().filter(|i| i.section == section).collect()
    }

    pub fn kinds(&self) -> Vec<SettingsType> {
        self.items.iter().map(|i| i.kind).collect()
    }
}

fn sections(mode: &WalletMode) -> Vec<SettingsSection> {
    use SettingsSection::*;
    if mode.watch_only {
        vec![Network, About]
    } else if mode.is_reset_active() {
        vec![Network, TwoFactor, About]
    } else {
        vec![Network, Account, TwoFactor, Security, Advanced, About]
    }
}

fn network_items(mode: &WalletMode) -> Vec<SettingsItem> {
    let title = match mode.biometry {
        Some(BiometryType::FaceId) => "Set Up PIN and Face ID",
        Some(BiometryType::TouchId) => "Set Up PIN and Touch ID",
        None => "Set Up PIN",
    };
    let setup_pin = SettingsItem::new(title, "", SettingsSection::Network, SettingsType::SetupPin);

    if mode.is_liquid() {
        return vec![setup_pin];
    }
    if mode.watch_only || mode.is_reset_active() {
        return Vec::new();
    }
    let subtitle = match mode.username.as_deref() {
        Some(name) if !name.is_empty() => format!("Enabled: {}", name),
        _ => "Disabled".to_string(),
    };
    let watch_only = SettingsItem::new(
        "Watch-only Login",
        subtitle,
        SettingsSection::Network,
        SettingsType::WatchOnly,
    );
    vec![setup_pin, watch_only]
}

fn account_items(mode: &WalletMode) -> Vec<SettingsItem> {
    let Some(settings) = &mode.settings else {
        return Vec::new();
    };
    if mode.watch_only && mode.is_reset_active() {
        return Vec::new();
    }
    let denomination = SettingsItem::new(
        "Bitcoin Denomination",
        settings.denomination().label(mode.network),
        SettingsSection::Account,
        SettingsType::BitcoinDenomination,
    );
    if mode.is_liquid() {
        return vec![denomination];
    }
    let exchange_rate = SettingsItem::new(
        "Reference Exchange Rate",
        format!(
            "{}/{}",
            settings.currency().unwrap_or_default(),
            capitalize(settings.exchange().unwrap_or_default())
        ),
        SettingsSection::Account,
        SettingsType::ReferenceExchangeRate,
    );
    vec![denomination, exchange_rate]
}

fn two_factor_items(mode: &WalletMode) -> Vec<SettingsItem> {
    let Some(settings) = &mode.settings else {
        return Vec::new();
    };
    let item = |title: &str, subtitle: String, kind| {
        SettingsItem::new(title, subtitle, SettingsSection::TwoFactor, kind)
    };

    if mode.watch_only {
        return Vec::new();
    }
    if mode.is_reset_active() {
        let cancel = item("Cancel Two-Factor Reset", String::new(), SettingsType::CancelTwoFactor);
        if mode.is_dispute_active() {
            return vec![cancel];
        }
        let dispute = item("Dispute Two-Factor Reset", String::new(), SettingsType::DisputeTwoFactor);
        return vec![dispute, cancel];
    }

    let setup = item("Two-Factor Authentication", String::new(), SettingsType::SetupTwoFactor);
    if mode.is_liquid() {
        return vec![setup];
    }

    let mut menu = vec![setup];
    let Some(config) = &mode.two_factor else {
        return menu;
    };
    if config.any_enabled {
        let threshold = config
            .limits
            .threshold_display(settings, mode.network)
            .unwrap_or_default();
        menu.push(item("Two-Factor Threshold", threshold, SettingsType::ThresholdTwoFactor));
        if config.is_method_enabled("email") {
            let status = if settings.lock_time_recovery_enabled() { "Enabled" } else { "Disabled" };
            menu.push(item(
                "Recovery Transaction Emails",
                status.to_string(),
                SettingsType::LockTimeRecovery,
            ));
            menu.push(item(
                "Request Recovery Transactions",
                String::new(),
                SettingsType::LockTimeRequest,
            ));
        }
        menu.push(item("Request Two-Factor Reset", String::new(), SettingsType::ResetTwoFactor));
    }
    menu
}

fn security_items(mode: &WalletMode) -> Vec<SettingsItem> {
    let Some(settings) = &mode.settings else {
        return Vec::new();
    };
    if mode.watch_only || mode.is_reset_active() {
        return Vec::new();
    }
    vec![
        SettingsItem::new("Mnemonic", "", SettingsSection::Security, SettingsType::Mnemonic),
        SettingsItem::new(
            "Auto Logout Timeout",
            settings.autolock().to_string(),
            SettingsSection::Security,
            SettingsType::Autolock,
        ),
    ]
}

fn advanced_items(mode: &WalletMode) -> Vec<SettingsItem> {
    let mut advanced = Vec::new();
    if !mode.watch_only && !mode.is_reset_active() {
        advanced.push(SettingsItem::new("PGP Key", "", SettingsSection::Advanced, SettingsType::Pgp));
    }
    if !mode.is_liquid() {
        advanced.push(SettingsItem::new(
            "Sweep",
            "Sweep from paper wallet",
            SettingsSection::Advanced,
            SettingsType::Sweep,
        ));
    }
    advanced
}

fn about_items(mode: &WalletMode) -> Vec<SettingsItem> {
    vec![
        SettingsItem::new(
            "Version",
            format!("Version {}", mode.version),
            SettingsSection::About,
            SettingsType::Version,
        ),
        SettingsItem::new("Terms of Use", "", SettingsSection::About, SettingsType::TermsOfUse),
        SettingsItem::new("Privacy Policy", "", SettingsSection::About, SettingsType::PrivacyPolicy),
        // logout sits under Network even though it is listed last
        SettingsItem::new(
            format!("{} Network", capitalize(mode.network.name())),
            "Log Out",
            SettingsSection::Network,
            SettingsType::Logout,
        ),
    ]
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::two_factor::{TwoFactorConfigLimits, TwoFactorReset};
    use SettingsType::*;

    fn mode() -> WalletMode {
        WalletMode {
            settings: Some(Settings::default()),
            version: "0.0.1".into(),
            ..Default::default()
        }
    }

    fn two_factor(email: bool) -> TwoFactorConfig {
        TwoFactorConfig {
            any_enabled: true,
            all_methods: vec!["email".into(), "sms".into()],
            enabled_methods: if email { vec!["email".into()] } else { vec!["sms".into()] },
            limits: TwoFactorConfigLimits {
                is_fiat: true,
                fiat: "50.00".into(),
                ..Default::default()
            },
            twofactor_reset: TwoFactorReset::default(),
        }
    }

    fn reset(disputed: bool) -> TwoFactorConfig {
        TwoFactorConfig {
            twofactor_reset: TwoFactorReset {
                is_active: true,
                is_disputed: disputed,
                days_remaining: 30,
            },
            ..two_factor(true)
        }
    }

    #[test]
    fn full_bitcoin_menu() {
        let mut m = mode();
        m.two_factor = Some(two_factor(true));
        m.username = Some("alice".into());
        let menu = SettingsMenu::assemble(&m);
        assert_eq!(menu.sections.len(), 6);
        assert_eq!(
            menu.kinds(),
            vec![
                SetupPin, WatchOnly, BitcoinDenomination, ReferenceExchangeRate, SetupTwoFactor,
                ThresholdTwoFactor, LockTimeRecovery, LockTimeRequest, ResetTwoFactor, Mnemonic,
                Autolock, Pgp, Sweep, Version, TermsOfUse, PrivacyPolicy, Logout,
            ]
        );
        let threshold = menu.items.iter().find(|i| i.kind == ThresholdTwoFactor).unwrap();
        assert_eq!(threshold.subtitle, "50.00 USD");
        let rate = menu.items.iter().find(|i| i.kind == ReferenceExchangeRate).unwrap();
        assert_eq!(rate.subtitle, "USD/Bitfinex");
        assert_eq!(menu.items[1].subtitle, "Enabled: alice");
    }

    #[test]
    fn email_items_need_email_method() {
        let mut m = mode();
        m.two_factor = Some(two_factor(false));
        let kinds = SettingsMenu::assemble(&m).kinds();
        assert!(kinds.contains(&ThresholdTwoFactor));
        assert!(!kinds.contains(&LockTimeRecovery));
        assert!(kinds.contains(&ResetTwoFactor));
    }

    #[test]
    fn watch_only_menu() {
        let mut m = mode();
        m.watch_only = true;
        let menu = SettingsMenu::assemble(&m);
        assert_eq!(menu.sections, vec![SettingsSection::Network, SettingsSection::About]);
        assert_eq!(
            menu.kinds(),
            vec![BitcoinDenomination, ReferenceExchangeRate, Sweep, Version, TermsOfUse, PrivacyPolicy, Logout]
        );
        assert_eq!(menu.items_in(SettingsSection::Network).len(), 1);
    }

    #[test]
    fn reset_active_menu() {
        let mut m = mode();
        m.two_factor = Some(reset(false));
        let menu = SettingsMenu::assemble(&m);
        assert_eq!(
            menu.sections,
            vec![SettingsSection::Network, SettingsSection::TwoFactor, SettingsSection::About]
        );
        let two_factor: Vec<_> = menu
            .items_in(SettingsSection::TwoFactor)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(two_factor, vec![DisputeTwoFactor, CancelTwoFactor]);

        m.two_factor = Some(reset(true));
        let two_factor: Vec<_> = SettingsMenu::assemble(&m)
            .items_in(SettingsSection::TwoFactor)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(two_factor, vec![CancelTwoFactor]);
    }

    #[test]
    fn liquid_menu() {
        let mut m = mode();
        m.network = Network::Liquid;
        m.two_factor = Some(two_factor(true));
        m.biometry = Some(BiometryType::FaceId);
        let menu = SettingsMenu::assemble(&m);
        assert_eq!(
            menu.kinds(),
            vec![SetupPin, BitcoinDenomination, SetupTwoFactor, Mnemonic, Autolock, Pgp, Version, TermsOfUse, PrivacyPolicy, Logout]
        );
        assert_eq!(menu.items[0].title, "Set Up PIN and Face ID");
        assert_eq!(menu.items[1].subtitle, "L-BTC");
        assert_eq!(menu.items.last().unwrap().title, "Liquid Network");
    }

    #[test]
    fn no_settings_hides_dependent_sections() {
        let m = WalletMode::default();
        let kinds = SettingsMenu::assemble(&m).kinds();
        assert_eq!(kinds, vec![SetupPin, WatchOnly, Pgp, Sweep, Version, TermsOfUse, PrivacyPolicy, Logout]);
    }

    #[test]
    fn actions() {
        assert_eq!(TermsOfUse.action(), SettingsAction::OpenUrl { url: TERMS_OF_USE_URL });
        assert_eq!(Autolock.action(), SettingsAction::Prompt { prompt: Prompt::Autolock });
        assert_eq!(Version.action(), SettingsAction::Nothing);
        assert!(Logout.is_terminal());
        assert!(!Sweep.is_terminal());
    }
}
