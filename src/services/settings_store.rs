//! Persisted settings collaborators
//!
//! The screen locker asks the store for the autolock timeout on every
//! evaluation; nothing here caches, so a change written between two
//! lifecycle signals is honored by the second one.
//!
//! `FileSettingsStore` reads synchronously, and the locker calls it while
//! holding the `AppState` mutex from async handlers. The file is a few
//! hundred bytes and only read when a countdown is evaluated, so the
//! blocking read is accepted rather than moved to `spawn_blocking`.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    models::{ScreenLockType, Settings, DEFAULT_AUTOLOCK_MINUTES},
    Error, Result,
};

/// Timeout used when no settings are stored
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_AUTOLOCK_MINUTES as u64 * 60);

/// On-disk layout of the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPreferences {
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub screen_lock: ScreenLockType,
}

pub trait SettingsStore: Send + Sync + fmt::Debug {
    /// Current wallet settings, `None` when nothing usable is stored
    fn settings(&self) -> Option<Settings>;

    /// How the wallet is protected on this device
    fn screen_lock(&self) -> ScreenLockType;

    /// Replace the stored wallet settings
    fn save(&self, settings: Settings) -> Result<()>;

    /// Autolock timeout, read fresh
    fn timeout(&self) -> Duration {
        match self.settings() {
            Some(settings) => settings.autolock_timeout(),
            None => {
                debug!("No settings stored, using default autolock timeout");
                DEFAULT_TIMEOUT
            }
        }
    }
}

/// JSON file store, re-read on every access
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file. A missing file is empty preferences, not an error.
    pub fn load(&self) -> Result<StoredPreferences> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredPreferences::default()),
            Err(source) => Err(Error::SettingsIo {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn load_or_warn(&self) -> StoredPreferences {
        self.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings file {}: {}", self.path.display(), e);
            StoredPreferences::default()
        })
    }

    pub fn write(&self, prefs: &StoredPreferences) -> Result<()> {
        let io_err = |source| Error::SettingsIo {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(prefs)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn settings(&self) -> Option<Settings> {
        self.load_or_warn().settings
    }

    fn screen_lock(&self) -> ScreenLockType {
        self.load_or_warn().screen_lock
    }

    fn save(&self, settings: Settings) -> Result<()> {
        // keep screen_lock even when the current file is damaged
        let mut prefs = self.load_or_warn();
        prefs.settings = Some(settings);
        self.write(&prefs)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    prefs: RwLock<StoredPreferences>,
}

impl MemorySettingsStore {
    pub fn new(settings: Option<Settings>, screen_lock: ScreenLockType) -> Self {
        Self {
            prefs: RwLock::new(StoredPreferences {
                settings,
                screen_lock,
            }),
        }
    }

    /// Drop stored settings, as after a logout
    pub fn clear(&self) {
        if let Ok(mut prefs) = self.prefs.write() {
            prefs.settings = None;
        }
    }

    pub fn set_screen_lock(&self, screen_lock: ScreenLockType) {
        if let Ok(mut prefs) = self.prefs.write() {
            prefs.screen_lock = screen_lock;
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn settings(&self) -> Option<Settings> {
        self.prefs.read().ok().and_then(|p| p.settings.clone())
    }

    fn screen_lock(&self) -> ScreenLockType {
        self.prefs.read().map(|p| p.screen_lock).unwrap_or_default()
    }

    fn save(&self, settings: Settings) -> Result<()> {
        if let Ok(mut prefs) = self.prefs.write() {
            prefs.settings = Some(settings);
        }
        Ok(())
    }
}
