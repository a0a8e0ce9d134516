//! Persisted user settings for dirfix.
//!
//! The engine never owns its settings: it reads a snapshot through the
//! [`SettingsStore`] trait before each operation and writes flags back
//! through the same trait. Writes are fire-and-forget from the engine's
//! point of view; a store error is logged at the call site and the engine
//! proceeds as if disabled.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors from reading or writing a settings store.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read or written.
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file exists but is not valid TOML.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application policy: style immediately or tag for a later manual pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Auto,
    Manual,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Mode::Auto),
            "manual" => Ok(Mode::Manual),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

/// The persisted settings record.
///
/// Every field has a serde default so a missing key in a stored file reads
/// as its documented default; in particular an absent `enabled` reads as
/// true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master switch for all processing.
    pub enabled: bool,
    /// Automatic styling or tag-then-apply-manually.
    pub mode: Mode,
    /// Hostnames excluded from all processing.
    pub blacklist: Vec<String>,
    /// Monotonic flag: true once any visual change was applied, cleared
    /// only by the revert operation.
    pub changes_applied: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: Mode::Auto,
            blacklist: Vec::new(),
            changes_applied: false,
        }
    }
}

impl Settings {
    pub fn is_blacklisted(&self, host: &str) -> bool {
        self.blacklist.iter().any(|h| h == host)
    }
}

/// Key-value settings collaborator.
///
/// The engine treats this as an external service: reads produce a snapshot
/// that may already be stale by the time it is acted on, and the engine
/// never awaits confirmation of a write. The next snapshot converges.
pub trait SettingsStore {
    /// Current settings, as a point-in-time copy.
    fn snapshot(&self) -> Result<Settings>;

    fn set_enabled(&self, enabled: bool) -> Result<()>;
    fn set_mode(&self, mode: Mode) -> Result<()>;
    fn set_changes_applied(&self, applied: bool) -> Result<()>;
    fn set_blacklist(&self, blacklist: Vec<String>) -> Result<()>;

    /// Flip the enabled flag and return the new value. An unreadable
    /// store counts as currently enabled, so the first toggle on a broken
    /// or empty store turns the engine off.
    fn toggle_enabled(&self) -> Result<bool> {
        let current = self.snapshot().map(|s| s.enabled).unwrap_or(true);
        let next = !current;
        self.set_enabled(next)?;
        Ok(next)
    }

    /// Add `host` to the blacklist unless already present.
    fn add_to_blacklist(&self, host: &str) -> Result<()> {
        let mut settings = self.snapshot()?;
        if !settings.is_blacklisted(host) {
            settings.blacklist.push(host.to_string());
            self.set_blacklist(settings.blacklist)?;
        }
        Ok(())
    }

    /// Remove `host` from the blacklist if present.
    fn remove_from_blacklist(&self, host: &str) -> Result<()> {
        let mut settings = self.snapshot()?;
        let before = settings.blacklist.len();
        settings.blacklist.retain(|h| h != host);
        if settings.blacklist.len() != before {
            self.set_blacklist(settings.blacklist)?;
        }
        Ok(())
    }
}

/// In-process store; the default for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RefCell<Settings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RefCell::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn snapshot(&self) -> Result<Settings> {
        Ok(self.settings.borrow().clone())
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.settings.borrow_mut().enabled = enabled;
        Ok(())
    }

    fn set_mode(&self, mode: Mode) -> Result<()> {
        self.settings.borrow_mut().mode = mode;
        Ok(())
    }

    fn set_changes_applied(&self, applied: bool) -> Result<()> {
        self.settings.borrow_mut().changes_applied = applied;
        Ok(())
    }

    fn set_blacklist(&self, blacklist: Vec<String>) -> Result<()> {
        self.settings.borrow_mut().blacklist = blacklist;
        Ok(())
    }
}

/// TOML-file-backed store. A missing file reads as default settings;
/// every setter persists the whole record immediately.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<Settings> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut settings = self.load()?;
        f(&mut settings);
        self.save(&settings)
    }
}

impl SettingsStore for FileStore {
    fn snapshot(&self) -> Result<Settings> {
        self.load()
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|s| s.enabled = enabled)
    }

    fn set_mode(&self, mode: Mode) -> Result<()> {
        self.update(|s| s.mode = mode)
    }

    fn set_changes_applied(&self, applied: bool) -> Result<()> {
        self.update(|s| s.changes_applied = applied)
    }

    fn set_blacklist(&self, blacklist: Vec<String>) -> Result<()> {
        self.update(|s| s.blacklist = blacklist)
    }
}
