use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// File name probed in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lockbox-migrate.toml";

/// Engine settings the CLI resolves from flags, file, and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Lock acquisition attempts before giving up with `LockContention`.
    pub lock_attempts: u32,
    /// Pause between lock attempts.
    pub lock_retry: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lock_attempts: 10,
            lock_retry: Duration::from_millis(500),
        }
    }
}

/// Optional TOML config file. Precedence: CLI flag > file > default.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub database: Option<PathBuf>,
    pub lock_attempts: Option<u32>,
    pub lock_retry_ms: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Folds the file's lock settings over the defaults.
    #[must_use]
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            lock_attempts: self.lock_attempts.unwrap_or(defaults.lock_attempts),
            lock_retry: self
                .lock_retry_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.lock_retry),
        }
    }
}
