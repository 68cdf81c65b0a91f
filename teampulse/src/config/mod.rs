//! Configuration system for the `TeamPulse` host.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/teampulse/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use teampulse_model::role::UserRole;

use crate::session::{DEFAULT_USER, Session};
use crate::store::StoreOptions;
use crate::sweeper::SweepConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A value was syntactically valid but not usable.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Config key that was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    activity: ActivityFileConfig,
    session: SessionFileConfig,
}

/// `[activity]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ActivityFileConfig {
    inactivity_threshold_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
    progress_counts_as_activity: Option<bool>,
    listener_capacity: Option<usize>,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    role: Option<String>,
    current_user: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved host configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Activity --
    /// Idle time after which a member is marked offline.
    pub inactivity_threshold: Duration,
    /// How often the inactivity sweep runs.
    pub sweep_interval: Duration,
    /// Whether task progress updates refresh the assignee's activity.
    pub progress_counts_as_activity: bool,
    /// Queue size for the activity listener.
    pub listener_capacity: usize,

    // -- Session --
    /// Initial viewer role.
    pub role: UserRole,
    /// Display name of the logged-in user.
    pub current_user: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(60),
            progress_counts_as_activity: true,
            listener_capacity: 64,
            role: UserRole::Member,
            current_user: DEFAULT_USER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed, or if any resolved value is unusable.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let role = match cli.role.as_deref().or(file.session.role.as_deref()) {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                field: "session.role",
                reason: format!("{e}"),
            })?,
            None => defaults.role,
        };

        let config = Self {
            inactivity_threshold: cli
                .inactivity_threshold_secs
                .or(file.activity.inactivity_threshold_secs)
                .map_or(defaults.inactivity_threshold, Duration::from_secs),
            sweep_interval: cli
                .sweep_interval_secs
                .or(file.activity.sweep_interval_secs)
                .map_or(defaults.sweep_interval, Duration::from_secs),
            progress_counts_as_activity: file
                .activity
                .progress_counts_as_activity
                .unwrap_or(defaults.progress_counts_as_activity),
            listener_capacity: file
                .activity
                .listener_capacity
                .unwrap_or(defaults.listener_capacity),
            role,
            current_user: cli
                .user
                .clone()
                .or_else(|| file.session.current_user.clone())
                .unwrap_or(defaults.current_user),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.inactivity_threshold.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "activity.inactivity_threshold_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "activity.sweep_interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.listener_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "activity.listener_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Sweep timing derived from this configuration.
    #[must_use]
    pub const fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            threshold: self.inactivity_threshold,
            cadence: self.sweep_interval,
        }
    }

    /// Store options derived from this configuration.
    #[must_use]
    pub const fn store_options(&self) -> StoreOptions {
        StoreOptions {
            progress_counts_as_activity: self.progress_counts_as_activity,
        }
    }

    /// Initial session derived from this configuration.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(self.role, self.current_user.clone())
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Team status dashboard engine")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/teampulse/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial viewer role (lead or member).
    #[arg(long, env = "TEAMPULSE_ROLE")]
    pub role: Option<String>,

    /// Display name of the logged-in user.
    #[arg(long, env = "TEAMPULSE_USER")]
    pub user: Option<String>,

    /// Seconds of inactivity before a member is marked offline.
    #[arg(long)]
    pub inactivity_threshold_secs: Option<u64>,

    /// Seconds between inactivity sweeps.
    #[arg(long)]
    pub sweep_interval_secs: Option<u64>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TEAMPULSE_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/teampulse.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("teampulse").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
