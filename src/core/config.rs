//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypoint/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::action::Tint;
use crate::core::router::RouterOptions;
use crate::host::mail::{MailClient, MailClientDirectory};
use crate::host::screen::PresentationStyle;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypointConfig {
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub mail_clients: Vec<MailClient>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PresentationConfig {
    pub animated: Option<bool>,
    pub default_style: Option<PresentationStyle>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BrowserConfig {
    pub tint: Option<Tint>,
    pub style: Option<PresentationStyle>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "waypoint.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub animated: bool,
    pub default_style: PresentationStyle,
    pub browser_tint: Option<Tint>,
    pub browser_style: PresentationStyle,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    /// Empty means the built-in client list.
    pub mail_clients: Vec<MailClient>,
}

impl ResolvedConfig {
    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            animated: self.animated,
            browser_tint: self.browser_tint,
        }
    }

    pub fn mail_directory(&self) -> MailClientDirectory {
        if self.mail_clients.is_empty() {
            MailClientDirectory::default()
        } else {
            MailClientDirectory::new(self.mail_clients.clone())
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.waypoint/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypoint").join("config.toml"))
}

/// Load config from `~/.waypoint/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WaypointConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<WaypointConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(WaypointConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(WaypointConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<WaypointConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

const DEFAULT_CONFIG: &str = r##"# Waypoint Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [presentation]
# animated = true                    # Or WAYPOINT_ANIMATED, or --no-animated
# default_style = "automatic"        # "automatic", "full_screen", "page_sheet",
#                                    # "form_sheet", "over_full_screen",
#                                    # "over_current_context", "popover"

# [browser]
# tint = "#0A84FF"
# style = "page_sheet"

# [logging]
# level = "info"                     # Or WAYPOINT_LOG_LEVEL, or --log-level
# file = "waypoint.log"              # Or WAYPOINT_LOG_FILE

# Replaces the built-in mail client list. Order matters: automatic
# selection opens the first installed client.
# [[mail_clients]]
# name = "Gmail"
# url = "googlegmail://"

# [[mail_clients]]
# name = "Outlook"
# url = "ms-outlook://"
"##;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_animated` and `cli_log_level` are from CLI flags (None = not specified).
pub fn resolve(
    config: &WaypointConfig,
    cli_animated: Option<bool>,
    cli_log_level: Option<&str>,
) -> ResolvedConfig {
    resolve_with(config, |key| std::env::var(key).ok(), cli_animated, cli_log_level)
}

fn resolve_with(
    config: &WaypointConfig,
    env: impl Fn(&str) -> Option<String>,
    cli_animated: Option<bool>,
    cli_log_level: Option<&str>,
) -> ResolvedConfig {
    // Animated: CLI → env → config → default
    let animated = cli_animated
        .or_else(|| env("WAYPOINT_ANIMATED").and_then(|v| parse_bool(&v)))
        .or(config.presentation.animated)
        .unwrap_or(true);

    // Log level: CLI → env → config → default
    let log_level = cli_log_level
        .map(str::to_string)
        .or_else(|| env("WAYPOINT_LOG_LEVEL"))
        .or_else(|| config.logging.level.clone())
        .map(|level| parse_level(&level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Log file: env → config → default
    let log_file = env("WAYPOINT_LOG_FILE")
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        animated,
        default_style: config.presentation.default_style.unwrap_or_default(),
        browser_tint: config.browser.tint,
        browser_style: config
            .browser
            .style
            .unwrap_or(PresentationStyle::PageSheet),
        log_level,
        log_file: PathBuf::from(log_file),
        mail_clients: config.mail_clients.clone(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring unrecognized boolean '{}'", other);
            None
        }
    }
}

fn parse_level(value: &str) -> LevelFilter {
    LevelFilter::from_str(value.trim()).unwrap_or_else(|_| {
        warn!("Unknown log level '{}', using {}", value, DEFAULT_LOG_LEVEL);
        DEFAULT_LOG_LEVEL
    })
}
