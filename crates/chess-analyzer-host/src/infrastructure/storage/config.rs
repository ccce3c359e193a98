//! TOML-based configuration for the desktop shell.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\ChessAnalyzer\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/chess-analyzer/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/ChessAnalyzer/config.toml`
//!
//! Every field has a default, so the file is optional and may be partial:
//!
//! ```toml
//! [shell]
//! log_level = "debug"
//!
//! [gateway]
//! port = 8080
//! analysis_url = "http://127.0.0.1:5000/api"
//!
//! [window]
//! devtools = true
//!
//! [automation]
//! settle_delay_ms = 3500
//!
//! [[automation.input_selectors]]
//! name = "pgn-id"
//! css = "#pgn"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.  Whole sections
//! use `#[serde(default)]`, so an empty file is a valid config.
//!
//! # Environment override
//!
//! `PORT` replaces `gateway.port` when it parses as a `u16`.  Anything else is
//! ignored with a warning.  A `.env` file in the working directory is loaded
//! into the environment first (see [`load_dotenv`]); variables the process
//! already has are never replaced by the file.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chess_analyzer_gateway::{AssetRoots, GatewayConfig, DEFAULT_PORT};
use chess_analyzer_view::{AutomationSettings, SelectorChain};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable that overrides the gateway port.
pub const PORT_ENV_VAR: &str = "PORT";

/// Dotenv file read from the working directory at startup.
pub const DOTENV_FILE: &str = ".env";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The dotenv file exists but could not be read or parsed.
    #[error("failed to load {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// `gateway.bind_address` is not an IP address.
    #[error("invalid gateway bind address {0:?}")]
    InvalidBindAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellConfig {
    /// `tracing` log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Embedded gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewaySettings {
    /// IP address to bind.  Loopback by default; the only client is the
    /// shell's own window.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory containing the `freechess` web app.  Defaults to the
    /// executable's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_root: Option<PathBuf>,
    /// Overrides `<app_root>/freechess/dist/public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_assets: Option<PathBuf>,
    /// Overrides `<app_root>/freechess/src/public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_assets: Option<PathBuf>,
    /// Overrides `<app_root>/freechess/src/public/pages/report/index.html`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_document: Option<PathBuf>,
    /// Base URL `/api` requests are forwarded to.
    #[serde(default = "default_analysis_url")]
    pub analysis_url: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

/// Main window settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Enables the webview's developer tools.
    #[serde(default)]
    pub devtools: bool,
}

/// Automation timing and selector chains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationConfig {
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_post_ready_delay_ms")]
    pub post_ready_delay_ms: u64,
    #[serde(default = "default_readiness_timeout_ms")]
    pub readiness_timeout_ms: u64,
    #[serde(default = "SelectorChain::record_input")]
    pub input_selectors: SelectorChain,
    #[serde(default = "SelectorChain::analyze_trigger")]
    pub trigger_selectors: SelectorChain,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_analysis_url() -> String {
    "http://127.0.0.1:3001/api".to_string()
}
fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}
fn default_upstream_timeout_secs() -> u64 {
    120
}
fn default_title() -> String {
    "Chess Analyzer".to_string()
}
fn default_width() -> u32 {
    1200
}
fn default_height() -> u32 {
    800
}
fn default_settle_delay_ms() -> u64 {
    2000
}
fn default_post_ready_delay_ms() -> u64 {
    1000
}
fn default_readiness_timeout_ms() -> u64 {
    30_000
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            app_root: None,
            primary_assets: None,
            fallback_assets: None,
            entry_document: None,
            analysis_url: default_analysis_url(),
            max_body_bytes: default_max_body_bytes(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            devtools: false,
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            post_ready_delay_ms: default_post_ready_delay_ms(),
            readiness_timeout_ms: default_readiness_timeout_ms(),
            input_selectors: SelectorChain::record_input(),
            trigger_selectors: SelectorChain::analyze_trigger(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Applies `PORT` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        let value = std::env::var(PORT_ENV_VAR).ok();
        self.apply_port_override(value.as_deref());
    }

    /// Replaces the gateway port with `value` when it is a valid port number.
    pub fn apply_port_override(&mut self, value: Option<&str>) {
        let Some(raw) = value else { return };
        match raw.trim().parse::<u16>() {
            Ok(port) => {
                debug!("{PORT_ENV_VAR}={port} overrides gateway port {}", self.gateway.port);
                self.gateway.port = port;
            }
            Err(_) => warn!(
                "ignoring {PORT_ENV_VAR}={raw:?}: not a port number; using {}",
                self.gateway.port
            ),
        }
    }
}

impl GatewaySettings {
    /// Builds the gateway's runtime config, resolving asset paths against
    /// `app_root` (or `default_root` when none is configured).
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBindAddress`] if `bind_address` is not an IP.
    pub fn to_gateway_config(&self, default_root: &Path) -> Result<GatewayConfig, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))?;

        let root = self.app_root.as_deref().unwrap_or(default_root);
        let layout = GatewayConfig::under_root(root);

        Ok(GatewayConfig {
            bind_addr: SocketAddr::new(ip, self.port),
            assets: AssetRoots {
                primary: self.primary_assets.clone().unwrap_or(layout.assets.primary),
                fallback: self.fallback_assets.clone().unwrap_or(layout.assets.fallback),
            },
            entry_document: self.entry_document.clone().unwrap_or(layout.entry_document),
            analysis_url: self.analysis_url.clone(),
            max_body_bytes: self.max_body_bytes,
            upstream_timeout: Duration::from_secs(self.upstream_timeout_secs),
        })
    }
}

impl AutomationConfig {
    pub fn to_automation_settings(&self) -> AutomationSettings {
        AutomationSettings {
            input_chain: self.input_selectors.clone(),
            trigger_chain: self.trigger_selectors.clone(),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            post_ready_delay: Duration::from_millis(self.post_ready_delay_ms),
            readiness_timeout: Duration::from_millis(self.readiness_timeout_ms),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config at {}; using defaults", path.display());
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the dotenv file at `path` into the process environment.
///
/// Variables already set in the environment keep their values.  Returns
/// `Ok(false)` when there is no file.
///
/// # Errors
///
/// Returns [`ConfigError::Dotenv`] if the file exists but cannot be read or
/// contains a malformed line.
pub fn load_dotenv(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(source) => Err(ConfigError::Dotenv {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Directory the web app is looked up in when `gateway.app_root` is unset:
/// the executable's directory, or the working directory as a last resort.
pub fn default_app_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolves the platform config directory including the `ChessAnalyzer` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("ChessAnalyzer"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("chess-analyzer"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("ChessAnalyzer")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_defaults_match_documented_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.shell.log_level, "info");
        assert_eq!(cfg.gateway.port, 3000);
        assert_eq!(cfg.gateway.bind_address, "127.0.0.1");
        assert_eq!(cfg.window.width, 1200);
        assert_eq!(cfg.window.height, 800);
        assert!(!cfg.window.devtools);
        assert_eq!(cfg.automation.settle_delay_ms, 2000);
    }

    #[test]
    fn test_empty_toml_is_default_config() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    // ── Partial override ──────────────────────────────────────────────────────

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let toml_str = r#"
[gateway]
port = 8080

[automation]
settle_delay_ms = 3500
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(cfg.gateway.port, 8080);
        assert_eq!(cfg.gateway.analysis_url, "http://127.0.0.1:3001/api");
        assert_eq!(cfg.automation.settle_delay_ms, 3500);
        assert_eq!(cfg.automation.post_ready_delay_ms, 1000);
        assert_eq!(cfg.automation.input_selectors, SelectorChain::record_input());
    }

    #[test]
    fn test_selector_chain_override_replaces_whole_chain() {
        // Arrange
        let toml_str = r##"
[[automation.trigger_selectors]]
name = "go"
css = "#go"
"##;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        let settings = cfg.automation.to_automation_settings();

        // Assert
        assert_eq!(settings.trigger_chain.len(), 1);
        assert_eq!(settings.input_chain, SelectorChain::record_input());
    }

    #[test]
    fn test_config_serializes_and_deserializes_round_trip() {
        let mut cfg = AppConfig::default();
        cfg.gateway.app_root = Some(PathBuf::from("/opt/chess"));
        cfg.window.devtools = true;

        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    // ── PORT override ─────────────────────────────────────────────────────────

    #[test]
    fn test_port_override_replaces_configured_port() {
        let mut cfg = AppConfig::default();
        cfg.apply_port_override(Some("4321"));
        assert_eq!(cfg.gateway.port, 4321);
    }

    #[test]
    fn test_unparsable_port_override_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.gateway.port = 8080;

        cfg.apply_port_override(Some("http"));
        cfg.apply_port_override(Some("70000"));
        cfg.apply_port_override(None);

        assert_eq!(cfg.gateway.port, 8080);
    }

    // ── Conversions ───────────────────────────────────────────────────────────

    #[test]
    fn test_gateway_config_resolves_layout_under_root() {
        // Arrange
        let settings = GatewaySettings::default();

        // Act
        let gw = settings.to_gateway_config(Path::new("/app")).unwrap();

        // Assert
        assert_eq!(gw.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(gw.assets.primary, PathBuf::from("/app/freechess/dist/public"));
        assert_eq!(gw.assets.fallback, PathBuf::from("/app/freechess/src/public"));
        assert_eq!(
            gw.entry_document,
            PathBuf::from("/app/freechess/src/public/pages/report/index.html")
        );
    }

    #[test]
    fn test_explicit_paths_win_over_app_root() {
        let settings = GatewaySettings {
            app_root: Some(PathBuf::from("/configured")),
            primary_assets: Some(PathBuf::from("/build")),
            ..GatewaySettings::default()
        };

        let gw = settings.to_gateway_config(Path::new("/unused")).unwrap();

        assert_eq!(gw.assets.primary, PathBuf::from("/build"));
        assert_eq!(gw.assets.fallback, PathBuf::from("/configured/freechess/src/public"));
    }

    #[test]
    fn test_invalid_bind_address_is_rejected() {
        let settings = GatewaySettings {
            bind_address: "localhost".into(),
            ..GatewaySettings::default()
        };

        let result = settings.to_gateway_config(Path::new("."));

        assert!(matches!(result, Err(ConfigError::InvalidBindAddress(_))));
    }

    // ── load_config_from ──────────────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_reads_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[shell]\nlog_level = \"debug\"\n").unwrap();

        // Act
        let cfg = load_config_from(&path).unwrap();

        // Assert
        assert_eq!(cfg.shell.log_level, "debug");
    }

    #[test]
    fn test_load_config_reports_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    // ── load_dotenv ───────────────────────────────────────────────────────────

    #[test]
    fn test_dotenv_fills_unset_variables_but_process_env_wins() {
        // Arrange: keys unique to this test, so parallel tests are unaffected.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DOTENV_FILE);
        std::fs::write(
            &path,
            "CHESS_ANALYZER_DOTENV_SET=from-file\nCHESS_ANALYZER_DOTENV_UNSET=from-file\n",
        )
        .unwrap();
        std::env::set_var("CHESS_ANALYZER_DOTENV_SET", "from-process");
        std::env::remove_var("CHESS_ANALYZER_DOTENV_UNSET");

        // Act
        let loaded = load_dotenv(&path).unwrap();

        // Assert
        assert!(loaded);
        assert_eq!(std::env::var("CHESS_ANALYZER_DOTENV_SET").unwrap(), "from-process");
        assert_eq!(std::env::var("CHESS_ANALYZER_DOTENV_UNSET").unwrap(), "from-file");
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_dotenv(&dir.path().join(DOTENV_FILE)).unwrap());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DOTENV_FILE);
        std::fs::write(&path, "CHESS_ANALYZER_DOTENV_BAD='unterminated\n").unwrap();

        assert!(matches!(load_dotenv(&path), Err(ConfigError::Dotenv { .. })));
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("config.toml"), "got {path:?}");
        }
    }
}
