//! Chess Analyzer desktop shell entry point.
//!
//! # What happens at startup
//!
//! 1. CLI arguments are parsed with `clap`.
//! 2. `.env` in the working directory is loaded without replacing variables
//!    the process already has, then the TOML config is loaded (defaults when
//!    absent or broken) and `PORT` is applied.
//! 3. `tracing_subscriber` is initialised.  `RUST_LOG` wins over the
//!    configured `shell.log_level`.
//! 4. A current-thread tokio runtime is started on a background thread.  The
//!    gateway, bridge forwarding and automation runs all live there.
//! 5. The tao event loop takes over the main thread; the supervisor launches
//!    the session on its first event.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chess_analyzer_gateway::GatewayConfig;
use chess_analyzer_host::application::supervisor::Supervisor;
use chess_analyzer_host::infrastructure::gateway::EmbeddedGateway;
use chess_analyzer_host::infrastructure::storage::config::{
    default_app_root, load_config, load_config_from, load_dotenv, AppConfig, DOTENV_FILE,
};
use chess_analyzer_host::infrastructure::webview::{run_desktop, DesktopState};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Chess Analyzer desktop shell.
///
/// Opens the game review page and, when a PGN file is given, loads it and
/// starts the analysis automatically.
#[derive(Debug, Parser)]
#[command(name = "chess-analyzer", version)]
struct Cli {
    /// Game record (PGN) to analyse on startup.
    path: Option<PathBuf>,

    /// Config file to read instead of the platform default.
    #[arg(long, env = "CHESS_ANALYZER_CONFIG")]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // `.env` goes first so clap's `env` fallbacks see it.  It and the config
    // are read before logging exists, so their errors are reported below.
    let dotenv = load_dotenv(Path::new(DOTENV_FILE));
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let (mut config, config_error) = match loaded {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.shell.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(true) => info!("loaded environment from {DOTENV_FILE}"),
        Ok(false) => {}
        Err(e) => warn!("{e}; continuing without it"),
    }
    if let Some(e) = config_error {
        warn!("{e}; using default configuration");
    }
    config.apply_env_overrides();

    let gateway_config = config
        .gateway
        .to_gateway_config(&default_app_root())
        .unwrap_or_else(|e| {
            warn!("{e}; using default gateway settings");
            GatewayConfig::under_root(&default_app_root()).with_port(config.gateway.port)
        });
    let automation = config.automation.to_automation_settings();

    // ── Background runtime ────────────────────────────────────────────────────
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let handle = runtime.handle().clone();
    std::thread::Builder::new()
        .name("chess-analyzer-runtime".into())
        .spawn(move || runtime.block_on(std::future::pending::<()>()))
        .context("failed to spawn runtime thread")?;

    info!(
        "Chess Analyzer starting (gateway {}, record {:?})",
        gateway_config.bind_addr, cli.path
    );

    let gateway = EmbeddedGateway::new(gateway_config, handle.clone());
    let supervisor = Supervisor::new(gateway, cli.path);
    let state = DesktopState::new(handle, config.window, automation);

    run_desktop(supervisor, state)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_optional() {
        let cli = Cli::parse_from(["chess-analyzer"]);
        assert_eq!(cli.path, None);
    }

    #[test]
    fn test_positional_path_is_parsed() {
        let cli = Cli::parse_from(["chess-analyzer", "game.pgn"]);
        assert_eq!(cli.path, Some(PathBuf::from("game.pgn")));
    }
}
