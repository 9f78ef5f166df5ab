//! Entry point for the discussion viewer.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Open the discussion fixture (or generate a synthetic one).
//! - Launch the GUI application with the stream engine.

mod app;
mod cache;
mod config;
mod fixture;

use crate::app::run_app;
use crate::cache::load_read_state;
use crate::config::load_config;
use crate::fixture::FixtureSource;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// True once after Ctrl+C was pressed; polled by the UI loop.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let source_path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    install_sigint_handler();

    let source = match &source_path {
        Some(path) => {
            info!(path = %path.display(), "Opening discussion fixture");
            FixtureSource::from_path(path).context("Failed to load discussion fixture")?
        }
        None => {
            info!(
                posts = config.synthetic_post_count,
                "No fixture given; generating a synthetic discussion"
            );
            FixtureSource::synthetic(config.synthetic_post_count)
        }
    };
    let cache_key = source_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("synthetic-{}", config.synthetic_post_count)));

    info!(
        source = %cache_key.display(),
        level = %config.log_level,
        page_size = config.stream.page_size,
        "Starting discussion viewer"
    );
    let read_state = load_read_state(&cache_key);
    if let Some(state) = &read_state {
        info!(
            near = state.near,
            last_read = state.last_read_post_number,
            "Resuming from cached read state"
        );
    }

    run_app(source, config, cache_key, read_state).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args() -> Result<Option<PathBuf>> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        return Ok(None);
    };
    if args.next().is_some() {
        return Err(anyhow!("Usage: poststream-viewer [discussion.json]"));
    }

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(Some(path))
}

fn install_sigint_handler() {
    if let Err(err) = ctrlc::set_handler(|| {
        SIGINT_REQUESTED.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
