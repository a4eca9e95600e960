//! DeskCat - headless runtime
//!
//! Reads newline-delimited host messages on stdin and drives the cat's
//! animation rig until stdin closes or CTRL+C is pressed.

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deskcat::app::{App, AppServices};
use deskcat::config::{AppConfig, ConfigWatcher};
use deskcat::host::{GilrsListener, NativeBridge};
use deskcat::input::{EventDecodeError, HostMessage};
use deskcat::menu;
use deskcat::paths::AppPaths;
use deskcat::stores::{PersistenceHandle, Stores};

/// DeskCat - desktop pet input bridge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print the shared menu for the saved preferences and exit
    #[arg(long)]
    print_menu: bool,

    /// List the available models and exit
    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut paths = AppPaths::detect();
    if let Some(config) = args.config.clone() {
        paths = paths.with_config(config);
    }
    paths.ensure_directories()?;

    let _guard = init_logging(&args.log_level, &paths)?;

    info!("Starting DeskCat v{}...", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", paths.config.display());

    let config = AppConfig::load_or_default(&paths.config).await?;
    let resources_dir = paths.resources_dir(config.resources_dir.as_deref());
    let models_root = AppPaths::models_dir(&resources_dir);
    info!("Resources directory: {}", resources_dir.display());

    let persistence =
        PersistenceHandle::spawn(&paths.sled_db_path(), config.persistence.debounce_ms)?;
    let persisted = match persistence.load().await {
        Ok(state) => state,
        Err(e) => {
            warn!("Failed to load preferences, using defaults: {:#}", e);
            None
        }
    };
    let stores = Stores::initialize(persisted, &models_root);

    if args.print_menu {
        print_menu(&stores);
        persistence.shutdown();
        return Ok(());
    }

    if args.list_models {
        print_models(&stores);
        persistence.shutdown();
        return Ok(());
    }

    let config_watcher = if paths.config.exists() {
        match ConfigWatcher::new(&paths.config) {
            Ok(watcher) => {
                info!("Configuration hot-reload enabled");
                Some(watcher)
            }
            Err(e) => {
                warn!("Config hot-reload disabled: {:#}", e);
                None
            }
        }
    } else {
        debug!("No configuration file, using defaults without hot-reload");
        None
    };

    let (host_tx, host_rx) = mpsc::unbounded_channel();

    let gamepad = config
        .gamepad
        .native
        .then(|| GilrsListener::new(host_tx.clone()));
    let native = Arc::new(NativeBridge::new(gamepad));
    let services = AppServices::headless(&config, resources_dir, native);

    tokio::spawn(read_stdin(host_tx));

    let app = App::new(config, stores, services, Some(persistence));
    app.run(host_rx, config_watcher, shutdown_signal()).await?;

    info!("DeskCat shutdown complete");
    Ok(())
}

/// Forward stdin lines as host messages until EOF
async fn read_stdin(host_tx: mpsc::UnboundedSender<HostMessage>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match HostMessage::from_json_line(&line) {
                Ok(message) => {
                    if host_tx.send(message).is_err() {
                        return;
                    }
                }
                Err(EventDecodeError::Empty) => {}
                Err(e) => warn!("Ignoring host message: {}", e),
            },
            Ok(None) => {
                debug!("stdin closed");
                return;
            }
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                return;
            }
        }
    }
}

fn init_logging(level: &str, paths: &AppPaths) -> Result<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, "deskcat.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_menu(stores: &Stores) {
    println!("\n{}", "=== DeskCat Menu ===".bold().cyan());
    let entries = menu::shared_menu(&stores.cat, cfg!(target_os = "macos"));
    for line in menu::render(&entries) {
        if line.ends_with("(disabled)") {
            println!("  {}", line.dimmed());
        } else {
            println!("  {}", line);
        }
    }
    println!();
}

fn print_models(stores: &Stores) {
    println!("\n{}", "=== Models ===".bold().cyan());
    let current = stores.model.current_model.as_ref().map(|m| m.id.as_str());

    for model in &stores.model.models {
        let marker = if Some(model.id.as_str()) == current {
            "*".green().bold()
        } else {
            " ".normal()
        };
        let kind = if model.is_preset { "preset" } else { "custom" };
        println!(
            "  {} {:<9} {:<7} {}  {}",
            marker,
            model.mode.to_string().yellow(),
            kind,
            model.id.dimmed(),
            model.path.display()
        );
    }
    println!();
}
