//! `TeamPulse` - line-oriented host for the team status engine.
//!
//! Seeds the demo roster, runs the inactivity sweeper in the background,
//! and executes commands read from stdin. Every input line also counts as
//! keyboard activity for the logged-in user. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/teampulse/config.toml`).
//!
//! ```bash
//! cargo run --bin teampulse
//!
//! # Lead view, shorter inactivity window
//! cargo run --bin teampulse -- --role lead --inactivity-threshold-secs 120
//!
//! # Or via environment variables
//! TEAMPULSE_USER="Jane Smith" TEAMPULSE_LOG=debug cargo run
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;

use teampulse::activity::{ActivityListener, ActivitySignal};
use teampulse::app::App;
use teampulse::config::{AppConfig, CliArgs};
use teampulse::store::{SharedStore, TeamStore};
use teampulse::sweeper::Sweeper;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load configuration: {e}");
            AppConfig::default()
        }
    };

    // Logs go to a file so stdout carries only command output.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        threshold_secs = config.inactivity_threshold.as_secs(),
        sweep_interval_secs = config.sweep_interval.as_secs(),
        "teampulse starting"
    );

    let store = SharedStore::new(
        TeamStore::seeded(chrono::Utc::now()).with_options(config.store_options()),
    );
    let sweeper = Sweeper::spawn(store.clone(), config.sweep_config());
    let mut app = App::new(store.clone(), config.session(), config.inactivity_threshold);

    let result = run_app(&mut app, &config).await;

    sweeper.shutdown().await;
    tracing::info!("teampulse exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("teampulse.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Read-eval-print loop over stdin.
async fn run_app(app: &mut App, config: &AppConfig) -> io::Result<()> {
    let mut listener = register_listener(app, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"teampulse ready. type `help` for commands.\n")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if let Some(ref l) = listener {
            l.sender().signal(ActivitySignal::Keyboard);
        }
        if line.trim().is_empty() {
            continue;
        }

        let user_before = app.current_member();
        match app.handle_line(&line) {
            Ok(out) if out.is_empty() => {}
            Ok(out) => {
                stdout.write_all(out.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Err(e) => eprintln!("error: {e}"),
        }
        stdout.flush().await?;

        if app.should_quit {
            break;
        }

        // Follow the logged-in user with the activity listener.
        if app.current_member() != user_before {
            if let Some(old) = listener.take() {
                old.shutdown().await;
            }
            listener = register_listener(app, config);
        }
    }

    if let Some(l) = listener {
        l.shutdown().await;
    }
    Ok(())
}

fn register_listener(app: &App, config: &AppConfig) -> Option<ActivityListener> {
    let Some(member_id) = app.current_member() else {
        tracing::warn!(
            user = %app.session().current_user,
            "current user is not on the roster; activity will not be tracked"
        );
        return None;
    };
    Some(ActivityListener::register(
        app.store().clone(),
        member_id,
        config.listener_capacity,
    ))
}
