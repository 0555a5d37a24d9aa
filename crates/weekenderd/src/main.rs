//! weekenderd - The weekender daemon
//!
//! This is the main entry point for the weekender bot.
//! It wires together all the components:
//! - Configuration loading
//! - Nextcloud Polls client
//! - Telegram transport
//! - Message ledger
//! - Command handling, or a single batch pass

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use weekender_bot::{Bot, batch_report};
use weekender_config::{Settings, load_config};
use weekender_poll::{NextcloudPolls, PollSource};
use weekender_store::{MessageLedger, SqliteLedger};
use weekender_telegram::{ChatTransport, TelegramClient};
use weekender_util::{
    LEDGER_FILENAME, PollId, WEEKENDER_CONFIG_ENV, WEEKENDER_DATA_DIR_ENV, default_config_path,
};

/// weekenderd - Weekend poll keeper for Telegram groups
#[derive(Parser, Debug)]
#[command(name = "weekenderd")]
#[command(about = "Keeps a Nextcloud weekend poll current and reports on it in Telegram", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/weekender/config.toml)
    #[arg(short, long, env = WEEKENDER_CONFIG_ENV, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override for the message ledger (or set WEEKENDER_DATA_DIR)
    #[arg(short, long, env = WEEKENDER_DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Summarize every configured poll once and exit instead of serving chats
    #[arg(short, long)]
    batch: bool,

    /// With --batch, delete expired options and create new ones
    #[arg(long, requires = "batch")]
    apply: bool,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    settings.resolve_secrets(|name| std::env::var(name).ok());

    if let Some(data_dir) = &args.data_dir {
        settings.telegram.database_path = data_dir.join(LEDGER_FILENAME);
    }

    info!(
        config_path = %args.config.display(),
        channels = settings.channels.len(),
        "Configuration loaded"
    );
    Ok(settings)
}

fn nextcloud(settings: &Settings) -> Result<Arc<dyn PollSource>> {
    let nc = &settings.nextcloud;
    let token = nc.token.as_deref().with_context(|| {
        format!(
            "No Nextcloud token: set nextcloud.token or {}",
            weekender_config::NEXTCLOUD_TOKEN_ENV
        )
    })?;
    let polls = NextcloudPolls::new(&nc.server, &nc.username, token)
        .context("Failed to create Nextcloud client")?;

    info!(server = %nc.server, username = %nc.username, "Nextcloud client ready");
    Ok(Arc::new(polls))
}

async fn run_batch(settings: &Settings, polls: &dyn PollSource, apply: bool) -> Result<()> {
    let now = weekender_util::now();
    let poll_ids: BTreeSet<PollId> = settings.channels.iter().map(|c| c.poll_id).collect();
    let mut failed_polls = 0;

    for poll in poll_ids {
        match batch_report(polls, poll, &settings.schedule, apply, &now).await {
            Ok(report) => info!(
                poll_id = %poll,
                weekend = report.weekend.len(),
                expired = report.expired.len(),
                drafts = report.drafts.len(),
                deleted = report.deleted,
                created = report.created,
                failures = report.failures,
                "Batch pass complete"
            ),
            Err(e) => {
                error!(poll_id = %poll, error = %e, "Batch pass failed");
                failed_polls += 1;
            }
        }
    }

    if failed_polls > 0 {
        anyhow::bail!("{failed_polls} poll(s) could not be processed");
    }
    Ok(())
}

async fn run_bot(settings: Settings, polls: Arc<dyn PollSource>) -> Result<()> {
    let token = settings.telegram.token.as_deref().with_context(|| {
        format!(
            "No Telegram token: set telegram.token or {}",
            weekender_config::TELEGRAM_TOKEN_ENV
        )
    })?;
    let transport: Arc<dyn ChatTransport> =
        Arc::new(TelegramClient::new(token).context("Failed to create Telegram client")?);

    let me = transport
        .get_me()
        .await
        .context("Could not reach Telegram with the configured token")?;
    info!(bot = ?me.username, "Connected to Telegram");

    let db_path = &settings.telegram.database_path;
    let ledger: Arc<dyn MessageLedger> = Arc::new(
        SqliteLedger::open(db_path)
            .with_context(|| format!("Failed to open message ledger {:?}", db_path))?,
    );
    info!(db_path = %db_path.display(), "Ledger initialized");

    let long_poll = settings.telegram.long_poll;
    let bot = Bot::new(
        settings.channels,
        settings.schedule,
        polls,
        transport,
        ledger.clone(),
    );

    // Set up signal handlers
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
        }
        let _ = shutdown_tx.send(true);
    });

    bot.run(long_poll, shutdown_rx).await;

    if !ledger.is_healthy() {
        warn!("Ledger unhealthy at shutdown");
    }
    info!("Shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "weekenderd starting");
    if weekender_util::is_mock_time_active() {
        warn!(now = %weekender_util::now(), "Mock time is active");
    }

    let settings = load_settings(&args)?;
    let polls = nextcloud(&settings)?;

    if args.batch {
        run_batch(&settings, polls.as_ref(), args.apply).await
    } else {
        run_bot(settings, polls).await
    }
}
