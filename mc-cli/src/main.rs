use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use mc_sdk::state::logging::{init_logging, LoggingMode};
use mc_sdk::sync::{SyncKind, SyncStatus, SyncTask};
use mc_sdk::{
    default_library_path, default_registry_path, HostConfig, MediaCenter, SdkConfig,
    TransportPreference,
};

pub mod host_selection;
pub mod printer;

use host_selection::{list_hosts, resolve_host};
use printer::ConsolePrinter;

/// Media-center remote
///
/// Watches the live state of a host and syncs its library into a local
/// database. Hosts are kept in a registry file under the platform's config
/// directory.
#[derive(Parser, Debug)]
#[command(name = "mc-cli")]
#[command(version)]
pub struct Cli {
    /// Host id or name; defaults to the selected host
    #[arg(long, global = true, env = "MC_HOST")]
    pub host: Option<String>,

    /// Logging mode (silent, dev, debug, json)
    #[arg(long, global = true, env = "MC_LOG_MODE", default_value = "silent")]
    pub log: LoggingMode,

    /// Host registry file
    #[arg(long, global = true, env = "MC_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Library database file
    #[arg(long, global = true, env = "MC_LIBRARY")]
    pub library: Option<PathBuf>,

    /// SDK settings file (JSON)
    #[arg(long, global = true, env = "MC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List known hosts
    Hosts,
    /// Add or replace a host
    Add(AddArgs),
    /// Forget a host
    Remove { id: String },
    /// Select the default host
    Use { host: String },
    /// Measure round trips to the host
    Ping {
        #[arg(short, long, default_value = "3")]
        count: u32,
    },
    /// Print every player, volume, playlist and connection change
    Watch {
        /// Stop after this many seconds instead of waiting for Ctrl+C
        #[arg(short, long)]
        duration: Option<u64>,
    },
    /// Sync library kinds into the local database
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub id: String,
    pub address: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, default_value = "8080")]
    pub http_port: u16,
    #[arg(long, default_value = "9090")]
    pub tcp_port: u16,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Never open a TCP session, poll over HTTP
    #[arg(long)]
    pub poll_only: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Kinds to sync in full (movies, tv_shows, music, music_videos); all when empty
    pub kinds: Vec<SyncKind>,
    /// Sync one movie by id
    #[arg(long, conflicts_with = "kinds")]
    pub movie: Option<i64>,
    /// Sync one TV show with its seasons and episodes
    #[arg(long, conflicts_with_all = ["kinds", "movie"])]
    pub tv_show: Option<i64>,
}

impl SyncArgs {
    pub fn tasks(&self) -> Vec<SyncTask> {
        if let Some(id) = self.movie {
            return vec![SyncTask::movie(id)];
        }
        if let Some(id) = self.tv_show {
            return vec![SyncTask::tv_show(id)];
        }
        let kinds: Vec<SyncKind> = if self.kinds.is_empty() {
            SyncKind::ALL.to_vec()
        } else {
            self.kinds.clone()
        };
        kinds.into_iter().map(SyncTask::full).collect()
    }
}

impl From<AddArgs> for HostConfig {
    fn from(args: AddArgs) -> Self {
        let name = args.name.unwrap_or_else(|| args.id.clone());
        let mut host = HostConfig::new(args.id, name, args.address).with_ports(args.http_port, args.tcp_port);
        if let Some(username) = args.username {
            host = host.with_credentials(username, args.password.unwrap_or_default());
        }
        if args.poll_only {
            host = host.with_transport(TransportPreference::PollOnly);
        }
        host
    }
}

fn open_center(cli: &Cli) -> Result<MediaCenter> {
    let registry = match &cli.registry {
        Some(path) => path.clone(),
        None => default_registry_path()?,
    };
    let library = match &cli.library {
        Some(path) => path.clone(),
        None => default_library_path()?,
    };
    let config = match &cli.config {
        Some(path) => SdkConfig::load(path).with_context(|| format!("Invalid settings in {}", path.display()))?,
        None => SdkConfig::default(),
    };
    info!(registry = %registry.display(), library = %library.display(), "Opening media center");
    MediaCenter::open(&registry, &library, config).context("Failed to open media center")
}

async fn connect(center: &mut MediaCenter, query: Option<&str>) -> Result<()> {
    let id = resolve_host(center.registry(), query)?.id.clone();
    center
        .switch_host(&id)
        .await
        .with_context(|| format!("Failed to connect to '{}'", id))?;
    Ok(())
}

async fn ping(center: &MediaCenter, count: u32) -> Result<()> {
    let context = center.require_current()?;
    for _ in 0..count {
        match context.ping().await {
            Ok(elapsed) => println!("pong from {} in {:?}", context.config().name, elapsed),
            Err(e) => println!("ping to {} failed: {}", context.config().name, e),
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Ok(())
}

async fn watch(center: &MediaCenter, duration: Option<u64>) -> Result<()> {
    let context = center.require_current()?;
    let printer = Arc::new(ConsolePrinter::new(context.config().name.clone()));
    let reconciler = context.reconciler();
    reconciler.register_connection(printer.clone())?;
    reconciler.register_player(printer.clone())?;
    reconciler.register_application(printer.clone())?;
    reconciler.register_playlist(printer)?;

    println!(
        "Watching {} over {:?} transport, Ctrl+C to stop",
        context.config().name,
        context.transport_kind()
    );

    match duration {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?,
    }
    Ok(())
}

async fn sync(center: &MediaCenter, args: &SyncArgs) -> Result<()> {
    let context = center.require_current()?;
    let mut results = center.sync_service().subscribe();
    let mut runs = center.sync_service().subscribe_runs();

    let run_id = context.sync(args.tasks())?;
    println!("Sync run {} started for {}", run_id, context.config().name);

    loop {
        tokio::select! {
            biased;
            Ok(result) = results.recv() => {
                if result.host != context.host_id() {
                    continue;
                }
                let target = match result.entity_id {
                    Some(id) => format!("{} #{}", result.kind, id),
                    None => result.kind.to_string(),
                };
                match (&result.status, &result.error) {
                    (SyncStatus::Success, _) => println!("  {} synced", target),
                    (SyncStatus::Fail, Some(e)) => println!("  {} failed: {}", target, e),
                    (SyncStatus::Fail, None) => println!("  {} failed", target),
                }
            }
            Ok(summary) = runs.recv() => {
                if summary.run_id != run_id {
                    continue;
                }
                println!("Done: {} succeeded, {} failed", summary.succeeded, summary.failed);
                if summary.failed > 0 {
                    anyhow::bail!("{} sync task(s) failed", summary.failed);
                }
                return Ok(());
            }
            else => anyhow::bail!("Sync service closed before the run finished"),
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut center = open_center(&cli)?;
    let query = cli.host.as_deref();

    match cli.command {
        Command::Hosts => {
            let listing = list_hosts(center.registry());
            if listing.is_empty() {
                println!("No hosts configured");
            } else {
                print!("{}", listing);
            }
        }
        Command::Add(args) => {
            let host = HostConfig::from(args);
            let id = host.id.clone();
            center.add_host(host)?;
            println!("Added {}", id);
        }
        Command::Remove { id } => {
            let removed = center.remove_host(&id).await?;
            println!("Removed {}", removed.name);
        }
        Command::Use { host } => {
            connect(&mut center, Some(&host)).await?;
            println!("Now using {}", host);
        }
        Command::Ping { count } => {
            connect(&mut center, query).await?;
            ping(&center, count).await?;
        }
        Command::Watch { duration } => {
            connect(&mut center, query).await?;
            watch(&center, duration).await?;
        }
        Command::Sync(args) => {
            connect(&mut center, query).await?;
            sync(&center, &args).await?;
        }
    }

    center.disconnect().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        warn!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
