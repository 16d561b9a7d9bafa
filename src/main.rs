//! GreenBite CLI
//!
//! Command-line front end for the GreenBite backend:
//! - Analyze a meal photo (file or camera frame)
//! - Show the emissions trend and leaderboard
//! - Check backend status
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenbite::api::{ApiClient, DetectionReport};
use greenbite::capture::{CaptureSurface, CapturedImage, FileFrameSource};
use greenbite::config::{Config, LoggingConfig};
use greenbite::panels::{LeaderboardPanel, TrendPanel};
use greenbite::session::{DetectionSession, DetectionTicket, SessionError};
use greenbite::view;

#[derive(Parser)]
#[command(name = "greenbite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Carbon footprint of your meals, from a photo")]
#[command(long_about = "GreenBite estimates the carbon footprint of a meal from a photo.\nSee greener swaps, your weekly trend and how you rank.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides config and GREENBITE_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Config file (default: ~/.config/greenbite/config.toml or ./greenbite.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a meal photo
    Detect {
        /// Image file to upload
        #[arg(required_unless_present = "camera", conflicts_with = "camera")]
        image: Option<PathBuf>,
        /// Take a snapshot from a camera frame file instead
        #[arg(long)]
        camera: Option<PathBuf>,
    },

    /// Show your daily emissions trend
    Trend {
        /// User id (default: from config)
        #[arg(short, long)]
        user: Option<String>,
        /// Chart height in rows
        #[arg(long, default_value = "8")]
        height: usize,
    },

    /// Show the leaderboard
    Leaderboard,

    /// Trend and leaderboard together
    Dashboard {
        /// User id (default: from config)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Check that the backend is up
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
    }

    init_logging(&config.logging);

    let client = ApiClient::new(config.backend.client_config())?;

    match cli.command {
        Commands::Detect { image, camera } => {
            let report = detect(&client, image, camera).await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Table => print!("{}", view::render_report(&report)),
            }
        }

        Commands::Trend { user, height } => {
            let user = user.unwrap_or_else(|| config.backend.user_id.clone());
            let mut panel = TrendPanel::new(&user);
            panel.finish(client.trend(&user).await);

            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&panel)?),
                Format::Table => print_trend(&panel, height),
            }

            if panel.state.failure().is_some() {
                std::process::exit(1);
            }
        }

        Commands::Leaderboard => {
            let mut panel = LeaderboardPanel::new();
            panel.finish(client.leaderboard().await);

            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&panel)?),
                Format::Table => print!("{}", view::render_leaderboard(&panel)),
            }

            if panel.state.failure().is_some() {
                std::process::exit(1);
            }
        }

        Commands::Dashboard { user } => {
            let user = user.unwrap_or_else(|| config.backend.user_id.clone());
            let mut trend = TrendPanel::new(&user);
            let mut leaderboard = LeaderboardPanel::new();

            // Both panels load independently, as on page load
            let (trend_result, leaderboard_result) =
                tokio::join!(client.trend(&user), client.leaderboard());
            trend.finish(trend_result);
            leaderboard.finish(leaderboard_result);

            match cli.format {
                Format::Json => {
                    let body = serde_json::json!({
                        "trend": trend,
                        "leaderboard": leaderboard,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Format::Table => {
                    print_trend(&trend, 8);
                    println!();
                    print!("{}", view::render_leaderboard(&leaderboard));
                }
            }
        }

        Commands::Status => match client.health().await {
            Ok(health) if health.is_healthy() => {
                println!("GreenBite v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Backend: {} ({})", health.status, client.base_url());
            }
            Ok(health) => {
                eprintln!("Backend at {} reports: {}", client.base_url(), health.status);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Cannot reach the GreenBite backend at {}", client.base_url());
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let content = greenbite::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Capture one image, upload it and wait for the report.
///
/// Ctrl-C while waiting aborts the upload.
async fn detect(
    client: &ApiClient,
    image: Option<PathBuf>,
    camera: Option<PathBuf>,
) -> anyhow::Result<DetectionReport> {
    let mut session = DetectionSession::new();
    session.begin_capture()?;

    let mut pending: Option<Result<DetectionTicket, SessionError>> = None;
    let mut camera = camera.map(FileFrameSource::new);
    let acquired = {
        let mut surface = CaptureSurface::new(|captured| pending = Some(session.submit(captured)));

        match (camera.as_mut(), image) {
            (Some(source), _) => surface.snap(source),
            (None, Some(path)) => surface.pick(CapturedImage::from_path(&path)?),
            (None, None) => bail!("Nothing to analyze: pass an image path or --camera"),
        }
    };

    if !acquired {
        session.cancel_capture();
        match &camera {
            Some(source) => bail!("No camera frame available at {:?}", source.path()),
            None => bail!("No image acquired"),
        }
    }

    let ticket = pending.context("capture did not produce an image")??;
    eprintln!("{}", view::ANALYZING_MESSAGE);

    let call = client.detect_ticket(ticket);
    tokio::pin!(call);

    let (id, result) = tokio::select! {
        out = &mut call => out,
        _ = tokio::signal::ctrl_c() => {
            session.abort();
            call.await
        }
    };

    if let Err(e) = &result {
        if !e.is_cancelled() {
            eprintln!("{}", view::DETECTION_FAILED_ALERT);
        }
    }
    session.resolve(id, result.map_err(|e| e.to_string()));

    if let Some(message) = session.error() {
        bail!("Detection failed: {}", message);
    }

    session
        .report()
        .cloned()
        .context("Detection was cancelled")
}

fn print_trend(panel: &TrendPanel, height: usize) {
    print!("{}", view::render_trend(panel, height));

    if let (Some(average), Some(change)) = (panel.average(), panel.change()) {
        let direction = if change <= 0.0 { "down" } else { "up" };
        println!(
            "Average {:.1} kg CO₂/day, {} {:.1} kg since the first day",
            average,
            direction,
            change.abs()
        );
    }
    if let (Some(first), Some(last)) = (
        panel.points().first().and_then(|p| p.day()),
        panel.points().last().and_then(|p| p.day()),
    ) {
        println!(
            "{} to {}",
            first.format("%a %b %d"),
            last.format("%a %b %d")
        );
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("greenbite={}", logging.level)),
    );

    // Logs go to stderr so stdout stays clean for --format json
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
