//! Sitewatch client
//!
//! Polls the worker API for incident and proximity feeds, normalizes them,
//! screens them against the facility network, and relays per-incident votes
//! with offline queuing.
//!
//! Usage:
//!   sitewatch watch --api-base https://worker.example.com --radius-km 100
//!   sitewatch once --region APJC --output alerts.json
//!   sitewatch vote <incident-id> up
//!   sitewatch dismiss <incident-id>

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use geo_reference::{facility_sites, CanonicalRegion};
use incident_normalizer::normalize_region;
use proximity_alerts::{compute_alerts, ProximityAlert, DEFAULT_RADIUS_KM};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vote_relay::{SubmitOutcome, VoteValue};

mod feed;
mod report;
mod state;
mod storage;
mod transport;

use feed::FeedClient;
use report::AlertReport;
use state::AppState;
use storage::StateStore;
use transport::HttpVoteTransport;

#[derive(Parser, Debug)]
#[command(name = "sitewatch", about = "Situational-awareness feed client")]
struct Args {
    /// Worker API base URL
    #[arg(long, env = "SITEWATCH_API", default_value = "http://localhost:8787")]
    api_base: String,

    /// Proximity screening radius in km
    #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
    radius_km: f64,

    /// Region filter (GLOBAL, AMER, EMEA, APJC, LATAM; GLOBAL = all)
    #[arg(long, default_value = "GLOBAL")]
    region: String,

    /// Client state file (votes, queue, dismissals, admin key)
    #[arg(long, env = "SITEWATCH_STATE", default_value = ".sitewatch-state.json")]
    state_file: PathBuf,

    /// Feed refresh interval in seconds (watch mode)
    #[arg(long, default_value_t = 60)]
    refresh_secs: u64,

    /// Vote queue flush interval in seconds (watch mode)
    #[arg(long, default_value_t = 30)]
    flush_secs: u64,

    /// Write the ranked alert report to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feeds and report alerts until interrupted
    Watch,
    /// Fetch once, report, flush pending votes, and exit
    Once,
    /// Cast a vote on an incident (queued for retry when delivery fails)
    Vote {
        incident_id: String,
        /// "up" or "down"
        vote: String,
    },
    /// Dismiss a proximity alert by incident id for this session
    Dismiss { incident_id: String },
    /// Remember the admin credential used when the vote endpoint asks for it
    AdminKey { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let region = normalize_region(Some(&args.region));
    let store = StateStore::new(&args.state_file);
    let app = AppState::from_persisted(store.load());

    match &args.command {
        Command::Watch => watch(&args, region, &store, &app).await,
        Command::Once => once(&args, region, &store, &app).await,
        Command::Vote { incident_id, vote } => {
            cast_vote(&args, &store, &app, incident_id, vote).await
        }
        Command::Dismiss { incident_id } => {
            app.dismissed.write().await.dismiss(incident_id);
            store.save(&app.to_persisted().await)?;
            info!(incident_id, "alert dismissed");
            Ok(())
        }
        Command::AdminKey { key } => {
            *app.admin_key.write().await = Some(key.clone());
            store.save(&app.to_persisted().await)?;
            info!("admin credential remembered");
            Ok(())
        }
    }
}

async fn evaluate(app: &AppState, region: CanonicalRegion, radius_km: f64) -> Vec<ProximityAlert> {
    let incidents = app.incidents_for_alerting().await;
    let dismissed = app.dismissed.read().await.clone();
    compute_alerts(&incidents, &facility_sites(), radius_km, &dismissed, region)
}

async fn report_cycle(args: &Args, region: CanonicalRegion, app: &AppState) -> Result<()> {
    let alerts = evaluate(app, region, args.radius_km).await;
    let live = app.feed.read().await.live;
    let report = AlertReport::build(&alerts, region, args.radius_km, live);
    report.log_summary();
    if let Some(path) = &args.output {
        report.write_json(path)?;
        info!(path = %path.display(), "alert report written");
    }
    Ok(())
}

async fn once(args: &Args, region: CanonicalRegion, store: &StateStore, app: &AppState) -> Result<()> {
    let feed_client = FeedClient::new(&args.api_base);
    feed_client.refresh(app).await;
    report_cycle(args, region, app).await?;

    let transport = HttpVoteTransport::new(&args.api_base, app.admin_key.clone());
    let stats = vote_relay::flush(&app.votes, &transport).await;
    if stats.attempted > 0 {
        info!(
            delivered = stats.delivered,
            remaining = stats.remaining,
            "flushed pending votes"
        );
    }
    store.save(&app.to_persisted().await)?;
    Ok(())
}

async fn watch(args: &Args, region: CanonicalRegion, store: &StateStore, app: &AppState) -> Result<()> {
    let feed_client = FeedClient::new(&args.api_base);
    let transport = HttpVoteTransport::new(&args.api_base, app.admin_key.clone());

    info!(
        api = %args.api_base,
        radius_km = args.radius_km,
        region = %region,
        "sitewatch starting"
    );

    feed_client.refresh(app).await;
    report_cycle(args, region, app).await?;

    let mut refresh_tick = tokio::time::interval(Duration::from_secs(args.refresh_secs.max(1)));
    let mut flush_tick = tokio::time::interval(Duration::from_secs(args.flush_secs.max(1)));
    // The immediate first tick of each interval is already covered above.
    refresh_tick.tick().await;
    flush_tick.tick().await;

    loop {
        tokio::select! {
            _ = refresh_tick.tick() => {
                // Auto-refresh pauses while the feed is marked not-live.
                if app.feed.read().await.live {
                    feed_client.refresh(app).await;
                    report_cycle(args, region, app).await?;
                } else {
                    warn!("feed not live, skipping auto-refresh");
                }
            }
            _ = flush_tick.tick() => {
                let stats = vote_relay::flush(&app.votes, &transport).await;
                if stats.delivered > 0 {
                    store.save(&app.to_persisted().await)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                store.save(&app.to_persisted().await)?;
                return Ok(());
            }
        }
    }
}

async fn cast_vote(
    args: &Args,
    store: &StateStore,
    app: &AppState,
    incident_id: &str,
    vote: &str,
) -> Result<()> {
    let value = match vote.to_lowercase().as_str() {
        "up" => VoteValue::Up,
        "down" => VoteValue::Down,
        other => bail!("vote must be \"up\" or \"down\", got {other:?}"),
    };

    let transport = HttpVoteTransport::new(&args.api_base, app.admin_key.clone());
    match vote_relay::submit(&app.votes, &transport, incident_id, value).await {
        SubmitOutcome::Delivered => info!(incident_id, vote, "vote delivered"),
        SubmitOutcome::Queued => {
            warn!(incident_id, vote, "vote queued for retry")
        }
    }
    store.save(&app.to_persisted().await)?;
    Ok(())
}
