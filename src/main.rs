use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use match_analytics::analytics::MatchAnalytics;
use match_analytics::config::Config;
use match_analytics::dashboard::{self, AppState, MatchStore};
use match_analytics::feed::{start_match_monitor, MatchFeed, RestMatchFeed};
use match_analytics::playback::Playback;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let feed: Arc<dyn MatchFeed> = Arc::new(RestMatchFeed::new(&config.api_url, config.fetch_timeout())?);
    info!("Match API: {}", config.api_url);

    if let Some(match_id) = config.replay.as_deref() {
        return replay(&config, feed.as_ref(), match_id).await;
    }

    let store: MatchStore = Arc::new(RwLock::new(HashMap::new()));

    // Start the analytics API server
    let app = dashboard::router(AppState {
        store: Arc::clone(&store),
        analytics: config.analytics(),
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Analytics API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Feed snapshots into the store as they arrive
    let mut rx = start_match_monitor(
        feed,
        config.tracked_matches(),
        config.poll_interval(),
        config.fetch_timeout(),
    );
    let analytics_config = config.analytics();
    tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            let report = MatchAnalytics::compute(&snapshot.record, analytics_config);
            if report.score_mismatch() {
                warn!(
                    "Match {}: events add up to {}-{} but the official score differs",
                    snapshot.match_id, report.computed_score.home, report.computed_score.away
                );
            }
            store.write().await.insert(snapshot.match_id.clone(), snapshot);
        }
        info!("Match monitor finished; serving the last snapshots");
    });

    // Run API server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fetch one match and play it back to the log, minute by minute.
async fn replay(config: &Config, feed: &dyn MatchFeed, match_id: &str) -> Result<()> {
    let record = Arc::new(feed.fetch_match(match_id).await?);
    info!(
        "Replaying {}: {} vs {} ({} events, tick {:?})",
        match_id,
        record.home_team_name,
        record.away_team_name,
        record.events.len(),
        config.replay_tick()
    );

    let playback = Playback::start(Arc::clone(&record), config.match_length, config.replay_tick());
    let mut frames = playback.frames();
    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() || frames.borrow_and_update().finished {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; stopping playback");
                break;
            }
        }
    }
    let last = playback.current();
    playback.stop().await;

    let report = MatchAnalytics::compute(&record, config.analytics());
    info!(
        "Full time {}': {} {}-{} {} (official: {})",
        last.minute,
        record.home_team_name,
        last.score.home,
        last.score.away,
        record.away_team_name,
        report
            .official_score
            .map(|s| format!("{}-{}", s.home, s.away))
            .unwrap_or_else(|| "n/a".into())
    );
    Ok(())
}
