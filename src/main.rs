use courtside::config::Config;
use courtside::engine::tracker::MatchTracker;
use courtside::feeds::live::LiveScoreFeed;
use courtside::feeds::simulator::Simulator;
use courtside::models::signal::SignalEvent;
use courtside::telemetry::alerts::AlertManager;
use courtside::telemetry::notifications::NotificationLog;
use courtside::telemetry::stats::TradeStats;

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("================================================");
    info!("  COURTSIDE — NBA deficit hedge engine v0.1.0");
    info!("  Staged entry/exit alerts on live score gaps");
    info!("================================================");

    // Load and validate config (reads .env automatically)
    let config = Config::load_or_default();
    config.validate()?;

    info!("--- Feed configuration ---");
    info!("  Simulator:  {}", config.simulation.enabled);
    info!("  Live sync:  {}", config.live_enabled());
    info!("  Matches:    {}", config.simulation.match_count);
    info!("  Tick:       {}ms", config.simulation.tick_ms);

    // === Initialize components ===

    // Shutdown signal
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let tracker = Arc::new(MatchTracker::new());
    let alert_mgr = Arc::new(AlertManager::new(config.telemetry.clone()));
    let notification_log = Arc::new(Mutex::new(NotificationLog::new()));

    // Seed the registry with mock matchups; the live loop (when enabled)
    // replays external scores onto the same states as signed deltas.
    let mut simulator = Simulator::new(config.simulation.clone());
    for m in simulator.generate_matches() {
        info!(
            "Tracking {} [{:?}] home {} / away {}",
            m.label(),
            m.scenario,
            m.home_odds,
            m.away_odds
        );
        tracker.insert(m);
    }

    // === Spawn simulation tick loop ===
    if config.simulation.enabled {
        let tracker = tracker.clone();
        let alerts = alert_mgr.clone();
        let log = notification_log.clone();
        let tick_ms = config.simulation.tick_ms;
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(tick_ms));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        // One full batch per tick: every match's update is
                        // applied and dispatched before the next tick fires.
                        for state in tracker.snapshot() {
                            let tick = simulator.next_tick(&state);
                            if let Some(q) = tick.quarter {
                                tracker.set_quarter(&tick.match_id, q);
                                info!("{} enters quarter {q}", state.label());
                            }
                            let events = tracker.apply_update(
                                &tick.match_id,
                                tick.home_delta,
                                tick.away_delta,
                            );
                            dispatch(&events, &log, &alerts).await;
                        }
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
        info!("Simulation loop started");
    }

    // === Spawn live sync loop ===
    if config.live_enabled() {
        let feed = LiveScoreFeed::new(config.live.clone());
        let tracker = tracker.clone();
        let alerts = alert_mgr.clone();
        let log = notification_log.clone();
        let poll_secs = config.live.poll_secs;
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(poll_secs));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match feed.sync(&tracker).await {
                            Ok(events) => dispatch(&events, &log, &alerts).await,
                            Err(e) => warn!("Live sync failed: {e}"),
                        }
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
        info!("Live sync loop started ({}s poll)", config.live.poll_secs);
    }

    // === Spawn stats summary loop (every 30s) ===
    {
        let tracker = tracker.clone();
        let log = notification_log.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(30));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let matches = tracker.snapshot();
                        TradeStats::from_matches(&matches).log_summary();
                        for m in &matches {
                            info!(
                                "{} Q{} {}:{} steps={:?}",
                                m.label(),
                                m.quarter,
                                m.home_score,
                                m.away_score,
                                m.recovery_steps.iter().map(|s| s.label()).collect::<Vec<_>>()
                            );
                        }
                        info!("Notifications in feed: {}", log.lock().await.len());
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());

    Ok(())
}

/// Route one batch of engine events through dedup and outbound delivery.
async fn dispatch(
    events: &[SignalEvent],
    log: &Mutex<NotificationLog>,
    alerts: &AlertManager,
) {
    for event in events {
        let fresh = log.lock().await.record(event).is_some();
        if fresh {
            alerts.dispatch(event).await;
        }
    }
}
