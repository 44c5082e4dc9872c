//! ArbMon - cross-exchange arbitrage monitor
//!
//! Wires the pipeline together: config, exchange roster, universe resolver,
//! monitor loop. Each snapshot is rendered as a ranked table of the widest
//! spreads; ctrl-c stops the scheduler.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arbmon::config::AppConfig;
use arbmon::exchanges;
use arbmon::monitor::{ArbitrageMonitor, Snapshot};
use arbmon::types::ArbitrageRecord;
use arbmon::universe::{LiveRankProvider, UniverseResolver};
use arbmon::view::{profit_estimate, ResultView, NOTIONAL_LARGE, NOTIONAL_SMALL};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(config = %config, "🚀 Starting ArbMon");

    let client = exchanges::http_client()?;
    let roster = exchanges::build_roster(&client, &config.exchanges.enabled());
    let ranks = Arc::new(LiveRankProvider::new(client.clone()));
    let resolver = UniverseResolver::new(roster.clone(), ranks, &config.universe);
    let monitor = ArbitrageMonitor::new(roster, resolver, &config.refresh);

    let view = ResultView {
        page_size: config.view.page_size,
        opportunity_threshold_pct: config.view.opportunity_threshold_pct,
        ..Default::default()
    };

    let (command_tx, command_rx) = mpsc::channel(8);
    let (snapshot_tx, mut snapshot_rx) = mpsc::channel(4);
    let monitor_handle = tokio::spawn(monitor.run(command_rx, snapshot_tx));

    loop {
        tokio::select! {
            snapshot = snapshot_rx.recv() => {
                let Some(snapshot) = snapshot else { break };
                render(&view, &snapshot);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    // Closing the command channel stops the scheduler loop
    drop(command_tx);
    monitor_handle.abort();
    Ok(())
}

/// Print the first page of the widest spreads for one snapshot
fn render(view: &ResultView, snapshot: &Snapshot) {
    for notice in &snapshot.notices {
        warn!(%notice, "Degraded data for this pass");
    }
    info!(
        pairs = snapshot.pair_count,
        updated = %snapshot.last_updated.format("%H:%M:%S"),
        "Refresh complete"
    );

    // Pairs dark this pass, keyed to their last known record
    let stale: HashMap<&str, &ArbitrageRecord> = snapshot
        .stale
        .iter()
        .map(|r| (r.symbol.as_str(), r))
        .collect();

    let page = view.apply(&snapshot.records, 0);
    println!(
        "{:<14} {:>12} {:>12} {:>8} {:>10} {:>10}  {}",
        "PAIR", "LOW", "HIGH", "DIFF %", "$1k EST", "$10k EST", "ROUTE"
    );
    for record in &page.rows {
        let Some(spread) = record.spread else {
            match stale.get(record.symbol.as_str()).and_then(|r| r.spread) {
                Some(last) => println!(
                    "{:<14} {:>12.6} {:>12.6} {:>7.2}% {:>10} {:>10}  stale: buy {} / sell {}",
                    record.symbol,
                    last.lowest.price,
                    last.highest.price,
                    last.price_diff_percent,
                    "-",
                    "-",
                    last.lowest.exchange,
                    last.highest.exchange,
                ),
                None => println!(
                    "{:<14} {:>12} {:>12} {:>8} {:>10} {:>10}  no data ({}/{} exchanges)",
                    record.symbol,
                    "-",
                    "-",
                    "-",
                    "-",
                    "-",
                    record.exchange_count,
                    record.prices.len(),
                ),
            }
            continue;
        };
        let flag = if view.is_opportunity(record) { "⭐" } else { "  " };
        println!(
            "{:<14} {:>12.6} {:>12.6} {:>7.2}% {:>10.2} {:>10.2}  {} buy {} / sell {}",
            record.symbol,
            spread.lowest.price,
            spread.highest.price,
            spread.price_diff_percent,
            profit_estimate(NOTIONAL_SMALL, spread.price_diff_percent),
            profit_estimate(NOTIONAL_LARGE, spread.price_diff_percent),
            flag,
            spread.lowest.exchange,
            spread.highest.exchange,
        );
    }
    println!(
        "page 1/{} - {} pairs total - spreads are theoretical, no fees or slippage deducted",
        page.page_count, page.total
    );
}
