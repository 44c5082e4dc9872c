//! Refresh Scheduler and snapshot assembly
//!
//! Owns the pipeline: resolves the pair universe (cached until explicitly
//! refreshed), fans price fetches out per pair, reduces them to records and
//! publishes a wholesale snapshot per pass. The pass is awaited inside the
//! scheduler loop, so at most one pass is ever in flight per monitor; a
//! timer tick arriving mid-pass is skipped, never run concurrently.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::arbitrage::{compute_record, fetch_quotes};
use crate::cache::FifoCache;
use crate::config::RefreshConfig;
use crate::exchanges::ExchangeApi;
use crate::types::{ArbitrageRecord, TradingPair};
use crate::universe::{DataNotice, ResolvedUniverse, UniverseResolver};

/// Cap on the recently-seen record cache
const RECENT_CACHE_CAP: usize = 1000;

/// Runtime controls for a running monitor
#[derive(Debug, Clone)]
pub enum MonitorCommand {
    /// Run one pipeline pass now
    Refresh,
    /// Re-resolve the pair universe, then run a pass
    RefreshUniverse,
    /// Toggle the auto-refresh timer. Turning it off drops the pending
    /// timer; it never cancels a pass already in flight.
    SetAutoRefresh(bool),
    /// Change the auto-refresh cadence (clamped to 1s..24h)
    SetInterval(Duration),
}

/// The complete result of one pipeline pass.
///
/// Snapshots replace each other wholesale at the presentation boundary; no
/// reader ever sees a half-updated record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// One record per monitored pair, in universe order
    pub records: Vec<ArbitrageRecord>,
    /// Last known record for each pair that went dark this pass, so the
    /// presentation can show stale-but-known data instead of nothing
    pub stale: Vec<ArbitrageRecord>,
    /// The resolved universe backing this pass
    pub pairs: Vec<TradingPair>,
    pub pair_count: usize,
    pub last_updated: DateTime<Utc>,
    /// Degradation notices from universe resolution
    pub notices: Vec<DataNotice>,
}

/// Drives the fetch → reduce → publish cycle
pub struct ArbitrageMonitor {
    roster: Vec<Arc<dyn ExchangeApi>>,
    resolver: UniverseResolver,
    universe: Option<ResolvedUniverse>,
    /// Last known record per symbol that had at least one observation
    recent: FifoCache<String, ArbitrageRecord>,
    auto_refresh: bool,
    interval: Duration,
}

impl ArbitrageMonitor {
    pub fn new(
        roster: Vec<Arc<dyn ExchangeApi>>,
        resolver: UniverseResolver,
        refresh: &RefreshConfig,
    ) -> Self {
        Self {
            roster,
            resolver,
            universe: None,
            recent: FifoCache::new(RECENT_CACHE_CAP),
            auto_refresh: refresh.auto,
            interval: refresh.interval(),
        }
    }

    /// Last record with data for a symbol, possibly from an earlier pass
    pub fn last_known(&self, symbol: &str) -> Option<&ArbitrageRecord> {
        self.recent.get(&symbol.to_string())
    }

    /// Re-resolve the pair universe (otherwise it stays cached across passes)
    pub async fn refresh_universe(&mut self) {
        self.universe = Some(self.resolver.resolve().await);
    }

    /// Run one full pipeline pass and assemble its snapshot
    pub async fn refresh_once(&mut self) -> Snapshot {
        if self.universe.is_none() {
            self.refresh_universe().await;
        }
        // Checked or populated just above
        let universe = match &self.universe {
            Some(u) => u.clone(),
            None => ResolvedUniverse {
                pairs: Vec::new(),
                notices: Vec::new(),
            },
        };

        let started = std::time::Instant::now();
        let records: Vec<ArbitrageRecord> = join_all(universe.pairs.iter().map(|pair| {
            let roster = &self.roster;
            async move {
                let quotes = fetch_quotes(roster, &pair.symbol).await;
                compute_record(&pair.symbol, pair.market_cap_rank, quotes)
            }
        }))
        .await;

        let mut stale = Vec::new();
        for record in &records {
            if record.exchange_count > 0 {
                self.recent.insert(record.symbol.clone(), record.clone());
            } else if let Some(previous) = self.recent.get(&record.symbol) {
                stale.push(previous.clone());
            }
        }

        debug!(
            pairs = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline pass complete"
        );

        Snapshot {
            pair_count: universe.pairs.len(),
            records,
            stale,
            pairs: universe.pairs,
            last_updated: Utc::now(),
            notices: universe.notices,
        }
    }

    /// Scheduler loop: one immediate pass, then timed passes while
    /// auto-refresh is on, interleaved with commands. Exits when the command
    /// channel closes or every snapshot receiver is gone.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<MonitorCommand>,
        snapshots: mpsc::Sender<Snapshot>,
    ) {
        if !self.publish(&snapshots).await {
            return;
        }

        let mut ticker = self.make_ticker();
        loop {
            tokio::select! {
                _ = next_tick(&mut ticker) => {
                    if !self.publish(&snapshots).await {
                        break;
                    }
                }
                cmd = commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    debug!(?cmd, "Monitor command received");
                    let ok = match cmd {
                        MonitorCommand::Refresh => self.publish(&snapshots).await,
                        MonitorCommand::RefreshUniverse => {
                            self.refresh_universe().await;
                            self.publish(&snapshots).await
                        }
                        MonitorCommand::SetAutoRefresh(on) => {
                            self.auto_refresh = on;
                            ticker = self.make_ticker();
                            true
                        }
                        MonitorCommand::SetInterval(period) => {
                            self.interval = Duration::from_secs(
                                period.as_secs().clamp(1, 86_400),
                            );
                            ticker = self.make_ticker();
                            true
                        }
                    };
                    if !ok {
                        break;
                    }
                }
            }
        }
        info!("Monitor stopped");
    }

    async fn publish(&mut self, snapshots: &mpsc::Sender<Snapshot>) -> bool {
        let snapshot = self.refresh_once().await;
        snapshots.send(snapshot).await.is_ok()
    }

    fn make_ticker(&self) -> Option<Interval> {
        if !self.auto_refresh {
            return None;
        }
        // First tick one period from now; the initial pass already ran
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Some(ticker)
    }
}

/// Pending forever while auto-refresh is off
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
