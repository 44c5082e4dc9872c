//! End-to-end pipeline tests with stub exchange adapters
//!
//! No network: venues and ranking sources are replaced with stubs so the
//! fan-out, failure isolation and fallback paths are deterministic.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arbmon::arbitrage::{compute_record, fetch_quotes};
use arbmon::config::{RefreshConfig, UniverseConfig};
use arbmon::exchanges::{ExchangeApi, ExchangeError};
use arbmon::monitor::ArbitrageMonitor;
use arbmon::types::Exchange;
use arbmon::universe::{DataNotice, RankProvider, UniverseResolver};

/// Scripted venue: fixed listings and prices, optional latency, optional
/// total outage
struct StubExchange {
    id: Exchange,
    /// `None` simulates a failing instruments endpoint
    listings: Option<Vec<&'static str>>,
    prices: HashMap<&'static str, f64>,
    delay: Duration,
    broken: bool,
}

impl StubExchange {
    fn new(id: Exchange, listings: &[&'static str], prices: &[(&'static str, f64)]) -> Self {
        Self {
            id,
            listings: Some(listings.to_vec()),
            prices: prices.iter().copied().collect(),
            delay: Duration::ZERO,
            broken: false,
        }
    }

    fn broken(id: Exchange) -> Self {
        Self {
            id,
            listings: None,
            prices: HashMap::new(),
            delay: Duration::ZERO,
            broken: true,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ExchangeApi for StubExchange {
    fn id(&self) -> Exchange {
        self.id
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        match &self.listings {
            Some(listings) => Ok(listings.iter().map(|s| s.to_string()).collect()),
            None => bail!("stub instruments endpoint down"),
        }
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.broken {
            return Err(ExchangeError::Malformed("stub outage"));
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or(ExchangeError::Malformed("pair not listed"))
    }
}

/// Quotes one symbol on the first call, then goes dark for good
struct FadingExchange {
    id: Exchange,
    symbol: &'static str,
    price: f64,
    served: AtomicBool,
}

impl FadingExchange {
    fn new(id: Exchange, symbol: &'static str, price: f64) -> Self {
        Self {
            id,
            symbol,
            price,
            served: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ExchangeApi for FadingExchange {
    fn id(&self) -> Exchange {
        self.id
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        Ok(vec![self.symbol.to_string()])
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        if symbol != self.symbol || self.served.swap(true, Ordering::SeqCst) {
            return Err(ExchangeError::Malformed("gone dark"));
        }
        Ok(self.price)
    }
}

/// Scripted ranking source
struct StubRanks {
    cap: Option<HashMap<String, u32>>,
    volume: HashMap<String, u32>,
}

impl StubRanks {
    fn with_cap(entries: &[(&str, u32)]) -> Self {
        Self {
            cap: Some(entries.iter().map(|(s, r)| (s.to_string(), *r)).collect()),
            volume: HashMap::new(),
        }
    }

    fn down() -> Self {
        Self {
            cap: None,
            volume: HashMap::new(),
        }
    }
}

#[async_trait]
impl RankProvider for StubRanks {
    async fn market_cap_ranks(&self) -> Result<HashMap<String, u32>> {
        match &self.cap {
            Some(cap) => Ok(cap.clone()),
            None => bail!("stub ranking source down"),
        }
    }

    async fn volume_ranks(&self) -> Result<HashMap<String, u32>> {
        Ok(self.volume.clone())
    }
}

fn universe_config() -> UniverseConfig {
    UniverseConfig {
        top_n: 1000,
        max_pairs: 1000,
    }
}

fn manual_refresh() -> RefreshConfig {
    RefreshConfig {
        auto: false,
        interval_secs: 30,
    }
}

#[tokio::test]
async fn failing_exchange_does_not_block_the_others() {
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(StubExchange::new(
            Exchange::Binance,
            &["XUSDT"],
            &[("XUSDT", 100.0)],
        )),
        Arc::new(StubExchange::broken(Exchange::Okx).with_delay(Duration::from_millis(50))),
        Arc::new(StubExchange::new(
            Exchange::Gate,
            &["XUSDT"],
            &[("XUSDT", 101.0)],
        )),
    ];

    let quotes = fetch_quotes(&roster, "XUSDT").await;
    assert_eq!(
        quotes,
        vec![
            (Exchange::Binance, Some(100.0)),
            (Exchange::Okx, None),
            (Exchange::Gate, Some(101.0)),
        ]
    );

    // The surviving quotes produce the expected end-to-end record
    let record = compute_record("XUSDT", None, quotes);
    assert_eq!(record.exchange_count, 2);
    let spread = record.spread.unwrap();
    assert_eq!(spread.lowest.exchange, Exchange::Binance);
    assert_eq!(spread.lowest.price, 100.0);
    assert_eq!(spread.highest.exchange, Exchange::Gate);
    assert_eq!(spread.highest.price, 101.0);
    assert!((spread.price_diff - 1.0).abs() < 1e-9);
    assert!((spread.price_diff_percent - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn dark_pair_stays_in_the_snapshot() {
    // Both venues list DARKUSDT but neither prices it this tick
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(StubExchange::new(
            Exchange::Binance,
            &["XUSDT", "DARKUSDT"],
            &[("XUSDT", 100.0)],
        )),
        Arc::new(StubExchange::new(
            Exchange::Okx,
            &["XUSDT", "DARKUSDT"],
            &[("XUSDT", 100.8)],
        )),
    ];
    let ranks = Arc::new(StubRanks::with_cap(&[("XUSDT", 1), ("DARKUSDT", 2)]));
    let resolver = UniverseResolver::new(roster.clone(), ranks, &universe_config());
    let mut monitor = ArbitrageMonitor::new(roster, resolver, &manual_refresh());

    let snapshot = monitor.refresh_once().await;

    assert_eq!(snapshot.pair_count, 2);
    let dark = snapshot
        .records
        .iter()
        .find(|r| r.symbol == "DARKUSDT")
        .expect("dark pair must not be dropped");
    assert_eq!(dark.exchange_count, 0);
    assert!(dark.spread.is_none());

    // The priced pair is cached as last-known, the dark one is not
    assert!(monitor.last_known("XUSDT").is_some());
    assert!(monitor.last_known("DARKUSDT").is_none());

    // No earlier pass, so there is nothing stale to surface yet; every
    // record carries one price slot per roster venue
    assert!(snapshot.stale.is_empty());
    assert_eq!(dark.prices.len(), 2);
}

#[tokio::test]
async fn dark_pass_surfaces_the_last_known_record_as_stale() {
    // Both venues quote XUSDT exactly once, then every later pass is dark
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(FadingExchange::new(Exchange::Binance, "XUSDT", 100.0)),
        Arc::new(FadingExchange::new(Exchange::Okx, "XUSDT", 100.8)),
    ];
    let ranks = Arc::new(StubRanks::with_cap(&[("XUSDT", 1)]));
    let resolver = UniverseResolver::new(roster.clone(), ranks, &universe_config());
    let mut monitor = ArbitrageMonitor::new(roster, resolver, &manual_refresh());

    let first = monitor.refresh_once().await;
    assert_eq!(first.records[0].exchange_count, 2);
    assert!(first.stale.is_empty());

    let second = monitor.refresh_once().await;
    assert_eq!(second.records[0].exchange_count, 0);
    assert!(second.records[0].spread.is_none());

    // The dark pair carries its last known record alongside the live pass
    assert_eq!(second.stale.len(), 1);
    assert_eq!(second.stale[0], first.records[0]);
    assert!(second.stale[0].spread.is_some());
}

#[tokio::test]
async fn snapshots_replace_wholesale() {
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(StubExchange::new(
            Exchange::Binance,
            &["XUSDT"],
            &[("XUSDT", 100.0)],
        )),
        Arc::new(StubExchange::new(
            Exchange::Bybit,
            &["XUSDT"],
            &[("XUSDT", 100.6)],
        )),
    ];
    let ranks = Arc::new(StubRanks::with_cap(&[("XUSDT", 1)]));
    let resolver = UniverseResolver::new(roster.clone(), ranks, &universe_config());
    let mut monitor = ArbitrageMonitor::new(roster, resolver, &manual_refresh());

    let first = monitor.refresh_once().await;
    let second = monitor.refresh_once().await;

    assert_eq!(first.records.len(), second.records.len());
    assert!(second.last_updated >= first.last_updated);
    // Identical inputs reduce identically across passes
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn baseline_failure_falls_back_to_default_pairs() {
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(StubExchange::broken(Exchange::Binance)),
        Arc::new(StubExchange::new(Exchange::Okx, &["BTCUSDT"], &[])),
    ];
    let ranks = Arc::new(StubRanks::with_cap(&[("BTCUSDT", 1)]));
    let resolver = UniverseResolver::new(roster, ranks, &universe_config());

    let resolved = resolver.resolve().await;

    assert!(!resolved.pairs.is_empty(), "fallback list must not be empty");
    assert!(resolved.notices.contains(&DataNotice::DefaultPairs));
    assert!(resolved.pairs.iter().any(|p| p.symbol == "BTCUSDT"));
}

#[tokio::test]
async fn ranking_outage_falls_back_to_static_table() {
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(StubExchange::new(
            Exchange::Binance,
            &["BTCUSDT", "ETHUSDT"],
            &[],
        )),
        Arc::new(StubExchange::new(
            Exchange::Gate,
            &["BTCUSDT", "ETHUSDT"],
            &[],
        )),
    ];
    let resolver =
        UniverseResolver::new(roster, Arc::new(StubRanks::down()), &universe_config());

    let resolved = resolver.resolve().await;

    assert!(resolved.notices.contains(&DataNotice::StaticRanks));
    // Static table still orders the pairs: BTC before ETH
    let symbols: Vec<&str> = resolved.pairs.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    assert_eq!(resolved.pairs[0].market_cap_rank, Some(1));
}

#[tokio::test]
async fn one_failing_instruments_endpoint_only_loses_that_venue() {
    let roster: Vec<Arc<dyn ExchangeApi>> = vec![
        Arc::new(StubExchange::new(
            Exchange::Binance,
            &["BTCUSDT", "AAAUSDT"],
            &[],
        )),
        Arc::new(StubExchange::broken(Exchange::Okx)),
        Arc::new(StubExchange::new(Exchange::Gate, &["BTCUSDT"], &[])),
    ];
    let ranks = Arc::new(StubRanks::with_cap(&[("BTCUSDT", 1), ("AAAUSDT", 2)]));
    let resolver = UniverseResolver::new(roster, ranks, &universe_config());

    let resolved = resolver.resolve().await;

    // Resolution itself succeeded, no fallback notice
    assert!(resolved.notices.is_empty());
    // BTCUSDT keeps its Gate listing; AAAUSDT is baseline-only and dropped
    let symbols: Vec<&str> = resolved.pairs.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTCUSDT"]);
    assert_eq!(resolved.pairs[0].listings, 2);
}
