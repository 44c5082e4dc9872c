//! Symbol Universe Resolver
//!
//! Determines which trading pairs to monitor: the baseline exchange's USDT
//! listings, cross-checked for availability on the other venues and ordered
//! by market-cap rank with a 24h-volume fallback. Every fetch except the
//! baseline listing degrades gracefully; the baseline itself falls back to a
//! static default list rather than failing resolution.

pub mod defaults;
mod ranks;

pub use ranks::{LiveRankProvider, RankProvider, VOLUME_RANK_OFFSET};

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::UniverseConfig;
use crate::exchanges::ExchangeApi;
use crate::types::{Exchange, TradingPair};

/// Non-fatal degradation notices surfaced to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataNotice {
    /// Baseline instruments fetch failed; monitoring the default pair list
    DefaultPairs,
    /// Ranking source fully down; ordering by the static rank table
    StaticRanks,
}

impl fmt::Display for DataNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataNotice::DefaultPairs => write!(f, "using default pair list"),
            DataNotice::StaticRanks => write!(f, "using static market-cap ranks"),
        }
    }
}

/// The pair universe for one refresh cycle, plus any degradation notices
#[derive(Debug, Clone)]
pub struct ResolvedUniverse {
    pub pairs: Vec<TradingPair>,
    pub notices: Vec<DataNotice>,
}

/// Resolves the monitored pair universe against the live exchange roster
pub struct UniverseResolver {
    roster: Vec<Arc<dyn ExchangeApi>>,
    ranks: Arc<dyn RankProvider>,
    top_n: u32,
    max_pairs: usize,
}

impl UniverseResolver {
    pub fn new(
        roster: Vec<Arc<dyn ExchangeApi>>,
        ranks: Arc<dyn RankProvider>,
        config: &UniverseConfig,
    ) -> Self {
        Self {
            roster,
            ranks,
            top_n: config.top_n,
            max_pairs: config.max_pairs,
        }
    }

    /// Resolve the universe. Never fails and never returns an empty list:
    /// total baseline failure yields the static default pairs instead.
    pub async fn resolve(&self) -> ResolvedUniverse {
        let mut notices = Vec::new();

        let baseline = match self.fetch_baseline().await {
            Ok(pairs) if !pairs.is_empty() => pairs,
            Ok(_) => {
                warn!("Baseline exchange returned no pairs, using default list");
                notices.push(DataNotice::DefaultPairs);
                return ResolvedUniverse {
                    pairs: default_universe(),
                    notices,
                };
            }
            Err(e) => {
                warn!(error = %e, "Baseline pairs fetch failed, using default list");
                notices.push(DataNotice::DefaultPairs);
                return ResolvedUniverse {
                    pairs: default_universe(),
                    notices,
                };
            }
        };

        // Listings on every other venue, each failure isolated to that venue
        let other_listings = self.fetch_other_listings().await;

        // Both rank sources in parallel; market-cap total failure falls back
        // to the static table, volume ranks degrade to empty
        let (cap_result, volume_result) =
            tokio::join!(self.ranks.market_cap_ranks(), self.ranks.volume_ranks());

        let cap_ranks = match cap_result {
            Ok(ranks) if !ranks.is_empty() => ranks,
            Ok(_) | Err(_) => {
                warn!("Market-cap ranking unavailable, using static rank table");
                notices.push(DataNotice::StaticRanks);
                defaults::static_rank_table()
            }
        };
        let volume_ranks = volume_result.unwrap_or_else(|e| {
            warn!(error = %e, "Volume ranking unavailable");
            HashMap::new()
        });

        let pairs = assemble_universe(
            &baseline,
            &other_listings,
            &cap_ranks,
            &volume_ranks,
            self.top_n,
            self.max_pairs,
        );

        info!(
            baseline = baseline.len(),
            resolved = pairs.len(),
            "✅ Universe resolved"
        );

        ResolvedUniverse { pairs, notices }
    }

    async fn fetch_baseline(&self) -> anyhow::Result<Vec<String>> {
        let adapter = self
            .roster
            .iter()
            .find(|a| a.id() == Exchange::BASELINE)
            .ok_or_else(|| anyhow::anyhow!("baseline exchange not in roster"))?;
        adapter.fetch_pairs().await
    }

    async fn fetch_other_listings(&self) -> Vec<HashSet<String>> {
        let futures = self
            .roster
            .iter()
            .filter(|a| a.id() != Exchange::BASELINE)
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                async move {
                    match adapter.fetch_pairs().await {
                        Ok(pairs) => pairs.into_iter().collect(),
                        Err(e) => {
                            warn!(exchange = %adapter.id(), error = %e, "Pairs fetch failed");
                            HashSet::new()
                        }
                    }
                }
            });
        join_all(futures).await
    }
}

/// Pure assembly step: filter and order candidate pairs from already-fetched
/// inputs.
///
/// A pair is kept when its best rank is within `top_n` and it is listed on
/// at least two exchanges in total, or when it has no market-cap rank at all
/// but at least three venues list it. Ordering is ascending by rank with
/// unranked pairs last; equal ranks fall back to the symbol for determinism.
pub fn assemble_universe(
    baseline: &[String],
    other_listings: &[HashSet<String>],
    cap_ranks: &HashMap<String, u32>,
    volume_ranks: &HashMap<String, u32>,
    top_n: u32,
    max_pairs: usize,
) -> Vec<TradingPair> {
    let mut pairs: Vec<TradingPair> = baseline
        .iter()
        .map(|symbol| {
            let elsewhere = other_listings
                .iter()
                .filter(|listing| listing.contains(symbol))
                .count();
            TradingPair {
                symbol: symbol.clone(),
                market_cap_rank: cap_ranks.get(symbol).copied(),
                volume_rank: volume_ranks.get(symbol).copied(),
                listings: elsewhere + 1,
            }
        })
        .filter(|pair| {
            let ranked_and_listed =
                matches!(pair.rank(), Some(rank) if rank <= top_n) && pair.listings >= 2;
            let unranked_but_common = pair.market_cap_rank.is_none() && pair.listings >= 3;
            ranked_and_listed || unranked_but_common
        })
        .collect();

    pairs.sort_by(|a, b| match (a.rank(), b.rank()) {
        (Some(ra), Some(rb)) => ra.cmp(&rb).then_with(|| a.symbol.cmp(&b.symbol)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.symbol.cmp(&b.symbol),
    });
    pairs.truncate(max_pairs);
    pairs
}

/// Fallback universe from the static default pair list
fn default_universe() -> Vec<TradingPair> {
    let table = defaults::static_rank_table();
    let mut pairs: Vec<TradingPair> = defaults::DEFAULT_PAIRS
        .iter()
        .map(|symbol| TradingPair {
            symbol: symbol.to_string(),
            market_cap_rank: table.get(*symbol).copied(),
            volume_rank: None,
            listings: 1,
        })
        .collect();
    pairs.sort_by(|a, b| match (a.rank(), b.rank()) {
        (Some(ra), Some(rb)) => ra.cmp(&rb).then_with(|| a.symbol.cmp(&b.symbol)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.symbol.cmp(&b.symbol),
    });
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(symbols: &[&str]) -> HashSet<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn ranks(entries: &[(&str, u32)]) -> HashMap<String, u32> {
        entries.iter().map(|(s, r)| (s.to_string(), *r)).collect()
    }

    #[test]
    fn test_ranked_pair_needs_two_listings() {
        let baseline = vec!["BTCUSDT".to_string(), "LONELYUSDT".to_string()];
        let others = vec![set(&["BTCUSDT"]), set(&[]), set(&[])];
        let cap = ranks(&[("BTCUSDT", 1), ("LONELYUSDT", 5)]);

        let pairs = assemble_universe(&baseline, &others, &cap, &HashMap::new(), 1000, 1000);

        // LONELYUSDT is ranked but only the baseline lists it
        let symbols: Vec<&str> = pairs.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTCUSDT"]);
        assert_eq!(pairs[0].listings, 2);
    }

    #[test]
    fn test_unranked_pair_needs_three_listings() {
        let baseline = vec!["AAAUSDT".to_string(), "BBBUSDT".to_string()];
        let others = vec![
            set(&["AAAUSDT", "BBBUSDT"]),
            set(&["AAAUSDT"]),
            set(&[]),
        ];

        let pairs = assemble_universe(
            &baseline,
            &others,
            &HashMap::new(),
            &HashMap::new(),
            1000,
            1000,
        );

        // AAAUSDT: 3 listings, kept; BBBUSDT: 2 listings, unranked, dropped
        let symbols: Vec<&str> = pairs.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAAUSDT"]);
    }

    #[test]
    fn test_rank_beyond_top_n_is_dropped() {
        let baseline = vec!["FARUSDT".to_string()];
        let others = vec![set(&["FARUSDT"]), set(&["FARUSDT"])];
        let cap = ranks(&[("FARUSDT", 1001)]);

        let pairs = assemble_universe(&baseline, &others, &cap, &HashMap::new(), 1000, 1000);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_sorted_by_rank_with_unranked_last() {
        let baseline = vec![
            "AUSDT".to_string(),
            "BUSDT".to_string(),
            "CUSDT".to_string(),
        ];
        let others = vec![set(&["AUSDT", "BUSDT", "CUSDT"]), set(&["AUSDT", "CUSDT"])];
        let cap = ranks(&[("BUSDT", 2), ("CUSDT", 9)]);

        let pairs = assemble_universe(&baseline, &others, &cap, &HashMap::new(), 1000, 1000);
        let symbols: Vec<&str> = pairs.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BUSDT", "CUSDT", "AUSDT"]);
    }

    #[test]
    fn test_volume_rank_orders_pairs_missing_from_cap_table() {
        let baseline = vec!["XUSDT".to_string(), "YUSDT".to_string()];
        let others = vec![
            set(&["XUSDT", "YUSDT"]),
            set(&["XUSDT", "YUSDT"]),
        ];
        // Both unranked by market cap, both on 3 venues; volume decides order
        let volume = ranks(&[("XUSDT", 1050), ("YUSDT", 1010)]);

        let pairs = assemble_universe(
            &baseline,
            &others,
            &HashMap::new(),
            &volume,
            1000,
            1000,
        );
        let symbols: Vec<&str> = pairs.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["YUSDT", "XUSDT"]);
    }

    #[test]
    fn test_truncated_to_max_pairs() {
        let baseline: Vec<String> = (0..50).map(|i| format!("T{:02}USDT", i)).collect();
        let others = vec![baseline.iter().cloned().collect::<HashSet<_>>()];
        let cap: HashMap<String, u32> = baseline
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as u32 + 1))
            .collect();

        let pairs = assemble_universe(&baseline, &others, &cap, &HashMap::new(), 1000, 10);
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0].market_cap_rank, Some(1));
    }

    #[test]
    fn test_default_universe_is_never_empty() {
        let pairs = default_universe();
        assert!(!pairs.is_empty());
        assert_eq!(pairs.len(), defaults::DEFAULT_PAIRS.len());
        // BTC ranks first in the static table
        assert_eq!(pairs[0].symbol, "BTCUSDT");
    }
}
