//! Ranking sources for universe resolution
//!
//! Market-cap ranks come from the CoinGecko markets listing (paged, pages
//! fetched concurrently, partial page failures tolerated). Volume ranks come
//! from the baseline exchange's 24h ticker and are offset by a constant so a
//! volume rank can never outrank a genuine market-cap rank.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";
const BINANCE_API: &str = "https://api.binance.com/api/v3";

/// Pages of 250 assets each: 4 pages cover the top 1000
const RANK_PAGES: u32 = 4;
const RANK_PAGE_SIZE: u32 = 250;
/// Ranking endpoints are slower than tickers
const RANK_TIMEOUT: Duration = Duration::from_secs(15);

/// Added to every volume-based rank so it sorts after all market-cap ranks
pub const VOLUME_RANK_OFFSET: u32 = 1000;

/// Source of ordering ranks for candidate pairs.
///
/// Both maps are keyed by canonical pair symbol ("BTCUSDT"). Either fetch
/// may fail; the resolver decides the fallback.
#[async_trait]
pub trait RankProvider: Send + Sync {
    /// Market-cap ranks, lower = more valuable
    async fn market_cap_ranks(&self) -> Result<HashMap<String, u32>>;
    /// Offset 24h-volume ranks from the baseline exchange
    async fn volume_ranks(&self) -> Result<HashMap<String, u32>>;
}

/// Live provider backed by CoinGecko and Binance
pub struct LiveRankProvider {
    client: Client,
}

impl LiveRankProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_rank_page(&self, page: u32) -> Result<Vec<MarketEntry>> {
        self.client
            .get(format!("{}/coins/markets", COINGECKO_API))
            .query(&[
                ("vs_currency", "usd".to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", RANK_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .timeout(RANK_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch market-cap page")?
            .error_for_status()
            .context("Market-cap page returned error status")?
            .json()
            .await
            .context("Failed to parse market-cap page")
    }
}

#[derive(Debug, Deserialize)]
struct MarketEntry {
    symbol: String,
    market_cap_rank: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DayTicker {
    symbol: String,
    #[serde(rename = "quoteVolume")]
    quote_volume: String,
}

#[async_trait]
impl RankProvider for LiveRankProvider {
    async fn market_cap_ranks(&self) -> Result<HashMap<String, u32>> {
        let pages = join_all((1..=RANK_PAGES).map(|page| self.fetch_rank_page(page))).await;

        let mut ranks = HashMap::new();
        let mut failed = 0usize;
        for (idx, page) in pages.into_iter().enumerate() {
            match page {
                Ok(entries) => {
                    for entry in entries {
                        if let Some(rank) = entry.market_cap_rank {
                            let pair = format!("{}USDT", entry.symbol.to_uppercase());
                            // Keep the best rank when an asset symbol repeats
                            let slot = ranks.entry(pair).or_insert(rank);
                            if rank < *slot {
                                *slot = rank;
                            }
                        }
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!(page = idx + 1, error = %e, "Market-cap page fetch failed");
                }
            }
        }

        if failed as u32 == RANK_PAGES {
            bail!("all {} market-cap pages failed", RANK_PAGES);
        }
        Ok(ranks)
    }

    async fn volume_ranks(&self) -> Result<HashMap<String, u32>> {
        let tickers: Vec<DayTicker> = self
            .client
            .get(format!("{}/ticker/24hr", BINANCE_API))
            .timeout(RANK_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch 24h tickers")?
            .error_for_status()
            .context("24h tickers returned error status")?
            .json()
            .await
            .context("Failed to parse 24h tickers")?;

        let mut by_volume: Vec<(String, f64)> = tickers
            .into_iter()
            .filter(|t| t.symbol.ends_with("USDT"))
            .filter_map(|t| {
                let volume: f64 = t.quote_volume.parse().ok()?;
                Some((t.symbol, volume))
            })
            .collect();
        by_volume.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(by_volume
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, _))| (symbol, i as u32 + 1 + VOLUME_RANK_OFFSET))
            .collect())
    }
}
