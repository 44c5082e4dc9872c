//! Exchange adapters (Binance, OKX, Gate, Bitget, MEXC, Huobi, Bybit)
//!
//! Each adapter wraps one venue's public spot REST API: the instruments
//! endpoint for universe resolution and the ticker endpoint for last-traded
//! prices. Price failures never escape an adapter; they are normalized to
//! "no observation" so one venue's outage cannot block the others.

mod binance;
mod bitget;
mod bybit;
mod gate;
mod huobi;
mod mexc;
mod okx;

pub use binance::BinanceApi;
pub use bitget::BitgetApi;
pub use bybit::BybitApi;
pub use gate::GateApi;
pub use huobi::HuobiApi;
pub use mexc::MexcApi;
pub use okx::OkxApi;

use crate::types::Exchange;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout for price ticks
pub const TICKER_TIMEOUT: Duration = Duration::from_secs(5);
/// Per-request timeout for instrument listings
pub const UNIVERSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure modes inside an adapter, before normalization at the boundary
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("empty or malformed response: {0}")]
    Malformed(&'static str),
}

/// One spot exchange's public read-only API
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Venue identifier
    fn id(&self) -> Exchange;

    /// All USDT spot pairs listed and tradable on this venue, in canonical
    /// form ("BTCUSDT"). Used by the universe resolver; a failure here is the
    /// caller's problem (baseline fatal-to-the-step, others degrade to empty).
    async fn fetch_pairs(&self) -> Result<Vec<String>>;

    /// Last traded price for one canonical symbol.
    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError>;

    /// Last traded price, with every error, timeout and missing field
    /// normalized to absence at this boundary.
    async fn fetch_price(&self, symbol: &str) -> Option<f64> {
        match self.try_fetch_price(symbol).await {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::debug!(exchange = %self.id(), symbol, error = %e, "Price fetch failed");
                None
            }
        }
    }
}

/// Build adapters for the enabled exchanges, preserving enumeration order
pub fn build_roster(client: &Client, enabled: &[Exchange]) -> Vec<Arc<dyn ExchangeApi>> {
    Exchange::ALL
        .iter()
        .filter(|e| enabled.contains(e))
        .map(|e| -> Arc<dyn ExchangeApi> {
            match e {
                Exchange::Binance => Arc::new(BinanceApi::new(client.clone())),
                Exchange::Okx => Arc::new(OkxApi::new(client.clone())),
                Exchange::Gate => Arc::new(GateApi::new(client.clone())),
                Exchange::Bitget => Arc::new(BitgetApi::new(client.clone())),
                Exchange::Mexc => Arc::new(MexcApi::new(client.clone())),
                Exchange::Huobi => Arc::new(HuobiApi::new(client.clone())),
                Exchange::Bybit => Arc::new(BybitApi::new(client.clone())),
            }
        })
        .collect()
}

/// Shared HTTP client for all adapters.
///
/// No default timeout: each request carries its own (short for ticks, longer
/// for instrument listings).
pub fn http_client() -> Result<Client> {
    use anyhow::Context;
    Client::builder()
        .user_agent(concat!("arbmon/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}
