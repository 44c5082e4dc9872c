//! MEXC spot REST adapter
//!
//! MEXC mirrors the Binance v3 API shape but marks tradable symbols with
//! status "ENABLED" instead of "TRADING".

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::exchanges::{ExchangeApi, ExchangeError, TICKER_TIMEOUT, UNIVERSE_TIMEOUT};
use crate::types::Exchange;

const MEXC_API: &str = "https://api.mexc.com/api/v3";

pub struct MexcApi {
    client: Client,
}

impl MexcApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    status: String,
}

#[async_trait]
impl ExchangeApi for MexcApi {
    fn id(&self) -> Exchange {
        Exchange::Mexc
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        let info: ExchangeInfo = self
            .client
            .get(format!("{}/exchangeInfo", MEXC_API))
            .timeout(UNIVERSE_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch MEXC exchange info")?
            .error_for_status()
            .context("MEXC exchange info returned error status")?
            .json()
            .await
            .context("Failed to parse MEXC exchange info")?;

        Ok(info
            .symbols
            .into_iter()
            .filter(|s| s.status == "ENABLED" && s.symbol.ends_with("USDT"))
            .map(|s| s.symbol)
            .collect())
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/ticker/price", MEXC_API))
            .query(&[("symbol", self.id().api_symbol(symbol))])
            .timeout(TICKER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExchangeError::Status(response.status()));
        }

        let ticker: TickerPrice = response.json().await?;
        ticker
            .price
            .parse()
            .map_err(|_| ExchangeError::Malformed("unparseable price"))
    }
}
