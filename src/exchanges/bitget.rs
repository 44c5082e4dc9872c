//! Bitget spot REST adapter

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::exchanges::{ExchangeApi, ExchangeError, TICKER_TIMEOUT, UNIVERSE_TIMEOUT};
use crate::types::Exchange;

const BITGET_API: &str = "https://api.bitget.com/api/v2";

pub struct BitgetApi {
    client: Client,
}

impl BitgetApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    data: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    #[serde(rename = "lastPr")]
    last_price: String,
}

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    #[serde(default)]
    data: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    #[serde(rename = "symbolName")]
    symbol_name: String,
}

#[async_trait]
impl ExchangeApi for BitgetApi {
    fn id(&self) -> Exchange {
        Exchange::Bitget
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        let response: SymbolsResponse = self
            .client
            .get(format!("{}/spot/public/symbols", BITGET_API))
            .timeout(UNIVERSE_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch Bitget symbols")?
            .error_for_status()
            .context("Bitget symbols returned error status")?
            .json()
            .await
            .context("Failed to parse Bitget symbols")?;

        Ok(response
            .data
            .into_iter()
            .filter(|s| s.symbol_name.ends_with("USDT"))
            .map(|s| s.symbol_name)
            .collect())
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/spot/market/tickers", BITGET_API))
            .query(&[("symbol", self.id().api_symbol(symbol))])
            .timeout(TICKER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExchangeError::Status(response.status()));
        }

        let tickers: TickerResponse = response.json().await?;
        let ticker = tickers
            .data
            .first()
            .ok_or(ExchangeError::Malformed("empty ticker list"))?;
        ticker
            .last_price
            .parse()
            .map_err(|_| ExchangeError::Malformed("unparseable price"))
    }
}
