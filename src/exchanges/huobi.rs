//! Huobi (HTX) spot REST adapter
//!
//! Huobi takes lowercase symbols and returns the close of the merged ticker
//! as a JSON number rather than a string.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::exchanges::{ExchangeApi, ExchangeError, TICKER_TIMEOUT, UNIVERSE_TIMEOUT};
use crate::types::Exchange;

const HUOBI_API: &str = "https://api.huobi.pro";

pub struct HuobiApi {
    client: Client,
}

impl HuobiApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct MergedTickerResponse {
    tick: Option<Tick>,
}

#[derive(Debug, Deserialize)]
struct Tick {
    close: f64,
}

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    #[serde(default)]
    data: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    #[serde(rename = "base-currency")]
    base_currency: String,
    #[serde(rename = "quote-currency")]
    quote_currency: String,
    state: String,
}

#[async_trait]
impl ExchangeApi for HuobiApi {
    fn id(&self) -> Exchange {
        Exchange::Huobi
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        let response: SymbolsResponse = self
            .client
            .get(format!("{}/v1/common/symbols", HUOBI_API))
            .timeout(UNIVERSE_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch Huobi symbols")?
            .error_for_status()
            .context("Huobi symbols returned error status")?
            .json()
            .await
            .context("Failed to parse Huobi symbols")?;

        Ok(response
            .data
            .into_iter()
            .filter(|s| s.quote_currency == "usdt" && s.state == "online")
            .map(|s| format!("{}{}", s.base_currency, s.quote_currency).to_uppercase())
            .collect())
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/market/detail/merged", HUOBI_API))
            .query(&[("symbol", self.id().api_symbol(symbol))])
            .timeout(TICKER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExchangeError::Status(response.status()));
        }

        let merged: MergedTickerResponse = response.json().await?;
        merged
            .tick
            .map(|t| t.close)
            .ok_or(ExchangeError::Malformed("missing tick"))
    }
}
