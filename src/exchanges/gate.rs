//! Gate.io spot REST adapter
//!
//! Gate separates pairs with an underscore ("BTC_USDT").

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::exchanges::{ExchangeApi, ExchangeError, TICKER_TIMEOUT, UNIVERSE_TIMEOUT};
use crate::types::Exchange;

const GATE_API: &str = "https://api.gateio.ws/api/v4";

pub struct GateApi {
    client: Client,
}

impl GateApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct Ticker {
    last: String,
}

#[derive(Debug, Deserialize)]
struct CurrencyPair {
    id: String,
}

#[async_trait]
impl ExchangeApi for GateApi {
    fn id(&self) -> Exchange {
        Exchange::Gate
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        let pairs: Vec<CurrencyPair> = self
            .client
            .get(format!("{}/spot/currency_pairs", GATE_API))
            .timeout(UNIVERSE_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch Gate currency pairs")?
            .error_for_status()
            .context("Gate currency pairs returned error status")?
            .json()
            .await
            .context("Failed to parse Gate currency pairs")?;

        Ok(pairs
            .into_iter()
            .filter(|p| p.id.ends_with("_USDT"))
            .map(|p| p.id.replace('_', ""))
            .collect())
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/spot/tickers", GATE_API))
            .query(&[("currency_pair", self.id().api_symbol(symbol))])
            .timeout(TICKER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExchangeError::Status(response.status()));
        }

        let tickers: Vec<Ticker> = response.json().await?;
        let ticker = tickers
            .first()
            .ok_or(ExchangeError::Malformed("empty ticker list"))?;
        ticker
            .last
            .parse()
            .map_err(|_| ExchangeError::Malformed("unparseable price"))
    }
}
