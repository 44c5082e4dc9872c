//! OKX spot REST adapter
//!
//! OKX identifies instruments with a hyphen ("BTC-USDT"); pairs are folded
//! back to canonical form for the rest of the pipeline.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::exchanges::{ExchangeApi, ExchangeError, TICKER_TIMEOUT, UNIVERSE_TIMEOUT};
use crate::types::Exchange;

const OKX_API: &str = "https://www.okx.com/api/v5";

pub struct OkxApi {
    client: Client,
}

impl OkxApi {
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
    last: String,
}

#[derive(Debug, Deserialize)]
struct InstrumentsResponse {
    #[serde(default)]
    data: Vec<Instrument>,
}

#[derive(Debug, Deserialize)]
struct Instrument {
    #[serde(rename = "instId")]
    inst_id: String,
}

#[async_trait]
impl ExchangeApi for OkxApi {
    fn id(&self) -> Exchange {
        Exchange::Okx
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        let response: InstrumentsResponse = self
            .client
            .get(format!("{}/public/instruments", OKX_API))
            .query(&[("instType", "SPOT")])
            .timeout(UNIVERSE_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch OKX instruments")?
            .error_for_status()
            .context("OKX instruments returned error status")?
            .json()
            .await
            .context("Failed to parse OKX instruments")?;

        Ok(response
            .data
            .into_iter()
            .filter(|i| i.inst_id.ends_with("-USDT"))
            .map(|i| i.inst_id.replace('-', ""))
            .collect())
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/market/ticker", OKX_API))
            .query(&[("instId", self.id().api_symbol(symbol))])
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
            .last
            .parse()
            .map_err(|_| ExchangeError::Malformed("unparseable price"))
    }
}
