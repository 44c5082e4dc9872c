//! Bybit spot REST adapter

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::exchanges::{ExchangeApi, ExchangeError, TICKER_TIMEOUT, UNIVERSE_TIMEOUT};
use crate::types::Exchange;

const BYBIT_API: &str = "https://api.bybit.com/v5";

pub struct BybitApi {
    client: Client,
}

impl BybitApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: ResultList<T>,
}

#[derive(Debug, Deserialize)]
struct ResultList<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    #[serde(rename = "lastPrice")]
    last_price: String,
}

#[derive(Debug, Deserialize)]
struct Instrument {
    symbol: String,
    status: String,
}

#[async_trait]
impl ExchangeApi for BybitApi {
    fn id(&self) -> Exchange {
        Exchange::Bybit
    }

    async fn fetch_pairs(&self) -> Result<Vec<String>> {
        let response: ApiResponse<Instrument> = self
            .client
            .get(format!("{}/market/instruments-info", BYBIT_API))
            .query(&[("category", "spot")])
            .timeout(UNIVERSE_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch Bybit instruments")?
            .error_for_status()
            .context("Bybit instruments returned error status")?
            .json()
            .await
            .context("Failed to parse Bybit instruments")?;

        Ok(response
            .result
            .list
            .into_iter()
            .filter(|i| i.status == "Trading" && i.symbol.ends_with("USDT"))
            .map(|i| i.symbol)
            .collect())
    }

    async fn try_fetch_price(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let response = self
            .client
            .get(format!("{}/market/tickers", BYBIT_API))
            .query(&[
                ("category", "spot".to_string()),
                ("symbol", self.id().api_symbol(symbol)),
            ])
            .timeout(TICKER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExchangeError::Status(response.status()));
        }

        let tickers: ApiResponse<Ticker> = response.json().await?;
        let ticker = tickers
            .result
            .list
            .first()
            .ok_or(ExchangeError::Malformed("empty ticker list"))?;
        ticker
            .last_price
            .parse()
            .map_err(|_| ExchangeError::Malformed("unparseable price"))
    }
}
