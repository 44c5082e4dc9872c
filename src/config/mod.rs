//! Configuration management for ArbMon
//!
//! Loads from YAML files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::types::Exchange;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub exchanges: ExchangesConfig,
    pub universe: UniverseConfig,
    pub refresh: RefreshConfig,
    pub view: ViewConfig,
}

/// Per-exchange enable flags
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangesConfig {
    pub binance: bool,
    pub okx: bool,
    pub gate: bool,
    pub bitget: bool,
    pub mexc: bool,
    pub huobi: bool,
    pub bybit: bool,
}

impl ExchangesConfig {
    /// Enabled exchanges in fixed enumeration order
    pub fn enabled(&self) -> Vec<Exchange> {
        Exchange::ALL
            .iter()
            .copied()
            .filter(|e| match e {
                Exchange::Binance => self.binance,
                Exchange::Okx => self.okx,
                Exchange::Gate => self.gate,
                Exchange::Bitget => self.bitget,
                Exchange::Mexc => self.mexc,
                Exchange::Huobi => self.huobi,
                Exchange::Bybit => self.bybit,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniverseConfig {
    /// Market-cap cutoff: pairs ranked beyond this are dropped
    pub top_n: u32,
    /// Hard cap on the resolved universe size
    pub max_pairs: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Re-run the pipeline on a timer
    pub auto: bool,
    /// Timer interval in seconds (clamped to 1s..24h)
    pub interval_secs: u64,
}

impl RefreshConfig {
    /// Interval clamped to the supported 1 second .. 24 hour range
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.clamp(1, 86_400))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Rows per page
    pub page_size: usize,
    /// Spread percentage above which a record is flagged as an opportunity
    pub opportunity_threshold_pct: f64,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Exchange defaults: everything on
            .set_default("exchanges.binance", true)?
            .set_default("exchanges.okx", true)?
            .set_default("exchanges.gate", true)?
            .set_default("exchanges.bitget", true)?
            .set_default("exchanges.mexc", true)?
            .set_default("exchanges.huobi", true)?
            .set_default("exchanges.bybit", true)?
            // Universe defaults
            .set_default("universe.top_n", 1000)?
            .set_default("universe.max_pairs", 1000)?
            // Refresh defaults
            .set_default("refresh.auto", true)?
            .set_default("refresh.interval_secs", 30)?
            // View defaults
            .set_default("view.page_size", 20)?
            .set_default("view.opportunity_threshold_pct", 0.5)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (ARBMON_*)
            .add_source(Environment::with_prefix("ARBMON").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "exchanges={:?} top_n={} max_pairs={} auto_refresh={} interval={}s",
            self.exchanges.enabled(),
            self.universe.top_n,
            self.universe.max_pairs,
            self.refresh.auto,
            self.refresh.interval().as_secs(),
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
