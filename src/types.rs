//! Core types used throughout ArbMon
//!
//! Defines the exchange roster, resolved trading pairs and the per-pair
//! arbitrage aggregate shared between the pipeline and the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported spot exchanges
///
/// The variant order here is the fixed enumeration order of the whole
/// pipeline: quote vectors, min/max tie-breaking and table columns all
/// follow it. Binance is the baseline exchange for universe resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Binance,
    Okx,
    Gate,
    Bitget,
    Mexc,
    Huobi,
    Bybit,
}

impl Exchange {
    /// All exchanges in fixed enumeration order
    pub const ALL: [Exchange; 7] = [
        Exchange::Binance,
        Exchange::Okx,
        Exchange::Gate,
        Exchange::Bitget,
        Exchange::Mexc,
        Exchange::Huobi,
        Exchange::Bybit,
    ];

    /// The baseline exchange whose listings define the candidate universe
    pub const BASELINE: Exchange = Exchange::Binance;

    /// Convert a canonical symbol ("BTCUSDT") into this venue's format.
    ///
    /// OKX separates with a hyphen, Gate with an underscore and Huobi wants
    /// the whole symbol lowercase; the rest take the canonical form as-is.
    pub fn api_symbol(&self, symbol: &str) -> String {
        match self {
            Exchange::Okx => symbol.to_uppercase().replace("USDT", "-USDT"),
            Exchange::Gate => symbol.to_uppercase().replace("USDT", "_USDT"),
            Exchange::Huobi => symbol.to_lowercase(),
            _ => symbol.to_uppercase(),
        }
    }

}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Binance => write!(f, "Binance"),
            Exchange::Okx => write!(f, "OKX"),
            Exchange::Gate => write!(f, "Gate"),
            Exchange::Bitget => write!(f, "Bitget"),
            Exchange::Mexc => write!(f, "MEXC"),
            Exchange::Huobi => write!(f, "Huobi"),
            Exchange::Bybit => write!(f, "Bybit"),
        }
    }
}

/// A trading pair resolved into the monitored universe
///
/// Immutable for the lifetime of one universe refresh. The rank fields are
/// ordering keys only: market-cap rank comes from the ranking source, the
/// volume rank is a Binance 24h-volume fallback offset so it never beats a
/// genuine market-cap rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    /// Canonical symbol, e.g. "BTCUSDT"
    pub symbol: String,
    /// Market-cap rank (lower = more valuable), if the asset is ranked
    pub market_cap_rank: Option<u32>,
    /// Offset 24h-volume rank, fallback ordering key
    pub volume_rank: Option<u32>,
    /// Number of exchanges (baseline included) listing this pair
    pub listings: usize,
}

impl TradingPair {
    /// Best available ordering rank: market cap first, then offset volume
    pub fn rank(&self) -> Option<u32> {
        self.market_cap_rank.or(self.volume_rank)
    }
}

/// One (exchange, price) observation at a fetch instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub exchange: Exchange,
    pub price: f64,
}

/// Derived spread fields, defined only when at least two exchanges quoted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    /// Highest observed price and its exchange
    pub highest: ExchangeQuote,
    /// Lowest observed price and its exchange
    pub lowest: ExchangeQuote,
    /// Absolute difference, always >= 0
    pub price_diff: f64,
    /// Difference relative to the lowest price, in percent
    pub price_diff_percent: f64,
}

/// Per-pair aggregate across all configured exchanges for one refresh tick
///
/// `spread` is `None` whenever fewer than two exchanges reported a price:
/// "no data" is represented as absence, never as zero, so consumers cannot
/// mistake a dark pair for a zero-spread one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageRecord {
    /// Canonical symbol
    pub symbol: String,
    /// Market-cap rank carried over from the resolved universe
    pub market_cap_rank: Option<u32>,
    /// Price per exchange in enumeration order; `None` = no observation
    pub prices: Vec<(Exchange, Option<f64>)>,
    /// Number of exchanges with a defined price
    pub exchange_count: usize,
    /// Derived fields, absent below two observations
    pub spread: Option<Spread>,
}

impl ArbitrageRecord {
    /// Price observed on one exchange, if any
    pub fn price(&self, exchange: Exchange) -> Option<f64> {
        self.prices
            .iter()
            .find(|(e, _)| *e == exchange)
            .and_then(|(_, p)| *p)
    }

    /// Percentage spread, if defined
    pub fn diff_percent(&self) -> Option<f64> {
        self.spread.map(|s| s.price_diff_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_symbol_formats() {
        assert_eq!(Exchange::Binance.api_symbol("BTCUSDT"), "BTCUSDT");
        assert_eq!(Exchange::Okx.api_symbol("BTCUSDT"), "BTC-USDT");
        assert_eq!(Exchange::Gate.api_symbol("BTCUSDT"), "BTC_USDT");
        assert_eq!(Exchange::Huobi.api_symbol("BTCUSDT"), "btcusdt");
        assert_eq!(Exchange::Bybit.api_symbol("btcusdt"), "BTCUSDT");
    }

    #[test]
    fn test_enumeration_order_starts_at_baseline() {
        assert_eq!(Exchange::ALL[0], Exchange::BASELINE);
        assert_eq!(Exchange::ALL.len(), 7);
    }

    #[test]
    fn test_pair_rank_prefers_market_cap() {
        let pair = TradingPair {
            symbol: "BTCUSDT".to_string(),
            market_cap_rank: Some(1),
            volume_rank: Some(1001),
            listings: 7,
        };
        assert_eq!(pair.rank(), Some(1));

        let unranked = TradingPair {
            symbol: "NEWUSDT".to_string(),
            market_cap_rank: None,
            volume_rank: Some(1042),
            listings: 3,
        };
        assert_eq!(unranked.rank(), Some(1042));
    }
}
