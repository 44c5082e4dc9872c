//! Arbitrage Calculator - pure reduction of exchange quotes to a spread
//!
//! No I/O and no shared state: the same quote map always reduces to the
//! bit-identical record.

use crate::types::{ArbitrageRecord, Exchange, ExchangeQuote, Spread};

/// Reduce one pair's per-exchange quotes to an [`ArbitrageRecord`].
///
/// Derived fields require at least two defined prices; below that the record
/// carries only the observation count. Min/max ties resolve to the exchange
/// appearing first in `prices` (the fixed enumeration order), via strict
/// comparisons that never replace an earlier winner with an equal later one.
///
/// A price of exactly zero is a valid, if suspicious, observation and
/// participates normally; excluding garbage prices is the caller's job.
pub fn compute_record(
    symbol: &str,
    market_cap_rank: Option<u32>,
    prices: Vec<(Exchange, Option<f64>)>,
) -> ArbitrageRecord {
    let valid: Vec<ExchangeQuote> = prices
        .iter()
        .filter_map(|(exchange, price)| {
            price.map(|price| ExchangeQuote {
                exchange: *exchange,
                price,
            })
        })
        .collect();

    let exchange_count = valid.len();

    if exchange_count < 2 {
        return ArbitrageRecord {
            symbol: symbol.to_string(),
            market_cap_rank,
            prices,
            exchange_count,
            spread: None,
        };
    }

    let mut highest = valid[0];
    let mut lowest = valid[0];
    for quote in &valid[1..] {
        if quote.price > highest.price {
            highest = *quote;
        }
        if quote.price < lowest.price {
            lowest = *quote;
        }
    }

    let price_diff = highest.price - lowest.price;
    let price_diff_percent = price_diff / lowest.price * 100.0;

    ArbitrageRecord {
        symbol: symbol.to_string(),
        market_cap_rank,
        prices,
        exchange_count,
        spread: Some(Spread {
            highest,
            lowest,
            price_diff,
            price_diff_percent,
        }),
    }
}
