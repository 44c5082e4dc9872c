//! Multi-Source Price Fetcher - concurrent per-pair ticker fan-out
//!
//! All enabled adapters are queried in parallel and the fetch completes when
//! every request has settled. There is no short-circuit on first success:
//! every price is needed for the spread comparison, and a venue that times
//! out simply contributes "no observation" once its own timeout elapses.

use futures_util::future::join_all;
use std::sync::Arc;

use crate::exchanges::ExchangeApi;
use crate::types::Exchange;

/// Fetch one symbol's last price from every exchange in the roster.
///
/// The returned vector preserves roster order (the fixed enumeration order)
/// so downstream tie-breaking stays deterministic.
pub async fn fetch_quotes(
    roster: &[Arc<dyn ExchangeApi>],
    symbol: &str,
) -> Vec<(Exchange, Option<f64>)> {
    let futures = roster.iter().map(|adapter| {
        let adapter = Arc::clone(adapter);
        async move { (adapter.id(), adapter.fetch_price(symbol).await) }
    });

    join_all(futures).await
}
