//! Arbitrage core - per-pair price fan-out and spread reduction
//!
//! The fetcher issues one concurrent ticker request per enabled exchange and
//! waits for all of them to settle; the calculator reduces the resulting
//! quote map to the best/worst price and spread for one pair.

mod calculator;
mod fetcher;

pub use calculator::compute_record;
pub use fetcher::fetch_quotes;
