//! ArbMon Library
//!
//! Cross-exchange spot-price arbitrage monitor

pub mod arbitrage;
pub mod cache;
pub mod config;
pub mod exchanges;
pub mod monitor;
pub mod types;
pub mod universe;
pub mod view;
