//! Result Ranking & Filtering
//!
//! Presentation-side shaping of one refresh tick's records: sorting by any
//! column, case-insensitive symbol filtering, fixed-size paging and the
//! arbitrage-opportunity highlight. All of it is pure: the monitor hands
//! over a wholesale record list and this module never mutates it.

use std::cmp::Ordering;

use crate::types::{ArbitrageRecord, Exchange};

/// Notional sizes for the profit columns, in USDT
pub const NOTIONAL_SMALL: f64 = 1_000.0;
pub const NOTIONAL_LARGE: f64 = 10_000.0;

/// Theoretical profit on a notional position at the observed spread.
///
/// Upper bound only: buys at the lowest venue and sells at the highest with
/// no fees, no slippage and no transfer cost deducted. Never an executable
/// quote.
pub fn profit_estimate(notional: f64, diff_percent: f64) -> f64 {
    notional * diff_percent / 100.0
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Symbol,
    Price(Exchange),
    DiffPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// One page of shaped results
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<ArbitrageRecord>,
    /// Records matching the filter, across all pages
    pub total: usize,
    /// Zero-based page index actually returned
    pub page: usize,
    pub page_count: usize,
}

/// View settings applied to a record list
#[derive(Debug, Clone)]
pub struct ResultView {
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    /// Case-insensitive substring match on the pair symbol
    pub filter: Option<String>,
    pub page_size: usize,
    /// Strict lower bound for the opportunity highlight, in percent
    pub opportunity_threshold_pct: f64,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            sort_key: SortKey::DiffPercent,
            sort_dir: SortDir::Desc,
            filter: None,
            page_size: 20,
            opportunity_threshold_pct: 0.5,
        }
    }
}

impl ResultView {
    /// Whether a record clears the opportunity threshold.
    ///
    /// Strictly greater-than: a spread of exactly the threshold is shown but
    /// not highlighted as actionable.
    pub fn is_opportunity(&self, record: &ArbitrageRecord) -> bool {
        record
            .diff_percent()
            .map(|pct| pct > self.opportunity_threshold_pct)
            .unwrap_or(false)
    }

    /// Filter, sort and page the records. An out-of-range page index clamps
    /// to the last page.
    pub fn apply(&self, records: &[ArbitrageRecord], page: usize) -> Page {
        let needle = self.filter.as_ref().map(|f| f.to_lowercase());

        let mut rows: Vec<ArbitrageRecord> = records
            .iter()
            .filter(|r| match &needle {
                Some(needle) => r.symbol.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| self.compare(a, b));

        let total = rows.len();
        let page_size = self.page_size.max(1);
        let page_count = total.div_ceil(page_size).max(1);
        let page = page.min(page_count - 1);

        let start = page * page_size;
        let rows = rows
            .into_iter()
            .skip(start)
            .take(page_size)
            .collect();

        Page {
            rows,
            total,
            page,
            page_count,
        }
    }

    fn compare(&self, a: &ArbitrageRecord, b: &ArbitrageRecord) -> Ordering {
        let primary = match self.sort_key {
            SortKey::Symbol => {
                let ord = a.symbol.cmp(&b.symbol);
                match self.sort_dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            }
            SortKey::Price(exchange) => {
                compare_optional(a.price(exchange), b.price(exchange), self.sort_dir)
            }
            SortKey::DiffPercent => {
                compare_optional(a.diff_percent(), b.diff_percent(), self.sort_dir)
            }
        };
        // Stable fallback so pagination never shuffles equal rows
        primary.then_with(|| a.symbol.cmp(&b.symbol))
    }
}

/// Records missing the sort value go last under either direction: "no data"
/// must never float to the top of a ranking.
fn compare_optional(a: Option<f64>, b: Option<f64>, dir: SortDir) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
