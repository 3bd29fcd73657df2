//! Common thresholds and measurements shared across the WRB stages

use crate::{Direction, OHLCVExt, OHLCV};

// ============================================================
// PRO GAP THRESHOLDS
// ============================================================

/// Engulfing: body(curr) > body(prev) * ENGULF_BODY_FACTOR
pub const ENGULF_BODY_FACTOR: f64 = 0.9;
/// Exhaustion shadow on a bodied bar: shadow >= body * SHADOW_BODY_FACTOR
pub const SHADOW_BODY_FACTOR: f64 = 2.0;
/// Exhaustion shadow on a doji: shadow >= range * DOJI_SHADOW_RANGE_FACTOR
pub const DOJI_SHADOW_RANGE_FACTOR: f64 = 0.67;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Range measure used by the WRB classifier
#[inline]
pub fn bar_range<T: OHLCV>(bar: &T, use_body: bool) -> f64 {
    if use_body {
        bar.body()
    } else {
        bar.range()
    }
}

/// Two-state direction: a doji counts as bearish
#[inline]
pub fn direction<T: OHLCV>(bar: &T) -> Direction {
    if bar.is_bullish() {
        Direction::Bullish
    } else {
        Direction::Bearish
    }
}

/// `curr` reverses `prev` with a body at least comparable to it
#[inline]
pub fn is_engulfing<T: OHLCV>(prev: &T, curr: &T) -> bool {
    direction(curr) != direction(prev) && curr.body() > prev.body() * ENGULF_BODY_FACTOR
}

/// Shadow long enough to read as rejection of the extreme.
/// A zero body compares against the full range instead.
#[inline]
pub fn is_exhaustion_shadow(shadow: f64, body: f64, range: f64) -> bool {
    if body == 0.0 {
        range > 0.0 && shadow >= range * DOJI_SHADOW_RANGE_FACTOR
    } else {
        shadow >= body * SHADOW_BODY_FACTOR
    }
}
