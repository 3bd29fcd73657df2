//! Pro gap classifier
//!
//! A hidden gap is "pro" (high conviction) when the bar before the WRB shows signs of
//! the prior move running out. Three independent triggers; any one is enough:
//!
//! 1. The WRB engulfs the bar before it (opposite direction, body > 0.9x).
//! 2. The bar before the WRB has an exhaustion shadow on the side the gap points away
//!    from (lower shadow for buy gaps, upper shadow for sell gaps).
//! 3. The bar before the WRB itself engulfs the bar before it.

use super::helpers::{is_engulfing, is_exhaustion_shadow};
use crate::{GapType, OHLCVExt, OHLCV};

/// Classify a gap located at the WRB `wrb_bar`.
///
/// `old_bar` is the bar right before the WRB, `prev2_bar` the one before that
/// (absent when the WRB sits at index 1).
pub fn is_pro_gap<T: OHLCV>(old_bar: &T, wrb_bar: &T, prev2_bar: Option<&T>, gap_type: GapType) -> bool {
    if is_engulfing(old_bar, wrb_bar) {
        return true;
    }

    let shadow = match gap_type {
        GapType::Buy => old_bar.lower_shadow(),
        GapType::Sell => old_bar.upper_shadow(),
    };
    if is_exhaustion_shadow(shadow, old_bar.body(), old_bar.range()) {
        return true;
    }

    prev2_bar.is_some_and(|prev2| is_engulfing(prev2, old_bar))
}
