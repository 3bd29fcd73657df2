//! Hidden gap locator
//!
//! At each flagged WRB, compare the bar before it (`old`) with the bar after it
//! (`new`). If `new` never trades back into `old`'s range, the WRB left an unvisited
//! zone behind: a hidden gap. The zone's boundary then depends on [`GapExtension`].

use super::quality::is_pro_gap;
use crate::{
    params::{GapExtension, WrbConfig},
    GapRecord, GapType, OHLCV,
};

/// Gap direction between the neighbors of a WRB, if any
#[inline]
pub fn gap_type<T: OHLCV>(old_bar: &T, new_bar: &T) -> Option<GapType> {
    if new_bar.low() > old_bar.high() {
        Some(GapType::Buy)
    } else if new_bar.high() < old_bar.low() {
        Some(GapType::Sell)
    } else {
        None
    }
}

/// `(top, bottom)` of a gap under the given extension policy
pub fn gap_bounds<T: OHLCV>(
    extension: GapExtension,
    gap_type: GapType,
    old_bar: &T,
    wrb_bar: &T,
    new_bar: &T,
) -> (f64, f64) {
    match (extension, gap_type) {
        (GapExtension::None, GapType::Buy) => (new_bar.low(), old_bar.high()),
        (GapExtension::None, GapType::Sell) => (old_bar.low(), new_bar.high()),
        (GapExtension::StopLoss, GapType::Buy) => (wrb_bar.high().min(new_bar.low()), wrb_bar.low()),
        (GapExtension::StopLoss, GapType::Sell) => (wrb_bar.high(), wrb_bar.low().max(new_bar.high())),
        (GapExtension::Both, _) => (wrb_bar.high(), wrb_bar.low()),
    }
}

/// Try to locate a gap at the WRB `index`.
///
/// Returns `None` at the first and last bar, when the neighbors overlap, or when the
/// computed zone is empty (`top <= bottom`).
pub fn locate_gap<T: OHLCV>(bars: &[T], index: usize, config: &WrbConfig) -> Option<GapRecord> {
    let last = bars.len().checked_sub(1)?;
    if index == 0 || index >= last {
        return None;
    }
    let old_bar = &bars[index - 1];
    let wrb_bar = &bars[index];
    let new_bar = &bars[index + 1];
    let prev2_bar = index.checked_sub(2).map(|i| &bars[i]);

    let gap_type = gap_type(old_bar, new_bar)?;
    let (top, bottom) = gap_bounds(config.gap_extension, gap_type, old_bar, wrb_bar, new_bar);
    if top <= bottom {
        tracing::trace!(index, ?gap_type, top, bottom, "discarding degenerate gap");
        return None;
    }

    Some(GapRecord {
        gap_type,
        top,
        bottom,
        start_index: index,
        end_index: index.saturating_add(config.max_scope).min(last),
        filled: false,
        filled_index: None,
        pro: is_pro_gap(old_bar, wrb_bar, prev2_bar, gap_type),
        diff: top - bottom,
    })
}

/// Locate gaps at every flagged bar. The result is index-aligned with `bars`.
pub fn locate_gaps<T: OHLCV>(bars: &[T], flags: &[bool], config: &WrbConfig) -> Vec<Option<GapRecord>> {
    (0..bars.len())
        .map(|i| {
            if flags.get(i).copied().unwrap_or(false) {
                locate_gap(bars, i, config)
            } else {
                None
            }
        })
        .collect()
}
