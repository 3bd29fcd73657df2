//! Gap fill tracking
//!
//! Each open gap is scanned forward, bounded by its `end_index`, until price comes
//! back into it. A gap is marked filled at most once; filled gaps are never rescanned,
//! so running the tracker again is a no-op.

use crate::{GapRecord, GapType, OHLCV};

/// Whether `bar` re-enters the gap zone
#[inline]
pub fn fills_gap<T: OHLCV>(gap: &GapRecord, bar: &T) -> bool {
    match gap.gap_type {
        GapType::Buy => bar.low() <= gap.bottom,
        GapType::Sell => bar.high() >= gap.top,
    }
}

/// Scan forward from a single gap. Returns `true` if this call filled it.
pub fn track_fill<T: OHLCV>(bars: &[T], gap: &mut GapRecord) -> bool {
    if gap.filled {
        return false;
    }
    let Some(last) = bars.len().checked_sub(1) else {
        return false;
    };
    let horizon = gap.end_index.min(last);
    let first = gap.start_index.saturating_add(1);
    if first > horizon {
        return false;
    }

    let hit = bars[first..=horizon]
        .iter()
        .position(|bar| fills_gap(gap, bar))
        .map(|offset| first + offset);

    match hit {
        Some(index) => {
            tracing::trace!(start = gap.start_index, index, "gap filled");
            gap.filled = true;
            gap.filled_index = Some(index);
            gap.end_index = index;
            true
        }
        None => false,
    }
}

/// Track fills for every gap of an index-aligned gap array. Returns the number of
/// gaps filled by this call.
pub fn track_fills<T: OHLCV>(bars: &[T], gaps: &mut [Option<GapRecord>]) -> usize {
    gaps.iter_mut()
        .flatten()
        .map(|gap| track_fill(bars, gap))
        .filter(|&filled| filled)
        .count()
}
