//! Wide Range Bar classifier
//!
//! A bar is a WRB when its range is strictly greater than `sensitivity` times the
//! range of **each** of the `lookback_period` bars before it. Comparing against every
//! bar rather than the window maximum keeps a single noisy neighbor from letting an
//! ordinary bar through.

use super::helpers::bar_range;
use crate::{params::WrbConfig, OHLCV};

/// Flag every bar of `bars`. The output always has `bars.len()` entries.
pub fn classify_ranges<T: OHLCV>(bars: &[T], config: &WrbConfig) -> Vec<bool> {
    let ranges: Vec<f64> = bars.iter().map(|b| bar_range(b, config.use_body)).collect();
    let lookback = config.lookback_period;

    (0..ranges.len())
        .map(|i| {
            if i < lookback || ranges[i] == 0.0 {
                return false;
            }
            (1..=lookback).all(|j| ranges[i] > ranges[i - j] * config.sensitivity)
        })
        .collect()
}

/// Single-bar form of [`classify_ranges`]
pub fn is_wide_range_bar<T: OHLCV>(bars: &[T], index: usize, config: &WrbConfig) -> bool {
    let lookback = config.lookback_period;
    let Some(bar) = bars.get(index) else {
        return false;
    };
    let range = bar_range(bar, config.use_body);
    if index < lookback || range == 0.0 {
        return false;
    }
    bars[index - lookback..index]
        .iter()
        .all(|prev| range > bar_range(prev, config.use_body) * config.sensitivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Candle;

    fn flat(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64, 100.0, 100.5, 99.5, 100.2, 1000.0))
            .collect()
    }

    #[test]
    fn test_flat_then_wide() {
        let mut bars = flat(5);
        bars.push(Candle::new(5, 100.0, 106.0, 99.8, 105.0, 1000.0));

        let flags = classify_ranges(&bars, &WrbConfig::default());
        assert_eq!(flags, vec![false, false, false, false, false, true]);
        assert!(is_wide_range_bar(&bars, 5, &WrbConfig::default()));
    }

    #[test]
    fn test_short_input_all_false() {
        let bars = flat(3);
        assert_eq!(classify_ranges(&bars, &WrbConfig::default()), vec![false; 3]);
        assert!(classify_ranges::<Candle>(&[], &WrbConfig::default()).is_empty());
    }

    #[test]
    fn test_zero_range_never_flagged() {
        let mut bars = flat(5);
        bars.push(Candle::new(5, 100.0, 110.0, 90.0, 100.0, 1000.0)); // doji body
        let flags = classify_ranges(&bars, &WrbConfig::default());
        assert!(!flags[5]);

        let config = WrbConfig { use_body: false, ..WrbConfig::default() };
        assert!(classify_ranges(&bars, &config)[5]);
    }

    #[test]
    fn test_every_lookback_bar_must_be_exceeded() {
        let mut bars = flat(5);
        // One big neighbor inside the window blocks the flag
        bars[2] = Candle::new(2, 100.0, 104.0, 99.0, 103.5, 1000.0);
        bars.push(Candle::new(5, 100.0, 106.0, 99.8, 105.0, 1000.0));

        let flags = classify_ranges(&bars, &WrbConfig::default());
        assert!(!flags[5]);
    }

    #[test]
    fn test_strictly_greater() {
        let mut bars: Vec<Candle> =
            (0..5).map(|i| Candle::new(i, 100.0, 103.0, 99.0, 102.0, 0.0)).collect();
        bars.push(Candle::new(5, 100.0, 104.0, 99.0, 103.0, 0.0)); // body 3 == 2 * 1.5
        assert!(!classify_ranges(&bars, &WrbConfig::default())[5]);
    }

    #[test]
    fn test_single_bar_form_out_of_bounds() {
        let bars = flat(6);
        assert!(!is_wide_range_bar(&bars, 10, &WrbConfig::default()));
    }
}
