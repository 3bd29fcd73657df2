//! # wrbscan - Wide Range Bar and hidden gap engine
//!
//! Flags Wide Range Bars (WRB), locates the hidden gaps they leave behind, grades
//! each gap's conviction and tracks whether later price action filled it.
//!
//! ## Quick Start
//!
//! ```rust
//! use wrbscan::prelude::*;
//!
//! // Define your OHLCV data
//! struct Bar { o: f64, h: f64, l: f64, c: f64, v: f64 }
//!
//! impl OHLCV for Bar {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//!     fn volume(&self) -> f64 { self.v }
//! }
//!
//! // Pure, unchecked entry point
//! let bars: Vec<Bar> = vec![];
//! let analysis = analyze(&bars, &WrbConfig::default());
//! assert_eq!(analysis.summary.total_gaps, 0);
//!
//! // Engine with validated config
//! let engine = EngineBuilder::new()
//!     .lookback_period(5)
//!     .gap_extension(GapExtension::None)
//!     .build()
//!     .unwrap();
//! let analysis = engine.analyze(&bars).unwrap();
//! assert!(analysis.summary.last_signal.is_none());
//! ```

pub mod detectors;
pub mod params;

pub mod prelude {
    pub use crate::{
        // Pure pipeline
        analyze,
        // Stages
        detectors::*,
        // Config
        params::{get_factor, get_period, GapExtension, ParamMeta, ParamType, WrbConfig},
        // Parallel
        scan_parallel,
        // Results
        BarSignal,
        Candle,
        Direction,
        // Engine
        EngineBuilder,
        GapRecord,
        GapType,
        LastSignal,
        OHLCVExt,
        Result,
        ScanError,
        ScanResult,
        Summary,
        WrbAnalysis,
        WrbEngine,
        // Errors
        WrbError,
        OHLCV,
    };
}

use detectors::{classify_ranges, locate_gaps, track_fills};
use params::{GapExtension, WrbConfig};

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, WrbError>;

/// Errors raised by the checked entry points.
///
/// The pure [`analyze`] path never fails: short input degrades to empty output and
/// degenerate gaps are dropped.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WrbError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid OHLCV at index {index}: {reason}")]
    InvalidOHLCV { index: usize, reason: &'static str },
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
        {
            return Err(WrbError::InvalidOHLCV {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
        {
            return Err(WrbError::InvalidOHLCV {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.high() < self.low() {
            return Err(WrbError::InvalidOHLCV {
                index: 0,
                reason: "high < low",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// Plain candle as delivered by upstream market-data collaborators
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    /// Open time, milliseconds since the Unix epoch
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

/// Candle direction. Bars with `close == open` count as bearish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

// ============================================================
// GAP RECORDS
// ============================================================

/// Side of a hidden gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapType {
    /// Price jumped up over the WRB; the zone below acts as support
    Buy,
    /// Price dropped over the WRB; the zone above acts as resistance
    Sell,
}

/// A hidden gap left by a WRB.
///
/// Indices point into the analyzed candle slice. `end_index` is the last bar scanned
/// for a fill while the gap is open, and the fill bar once it is filled.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRecord {
    #[serde(rename = "type")]
    pub gap_type: GapType,
    pub top: f64,
    pub bottom: f64,
    /// Index of the WRB
    pub start_index: usize,
    pub end_index: usize,
    pub filled: bool,
    pub filled_index: Option<usize>,
    /// High-conviction gap, fixed at creation
    pub pro: bool,
    /// `top - bottom`
    pub diff: f64,
}

impl GapRecord {
    /// Whether `price` lies inside the zone (inclusive)
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.bottom && price <= self.top
    }
}

// ============================================================
// ANALYSIS RESULT
// ============================================================

/// Most recent gap in the analyzed series
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LastSignal {
    pub index: usize,
    #[serde(rename = "type")]
    pub gap_type: GapType,
    pub pro: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(rename = "totalWRB")]
    pub total_wrb: usize,
    pub total_gaps: usize,
    pub active_count: usize,
    pub filled_count: usize,
    pub pro_count: usize,
    pub last_signal: Option<LastSignal>,
}

/// Full result of one analysis call
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WrbAnalysis {
    /// One flag per input bar
    pub flags: Vec<bool>,
    /// One slot per input bar, `None` where no gap was located
    pub gaps: Vec<Option<GapRecord>>,
    /// Unfilled gaps in discovery order
    pub active: Vec<GapRecord>,
    /// Filled gaps in discovery order
    pub filled: Vec<GapRecord>,
    pub summary: Summary,
}

/// Per-bar view over a [`WrbAnalysis`]
#[derive(Debug, Clone, Copy)]
pub struct BarSignal<'a> {
    pub index: usize,
    pub is_wrb: bool,
    pub gap: Option<&'a GapRecord>,
}

impl WrbAnalysis {
    /// Gap located at bar `index`, if any
    pub fn gap_at(&self, index: usize) -> Option<&GapRecord> {
        self.gaps.get(index).and_then(Option::as_ref)
    }

    /// Iterate bars with their flag and gap
    pub fn signals(&self) -> impl ExactSizeIterator<Item = BarSignal<'_>> + '_ {
        self.flags.iter().enumerate().map(move |(index, &is_wrb)| BarSignal {
            index,
            is_wrb,
            gap: self.gap_at(index),
        })
    }
}

// ============================================================
// PIPELINE
// ============================================================

/// Run the whole WRB pipeline over `bars`.
///
/// Pure and deterministic: no state survives the call. `config` is taken as given;
/// see [`WrbConfig::validate`] for the preconditions.
pub fn analyze<T: OHLCV>(bars: &[T], config: &WrbConfig) -> WrbAnalysis {
    let flags = classify_ranges(bars, config);
    let mut gaps = locate_gaps(bars, &flags, config);
    track_fills(bars, &mut gaps);

    let (filled, active): (Vec<GapRecord>, Vec<GapRecord>) =
        gaps.iter().flatten().cloned().partition(|g| g.filled);

    let last_signal = gaps.iter().enumerate().rev().find_map(|(index, gap)| {
        gap.as_ref().map(|g| LastSignal {
            index,
            gap_type: g.gap_type,
            pro: g.pro,
        })
    });

    let summary = Summary {
        total_wrb: flags.iter().filter(|&&f| f).count(),
        total_gaps: active.len() + filled.len(),
        active_count: active.len(),
        filled_count: filled.len(),
        pro_count: gaps.iter().flatten().filter(|g| g.pro).count(),
        last_signal,
    };

    tracing::debug!(
        bars = bars.len(),
        wrb = summary.total_wrb,
        gaps = summary.total_gaps,
        active = summary.active_count,
        filled = summary.filled_count,
        pro = summary.pro_count,
        "wrb analysis complete"
    );

    WrbAnalysis {
        flags,
        gaps,
        active,
        filled,
        summary,
    }
}

// ============================================================
// ENGINE
// ============================================================

/// Analysis engine holding a validated config
#[derive(Debug, Clone)]
pub struct WrbEngine {
    config: WrbConfig,
    validate_data: bool,
    require_min_bars: bool,
}

impl WrbEngine {
    #[inline]
    pub fn config(&self) -> &WrbConfig {
        &self.config
    }

    /// Analyze one series. Fails only when one of the opt-in checks is enabled: a
    /// malformed bar, or a series shorter than [`WrbConfig::min_bars`].
    pub fn analyze<T: OHLCV>(&self, bars: &[T]) -> Result<WrbAnalysis> {
        if self.require_min_bars && bars.len() < self.config.min_bars() {
            return Err(WrbError::InsufficientData {
                need: self.config.min_bars(),
                got: bars.len(),
            });
        }
        if self.validate_data {
            self.validate_bars(bars)?;
        }
        Ok(analyze(bars, &self.config))
    }

    /// WRB flags only, skipping gap location and fill tracking
    pub fn flags<T: OHLCV>(&self, bars: &[T]) -> Vec<bool> {
        classify_ranges(bars, &self.config)
    }

    fn validate_bars<T: OHLCV>(&self, bars: &[T]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| match e {
                WrbError::InvalidOHLCV { reason, .. } => WrbError::InvalidOHLCV { index: i, reason },
                other => other,
            })?;
        }
        Ok(())
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating [`WrbEngine`] instances
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: WrbConfig,
    validate_data: bool,
    require_min_bars: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole config
    pub fn config(mut self, config: WrbConfig) -> Self {
        self.config = config;
        self
    }

    pub fn lookback_period(mut self, period: usize) -> Self {
        self.config.lookback_period = period;
        self
    }

    pub fn sensitivity(mut self, sensitivity: f64) -> Self {
        self.config.sensitivity = sensitivity;
        self
    }

    pub fn use_body(mut self, use_body: bool) -> Self {
        self.config.use_body = use_body;
        self
    }

    pub fn gap_extension(mut self, extension: GapExtension) -> Self {
        self.config.gap_extension = extension;
        self
    }

    pub fn max_scope(mut self, max_scope: usize) -> Self {
        self.config.max_scope = max_scope;
        self
    }

    /// Enable/disable data validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.validate_data = enable;
        self
    }

    /// Reject series too short to ever contain a gap instead of returning an
    /// empty analysis
    pub fn require_min_bars(mut self, enable: bool) -> Self {
        self.require_min_bars = enable;
        self
    }

    /// Build the engine, rejecting config values outside their domain
    pub fn build(self) -> Result<WrbEngine> {
        self.config.validate()?;
        Ok(WrbEngine {
            config: self.config,
            validate_data: self.validate_data,
            require_min_bars: self.require_min_bars,
        })
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of analyzing a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub analysis: WrbAnalysis,
}

/// Error from analyzing a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: WrbError,
}

/// Parallel analysis of multiple instruments
pub fn scan_parallel<'a, T, I>(engine: &WrbEngine, instruments: I) -> (Vec<ScanResult>, Vec<ScanError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            engine
                .analyze(bars)
                .map(|analysis| ScanResult {
                    symbol: symbol.to_string(),
                    analysis,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => {
                tracing::warn!(symbol = %e.symbol, error = %e.error, "wrb scan failed");
                errors.push(e)
            }
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
