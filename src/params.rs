//! Analysis configuration and parameter metadata
//!
//! [`WrbConfig`] is the per-call options structure. Every field is optional on the
//! wire; missing fields fall back to their defaults.
//!
//! The metadata table enables:
//! - Grid search optimization
//! - Parameter documentation
//! - Caller-side validation before a call
//!
//! The optimization range of a [`ParamMeta`] only drives grid generation. Validation
//! accepts any value in the parameter type's domain.
//!
//! # Example
//!
//! ```rust
//! use wrbscan::params::WrbConfig;
//!
//! for param in WrbConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let config: WrbConfig = serde_json::from_str(r#"{"sensitivity": 2.0}"#).unwrap();
//! assert_eq!(config.lookback_period, 5);
//! ```

use std::collections::HashMap;

use crate::{Result, WrbError};

// ============================================================
// GAP EXTENSION POLICY
// ============================================================

/// How far a located gap's boundary reaches into the WRB candle itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapExtension {
  /// Only the untouched zone between the neighbors of the WRB
  None,
  /// Extend the far side to the WRB extreme (protective stop placement)
  #[default]
  StopLoss,
  /// The whole WRB range
  Both,
}

impl GapExtension {
  /// Numeric encoding used by parameter maps: 0 = none, 1 = stopLoss, 2 = both
  pub fn from_param(value: f64) -> Result<Self> {
    match value {
      v if v == 0.0 => Ok(Self::None),
      v if v == 1.0 => Ok(Self::StopLoss),
      v if v == 2.0 => Ok(Self::Both),
      _ => Err(WrbError::InvalidValue("gap_extension must be 0, 1 or 2")),
    }
  }

  pub fn as_param(self) -> f64 {
    match self {
      Self::None => 0.0,
      Self::StopLoss => 1.0,
      Self::Both => 2.0,
    }
  }
}

// ============================================================
// CONFIG
// ============================================================

/// Options for a single analysis call.
///
/// `analyze` never checks these values; out-of-range settings give meaningless but
/// non-panicking output. Call [`WrbConfig::validate`] (or build a `WrbEngine`) to
/// enforce the preconditions up front.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WrbConfig {
  /// Number of preceding bars a WRB must dominate
  pub lookback_period: usize,
  /// Multiplier a WRB range must strictly exceed against every lookback bar
  pub sensitivity: f64,
  /// Measure the real body (`|close - open|`) instead of the full high-low range
  pub use_body: bool,
  pub gap_extension: GapExtension,
  /// Maximum number of bars scanned forward for a fill
  pub max_scope: usize,
}

impl Default for WrbConfig {
  fn default() -> Self {
    Self {
      lookback_period: 5,
      sensitivity: 1.5,
      use_body: true,
      gap_extension: GapExtension::StopLoss,
      max_scope: 999,
    }
  }
}

impl WrbConfig {
  /// Returns metadata for all configurable parameters
  pub fn param_meta() -> &'static [ParamMeta] {
    WRB_PARAMS
  }

  /// Creates a config from a numeric parameter map.
  ///
  /// Missing parameters use their default values.
  pub fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    for meta in WRB_PARAMS {
      if let Some(&value) = params.get(meta.name) {
        meta.validate(value)?;
      }
    }

    let defaults = Self::default();
    let use_body = params.get("use_body").map_or(defaults.use_body, |&v| v != 0.0);
    let gap_extension = params.get("gap_extension").copied().unwrap_or(defaults.gap_extension.as_param());

    let config = Self {
      lookback_period: get_period(params, "lookback_period", defaults.lookback_period)?,
      sensitivity: get_factor(params, "sensitivity", defaults.sensitivity)?,
      use_body,
      gap_extension: GapExtension::from_param(gap_extension)?,
      max_scope: get_period(params, "max_scope", defaults.max_scope)?,
    };
    config.validate()?;
    Ok(config)
  }

  /// Fewest bars for which a gap can be located at all: the lookback window,
  /// the WRB itself and the bar after it.
  pub fn min_bars(&self) -> usize {
    self.lookback_period.saturating_add(2)
  }

  /// Check every field against its [`ParamMeta`] domain
  pub fn validate(&self) -> Result<()> {
    // Same order as WRB_PARAMS
    let values = [
      self.lookback_period as f64,
      self.sensitivity,
      f64::from(u8::from(self.use_body)),
      self.gap_extension.as_param(),
      self.max_scope as f64,
    ];
    for (meta, value) in WRB_PARAMS.iter().zip(values) {
      meta.validate(value)?;
    }
    Ok(())
  }
}

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Positive integer (bar counts)
  Period,
  /// Multiplier strictly greater than 1.0
  Factor,
  /// Boolean encoded as 0/1
  Flag,
  /// Enumerated choice encoded as a small integer
  Choice,
}

/// Metadata for a single config parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "lookback_period")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Range for optimization: (min, max, step).
  /// For flags and choices this is also the full value domain.
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  pub const fn factor(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Factor, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value against the domain of this parameter's type
  pub fn validate(&self, value: f64) -> Result<()> {
    if value.is_nan() || value.is_infinite() {
      return Err(WrbError::InvalidValue("parameter cannot be NaN or infinite"));
    }
    match self.param_type {
      ParamType::Factor => {
        if value <= 1.0 {
          return Err(WrbError::InvalidValue("Factor must be > 1.0"));
        }
      },
      ParamType::Period => {
        if value < 1.0 {
          return Err(WrbError::OutOfRange { field: self.name, value, min: 1.0, max: f64::INFINITY });
        }
      },
      ParamType::Flag | ParamType::Choice => {
        let (min, max, _) = self.range;
        if value < min || value > max {
          return Err(WrbError::OutOfRange { field: self.name, value, min, max });
        }
      },
    }
    if self.param_type != ParamType::Factor && value.fract() != 0.0 {
      return Err(WrbError::InvalidValue("value must be an integer"));
    }
    Ok(())
  }
}

static WRB_PARAMS: &[ParamMeta] = &[
  ParamMeta::period("lookback_period", 5.0, (1.0, 50.0, 1.0), "Bars a WRB must dominate"),
  ParamMeta::factor("sensitivity", 1.5, (1.25, 5.0, 0.25), "Range multiplier over every lookback bar"),
  ParamMeta {
    name: "use_body",
    param_type: ParamType::Flag,
    default: 1.0,
    range: (0.0, 1.0, 1.0),
    description: "Measure real body instead of high-low range",
  },
  ParamMeta {
    name: "gap_extension",
    param_type: ParamType::Choice,
    default: 1.0,
    range: (0.0, 2.0, 1.0),
    description: "Gap boundary policy: 0 none, 1 stopLoss, 2 both",
  },
  ParamMeta::period("max_scope", 999.0, (499.0, 9_999.0, 500.0), "Forward bars scanned for a fill"),
];

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a positive integer from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<usize> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 1.0 || value.fract() != 0.0 {
    return Err(WrbError::InvalidValue("Period must be a positive integer"));
  }
  Ok(value as usize)
}

/// Helper to get a multiplier (> 1.0) from params with default fallback
pub fn get_factor(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<f64> {
  let value = params.get(key).copied().unwrap_or(default);
  if value.is_nan() || value <= 1.0 {
    return Err(WrbError::InvalidValue("Factor must be > 1.0"));
  }
  Ok(value)
}

// ============================================================
// TESTS
// ============================================================
