//! WRB pipeline stages
//!
//! # Stages
//!
//! - **range**: Wide Range Bar classifier over a lookback window
//! - **gap**: hidden gap locator at each flagged bar
//! - **quality**: pro (high-conviction) gap classifier
//! - **fill**: forward fill tracking over a bounded scan horizon

pub mod helpers;

pub mod fill;
pub mod gap;
pub mod quality;
pub mod range;

pub use fill::*;
pub use gap::*;
pub use helpers::*;
pub use quality::*;
pub use range::*;
