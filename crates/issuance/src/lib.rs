//! Forecast Issuance Module
//!
//! Derives the issuance metrics of the native gas token from a chain snapshot:
//! - Halving schedule position and per-period issuance target
//! - Adjustment-period boundaries and progress
//! - Forecasted next-period mint rate, bounded to [0.5x, 2x] and an absolute ceiling
//! - Historical period records, total issuance and mining-cost estimates
//!
//! Every function here is pure; callers supply fresh inputs on each refresh.

pub mod cost;
pub mod errors;
pub mod forecast;
pub mod halving;
pub mod history;
pub mod period;
pub mod snapshot;
pub mod types;
pub mod units;

pub use cost::*;
pub use errors::*;
pub use forecast::*;
pub use halving::*;
pub use history::*;
pub use period::*;
pub use snapshot::*;
pub use types::*;
pub use units::*;
