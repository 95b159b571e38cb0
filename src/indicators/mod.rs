// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, order-sensitive column transforms over an OHLCV series, plus the
// engine that owns the growing indicator table.  Every indicator function
// takes its `IndicatorMode` explicitly and returns one value per input row.

pub mod ad;
pub mod cci;
pub mod engine;
pub mod error;
pub mod momentum;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod table;
pub mod wma;

pub use engine::{IndicatorEngine, PercentK};
pub use error::EngineError;
pub use table::IndicatorTable;
