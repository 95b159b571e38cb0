pub mod price_series;

// Re-export for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use price_series::{parse_history, read_history_file, PriceRecord, PriceSeries};
