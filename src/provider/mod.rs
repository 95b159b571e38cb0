// =============================================================================
// Market-data provider
// =============================================================================
//
// HTTP access to the historical price API.  Supplies the `PriceSeries` the
// indicator engine works on; the engine itself never performs I/O.

pub mod client;

pub use client::MarketDataClient;
