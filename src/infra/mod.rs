//! Infrastructure: the exchange-rate client and its on-disk snapshot cache.

pub mod cache;
pub mod exchange;

pub use exchange::{ExchangeApiError, ExchangeRates};
