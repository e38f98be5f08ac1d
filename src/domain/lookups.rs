//! Contracts for the external lookups the engine awaits. Implementations
//! (tariff database, freight-rate database, exchange-rate client) are
//! injected; the engine never talks to a backend directly.

use thiserror::Error;

use super::entities::{ContainerType, RateSnapshot};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no matching entry found")]
    NotFound,
    #[error("{0}")]
    Backend(String),
}

/// Resolves a tariff classification code to its duty percentage.
#[allow(async_fn_in_trait)]
pub trait DutyClassifier {
    async fn duty_percentage(&self, classification_code: &str) -> Result<f64, LookupError>;
}

/// Resolves a sea-FCL route to its base freight cost in USD.
#[allow(async_fn_in_trait)]
pub trait FreightRateResolver {
    async fn freight_cost_usd(
        &self,
        origin_country: &str,
        origin_port: &str,
        destination_port: &str,
        container: ContainerType,
    ) -> Result<f64, LookupError>;
}

/// Supplies the current exchange-rate snapshot.
#[allow(async_fn_in_trait)]
pub trait RateSource {
    async fn rates(&self) -> Result<RateSnapshot, LookupError>;
}
