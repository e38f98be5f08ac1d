//! Landed-cost estimation for imported goods.
//!
//! The cost engine turns a shipment request (invoice value, shipping mode,
//! incoterm, route, package dimensions, tariff classification) into a fully
//! itemized INR cost breakdown: currency conversion, mode-specific freight
//! and surcharges, customs duty, and container planning for sea shipments.
//! Duty and freight-rate lookups are injected contracts; exchange rates come
//! from a cached daily snapshot with offline fallbacks.

pub mod domain;
pub mod infra;
pub mod util;

pub use domain::{
    plan_containers, volumetric_weight_kg, ContactDetails, ContainerFitError,
    ContainerRequirement, ContainerType, CostBreakdown, CostEngine, CostError, Dimensions,
    DutyClassifier, FreightRateResolver, Incoterm, LookupError, ModeDetails, RateSnapshot,
    RateSource, ShipmentRequest, ShippingMode, Surcharge, ValidationError, HOME_CURRENCY,
};
pub use infra::ExchangeRates;
