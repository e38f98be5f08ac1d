//! Domain logic for landed-cost estimation lives here.

pub mod container;
pub mod engine;
pub mod entities;
pub mod lookups;
pub mod rates;

pub use container::{plan_containers, ContainerFitError, ContainerRequirement};
pub use engine::{volumetric_weight_kg, CostEngine, CostError};
pub use entities::{
    ContactDetails, ContainerType, CostBreakdown, Dimensions, Incoterm, ModeDetails, RateSnapshot,
    ShipmentRequest, ShippingMode, Surcharge, ValidationError, HOME_CURRENCY,
};
pub use lookups::{DutyClassifier, FreightRateResolver, LookupError, RateSource};
