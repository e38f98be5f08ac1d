//! The cost engine: turns a shipment request into an itemized INR breakdown.

use std::collections::BTreeMap;

use thiserror::Error;

use super::container::plan_containers;
use super::entities::{
    ContainerType, CostBreakdown, Dimensions, Incoterm, ModeDetails, ShipmentRequest,
    ShippingMode, Surcharge,
};
use super::lookups::{DutyClassifier, FreightRateResolver, LookupError, RateSource};
use super::rates;

#[derive(Debug, Error)]
pub enum CostError {
    #[error("duty lookup failed for classification code {code}: {source}")]
    InvalidClassification {
        code: String,
        #[source]
        source: LookupError,
    },
    #[error("freight rate lookup failed for {origin_port} -> {destination_port}: {source}")]
    RouteNotFound {
        origin_port: String,
        destination_port: String,
        #[source]
        source: LookupError,
    },
    #[error("no exchange rate for currency {0}")]
    UnsupportedCurrency(String),
    #[error("exchange rates unavailable: {0}")]
    RateSourceUnavailable(String),
}

/// Volumetric air weight in kg: package volume in cm³ per carton, converted
/// to m³ and divided by the standard 6000 air-freight divisor.
pub fn volumetric_weight_kg(dimensions: &Dimensions, cartons: u32) -> f64 {
    dimensions.volume() * cartons as f64 / (1_000_000.0 * 6_000.0)
}

/// Freight and surcharge figures produced by one mode branch.
struct ModeCosts {
    freight_only_inr: f64,
    total_freight_inr: f64,
    surcharges: BTreeMap<Surcharge, f64>,
    details: ModeDetails,
}

pub struct CostEngine<C, F, R> {
    classifier: C,
    freight_rates: F,
    exchange: R,
}

impl<C, F, R> CostEngine<C, F, R>
where
    C: DutyClassifier,
    F: FreightRateResolver,
    R: RateSource,
{
    pub fn new(classifier: C, freight_rates: F, exchange: R) -> Self {
        Self {
            classifier,
            freight_rates,
            exchange,
        }
    }

    /// Computes the complete landed-cost estimate for one shipment.
    ///
    /// Only the invoice value is converted with the invoice currency; all
    /// tariff constants are USD and convert with the snapshot's USD rate.
    pub async fn compute_landed_cost(
        &self,
        request: &ShipmentRequest,
    ) -> Result<CostBreakdown, CostError> {
        let code = request.classification_code.as_str();
        let duty_percentage = match self.classifier.duty_percentage(code).await {
            Ok(value) if value.is_finite() => value,
            Ok(_) => {
                return Err(CostError::InvalidClassification {
                    code: code.to_string(),
                    source: LookupError::Backend(
                        "duty percentage is not a finite number".to_string(),
                    ),
                })
            }
            Err(source) => {
                return Err(CostError::InvalidClassification {
                    code: code.to_string(),
                    source,
                })
            }
        };

        let snapshot = self
            .exchange
            .rates()
            .await
            .map_err(|error| CostError::RateSourceUnavailable(error.to_string()))?;
        let product_cost_inr = snapshot
            .to_inr(request.product_cost, &request.currency)
            .ok_or_else(|| CostError::UnsupportedCurrency(request.currency.clone()))?;
        let usd_to_inr = snapshot
            .rate("USD")
            .ok_or_else(|| CostError::UnsupportedCurrency("USD".to_string()))?;

        let mode_costs = match request.mode {
            ShippingMode::SeaFcl(container) => {
                self.sea_fcl_costs(request, container, product_cost_inr, usd_to_inr)
                    .await?
            }
            ShippingMode::SeaLcl => sea_lcl_costs(request, product_cost_inr, usd_to_inr),
            ShippingMode::Air => air_costs(request, product_cost_inr, usd_to_inr),
        };

        let assessable_value = product_cost_inr + mode_costs.freight_only_inr;
        let customs_duty_inr = (assessable_value * duty_percentage / 100.0).round();
        // total_freight_inr already contains freight_only_inr, so the base
        // freight enters the total twice.
        let total_landed_cost_inr = assessable_value + customs_duty_inr + mode_costs.total_freight_inr;

        Ok(CostBreakdown {
            contact: request.contact.clone(),
            product_name: request.product_name.clone(),
            mode: request.mode,
            incoterm: request.incoterm,
            product_cost_inr,
            freight_only_inr: mode_costs.freight_only_inr,
            total_freight_inr: mode_costs.total_freight_inr,
            customs_duty_inr,
            duty_percentage,
            total_landed_cost_inr,
            surcharges: mode_costs.surcharges,
            details: mode_costs.details,
        })
    }

    async fn sea_fcl_costs(
        &self,
        request: &ShipmentRequest,
        container: ContainerType,
        product_cost_inr: f64,
        usd_to_inr: f64,
    ) -> Result<ModeCosts, CostError> {
        let route_error = |source| CostError::RouteNotFound {
            origin_port: request.origin_port.clone(),
            destination_port: request.destination_port.clone(),
            source,
        };
        let freight_usd = self
            .freight_rates
            .freight_cost_usd(
                &request.origin_country,
                &request.origin_port,
                &request.destination_port,
                container,
            )
            .await
            .map_err(route_error)?;
        if !freight_usd.is_finite() {
            return Err(route_error(LookupError::Backend(
                "freight cost is not a finite number".to_string(),
            )));
        }

        let freight_only_inr = (freight_usd * usd_to_inr).round();
        let transactional = transactional_charge(product_cost_inr);
        let thc = rates::TERMINAL_HANDLING_FCL_USD * usd_to_inr;
        let ihc = rates::INLAND_HAULAGE_FCL_USD * usd_to_inr;
        let clearance = rates::DESTINATION_CLEARANCE_SEA_USD * usd_to_inr;
        let delivery = match container {
            ContainerType::Twenty => rates::DESTINATION_DELIVERY_FCL_20FT_USD,
            ContainerType::Forty => rates::DESTINATION_DELIVERY_FCL_40FT_USD,
        } * usd_to_inr;
        let order = rates::DESTINATION_ORDER_FCL_USD * usd_to_inr;

        let mut total_freight_inr =
            freight_only_inr + thc + ihc + clearance + delivery + order + transactional;

        let mut surcharges = BTreeMap::from([
            (Surcharge::Transactional, transactional),
            (Surcharge::TerminalHandling, thc),
            (Surcharge::InlandHaulage, ihc),
            (Surcharge::DestinationClearance, clearance),
            (Surcharge::DestinationDelivery, delivery),
            (Surcharge::DestinationOrder, order),
        ]);
        apply_incoterm(request.incoterm, usd_to_inr, &mut total_freight_inr, &mut surcharges);

        Ok(ModeCosts {
            freight_only_inr,
            total_freight_inr,
            surcharges,
            details: ModeDetails::SeaFcl {
                container,
                // A fit error is reported in the details, it does not void
                // the estimate.
                containers: plan_containers(&request.dimensions, request.cartons),
            },
        })
    }
}

fn sea_lcl_costs(request: &ShipmentRequest, product_cost_inr: f64, usd_to_inr: f64) -> ModeCosts {
    let package_cbm = request.dimensions.volume();
    let total_cbm = package_cbm * request.cartons as f64;

    let freight_only_inr = total_cbm * (rates::FREIGHT_PER_CBM_USD * usd_to_inr);
    let trucking = total_cbm * (rates::DESTINATION_TRUCKING_PER_CBM_LCL_USD * usd_to_inr);
    let clearance = rates::DESTINATION_CLEARANCE_SEA_USD * usd_to_inr;
    let delivery_order = rates::DELIVERY_ORDER_LCL_USD * usd_to_inr;
    let transactional = transactional_charge(product_cost_inr);

    let mut total_freight_inr =
        freight_only_inr + trucking + clearance + delivery_order + transactional;

    let mut surcharges = BTreeMap::from([
        (Surcharge::Transactional, transactional),
        (Surcharge::DestinationTrucking, trucking),
        (Surcharge::DestinationClearance, clearance),
        (Surcharge::DeliveryOrder, delivery_order),
    ]);
    apply_incoterm(request.incoterm, usd_to_inr, &mut total_freight_inr, &mut surcharges);

    ModeCosts {
        freight_only_inr,
        total_freight_inr,
        surcharges,
        details: ModeDetails::SeaLcl {
            package_cbm,
            total_cbm,
        },
    }
}

fn air_costs(request: &ShipmentRequest, product_cost_inr: f64, usd_to_inr: f64) -> ModeCosts {
    let volumetric = volumetric_weight_kg(&request.dimensions, request.cartons);
    let chargeable_weight_kg = request.gross_weight_kg.max(volumetric);

    let transactional = transactional_charge(product_cost_inr);
    let mut surcharges = BTreeMap::from([(Surcharge::Transactional, transactional)]);

    let (freight_only_inr, total_freight_inr) =
        if chargeable_weight_kg <= rates::AIR_FIXED_RATE_CUTOFF_KG {
            // Light shipments pay the flat rate with no destination
            // surcharges and no incoterm charge.
            let freight = chargeable_weight_kg * (rates::AIR_BASE_RATE_USD_PER_KG * usd_to_inr);
            (freight, freight + transactional)
        } else {
            let tier_rate = rates::air_tier_rate_usd(chargeable_weight_kg);
            let freight = (chargeable_weight_kg * tier_rate * usd_to_inr).round();
            let clearance = rates::DESTINATION_CLEARANCE_AIR_USD * usd_to_inr;
            let trucking = rates::DESTINATION_TRUCKING_AIR_USD * usd_to_inr;
            surcharges.insert(Surcharge::DestinationClearance, clearance);
            surcharges.insert(Surcharge::DestinationTrucking, trucking);

            let incoterm_inr = rates::incoterm_charge_usd(request.incoterm) * usd_to_inr;
            match request.incoterm {
                Incoterm::Exw => {
                    surcharges.insert(Surcharge::Exw, incoterm_inr);
                    (
                        freight,
                        freight + incoterm_inr + clearance + trucking + transactional,
                    )
                }
                Incoterm::Fob => {
                    surcharges.insert(Surcharge::Fob, incoterm_inr);
                    (
                        freight,
                        freight + incoterm_inr + clearance + trucking + transactional,
                    )
                }
                Incoterm::Cif => {
                    // CIF is freight-inclusive: the freight line is absorbed
                    // into the CIF charge and zeroed in the breakdown.
                    surcharges.insert(Surcharge::Cif, incoterm_inr);
                    (0.0, incoterm_inr + clearance + trucking + transactional)
                }
            }
        };

    ModeCosts {
        freight_only_inr,
        total_freight_inr,
        surcharges,
        details: ModeDetails::Air {
            chargeable_weight_kg,
        },
    }
}

fn transactional_charge(product_cost_inr: f64) -> f64 {
    (product_cost_inr * rates::TRANSACTIONAL_CHARGE_RATE).round()
}

/// EXW and FOB add their fixed charge to the freight total and the surcharge
/// map; CIF adds nothing for sea modes.
fn apply_incoterm(
    incoterm: Incoterm,
    usd_to_inr: f64,
    total_freight_inr: &mut f64,
    surcharges: &mut BTreeMap<Surcharge, f64>,
) {
    let charge = rates::incoterm_charge_usd(incoterm) * usd_to_inr;
    match incoterm {
        Incoterm::Exw => {
            *total_freight_inr += charge;
            surcharges.insert(Surcharge::Exw, charge);
        }
        Incoterm::Fob => {
            *total_freight_inr += charge;
            surcharges.insert(Surcharge::Fob, charge);
        }
        Incoterm::Cif => {}
    }
}
