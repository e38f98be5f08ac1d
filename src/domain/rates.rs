//! Fixed tariff table. Every amount here is USD; the engine converts to INR
//! with the USD rate of the current snapshot, never with the invoice
//! currency.

use super::entities::Incoterm;

// Sea FCL, per container.
pub const TERMINAL_HANDLING_FCL_USD: f64 = 725.0;
pub const INLAND_HAULAGE_FCL_USD: f64 = 302.0;
pub const DESTINATION_DELIVERY_FCL_20FT_USD: f64 = 241.0;
pub const DESTINATION_DELIVERY_FCL_40FT_USD: f64 = 362.0;
pub const DESTINATION_ORDER_FCL_USD: f64 = 121.0;

// Sea, per shipment. FCL and LCL clear at the same destination tariff.
pub const DESTINATION_CLEARANCE_SEA_USD: f64 = 241.0;

// Sea LCL.
pub const FREIGHT_PER_CBM_USD: f64 = 60.0;
pub const DESTINATION_TRUCKING_PER_CBM_LCL_USD: f64 = 49.0;
pub const DELIVERY_ORDER_LCL_USD: f64 = 121.0;

// Air. Shipments at or under the cutoff pay the flat base rate and skip the
// destination surcharges; heavier shipments use the tier table below.
pub const AIR_BASE_RATE_USD_PER_KG: f64 = 12.0;
pub const AIR_FIXED_RATE_CUTOFF_KG: f64 = 80.0;
pub const DESTINATION_CLEARANCE_AIR_USD: f64 = 61.0;
pub const DESTINATION_TRUCKING_AIR_USD: f64 = 36.0;

/// Flat percentage of the invoice value charged on every shipment.
pub const TRANSACTIONAL_CHARGE_RATE: f64 = 0.03;

// Usable container volume in CBM.
pub const CONTAINER_20FT_CAPACITY_CBM: f64 = 33.0;
pub const CONTAINER_40FT_CAPACITY_CBM: f64 = 67.0;

/// (upper weight bound in kg, USD per kg), ascending.
const AIR_WEIGHT_TIERS_USD: [(f64, f64); 8] = [
    (2.0, 12.0),
    (10.0, 11.0),
    (40.0, 10.0),
    (99.0, 9.0),
    (200.0, 3.2),
    (300.0, 2.8),
    (500.0, 2.5),
    (5000.0, 2.1),
];

const AIR_RATE_ABOVE_5000KG_USD: f64 = 1.8;

/// Per-kg USD rate for air shipments above the fixed-rate cutoff.
pub fn air_tier_rate_usd(chargeable_weight_kg: f64) -> f64 {
    AIR_WEIGHT_TIERS_USD
        .iter()
        .find(|(limit, _)| chargeable_weight_kg <= *limit)
        .map(|(_, rate)| *rate)
        .unwrap_or(AIR_RATE_ABOVE_5000KG_USD)
}

/// Fixed USD charge for the agreed trade term. CIF is freight-inclusive and
/// carries no extra charge.
pub fn incoterm_charge_usd(incoterm: Incoterm) -> f64 {
    match incoterm {
        Incoterm::Exw => 300.0,
        Incoterm::Fob => 200.0,
        Incoterm::Cif => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_rates_decrease_with_weight() {
        let mut previous = f64::MAX;
        for weight in [1.0, 5.0, 20.0, 80.0, 150.0, 250.0, 400.0, 2000.0, 9000.0] {
            let rate = air_tier_rate_usd(weight);
            assert!(rate <= previous, "rate went up at {weight} kg");
            previous = rate;
        }
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        assert_eq!(air_tier_rate_usd(200.0), 3.2);
        assert_eq!(air_tier_rate_usd(200.01), 2.8);
        assert_eq!(air_tier_rate_usd(5000.0), 2.1);
        assert_eq!(air_tier_rate_usd(5000.5), 1.8);
    }

    #[test]
    fn cif_carries_no_charge() {
        assert_eq!(incoterm_charge_usd(Incoterm::Cif), 0.0);
        assert_eq!(incoterm_charge_usd(Incoterm::Exw), 300.0);
        assert_eq!(incoterm_charge_usd(Incoterm::Fob), 200.0);
    }
}
