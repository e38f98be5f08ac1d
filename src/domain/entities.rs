use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Iso8601, Date};

use super::container::ContainerRequirement;
use crate::util::format::format_currency;

/// Every monetary output of the engine is denominated in this currency.
pub const HOME_CURRENCY: &str = "INR";

/// Sea container sizes supported by the freight-rate tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    Twenty,
    Forty,
}

impl ContainerType {
    pub fn label(&self) -> &'static str {
        match self {
            ContainerType::Twenty => "20 ft",
            ContainerType::Forty => "40 ft",
        }
    }
}

/// Shipping mode. The container type only exists for full-container sea
/// shipments, so it lives inside that variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingMode {
    SeaFcl(ContainerType),
    SeaLcl,
    Air,
}

impl ShippingMode {
    pub fn label(&self) -> &'static str {
        match self {
            ShippingMode::SeaFcl(_) => "Sea FCL",
            ShippingMode::SeaLcl => "Sea LCL",
            ShippingMode::Air => "Air",
        }
    }
}

/// Trade term agreed with the supplier. Each term maps to a fixed USD
/// charge in the rate table (CIF's is zero).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Incoterm {
    Exw,
    Fob,
    Cif,
}

impl Incoterm {
    pub fn label(&self) -> &'static str {
        match self {
            Incoterm::Exw => "EXW",
            Incoterm::Fob => "FOB",
            Incoterm::Cif => "CIF",
        }
    }
}

/// Outer package dimensions. Sea modes read these as meters, air as
/// centimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// Requester identity, echoed unchanged into the breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub customer_name: String,
    pub company_name: String,
    pub contact_number: String,
    pub email: String,
}

/// A single import shipment to be costed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub contact: ContactDetails,
    pub product_name: String,
    /// Invoice value in `currency`.
    pub product_cost: f64,
    /// ISO currency code of the invoice (e.g. "USD").
    pub currency: String,
    pub mode: ShippingMode,
    pub incoterm: Incoterm,
    /// Tariff classification code used for the duty lookup.
    pub classification_code: String,
    pub origin_country: String,
    /// Port for sea modes, airport for air.
    pub origin_port: String,
    pub destination_port: String,
    pub gross_weight_kg: f64,
    /// Number of identical packages.
    pub cartons: u32,
    pub dimensions: Dimensions,
}

impl ShipmentRequest {
    /// Field-level checks matching what the intake form enforces. The engine
    /// itself assumes a validated request; callers run this before submitting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_cost < 0.0 || !self.product_cost.is_finite() {
            return Err(ValidationError::InvoiceValue);
        }
        if self.gross_weight_kg < 0.0 || !self.gross_weight_kg.is_finite() {
            return Err(ValidationError::GrossWeight);
        }
        if self.cartons < 1 {
            return Err(ValidationError::Cartons);
        }
        let Dimensions {
            length,
            width,
            height,
        } = self.dimensions;
        if !(length > 0.0 && width > 0.0 && height > 0.0) {
            return Err(ValidationError::Dimensions);
        }
        for (field, value) in [
            ("customer name", &self.contact.customer_name),
            ("company name", &self.contact.company_name),
            ("product name", &self.product_name),
            ("currency", &self.currency),
            ("classification code", &self.classification_code),
            ("origin country", &self.origin_country),
            ("origin port", &self.origin_port),
            ("destination port", &self.destination_port),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(field));
            }
        }
        let number = &self.contact.contact_number;
        if number.len() != 10 || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::ContactNumber);
        }
        let email = &self.contact.email;
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(ValidationError::Email);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invoice value must be zero or greater")]
    InvoiceValue,
    #[error("gross weight must be zero or greater")]
    GrossWeight,
    #[error("carton count must be at least 1")]
    Cartons,
    #[error("package dimensions must all be greater than zero")]
    Dimensions,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("contact number must be exactly 10 digits")]
    ContactNumber,
    #[error("invalid email address")]
    Email,
}

/// Itemized charge names for the sparse surcharge map. A key is present only
/// when that charge applied to the shipment; an absent key means "not
/// applicable", not zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Surcharge {
    Transactional,
    TerminalHandling,
    InlandHaulage,
    DestinationClearance,
    DestinationDelivery,
    DestinationOrder,
    DestinationTrucking,
    DeliveryOrder,
    Exw,
    Fob,
    Cif,
}

impl Surcharge {
    pub fn label(&self) -> &'static str {
        match self {
            Surcharge::Transactional => "Transactional charges",
            Surcharge::TerminalHandling => "Terminal handling",
            Surcharge::InlandHaulage => "Inland haulage",
            Surcharge::DestinationClearance => "Destination clearance",
            Surcharge::DestinationDelivery => "Destination delivery",
            Surcharge::DestinationOrder => "Destination order charges",
            Surcharge::DestinationTrucking => "Destination trucking",
            Surcharge::DeliveryOrder => "Delivery order charges",
            Surcharge::Exw => "EXW charges",
            Surcharge::Fob => "FOB charges",
            Surcharge::Cif => "CIF charges",
        }
    }
}

/// Mode-specific figures attached to a breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModeDetails {
    SeaFcl {
        container: ContainerType,
        containers: ContainerRequirement,
    },
    SeaLcl {
        package_cbm: f64,
        total_cbm: f64,
    },
    Air {
        chargeable_weight_kg: f64,
    },
}

/// Fully itemized landed-cost estimate. All amounts are INR.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub contact: ContactDetails,
    pub product_name: String,
    pub mode: ShippingMode,
    pub incoterm: Incoterm,
    pub product_cost_inr: f64,
    /// Base freight alone, before surcharges.
    pub freight_only_inr: f64,
    /// Base freight plus every mode surcharge and the incoterm charge.
    pub total_freight_inr: f64,
    pub customs_duty_inr: f64,
    pub duty_percentage: f64,
    pub total_landed_cost_inr: f64,
    pub surcharges: BTreeMap<Surcharge, f64>,
    pub details: ModeDetails,
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} / {})",
            self.product_name,
            self.mode.label(),
            self.incoterm.label()
        )?;
        writeln!(
            f,
            "Product cost: {}",
            format_currency(self.product_cost_inr, HOME_CURRENCY)
        )?;
        writeln!(
            f,
            "Freight: {}",
            format_currency(self.freight_only_inr, HOME_CURRENCY)
        )?;
        for (surcharge, amount) in &self.surcharges {
            writeln!(
                f,
                "{}: {}",
                surcharge.label(),
                format_currency(*amount, HOME_CURRENCY)
            )?;
        }
        writeln!(
            f,
            "Total freight: {}",
            format_currency(self.total_freight_inr, HOME_CURRENCY)
        )?;
        writeln!(
            f,
            "Customs duty ({}%): {}",
            self.duty_percentage,
            format_currency(self.customs_duty_inr, HOME_CURRENCY)
        )?;
        write!(
            f,
            "Total landed cost: {}",
            format_currency(self.total_landed_cost_inr, HOME_CURRENCY)
        )
    }
}

/// Exchange-rate table keyed by currency code: INR per one unit of the keyed
/// currency. Always contains INR itself (rate 1) and USD.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    date: Option<String>,
    rates: HashMap<String, f64>,
}

impl RateSnapshot {
    /// Build a snapshot from an upstream INR-based quote table. The upstream
    /// reports "1 INR = X units of currency"; the stored rate is the inverse.
    /// Non-positive and non-finite quotes are dropped.
    pub fn from_inr_quotes<I>(date: Option<String>, quotes: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut rates: HashMap<String, f64> = quotes
            .into_iter()
            .filter(|(_, quote)| quote.is_finite() && *quote > 0.0)
            .map(|(code, quote)| (code.to_ascii_uppercase(), 1.0 / quote))
            .collect();
        rates.insert(HOME_CURRENCY.to_string(), 1.0);
        Self { date, rates }
    }

    /// Compiled-in table used when no fetch ever succeeded and no cached
    /// snapshot exists.
    pub fn fallback() -> Self {
        let rates = [
            (HOME_CURRENCY, 1.0),
            ("USD", 83.0),
            ("EUR", 90.0),
            ("GBP", 105.0),
            ("JPY", 0.55),
            ("AUD", 54.0),
            ("CAD", 61.0),
            ("CHF", 94.0),
            ("CNY", 11.5),
            ("SGD", 62.0),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();
        Self { date: None, rates }
    }

    /// INR per one unit of `code`, if the snapshot carries it.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_ascii_uppercase()).copied()
    }

    pub fn to_inr(&self, amount: f64, code: &str) -> Option<f64> {
        self.rate(code).map(|rate| amount * rate)
    }

    pub fn from_inr(&self, amount: f64, code: &str) -> Option<f64> {
        self.rate(code).map(|rate| amount / rate)
    }

    /// Upstream publication date, when the source supplied one.
    pub fn published_on(&self) -> Option<Date> {
        self.date
            .as_deref()
            .and_then(|raw| Date::parse(raw, &Iso8601::DEFAULT).ok())
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ShipmentRequest {
        ShipmentRequest {
            contact: ContactDetails {
                customer_name: "Asha Rao".to_string(),
                company_name: "Rao Imports".to_string(),
                contact_number: "9876543210".to_string(),
                email: "asha@raoimports.example".to_string(),
            },
            product_name: "Ceramic tiles".to_string(),
            product_cost: 1000.0,
            currency: "USD".to_string(),
            mode: ShippingMode::SeaLcl,
            incoterm: Incoterm::Fob,
            classification_code: "690721".to_string(),
            origin_country: "China".to_string(),
            origin_port: "Shanghai".to_string(),
            destination_port: "Nhava Sheva".to_string(),
            gross_weight_kg: 500.0,
            cartons: 10,
            dimensions: Dimensions {
                length: 1.2,
                width: 0.8,
                height: 0.9,
            },
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn negative_invoice_value_rejected() {
        let mut req = request();
        req.product_cost = -1.0;
        assert_eq!(req.validate(), Err(ValidationError::InvoiceValue));
    }

    #[test]
    fn zero_dimension_rejected() {
        let mut req = request();
        req.dimensions.height = 0.0;
        assert_eq!(req.validate(), Err(ValidationError::Dimensions));
    }

    #[test]
    fn short_contact_number_rejected() {
        let mut req = request();
        req.contact.contact_number = "12345".to_string();
        assert_eq!(req.validate(), Err(ValidationError::ContactNumber));
    }

    #[test]
    fn snapshot_inverts_upstream_quotes() {
        let snapshot = RateSnapshot::from_inr_quotes(
            Some("2026-01-15".to_string()),
            vec![
                ("usd".to_string(), 0.0125),
                ("eur".to_string(), 0.01),
                ("bad".to_string(), 0.0),
            ],
        );
        assert_eq!(snapshot.rate("USD"), Some(80.0));
        assert_eq!(snapshot.rate("eur"), Some(100.0));
        assert_eq!(snapshot.rate("BAD"), None);
        assert_eq!(snapshot.rate(HOME_CURRENCY), Some(1.0));
        assert_eq!(
            snapshot.published_on(),
            Some(Date::from_calendar_date(2026, time::Month::January, 15).unwrap())
        );
    }

    #[test]
    fn fallback_covers_home_and_usd() {
        let snapshot = RateSnapshot::fallback();
        assert_eq!(snapshot.rate(HOME_CURRENCY), Some(1.0));
        assert_eq!(snapshot.rate("USD"), Some(83.0));
        assert_eq!(snapshot.len(), 10);
    }

    #[test]
    fn conversion_round_trips() {
        let snapshot = RateSnapshot::fallback();
        let inr = snapshot.to_inr(1234.56, "EUR").unwrap();
        let back = snapshot.from_inr(inr, "EUR").unwrap();
        assert!((back - 1234.56).abs() < 1e-9);
    }
}
