//! Carrier Fixtures

use serde::Deserialize;

use crate::{
    carriers::{Carrier, CarrierLimits, PostalCodeList},
    fixtures::{FixtureError, parse_decimal},
};

/// Wrapper for carriers in YAML
#[derive(Debug, Deserialize)]
pub struct CarriersFixture {
    /// Carriers, in quoting order
    #[serde(default)]
    pub carriers: Vec<CarrierFixture>,
}

/// Carrier Fixture
#[derive(Debug, Deserialize)]
pub struct CarrierFixture {
    /// Carrier identifier, referenced by offers
    pub id: String,

    /// Display name
    pub name: String,

    /// Physical limits
    pub limits: LimitsFixture,

    /// Publishes weight-banded offers
    #[serde(default)]
    pub offers_by_weight: bool,

    /// Publishes zone-cubic offers
    #[serde(default)]
    pub offers_by_cubic: bool,

    /// Postal codes the carrier delivers to
    #[serde(default)]
    pub serviced_postal_codes: Vec<String>,

    /// Postal codes the carrier treats as remote
    #[serde(default)]
    pub remote_postal_codes: Vec<String>,

    /// Postal codes without cash on delivery
    #[serde(default)]
    pub no_cash_on_delivery_postal_codes: Vec<String>,

    /// Declared service zones
    #[serde(default)]
    pub service_zones: Vec<String>,
}

/// Carrier limits, as decimal strings (e.g., "0.5")
#[derive(Debug, Deserialize)]
pub struct LimitsFixture {
    /// Maximum length (cm)
    pub max_length: String,

    /// Maximum width (cm)
    pub max_width: String,

    /// Maximum height (cm)
    pub max_height: String,

    /// Maximum weight (kg)
    pub max_weight: String,

    /// Maximum volume (m³); "0" disables the cap
    #[serde(default = "no_cubic_cap")]
    pub max_cubic: String,
}

fn no_cubic_cap() -> String {
    "0".to_string()
}

impl TryFrom<LimitsFixture> for CarrierLimits {
    type Error = FixtureError;

    fn try_from(fixture: LimitsFixture) -> Result<Self, Self::Error> {
        Ok(CarrierLimits {
            max_length: parse_decimal(&fixture.max_length)?,
            max_width: parse_decimal(&fixture.max_width)?,
            max_height: parse_decimal(&fixture.max_height)?,
            max_weight: parse_decimal(&fixture.max_weight)?,
            max_cubic: parse_decimal(&fixture.max_cubic)?,
        })
    }
}

impl TryFrom<CarrierFixture> for Carrier {
    type Error = FixtureError;

    fn try_from(fixture: CarrierFixture) -> Result<Self, Self::Error> {
        let mut carrier = Carrier::new(fixture.id, fixture.name, fixture.limits.try_into()?)
            .with_postal_codes(PostalCodeList::Serviced, fixture.serviced_postal_codes)
            .with_postal_codes(PostalCodeList::Remote, fixture.remote_postal_codes)
            .with_postal_codes(
                PostalCodeList::NoCashOnDelivery,
                fixture.no_cash_on_delivery_postal_codes,
            )
            .with_service_zones(fixture.service_zones);

        carrier.offers_by_weight = fixture.offers_by_weight;
        carrier.offers_by_cubic = fixture.offers_by_cubic;

        Ok(carrier)
    }
}
