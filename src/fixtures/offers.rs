//! Offer Fixtures

use serde::Deserialize;

use crate::{
    carriers::CarrierKey,
    fixtures::{FixtureError, parse_decimal, parse_optional_decimal},
    offers::{Offer, WeightOffer, ZoneCubicOffer},
    zones::zone_list,
};

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Offers, in evaluation order
    #[serde(default)]
    pub offers: Vec<OfferFixture>,
}

/// Offer Fixture, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OfferFixture {
    /// Weight-banded offer
    Weight(WeightOfferFixture),

    /// Zone-cubic offer
    ZoneCubic(ZoneCubicOfferFixture),
}

/// Weight Offer Fixture
#[derive(Debug, Deserialize)]
pub struct WeightOfferFixture {
    /// Offer identifier
    pub id: String,

    /// Publishing carrier's identifier
    pub carrier_id: String,

    /// Lower weight bound (kg)
    pub min_weight: String,

    /// Upper weight bound (kg)
    pub max_weight: String,

    /// Flat cost
    pub base_cost: String,

    /// Cost per kg above the lower bound
    #[serde(default)]
    pub extra_cost_per_kg: Option<String>,

    /// Remote-destination surcharge
    #[serde(default)]
    pub extra_cost_remote: Option<String>,

    /// Zones the band applies to
    #[serde(default)]
    pub zone_names: Vec<String>,
}

/// Zone-Cubic Offer Fixture
#[derive(Debug, Deserialize)]
pub struct ZoneCubicOfferFixture {
    /// Offer identifier
    pub id: String,

    /// Publishing carrier's identifier
    pub carrier_id: String,

    /// External zone identifier
    #[serde(default)]
    pub zone_id: String,

    /// Zone the offer prices
    pub zone_name: String,

    /// Minimum charge
    pub min_charge: String,

    /// Cost per m³
    pub cubic_rate: String,

    /// Displayed delivery time
    #[serde(default)]
    pub delivery_time: String,

    /// Minimum billable volume (m³)
    #[serde(default)]
    pub min_cubic_volume: Option<String>,

    /// Declared zones; defaults to the priced zone alone
    #[serde(default)]
    pub zone_names: Vec<String>,
}

impl OfferFixture {
    /// Identifier of the carrier publishing the offer
    pub fn carrier_id(&self) -> &str {
        match self {
            OfferFixture::Weight(fixture) => &fixture.carrier_id,
            OfferFixture::ZoneCubic(fixture) => &fixture.carrier_id,
        }
    }

    /// Convert into an offer published by `carrier`
    ///
    /// # Errors
    ///
    /// Returns an error if a quantity is not a decimal number.
    pub fn try_into_offer(self, carrier: CarrierKey) -> Result<Offer, FixtureError> {
        let offer = match self {
            OfferFixture::Weight(fixture) => {
                let mut offer = WeightOffer::new(
                    fixture.id,
                    carrier,
                    parse_decimal(&fixture.min_weight)?,
                    parse_decimal(&fixture.max_weight)?,
                    parse_decimal(&fixture.base_cost)?,
                    fixture.zone_names,
                );

                offer.extra_cost_per_kg =
                    parse_optional_decimal(fixture.extra_cost_per_kg.as_deref())?;
                offer.extra_cost_remote =
                    parse_optional_decimal(fixture.extra_cost_remote.as_deref())?;

                Offer::Weight(offer)
            }
            OfferFixture::ZoneCubic(fixture) => {
                let mut offer = ZoneCubicOffer::new(
                    fixture.id,
                    carrier,
                    fixture.zone_name,
                    parse_decimal(&fixture.min_charge)?,
                    parse_decimal(&fixture.cubic_rate)?,
                )
                .with_delivery_time(fixture.delivery_time);

                offer.zone_id = fixture.zone_id;
                offer.min_cubic_volume =
                    parse_optional_decimal(fixture.min_cubic_volume.as_deref())?;

                if !fixture.zone_names.is_empty() {
                    offer.zone_names = zone_list(fixture.zone_names);
                }

                Offer::ZoneCubic(offer)
            }
        };

        Ok(offer)
    }
}
