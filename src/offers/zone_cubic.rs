//! Zone-cubic offers

use rust_decimal::Decimal;

use crate::{
    carriers::CarrierKey,
    offers::OfferError,
    zones::{Zone, ZoneList, zone_list},
};

/// Price and billed volume produced by a [`ZoneCubicOffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubicCharge {
    /// Amount charged
    pub cost: Decimal,

    /// Volume billed after applying the minimum volume floor (m³)
    pub charged_volume: Decimal,
}

/// Prices shipments by volume within a single zone.
///
/// The offer carries both a primary `zone_name`, which decides whether it prices a destination,
/// and a `zone_names` set consulted by zone-coverage queries. They are usually the same single
/// zone but nothing forces them to agree.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCubicOffer {
    /// External identifier
    pub id: String,

    /// Carrier publishing the offer
    pub carrier: CarrierKey,

    /// External zone identifier
    pub zone_id: String,

    /// Zone the offer prices
    pub zone_name: Zone,

    /// Floor price
    pub min_charge: Decimal,

    /// Price per cubic metre
    pub cubic_rate: Decimal,

    /// Delivery time shown to the user, e.g. `24-48 ώρες`
    pub delivery_time: String,

    /// Smallest billable volume (m³). Falls back to the policy default when absent.
    pub min_cubic_volume: Option<Decimal>,

    /// Declared zone coverage
    pub zone_names: ZoneList,
}

impl ZoneCubicOffer {
    /// Creates an offer for `zone` whose declared coverage is that zone alone.
    pub fn new(
        id: impl Into<String>,
        carrier: CarrierKey,
        zone: impl Into<Zone>,
        min_charge: Decimal,
        cubic_rate: Decimal,
    ) -> Self {
        let zone_name = zone.into();

        Self {
            id: id.into(),
            carrier,
            zone_id: String::new(),
            zone_names: zone_list([zone_name.clone()]),
            zone_name,
            min_charge,
            cubic_rate,
            delivery_time: String::new(),
            min_cubic_volume: None,
        }
    }

    /// Sets the displayed delivery time.
    #[must_use]
    pub fn with_delivery_time(mut self, delivery_time: impl Into<String>) -> Self {
        self.delivery_time = delivery_time.into();
        self
    }

    /// Sets the minimum billable volume.
    #[must_use]
    pub fn with_min_cubic_volume(mut self, volume: Decimal) -> Self {
        self.min_cubic_volume = Some(volume);
        self
    }

    /// Returns true if the offer prices the zone.
    pub fn prices_zone(&self, zone: &Zone) -> bool {
        self.zone_name == *zone
    }

    /// Volume actually billed: the shipment volume, floored at the offer's minimum.
    pub fn chargeable_volume(&self, volume: Decimal, default_floor: Decimal) -> Decimal {
        volume.max(self.min_cubic_volume.unwrap_or(default_floor))
    }

    /// Charge for shipping `volume` cubic metres under this offer, or `None` if it overflows.
    pub fn charge(&self, volume: Decimal, default_floor: Decimal) -> Option<CubicCharge> {
        let charged_volume = self.chargeable_volume(volume, default_floor);
        let by_volume = charged_volume.checked_mul(self.cubic_rate)?;

        Some(CubicCharge {
            cost: self.min_charge.max(by_volume),
            charged_volume,
        })
    }

    /// Checks the offer's entry invariants.
    ///
    /// # Errors
    ///
    /// - [`OfferError::MissingZoneName`]: the primary zone is blank.
    /// - [`OfferError::NonPositiveCubicRate`]: `cubic_rate <= 0`.
    /// - [`OfferError::NonPositiveMinCharge`]: `min_charge <= 0`.
    /// - [`OfferError::NoZones`]: the declared zone set is empty.
    pub fn validate(&self) -> Result<(), OfferError> {
        if self.zone_name.is_blank() {
            return Err(OfferError::MissingZoneName(self.id.clone()));
        }

        if self.cubic_rate <= Decimal::ZERO {
            return Err(OfferError::NonPositiveCubicRate(self.id.clone()));
        }

        if self.min_charge <= Decimal::ZERO {
            return Err(OfferError::NonPositiveMinCharge(self.id.clone()));
        }

        if self.zone_names.is_empty() {
            return Err(OfferError::NoZones(self.id.clone()));
        }

        Ok(())
    }
}
