//! Weight-banded offers

use rust_decimal::Decimal;

use crate::{
    carriers::CarrierKey,
    offers::OfferError,
    zones::{Zone, ZoneList, zone_list},
};

/// Prices shipments whose weight falls within an inclusive band.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightOffer {
    /// External identifier
    pub id: String,

    /// Carrier publishing the offer
    pub carrier: CarrierKey,

    /// Lower bound of the weight band, inclusive (kg)
    pub min_weight: Decimal,

    /// Upper bound of the weight band, inclusive (kg)
    pub max_weight: Decimal,

    /// Flat cost for any weight in the band
    pub base_cost: Decimal,

    /// Cost per kilogram above `min_weight`
    pub extra_cost_per_kg: Option<Decimal>,

    /// Flat surcharge for remote destinations
    pub extra_cost_remote: Option<Decimal>,

    /// Zones the band applies to
    pub zone_names: ZoneList,
}

impl WeightOffer {
    /// Creates an offer without per-kilogram or remote surcharges.
    pub fn new<I, Z>(
        id: impl Into<String>,
        carrier: CarrierKey,
        min_weight: Decimal,
        max_weight: Decimal,
        base_cost: Decimal,
        zones: I,
    ) -> Self
    where
        I: IntoIterator<Item = Z>,
        Z: Into<Zone>,
    {
        Self {
            id: id.into(),
            carrier,
            min_weight,
            max_weight,
            base_cost,
            extra_cost_per_kg: None,
            extra_cost_remote: None,
            zone_names: zone_list(zones),
        }
    }

    /// Sets the per-kilogram cost above `min_weight`.
    #[must_use]
    pub fn with_extra_cost_per_kg(mut self, cost: Decimal) -> Self {
        self.extra_cost_per_kg = Some(cost);
        self
    }

    /// Sets the remote-destination surcharge.
    #[must_use]
    pub fn with_extra_cost_remote(mut self, cost: Decimal) -> Self {
        self.extra_cost_remote = Some(cost);
        self
    }

    /// Returns true if the offer applies to the zone.
    pub fn applies_to(&self, zone: &Zone) -> bool {
        self.zone_names.contains(zone)
    }

    /// Returns true if the weight lies within the band, bounds included.
    pub fn covers(&self, weight: Decimal) -> bool {
        self.min_weight <= weight && weight <= self.max_weight
    }

    /// Cost of shipping `weight` kilograms under this offer, or `None` if it overflows.
    ///
    /// The per-kilogram charge applies to the weight above `min_weight`; the remote surcharge
    /// is added only when the destination is remote and the offer defines one.
    pub fn cost(&self, weight: Decimal, is_remote: bool) -> Option<Decimal> {
        let mut cost = self.base_cost;

        if let Some(per_kg) = self.extra_cost_per_kg {
            let extra_weight = weight.checked_sub(self.min_weight)?.max(Decimal::ZERO);

            cost = cost.checked_add(extra_weight.checked_mul(per_kg)?)?;
        }

        if is_remote && let Some(surcharge) = self.extra_cost_remote {
            cost = cost.checked_add(surcharge)?;
        }

        Some(cost)
    }

    /// Cost of shipping `weight` to `zone`, if the offer matches both and the cost is
    /// representable.
    pub fn quote(&self, zone: &Zone, weight: Decimal, is_remote: bool) -> Option<Decimal> {
        if !(self.applies_to(zone) && self.covers(weight)) {
            return None;
        }

        self.cost(weight, is_remote)
    }

    /// Checks the offer's entry invariants.
    ///
    /// # Errors
    ///
    /// - [`OfferError::InvalidWeightRange`]: `min_weight >= max_weight`.
    /// - [`OfferError::NonPositiveBaseCost`]: `base_cost <= 0`.
    /// - [`OfferError::NoZones`]: no zones are listed.
    pub fn validate(&self) -> Result<(), OfferError> {
        if self.min_weight >= self.max_weight {
            return Err(OfferError::InvalidWeightRange(self.id.clone()));
        }

        if self.base_cost <= Decimal::ZERO {
            return Err(OfferError::NonPositiveBaseCost(self.id.clone()));
        }

        if self.zone_names.is_empty() {
            return Err(OfferError::NoZones(self.id.clone()));
        }

        Ok(())
    }
}
