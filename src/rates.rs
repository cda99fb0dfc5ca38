//! Rate Selection
//!
//! Finds the cheapest offer an eligible carrier has for a shipment. Three passes run over the
//! carrier's offers and the lowest cost across all of them wins:
//!
//! 1. weight-banded offers priced on the actual weight,
//! 2. zone-cubic offers priced on the chargeable volume,
//! 3. weight-banded offers priced on volumetric weight, for carriers without a cubic cap when
//!    the volumetric weight exceeds the actual weight.
//!
//! Ties keep the first offer seen.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    carriers::{Carrier, CarrierKey},
    eligibility::ServiceTerms,
    offers::{Offer, OfferType, WeightOffer, ZoneCubicOffer},
    packages::PackageDetails,
    policy::PricingPolicy,
    zones::Zone,
};

/// Quantity an offer's price was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBasis {
    /// Actual shipment weight
    ActualWeight,

    /// Volumetric weight equivalent of the shipment volume
    VolumetricWeight,

    /// Chargeable shipment volume
    Volume,
}

/// The winning offer for one carrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSelection<'c> {
    /// Offer that produced the lowest cost
    pub offer: &'c Offer,

    /// Per-shipment cost before VAT
    pub unit_cost: Decimal,

    /// What the cost was computed from
    pub basis: RateBasis,

    /// Weight the offer was priced on, for weight-banded winners (kg)
    pub billed_weight: Option<Decimal>,

    /// Volume the offer was priced on, for zone-cubic winners (m³)
    pub charged_volume: Option<Decimal>,
}

impl<'c> RateSelection<'c> {
    /// Type of the winning offer.
    pub fn offer_type(&self) -> OfferType {
        self.offer.offer_type()
    }

    /// Delivery time of the winning offer, for zone-cubic winners.
    pub fn delivery_time(&self) -> Option<&'c str> {
        match self.offer {
            Offer::ZoneCubic(offer) => Some(offer.delivery_time.as_str()),
            Offer::Weight(_) => None,
        }
    }
}

/// Everything the selector needs to price one carrier.
#[derive(Debug, Clone, Copy)]
pub struct RateRequest<'a> {
    /// Key of the eligible carrier
    pub carrier_key: CarrierKey,

    /// Eligible carrier
    pub carrier: &'a Carrier,

    /// Shipment
    pub details: &'a PackageDetails,

    /// Destination zone
    pub zone: &'a Zone,

    /// Terms from the eligibility check
    pub terms: ServiceTerms,

    /// Policy constants
    pub policy: &'a PricingPolicy,
}

/// Running minimum across the passes.
#[derive(Debug, Default)]
struct Cheapest<'c> {
    best: Option<RateSelection<'c>>,
}

impl<'c> Cheapest<'c> {
    fn consider(&mut self, candidate: RateSelection<'c>) {
        let lower = self
            .best
            .is_none_or(|best| candidate.unit_cost < best.unit_cost);

        if lower {
            self.best = Some(candidate);
        }
    }
}

/// Selects the cheapest applicable offer among `offers` for an eligible carrier.
///
/// Offers published by other carriers are ignored. Returns `None` if no offer applies, in which
/// case the carrier gets no quote.
pub fn select_rate<'c>(
    request: &RateRequest<'_>,
    offers: impl IntoIterator<Item = &'c Offer> + Clone,
) -> Option<RateSelection<'c>> {
    let mut cheapest = Cheapest::default();

    if request.carrier.offers_by_weight
        && let Some(weight) = request.details.weight()
    {
        weight_pass(request, offers.clone(), weight, RateBasis::ActualWeight, &mut cheapest);
    }

    if request.carrier.offers_by_cubic
        && let Some(volume) = request.details.volume()
    {
        zone_cubic_pass(request, offers.clone(), volume, &mut cheapest);
    }

    if request.carrier.offers_by_weight
        && !request.carrier.limits.has_cubic_cap()
        && let Some(volume) = request.details.volume()
    {
        volumetric_pass(request, offers, volume, &mut cheapest);
    }

    cheapest.best
}

fn weight_offers<'c>(
    request: &RateRequest<'_>,
    offers: impl IntoIterator<Item = &'c Offer>,
) -> impl Iterator<Item = (&'c Offer, &'c WeightOffer)> {
    let carrier = request.carrier_key;

    offers.into_iter().filter_map(move |offer| match offer {
        Offer::Weight(weight) if weight.carrier == carrier => Some((offer, weight)),
        _ => None,
    })
}

fn zone_cubic_offers<'c>(
    request: &RateRequest<'_>,
    offers: impl IntoIterator<Item = &'c Offer>,
) -> impl Iterator<Item = (&'c Offer, &'c ZoneCubicOffer)> {
    let carrier = request.carrier_key;

    offers.into_iter().filter_map(move |offer| match offer {
        Offer::ZoneCubic(cubic) if cubic.carrier == carrier => Some((offer, cubic)),
        _ => None,
    })
}

fn weight_pass<'c>(
    request: &RateRequest<'_>,
    offers: impl IntoIterator<Item = &'c Offer>,
    weight: Decimal,
    basis: RateBasis,
    cheapest: &mut Cheapest<'c>,
) {
    for (offer, weight_offer) in weight_offers(request, offers) {
        let Some(unit_cost) = weight_offer.quote(request.zone, weight, request.terms.is_remote)
        else {
            debug!(
                carrier = %request.carrier.name,
                offer = %weight_offer.id,
                %weight,
                zone = %request.zone,
                "weight offer does not apply or its cost overflows"
            );
            continue;
        };

        debug!(
            carrier = %request.carrier.name,
            offer = %weight_offer.id,
            ?basis,
            %unit_cost,
            "weight offer priced"
        );

        cheapest.consider(RateSelection {
            offer,
            unit_cost,
            basis,
            billed_weight: Some(weight),
            charged_volume: None,
        });
    }
}

fn volumetric_pass<'c>(
    request: &RateRequest<'_>,
    offers: impl IntoIterator<Item = &'c Offer>,
    volume: Decimal,
    cheapest: &mut Cheapest<'c>,
) {
    let Some(volumetric_weight) = request.policy.volumetric_weight(volume) else {
        debug!(
            carrier = %request.carrier.name,
            %volume,
            "volumetric weight overflows, skipping volumetric pricing"
        );
        return;
    };

    if volumetric_weight <= request.details.actual_weight() {
        return;
    }

    debug!(
        carrier = %request.carrier.name,
        %volumetric_weight,
        actual_weight = %request.details.actual_weight(),
        "pricing on volumetric weight"
    );

    weight_pass(
        request,
        offers,
        volumetric_weight,
        RateBasis::VolumetricWeight,
        cheapest,
    );
}

fn zone_cubic_pass<'c>(
    request: &RateRequest<'_>,
    offers: impl IntoIterator<Item = &'c Offer>,
    volume: Decimal,
    cheapest: &mut Cheapest<'c>,
) {
    let floor = request.policy.default_min_cubic_volume;

    for (offer, cubic_offer) in zone_cubic_offers(request, offers) {
        if !cubic_offer.prices_zone(request.zone) {
            continue;
        }

        let Some(charge) = cubic_offer.charge(volume, floor) else {
            debug!(
                carrier = %request.carrier.name,
                offer = %cubic_offer.id,
                %volume,
                "zone-cubic charge overflows"
            );
            continue;
        };

        debug!(
            carrier = %request.carrier.name,
            offer = %cubic_offer.id,
            charged_volume = %charge.charged_volume,
            unit_cost = %charge.cost,
            "zone-cubic offer priced"
        );

        cheapest.consider(RateSelection {
            offer,
            unit_cost: charge.cost,
            basis: RateBasis::Volume,
            billed_weight: None,
            charged_volume: Some(charge.charged_volume),
        });
    }
}
