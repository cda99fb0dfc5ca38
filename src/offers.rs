//! Offers
//!
//! Pricing rules a carrier publishes. Each rule is either weight-banded ([`WeightOffer`]) or
//! charged by volume within one zone ([`ZoneCubicOffer`]).

use std::fmt;

use slotmap::new_key_type;
use thiserror::Error;

use crate::{carriers::CarrierKey, zones::{Zone, ZoneList}};

pub mod weight;
pub mod zone_cubic;

pub use weight::WeightOffer;
pub use zone_cubic::{CubicCharge, ZoneCubicOffer};

new_key_type! {
    /// Offer Key
    pub struct OfferKey;
}

/// Errors raised when an offer violates an entry invariant.
#[derive(Debug, Error, PartialEq)]
pub enum OfferError {
    /// Weight band is empty or inverted.
    #[error("offer {0}: minimum weight must be lower than maximum weight")]
    InvalidWeightRange(String),

    /// Base cost is zero or negative.
    #[error("offer {0}: base cost must be greater than zero")]
    NonPositiveBaseCost(String),

    /// Zone-cubic offer without a primary zone.
    #[error("offer {0}: zone name is required")]
    MissingZoneName(String),

    /// Cubic rate is zero or negative.
    #[error("offer {0}: cubic rate must be greater than zero")]
    NonPositiveCubicRate(String),

    /// Minimum charge is zero or negative.
    #[error("offer {0}: minimum charge must be greater than zero")]
    NonPositiveMinCharge(String),

    /// Offer applies to no zones.
    #[error("offer {0}: at least one zone is required")]
    NoZones(String),
}

/// Discriminant of [`Offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferType {
    /// Weight-banded offer
    Weight,

    /// Per-zone cubic offer
    ZoneCubic,
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferType::Weight => f.write_str("weight"),
            OfferType::ZoneCubic => f.write_str("zoneCubic"),
        }
    }
}

/// A carrier pricing rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Offer {
    /// Weight-banded rule
    Weight(WeightOffer),

    /// Volume-priced rule for a single zone
    ZoneCubic(ZoneCubicOffer),
}

impl Offer {
    /// External identifier
    pub fn id(&self) -> &str {
        match self {
            Offer::Weight(offer) => &offer.id,
            Offer::ZoneCubic(offer) => &offer.id,
        }
    }

    /// Carrier publishing the offer
    pub fn carrier(&self) -> CarrierKey {
        match self {
            Offer::Weight(offer) => offer.carrier,
            Offer::ZoneCubic(offer) => offer.carrier,
        }
    }

    /// Offer discriminant
    pub fn offer_type(&self) -> OfferType {
        match self {
            Offer::Weight(_) => OfferType::Weight,
            Offer::ZoneCubic(_) => OfferType::ZoneCubic,
        }
    }

    /// Zones the offer declares it serves.
    ///
    /// For zone-cubic offers this is the secondary `zone_names` set, not the primary `zone_name`.
    pub fn zone_names(&self) -> &ZoneList {
        match self {
            Offer::Weight(offer) => &offer.zone_names,
            Offer::ZoneCubic(offer) => &offer.zone_names,
        }
    }

    /// Zones the offer declares it serves, mutably.
    pub fn zone_names_mut(&mut self) -> &mut ZoneList {
        match self {
            Offer::Weight(offer) => &mut offer.zone_names,
            Offer::ZoneCubic(offer) => &mut offer.zone_names,
        }
    }

    /// Returns true if the zone is in the offer's declared zone set.
    pub fn serves_zone(&self, zone: &Zone) -> bool {
        self.zone_names().contains(zone)
    }

    /// Checks the invariants an offer must satisfy before entering a catalog.
    ///
    /// # Errors
    ///
    /// Returns an [`OfferError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), OfferError> {
        match self {
            Offer::Weight(offer) => offer.validate(),
            Offer::ZoneCubic(offer) => offer.validate(),
        }
    }
}

impl From<WeightOffer> for Offer {
    fn from(offer: WeightOffer) -> Self {
        Offer::Weight(offer)
    }
}

impl From<ZoneCubicOffer> for Offer {
    fn from(offer: ZoneCubicOffer) -> Self {
        Offer::ZoneCubic(offer)
    }
}
