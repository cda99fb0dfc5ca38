//! Carriers

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use slotmap::new_key_type;
use thiserror::Error;

use crate::zones::{Zone, ZoneList, zone_list};

new_key_type! {
    /// Carrier Key
    pub struct CarrierKey;
}

/// Errors raised when a carrier violates an entry invariant.
#[derive(Debug, Error, PartialEq)]
pub enum CarrierError {
    /// The carrier has no name.
    #[error("carrier {0} has no name")]
    MissingName(String),

    /// The carrier supports neither weight nor cubic offers.
    #[error("carrier {0} must offer rates by weight, by cubic volume, or both")]
    NoOfferTypes(String),
}

/// Physical limits a carrier accepts for a single shipment.
///
/// Lengths are in centimetres, weight in kilograms and volume in cubic metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarrierLimits {
    /// Longest accepted package length
    pub max_length: Decimal,

    /// Widest accepted package width
    pub max_width: Decimal,

    /// Tallest accepted package height
    pub max_height: Decimal,

    /// Heaviest accepted shipment
    pub max_weight: Decimal,

    /// Largest accepted shipment volume.
    ///
    /// Zero means the carrier sets no cubic cap and bills bulky shipments by volumetric weight instead.
    pub max_cubic: Decimal,
}

impl CarrierLimits {
    /// Returns true if the carrier rejects shipments above a cubic volume.
    pub fn has_cubic_cap(&self) -> bool {
        self.max_cubic > Decimal::ZERO
    }
}

/// The postal code lists each carrier maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostalCodeList {
    /// Codes the carrier delivers to
    Serviced,

    /// Codes that incur the carrier's remote-area surcharge
    Remote,

    /// Codes where cash on delivery is unavailable
    NoCashOnDelivery,
}

/// A carrier and the rules that decide where and what it ships.
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    /// External identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Physical limits
    pub limits: CarrierLimits,

    /// Whether weight-banded offers apply to this carrier
    pub offers_by_weight: bool,

    /// Whether zone-cubic offers apply to this carrier
    pub offers_by_cubic: bool,

    /// Whitelist of postal codes the carrier delivers to
    pub serviced_postal_codes: FxHashSet<String>,

    /// Postal codes that are remote for this carrier
    pub remote_postal_codes: FxHashSet<String>,

    /// Postal codes where cash on delivery is disabled
    pub no_cash_on_delivery_postal_codes: FxHashSet<String>,

    /// Declared zone coverage
    pub service_zones: ZoneList,
}

impl Carrier {
    /// Creates a carrier with the given limits, no offer types and empty code lists.
    pub fn new(id: impl Into<String>, name: impl Into<String>, limits: CarrierLimits) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            limits,
            offers_by_weight: false,
            offers_by_cubic: false,
            serviced_postal_codes: FxHashSet::default(),
            remote_postal_codes: FxHashSet::default(),
            no_cash_on_delivery_postal_codes: FxHashSet::default(),
            service_zones: ZoneList::new(),
        }
    }

    /// Enables weight-banded offers.
    #[must_use]
    pub fn by_weight(mut self) -> Self {
        self.offers_by_weight = true;
        self
    }

    /// Enables zone-cubic offers.
    #[must_use]
    pub fn by_cubic(mut self) -> Self {
        self.offers_by_cubic = true;
        self
    }

    /// Replaces one of the carrier's postal code lists.
    #[must_use]
    pub fn with_postal_codes<I, S>(mut self, list: PostalCodeList, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.postal_codes_mut(list) = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the declared service zones.
    #[must_use]
    pub fn with_service_zones<I, Z>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = Z>,
        Z: Into<Zone>,
    {
        self.service_zones = zone_list(zones);
        self
    }

    /// Returns one of the carrier's postal code lists.
    pub fn postal_codes(&self, list: PostalCodeList) -> &FxHashSet<String> {
        match list {
            PostalCodeList::Serviced => &self.serviced_postal_codes,
            PostalCodeList::Remote => &self.remote_postal_codes,
            PostalCodeList::NoCashOnDelivery => &self.no_cash_on_delivery_postal_codes,
        }
    }

    /// Returns one of the carrier's postal code lists, mutably.
    pub fn postal_codes_mut(&mut self, list: PostalCodeList) -> &mut FxHashSet<String> {
        match list {
            PostalCodeList::Serviced => &mut self.serviced_postal_codes,
            PostalCodeList::Remote => &mut self.remote_postal_codes,
            PostalCodeList::NoCashOnDelivery => &mut self.no_cash_on_delivery_postal_codes,
        }
    }

    /// Returns true if the carrier delivers to the postal code.
    pub fn services(&self, code: &str) -> bool {
        self.serviced_postal_codes.contains(code)
    }

    /// Returns true if the carrier lists the postal code as remote.
    pub fn lists_as_remote(&self, code: &str) -> bool {
        self.remote_postal_codes.contains(code)
    }

    /// Returns true unless the carrier disables cash on delivery for the postal code.
    pub fn allows_cash_on_delivery(&self, code: &str) -> bool {
        !self.no_cash_on_delivery_postal_codes.contains(code)
    }

    /// Checks the invariants a carrier must satisfy before entering a catalog.
    ///
    /// # Errors
    ///
    /// - [`CarrierError::MissingName`]: the name is blank.
    /// - [`CarrierError::NoOfferTypes`]: neither offer type is enabled.
    pub fn validate(&self) -> Result<(), CarrierError> {
        if self.name.trim().is_empty() {
            return Err(CarrierError::MissingName(self.id.clone()));
        }

        if !self.offers_by_weight && !self.offers_by_cubic {
            return Err(CarrierError::NoOfferTypes(self.id.clone()));
        }

        Ok(())
    }
}
