//! Postal Codes

use crate::zones::Zone;

/// A deliverable area identified by a postal code.
///
/// Codes are not unique: one code may cover several areas, each in its own zone.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalCode {
    /// External identifier
    pub id: String,

    /// Postal code, e.g. `10431`
    pub code: String,

    /// County
    pub county: String,

    /// City
    pub city: String,

    /// Area within the city, used to tell apart areas sharing a code
    pub area: String,

    /// Zone the area belongs to
    pub zone: Zone,

    /// Optional free-form zone category
    pub zone_category: Option<String>,

    /// Whether the area is intrinsically remote, regardless of carrier
    pub is_remote: bool,
}

impl PostalCode {
    /// Creates a non-remote postal code with empty county and city.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        area: impl Into<String>,
        zone: impl Into<Zone>,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            county: String::new(),
            city: String::new(),
            area: area.into(),
            zone: zone.into(),
            zone_category: None,
            is_remote: false,
        }
    }

    /// Sets county and city.
    #[must_use]
    pub fn located_in(mut self, county: impl Into<String>, city: impl Into<String>) -> Self {
        self.county = county.into();
        self.city = city.into();
        self
    }

    /// Marks the area as remote.
    #[must_use]
    pub fn remote(mut self) -> Self {
        self.is_remote = true;
        self
    }
}

/// Where a shipment is headed: a postal code and, when the code is shared, the area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Destination postal code
    pub postal_code: String,

    /// Area to pick when several areas share the code
    pub area: Option<String>,
}

impl Destination {
    /// Creates a destination without an area.
    pub fn new(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
            area: None,
        }
    }

    /// Narrows the destination to one area.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Returns true if the postal code entry describes this destination.
    ///
    /// The code must match exactly; the area only has to match when one was requested.
    pub fn matches(&self, postal_code: &PostalCode) -> bool {
        postal_code.code == self.postal_code
            && self
                .area
                .as_deref()
                .is_none_or(|area| postal_code.area == area)
    }
}
