//! Eligibility
//!
//! Decides whether a carrier may carry a shipment to a destination, and on which terms.

use std::fmt;

use rust_decimal::Decimal;

use crate::{carriers::Carrier, packages::PackageDetails, postal_codes::PostalCode};

/// Why a carrier cannot take a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// Shipment heavier than the carrier's maximum weight.
    Weight {
        /// Shipment weight (kg)
        weight: Decimal,

        /// Carrier maximum (kg)
        max: Decimal,
    },

    /// Longest package exceeds the carrier's maximum length.
    Length {
        /// Package length (cm)
        length: Decimal,

        /// Carrier maximum (cm)
        max: Decimal,
    },

    /// Widest package exceeds the carrier's maximum width.
    Width {
        /// Package width (cm)
        width: Decimal,

        /// Carrier maximum (cm)
        max: Decimal,
    },

    /// Tallest package exceeds the carrier's maximum height.
    Height {
        /// Package height (cm)
        height: Decimal,

        /// Carrier maximum (cm)
        max: Decimal,
    },

    /// Shipment volume exceeds the carrier's cubic cap.
    Cubic {
        /// Shipment volume (m³)
        volume: Decimal,

        /// Carrier maximum (m³)
        max: Decimal,
    },

    /// The carrier does not deliver to the postal code.
    NotServiced,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::Weight { weight, max } => {
                write!(f, "weight {weight}kg exceeds limit of {max}kg")
            }
            IneligibleReason::Length { length, max } => {
                write!(f, "length {length}cm exceeds limit of {max}cm")
            }
            IneligibleReason::Width { width, max } => {
                write!(f, "width {width}cm exceeds limit of {max}cm")
            }
            IneligibleReason::Height { height, max } => {
                write!(f, "height {height}cm exceeds limit of {max}cm")
            }
            IneligibleReason::Cubic { volume, max } => {
                write!(f, "volume {volume}m³ exceeds limit of {max}m³")
            }
            IneligibleReason::NotServiced => f.write_str("postal code not serviced"),
        }
    }
}

/// Terms under which an eligible carrier delivers to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceTerms {
    /// The destination is remote, either for this carrier or intrinsically.
    pub is_remote: bool,

    /// Cash on delivery is available at the destination.
    pub allows_cash_on_delivery: bool,
}

/// Outcome of the eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The carrier can take the shipment.
    Eligible(ServiceTerms),

    /// The carrier cannot take the shipment.
    Ineligible(IneligibleReason),
}

impl Eligibility {
    /// Returns the service terms if the carrier is eligible.
    pub fn terms(&self) -> Option<ServiceTerms> {
        match self {
            Eligibility::Eligible(terms) => Some(*terms),
            Eligibility::Ineligible(_) => None,
        }
    }

    /// Returns true if the carrier is eligible.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible(_))
    }
}

/// Checks a carrier's physical limits and postal coverage against a shipment.
///
/// Checks run in order: weight, linear dimensions, cubic cap, postal code whitelist. Unknown
/// weight, volume or dimensions never cause a rejection. A carrier whose `max_cubic` is zero has
/// no cubic cap.
pub fn check_eligibility(
    carrier: &Carrier,
    details: &PackageDetails,
    postal_code: &PostalCode,
) -> Eligibility {
    match limit_violation(carrier, details) {
        Some(reason) => Eligibility::Ineligible(reason),
        None if !carrier.services(&postal_code.code) => {
            Eligibility::Ineligible(IneligibleReason::NotServiced)
        }
        None => Eligibility::Eligible(ServiceTerms {
            is_remote: carrier.lists_as_remote(&postal_code.code) || postal_code.is_remote,
            allows_cash_on_delivery: carrier.allows_cash_on_delivery(&postal_code.code),
        }),
    }
}

fn limit_violation(carrier: &Carrier, details: &PackageDetails) -> Option<IneligibleReason> {
    let limits = &carrier.limits;

    if let Some(weight) = details.weight()
        && weight > limits.max_weight
    {
        return Some(IneligibleReason::Weight {
            weight,
            max: limits.max_weight,
        });
    }

    if let Some(dimensions) = details.dimensions() {
        if dimensions.length > limits.max_length {
            return Some(IneligibleReason::Length {
                length: dimensions.length,
                max: limits.max_length,
            });
        }

        if dimensions.width > limits.max_width {
            return Some(IneligibleReason::Width {
                width: dimensions.width,
                max: limits.max_width,
            });
        }

        if dimensions.height > limits.max_height {
            return Some(IneligibleReason::Height {
                height: dimensions.height,
                max: limits.max_height,
            });
        }
    }

    if limits.has_cubic_cap()
        && let Some(volume) = details.volume()
        && volume > limits.max_cubic
    {
        return Some(IneligibleReason::Cubic {
            volume,
            max: limits.max_cubic,
        });
    }

    None
}
