//! Shipquote prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    carriers::{Carrier, CarrierError, CarrierKey, CarrierLimits, PostalCodeList},
    catalog::{Catalog, CatalogError, ZoneError, ZoneReindex},
    eligibility::{Eligibility, IneligibleReason, ServiceTerms, check_eligibility},
    fixtures::{Fixture, FixtureError},
    offers::{CubicCharge, Offer, OfferError, OfferKey, OfferType, WeightOffer, ZoneCubicOffer},
    packages::{Dimensions, PackageDetails, PackageDimensions, PackageError, PackageInput},
    policy::PricingPolicy,
    postal_codes::{Destination, PostalCode},
    pricing::{PricingError, to_money},
    quote::Quoter,
    rates::{RateBasis, RateRequest, RateSelection, select_rate},
    report::{QuoteReport, ReportError},
    results::{CalculationResult, Quote, rank},
    zones::{Zone, ZoneList},
};
