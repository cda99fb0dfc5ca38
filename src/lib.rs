//! Shipquote
//!
//! Shipquote is a shipping-cost quoting engine: given a shipment and a destination postal code it
//! works out which carriers can take the shipment, prices it from each carrier's offers and ranks
//! the results, cheapest first.

pub mod carriers;
pub mod catalog;
pub mod eligibility;
pub mod fixtures;
pub mod offers;
pub mod packages;
pub mod policy;
pub mod postal_codes;
pub mod prelude;
pub mod pricing;
pub mod quote;
pub mod rates;
pub mod report;
pub mod results;
pub mod utils;
pub mod zones;
