//! Results
//!
//! Priced per-carrier results and the ranked quote they form.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    carriers::CarrierKey,
    offers::OfferType,
    packages::PackageDetails,
    policy::PricingPolicy,
    postal_codes::Destination,
    pricing::{PricingError, to_money},
    rates::{RateBasis, RateRequest, RateSelection},
    zones::Zone,
};

/// Priced result for one carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    /// Catalog key of the carrier
    pub carrier_key: CarrierKey,

    /// External carrier identifier
    pub carrier_id: String,

    /// Carrier display name
    pub carrier_name: String,

    /// Winning offer identifier
    pub offer_id: String,

    /// Winning offer type
    pub offer_type: OfferType,

    /// Destination zone
    pub zone_name: Zone,

    /// Delivery time, for zone-cubic winners that declare one
    pub delivery_time: Option<String>,

    /// Per-shipment cost before VAT
    pub cost: Decimal,

    /// Per-shipment cost with VAT
    pub cost_with_vat: Decimal,

    /// Suggested resale price, marked up from the pre-VAT unit cost
    pub suggested_price: Decimal,

    /// Declared shipment weight (kg), zero when unknown
    pub actual_weight: Decimal,

    /// Volumetric weight equivalent of the shipment volume (kg), `None` if it overflows
    pub volumetric_weight: Option<Decimal>,

    /// Declared shipment volume (m³), zero when unknown
    pub volume: Decimal,

    /// Volume billed by a zone-cubic winner (m³)
    pub charged_volume: Option<Decimal>,

    /// Quantity the winning cost was computed from
    pub basis: RateBasis,

    /// Number of packages shipped
    pub packages: u32,

    /// `cost` times `packages`
    pub total_cost: Decimal,

    /// `total_cost` with VAT
    pub total_cost_with_vat: Decimal,

    /// Cash on delivery is available at the destination
    pub allows_cash_on_delivery: bool,

    /// The destination is remote for this carrier
    pub is_remote: bool,

    /// Cheapest result of its quote
    pub is_optimal: bool,
}

impl CalculationResult {
    /// Builds the result for a carrier's winning offer.
    ///
    /// Returns `None` if a cost derived from the winning offer overflows.
    pub fn new(request: &RateRequest<'_>, selection: &RateSelection<'_>) -> Option<Self> {
        let RateRequest {
            carrier_key,
            carrier,
            details,
            zone,
            terms,
            policy,
        } = *request;

        let cost = selection.unit_cost;
        let total_cost = cost.checked_mul(Decimal::from(details.packages()))?;

        Some(Self {
            carrier_key,
            carrier_id: carrier.id.clone(),
            carrier_name: carrier.name.clone(),
            offer_id: selection.offer.id().to_string(),
            offer_type: selection.offer_type(),
            zone_name: zone.clone(),
            delivery_time: selection
                .delivery_time()
                .filter(|time| !time.is_empty())
                .map(String::from),
            cost,
            cost_with_vat: policy.vat_inclusive(cost)?,
            suggested_price: policy.with_markup(cost)?,
            actual_weight: details.actual_weight(),
            volumetric_weight: policy.volumetric_weight(details.total_volume()),
            volume: details.total_volume(),
            charged_volume: selection.charged_volume,
            basis: selection.basis,
            packages: details.packages(),
            total_cost,
            total_cost_with_vat: policy.vat_inclusive(total_cost)?,
            allows_cash_on_delivery: terms.allows_cash_on_delivery,
            is_remote: terms.is_remote,
            is_optimal: false,
        })
    }

    /// Resale price shown alongside the VAT-inclusive total.
    ///
    /// This marks up `total_cost_with_vat`, unlike [`CalculationResult::suggested_price`] which
    /// marks up the pre-VAT unit cost. The two are not expected to agree.
    pub fn display_suggested_price(&self, policy: &PricingPolicy) -> Option<Decimal> {
        policy.with_markup(self.total_cost_with_vat)
    }

    /// Total cost with VAT, as money.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::AmountNotRepresentable`] if the amount overflows minor units.
    pub fn total_with_vat_money(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        to_money(self.total_cost_with_vat, currency)
    }
}

/// Sorts results ascending by total cost and flags the first as optimal.
///
/// The sort is stable, so equally priced results keep their input order.
pub fn rank(mut results: Vec<CalculationResult>) -> Vec<CalculationResult> {
    results.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));

    for (index, result) in results.iter_mut().enumerate() {
        result.is_optimal = index == 0;
    }

    results
}

/// Ranked results for one shipment and destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    destination: Destination,
    details: PackageDetails,
    zone: Option<Zone>,
    results: Vec<CalculationResult>,
}

impl Quote {
    /// Ranks `results` into a quote.
    pub fn new(
        destination: Destination,
        details: PackageDetails,
        zone: Option<Zone>,
        results: Vec<CalculationResult>,
    ) -> Self {
        Self {
            destination,
            details,
            zone,
            results: rank(results),
        }
    }

    /// A quote with no results, e.g. for an unresolvable destination.
    pub fn empty(destination: Destination, details: PackageDetails) -> Self {
        Self::new(destination, details, None, Vec::new())
    }

    /// Destination the quote was requested for
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Normalized shipment
    pub fn details(&self) -> &PackageDetails {
        &self.details
    }

    /// Zone the destination resolved to, if it resolved at all
    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    /// Results, cheapest first
    pub fn results(&self) -> &[CalculationResult] {
        &self.results
    }

    /// The cheapest result, if any carrier quoted.
    pub fn optimal(&self) -> Option<&CalculationResult> {
        self.results.first()
    }

    /// Returns true if no carrier quoted.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of carriers that quoted.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Iterates results, cheapest first.
    pub fn iter(&self) -> std::slice::Iter<'_, CalculationResult> {
        self.results.iter()
    }

    /// Consumes the quote, returning its ranked results.
    pub fn into_results(self) -> Vec<CalculationResult> {
        self.results
    }
}

impl<'a> IntoIterator for &'a Quote {
    type Item = &'a CalculationResult;
    type IntoIter = std::slice::Iter<'a, CalculationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
