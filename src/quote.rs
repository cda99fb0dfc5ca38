//! Quote
//!
//! Threads a shipment through normalization, eligibility, rate selection and ranking.

use smallvec::SmallVec;
use tracing::{debug, info, instrument, warn};

use crate::{
    carriers::{Carrier, CarrierKey},
    catalog::Catalog,
    eligibility::{Eligibility, check_eligibility},
    offers::Offer,
    packages::{PackageDetails, PackageError, PackageInput},
    policy::PricingPolicy,
    postal_codes::{Destination, PostalCode},
    rates::{RateRequest, select_rate},
    results::{CalculationResult, Quote},
};

/// Quotes shipments against a catalog snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Quoter<'c> {
    catalog: &'c Catalog,
    policy: PricingPolicy,
}

impl<'c> Quoter<'c> {
    /// Creates a quoter using the default pricing policy.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_policy(catalog, PricingPolicy::default())
    }

    /// Creates a quoter using the given pricing policy.
    pub fn with_policy(catalog: &'c Catalog, policy: PricingPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Catalog being quoted against
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Pricing policy in effect
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Normalizes the shipment and quotes it for a destination.
    ///
    /// # Errors
    ///
    /// Returns a [`PackageError`] if the shipment description is incomplete or invalid.
    #[instrument(skip(self, input, destination), fields(postal_code = %destination.postal_code, area = ?destination.area))]
    pub fn quote(
        &self,
        input: &PackageInput,
        destination: &Destination,
    ) -> Result<Quote, PackageError> {
        let details = input.normalize()?;

        Ok(self.quote_details(details, destination))
    }

    /// Quotes already-normalized package details for a destination.
    ///
    /// An unresolvable destination yields an empty quote. Carriers that are ineligible or have no
    /// applicable offer are left out.
    pub fn quote_details(&self, details: PackageDetails, destination: &Destination) -> Quote {
        let Some(postal_code) = self.catalog.resolve(destination) else {
            warn!(
                postal_code = %destination.postal_code,
                area = ?destination.area,
                "destination does not resolve to a known postal code"
            );

            return Quote::empty(destination.clone(), details);
        };

        let results: Vec<CalculationResult> = self
            .catalog
            .carriers()
            .filter_map(|(key, carrier)| self.quote_carrier(key, carrier, &details, postal_code))
            .collect();

        let quote = Quote::new(
            destination.clone(),
            details,
            Some(postal_code.zone.clone()),
            results,
        );

        info!(
            zone = %postal_code.zone,
            carriers = quote.len(),
            optimal = quote.optimal().map(|r| r.carrier_name.as_str()),
            total = ?quote.optimal().map(|r| r.total_cost),
            "quoted shipment"
        );

        quote
    }

    fn quote_carrier(
        &self,
        carrier_key: CarrierKey,
        carrier: &Carrier,
        details: &PackageDetails,
        postal_code: &PostalCode,
    ) -> Option<CalculationResult> {
        let terms = match check_eligibility(carrier, details, postal_code) {
            Eligibility::Eligible(terms) => terms,
            Eligibility::Ineligible(reason) => {
                debug!(carrier = %carrier.name, %reason, "carrier ineligible");

                return None;
            }
        };

        let request = RateRequest {
            carrier_key,
            carrier,
            details,
            zone: &postal_code.zone,
            terms,
            policy: &self.policy,
        };

        let offers: SmallVec<[&Offer; 8]> = self.catalog.offers_for(carrier_key).collect();

        let Some(selection) = select_rate(&request, offers.iter().copied()) else {
            debug!(
                carrier = %carrier.name,
                offers = offers.len(),
                zone = %postal_code.zone,
                "no applicable offer"
            );

            return None;
        };

        let result = CalculationResult::new(&request, &selection);

        if result.is_none() {
            debug!(
                carrier = %carrier.name,
                offer = selection.offer.id(),
                unit_cost = %selection.unit_cost,
                "result totals overflow"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        carriers::{CarrierLimits, PostalCodeList},
        offers::{OfferType, WeightOffer, ZoneCubicOffer},
    };

    use super::*;

    fn limits(max_weight: i64, max_cubic: Decimal) -> CarrierLimits {
        CarrierLimits {
            max_length: Decimal::from(120),
            max_width: Decimal::from(120),
            max_height: Decimal::from(80),
            max_weight: Decimal::from(max_weight),
            max_cubic,
        }
    }

    fn catalog() -> Result<Catalog, Box<dyn std::error::Error>> {
        let mut catalog = Catalog::new();
        catalog.add_zone("ΑΘΗΝΑ")?;
        catalog.insert_postal_code(PostalCode::new("1", "10431", "Κυψέλη", "ΑΘΗΝΑ"))?;

        let mytrans = catalog.insert_carrier(
            Carrier::new("1", "MYTRANS", limits(30, Decimal::new(5, 1)))
                .by_weight()
                .with_postal_codes(PostalCodeList::Serviced, ["10431"]),
        )?;

        let speedex = catalog.insert_carrier(
            Carrier::new("2", "SPEEDEX", limits(50, Decimal::ZERO))
                .by_weight()
                .by_cubic()
                .with_postal_codes(PostalCodeList::Serviced, ["10431"]),
        )?;

        catalog.insert_offer(
            WeightOffer::new(
                "1",
                mytrans,
                Decimal::ZERO,
                Decimal::from(15),
                Decimal::from(5),
                ["ΑΘΗΝΑ"],
            )
            .with_extra_cost_remote(Decimal::from(2)),
        )?;

        catalog.insert_offer(
            ZoneCubicOffer::new("3", speedex, "ΑΘΗΝΑ", Decimal::from(7), Decimal::from(300))
                .with_min_cubic_volume(Decimal::new(12, 2)),
        )?;

        Ok(catalog)
    }

    #[test]
    fn quote_ranks_carriers_by_total_cost() -> TestResult {
        let catalog = catalog()?;
        let quoter = Quoter::new(&catalog);

        let input = PackageInput::aggregate(Some(Decimal::from(10)), Some(Decimal::new(5, 2)), 1);
        let quote = quoter.quote(&input, &Destination::new("10431"))?;

        let carriers: Vec<_> = quote.iter().map(|r| r.carrier_name.as_str()).collect();

        assert_eq!(carriers, ["MYTRANS", "SPEEDEX"]);
        assert_eq!(quote.optimal().map(|r| r.cost), Some(Decimal::from(5)));
        assert_eq!(
            quote.results().get(1).map(|r| r.offer_type),
            Some(OfferType::ZoneCubic)
        );
        assert_eq!(quote.zone().map(|z| z.as_str()), Some("ΑΘΗΝΑ"));

        Ok(())
    }

    #[test]
    fn incomplete_input_is_rejected_before_quoting() -> TestResult {
        let catalog = catalog()?;
        let quoter = Quoter::new(&catalog);

        let input = PackageInput::aggregate(None, None, 1);

        assert_eq!(
            quoter.quote(&input, &Destination::new("10431")),
            Err(PackageError::MissingWeightAndVolume)
        );

        Ok(())
    }

    #[test]
    fn unresolvable_destination_yields_an_empty_quote() -> TestResult {
        let catalog = catalog()?;
        let quoter = Quoter::new(&catalog);

        let details = PackageDetails::new(Some(Decimal::from(10)), None);
        let quote = quoter.quote_details(details, &Destination::new("99999"));

        assert!(quote.is_empty());
        assert_eq!(quote.zone(), None);
        assert_eq!(quote.details(), &details);

        Ok(())
    }

    #[test]
    fn ineligible_carriers_are_left_out() -> TestResult {
        let catalog = catalog()?;
        let quoter = Quoter::new(&catalog);

        // too heavy for MYTRANS, and SPEEDEX has no weight offer and no volume to price on
        let details = PackageDetails::new(Some(Decimal::from(40)), None);
        let quote = quoter.quote_details(details, &Destination::new("10431"));

        assert!(quote.is_empty());

        Ok(())
    }

    #[test]
    fn oversized_shipment_yields_an_empty_quote() -> TestResult {
        let catalog = catalog()?;
        let quoter = Quoter::new(&catalog);

        // MYTRANS rejects the volume, SPEEDEX cannot price it without overflowing
        let volume = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let quote = quoter.quote_details(
            PackageDetails::new(None, Some(volume)),
            &Destination::new("10431"),
        );

        assert!(quote.is_empty());

        Ok(())
    }

    #[test]
    fn policy_drives_vat() -> TestResult {
        let catalog = catalog()?;
        let policy = PricingPolicy {
            vat: decimal_percentage::Percentage::from(Decimal::new(13, 2)),
            ..PricingPolicy::default()
        };
        let quoter = Quoter::with_policy(&catalog, policy);

        let details = PackageDetails::new(Some(Decimal::from(10)), None);
        let quote = quoter.quote_details(details, &Destination::new("10431"));

        assert_eq!(
            quote.optimal().map(|r| r.cost_with_vat),
            Some(Decimal::new(565, 2))
        );
        assert_eq!(quoter.policy(), &policy);

        Ok(())
    }
}
