//! Zone reindex
//!
//! Adding, renaming and deleting zones across every entity that refers to them.

use thiserror::Error;
use tracing::info;

use crate::{
    catalog::Catalog,
    offers::Offer,
    zones::{Zone, remove_from, rename_in},
};

/// Errors raised while maintaining the zone list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    /// Zone names must not be blank.
    #[error("zone name is blank")]
    Blank,

    /// The zone is not in the catalog.
    #[error("zone {0} not found")]
    NotFound(Zone),

    /// A zone with the same name already exists.
    #[error("zone {0} already exists")]
    AlreadyExists(Zone),
}

/// Counts of entities touched by a rename or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneReindex {
    /// Postal code entries whose zone changed
    pub postal_codes: usize,

    /// Carriers whose service zones changed
    pub carriers: usize,

    /// Offers whose zones changed
    pub offers: usize,

    /// Offers deleted because they no longer serve any zone
    pub removed_offers: usize,
}

impl Catalog {
    /// All zones, in insertion order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Returns true if the zone exists.
    pub fn has_zone(&self, zone: &Zone) -> bool {
        self.zones.contains(zone)
    }

    /// Adds a zone.
    ///
    /// # Errors
    ///
    /// - [`ZoneError::Blank`]: the name is blank.
    /// - [`ZoneError::AlreadyExists`]: the zone exists.
    pub fn add_zone(&mut self, zone: impl Into<Zone>) -> Result<(), ZoneError> {
        let zone = zone.into();

        if zone.is_blank() {
            return Err(ZoneError::Blank);
        }

        if self.has_zone(&zone) {
            return Err(ZoneError::AlreadyExists(zone));
        }

        self.zones.push(zone);

        Ok(())
    }

    /// Number of carriers and offers referring to a zone.
    ///
    /// Zone-cubic offers count by their primary zone only.
    pub fn zone_usage(&self, zone: &Zone) -> usize {
        let carriers = self
            .carriers
            .values()
            .filter(|carrier| carrier.service_zones.contains(zone))
            .count();

        let offers = self
            .offers
            .values()
            .filter(|offer| match offer {
                Offer::Weight(weight) => weight.applies_to(zone),
                Offer::ZoneCubic(cubic) => cubic.prices_zone(zone),
            })
            .count();

        carriers + offers
    }

    /// Renames a zone everywhere it appears.
    ///
    /// Postal codes, carrier service zones, offer zone sets and zone-cubic primary zones are all
    /// rewritten. Renaming a zone to itself changes nothing.
    ///
    /// # Errors
    ///
    /// - [`ZoneError::Blank`]: the new name is blank.
    /// - [`ZoneError::NotFound`]: `old` does not exist.
    /// - [`ZoneError::AlreadyExists`]: `new` already exists.
    pub fn rename_zone(
        &mut self,
        old: &Zone,
        new: impl Into<Zone>,
    ) -> Result<ZoneReindex, ZoneError> {
        let new = new.into();

        if new.is_blank() {
            return Err(ZoneError::Blank);
        }

        let Some(position) = self.zones.iter().position(|zone| zone == old) else {
            return Err(ZoneError::NotFound(old.clone()));
        };

        if *old == new {
            return Ok(ZoneReindex::default());
        }

        if self.has_zone(&new) {
            return Err(ZoneError::AlreadyExists(new));
        }

        let mut reindex = ZoneReindex::default();

        for postal_code in &mut self.postal_codes {
            if postal_code.zone == *old {
                postal_code.zone = new.clone();
                reindex.postal_codes += 1;
            }
        }

        for carrier in self.carriers.values_mut() {
            if rename_in(&mut carrier.service_zones, old, &new) {
                reindex.carriers += 1;
            }
        }

        for offer in self.offers.values_mut() {
            let mut changed = rename_in(offer.zone_names_mut(), old, &new);

            if let Offer::ZoneCubic(cubic) = offer
                && cubic.zone_name == *old
            {
                cubic.zone_name = new.clone();
                changed = true;
            }

            if changed {
                reindex.offers += 1;
            }
        }

        info!(%old, %new, ?reindex, "renamed zone");

        if let Some(slot) = self.zones.get_mut(position) {
            *slot = new;
        }

        Ok(reindex)
    }

    /// Deletes a zone everywhere it appears.
    ///
    /// Weight offers left without zones are deleted, as are zone-cubic offers priced for the
    /// deleted zone. Postal codes keep their zone and simply stop matching any offer.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::NotFound`] if the zone does not exist.
    pub fn delete_zone(&mut self, zone: &Zone) -> Result<ZoneReindex, ZoneError> {
        let Some(position) = self.zones.iter().position(|z| z == zone) else {
            return Err(ZoneError::NotFound(zone.clone()));
        };

        let mut reindex = ZoneReindex::default();

        for carrier in self.carriers.values_mut() {
            if remove_from(&mut carrier.service_zones, zone) {
                reindex.carriers += 1;
            }
        }

        let offer_ids = &mut self.offer_ids;
        self.offers.retain(|_, offer| {
            let keep = match offer {
                Offer::Weight(weight) => {
                    if remove_from(&mut weight.zone_names, zone) {
                        reindex.offers += 1;
                    }

                    !weight.zone_names.is_empty()
                }
                Offer::ZoneCubic(cubic) => {
                    if remove_from(&mut cubic.zone_names, zone) {
                        reindex.offers += 1;
                    }

                    cubic.zone_name != *zone
                }
            };

            if !keep {
                reindex.removed_offers += 1;
                offer_ids.remove(offer.id());
            }

            keep
        });
        self.prune_offer_order();

        self.zones.remove(position);

        info!(%zone, ?reindex, "deleted zone");

        Ok(reindex)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        carriers::{Carrier, CarrierKey, CarrierLimits},
        offers::{WeightOffer, ZoneCubicOffer},
        postal_codes::PostalCode,
    };

    use super::*;

    fn band(id: &str, carrier: CarrierKey, zones: &[&str]) -> WeightOffer {
        WeightOffer::new(
            id,
            carrier,
            Decimal::ZERO,
            Decimal::from(15),
            Decimal::from(5),
            zones.iter().copied(),
        )
    }

    fn cubic(id: &str, carrier: CarrierKey, zone: &str) -> ZoneCubicOffer {
        ZoneCubicOffer::new(id, carrier, zone, Decimal::from(7), Decimal::from(300))
    }

    fn catalog() -> Result<(Catalog, CarrierKey), Box<dyn std::error::Error>> {
        let mut catalog = Catalog::new();

        for zone in ["ΑΘΗΝΑ", "ΝΗΣΙΑ", "ΘΕΣΣΑΛΟΝΙΚΗ"] {
            catalog.add_zone(zone)?;
        }

        let key = catalog.insert_carrier(
            Carrier::new("1", "MYTRANS", CarrierLimits::default())
                .by_weight()
                .by_cubic()
                .with_service_zones(["ΑΘΗΝΑ", "ΝΗΣΙΑ"]),
        )?;

        catalog.insert_postal_code(PostalCode::new("1", "10431", "Κυψέλη", "ΑΘΗΝΑ"))?;
        catalog.insert_postal_code(PostalCode::new("4", "74100", "Κέντρο", "ΝΗΣΙΑ"))?;

        catalog.insert_offer(band("1", key, &["ΑΘΗΝΑ"]))?;
        catalog.insert_offer(band("2", key, &["ΑΘΗΝΑ", "ΝΗΣΙΑ"]))?;
        catalog.insert_offer(cubic("3", key, "ΑΘΗΝΑ"))?;
        catalog.insert_offer(cubic("4", key, "ΝΗΣΙΑ"))?;

        Ok((catalog, key))
    }

    #[test]
    fn add_zone_rejects_duplicates_and_blanks() -> TestResult {
        let (mut catalog, _) = catalog()?;

        assert_eq!(
            catalog.add_zone("ΑΘΗΝΑ"),
            Err(ZoneError::AlreadyExists(Zone::from("ΑΘΗΝΑ")))
        );
        assert_eq!(catalog.add_zone("   "), Err(ZoneError::Blank));

        catalog.add_zone("ΝΗΣΙΑ 2")?;

        assert_eq!(catalog.zones().len(), 4);

        Ok(())
    }

    #[test]
    fn rename_rewrites_every_reference() -> TestResult {
        let (mut catalog, key) = catalog()?;
        let athens = Zone::from("ΑΘΗΝΑ");
        let attica = Zone::from("ΑΤΤΙΚΗ");

        let reindex = catalog.rename_zone(&athens, "ΑΤΤΙΚΗ")?;

        assert_eq!(
            reindex,
            ZoneReindex {
                postal_codes: 1,
                carriers: 1,
                offers: 3,
                removed_offers: 0,
            }
        );

        assert!(!catalog.has_zone(&athens));
        assert_eq!(catalog.zones().first(), Some(&attica));

        let kypseli = catalog.postal_codes().first().ok_or("missing postal code")?;
        assert_eq!(kypseli.zone, attica);

        let carrier = catalog.carrier(key).ok_or("missing carrier")?;
        assert!(carrier.service_zones.contains(&attica));

        let (_, cubic) = catalog.offer_by_id("3").ok_or("missing offer")?;
        let Offer::ZoneCubic(cubic) = cubic else {
            return Err("expected a zone-cubic offer".into());
        };

        assert_eq!(cubic.zone_name, attica);
        assert!(cubic.zone_names.contains(&attica));
        assert_eq!(catalog.offers_serving_zone(&athens).count(), 0);

        Ok(())
    }

    #[test]
    fn rename_to_self_is_a_no_op() -> TestResult {
        let (mut catalog, _) = catalog()?;
        let athens = Zone::from("ΑΘΗΝΑ");

        assert_eq!(catalog.rename_zone(&athens, "ΑΘΗΝΑ")?, ZoneReindex::default());
        assert!(catalog.has_zone(&athens));

        Ok(())
    }

    #[test]
    fn rename_rejects_unknown_and_taken_names() -> TestResult {
        let (mut catalog, _) = catalog()?;

        assert_eq!(
            catalog.rename_zone(&Zone::from("ΚΡΗΤΗ"), "ΝΗΣΙΑ 3"),
            Err(ZoneError::NotFound(Zone::from("ΚΡΗΤΗ")))
        );
        assert_eq!(
            catalog.rename_zone(&Zone::from("ΑΘΗΝΑ"), "ΝΗΣΙΑ"),
            Err(ZoneError::AlreadyExists(Zone::from("ΝΗΣΙΑ")))
        );

        Ok(())
    }

    #[test]
    fn delete_prunes_offers_left_without_zones() -> TestResult {
        let (mut catalog, key) = catalog()?;
        let athens = Zone::from("ΑΘΗΝΑ");

        let reindex = catalog.delete_zone(&athens)?;

        // band 1 loses its only zone, cubic 3 loses its primary zone
        assert_eq!(reindex.removed_offers, 2);
        assert_eq!(reindex.carriers, 1);

        assert!(catalog.offer_by_id("1").is_none());
        assert!(catalog.offer_by_id("3").is_none());
        assert!(catalog.offer_by_id("4").is_some());

        let remaining: Vec<_> = catalog.offers().map(|(_, offer)| offer.id()).collect();
        assert_eq!(remaining, ["2", "4"]);

        let (_, shared) = catalog.offer_by_id("2").ok_or("missing offer")?;
        assert_eq!(shared.zone_names().as_slice(), [Zone::from("ΝΗΣΙΑ")]);

        let carrier = catalog.carrier(key).ok_or("missing carrier")?;
        assert!(!carrier.service_zones.contains(&athens));

        let kypseli = catalog.postal_codes().first().ok_or("missing postal code")?;
        assert_eq!(kypseli.zone, athens);

        assert!(!catalog.has_zone(&athens));
        assert_eq!(catalog.zone_usage(&athens), 0);

        Ok(())
    }

    #[test]
    fn delete_unknown_zone_fails() -> TestResult {
        let (mut catalog, _) = catalog()?;

        assert_eq!(
            catalog.delete_zone(&Zone::from("ΚΡΗΤΗ")),
            Err(ZoneError::NotFound(Zone::from("ΚΡΗΤΗ")))
        );

        Ok(())
    }

    #[test]
    fn zone_usage_counts_carriers_and_offers() -> TestResult {
        let (catalog, _) = catalog()?;

        assert_eq!(catalog.zone_usage(&Zone::from("ΑΘΗΝΑ")), 4);
        assert_eq!(catalog.zone_usage(&Zone::from("ΝΗΣΙΑ")), 3);
        assert_eq!(catalog.zone_usage(&Zone::from("ΘΕΣΣΑΛΟΝΙΚΗ")), 0);

        Ok(())
    }
}
