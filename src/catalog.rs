//! Catalog
//!
//! A snapshot of every carrier, postal code, offer and zone the quoting engine reads from.
//! Quoting only ever borrows a catalog immutably; all mutation happens through the methods here.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    carriers::{Carrier, CarrierError, CarrierKey, PostalCodeList},
    offers::{Offer, OfferError, OfferKey},
    postal_codes::{Destination, PostalCode},
    zones::Zone,
};

pub mod zones;

pub use zones::{ZoneError, ZoneReindex};

/// Errors raised while changing a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A carrier with the same external id already exists.
    #[error("carrier {0} already exists")]
    DuplicateCarrier(String),

    /// The carrier key does not refer to a carrier in this catalog.
    #[error("carrier not found")]
    CarrierNotFound,

    /// An offer refers to a carrier that is not in this catalog.
    #[error("offer {0} references an unknown carrier")]
    UnknownCarrier(String),

    /// An offer with the same external id already exists.
    #[error("offer {0} already exists")]
    DuplicateOffer(String),

    /// The offer key does not refer to an offer in this catalog.
    #[error("offer not found")]
    OfferNotFound,

    /// A postal code with the same id already exists.
    #[error("postal code entry {0} already exists")]
    DuplicatePostalCode(String),

    /// No postal code entry has the given id.
    #[error("postal code entry {0} not found")]
    PostalCodeNotFound(String),

    /// Carrier failed validation.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// Offer failed validation.
    #[error(transparent)]
    Offer(#[from] OfferError),
}

/// Carriers, postal codes, offers and zones known to the engine.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    carriers: SlotMap<CarrierKey, Carrier>,
    carrier_ids: FxHashMap<String, CarrierKey>,
    carrier_order: Vec<CarrierKey>,
    postal_codes: Vec<PostalCode>,
    offers: SlotMap<OfferKey, Offer>,
    offer_ids: FxHashMap<String, OfferKey>,
    offer_order: Vec<OfferKey>,
    zones: Vec<Zone>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validated carrier, returning its key.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Carrier`]: the carrier fails validation.
    /// - [`CatalogError::DuplicateCarrier`]: a carrier with the same id exists.
    pub fn insert_carrier(&mut self, carrier: Carrier) -> Result<CarrierKey, CatalogError> {
        carrier.validate()?;

        if self.carrier_ids.contains_key(&carrier.id) {
            return Err(CatalogError::DuplicateCarrier(carrier.id));
        }

        let id = carrier.id.clone();
        let key = self.carriers.insert(carrier);

        self.carrier_ids.insert(id, key);
        self.carrier_order.push(key);

        Ok(key)
    }

    /// Replaces a carrier, returning the previous value.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::CarrierNotFound`]: the key is not in the catalog.
    /// - [`CatalogError::Carrier`]: the replacement fails validation.
    /// - [`CatalogError::DuplicateCarrier`]: the replacement takes another carrier's id.
    pub fn update_carrier(
        &mut self,
        key: CarrierKey,
        carrier: Carrier,
    ) -> Result<Carrier, CatalogError> {
        if !self.carriers.contains_key(key) {
            return Err(CatalogError::CarrierNotFound);
        }

        carrier.validate()?;

        if self
            .carrier_ids
            .get(&carrier.id)
            .is_some_and(|existing| *existing != key)
        {
            return Err(CatalogError::DuplicateCarrier(carrier.id));
        }

        let new_id = carrier.id.clone();
        let previous = self
            .carriers
            .get_mut(key)
            .map(|slot| std::mem::replace(slot, carrier))
            .ok_or(CatalogError::CarrierNotFound)?;

        self.carrier_ids.remove(&previous.id);
        self.carrier_ids.insert(new_id, key);

        Ok(previous)
    }

    /// Removes a carrier together with every offer it publishes.
    pub fn remove_carrier(&mut self, key: CarrierKey) -> Option<Carrier> {
        let carrier = self.carriers.remove(key)?;

        self.carrier_ids.remove(&carrier.id);
        self.carrier_order.retain(|&k| k != key);

        let offer_ids = &mut self.offer_ids;
        self.offers.retain(|_, offer| {
            let keep = offer.carrier() != key;

            if !keep {
                offer_ids.remove(offer.id());
            }

            keep
        });
        self.prune_offer_order();

        debug!(carrier = %carrier.name, "removed carrier and its offers");

        Some(carrier)
    }

    /// Carrier by key
    pub fn carrier(&self, key: CarrierKey) -> Option<&Carrier> {
        self.carriers.get(key)
    }

    /// Key of the carrier with the given external id
    pub fn carrier_key(&self, id: &str) -> Option<CarrierKey> {
        self.carrier_ids.get(id).copied()
    }

    /// Carrier with the given external id
    pub fn carrier_by_id(&self, id: &str) -> Option<(CarrierKey, &Carrier)> {
        let key = self.carrier_key(id)?;

        self.carriers.get(key).map(|carrier| (key, carrier))
    }

    /// Iterates all carriers, in insertion order.
    pub fn carriers(&self) -> impl Iterator<Item = (CarrierKey, &Carrier)> {
        self.carrier_order
            .iter()
            .filter_map(|&key| self.carriers.get(key).map(|carrier| (key, carrier)))
    }

    /// Replaces one of a carrier's postal code lists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CarrierNotFound`] if the key is not in the catalog.
    pub fn set_carrier_postal_codes<I, S>(
        &mut self,
        key: CarrierKey,
        list: PostalCodeList,
        codes: I,
    ) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let carrier = self
            .carriers
            .get_mut(key)
            .ok_or(CatalogError::CarrierNotFound)?;

        *carrier.postal_codes_mut(list) = codes.into_iter().map(Into::into).collect();

        Ok(())
    }

    /// Adds a postal code entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePostalCode`] if an entry with the same id exists.
    pub fn insert_postal_code(&mut self, postal_code: PostalCode) -> Result<(), CatalogError> {
        if self.postal_codes.iter().any(|pc| pc.id == postal_code.id) {
            return Err(CatalogError::DuplicatePostalCode(postal_code.id));
        }

        self.postal_codes.push(postal_code);

        Ok(())
    }

    /// Replaces the postal code entry with the given id, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PostalCodeNotFound`] if no entry has that id.
    pub fn update_postal_code(
        &mut self,
        id: &str,
        postal_code: PostalCode,
    ) -> Result<PostalCode, CatalogError> {
        let slot = self
            .postal_codes
            .iter_mut()
            .find(|pc| pc.id == id)
            .ok_or_else(|| CatalogError::PostalCodeNotFound(id.to_string()))?;

        Ok(std::mem::replace(slot, postal_code))
    }

    /// Removes the postal code entry with the given id.
    pub fn remove_postal_code(&mut self, id: &str) -> Option<PostalCode> {
        let index = self.postal_codes.iter().position(|pc| pc.id == id)?;

        Some(self.postal_codes.remove(index))
    }

    /// All postal code entries, in insertion order.
    pub fn postal_codes(&self) -> &[PostalCode] {
        &self.postal_codes
    }

    /// Areas sharing a postal code, in insertion order.
    pub fn areas_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a str> {
        self.postal_codes
            .iter()
            .filter(move |pc| pc.code == code)
            .map(|pc| pc.area.as_str())
    }

    /// Resolves a destination to the first matching postal code entry.
    pub fn resolve(&self, destination: &Destination) -> Option<&PostalCode> {
        self.postal_codes.iter().find(|pc| destination.matches(pc))
    }

    /// Adds a validated offer, returning its key.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Offer`]: the offer fails validation.
    /// - [`CatalogError::UnknownCarrier`]: the offer's carrier is not in the catalog.
    /// - [`CatalogError::DuplicateOffer`]: an offer with the same id exists.
    pub fn insert_offer(&mut self, offer: impl Into<Offer>) -> Result<OfferKey, CatalogError> {
        let offer = offer.into();

        offer.validate()?;

        if !self.carriers.contains_key(offer.carrier()) {
            return Err(CatalogError::UnknownCarrier(offer.id().to_string()));
        }

        if self.offer_ids.contains_key(offer.id()) {
            return Err(CatalogError::DuplicateOffer(offer.id().to_string()));
        }

        let id = offer.id().to_string();
        let key = self.offers.insert(offer);

        self.offer_ids.insert(id, key);
        self.offer_order.push(key);

        Ok(key)
    }

    /// Replaces an offer, returning the previous value.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::OfferNotFound`]: the key is not in the catalog.
    /// - [`CatalogError::Offer`]: the replacement fails validation.
    /// - [`CatalogError::UnknownCarrier`]: the replacement's carrier is not in the catalog.
    /// - [`CatalogError::DuplicateOffer`]: the replacement takes another offer's id.
    pub fn update_offer(
        &mut self,
        key: OfferKey,
        offer: impl Into<Offer>,
    ) -> Result<Offer, CatalogError> {
        let offer = offer.into();

        if !self.offers.contains_key(key) {
            return Err(CatalogError::OfferNotFound);
        }

        offer.validate()?;

        if !self.carriers.contains_key(offer.carrier()) {
            return Err(CatalogError::UnknownCarrier(offer.id().to_string()));
        }

        if self
            .offer_ids
            .get(offer.id())
            .is_some_and(|existing| *existing != key)
        {
            return Err(CatalogError::DuplicateOffer(offer.id().to_string()));
        }

        let new_id = offer.id().to_string();
        let previous = self
            .offers
            .get_mut(key)
            .map(|slot| std::mem::replace(slot, offer))
            .ok_or(CatalogError::OfferNotFound)?;

        self.offer_ids.remove(previous.id());
        self.offer_ids.insert(new_id, key);

        Ok(previous)
    }

    /// Removes an offer.
    pub fn remove_offer(&mut self, key: OfferKey) -> Option<Offer> {
        let offer = self.offers.remove(key)?;

        self.offer_ids.remove(offer.id());
        self.offer_order.retain(|&k| k != key);

        Some(offer)
    }

    /// Offer by key
    pub fn offer(&self, key: OfferKey) -> Option<&Offer> {
        self.offers.get(key)
    }

    /// Offer with the given external id
    pub fn offer_by_id(&self, id: &str) -> Option<(OfferKey, &Offer)> {
        let key = *self.offer_ids.get(id)?;

        self.offers.get(key).map(|offer| (key, offer))
    }

    /// Iterates all offers, in insertion order.
    pub fn offers(&self) -> impl Iterator<Item = (OfferKey, &Offer)> {
        self.offer_order
            .iter()
            .filter_map(|&key| self.offers.get(key).map(|offer| (key, offer)))
    }

    /// Offers published by a carrier, in insertion order.
    pub fn offers_for(&self, carrier: CarrierKey) -> impl Iterator<Item = &Offer> {
        self.offers()
            .map(|(_, offer)| offer)
            .filter(move |offer| offer.carrier() == carrier)
    }

    /// Offers whose declared zone set contains `zone`, in insertion order.
    pub fn offers_serving_zone<'a>(&'a self, zone: &'a Zone) -> impl Iterator<Item = &'a Offer> {
        self.offers()
            .map(|(_, offer)| offer)
            .filter(move |offer| offer.serves_zone(zone))
    }

    /// Drops order entries for offers that are no longer stored.
    fn prune_offer_order(&mut self) {
        let offers = &self.offers;

        self.offer_order.retain(|&key| offers.contains_key(key));
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        carriers::CarrierLimits,
        offers::{OfferType, WeightOffer, ZoneCubicOffer},
    };

    use super::*;

    fn carrier(id: &str, name: &str) -> Carrier {
        Carrier::new(id, name, CarrierLimits::default()).by_weight()
    }

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

    #[test]
    fn insert_carrier_rejects_duplicates_and_invalid_entries() -> TestResult {
        let mut catalog = Catalog::new();

        let key = catalog.insert_carrier(carrier("1", "MYTRANS"))?;

        assert_eq!(catalog.carrier_key("1"), Some(key));
        assert_eq!(
            catalog.insert_carrier(carrier("1", "AGAIN")),
            Err(CatalogError::DuplicateCarrier("1".to_string()))
        );
        assert_eq!(
            catalog.insert_carrier(Carrier::new("2", "IDLE", CarrierLimits::default())),
            Err(CatalogError::Carrier(CarrierError::NoOfferTypes(
                "2".to_string()
            )))
        );

        Ok(())
    }

    #[test]
    fn update_carrier_reindexes_its_id() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert_carrier(carrier("1", "MYTRANS"))?;
        catalog.insert_carrier(carrier("2", "SPEEDEX"))?;

        let previous = catalog.update_carrier(key, carrier("10", "MYTRANS EXPRESS"))?;

        assert_eq!(previous.name, "MYTRANS");
        assert_eq!(catalog.carrier_key("1"), None);
        assert_eq!(catalog.carrier_key("10"), Some(key));
        assert_eq!(
            catalog.update_carrier(key, carrier("2", "CLASH")),
            Err(CatalogError::DuplicateCarrier("2".to_string()))
        );

        Ok(())
    }

    #[test]
    fn remove_carrier_cascades_to_its_offers() -> TestResult {
        let mut catalog = Catalog::new();
        let mytrans = catalog.insert_carrier(carrier("1", "MYTRANS"))?;
        let speedex = catalog.insert_carrier(carrier("2", "SPEEDEX"))?;

        catalog.insert_offer(band("1", mytrans, &["ΑΘΗΝΑ"]))?;
        catalog.insert_offer(band("2", mytrans, &["ΝΗΣΙΑ"]))?;
        catalog.insert_offer(band("3", speedex, &["ΑΘΗΝΑ"]))?;

        let removed = catalog.remove_carrier(mytrans);

        assert_eq!(removed.map(|c| c.name), Some("MYTRANS".to_string()));
        assert_eq!(catalog.offers().count(), 1);
        assert!(catalog.offer_by_id("1").is_none());
        assert!(catalog.offer_by_id("3").is_some());
        assert!(catalog.remove_carrier(mytrans).is_none());

        Ok(())
    }

    #[test]
    fn iteration_follows_insertion_order_across_reused_slots() -> TestResult {
        let mut catalog = Catalog::new();
        let mytrans = catalog.insert_carrier(carrier("1", "MYTRANS"))?;
        let speedex = catalog.insert_carrier(carrier("2", "SPEEDEX"))?;

        let first = catalog.insert_offer(band("1", speedex, &["ΑΘΗΝΑ"]))?;
        catalog.insert_offer(band("2", speedex, &["ΑΘΗΝΑ"]))?;

        catalog.remove_carrier(mytrans);
        catalog.remove_offer(first);

        let acs = catalog.insert_carrier(carrier("3", "ACS"))?;
        catalog.insert_offer(band("3", acs, &["ΑΘΗΝΑ"]))?;

        let carriers: Vec<_> = catalog.carriers().map(|(_, c)| c.id.as_str()).collect();
        let offers: Vec<_> = catalog.offers().map(|(_, o)| o.id()).collect();

        assert_eq!(carriers, ["2", "3"]);
        assert_eq!(offers, ["2", "3"]);

        Ok(())
    }

    #[test]
    fn insert_offer_requires_a_known_carrier() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert_carrier(carrier("1", "MYTRANS"))?;
        catalog.remove_carrier(key);

        assert_eq!(
            catalog.insert_offer(band("1", key, &["ΑΘΗΝΑ"])),
            Err(CatalogError::UnknownCarrier("1".to_string()))
        );

        Ok(())
    }

    #[test]
    fn insert_offer_validates_entries() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert_carrier(carrier("1", "MYTRANS"))?;

        let inverted = WeightOffer {
            min_weight: Decimal::from(20),
            ..band("1", key, &["ΑΘΗΝΑ"])
        };

        assert_eq!(
            catalog.insert_offer(inverted),
            Err(CatalogError::Offer(OfferError::InvalidWeightRange(
                "1".to_string()
            )))
        );

        Ok(())
    }

    #[test]
    fn update_and_remove_offer_keep_ids_in_sync() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert_carrier(carrier("1", "MYTRANS"))?;
        let offer = catalog.insert_offer(band("1", key, &["ΑΘΗΝΑ"]))?;

        let cubic = ZoneCubicOffer::new("7", key, "ΑΘΗΝΑ", Decimal::from(7), Decimal::from(300));
        let previous = catalog.update_offer(offer, cubic)?;

        assert_eq!(previous.offer_type(), OfferType::Weight);
        assert!(catalog.offer_by_id("1").is_none());
        assert_eq!(
            catalog.offer(offer).map(Offer::offer_type),
            Some(OfferType::ZoneCubic)
        );

        assert!(catalog.remove_offer(offer).is_some());
        assert!(catalog.offer_by_id("7").is_none());

        Ok(())
    }

    #[test]
    fn offers_are_filtered_by_carrier_and_zone() -> TestResult {
        let mut catalog = Catalog::new();
        let mytrans = catalog.insert_carrier(carrier("1", "MYTRANS"))?;
        let speedex = catalog.insert_carrier(carrier("2", "SPEEDEX"))?;

        catalog.insert_offer(band("1", mytrans, &["ΑΘΗΝΑ"]))?;
        catalog.insert_offer(band("2", mytrans, &["ΝΗΣΙΑ"]))?;
        catalog.insert_offer(band("3", speedex, &["ΑΘΗΝΑ", "ΝΗΣΙΑ"]))?;

        let athens = Zone::from("ΑΘΗΝΑ");

        let mut for_mytrans: Vec<_> = catalog.offers_for(mytrans).map(Offer::id).collect();
        let mut serving: Vec<_> = catalog.offers_serving_zone(&athens).map(Offer::id).collect();
        for_mytrans.sort_unstable();
        serving.sort_unstable();

        assert_eq!(for_mytrans, ["1", "2"]);
        assert_eq!(serving, ["1", "3"]);

        Ok(())
    }

    #[test]
    fn set_carrier_postal_codes_replaces_the_list() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert_carrier(
            carrier("1", "MYTRANS").with_postal_codes(PostalCodeList::Serviced, ["10431"]),
        )?;

        catalog.set_carrier_postal_codes(key, PostalCodeList::Serviced, ["54622", "26442"])?;

        let carrier = catalog.carrier(key).ok_or("carrier missing")?;

        assert!(!carrier.services("10431"));
        assert!(carrier.services("54622"));
        assert!(carrier.services("26442"));

        Ok(())
    }

    #[test]
    fn resolve_picks_the_first_matching_area() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.insert_postal_code(PostalCode::new("1", "19009", "Ραφήνα", "ΧΕΡΣΑΙΟΙ ΠΡΟΟΡΙΣΜΟΙ"))?;
        catalog.insert_postal_code(PostalCode::new("2", "19009", "Πικέρμι", "ΑΘΗΝΑ"))?;

        let areas: Vec<_> = catalog.areas_for("19009").collect();
        assert_eq!(areas, ["Ραφήνα", "Πικέρμι"]);

        let first = catalog.resolve(&Destination::new("19009"));
        let pikermi = catalog.resolve(&Destination::new("19009").with_area("Πικέρμι"));
        let unknown = catalog.resolve(&Destination::new("19009").with_area("Μάτι"));

        assert_eq!(first.map(|pc| pc.id.as_str()), Some("1"));
        assert_eq!(pikermi.map(|pc| pc.zone.as_str()), Some("ΑΘΗΝΑ"));
        assert_eq!(unknown, None);

        Ok(())
    }

    #[test]
    fn postal_code_entries_can_be_updated_and_removed() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.insert_postal_code(PostalCode::new("1", "10431", "Κυψέλη", "ΑΘΗΝΑ"))?;

        assert_eq!(
            catalog.insert_postal_code(PostalCode::new("1", "10432", "Κυψέλη", "ΑΘΗΝΑ")),
            Err(CatalogError::DuplicatePostalCode("1".to_string()))
        );

        catalog.update_postal_code("1", PostalCode::new("1", "10431", "Κυψέλη", "ΝΗΣΙΑ"))?;

        assert_eq!(
            catalog.postal_codes().first().map(|pc| pc.zone.as_str()),
            Some("ΝΗΣΙΑ")
        );
        assert!(catalog.remove_postal_code("1").is_some());
        assert!(catalog.postal_codes().is_empty());
        assert_eq!(
            catalog.update_postal_code("1", PostalCode::new("1", "1", "x", "y")),
            Err(CatalogError::PostalCodeNotFound("1".to_string()))
        );

        Ok(())
    }
}
