//! Fixtures
//!
//! Loads catalogs and pricing policies from YAML files laid out as
//! `<base>/<category>/<name>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError, ZoneError},
    fixtures::{
        carriers::CarriersFixture, offers::OffersFixture, policy::PolicyFixture,
        postal_codes::PostalCodesFixture, zones::ZonesFixture,
    },
    policy::PricingPolicy,
    quote::Quoter,
};

pub mod carriers;
pub mod offers;
pub mod policy;
pub mod postal_codes;
pub mod zones;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid decimal quantity
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Offer refers to a carrier id that was never loaded
    #[error("Carrier not found: {0}")]
    CarrierNotFound(String),

    /// Entity rejected by the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Zone rejected by the catalog
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Entities loaded so far
    catalog: Catalog,

    /// Pricing policy, defaulted until a policy file is loaded
    policy: PricingPolicy,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            policy: PricingPolicy::default(),
        }
    }

    fn path(&self, category: &str, name: &str) -> PathBuf {
        self.base_path.join(category).join(format!("{name}.yml"))
    }

    /// Load zones from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a zone is blank or duplicated.
    pub fn load_zones(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ZonesFixture = read_yaml(&self.path("zones", name))?;

        for zone in fixture.zones {
            self.catalog.add_zone(zone)?;
        }

        Ok(self)
    }

    /// Load carriers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a carrier is invalid.
    pub fn load_carriers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CarriersFixture = read_yaml(&self.path("carriers", name))?;

        for carrier_fixture in fixture.carriers {
            self.catalog.insert_carrier(carrier_fixture.try_into()?)?;
        }

        Ok(self)
    }

    /// Load postal codes from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an entry id is duplicated.
    pub fn load_postal_codes(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PostalCodesFixture = read_yaml(&self.path("postal_codes", name))?;

        for postal_code in fixture.postal_codes {
            self.catalog.insert_postal_code(postal_code.into())?;
        }

        Ok(self)
    }

    /// Load offers from a YAML fixture file
    ///
    /// Carriers must be loaded first; offers refer to them by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an offer refers to an unknown
    /// carrier, or an offer is invalid.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OffersFixture = read_yaml(&self.path("offers", name))?;

        for offer_fixture in fixture.offers {
            let carrier_id = offer_fixture.carrier_id();

            let carrier = self
                .catalog
                .carrier_key(carrier_id)
                .ok_or_else(|| FixtureError::CarrierNotFound(carrier_id.to_string()))?;

            self.catalog
                .insert_offer(offer_fixture.try_into_offer(carrier)?)?;
        }

        Ok(self)
    }

    /// Load the pricing policy from a YAML fixture file
    ///
    /// A missing file keeps the default policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_policy(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let path = self.path("policy", name);

        if !path.exists() {
            debug!(path = %path.display(), "no policy fixture, using defaults");

            return Ok(self);
        }

        let fixture: PolicyFixture = read_yaml(&path)?;

        self.policy = fixture.try_into()?;

        Ok(self)
    }

    /// Load a complete fixture set (zones, carriers, postal codes, offers and policy with the
    /// same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Load a complete fixture set into this fixture
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_zones(name)?
            .load_carriers(name)?
            .load_postal_codes(name)?
            .load_offers(name)?
            .load_policy(name)
    }

    /// Catalog loaded so far
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable access to the loaded catalog
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Pricing policy
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Quoter over the loaded catalog and policy
    pub fn quoter(&self) -> Quoter<'_> {
        Quoter::with_policy(&self.catalog, self.policy)
    }

    /// Consumes the fixture, returning the catalog and policy
    pub fn into_parts(self) -> (Catalog, PricingPolicy) {
        (self.catalog, self.policy)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let contents = fs::read_to_string(path)?;

    Ok(serde_norway::from_str(&contents)?)
}

/// Parse a decimal quantity (e.g., "0.12" or "30")
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidDecimal(s.to_string()))
}

/// Parse an optional decimal quantity
///
/// # Errors
///
/// Returns an error if the value is present but not a decimal number.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, FixtureError> {
    s.map(parse_decimal).transpose()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusty_money::iso::{EUR, GBP};
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::{carriers::PostalCodeList, offers::Offer, postal_codes::Destination};

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn minimal_set(base: &Path) -> TestResult {
        write_fixture(base, "zones", "mini", "zones: [ΑΘΗΝΑ]\n")?;
        write_fixture(
            base,
            "carriers",
            "mini",
            r#"
carriers:
  - id: "1"
    name: MYTRANS
    limits:
      max_length: "100"
      max_width: "120"
      max_height: "60"
      max_weight: "30"
      max_cubic: "0.5"
    offers_by_weight: true
    serviced_postal_codes: ["10431"]
"#,
        )?;
        write_fixture(
            base,
            "postal_codes",
            "mini",
            r#"
postal_codes:
  - id: "1"
    code: "10431"
    area: Κυψέλη
    zone: ΑΘΗΝΑ
"#,
        )?;
        write_fixture(
            base,
            "offers",
            "mini",
            r#"
offers:
  - type: weight
    id: "1"
    carrier_id: "1"
    min_weight: "0"
    max_weight: "15"
    base_cost: "5"
    zone_names: [ΑΘΗΝΑ]
"#,
        )?;

        Ok(())
    }

    #[test]
    fn default_set_loads_seed_data() -> TestResult {
        let fixture = Fixture::from_set("default")?;
        let catalog = fixture.catalog();

        assert_eq!(catalog.zones().len(), 7);
        assert_eq!(catalog.carriers().count(), 2);
        assert_eq!(catalog.postal_codes().len(), 8);
        assert_eq!(catalog.offers().count(), 4);
        assert_eq!(fixture.policy(), &PricingPolicy::default());

        let (_, mytrans) = catalog.carrier_by_id("1").ok_or("MYTRANS missing")?;

        assert_eq!(mytrans.name, "MYTRANS");
        assert!(mytrans.lists_as_remote("74100"));
        assert!(!mytrans.allows_cash_on_delivery("85100"));
        assert_eq!(
            mytrans.postal_codes(PostalCodeList::Serviced).len(),
            3
        );

        Ok(())
    }

    #[test]
    fn minimal_set_loads_from_custom_path_without_policy() -> TestResult {
        let dir = TempDir::new()?;
        minimal_set(dir.path())?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_set("mini")?;

        assert_eq!(fixture.policy().currency, EUR);

        let (_, carrier) = fixture.catalog().carrier_by_id("1").ok_or("carrier missing")?;

        assert!(carrier.remote_postal_codes.is_empty());
        assert!(carrier.service_zones.is_empty());
        assert!(!carrier.offers_by_cubic);

        let quote = fixture.quoter().quote_details(
            crate::packages::PackageDetails::new(Some(Decimal::from(10)), None),
            &Destination::new("10431"),
        );

        assert_eq!(quote.optimal().map(|r| r.cost), Some(Decimal::from(5)));

        Ok(())
    }

    #[test]
    fn policy_fixture_overrides_defaults() -> TestResult {
        let dir = TempDir::new()?;
        minimal_set(dir.path())?;
        write_fixture(
            dir.path(),
            "policy",
            "mini",
            r#"
currency: GBP
vat: "20%"
volumetric_factor: "250"
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_set("mini")?;

        let policy = fixture.policy();

        assert_eq!(policy.currency, GBP);
        assert_eq!(policy.vat_inclusive(Decimal::from(10)), Some(Decimal::from(12)));
        assert_eq!(policy.volumetric_factor, Decimal::from(250));
        assert_eq!(policy.with_markup(Decimal::from(10)), Some(Decimal::from(13)));

        Ok(())
    }

    #[test]
    fn offers_require_loaded_carriers() -> TestResult {
        let dir = TempDir::new()?;
        minimal_set(dir.path())?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_offers("mini");

        assert!(matches!(result, Err(FixtureError::CarrierNotFound(id)) if id == "1"));

        Ok(())
    }

    #[test]
    fn invalid_offers_are_rejected() -> TestResult {
        let dir = TempDir::new()?;
        minimal_set(dir.path())?;
        write_fixture(
            dir.path(),
            "offers",
            "broken",
            r#"
offers:
  - type: weight
    id: "9"
    carrier_id: "1"
    min_weight: "20"
    max_weight: "10"
    base_cost: "5"
    zone_names: [ΑΘΗΝΑ]
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_carriers("mini")?;

        let result = fixture.load_offers("broken");

        assert!(matches!(result, Err(FixtureError::Catalog(_))));

        Ok(())
    }

    #[test]
    fn zone_cubic_offers_default_their_zone_set() -> TestResult {
        let dir = TempDir::new()?;
        minimal_set(dir.path())?;
        write_fixture(
            dir.path(),
            "offers",
            "cubic",
            r#"
offers:
  - type: zoneCubic
    id: "3"
    carrier_id: "1"
    zone_name: ΑΘΗΝΑ
    min_charge: "7"
    cubic_rate: "300"
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_carriers("mini")?.load_offers("cubic")?;

        let (_, offer) = fixture.catalog().offer_by_id("3").ok_or("offer missing")?;
        let Offer::ZoneCubic(cubic) = offer else {
            return Err("expected a zone-cubic offer".into());
        };

        assert_eq!(cubic.zone_names.as_slice(), [cubic.zone_name.clone()]);
        assert_eq!(cubic.min_cubic_volume, None);
        assert!(cubic.delivery_time.is_empty());

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_carriers("default"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        assert!(matches!(
            parse_decimal("thirty"),
            Err(FixtureError::InvalidDecimal(_))
        ));
    }

    #[test]
    fn parse_optional_decimal_passes_through_absence() -> TestResult {
        assert_eq!(parse_optional_decimal(None)?, None);
        assert_eq!(
            parse_optional_decimal(Some(" 0.12 "))?,
            Some(Decimal::new(12, 2))
        );

        Ok(())
    }
}
