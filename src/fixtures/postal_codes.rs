//! Postal Code Fixtures

use serde::Deserialize;

use crate::postal_codes::PostalCode;

/// Wrapper for postal codes in YAML
#[derive(Debug, Deserialize)]
pub struct PostalCodesFixture {
    /// Postal code entries, in resolution order
    #[serde(default)]
    pub postal_codes: Vec<PostalCodeFixture>,
}

/// Postal Code Fixture
#[derive(Debug, Deserialize)]
pub struct PostalCodeFixture {
    /// Entry identifier
    pub id: String,

    /// Postal code, shared between areas
    pub code: String,

    /// County
    #[serde(default)]
    pub county: String,

    /// City
    #[serde(default)]
    pub city: String,

    /// Area, used to tell apart entries sharing a code
    pub area: String,

    /// Pricing zone
    pub zone: String,

    /// Free-form zone category
    #[serde(default)]
    pub zone_category: Option<String>,

    /// Intrinsically remote destination
    #[serde(default)]
    pub is_remote: bool,
}

impl From<PostalCodeFixture> for PostalCode {
    fn from(fixture: PostalCodeFixture) -> Self {
        let mut postal_code = PostalCode::new(fixture.id, fixture.code, fixture.area, fixture.zone)
            .located_in(fixture.county, fixture.city);

        postal_code.zone_category = fixture.zone_category;
        postal_code.is_remote = fixture.is_remote;

        postal_code
    }
}
