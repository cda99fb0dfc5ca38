//! Policy Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_decimal},
    policy::PricingPolicy,
};

/// Pricing policy in YAML; every field falls back to the default policy
#[derive(Debug, Default, Deserialize)]
pub struct PolicyFixture {
    /// ISO currency code (e.g., "EUR")
    #[serde(default)]
    pub currency: Option<String>,

    /// VAT rate (e.g., "24%" or "0.24")
    #[serde(default)]
    pub vat: Option<String>,

    /// Resale markup (e.g., "30%" or "0.30")
    #[serde(default)]
    pub markup: Option<String>,

    /// Volumetric weight per m³ (e.g., "200")
    #[serde(default)]
    pub volumetric_factor: Option<String>,

    /// Minimum billable volume for zone-cubic offers (e.g., "0.12")
    #[serde(default)]
    pub default_min_cubic_volume: Option<String>,
}

impl TryFrom<PolicyFixture> for PricingPolicy {
    type Error = FixtureError;

    fn try_from(fixture: PolicyFixture) -> Result<Self, Self::Error> {
        let defaults = PricingPolicy::default();

        Ok(PricingPolicy {
            currency: match fixture.currency.as_deref() {
                Some(code) => parse_currency(code)?,
                None => defaults.currency,
            },
            vat: match fixture.vat.as_deref() {
                Some(vat) => parse_percentage(vat)?,
                None => defaults.vat,
            },
            markup: match fixture.markup.as_deref() {
                Some(markup) => parse_percentage(markup)?,
                None => defaults.markup,
            },
            volumetric_factor: match fixture.volumetric_factor.as_deref() {
                Some(factor) => parse_decimal(factor)?,
                None => defaults.volumetric_factor,
            },
            default_min_cubic_volume: match fixture.default_min_cubic_volume.as_deref() {
                Some(volume) => parse_decimal(volume)?,
                None => defaults.default_min_cubic_volume,
            },
        })
    }
}

/// Parse an ISO currency code
///
/// # Errors
///
/// Returns an error if the code is not one of the supported currencies.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse percentage string (e.g., "24%" or "0.24") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "24%" for 24%
/// - Decimal format: "0.24" for 24%
///
/// # Errors
///
/// Returns an error if the string is not a number in either format.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let parsed = match trimmed.strip_suffix('%') {
        // "24%" -> 0.24
        Some(percent_str) => percent_str
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED),
        None => trimmed.parse::<Decimal>(),
    };

    let fraction = parsed.map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(fraction))
}
