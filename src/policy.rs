//! Pricing Policy
//!
//! Constants that vary between markets and carriers: currency, VAT, resale markup, the
//! volumetric conversion factor and the default minimum billable volume.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};

/// Kilograms of volumetric weight per cubic metre (1:200 road/air freight convention).
pub const DEFAULT_VOLUMETRIC_FACTOR: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Minimum billable volume for zone-cubic offers that do not set their own (m³).
pub const DEFAULT_MIN_CUBIC_VOLUME: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Policy constants applied while quoting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Currency all costs are expressed in
    pub currency: &'static Currency,

    /// VAT rate added on top of costs
    pub vat: Percentage,

    /// Markup used for suggested resale prices
    pub markup: Percentage,

    /// Volumetric weight per cubic metre
    pub volumetric_factor: Decimal,

    /// Minimum billable volume for zone-cubic offers without their own floor
    pub default_min_cubic_volume: Decimal,
}

impl PricingPolicy {
    /// Returns `amount` with VAT added, or `None` if the result overflows.
    pub fn vat_inclusive(&self, amount: Decimal) -> Option<Decimal> {
        add_percentage(amount, self.vat)
    }

    /// Returns `amount` with the resale markup added, or `None` if the result overflows.
    pub fn with_markup(&self, amount: Decimal) -> Option<Decimal> {
        add_percentage(amount, self.markup)
    }

    /// Volumetric weight (kg) equivalent to `volume` cubic metres, or `None` if it overflows.
    pub fn volumetric_weight(&self, volume: Decimal) -> Option<Decimal> {
        volume.checked_mul(self.volumetric_factor)
    }
}

fn add_percentage(amount: Decimal, percentage: Percentage) -> Option<Decimal> {
    let rate = percentage * Decimal::ONE;

    amount.checked_mul(rate)?.checked_add(amount)
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            currency: iso::EUR,
            vat: Percentage::from(Decimal::new(24, 2)),
            markup: Percentage::from(Decimal::new(30, 2)),
            volumetric_factor: DEFAULT_VOLUMETRIC_FACTOR,
            default_min_cubic_volume: DEFAULT_MIN_CUBIC_VOLUME,
        }
    }
}
