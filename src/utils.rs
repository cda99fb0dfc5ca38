//! Utils

use clap::Parser;
use rust_decimal::Decimal;

use crate::{
    packages::{PackageDimensions, PackageInput},
    postal_codes::Destination,
};

/// Arguments for the quote example
#[derive(Debug, Parser)]
pub struct ExampleQuoteArgs {
    /// Fixture set to quote against
    #[clap(short, long, default_value = "default")]
    pub fixture: String,

    /// Destination postal code
    #[clap(short, long, default_value = "10431")]
    pub postal_code: String,

    /// Destination area, for postal codes shared between areas
    #[clap(short, long)]
    pub area: Option<String>,

    /// Total weight (kg)
    #[clap(short, long)]
    pub weight: Option<Decimal>,

    /// Total volume (m³)
    #[clap(short, long)]
    pub volume: Option<Decimal>,

    /// Number of packages, when quoting by totals
    #[clap(short = 'n', long, default_value_t = 1)]
    pub packages: u32,

    /// Individual package as LxWxHxKG (cm, kg); repeat for each package
    #[clap(short, long = "item")]
    pub items: Vec<PackageDimensions>,

    /// Log level used when `RUST_LOG` is unset
    #[clap(short, long, default_value = "info")]
    pub log_level: String,
}

impl ExampleQuoteArgs {
    /// Shipment described by the arguments; itemized when any `--item` is given
    pub fn package_input(&self) -> PackageInput {
        if self.items.is_empty() {
            PackageInput::aggregate(self.weight, self.volume, self.packages)
        } else {
            PackageInput::itemized(self.items.clone())
        }
    }

    /// Destination described by the arguments
    pub fn destination(&self) -> Destination {
        let destination = Destination::new(self.postal_code.clone());

        match &self.area {
            Some(area) => destination.with_area(area.clone()),
            None => destination,
        }
    }
}
