//! Packages
//!
//! Turns what the user knows about a shipment into one canonical [`PackageDetails`]: either the
//! declared totals, or the sum of individually measured packages.

use std::str::FromStr;

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

/// Cubic centimetres per cubic metre.
const CM3_PER_M3: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors that block a package description from being quoted.
#[derive(Debug, Error, PartialEq)]
pub enum PackageError {
    /// Neither a total weight nor a total volume was supplied.
    #[error("a total weight or a total volume is required")]
    MissingWeightAndVolume,

    /// Package count below one, or too many packages to count.
    #[error("the number of packages must be between 1 and {}", u32::MAX)]
    InvalidPackageCount,

    /// Itemized mode without any items.
    #[error("at least one package is required")]
    NoPackages,

    /// An itemized package weighs nothing.
    #[error("the weight of package {index} must be greater than 0")]
    NonPositiveWeight {
        /// 1-based package position
        index: usize,
    },

    /// An itemized package has a zero or negative dimension.
    #[error("all dimensions of package {index} must be greater than 0")]
    NonPositiveDimension {
        /// 1-based package position
        index: usize,
    },

    /// Package measurements or their totals exceed what can be represented.
    #[error("package measurements are too large to quote")]
    TooLarge,

    /// A package description could not be parsed.
    #[error("invalid package description {0:?}, expected LENGTHxWIDTHxHEIGHTxWEIGHT")]
    InvalidDescription(String),
}

/// Linear dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    /// Length (cm)
    pub length: Decimal,

    /// Width (cm)
    pub width: Decimal,

    /// Height (cm)
    pub height: Decimal,
}

impl Dimensions {
    /// Returns the per-axis maximum of two sets of dimensions.
    #[must_use]
    pub fn max(self, other: Dimensions) -> Dimensions {
        Dimensions {
            length: self.length.max(other.length),
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// One individually measured package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageDimensions {
    /// Size (cm)
    pub dimensions: Dimensions,

    /// Weight (kg)
    pub weight: Decimal,
}

impl PackageDimensions {
    /// Creates a package from its length, width and height in centimetres and weight in kilograms.
    pub fn new(length: Decimal, width: Decimal, height: Decimal, weight: Decimal) -> Self {
        Self {
            dimensions: Dimensions {
                length,
                width,
                height,
            },
            weight,
        }
    }

    /// Volume in cubic metres, when all three dimensions are positive and the volume is
    /// representable.
    pub fn volume(&self) -> Option<Decimal> {
        let Dimensions {
            length,
            width,
            height,
        } = self.dimensions;

        if !self.has_positive_dimensions() {
            return None;
        }

        length
            .checked_mul(width)?
            .checked_mul(height)?
            .checked_div(CM3_PER_M3)
    }

    fn has_positive_dimensions(&self) -> bool {
        let Dimensions {
            length,
            width,
            height,
        } = self.dimensions;

        length > Decimal::ZERO && width > Decimal::ZERO && height > Decimal::ZERO
    }
}

impl FromStr for PackageDimensions {
    type Err = PackageError;

    /// Parses `LENGTHxWIDTHxHEIGHTxWEIGHT`, e.g. `40x30x20x2.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(['x', 'X'])
            .map(|part| part.trim().parse::<Decimal>())
            .collect::<Result<SmallVec<[Decimal; 4]>, _>>()
            .map_err(|_err| PackageError::InvalidDescription(s.to_string()))?;

        match parts.as_slice() {
            [length, width, height, weight] => {
                Ok(PackageDimensions::new(*length, *width, *height, *weight))
            }
            _ => Err(PackageError::InvalidDescription(s.to_string())),
        }
    }
}

/// Raw shipment description as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum PackageInput {
    /// The user knows the shipment totals.
    Aggregate {
        /// Total weight (kg)
        total_weight: Option<Decimal>,

        /// Total volume (m³)
        total_volume: Option<Decimal>,

        /// Number of packages
        packages: u32,
    },

    /// The user measured each package.
    Itemized(Vec<PackageDimensions>),
}

impl PackageInput {
    /// Describes a shipment by its totals.
    pub fn aggregate(
        total_weight: Option<Decimal>,
        total_volume: Option<Decimal>,
        packages: u32,
    ) -> Self {
        PackageInput::Aggregate {
            total_weight,
            total_volume,
            packages,
        }
    }

    /// Describes a shipment package by package.
    pub fn itemized(packages: impl Into<Vec<PackageDimensions>>) -> Self {
        PackageInput::Itemized(packages.into())
    }

    /// Checks that the description is complete enough to quote.
    ///
    /// # Errors
    ///
    /// - [`PackageError::InvalidPackageCount`]: aggregate package count below one.
    /// - [`PackageError::MissingWeightAndVolume`]: aggregate mode with neither total supplied.
    /// - [`PackageError::NoPackages`]: itemized mode with no packages.
    /// - [`PackageError::NonPositiveWeight`]: an itemized package weighs nothing.
    /// - [`PackageError::NonPositiveDimension`]: an itemized package has a non-positive dimension.
    /// - [`PackageError::TooLarge`]: an itemized package's volume overflows.
    pub fn validate(&self) -> Result<(), PackageError> {
        match self {
            PackageInput::Aggregate {
                total_weight,
                total_volume,
                packages,
            } => {
                if *packages < 1 {
                    return Err(PackageError::InvalidPackageCount);
                }

                if positive(*total_weight).is_none() && positive(*total_volume).is_none() {
                    return Err(PackageError::MissingWeightAndVolume);
                }

                Ok(())
            }
            PackageInput::Itemized(items) => {
                if items.is_empty() {
                    return Err(PackageError::NoPackages);
                }

                items.iter().enumerate().try_for_each(|(i, item)| {
                    if item.weight <= Decimal::ZERO {
                        Err(PackageError::NonPositiveWeight { index: i + 1 })
                    } else if !item.has_positive_dimensions() {
                        Err(PackageError::NonPositiveDimension { index: i + 1 })
                    } else if item.volume().is_none() {
                        Err(PackageError::TooLarge)
                    } else {
                        Ok(())
                    }
                })
            }
        }
    }

    /// Produces the canonical package details.
    ///
    /// # Errors
    ///
    /// Returns a [`PackageError`] if [`PackageInput::validate`] fails, or
    /// [`PackageError::TooLarge`] / [`PackageError::InvalidPackageCount`] if itemized totals
    /// cannot be represented.
    pub fn normalize(&self) -> Result<PackageDetails, PackageError> {
        self.validate()?;

        let details = match self {
            PackageInput::Aggregate {
                total_weight,
                total_volume,
                packages,
            } => PackageDetails {
                weight: positive(*total_weight),
                volume: positive(*total_volume),
                dimensions: None,
                packages: *packages,
            },
            PackageInput::Itemized(items) => {
                let weight = checked_sum(items.iter().map(|item| Some(item.weight)))?;
                let volume = checked_sum(items.iter().map(PackageDimensions::volume))?;

                let dimensions = items
                    .iter()
                    .map(|item| item.dimensions)
                    .fold(Dimensions::default(), Dimensions::max);

                PackageDetails {
                    weight: positive(Some(weight)),
                    volume: positive(Some(volume)),
                    dimensions: Some(dimensions),
                    packages: package_count(items.len())?,
                }
            }
        };

        Ok(details)
    }
}

fn checked_sum(values: impl IntoIterator<Item = Option<Decimal>>) -> Result<Decimal, PackageError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value?))
        .ok_or(PackageError::TooLarge)
}

fn package_count(len: usize) -> Result<u32, PackageError> {
    u32::try_from(len).map_err(|_err| PackageError::InvalidPackageCount)
}

/// Keeps only strictly positive values; zero and negatives mean "not supplied".
fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Canonical description of a shipment, ready for quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageDetails {
    weight: Option<Decimal>,
    volume: Option<Decimal>,
    dimensions: Option<Dimensions>,
    packages: u32,
}

impl PackageDetails {
    /// Creates details for a single package from known totals.
    ///
    /// Zero or negative values are treated as unknown.
    pub fn new(weight: Option<Decimal>, volume: Option<Decimal>) -> Self {
        Self {
            weight: positive(weight),
            volume: positive(volume),
            dimensions: None,
            packages: 1,
        }
    }

    /// Sets the package count. Counts below one are raised to one.
    #[must_use]
    pub fn with_packages(mut self, packages: u32) -> Self {
        self.packages = packages.max(1);
        self
    }

    /// Sets the largest per-axis dimensions, used only for limit checks.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Total weight (kg), if known.
    pub fn weight(&self) -> Option<Decimal> {
        self.weight
    }

    /// Total volume (m³), if known.
    pub fn volume(&self) -> Option<Decimal> {
        self.volume
    }

    /// Largest per-axis dimensions across packages, when measured.
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// Number of packages.
    pub fn packages(&self) -> u32 {
        self.packages
    }

    /// Weight for display, zero when unknown.
    pub fn actual_weight(&self) -> Decimal {
        self.weight.unwrap_or_default()
    }

    /// Volume for display, zero when unknown.
    pub fn total_volume(&self) -> Decimal {
        self.volume.unwrap_or_default()
    }
}
