//! Geographic search region.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Rect};
use thiserror::Error;

/// Errors returned by [`BoundingBox::new`] and its parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    /// The textual form did not contain exactly four numbers.
    #[error("expected four comma-separated numbers (south,west,north,east), got {input:?}")]
    Format {
        /// Rejected input.
        input: String,
    },
    /// A bound was NaN, infinite or outside WGS84 range.
    #[error("{field} bound {value} is outside the valid range")]
    OutOfRange {
        /// Offending bound.
        field: &'static str,
        /// Its value.
        value: f64,
    },
    /// South exceeded north, or west exceeded east.
    #[error("bounding box is inverted: {low_field} {low} > {high_field} {high}")]
    Inverted {
        /// Lower bound name.
        low_field: &'static str,
        /// Lower bound value.
        low: f64,
        /// Upper bound name.
        high_field: &'static str,
        /// Upper bound value.
        high: f64,
    },
}

/// A latitude/longitude rectangle in WGS84 degrees.
///
/// # Examples
/// ```
/// use catchment_core::BoundingBox;
///
/// let bbox: BoundingBox = "-37.11,174.38,-36.67,175.08".parse()?;
/// assert_eq!(bbox.south(), -37.11);
/// assert_eq!(bbox.to_string(), "-37.11,174.38,-36.67,175.08");
/// # Ok::<(), catchment_core::BoundingBoxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl BoundingBox {
    /// Validate and construct a bounding box.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BoundingBoxError> {
        check_range("south", south, 90.0)?;
        check_range("north", north, 90.0)?;
        check_range("west", west, 180.0)?;
        check_range("east", east, 180.0)?;
        check_order("south", south, "north", north)?;
        check_order("west", west, "east", east)?;
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Southern latitude.
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Western longitude.
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Northern latitude.
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Eastern longitude.
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Centre of the box (`x = longitude`, `y = latitude`).
    pub fn centre(&self) -> Coord<f64> {
        self.to_rect().center()
    }

    /// Convert into a `geo` rectangle.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }
}

fn check_range(field: &'static str, value: f64, limit: f64) -> Result<(), BoundingBoxError> {
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(BoundingBoxError::OutOfRange { field, value })
    }
}

fn check_order(
    low_field: &'static str,
    low: f64,
    high_field: &'static str,
    high: f64,
) -> Result<(), BoundingBoxError> {
    if low <= high {
        Ok(())
    } else {
        Err(BoundingBoxError::Inverted {
            low_field,
            low,
            high_field,
            high,
        })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || BoundingBoxError::Format {
            input: s.to_owned(),
        };
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| format_error())?;
        match values.as_slice() {
            [south, west, north, east] => Self::new(*south, *west, *north, *east),
            _ => Err(format_error()),
        }
    }
}
