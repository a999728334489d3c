//! Core domain types for resolving OSM node identifiers to locations.
//!
//! The crate defines the identifier and coordinate models, the
//! [`LocationStore`] contract that backing stores implement, and the
//! [`ResolutionLoop`] that streams identifiers through a store and writes
//! `lon;lat;id` lines for every node that resolves.

use std::{fmt, num::ParseIntError, str::FromStr};

use thiserror::Error;

pub mod resolve;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use resolve::{
    MAX_TOKEN_LEN, MalformedInput, ResolutionLoop, ResolutionSummary, ResolveError, Tokens,
};
pub use store::{LocationStore, LookupFailure, classify_slot};

/// Number of fixed-precision units per degree.
pub const COORDINATE_PRECISION: i32 = 10_000_000;

/// Number of fractional digits carried by [`COORDINATE_PRECISION`].
const FRACTION_DIGITS: usize = 7;

/// Identifier of an OpenStreetMap node.
///
/// # Examples
///
/// ```
/// use nodeloc_core::NodeId;
///
/// let id: NodeId = "2185493801".parse().unwrap();
/// assert_eq!(id.get(), 2_185_493_801);
/// assert_eq!(id.to_string(), "2185493801");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(i64);

impl NodeId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Position of the node in a dense, zero-based index.
    ///
    /// Negative identifiers have no slot.
    #[must_use]
    pub fn slot(self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a token is not a base-10 `i64`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{token:?} is not a node identifier: {source}")]
pub struct ParseNodeIdError {
    /// The rejected token.
    pub token: String,
    /// Integer parsing failure.
    #[source]
    pub source: ParseIntError,
}

impl FromStr for NodeId {
    type Err = ParseNodeIdError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        token
            .parse::<i64>()
            .map(Self)
            .map_err(|source| ParseNodeIdError {
                token: token.to_owned(),
                source,
            })
    }
}

/// A fixed-precision WGS84 location.
///
/// Both axes are stored as integers in units of 1e-7 degrees, the layout used
/// by osm2pgsql's flat nodes file. `x` is the longitude and `y` the latitude.
///
/// # Examples
///
/// ```
/// use nodeloc_core::Coordinate;
///
/// let coordinate = Coordinate::from_degrees(7.5, 48.2).unwrap();
/// assert!(coordinate.is_valid());
/// assert_eq!(coordinate.lon().to_string(), "7.5");
/// assert_eq!(coordinate.lat().to_string(), "48.2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Raw value marking an axis that was never written.
    pub const UNDEFINED: i32 = i32::MAX;

    /// Coordinate of a slot that was never written.
    pub const UNSET: Self = Self {
        x: Self::UNDEFINED,
        y: Self::UNDEFINED,
    };

    /// Build a coordinate from raw fixed-precision values.
    #[must_use]
    pub const fn from_fixed(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert degrees to fixed precision, rounding to the nearest unit.
    ///
    /// Returns `None` when either value is not finite or does not fit the
    /// fixed-precision range. The result may still be outside the valid
    /// WGS84 range; see [`Coordinate::is_valid`].
    #[must_use]
    pub fn from_degrees(lon: f64, lat: f64) -> Option<Self> {
        Some(Self {
            x: degrees_to_fixed(lon)?,
            y: degrees_to_fixed(lat)?,
        })
    }

    /// Raw longitude.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Raw latitude.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Whether the coordinate carries a value on either axis.
    #[must_use]
    pub const fn is_defined(self) -> bool {
        self.x != Self::UNDEFINED || self.y != Self::UNDEFINED
    }

    /// Whether the coordinate lies within the WGS84 range.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        let max_x = 180 * COORDINATE_PRECISION;
        let max_y = 90 * COORDINATE_PRECISION;
        self.x >= -max_x && self.x <= max_x && self.y >= -max_y && self.y <= max_y
    }

    /// Longitude rendered with the fixed textual representation.
    #[must_use]
    pub const fn lon(self) -> FixedDegrees {
        FixedDegrees(self.x)
    }

    /// Latitude rendered with the fixed textual representation.
    #[must_use]
    pub const fn lat(self) -> FixedDegrees {
        FixedDegrees(self.y)
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "scaling degrees to fixed precision; range checked before the cast"
)]
fn degrees_to_fixed(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value * f64::from(COORDINATE_PRECISION)).round();
    if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
        return None;
    }
    // Range checked against the i32 bounds above.
    Some(scaled as i32)
}

/// One axis of a [`Coordinate`], formatted without floating point.
///
/// The rendering is the integer degrees, a dot, and the seven fractional
/// digits with trailing zeros removed, keeping at least one. It never
/// depends on locale.
///
/// ```
/// use nodeloc_core::Coordinate;
///
/// let coordinate = Coordinate::from_fixed(30_000_000, -1_234_567);
/// assert_eq!(coordinate.lon().to_string(), "3.0");
/// assert_eq!(coordinate.lat().to_string(), "-0.1234567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDegrees(i32);

impl FixedDegrees {
    /// Raw fixed-precision value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for FixedDegrees {
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "splitting fixed precision into whole and fractional digits"
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = u64::from(COORDINATE_PRECISION.unsigned_abs());
        let magnitude = u64::from(self.0.unsigned_abs());
        if self.0 < 0 {
            f.write_str("-")?;
        }

        let whole = magnitude / precision;
        let mut fraction = magnitude % precision;
        let mut digits = FRACTION_DIGITS;
        while digits > 1 && fraction % 10 == 0 {
            fraction /= 10;
            digits -= 1;
        }
        write!(f, "{whole}.{fraction:0digits$}")
    }
}

/// A single output record: `lon;lat;id`.
///
/// ```
/// use nodeloc_core::{Coordinate, NodeId, ResultLine};
///
/// let line = ResultLine::new(NodeId::new(42), Coordinate::from_fixed(75_000_000, 482_000_000));
/// assert_eq!(line.to_string(), "7.5;48.2;42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLine {
    /// Identifier that was looked up.
    pub id: NodeId,
    /// Location returned by the store.
    pub coordinate: Coordinate,
}

impl ResultLine {
    /// Pair an identifier with its resolved location.
    #[must_use]
    pub const fn new(id: NodeId, coordinate: Coordinate) -> Self {
        Self { id, coordinate }
    }
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{}",
            self.coordinate.lon(),
            self.coordinate.lat(),
            self.id
        )
    }
}
