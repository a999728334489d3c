//! Data access trait for node locations.
//!
//! The `LocationStore` trait defines a read-only, per-identifier lookup. A
//! lookup either yields a [`Coordinate`] or a [`LookupFailure`] explaining
//! why no usable location exists. Failures are ordinary outcomes, not faults:
//! most identifiers in a planet-scale stream have no stored location.

use std::io;

use thiserror::Error;

use crate::{Coordinate, NodeId};

/// Reason a lookup produced no location.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupFailure {
    /// Nothing was ever stored for the identifier.
    #[error("node {id} has no stored location")]
    NotFound {
        /// Identifier that was looked up.
        id: NodeId,
    },
    /// A value is stored but lies outside the WGS84 range.
    #[error("node {id} has an invalid location ({}, {})", .coordinate.x(), .coordinate.y())]
    InvalidLocation {
        /// Identifier that was looked up.
        id: NodeId,
        /// Raw value read from the store.
        coordinate: Coordinate,
    },
    /// The backing resource could not produce the stored value.
    #[error("location of node {id} could not be read: {kind}")]
    Unreadable {
        /// Identifier that was looked up.
        id: NodeId,
        /// Kind of the underlying I/O error.
        kind: io::ErrorKind,
    },
}

impl LookupFailure {
    /// Identifier the failure refers to.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::NotFound { id }
            | Self::InvalidLocation { id, .. }
            | Self::Unreadable { id, .. } => *id,
        }
    }
}

/// Read-only access to persisted node locations.
///
/// Implementations must tolerate repeated and concurrent calls; any
/// synchronisation they need is internal.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use nodeloc_core::{Coordinate, LocationStore, LookupFailure, NodeId};
///
/// struct MapStore(HashMap<NodeId, Coordinate>);
///
/// impl LocationStore for MapStore {
///     fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure> {
///         self.0
///             .get(&id)
///             .copied()
///             .ok_or(LookupFailure::NotFound { id })
///     }
/// }
///
/// let store = MapStore(HashMap::from([(NodeId::new(1), Coordinate::from_fixed(0, 0))]));
/// assert!(store.lookup(NodeId::new(1)).is_ok());
/// assert!(store.lookup(NodeId::new(2)).is_err());
/// ```
pub trait LocationStore {
    /// Return the location stored for `id`.
    fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure>;
}

impl<S: LocationStore + ?Sized> LocationStore for &S {
    fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure> {
        (**self).lookup(id)
    }
}

impl<S: LocationStore + ?Sized> LocationStore for Box<S> {
    fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure> {
        (**self).lookup(id)
    }
}

/// Classify a raw stored value for `id`.
///
/// Unset values are [`LookupFailure::NotFound`]; values outside the WGS84
/// range are [`LookupFailure::InvalidLocation`].
pub const fn classify_slot(
    id: NodeId,
    coordinate: Coordinate,
) -> Result<Coordinate, LookupFailure> {
    if !coordinate.is_defined() {
        return Err(LookupFailure::NotFound { id });
    }
    if !coordinate.is_valid() {
        return Err(LookupFailure::InvalidLocation { id, coordinate });
    }
    Ok(coordinate)
}
