//! In-memory `LocationStore` implementation used by unit and behaviour
//! tests.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{Coordinate, LocationStore, LookupFailure, NodeId, classify_slot};

/// In-memory `LocationStore` keyed by node identifier.
///
/// Raw values are kept as given, so tests can seed unset or out-of-range
/// coordinates and observe how they are classified. The store counts lookups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    locations: BTreeMap<NodeId, Coordinate>,
    lookups: AtomicU64,
}

impl MemoryStore {
    /// Create a store from raw identifier and coordinate pairs.
    #[must_use]
    pub fn with_locations<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Coordinate)>,
    {
        Self {
            locations: locations.into_iter().collect(),
            lookups: AtomicU64::new(0),
        }
    }

    /// Create a store from `(id, lon, lat)` triples given in degrees.
    ///
    /// # Panics
    ///
    /// Panics when a coordinate cannot be represented in fixed precision.
    #[must_use]
    pub fn from_degrees<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64, f64)>,
    {
        Self::with_locations(locations.into_iter().map(|(id, lon, lat)| {
            let coordinate = Coordinate::from_degrees(lon, lat)
                .unwrap_or_else(|| panic!("({lon}, {lat}) is not representable"));
            (NodeId::new(id), coordinate)
        }))
    }

    /// Store a raw coordinate for `id`, replacing any previous value.
    pub fn insert(&mut self, id: NodeId, coordinate: Coordinate) {
        self.locations.insert(id, coordinate);
    }

    /// Number of lookups served so far.
    #[must_use]
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl LocationStore for MemoryStore {
    fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let coordinate = self
            .locations
            .get(&id)
            .copied()
            .unwrap_or(Coordinate::UNSET);
        classify_slot(id, coordinate)
    }
}
