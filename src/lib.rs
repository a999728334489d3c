//! Facade crate for nodeloc, the OSM node location resolver.
//!
//! This crate re-exports the core domain types and the resolution loop, and
//! exposes the flat nodes store behind a feature flag.

#![forbid(unsafe_code)]

pub use nodeloc_core::{
    COORDINATE_PRECISION, Coordinate, FixedDegrees, LocationStore, LookupFailure, MalformedInput,
    NodeId, ParseNodeIdError, ResolutionLoop, ResolutionSummary, ResolveError, ResultLine,
};

#[cfg(feature = "store-flatnodes")]
pub use nodeloc_store::{AccessMode, FlatNodesError, FlatNodesStore};
