//! File-backed location stores for the nodeloc engine.
//!
//! Responsibilities:
//! - Read node locations from osm2pgsql flat nodes files.
//! - Report open failures as typed, fatal errors.
//!
//! Boundaries:
//! - Building production stores is left to osm2pgsql; the writer in
//!   `test_support` (feature `test-support`) exists for fixtures and
//!   benchmarks.
//! - Lookup semantics (what counts as missing or invalid) live in
//!   `nodeloc-core`.

mod flatnodes;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use flatnodes::{FlatNodesError, FlatNodesStore, SLOT_SIZE};
pub use nodeloc_fs::AccessMode;
