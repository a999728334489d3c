//! Flat nodes writer used by fixtures and benchmarks.
//!
//! Production files are produced by osm2pgsql; this writer only exists so
//! tests can build small, exact artefacts.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use nodeloc_core::{Coordinate, NodeId};

use crate::flatnodes::encode_slot;

/// Write a flat nodes file holding `nodes`.
///
/// The file spans slots `0..=max_id`; slots without an entry are written as
/// [`Coordinate::UNSET`]. Later entries for the same identifier win. Existing
/// files are truncated.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::InvalidInput`] for negative identifiers, and
/// with the underlying error when the file cannot be written.
pub fn write_flat_nodes<I>(path: &Path, nodes: I) -> io::Result<()>
where
    I: IntoIterator<Item = (NodeId, Coordinate)>,
{
    let mut slots = Vec::new();
    for (id, coordinate) in nodes {
        let slot = id
            .slot()
            .and_then(|slot| usize::try_from(slot).ok())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("node {id} has no flat nodes slot"),
                )
            })?;
        if slots.len() <= slot {
            slots.resize(slot + 1, Coordinate::UNSET);
        }
        if let Some(entry) = slots.get_mut(slot) {
            *entry = coordinate;
        }
    }
    write_slots(path, &slots)
}

/// Write raw slots, in order, as a flat nodes file.
pub fn write_slots(path: &Path, slots: &[Coordinate]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for coordinate in slots {
        writer.write_all(&encode_slot(*coordinate))?;
    }
    writer.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()
}

/// Write a flat nodes file from `(id, lon, lat)` triples given in degrees.
///
/// # Panics
///
/// Panics when a coordinate cannot be represented in fixed precision.
pub fn write_flat_nodes_degrees<I>(path: &Path, nodes: I) -> io::Result<()>
where
    I: IntoIterator<Item = (i64, f64, f64)>,
{
    write_flat_nodes(
        path,
        nodes.into_iter().map(|(id, lon, lat)| {
            let coordinate = Coordinate::from_degrees(lon, lat)
                .unwrap_or_else(|| panic!("({lon}, {lat}) is not representable"));
            (NodeId::new(id), coordinate)
        }),
    )
}
