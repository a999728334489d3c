//! Streaming resolution of node identifiers.
//!
//! [`ResolutionLoop`] owns a [`LocationStore`] for the duration of a run. It
//! reads identifiers one at a time, looks each one up, and writes a
//! `lon;lat;id` line for every identifier that resolves. Identifiers without
//! a usable location are dropped without a trace in the output. Each line is
//! flushed before the next identifier is read so callers piping identifiers
//! in can consume results as they are produced.

use std::io::{self, BufRead, Write};

use log::{debug, trace, warn};
use thiserror::Error;

use crate::{LocationStore, NodeId, ResultLine};

mod tokens;

pub use tokens::{MAX_TOKEN_LEN, Tokens};

/// Handling of tokens that are not node identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedInput {
    /// Treat the first malformed token as the end of the stream.
    #[default]
    Stop,
    /// Drop the malformed token and keep reading.
    Skip,
}

/// Tally of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Identifiers parsed and looked up.
    pub read: u64,
    /// Lines written.
    pub emitted: u64,
    /// Identifiers whose lookup failed.
    pub skipped: u64,
    /// Malformed tokens dropped under [`MalformedInput::Skip`].
    pub malformed: u64,
    /// Whether the run ended on a malformed token under
    /// [`MalformedInput::Stop`].
    pub stopped_on_malformed: bool,
}

/// Failure of the input or output stream during a run.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Reading identifiers failed.
    #[error("failed to read node identifiers: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing or flushing a result line failed.
    #[error("failed to write result line: {source}")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Whether the output was closed by its reader.
    #[must_use]
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Write { source } if source.kind() == io::ErrorKind::BrokenPipe)
    }
}

/// Read-lookup-emit loop over a stream of node identifiers.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use nodeloc_core::{Coordinate, LocationStore, LookupFailure, NodeId, ResolutionLoop};
///
/// struct Nodes(BTreeMap<NodeId, Coordinate>);
///
/// impl LocationStore for Nodes {
///     fn lookup(&self, id: NodeId) -> Result<Coordinate, LookupFailure> {
///         self.0.get(&id).copied().ok_or(LookupFailure::NotFound { id })
///     }
/// }
///
/// let store = Nodes(BTreeMap::from([
///     (NodeId::new(42), Coordinate::from_fixed(75_000_000, 482_000_000)),
///     (NodeId::new(99), Coordinate::from_fixed(30_000_000, 500_000_000)),
/// ]));
/// let mut output = Vec::new();
/// let summary = ResolutionLoop::new(store)
///     .run("42\n7\n99\n".as_bytes(), &mut output)
///     .unwrap();
///
/// assert_eq!(String::from_utf8(output).unwrap(), "7.5;48.2;42\n3.0;50.0;99\n");
/// assert_eq!(summary.skipped, 1);
/// ```
#[derive(Debug)]
pub struct ResolutionLoop<S> {
    store: S,
    malformed: MalformedInput,
}

impl<S: LocationStore> ResolutionLoop<S> {
    /// Take ownership of `store` for the lifetime of the loop.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            malformed: MalformedInput::Stop,
        }
    }

    /// Select how malformed tokens are handled.
    #[must_use]
    pub const fn with_malformed_input(mut self, malformed: MalformedInput) -> Self {
        self.malformed = malformed;
        self
    }

    /// The store queried by the loop.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Release the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolve every identifier in `input`, writing result lines to `output`.
    ///
    /// Returns once `input` is exhausted, or on the first malformed token under
    /// [`MalformedInput::Stop`]. Lookup failures never end the run; only
    /// failures of the streams themselves are returned as errors.
    pub fn run<R, W>(&self, input: R, mut output: W) -> Result<ResolutionSummary, ResolveError>
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = ResolutionSummary::default();

        for read in Tokens::new(input) {
            let token = read.map_err(|source| ResolveError::Read { source })?;
            let id = match token.parse::<NodeId>() {
                Ok(id) => id,
                Err(err) => match self.malformed {
                    MalformedInput::Stop => {
                        warn!("Stopped reading at malformed input: {err}");
                        summary.stopped_on_malformed = true;
                        break;
                    }
                    MalformedInput::Skip => {
                        debug!("Skipped malformed input: {err}");
                        summary.malformed += 1;
                        continue;
                    }
                },
            };

            summary.read += 1;
            match self.store.lookup(id) {
                Ok(coordinate) => {
                    emit(&mut output, ResultLine::new(id, coordinate))?;
                    summary.emitted += 1;
                }
                Err(failure) => {
                    trace!("Skipped {failure}");
                    summary.skipped += 1;
                }
            }
        }

        debug!(
            "Resolved {} of {} node identifiers ({} skipped, {} malformed)",
            summary.emitted, summary.read, summary.skipped, summary.malformed
        );
        Ok(summary)
    }
}

fn emit<W: Write>(output: &mut W, line: ResultLine) -> Result<(), ResolveError> {
    writeln!(output, "{line}")
        .and_then(|()| output.flush())
        .map_err(|source| ResolveError::Write { source })
}
