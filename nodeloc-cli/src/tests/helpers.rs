//! Test helpers for building flat nodes fixtures and capturing CLI streams.

use super::*;
use nodeloc_store::test_support::write_flat_nodes_degrees;
use std::io;
use tempfile::TempDir;

/// Nodes 42 and 99 placed; every other slot below 100 unset.
pub(super) const SAMPLE_NODES: [(i64, f64, f64); 2] = [(42, 7.5, 48.2), (99, 3.0, 50.0)];

pub(super) struct FlatNodesFixture {
    _dir: TempDir,
    path: Utf8PathBuf,
    missing: Utf8PathBuf,
}

impl FlatNodesFixture {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        let path = root.join("nodes.bin");
        write_flat_nodes_degrees(path.as_std_path(), SAMPLE_NODES).expect("write flat nodes");
        Self {
            _dir: dir,
            path,
            missing: root.join("absent.bin"),
        }
    }

    pub(super) fn path(&self) -> &Utf8PathBuf {
        &self.path
    }

    pub(super) fn missing(&self) -> &Utf8PathBuf {
        &self.missing
    }
}

/// Captured result of one `execute` call.
#[derive(Debug)]
pub(super) struct Invocation {
    pub(super) result: Result<(), CliError>,
    pub(super) stdout: String,
    pub(super) stderr: String,
}

pub(super) fn invoke(args: LookupArgs, input: &str) -> Invocation {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = execute(args, "get-lonlat", input.as_bytes(), &mut stdout, &mut stderr);
    Invocation {
        result,
        stdout: String::from_utf8(stdout).expect("stdout is UTF-8"),
        stderr: String::from_utf8(stderr).expect("stderr is UTF-8"),
    }
}

pub(super) fn args_for(path: &Utf8PathBuf) -> LookupArgs {
    LookupArgs {
        flatnodes_file: Some(path.clone()),
        ..LookupArgs::default()
    }
}

/// Writer whose reader has gone away.
pub(super) struct ClosedPipe;

impl io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

pub(super) const USAGE: &str = "Usage: get-lonlat [flatnodes_file]\n\
                                \tThen write one {osm_id} per input line,\n\
                                \tWill print one-line results: {lon};{lat};{osm_id}\n";
