//! Behavioural tests for the flat nodes store.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use nodeloc_core::{Coordinate, LocationStore, LookupFailure, NodeId};
use nodeloc_store::{FlatNodesError, FlatNodesStore, test_support::write_flat_nodes_degrees};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

struct Artefact {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl Artefact {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nodes.bin")).expect("utf-8 path");
        Self { _dir: dir, path }
    }
}

type LookupResult = Result<Coordinate, LookupFailure>;

#[fixture]
fn artefact() -> Artefact {
    Artefact::new()
}

#[fixture]
fn opened() -> RefCell<Option<Result<FlatNodesStore, FlatNodesError>>> {
    RefCell::new(None)
}

#[fixture]
fn lookup() -> RefCell<Option<(NodeId, LookupResult)>> {
    RefCell::new(None)
}

fn look_up(
    opened: &RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
    lookup: &RefCell<Option<(NodeId, LookupResult)>>,
    id: NodeId,
) {
    let result = opened
        .borrow()
        .as_ref()
        .expect("store open attempted")
        .as_ref()
        .expect("store opened")
        .lookup(id);
    *lookup.borrow_mut() = Some((id, result));
}

#[given("a flat nodes file holding nodes 42 and 99")]
fn given_sample_file(#[from(artefact)] artefact: &Artefact) {
    write_flat_nodes_degrees(
        artefact.path.as_std_path(),
        [(42, 7.5, 48.2), (99, 3.0, 50.0)],
    )
    .expect("persist flat nodes");
}

#[given("a flat nodes file with a partial trailing slot")]
fn given_partial_file(#[from(artefact)] artefact: &Artefact) {
    std::fs::write(&artefact.path, [0_u8; 20]).expect("write partial file");
}

#[when("the store is opened for reading and writing")]
fn when_opened(
    #[from(artefact)] artefact: &Artefact,
    #[from(opened)] opened: &RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
) {
    *opened.borrow_mut() = Some(FlatNodesStore::open(&artefact.path));
}

#[when("node 42 is looked up")]
fn when_lookup_stored(
    #[from(opened)] opened: &RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
    #[from(lookup)] lookup: &RefCell<Option<(NodeId, LookupResult)>>,
) {
    look_up(opened, lookup, NodeId::new(42));
}

#[when("node 1000 is looked up")]
fn when_lookup_beyond_end(
    #[from(opened)] opened: &RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
    #[from(lookup)] lookup: &RefCell<Option<(NodeId, LookupResult)>>,
) {
    look_up(opened, lookup, NodeId::new(1000));
}

#[then("the location 7.5;48.2 is returned")]
fn then_location(#[from(lookup)] lookup: &RefCell<Option<(NodeId, LookupResult)>>) {
    let borrowed = lookup.borrow();
    let (_, result) = borrowed.as_ref().expect("lookup performed");
    let coordinate = result.as_ref().expect("node resolves");
    assert_eq!(
        format!("{};{}", coordinate.lon(), coordinate.lat()),
        "7.5;48.2"
    );
}

#[then("the lookup reports the node as missing")]
fn then_missing(#[from(lookup)] lookup: &RefCell<Option<(NodeId, LookupResult)>>) {
    let borrowed = lookup.borrow();
    let (id, result) = borrowed.as_ref().expect("lookup performed");
    assert_eq!(result, &Err(LookupFailure::NotFound { id: *id }));
}

#[then("opening fails because of the partial slot")]
fn then_partial_slot(
    #[from(opened)] opened: &RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
) {
    let borrowed = opened.borrow();
    let result = borrowed.as_ref().expect("store open attempted");
    assert!(
        matches!(result, Err(FlatNodesError::TruncatedSlot { len: 20, .. })),
        "expected a truncated slot error, got {result:?}"
    );
}

#[scenario(path = "tests/features/flat_nodes_store.feature", index = 0)]
fn scenario_stored_node(
    artefact: Artefact,
    opened: RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
    lookup: RefCell<Option<(NodeId, LookupResult)>>,
) {
    let _ = (artefact, opened, lookup);
}

#[scenario(path = "tests/features/flat_nodes_store.feature", index = 1)]
fn scenario_missing_node(
    artefact: Artefact,
    opened: RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
    lookup: RefCell<Option<(NodeId, LookupResult)>>,
) {
    let _ = (artefact, opened, lookup);
}

#[scenario(path = "tests/features/flat_nodes_store.feature", index = 2)]
fn scenario_partial_slot(
    artefact: Artefact,
    opened: RefCell<Option<Result<FlatNodesStore, FlatNodesError>>>,
    lookup: RefCell<Option<(NodeId, LookupResult)>>,
) {
    let _ = (artefact, opened, lookup);
}
