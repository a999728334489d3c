//! Property-based tests for the resolution loop.
//!
//! # Invariants tested
//!
//! - **Order:** resolvable identifiers appear in input order, one line each.
//! - **Silence:** unresolvable identifiers leave no line behind.
//! - **Count:** output lines never outnumber input identifiers.
//! - **Idempotence:** repeated runs over the same store are byte-identical.

use std::collections::BTreeMap;

use nodeloc_core::{Coordinate, NodeId, ResolutionLoop, ResultLine, test_support::MemoryStore};
use proptest::prelude::*;

fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
    (-1_800_000_000_i32..=1_800_000_000, -900_000_000_i32..=900_000_000)
        .prop_map(|(x, y)| Coordinate::from_fixed(x, y))
}

fn store_strategy() -> impl Strategy<Value = BTreeMap<i64, Coordinate>> {
    prop::collection::btree_map(0_i64..64, coordinate_strategy(), 0..32)
}

fn input_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-8_i64..72, 0..48)
}

fn build_store(locations: &BTreeMap<i64, Coordinate>) -> MemoryStore {
    MemoryStore::with_locations(
        locations
            .iter()
            .map(|(id, coordinate)| (NodeId::new(*id), *coordinate)),
    )
}

fn render_input(ids: &[i64]) -> String {
    ids.iter().map(|id| format!("{id}\n")).collect()
}

fn resolve(locations: &BTreeMap<i64, Coordinate>, input: &str) -> String {
    let mut output = Vec::new();
    ResolutionLoop::new(build_store(locations))
        .run(input.as_bytes(), &mut output)
        .expect("in-memory run succeeds");
    String::from_utf8(output).expect("output is UTF-8")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: output is exactly the resolvable identifiers, in input order.
    #[test]
    fn output_follows_input_order(locations in store_strategy(), ids in input_strategy()) {
        let output = resolve(&locations, &render_input(&ids));
        let expected: String = ids
            .iter()
            .filter_map(|id| {
                let line = ResultLine::new(NodeId::new(*id), *locations.get(id)?);
                Some(format!("{line}\n"))
            })
            .collect();
        prop_assert_eq!(output, expected);
    }

    /// Property: every line names an identifier present in the store.
    #[test]
    fn unresolvable_identifiers_leave_no_line(
        locations in store_strategy(),
        ids in input_strategy(),
    ) {
        let output = resolve(&locations, &render_input(&ids));
        for line in output.lines() {
            let id: i64 = line
                .rsplit(';')
                .next()
                .and_then(|field| field.parse().ok())
                .expect("line ends with an identifier");
            prop_assert!(locations.contains_key(&id), "unexpected line {line}");
        }
    }

    /// Property: line count is bounded by the input, with equality iff all resolve.
    #[test]
    fn line_count_is_bounded(locations in store_strategy(), ids in input_strategy()) {
        let output = resolve(&locations, &render_input(&ids));
        let lines = output.lines().count();
        prop_assert!(lines <= ids.len());
        let all_resolve = ids.iter().all(|id| locations.contains_key(id));
        prop_assert_eq!(lines == ids.len(), all_resolve);
    }

    /// Property: two runs over the same store and input are byte-identical.
    #[test]
    fn runs_are_idempotent(locations in store_strategy(), ids in input_strategy()) {
        let input = render_input(&ids);
        prop_assert_eq!(resolve(&locations, &input), resolve(&locations, &input));
    }
}
