//! Property-based tests for filtering and border-node resolution.
//!
//! # Invariants tested
//!
//! - **Exhaustive batching:** batches partition the pending list in order.
//! - **Reorder tolerance:** resolved coordinates do not depend on the order
//!   or batching of lookup results.
//! - **Points skip lookups:** point-only input never calls the lookup.
//! - **Untagged input is inert:** elements without a name yield nothing.

use std::num::NonZeroUsize;

use catchment_core::resolve::batches;
use catchment_core::test_support::RecordingBorderNodeLookup;
use catchment_core::{
    ChainMatcher, NodeCoordinate, NodeId, RawElement, filter_entities, resolve_entities,
};
use geo::Coord;
use proptest::prelude::*;

fn batch_size() -> impl Strategy<Value = NonZeroUsize> {
    (1_usize..=150).prop_map(|size| NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN))
}

/// Polygon outlets with distinct ids and distinct first border nodes, paired
/// with the coordinate each border node resolves to.
fn polygon_outlets() -> impl Strategy<Value = Vec<(RawElement, NodeCoordinate)>> {
    prop::collection::btree_set(1_u64..1_000_000, 0..250).prop_flat_map(|nodes| {
        let count = nodes.len();
        (
            Just(nodes.into_iter().collect::<Vec<_>>()),
            prop::collection::vec((-80.0_f64..80.0, -170.0_f64..170.0), count),
        )
            .prop_map(|(nodes, coords)| {
                nodes
                    .into_iter()
                    .zip(coords)
                    .enumerate()
                    .map(|(index, (node, (lat, lon)))| {
                        let id = u64::try_from(index).unwrap_or(u64::MAX);
                        let element = RawElement::polygon(id, [node, node + 1])
                            .with_name(format!("Countdown {index}"));
                        (element, NodeCoordinate::new(node, lat, lon))
                    })
                    .collect()
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: concatenating the batches yields the pending list unchanged,
    /// and every batch but the last is full.
    #[test]
    fn batching_is_exhaustive(
        nodes in prop::collection::vec(any::<u64>().prop_map(NodeId), 0..600),
        size in batch_size(),
    ) {
        let split: Vec<&[NodeId]> = batches(&nodes, size).collect();

        prop_assert_eq!(split.len(), nodes.len().div_ceil(size.get()));
        prop_assert!(split.iter().all(|batch| !batch.is_empty() && batch.len() <= size.get()));
        if let Some((_, full)) = split.split_last() {
            prop_assert!(full.iter().all(|batch| batch.len() == size.get()));
        }
        let rejoined: Vec<NodeId> = split.concat();
        prop_assert_eq!(rejoined, nodes);
    }

    /// Property: each polygon entity resolves to the coordinate of its own
    /// first border node whatever order the service answers in.
    #[test]
    fn resolution_tolerates_reordered_results(
        (outlets, shuffled) in polygon_outlets().prop_flat_map(|outlets| {
            let results: Vec<NodeCoordinate> = outlets.iter().map(|(_, r)| *r).collect();
            (Just(outlets), Just(results).prop_shuffle())
        }),
        size in batch_size(),
    ) {
        let elements: Vec<RawElement> = outlets.iter().map(|(e, _)| e.clone()).collect();
        let outcome = filter_entities(&elements, &ChainMatcher::new(["countdown"]));
        let lookup = RecordingBorderNodeLookup::with_batches([shuffled]);

        let resolution = resolve_entities(outcome.entities, &lookup, size)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert!(resolution.unresolved.is_empty());
        prop_assert_eq!(resolution.entities.len(), outlets.len());
        for (entity, (element, expected)) in resolution.entities.iter().zip(&outlets) {
            prop_assert_eq!(entity.id, element.id);
            prop_assert_eq!(entity.location, expected.location);
        }
    }

    /// Property: point-only input resolves without any lookup request.
    #[test]
    fn points_never_trigger_lookups(
        coords in prop::collection::vec((-80.0_f64..80.0, -170.0_f64..170.0), 0..100),
        size in batch_size(),
    ) {
        let elements: Vec<RawElement> = coords
            .iter()
            .zip(0_u64..)
            .map(|(&(lat, lon), id)| RawElement::point(id, lat, lon).with_name("New World"))
            .collect();
        let outcome = filter_entities(&elements, &ChainMatcher::new(["New World"]));
        let lookup = RecordingBorderNodeLookup::default();

        let resolution = resolve_entities(outcome.entities, &lookup, size)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert!(lookup.requests().is_empty());
        let resolved: Vec<Coord<f64>> = resolution.entities.iter().map(|e| e.location).collect();
        let expected: Vec<Coord<f64>> =
            coords.iter().map(|&(lat, lon)| Coord { x: lon, y: lat }).collect();
        prop_assert_eq!(resolved, expected);
    }

    /// Property: elements without a name tag never become entities or
    /// diagnostics, whatever their geometry.
    #[test]
    fn untagged_elements_are_ignored(
        ids in prop::collection::btree_set(any::<u64>(), 0..100),
        polygon in any::<bool>(),
    ) {
        let elements: Vec<RawElement> = ids
            .iter()
            .map(|&id| {
                if polygon {
                    RawElement::polygon(id, [id])
                } else {
                    RawElement::point(id, -36.88, 174.76).with_tag("shop", "supermarket")
                }
            })
            .collect();

        let outcome = filter_entities(&elements, &ChainMatcher::new(["countdown", "shop"]));

        prop_assert!(outcome.entities.is_empty());
        prop_assert!(outcome.diagnostics.is_empty());
    }
}
