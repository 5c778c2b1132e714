//! Tests for `ActivationResultCollection`.

use crate::errors::MeshError;

use super::{ActivationResult, ActivationResultCollection};

fn collection_with(results: Vec<ActivationResult>) -> ActivationResultCollection {
  let mut c = ActivationResultCollection::new();
  for r in results {
    c.add(r);
  }
  c
}

#[test]
fn aggregate_queries_over_mixed_results() {
  let c = collection_with(vec![
    ActivationResult::ok("a"),
    ActivationResult::no_input("b"),
    ActivationResult::returned_error("c", "bad".into()),
    ActivationResult::panicked("d", "boom"),
  ]);
  assert!(c.has_activated_components());
  assert!(c.has_activation_errors());
  assert!(c.has_activation_panics());
  assert_eq!(c.len(), 4);
}

#[test]
fn no_errors_means_empty_aggregates() {
  let c = collection_with(vec![ActivationResult::ok("a"), ActivationResult::no_input("b")]);
  assert!(!c.has_activation_errors());
  assert!(!c.has_activation_panics());
  assert!(c.all_errors_combined().is_none());
  assert!(c.all_panics_combined().is_none());
}

#[test]
fn combined_errors_name_every_component() {
  let c = collection_with(vec![
    ActivationResult::returned_error("z", "late".into()),
    ActivationResult::returned_error("a", "early".into()),
  ]);
  let combined = c.all_errors_combined().unwrap();
  assert!(combined.contains("a: early"));
  assert!(combined.contains("z: late"));
}

#[test]
fn add_replaces_by_component_name() {
  let c = collection_with(vec![
    ActivationResult::no_input("a"),
    ActivationResult::ok("a"),
  ]);
  assert_eq!(c.len(), 1);
  assert!(c.by_component_name("a").unwrap().activated());
}

#[test]
fn first_chainable_err_finds_a_marked_result() {
  let c = collection_with(vec![
    ActivationResult::ok("a"),
    ActivationResult::ok("b").with_chainable_err(MeshError::NoCyclesInGroup),
  ]);
  assert!(matches!(
    c.first_chainable_err(),
    Some(MeshError::NoCyclesInGroup)
  ));
}
