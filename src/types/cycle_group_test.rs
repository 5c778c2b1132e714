//! Tests for `Cycle` and `CycleGroup`.

use crate::errors::MeshError;

use super::{ActivationResult, Cycle, CycleGroup};

fn cycle_with_ok(number: usize) -> Cycle {
  let mut c = Cycle::new(number);
  c.results_mut().add(ActivationResult::ok("comp"));
  c
}

#[test]
fn last_of_empty_group_errors() {
  let g = CycleGroup::new();
  assert!(matches!(g.last().unwrap_err(), MeshError::NoCyclesInGroup));
  assert!(matches!(g.first().unwrap_err(), MeshError::NoCyclesInGroup));
}

#[test]
fn first_and_last_after_appends() {
  let mut g = CycleGroup::new();
  g.add(Cycle::new(1));
  g.add(cycle_with_ok(2));
  assert_eq!(g.len(), 2);
  assert_eq!(g.first().unwrap().number(), 1);
  assert_eq!(g.last().unwrap().number(), 2);
}

#[test]
fn filter_map_and_count_match() {
  let mut g = CycleGroup::new();
  g.add(Cycle::new(1));
  g.add(cycle_with_ok(2));
  g.add(cycle_with_ok(3));

  let active = g.filter(|c| c.has_activated_components());
  assert_eq!(active.len(), 2);
  assert_eq!(g.map(Cycle::number), vec![1, 2, 3]);
  assert_eq!(g.count_match(|c| c.number() % 2 == 1), 2);
}
