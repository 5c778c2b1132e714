//! Tests for `ComponentCollection`.

use crate::errors::MeshError;

use super::{Component, ComponentCollection};

#[test]
fn by_name_missing_returns_not_found() {
  let c = ComponentCollection::new();
  assert!(matches!(
    c.by_name("ghost").unwrap_err(),
    MeshError::ComponentNotFoundInCollection { .. }
  ));
}

#[test]
fn by_name_mut_missing_returns_not_found() {
  let mut c = ComponentCollection::new();
  assert!(matches!(
    c.by_name_mut("ghost").unwrap_err(),
    MeshError::ComponentNotFoundInCollection { .. }
  ));
}

#[test]
fn add_registers_and_lookups_find_it() {
  let mut c = ComponentCollection::new();
  c.add(Component::new("a"));
  assert!(c.contains("a"));
  assert!(!c.contains("b"));
  assert_eq!(c.by_name("a").unwrap().name(), "a");
  assert_eq!(c.len(), 1);
}

#[test]
fn add_replaces_an_existing_name() {
  let mut c = ComponentCollection::new();
  c.add(Component::new("a").with_description("first"));
  c.add(Component::new("a").with_description("second"));
  assert_eq!(c.len(), 1);
  assert_eq!(c.by_name("a").unwrap().description(), "second");
}

#[test]
fn take_all_drains_the_collection() {
  let mut c = ComponentCollection::new();
  c.add(Component::new("a"));
  c.add(Component::new("b"));

  let mut taken = c.take_all();
  assert_eq!(taken.len(), 2);
  assert!(c.is_empty());

  taken.sort_by(|(a, _), (b, _)| a.cmp(b));
  assert_eq!(taken[0].0, "a");
  assert_eq!(taken[1].0, "b");

  // Reinserting restores every lookup, mirroring the per-cycle fan-out.
  for (_, component) in taken {
    c.add(component);
  }
  assert_eq!(c.len(), 2);
  assert!(c.by_name("a").is_ok());
  assert!(c.by_name("b").is_ok());
}

#[test]
fn names_lists_every_registered_component() {
  let mut c = ComponentCollection::new();
  c.add(Component::new("a"));
  c.add(Component::new("b"));
  let mut names = c.names();
  names.sort_unstable();
  assert_eq!(names, vec!["a", "b"]);
}
