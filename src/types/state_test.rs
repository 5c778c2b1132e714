//! Tests for `State`.

use super::State;

#[test]
fn set_and_get_typed() {
  let mut s = State::new();
  s.set("count", 3i64);
  assert_eq!(s.get::<i64>("count"), Some(&3));
  assert!(s.has("count"));
}

#[test]
fn get_with_wrong_type_is_none() {
  let mut s = State::new();
  s.set("count", 3i64);
  assert_eq!(s.get::<String>("count"), None);
}

#[test]
fn get_or_falls_back_to_default() {
  let s = State::new();
  assert_eq!(s.get_or::<i64>("missing", 42), 42);
}

#[test]
fn set_overwrites_and_delete_removes() {
  let mut s = State::new();
  s.set("k", 1i64);
  s.set("k", 2i64);
  assert_eq!(s.get::<i64>("k"), Some(&2));
  s.delete("k");
  assert!(s.is_empty());
}
