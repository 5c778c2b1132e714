//! Per-component state bag, persistent across cycles and runs.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// String-keyed opaque values private to one component. Only one activation
/// of a component is in flight at a time, so the bag needs no lock.
#[derive(Clone, Default)]
pub struct State {
  values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl State {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Any + Send + Sync) {
    self.values.insert(key.into(), Arc::new(value));
  }

  pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
    self.values.get(key).and_then(|v| v.downcast_ref::<T>())
  }

  /// The value for `key` downcast to `T`, or `default` when absent or mistyped.
  pub fn get_or<T: Clone + 'static>(&self, key: &str, default: T) -> T {
    self.get::<T>(key).cloned().unwrap_or(default)
  }

  pub fn has(&self, key: &str) -> bool {
    self.values.contains_key(key)
  }

  pub fn delete(&mut self, key: &str) {
    self.values.remove(key);
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl std::fmt::Debug for State {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
    keys.sort_unstable();
    f.debug_struct("State").field("keys", &keys).finish()
  }
}
