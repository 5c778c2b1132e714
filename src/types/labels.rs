//! Key/value tags attached to ports and components.

use std::collections::HashMap;

/// String key/value tags with any/all/equality queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
  labels: HashMap<String, String>,
}

impl Labels {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_pairs<K, V, I>(pairs: I) -> Self
  where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
  {
    Self {
      labels: pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.labels.insert(key.into(), value.into());
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.labels.get(key).map(String::as_str)
  }

  pub fn delete(&mut self, key: &str) {
    self.labels.remove(key);
  }

  pub fn has_label(&self, key: &str) -> bool {
    self.labels.contains_key(key)
  }

  pub fn has_all_labels<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> bool {
    keys.into_iter().all(|k| self.has_label(k))
  }

  pub fn has_any_label<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> bool {
    keys.into_iter().any(|k| self.has_label(k))
  }

  /// True when the label exists with exactly the given value.
  pub fn label_is(&self, key: &str, value: &str) -> bool {
    self.get(key) == Some(value)
  }

  /// Copies entries from `other`, keeping existing values on key conflicts.
  pub fn merge_defaults(&mut self, other: &Labels) {
    for (k, v) in &other.labels {
      self.labels.entry(k.clone()).or_insert_with(|| v.clone());
    }
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }
}
