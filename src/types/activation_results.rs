//! Name-indexed activation results for one cycle, with aggregate queries.

use std::collections::HashMap;

use crate::errors::MeshError;

use super::activation_result::{ActivationCode, ActivationResult};

/// Per-cycle map from component name to its [ActivationResult]. Written once
/// per component when the cycle's tasks join; read-only afterwards.
#[derive(Debug, Default)]
pub struct ActivationResultCollection {
  results: HashMap<String, ActivationResult>,
}

impl ActivationResultCollection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, result: ActivationResult) {
    self.results.insert(result.component_name().to_string(), result);
  }

  pub fn by_component_name(&self, name: &str) -> Option<&ActivationResult> {
    self.results.get(name)
  }

  pub fn has_activation_errors(&self) -> bool {
    self.any_with_code(ActivationCode::ReturnedError)
  }

  pub fn has_activation_panics(&self) -> bool {
    self.any_with_code(ActivationCode::Panicked)
  }

  pub fn has_activated_components(&self) -> bool {
    self.results.values().any(ActivationResult::activated)
  }

  /// All activation errors joined into one message, by component.
  pub fn all_errors_combined(&self) -> Option<String> {
    self.combined(ActivationCode::ReturnedError)
  }

  /// All captured panics joined into one message, by component.
  pub fn all_panics_combined(&self) -> Option<String> {
    self.combined(ActivationCode::Panicked)
  }

  /// First result-level chainable error, if any. Which result wins is
  /// unspecified, matching the unspecified result ordering within a cycle.
  pub fn first_chainable_err(&self) -> Option<&MeshError> {
    self.results.values().find_map(ActivationResult::chainable_err)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivationResult)> {
    self.results.iter().map(|(n, r)| (n.as_str(), r))
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  fn any_with_code(&self, code: ActivationCode) -> bool {
    self.results.values().any(|r| r.code() == code)
  }

  fn combined(&self, code: ActivationCode) -> Option<String> {
    let mut parts: Vec<String> = self
      .results
      .values()
      .filter(|r| r.code() == code)
      .map(|r| {
        let detail = r
          .activation_error()
          .map(|e| e.to_string())
          .unwrap_or_else(|| "unknown error".to_string());
        format!("{}: {}", r.component_name(), detail)
      })
      .collect();
    if parts.is_empty() {
      return None;
    }
    parts.sort_unstable();
    Some(parts.join("; "))
  }
}
