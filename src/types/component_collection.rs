//! Name-indexed registry of a mesh's components.

use std::collections::HashMap;

use crate::errors::MeshError;

use super::component::Component;

/// The mesh's component registry. Adding a component under an existing name
/// replaces it.
#[derive(Debug, Default)]
pub struct ComponentCollection {
  components: HashMap<String, Component>,
}

impl ComponentCollection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, component: Component) {
    self.components.insert(component.name().to_string(), component);
  }

  pub fn by_name(&self, name: &str) -> Result<&Component, MeshError> {
    self
      .components
      .get(name)
      .ok_or_else(|| MeshError::ComponentNotFoundInCollection {
        component: name.to_string(),
      })
  }

  pub fn by_name_mut(&mut self, name: &str) -> Result<&mut Component, MeshError> {
    self
      .components
      .get_mut(name)
      .ok_or_else(|| MeshError::ComponentNotFoundInCollection {
        component: name.to_string(),
      })
  }

  pub fn contains(&self, name: &str) -> bool {
    self.components.contains_key(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Component)> {
    self.components.iter().map(|(n, c)| (n.as_str(), c))
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Component)> {
    self.components.iter_mut().map(|(n, c)| (n.as_str(), c))
  }

  pub fn names(&self) -> Vec<&str> {
    self.components.keys().map(String::as_str).collect()
  }

  pub fn len(&self) -> usize {
    self.components.len()
  }

  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }

  /// Moves every component out, for the per-cycle task fan-out.
  pub(crate) fn take_all(&mut self) -> Vec<(String, Component)> {
    self.components.drain().collect()
  }
}
