//! A name-indexed collection of ports with bulk operations.

use std::collections::HashMap;

use crate::errors::MeshError;

use super::labels::Labels;
use super::port::{Port, PortDirection};
use super::signal::Signal;
use super::signal_group::SignalGroup;

/// Name-indexed map of ports. A collection can carry a default direction and
/// default labels, both applied to ports as they are inserted. Iteration
/// order across ports is unspecified; order within a port is insertion order.
#[derive(Debug, Clone, Default)]
pub struct PortCollection {
  ports: HashMap<String, Port>,
  default_direction: Option<PortDirection>,
  default_labels: Labels,
  chainable_err: Option<MeshError>,
}

impl PortCollection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Ports inserted later get this direction unless they already have one.
  pub fn with_default_direction(mut self, direction: PortDirection) -> Self {
    self.default_direction = Some(direction);
    self
  }

  /// Ports inserted later get these labels, keeping their own on conflicts.
  pub fn with_default_labels(mut self, labels: Labels) -> Self {
    self.default_labels = labels;
    self
  }

  /// Returns the collection with the given ports inserted. A port with an
  /// empty name poisons the collection.
  pub fn with(mut self, ports: impl IntoIterator<Item = Port>) -> Self {
    for port in ports {
      self.add(port);
    }
    self
  }

  /// Inserts one port in place, applying the collection defaults.
  pub fn add(&mut self, mut port: Port) -> &mut Self {
    if self.chainable_err.is_some() {
      return self;
    }
    if port.name().is_empty() {
      self.chainable_err = Some(MeshError::NilPort {
        port: String::new(),
      });
      return self;
    }
    if let Some(direction) = self.default_direction {
      port.set_direction_if_unset(direction);
    }
    port.merge_default_labels(&self.default_labels);
    self.ports.insert(port.name().to_string(), port);
    self
  }

  /// Creates ports named `prefix{i}` for `i` in `[from, to]`.
  pub fn with_indexed(self, prefix: &str, from: usize, to: usize) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    if from > to {
      return self.with_chainable_err(MeshError::InvalidRangeForIndexedGroup { from, to });
    }
    self.with((from..=to).map(|i| Port::new(format!("{prefix}{i}"))))
  }

  pub fn by_name(&self, name: &str) -> Result<&Port, MeshError> {
    self
      .ports
      .get(name)
      .ok_or_else(|| MeshError::PortNotFoundInCollection {
        port: name.to_string(),
      })
  }

  pub fn by_name_mut(&mut self, name: &str) -> Result<&mut Port, MeshError> {
    self
      .ports
      .get_mut(name)
      .ok_or_else(|| MeshError::PortNotFoundInCollection {
        port: name.to_string(),
      })
  }

  /// The named ports, in the order the names are given.
  pub fn by_names<'a>(
    &self,
    names: impl IntoIterator<Item = &'a str>,
  ) -> Result<Vec<&Port>, MeshError> {
    names.into_iter().map(|n| self.by_name(n)).collect()
  }

  /// Fans the given signals into every port in the collection.
  pub fn put_signals(&mut self, signals: &[Signal]) -> &mut Self {
    if self.chainable_err.is_some() {
      return self;
    }
    for port in self.ports.values_mut() {
      port.put_signals(signals.iter().cloned());
    }
    self
  }

  /// Clears every port in the collection.
  pub fn clear(&mut self) -> &mut Self {
    for port in self.ports.values_mut() {
      port.clear();
    }
    self
  }

  /// Pipes every port in the collection to every destination.
  pub fn pipe_to(&mut self, mut dests: Vec<&mut Port>) -> &mut Self {
    if self.chainable_err.is_some() {
      return self;
    }
    for port in self.ports.values_mut() {
      for dest in dests.iter_mut() {
        port.pipe_to([&mut **dest]);
      }
    }
    self
  }

  pub fn any_has_signals(&self) -> bool {
    self.ports.values().any(Port::has_signals)
  }

  pub fn all_have_signals(&self) -> bool {
    self.ports.values().all(Port::has_signals)
  }

  /// Concatenation of all buffers. Order across ports is unspecified.
  pub fn signals(&self) -> SignalGroup {
    let mut group = SignalGroup::new();
    for port in self.ports.values() {
      group.append(port.signals().iter().cloned());
    }
    group
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Port)> {
    self.ports.iter().map(|(n, p)| (n.as_str(), p))
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Port> {
    self.ports.values_mut()
  }

  pub fn names(&self) -> Vec<&str> {
    self.ports.keys().map(String::as_str).collect()
  }

  pub fn len(&self) -> usize {
    self.ports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ports.is_empty()
  }

  /// First port-level chainable error in the collection, if any.
  pub fn first_port_err(&self) -> Option<&MeshError> {
    self.ports.values().find_map(Port::chainable_err)
  }

  pub(crate) fn set_parent_component(&mut self, component: &str) {
    for port in self.ports.values_mut() {
      port.set_parent_component(component);
    }
  }

  pub fn has_chainable_err(&self) -> bool {
    self.chainable_err.is_some()
  }

  pub fn chainable_err(&self) -> Option<&MeshError> {
    self.chainable_err.as_ref()
  }

  pub fn with_chainable_err(mut self, err: MeshError) -> Self {
    self.chainable_err = Some(err);
    self
  }
}
