//! A port: a named, directed endpoint with a signal buffer and outbound pipes.

use tracing::trace;

use crate::errors::MeshError;
use crate::hooks::PortHooks;

use super::labels::Labels;
use super::pipe::PipeTarget;
use super::signal::Signal;
use super::signal_group::SignalGroup;

/// Port direction. Must be set before the port can take part in a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
  In,
  Out,
}

impl std::fmt::Display for PortDirection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PortDirection::In => write!(f, "in"),
      PortDirection::Out => write!(f, "out"),
    }
  }
}

/// Named endpoint on a component: direction, signal buffer, outbound pipe
/// list (output ports only), labels, description, parent-component back
/// reference (by name, never owning) and a hook set.
#[derive(Debug, Clone)]
pub struct Port {
  name: String,
  direction: Option<PortDirection>,
  description: String,
  buffer: SignalGroup,
  pipes: Vec<PipeTarget>,
  labels: Labels,
  parent_component: Option<String>,
  hooks: PortHooks,
  chainable_err: Option<MeshError>,
}

impl Port {
  /// Creates a port with no direction yet.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      direction: None,
      description: String::new(),
      buffer: SignalGroup::new(),
      pipes: Vec::new(),
      labels: Labels::new(),
      parent_component: None,
      hooks: PortHooks::default(),
      chainable_err: None,
    }
  }

  /// Creates an input port.
  pub fn new_input(name: impl Into<String>) -> Self {
    let mut port = Self::new(name);
    port.direction = Some(PortDirection::In);
    port
  }

  /// Creates an output port.
  pub fn new_output(name: impl Into<String>) -> Self {
    let mut port = Self::new(name);
    port.direction = Some(PortDirection::Out);
    port
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.description = description.into();
    self
  }

  pub fn with_labels(mut self, labels: Labels) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.labels = labels;
    self
  }

  pub fn add_label(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.labels.set(key, value);
    self
  }

  /// Appends signals to the buffer, then fires `on_signals_added` with the
  /// number of signals added. A hook failure poisons the port.
  pub fn put_signals(&mut self, signals: impl IntoIterator<Item = Signal>) -> &mut Self {
    if self.chainable_err.is_some() {
      return self;
    }
    let added = self.buffer.append(signals);
    trace!(port = %self.name, added, "signals added to port");
    let hooks = self.hooks.clone();
    if let Err(e) = hooks.on_signals_added.trigger(self, added) {
      self.chainable_err = Some(MeshError::HookFailed {
        phase: "on_signals_added",
        details: e.to_string(),
      });
    }
    self
  }

  /// Empties the buffer, then fires `on_clear` with the number of signals
  /// cleared. A hook failure poisons the port.
  pub fn clear(&mut self) -> &mut Self {
    if self.chainable_err.is_some() {
      return self;
    }
    let cleared = self.buffer.take_all().len();
    trace!(port = %self.name, cleared, "port cleared");
    let hooks = self.hooks.clone();
    if let Err(e) = hooks.on_clear.trigger(self, cleared) {
      self.chainable_err = Some(MeshError::HookFailed {
        phase: "on_clear",
        details: e.to_string(),
      });
    }
    self
  }

  /// Pipes this output port to the given input ports. Both directions are
  /// validated before any mutation; each destination must already be attached
  /// to a component so the pipe can record its address. Any failure poisons
  /// this port, including failures of the inbound/outbound pipe hooks.
  pub fn pipe_to<'a>(&mut self, dests: impl IntoIterator<Item = &'a mut Port>) -> &mut Self {
    for dest in dests {
      if self.chainable_err.is_some() {
        return self;
      }
      if let Err(e) = self.validate_pipe(dest) {
        self.chainable_err = Some(e);
        return self;
      }
      let component = dest
        .parent_component
        .clone()
        .unwrap_or_default();
      self.pipes.push(PipeTarget::new(component, dest.name.clone()));
      trace!(from = %self.name, to = %dest.name, "pipe created");

      let src_hooks = self.hooks.clone();
      let dest_hooks = dest.hooks.clone();
      let hook_outcome = src_hooks
        .on_outbound_pipe
        .trigger(self, dest)
        .and_then(|()| dest_hooks.on_inbound_pipe.trigger(self, dest));
      if let Err(e) = hook_outcome {
        self.chainable_err = Some(MeshError::HookFailed {
          phase: "on_pipe",
          details: e.to_string(),
        });
        return self;
      }
    }
    self
  }

  fn validate_pipe(&self, dest: &Port) -> Result<(), MeshError> {
    if dest.name.is_empty() {
      return Err(MeshError::NilPort {
        port: self.name.clone(),
      });
    }
    if self.direction != Some(PortDirection::Out) || dest.direction != Some(PortDirection::In) {
      return Err(MeshError::InvalidPipeDirection {
        from: self.name.clone(),
        to: dest.name.clone(),
      });
    }
    if dest.parent_component.is_none() {
      return Err(MeshError::PortNotAttached {
        port: dest.name.clone(),
      });
    }
    Ok(())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn direction(&self) -> Option<PortDirection> {
    self.direction
  }

  pub fn labels(&self) -> &Labels {
    &self.labels
  }

  pub fn buffer(&self) -> &SignalGroup {
    &self.buffer
  }

  pub fn signals(&self) -> &[Signal] {
    self.buffer.signals()
  }

  pub fn pipes(&self) -> &[PipeTarget] {
    &self.pipes
  }

  pub fn has_signals(&self) -> bool {
    !self.buffer.is_empty()
  }

  pub fn has_pipes(&self) -> bool {
    !self.pipes.is_empty()
  }

  pub fn parent_component(&self) -> Option<&str> {
    self.parent_component.as_deref()
  }

  /// Hook registration point.
  pub fn hooks_mut(&mut self) -> &mut PortHooks {
    &mut self.hooks
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

  pub(crate) fn set_direction_if_unset(&mut self, direction: PortDirection) {
    if self.direction.is_none() {
      self.direction = Some(direction);
    }
  }

  pub(crate) fn set_parent_component(&mut self, component: impl Into<String>) {
    self.parent_component = Some(component.into());
  }

  pub(crate) fn merge_default_labels(&mut self, defaults: &Labels) {
    self.labels.merge_defaults(defaults);
  }

  /// Appends clones of the group's signals to the buffer without firing
  /// `on_signals_added`; a poisoned source group poisons this port instead.
  pub(crate) fn append_buffer(&mut self, group: &SignalGroup) {
    if let Some(err) = group.chainable_err() {
      self.chainable_err = Some(err.clone());
      return;
    }
    self.buffer.append(group.signals().iter().cloned());
  }
}

/// Copies all signals from `src` to `dst` without mutating `src`. A poisoned
/// source buffer propagates through the destination's chainable error.
pub fn forward_signals(src: &Port, dst: &mut Port) {
  dst.append_buffer(src.buffer());
}

/// Like [forward_signals], but only signals matching the predicate transfer.
pub fn forward_with_filter(src: &Port, dst: &mut Port, pred: impl Fn(&Signal) -> bool) {
  let filtered = src.buffer().clone().filter(pred);
  dst.append_buffer(&filtered);
}

/// Like [forward_signals], but each signal passes through the mapper.
pub fn forward_with_map(src: &Port, dst: &mut Port, f: impl Fn(Signal) -> Signal) {
  let mapped = src.buffer().clone().map(f);
  dst.append_buffer(&mapped);
}
