//! A component: a named processing node with ports, state and an activation
//! function.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::errors::{ActivationError, MeshError, WaitForInputs, panic_message};
use crate::hooks::{ComponentHooks, HookOutcome};

use super::activation_result::ActivationResult;
use super::labels::Labels;
use super::port::{Port, PortDirection};
use super::port_collection::PortCollection;
use super::state::State;

/// User-supplied activation function. Receives the component itself, reads
/// inputs, writes outputs and state, and returns an error on failure. Runs
/// synchronously; one invocation per cycle at most.
pub type ActivationFunc = Arc<dyn Fn(&mut Component) -> Result<(), ActivationError> + Send + Sync>;

/// Named processing node. Owns its input/output port collections and state
/// bag; refers back to its mesh by name only.
pub struct Component {
  name: String,
  description: String,
  inputs: PortCollection,
  outputs: PortCollection,
  activation_func: Option<ActivationFunc>,
  state: State,
  labels: Labels,
  hooks: ComponentHooks,
  parent_mesh: Option<String>,
  chainable_err: Option<MeshError>,
}

impl Component {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      description: String::new(),
      inputs: PortCollection::new().with_default_direction(PortDirection::In),
      outputs: PortCollection::new().with_default_direction(PortDirection::Out),
      activation_func: None,
      state: State::new(),
      labels: Labels::new(),
      hooks: ComponentHooks::default(),
      parent_mesh: None,
      chainable_err: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.description = description.into();
    self
  }

  /// Adds input ports by name.
  pub fn add_inputs<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
    let ports: Vec<Port> = names.into_iter().map(|n| Port::new(n.into())).collect();
    self.attach_input_ports(ports)
  }

  /// Adds output ports by name.
  pub fn add_outputs<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
    let ports: Vec<Port> = names.into_iter().map(|n| Port::new(n.into())).collect();
    self.attach_output_ports(ports)
  }

  /// Attaches pre-configured input ports. The collection's own chainable
  /// error, or the first error carried by an attached port, poisons the
  /// component.
  pub fn attach_input_ports(mut self, ports: impl IntoIterator<Item = Port>) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.inputs = std::mem::take(&mut self.inputs).with(ports);
    self.inputs.set_parent_component(&self.name);
    if let Some(err) = self
      .inputs
      .chainable_err()
      .or_else(|| self.inputs.first_port_err())
    {
      self.chainable_err = Some(err.clone());
    }
    self
  }

  /// Attaches pre-configured output ports.
  pub fn attach_output_ports(mut self, ports: impl IntoIterator<Item = Port>) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.outputs = std::mem::take(&mut self.outputs).with(ports);
    self.outputs.set_parent_component(&self.name);
    if let Some(err) = self
      .outputs
      .chainable_err()
      .or_else(|| self.outputs.first_port_err())
    {
      self.chainable_err = Some(err.clone());
    }
    self
  }

  /// Adds input ports named `prefix{i}` for `i` in `[from, to]`.
  pub fn add_indexed_inputs(mut self, prefix: &str, from: usize, to: usize) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.inputs = std::mem::take(&mut self.inputs).with_indexed(prefix, from, to);
    self.inputs.set_parent_component(&self.name);
    if let Some(err) = self.inputs.chainable_err() {
      self.chainable_err = Some(err.clone());
    }
    self
  }

  /// Adds output ports named `prefix{i}` for `i` in `[from, to]`.
  pub fn add_indexed_outputs(mut self, prefix: &str, from: usize, to: usize) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.outputs = std::mem::take(&mut self.outputs).with_indexed(prefix, from, to);
    self.outputs.set_parent_component(&self.name);
    if let Some(err) = self.outputs.chainable_err() {
      self.chainable_err = Some(err.clone());
    }
    self
  }

  /// Adds one input port in place. Legal on an already registered component
  /// up to the moment the mesh runs.
  pub fn add_input_port(&mut self, port: Port) -> &mut Self {
    self.inputs.add(port);
    self.inputs.set_parent_component(&self.name);
    self
  }

  /// Adds one output port in place.
  pub fn add_output_port(&mut self, port: Port) -> &mut Self {
    self.outputs.add(port);
    self.outputs.set_parent_component(&self.name);
    self
  }

  pub fn with_activation_func(
    mut self,
    func: impl Fn(&mut Component) -> Result<(), ActivationError> + Send + Sync + 'static,
  ) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.activation_func = Some(Arc::new(func));
    self
  }

  /// Seeds the state bag. The state persists across cycles and runs.
  pub fn with_initial_state(mut self, init: impl FnOnce(&mut State)) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    init(&mut self.state);
    self
  }

  pub fn with_labels(mut self, labels: Labels) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.labels = labels;
    self
  }

  /// Registers component-level hooks. May be called repeatedly; hooks
  /// accumulate in registration order.
  pub fn setup_hooks(mut self, configure: impl FnOnce(&mut ComponentHooks)) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    configure(&mut self.hooks);
    self
  }

  /// Decides whether to run the activation function this cycle, runs it
  /// under a panic guard, and classifies the outcome.
  ///
  /// A component with no function or with no buffered input signals does not
  /// activate. The [WaitForInputs] sentinel maps to the waiting codes and
  /// counts as not activated. Hook failures never change the outcome; the
  /// first one is carried on the result's chainable error.
  pub fn maybe_activate(&mut self) -> ActivationResult {
    let name = self.name.clone();
    let Some(func) = self.activation_func.clone() else {
      trace!(component = %name, "skipping activation: no function");
      return ActivationResult::no_function(name);
    };
    if !self.inputs.any_has_signals() {
      trace!(component = %name, "skipping activation: no input");
      return ActivationResult::no_input(name);
    }

    let hooks = self.hooks.clone();
    let mut hook_err: Option<MeshError> = None;
    record_hook_err(
      &mut hook_err,
      hooks.before_activation.trigger(self),
      "before_activation",
    );

    let outcome = catch_unwind(AssertUnwindSafe(|| func(self)));
    let result = match outcome {
      Err(payload) => {
        let message = panic_message(payload);
        warn!(component = %name, panic = %message, "activation panicked");
        let result = ActivationResult::panicked(name, message);
        record_hook_err(&mut hook_err, hooks.on_panic.trigger(self, &result), "on_panic");
        result
      }
      Ok(Err(err)) => match err.downcast::<WaitForInputs>() {
        Ok(wait) => {
          debug!(component = %name, keep_inputs = wait.keep_inputs, "waiting for more inputs");
          ActivationResult::waiting_for_inputs(name, wait.keep_inputs)
        }
        Err(err) => {
          debug!(component = %name, error = %err, "activation returned an error");
          let result = ActivationResult::returned_error(name, err);
          record_hook_err(&mut hook_err, hooks.on_error.trigger(self, &result), "on_error");
          result
        }
      },
      Ok(Ok(())) => {
        let result = ActivationResult::ok(name);
        record_hook_err(&mut hook_err, hooks.on_success.trigger(self, &result), "on_success");
        result
      }
    };
    record_hook_err(
      &mut hook_err,
      hooks.after_activation.trigger(self, &result),
      "after_activation",
    );
    match hook_err {
      Some(err) => result.with_chainable_err(err),
      None => result,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn inputs(&self) -> &PortCollection {
    &self.inputs
  }

  pub fn inputs_mut(&mut self) -> &mut PortCollection {
    &mut self.inputs
  }

  pub fn outputs(&self) -> &PortCollection {
    &self.outputs
  }

  pub fn outputs_mut(&mut self) -> &mut PortCollection {
    &mut self.outputs
  }

  pub fn input_by_name(&self, name: &str) -> Result<&Port, MeshError> {
    self.inputs.by_name(name)
  }

  pub fn input_by_name_mut(&mut self, name: &str) -> Result<&mut Port, MeshError> {
    self.inputs.by_name_mut(name)
  }

  pub fn output_by_name(&self, name: &str) -> Result<&Port, MeshError> {
    self.outputs.by_name(name)
  }

  pub fn output_by_name_mut(&mut self, name: &str) -> Result<&mut Port, MeshError> {
    self.outputs.by_name_mut(name)
  }

  pub fn state(&self) -> &State {
    &self.state
  }

  pub fn state_mut(&mut self) -> &mut State {
    &mut self.state
  }

  pub fn labels(&self) -> &Labels {
    &self.labels
  }

  pub fn has_activation_func(&self) -> bool {
    self.activation_func.is_some()
  }

  pub fn parent_mesh(&self) -> Option<&str> {
    self.parent_mesh.as_deref()
  }

  pub(crate) fn set_parent_mesh(&mut self, mesh: impl Into<String>) {
    self.parent_mesh = Some(mesh.into());
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

impl std::fmt::Debug for Component {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Component")
      .field("name", &self.name)
      .field("inputs", &self.inputs.names())
      .field("outputs", &self.outputs.names())
      .field("has_activation_func", &self.activation_func.is_some())
      .field("chainable_err", &self.chainable_err)
      .finish()
  }
}

/// Keeps the first hook failure of an activation, in firing order.
fn record_hook_err(slot: &mut Option<MeshError>, outcome: HookOutcome, phase: &'static str) {
  if let Err(e) = outcome {
    if slot.is_none() {
      *slot = Some(MeshError::HookFailed {
        phase,
        details: e.to_string(),
      });
    }
  }
}
