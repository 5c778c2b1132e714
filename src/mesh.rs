//! The mesh: top-level orchestrator driving activation cycles to quiescence.
//!
//! `Mesh::run` validates the topology, then loops: activate every ready
//! component concurrently, join, decide termination, drain signals along the
//! pipes. Signals only move during the drain, so no activation ever observes
//! another activation's output from the same cycle.

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ErrorHandlingStrategy, UNLIMITED_CYCLES};
use crate::errors::MeshError;
use crate::hooks::MeshHooks;
use crate::types::{
  ActivationCode, ActivationResult, Component, ComponentCollection, Cycle, PipeTarget,
  RuntimeInfo, SignalGroup,
};

/// Top-level runtime owner: components, config, hooks and the per-run
/// runtime info.
#[derive(Debug)]
pub struct Mesh {
  name: String,
  description: String,
  components: ComponentCollection,
  config: Config,
  hooks: MeshHooks,
  runtime: RuntimeInfo,
  chainable_err: Option<MeshError>,
}

impl Mesh {
  /// Creates a mesh with the default [Config].
  pub fn new(name: impl Into<String>) -> Self {
    Self::new_with_config(name, Config::default())
  }

  pub fn new_with_config(name: impl Into<String>, config: Config) -> Self {
    Self {
      name: name.into(),
      description: String::new(),
      components: ComponentCollection::new(),
      config,
      hooks: MeshHooks::default(),
      runtime: RuntimeInfo::new(),
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

  /// Registers components. Each acquires this mesh as its parent.
  pub fn add_components(mut self, components: impl IntoIterator<Item = Component>) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    for mut component in components {
      component.set_parent_mesh(self.name.clone());
      self.components.add(component);
    }
    self
  }

  /// Registers mesh-level hooks. May be called repeatedly; hooks accumulate
  /// in registration order.
  pub fn setup_hooks(mut self, configure: impl FnOnce(&mut MeshHooks)) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    configure(&mut self.hooks);
    self
  }

  /// Runs activation cycles until quiescence, a limit, or the configured
  /// error-handling strategy stops the run. The runtime info stays readable
  /// through [Mesh::runtime_info] on the error path too.
  pub async fn run(&mut self) -> Result<&RuntimeInfo, MeshError> {
    if let Some(err) = self.chainable_err.clone() {
      return Err(err);
    }
    info!(mesh = %self.name, components = self.components.len(), "mesh run starting");
    self.runtime = RuntimeInfo::new();
    self.runtime.mark_started();

    let mut run_err: Option<MeshError> = None;
    if let Err(e) = self.hooks.before_run.trigger(self) {
      let err = MeshError::HookFailed {
        phase: "before_run",
        details: e.to_string(),
      };
      self.chainable_err = Some(err.clone());
      run_err = Some(err);
    }

    if run_err.is_none() {
      if let Err(e) = self.validate() {
        error!(mesh = %self.name, error = %e, "mesh validation failed");
        self.chainable_err = Some(e.clone());
        run_err = Some(e);
      }
    }

    if run_err.is_none() {
      run_err = self.run_loop().await;
    }

    self.runtime.mark_stopped();
    if let Err(e) = self.hooks.after_run.trigger(self) {
      // A run error always wins over an after_run hook error.
      warn!(mesh = %self.name, error = %e, "after_run hook failed");
    }
    info!(
      mesh = %self.name,
      cycles = self.runtime.cycles().len(),
      ok = run_err.is_none(),
      "mesh run finished"
    );
    match run_err {
      Some(err) => Err(err),
      None => Ok(&self.runtime),
    }
  }

  async fn run_loop(&mut self) -> Option<MeshError> {
    loop {
      self.run_cycle().await;
      let (stop, err) = self.must_stop();
      if stop {
        return err;
      }
      self.drain_components();
      if let Some(err) = self.chainable_err.clone() {
        return Some(err);
      }
    }
  }

  /// Runs one cycle: fires `cycle_begin`, activates every component in its
  /// own task, joins, records the results, fires `cycle_end` and appends the
  /// cycle. Cycles that end in a hook failure are appended too.
  async fn run_cycle(&mut self) {
    let number = self.runtime.cycles().len() + 1;
    let mut cycle = Cycle::new(number);
    if self.config.debug {
      debug!(mesh = %self.name, cycle = number, "cycle starting");
    }

    if let Err(e) = self.hooks.cycle_begin.trigger(self, &cycle) {
      let err = MeshError::HookFailed {
        phase: "cycle_begin",
        details: e.to_string(),
      };
      cycle.set_chainable_err(err.clone());
      self.chainable_err = Some(err);
      self.runtime.cycles_mut().add(cycle);
      return;
    }

    let mut handles = Vec::with_capacity(self.components.len());
    for (name, mut component) in self.components.take_all() {
      handles.push((
        name,
        tokio::spawn(async move {
          let result = component.maybe_activate();
          (component, result)
        }),
      ));
    }
    let joined = join_all(
      handles
        .into_iter()
        .map(|(name, handle)| async move { (name, handle.await) }),
    )
    .await;
    for (name, outcome) in joined {
      match outcome {
        Ok((component, result)) => {
          if self.config.debug {
            debug!(mesh = %self.name, component = %name, code = %result.code(), "activation finished");
          }
          self.components.add(component);
          cycle.results_mut().add(result);
        }
        Err(join_err) => {
          // Activation panics are caught inside the task, so a join error
          // means the task itself died; the component is gone with it.
          error!(mesh = %self.name, component = %name, error = %join_err, "activation task failed");
          cycle
            .results_mut()
            .add(ActivationResult::panicked(
              name,
              format!("activation task failed: {join_err}"),
            ));
        }
      }
    }

    if let Some(err) = cycle.results().first_chainable_err().cloned() {
      cycle.set_chainable_err(err.clone());
      self.chainable_err = Some(err);
    }
    if let Err(e) = self.hooks.cycle_end.trigger(self, &cycle) {
      let err = MeshError::HookFailed {
        phase: "cycle_end",
        details: e.to_string(),
      };
      cycle.set_chainable_err(err.clone());
      self.chainable_err = Some(err);
    }
    self.runtime.cycles_mut().add(cycle);
  }

  /// Decides termination from the latest cycle only. A mesh-level chainable
  /// error defers to the caller, which surfaces it after the drain.
  fn must_stop(&self) -> (bool, Option<MeshError>) {
    if self.chainable_err.is_some() {
      return (false, None);
    }
    let Ok(last) = self.runtime.cycles().last() else {
      return (false, None);
    };
    let cycle = last.number();

    if self.config.cycles_limit != UNLIMITED_CYCLES && cycle > self.config.cycles_limit {
      return (
        true,
        Some(MeshError::ReachedMaxAllowedCycles {
          mesh: self.name.clone(),
          cycle,
          limit: self.config.cycles_limit,
        }),
      );
    }
    if let Some(limit) = self.config.time_limit {
      let elapsed = self.runtime.duration().unwrap_or_default();
      if elapsed >= limit {
        return (
          true,
          Some(MeshError::TimeLimitExceeded {
            mesh: self.name.clone(),
            cycle,
          }),
        );
      }
    }
    if !last.has_activated_components() {
      info!(mesh = %self.name, cycle, "no components activated; mesh is quiescent");
      return (true, None);
    }

    let results = last.results();
    match self.config.error_handling_strategy {
      ErrorHandlingStrategy::StopOnFirstErrorOrPanic => {
        if results.has_activation_errors() || results.has_activation_panics() {
          let details: Vec<String> = [results.all_errors_combined(), results.all_panics_combined()]
            .into_iter()
            .flatten()
            .collect();
          return (
            true,
            Some(MeshError::HitAnErrorOrPanic {
              mesh: self.name.clone(),
              cycle,
              details: details.join("; "),
            }),
          );
        }
        (false, None)
      }
      ErrorHandlingStrategy::StopOnFirstPanic => {
        if results.has_activation_panics() {
          return (
            true,
            Some(MeshError::HitAPanic {
              mesh: self.name.clone(),
              cycle,
              details: results.all_panics_combined().unwrap_or_default(),
            }),
          );
        }
        (false, None)
      }
      ErrorHandlingStrategy::IgnoreAll => (false, None),
    }
  }

  /// Moves signals along the pipes and clears consumed buffers, per the last
  /// cycle's activation codes. Deliveries land after every clear, so a
  /// waiting component keeps its inputs plus whatever arrived this drain.
  fn drain_components(&mut self) {
    let Ok(last) = self.runtime.cycles().last() else {
      return;
    };
    let codes: Vec<(String, ActivationCode)> = last
      .results()
      .iter()
      .map(|(name, result)| (name.to_string(), result.code()))
      .collect();

    let mut deliveries: Vec<(PipeTarget, SignalGroup)> = Vec::new();
    for (name, code) in &codes {
      let clears_inputs = matches!(
        code,
        ActivationCode::Ok
          | ActivationCode::ReturnedError
          | ActivationCode::Panicked
          | ActivationCode::WaitingForInputsClear
      );
      let flushes_outputs = code.is_activated();
      if !clears_inputs && !flushes_outputs {
        continue;
      }
      let Ok(component) = self.components.by_name_mut(name) else {
        continue;
      };
      if clears_inputs {
        component.inputs_mut().clear();
      }
      if flushes_outputs {
        for port in component.outputs_mut().iter_mut() {
          // Flushing an empty or unpiped port is a no-op; an unpiped output
          // keeps accumulating so its buffer stays observable after the run.
          if !port.has_signals() || !port.has_pipes() {
            continue;
          }
          let snapshot = port.buffer().clone();
          let targets = port.pipes().to_vec();
          for target in targets {
            deliveries.push((target, snapshot.clone()));
          }
          port.clear();
        }
      }
    }

    for (target, signals) in deliveries {
      let dest = self
        .components
        .by_name_mut(&target.component)
        .and_then(|c| c.input_by_name_mut(&target.port));
      match dest {
        Ok(port) => port.append_buffer(&signals),
        Err(e) => {
          error!(mesh = %self.name, dest = %target, error = %e, "failed to deliver signals");
          self.chainable_err = Some(MeshError::FailedToDrain {
            mesh: self.name.clone(),
            component: target.component.clone(),
            details: e.to_string(),
          });
        }
      }
    }
  }

  /// Checks the topology before the first cycle: parent back references and
  /// every pipe address must resolve inside this mesh.
  fn validate(&self) -> Result<(), MeshError> {
    let mut violations: Vec<String> = Vec::new();
    for (name, component) in self.components.iter() {
      if let Some(err) = component.chainable_err() {
        violations.push(format!("component {name} carries an error: {err}"));
      }
      match component.parent_mesh() {
        Some(mesh) if mesh == self.name => {}
        other => violations.push(format!(
          "component {name} belongs to mesh {other:?}, not {}",
          self.name
        )),
      }
      for (_, port) in component.inputs().iter().chain(component.outputs().iter()) {
        if let Some(err) = port.chainable_err() {
          violations.push(format!(
            "port {} of {name} carries an error: {err}",
            port.name()
          ));
        }
      }
      for (_, port) in component.outputs().iter() {
        if port.parent_component() != Some(name) {
          violations.push(format!(
            "output port {} of {name} has parent {:?}",
            port.name(),
            port.parent_component()
          ));
        }
        for target in port.pipes() {
          match self.components.by_name(&target.component) {
            Ok(dest) => {
              if dest.input_by_name(&target.port).is_err() {
                violations.push(format!(
                  "pipe {}:{} -> {target} refers to an unknown input port",
                  name,
                  port.name()
                ));
              }
            }
            Err(_) => violations.push(format!(
              "pipe {}:{} -> {target} refers to an unregistered component",
              name,
              port.name()
            )),
          }
        }
      }
    }
    if violations.is_empty() {
      Ok(())
    } else {
      let mut details = violations;
      details.sort_unstable();
      Err(MeshError::MeshValidationFailed {
        mesh: self.name.clone(),
        details: details.join("; "),
      })
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn components(&self) -> &ComponentCollection {
    &self.components
  }

  pub fn component_by_name(&self, name: &str) -> Result<&Component, MeshError> {
    self.components.by_name(name)
  }

  pub fn component_by_name_mut(&mut self, name: &str) -> Result<&mut Component, MeshError> {
    self.components.by_name_mut(name)
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Runtime info of the latest run (empty before the first run).
  pub fn runtime_info(&self) -> &RuntimeInfo {
    &self.runtime
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
