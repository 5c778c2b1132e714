//! Observer hooks for well-defined runtime phases.
//!
//! A [HookGroup] is an insertion-ordered list of callbacks. `trigger` invokes
//! them in order and stops at the first failure; the caller decides whether
//! that failure is fatal. Hook bundles exist at three levels: mesh
//! ([MeshHooks]), component ([ComponentHooks]) and port ([PortHooks]).

use std::sync::Arc;

use crate::errors::HookError;
use crate::mesh::Mesh;
use crate::types::{ActivationResult, Component, Cycle, Port};

/// Outcome of triggering a hook group: `Ok` or the first callback failure.
pub type HookOutcome = Result<(), HookError>;

/// Callback observing the mesh (run start/end).
pub type MeshHookFn = dyn Fn(&Mesh) -> HookOutcome + Send + Sync;

/// Callback observing a cycle boundary.
pub type CycleHookFn = dyn Fn(&Mesh, &Cycle) -> HookOutcome + Send + Sync;

/// Callback observing a component before its activation.
pub type ComponentHookFn = dyn Fn(&Component) -> HookOutcome + Send + Sync;

/// Callback observing a component together with its activation result.
pub type ActivationHookFn = dyn Fn(&Component, &ActivationResult) -> HookOutcome + Send + Sync;

/// Callback observing a port buffer change (signals added or cleared).
pub type SignalsHookFn = dyn Fn(&Port, usize) -> HookOutcome + Send + Sync;

/// Callback observing a new pipe (source, destination).
pub type PipeHookFn = dyn Fn(&Port, &Port) -> HookOutcome + Send + Sync;

/// Insertion-ordered list of callbacks for one phase. Registration order is
/// invocation order; the first failing callback halts the chain.
pub struct HookGroup<F: ?Sized> {
  callbacks: Vec<Arc<F>>,
}

impl<F: ?Sized> HookGroup<F> {
  pub fn new() -> Self {
    Self {
      callbacks: Vec::new(),
    }
  }

  pub fn add(&mut self, callback: Arc<F>) {
    self.callbacks.push(callback);
  }

  pub fn len(&self) -> usize {
    self.callbacks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.callbacks.is_empty()
  }
}

impl<F: ?Sized> Default for HookGroup<F> {
  fn default() -> Self {
    Self::new()
  }
}

impl<F: ?Sized> Clone for HookGroup<F> {
  fn clone(&self) -> Self {
    Self {
      callbacks: self.callbacks.clone(),
    }
  }
}

impl<F: ?Sized> std::fmt::Debug for HookGroup<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HookGroup")
      .field("len", &self.callbacks.len())
      .finish()
  }
}

impl HookGroup<MeshHookFn> {
  pub fn trigger(&self, mesh: &Mesh) -> HookOutcome {
    for callback in &self.callbacks {
      callback(mesh)?;
    }
    Ok(())
  }
}

impl HookGroup<CycleHookFn> {
  pub fn trigger(&self, mesh: &Mesh, cycle: &Cycle) -> HookOutcome {
    for callback in &self.callbacks {
      callback(mesh, cycle)?;
    }
    Ok(())
  }
}

impl HookGroup<ComponentHookFn> {
  pub fn trigger(&self, component: &Component) -> HookOutcome {
    for callback in &self.callbacks {
      callback(component)?;
    }
    Ok(())
  }
}

impl HookGroup<ActivationHookFn> {
  pub fn trigger(&self, component: &Component, result: &ActivationResult) -> HookOutcome {
    for callback in &self.callbacks {
      callback(component, result)?;
    }
    Ok(())
  }
}

impl HookGroup<SignalsHookFn> {
  pub fn trigger(&self, port: &Port, count: usize) -> HookOutcome {
    for callback in &self.callbacks {
      callback(port, count)?;
    }
    Ok(())
  }
}

impl HookGroup<PipeHookFn> {
  pub fn trigger(&self, source: &Port, destination: &Port) -> HookOutcome {
    for callback in &self.callbacks {
      callback(source, destination)?;
    }
    Ok(())
  }
}

/// Mesh-level hook bundle.
///
/// `before_run` and `cycle_begin`/`cycle_end` failures are fatal to the run;
/// `after_run` failures are logged and dropped.
#[derive(Debug, Clone, Default)]
pub struct MeshHooks {
  pub before_run: HookGroup<MeshHookFn>,
  pub after_run: HookGroup<MeshHookFn>,
  pub cycle_begin: HookGroup<CycleHookFn>,
  pub cycle_end: HookGroup<CycleHookFn>,
}

/// Component-level hook bundle. Failures surface through the activation
/// result's chainable error; they never change the activation outcome.
#[derive(Debug, Clone, Default)]
pub struct ComponentHooks {
  pub before_activation: HookGroup<ComponentHookFn>,
  pub after_activation: HookGroup<ActivationHookFn>,
  pub on_success: HookGroup<ActivationHookFn>,
  pub on_error: HookGroup<ActivationHookFn>,
  pub on_panic: HookGroup<ActivationHookFn>,
}

/// Port-level hook bundle. Failures poison the port they fired on (the
/// source port, for pipe hooks).
#[derive(Debug, Clone, Default)]
pub struct PortHooks {
  pub on_signals_added: HookGroup<SignalsHookFn>,
  pub on_clear: HookGroup<SignalsHookFn>,
  pub on_inbound_pipe: HookGroup<PipeHookFn>,
  pub on_outbound_pipe: HookGroup<PipeHookFn>,
}
