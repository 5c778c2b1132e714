//! Error taxonomy for the mesh runtime.
//!
//! [MeshError] is the closed set of runtime errors; variants carry the failing
//! mesh/cycle/component names so a terminating error is diagnostic on its own.
//! Activation functions and hooks return boxed errors ([ActivationError],
//! [HookError]) so user code is free to surface any error type.

use thiserror::Error;

/// Error type returned by activation functions.
pub type ActivationError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by hook callbacks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Runtime errors. Identity checks are `matches!` on the variant; the
/// contextual fields never participate in identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
  #[error("mesh {mesh}: cycle {cycle}: hit an error or panic: {details}")]
  HitAnErrorOrPanic {
    mesh: String,
    cycle: usize,
    details: String,
  },

  #[error("mesh {mesh}: cycle {cycle}: hit a panic: {details}")]
  HitAPanic {
    mesh: String,
    cycle: usize,
    details: String,
  },

  #[error("unsupported error handling strategy: {strategy}")]
  UnsupportedErrorHandlingStrategy { strategy: String },

  #[error("mesh {mesh}: cycle {cycle} exceeded the allowed {limit} cycles")]
  ReachedMaxAllowedCycles {
    mesh: String,
    cycle: usize,
    limit: usize,
  },

  #[error("mesh {mesh}: time limit exceeded at cycle {cycle}")]
  TimeLimitExceeded { mesh: String, cycle: usize },

  #[error("mesh {mesh}: failed to drain component {component}: {details}")]
  FailedToDrain {
    mesh: String,
    component: String,
    details: String,
  },

  #[error("port {port} not found in collection")]
  PortNotFoundInCollection { port: String },

  #[error("port {port} is not a usable pipe destination")]
  NilPort { port: String },

  #[error("invalid pipe direction: {from} -> {to} (pipes go output -> input)")]
  InvalidPipeDirection { from: String, to: String },

  #[error("port {port} is not attached to a component")]
  PortNotAttached { port: String },

  #[error("invalid range for indexed port group: from {from} to {to}")]
  InvalidRangeForIndexedGroup { from: usize, to: usize },

  #[error("no signals in group")]
  NoSignalsInGroup,

  #[error("no cycles in group")]
  NoCyclesInGroup,

  #[error("payload is not of the expected type {expected}")]
  BadPayloadType { expected: &'static str },

  #[error("component {component} not found in collection")]
  ComponentNotFoundInCollection { component: String },

  #[error("{phase} hook failed: {details}")]
  HookFailed {
    phase: &'static str,
    details: String,
  },

  #[error("mesh {mesh} failed validation: {details}")]
  MeshValidationFailed { mesh: String, details: String },
}

/// Sentinel returned by an activation function to declare the activation
/// incomplete. `keep_inputs` decides whether the inputs survive the drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("waiting for inputs (keep_inputs: {keep_inputs})")]
pub struct WaitForInputs {
  pub keep_inputs: bool,
}

impl WaitForInputs {
  /// Wait for more inputs; current inputs are kept and outputs are not flushed.
  pub fn keep() -> Self {
    Self { keep_inputs: true }
  }

  /// Wait for more inputs; current inputs are cleared during the drain.
  pub fn clear() -> Self {
    Self { keep_inputs: false }
  }
}

/// A captured activation panic, rendered as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("activation panicked: {message}")]
pub struct ActivationPanic {
  pub message: String,
}

impl ActivationPanic {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Renders a panic payload from `catch_unwind` into a readable message.
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "non-string panic payload".to_string()
  }
}
