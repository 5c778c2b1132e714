//! Result of one component activation attempt within a cycle.

use serde::Serialize;

use crate::errors::{ActivationError, ActivationPanic, MeshError};

/// Why a component did or did not run in a cycle. A component counts as
/// activated exactly when its function actually ran to completion, error or
/// panic included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationCode {
  Ok,
  NoInput,
  NoFunction,
  WaitingForInputsClear,
  WaitingForInputsKeep,
  ReturnedError,
  Panicked,
}

impl ActivationCode {
  /// True for the codes that mean the activation function ran.
  pub fn is_activated(self) -> bool {
    matches!(
      self,
      ActivationCode::Ok | ActivationCode::ReturnedError | ActivationCode::Panicked
    )
  }
}

impl std::fmt::Display for ActivationCode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      ActivationCode::Ok => "ok",
      ActivationCode::NoInput => "no_input",
      ActivationCode::NoFunction => "no_function",
      ActivationCode::WaitingForInputsClear => "waiting_for_inputs_clear",
      ActivationCode::WaitingForInputsKeep => "waiting_for_inputs_keep",
      ActivationCode::ReturnedError => "returned_error",
      ActivationCode::Panicked => "panicked",
    };
    write!(f, "{s}")
  }
}

/// Per-cycle record for one component: whether it activated, why, and the
/// error or captured panic when it failed.
#[derive(Debug)]
pub struct ActivationResult {
  component_name: String,
  activated: bool,
  code: ActivationCode,
  activation_error: Option<ActivationError>,
  chainable_err: Option<MeshError>,
}

impl ActivationResult {
  fn new(component_name: String, code: ActivationCode, error: Option<ActivationError>) -> Self {
    Self {
      component_name,
      activated: code.is_activated(),
      code,
      activation_error: error,
      chainable_err: None,
    }
  }

  pub fn ok(component_name: impl Into<String>) -> Self {
    Self::new(component_name.into(), ActivationCode::Ok, None)
  }

  pub fn no_input(component_name: impl Into<String>) -> Self {
    Self::new(component_name.into(), ActivationCode::NoInput, None)
  }

  pub fn no_function(component_name: impl Into<String>) -> Self {
    Self::new(component_name.into(), ActivationCode::NoFunction, None)
  }

  pub fn waiting_for_inputs(component_name: impl Into<String>, keep_inputs: bool) -> Self {
    let code = if keep_inputs {
      ActivationCode::WaitingForInputsKeep
    } else {
      ActivationCode::WaitingForInputsClear
    };
    Self::new(component_name.into(), code, None)
  }

  pub fn returned_error(component_name: impl Into<String>, err: ActivationError) -> Self {
    Self::new(component_name.into(), ActivationCode::ReturnedError, Some(err))
  }

  /// Wraps a captured panic message as the activation error.
  pub fn panicked(component_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(
      component_name.into(),
      ActivationCode::Panicked,
      Some(Box::new(ActivationPanic::new(message))),
    )
  }

  pub fn component_name(&self) -> &str {
    &self.component_name
  }

  pub fn activated(&self) -> bool {
    self.activated
  }

  pub fn code(&self) -> ActivationCode {
    self.code
  }

  pub fn activation_error(&self) -> Option<&ActivationError> {
    self.activation_error.as_ref()
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
