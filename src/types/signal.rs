//! A signal: one immutable data packet moving through the mesh.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::errors::MeshError;

/// Opaque signal payload. Shared by reference, so fan-out delivers the same
/// allocation to every destination.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// One immutable data packet with an opaque payload and an optional carried
/// error. Cloning a signal bumps the payload reference count; it never copies
/// the payload itself.
#[derive(Clone)]
pub struct Signal {
  payload: Option<Payload>,
  chainable_err: Option<MeshError>,
}

impl Signal {
  /// Creates a signal carrying the given payload.
  pub fn new(payload: impl Any + Send + Sync) -> Self {
    Self {
      payload: Some(Arc::new(payload)),
      chainable_err: None,
    }
  }

  /// Creates a signal from an already shared payload.
  pub fn from_payload(payload: Payload) -> Self {
    Self {
      payload: Some(payload),
      chainable_err: None,
    }
  }

  /// Creates an empty signal carrying only an error.
  pub(crate) fn empty_with_err(err: MeshError) -> Self {
    Self {
      payload: None,
      chainable_err: Some(err),
    }
  }

  /// The payload, or the signal's carried error.
  pub fn payload(&self) -> Result<&(dyn Any + Send + Sync), MeshError> {
    if let Some(err) = &self.chainable_err {
      return Err(err.clone());
    }
    match &self.payload {
      Some(p) => Ok(p.as_ref()),
      None => Err(MeshError::NoSignalsInGroup),
    }
  }

  /// A shared handle to the payload, or the signal's carried error.
  pub fn payload_arc(&self) -> Result<Payload, MeshError> {
    if let Some(err) = &self.chainable_err {
      return Err(err.clone());
    }
    match &self.payload {
      Some(p) => Ok(Arc::clone(p)),
      None => Err(MeshError::NoSignalsInGroup),
    }
  }

  /// The payload downcast to `T`.
  pub fn payload_as<T: 'static>(&self) -> Result<&T, MeshError> {
    self
      .payload()?
      .downcast_ref::<T>()
      .ok_or(MeshError::BadPayloadType {
        expected: std::any::type_name::<T>(),
      })
  }

  /// The payload if present and the signal carries no error.
  pub fn payload_or_nil(&self) -> Option<Payload> {
    if self.chainable_err.is_some() {
      return None;
    }
    self.payload.as_ref().map(Arc::clone)
  }

  /// The payload downcast to `T`, or `default` when absent or mistyped.
  pub fn payload_or_default<T: Clone + 'static>(&self, default: T) -> T {
    self.payload_as::<T>().map(|v| v.clone()).unwrap_or(default)
  }

  pub fn has_payload(&self) -> bool {
    self.payload.is_some()
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

impl fmt::Debug for Signal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Signal")
      .field("has_payload", &self.payload.is_some())
      .field("chainable_err", &self.chainable_err)
      .finish()
  }
}
