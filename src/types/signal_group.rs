//! An ordered sequence of signals with bulk queries and poison semantics.

use crate::errors::MeshError;

use super::signal::{Payload, Signal};

/// Ordered finite sequence of signals with a carried error. Appending a
/// signal that itself carries an error poisons the group; operations on a
/// poisoned group short-circuit and return poisoned derivatives.
#[derive(Debug, Clone, Default)]
pub struct SignalGroup {
  signals: Vec<Signal>,
  chainable_err: Option<MeshError>,
}

impl SignalGroup {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a group with one signal per payload.
  pub fn from_payloads<T, I>(payloads: I) -> Self
  where
    T: std::any::Any + Send + Sync,
    I: IntoIterator<Item = T>,
  {
    Self::new().with(payloads.into_iter().map(Signal::new))
  }

  /// Returns a new group with the given signals appended. A signal carrying
  /// an error poisons the result.
  pub fn with(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    for signal in signals {
      if self.chainable_err.is_none() {
        if let Some(err) = signal.chainable_err() {
          self.chainable_err = Some(err.clone());
        }
      }
      self.signals.push(signal);
    }
    self
  }

  /// The first signal, or an empty signal carrying [MeshError::NoSignalsInGroup].
  pub fn first(&self) -> Signal {
    if let Some(err) = &self.chainable_err {
      return Signal::empty_with_err(err.clone());
    }
    match self.signals.first() {
      Some(signal) => signal.clone(),
      None => Signal::empty_with_err(MeshError::NoSignalsInGroup),
    }
  }

  pub fn signals(&self) -> &[Signal] {
    &self.signals
  }

  /// All payloads in order, or the group's carried error.
  pub fn all_payloads(&self) -> Result<Vec<Payload>, MeshError> {
    if let Some(err) = &self.chainable_err {
      return Err(err.clone());
    }
    self.signals.iter().map(Signal::payload_arc).collect()
  }

  /// All payloads downcast to `T`, in order.
  pub fn payloads_as<T: Clone + 'static>(&self) -> Result<Vec<T>, MeshError> {
    if let Some(err) = &self.chainable_err {
      return Err(err.clone());
    }
    self
      .signals
      .iter()
      .map(|s| s.payload_as::<T>().map(|v| v.clone()))
      .collect()
  }

  /// Keeps only signals matching the predicate. No-op on a poisoned group.
  pub fn filter(mut self, pred: impl Fn(&Signal) -> bool) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.signals.retain(|s| pred(s));
    self
  }

  /// Transforms every signal. No-op on a poisoned group.
  pub fn map(mut self, f: impl Fn(Signal) -> Signal) -> Self {
    if self.chainable_err.is_some() {
      return self;
    }
    self.signals = self.signals.into_iter().map(f).collect();
    self
  }

  pub fn len(&self) -> usize {
    self.signals.len()
  }

  pub fn is_empty(&self) -> bool {
    self.signals.is_empty()
  }

  /// Appends in place, preserving the poison rule.
  pub(crate) fn append(&mut self, signals: impl IntoIterator<Item = Signal>) -> usize {
    let before = self.signals.len();
    for signal in signals {
      if self.chainable_err.is_none() {
        if let Some(err) = signal.chainable_err() {
          self.chainable_err = Some(err.clone());
        }
      }
      self.signals.push(signal);
    }
    self.signals.len() - before
  }

  pub(crate) fn take_all(&mut self) -> Vec<Signal> {
    std::mem::take(&mut self.signals)
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
