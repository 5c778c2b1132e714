//! Tests for `Component` and the activation protocol.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{MeshError, WaitForInputs};
use crate::hooks::HookOutcome;

use super::{ActivationCode, ActivationResult, Component, PortDirection, Signal};

fn forwarding_component(name: &str) -> Component {
  Component::new(name)
    .add_inputs(["i"])
    .add_outputs(["o"])
    .with_activation_func(|c| {
      let signals = c.input_by_name("i")?.signals().to_vec();
      c.output_by_name_mut("o")?.put_signals(signals);
      Ok(())
    })
}

#[test]
fn add_inputs_attaches_directed_ports() {
  let c = Component::new("c").add_inputs(["a", "b"]).add_outputs(["o"]);
  assert_eq!(
    c.input_by_name("a").unwrap().direction(),
    Some(PortDirection::In)
  );
  assert_eq!(
    c.output_by_name("o").unwrap().direction(),
    Some(PortDirection::Out)
  );
  assert_eq!(c.input_by_name("a").unwrap().parent_component(), Some("c"));
}

#[test]
fn no_function_component_never_activates() {
  let mut c = Component::new("c").add_inputs(["i"]);
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  let r = c.maybe_activate();
  assert_eq!(r.code(), ActivationCode::NoFunction);
  assert!(!r.activated());
}

#[test]
fn empty_inputs_mean_no_input() {
  let mut c = forwarding_component("c");
  let r = c.maybe_activate();
  assert_eq!(r.code(), ActivationCode::NoInput);
  assert!(!r.activated());
}

#[test]
fn activation_runs_the_function() {
  let mut c = forwarding_component("c");
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(9i64)]);
  let r = c.maybe_activate();
  assert_eq!(r.code(), ActivationCode::Ok);
  assert!(r.activated());
  assert_eq!(
    c.output_by_name("o").unwrap().buffer().payloads_as::<i64>().unwrap(),
    vec![9]
  );
}

#[test]
fn returned_error_is_recorded() {
  let mut c = Component::new("c")
    .add_inputs(["i"])
    .with_activation_func(|_| Err("boom".into()));
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  let r = c.maybe_activate();
  assert_eq!(r.code(), ActivationCode::ReturnedError);
  assert!(r.activated());
  assert_eq!(r.activation_error().unwrap().to_string(), "boom");
}

#[test]
fn panic_is_captured_as_a_result() {
  let mut c = Component::new("c")
    .add_inputs(["i"])
    .with_activation_func(|_| panic!("exploded"));
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  let r = c.maybe_activate();
  assert_eq!(r.code(), ActivationCode::Panicked);
  assert!(r.activated());
  assert!(r.activation_error().unwrap().to_string().contains("exploded"));
}

#[test]
fn wait_sentinel_maps_to_waiting_codes() {
  let mut keep = Component::new("keep")
    .add_inputs(["i"])
    .with_activation_func(|_| Err(WaitForInputs::keep().into()));
  keep.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  let r = keep.maybe_activate();
  assert_eq!(r.code(), ActivationCode::WaitingForInputsKeep);
  assert!(!r.activated());
  assert!(r.activation_error().is_none());

  let mut clear = Component::new("clear")
    .add_inputs(["i"])
    .with_activation_func(|_| Err(WaitForInputs::clear().into()));
  clear.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  assert_eq!(clear.maybe_activate().code(), ActivationCode::WaitingForInputsClear);
}

#[test]
fn hooks_fire_in_protocol_order_on_success() {
  let log = Arc::new(Mutex::new(Vec::new()));
  let l1 = Arc::clone(&log);
  let l2 = Arc::clone(&log);
  let l3 = Arc::clone(&log);

  let mut c = forwarding_component("c").setup_hooks(|hooks| {
    hooks.before_activation.add(Arc::new(move |_c: &Component| -> HookOutcome {
      l1.lock().unwrap().push("before");
      Ok(())
    }));
    hooks.on_success.add(Arc::new(
      move |_c: &Component, _r: &ActivationResult| -> HookOutcome {
        l2.lock().unwrap().push("success");
        Ok(())
      },
    ));
    hooks.after_activation.add(Arc::new(
      move |_c: &Component, _r: &ActivationResult| -> HookOutcome {
        l3.lock().unwrap().push("after");
        Ok(())
      },
    ));
  });
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  c.maybe_activate();
  assert_eq!(*log.lock().unwrap(), vec!["before", "success", "after"]);
}

#[test]
fn on_panic_fires_before_after_activation() {
  let log = Arc::new(Mutex::new(Vec::new()));
  let l1 = Arc::clone(&log);
  let l2 = Arc::clone(&log);

  let mut c = Component::new("c")
    .add_inputs(["i"])
    .with_activation_func(|_| panic!("down"))
    .setup_hooks(|hooks| {
      hooks.on_panic.add(Arc::new(
        move |_c: &Component, r: &ActivationResult| -> HookOutcome {
          assert_eq!(r.code(), ActivationCode::Panicked);
          l1.lock().unwrap().push("panic");
          Ok(())
        },
      ));
      hooks.after_activation.add(Arc::new(
        move |_c: &Component, _r: &ActivationResult| -> HookOutcome {
          l2.lock().unwrap().push("after");
          Ok(())
        },
      ));
    });
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  c.maybe_activate();
  assert_eq!(*log.lock().unwrap(), vec!["panic", "after"]);
}

#[test]
fn hook_failure_rides_the_result_without_changing_the_outcome() {
  let mut c = forwarding_component("c").setup_hooks(|hooks| {
    hooks.before_activation.add(Arc::new(|_c: &Component| -> HookOutcome {
      Err("observer down".into())
    }));
  });
  c.input_by_name_mut("i").unwrap().put_signals([Signal::new(1i64)]);
  let r = c.maybe_activate();
  assert_eq!(r.code(), ActivationCode::Ok);
  assert!(matches!(
    r.chainable_err(),
    Some(MeshError::HookFailed { phase: "before_activation", .. })
  ));
}

#[test]
fn state_persists_across_activations() {
  let calls = Arc::new(AtomicUsize::new(0));
  let calls_in = Arc::clone(&calls);
  let mut c = Component::new("counter")
    .add_inputs(["kick"])
    .with_initial_state(|state| state.set("count", 0i64))
    .with_activation_func(move |c| {
      calls_in.fetch_add(1, Ordering::SeqCst);
      let count = c.state().get_or::<i64>("count", 0) + 1;
      c.state_mut().set("count", count);
      Ok(())
    });
  for _ in 0..3 {
    c.input_by_name_mut("kick").unwrap().put_signals([Signal::new(())]);
    c.maybe_activate();
    c.inputs_mut().clear();
  }
  assert_eq!(calls.load(Ordering::SeqCst), 3);
  assert_eq!(c.state().get::<i64>("count"), Some(&3));
}

#[test]
fn indexed_inputs_cover_the_inclusive_range() {
  let c = Component::new("c").add_indexed_inputs("i", 1, 3);
  assert_eq!(c.inputs().len(), 3);
  assert_eq!(c.input_by_name("i2").unwrap().parent_component(), Some("c"));
  assert!(c.chainable_err().is_none());
}

#[test]
fn inverted_indexed_range_poisons_the_component() {
  let c = Component::new("c").add_indexed_inputs("i", 2, 1);
  assert!(matches!(
    c.chainable_err(),
    Some(MeshError::InvalidRangeForIndexedGroup { from: 2, to: 1 })
  ));
}

#[test]
fn ports_can_be_added_after_construction() {
  let mut c = forwarding_component("c");
  c.add_input_port(super::Port::new("late_in"));
  c.add_output_port(super::Port::new("late_out"));
  assert_eq!(
    c.input_by_name("late_in").unwrap().direction(),
    Some(PortDirection::In)
  );
  assert_eq!(
    c.input_by_name("late_in").unwrap().parent_component(),
    Some("c")
  );
  assert_eq!(
    c.output_by_name("late_out").unwrap().direction(),
    Some(PortDirection::Out)
  );
}

#[test]
fn attach_failure_poisons_the_component() {
  let c = Component::new("c").attach_input_ports([super::Port::new("")]);
  assert!(matches!(c.chainable_err(), Some(MeshError::NilPort { .. })));
  // Later fluent calls short-circuit.
  let c = c.with_description("late");
  assert_eq!(c.description(), "");
}

#[test]
fn attaching_a_poisoned_port_poisons_the_component() {
  let poisoned = super::Port::new("i").with_chainable_err(MeshError::NoSignalsInGroup);
  let c = Component::new("c").attach_input_ports([poisoned]);
  assert!(matches!(
    c.chainable_err(),
    Some(MeshError::NoSignalsInGroup)
  ));
}
