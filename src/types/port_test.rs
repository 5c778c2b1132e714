//! Tests for `Port` and the forwarding helpers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::MeshError;
use crate::hooks::HookOutcome;

use super::{Port, PortDirection, Signal, forward_signals, forward_with_filter, forward_with_map};

fn attached_input(name: &str, component: &str) -> Port {
  let mut port = Port::new_input(name);
  port.set_parent_component(component);
  port
}

#[test]
fn constructors_set_direction() {
  assert_eq!(Port::new("p").direction(), None);
  assert_eq!(Port::new_input("p").direction(), Some(PortDirection::In));
  assert_eq!(Port::new_output("p").direction(), Some(PortDirection::Out));
}

#[test]
fn put_signals_appends_in_order() {
  let mut p = Port::new_input("i");
  p.put_signals([Signal::new(1i64)]).put_signals([Signal::new(2i64)]);
  assert!(p.has_signals());
  assert_eq!(p.buffer().payloads_as::<i64>().unwrap(), vec![1, 2]);
}

#[test]
fn clear_empties_the_buffer() {
  let mut p = Port::new_input("i");
  p.put_signals([Signal::new(1i64)]).clear();
  assert!(!p.has_signals());
}

#[test]
fn put_then_clear_fires_each_hook_once() {
  let added = Arc::new(AtomicUsize::new(0));
  let cleared = Arc::new(AtomicUsize::new(0));
  let added_in = Arc::clone(&added);
  let cleared_in = Arc::clone(&cleared);

  let mut p = Port::new_input("i");
  p.hooks_mut().on_signals_added.add(Arc::new(
    move |_port: &Port, count: usize| -> HookOutcome {
      added_in.fetch_add(count, Ordering::SeqCst);
      Ok(())
    },
  ));
  p.hooks_mut().on_clear.add(Arc::new(
    move |_port: &Port, count: usize| -> HookOutcome {
      cleared_in.fetch_add(count, Ordering::SeqCst);
      Ok(())
    },
  ));

  p.put_signals([Signal::new(1i64), Signal::new(2i64)]).clear();
  assert_eq!(added.load(Ordering::SeqCst), 2);
  assert_eq!(cleared.load(Ordering::SeqCst), 2);
  assert!(!p.has_signals());
}

#[test]
fn failing_signals_hook_poisons_the_port() {
  let mut p = Port::new_input("i");
  p.hooks_mut().on_signals_added.add(Arc::new(
    |_port: &Port, _count: usize| -> HookOutcome { Err("observer failed".into()) },
  ));
  p.put_signals([Signal::new(1i64)]);
  assert!(matches!(
    p.chainable_err(),
    Some(MeshError::HookFailed { phase: "on_signals_added", .. })
  ));
}

#[test]
fn pipe_to_records_the_destination_address() {
  let mut src = Port::new_output("o");
  src.set_parent_component("producer");
  let mut dest = attached_input("i", "consumer");
  src.pipe_to([&mut dest]);
  assert!(src.chainable_err().is_none());
  assert!(src.has_pipes());
  assert_eq!(src.pipes()[0].component, "consumer");
  assert_eq!(src.pipes()[0].port, "i");
}

#[test]
fn pipe_to_requires_out_to_in() {
  let mut src = attached_input("i1", "c1");
  let mut dest = attached_input("i2", "c2");
  src.pipe_to([&mut dest]);
  assert!(matches!(
    src.chainable_err(),
    Some(MeshError::InvalidPipeDirection { .. })
  ));
  assert!(!src.has_pipes());
}

#[test]
fn pipe_to_unattached_destination_poisons_the_source() {
  let mut src = Port::new_output("o");
  let mut dest = Port::new_input("i");
  src.pipe_to([&mut dest]);
  assert!(matches!(
    src.chainable_err(),
    Some(MeshError::PortNotAttached { .. })
  ));
}

#[test]
fn pipe_to_unnamed_destination_poisons_the_source() {
  let mut src = Port::new_output("o");
  let mut dest = attached_input("", "consumer");
  src.pipe_to([&mut dest]);
  assert!(matches!(src.chainable_err(), Some(MeshError::NilPort { .. })));
}

#[test]
fn pipe_hooks_fire_on_both_ends() {
  let outbound = Arc::new(AtomicUsize::new(0));
  let inbound = Arc::new(AtomicUsize::new(0));
  let outbound_in = Arc::clone(&outbound);
  let inbound_in = Arc::clone(&inbound);

  let mut src = Port::new_output("o");
  src.set_parent_component("producer");
  src.hooks_mut().on_outbound_pipe.add(Arc::new(
    move |_src: &Port, _dest: &Port| -> HookOutcome {
      outbound_in.fetch_add(1, Ordering::SeqCst);
      Ok(())
    },
  ));
  let mut dest = attached_input("i", "consumer");
  dest.hooks_mut().on_inbound_pipe.add(Arc::new(
    move |_src: &Port, _dest: &Port| -> HookOutcome {
      inbound_in.fetch_add(1, Ordering::SeqCst);
      Ok(())
    },
  ));

  src.pipe_to([&mut dest]);
  assert_eq!(outbound.load(Ordering::SeqCst), 1);
  assert_eq!(inbound.load(Ordering::SeqCst), 1);
}

#[test]
fn forward_signals_copies_without_mutating_the_source() {
  let mut src = Port::new_output("o");
  src.put_signals([Signal::new(1i64), Signal::new(2i64)]);
  let mut dest = Port::new_input("i");
  dest.put_signals([Signal::new(0i64)]);
  forward_signals(&src, &mut dest);
  assert_eq!(src.buffer().len(), 2);
  assert_eq!(dest.buffer().payloads_as::<i64>().unwrap(), vec![0, 1, 2]);
}

#[test]
fn forward_with_filter_transfers_matching_only() {
  let mut src = Port::new_output("o");
  src.put_signals((1i64..=4).map(Signal::new));
  let mut dest = Port::new_input("i");
  forward_with_filter(&src, &mut dest, |s| s.payload_or_default(0i64) > 2);
  assert_eq!(dest.buffer().payloads_as::<i64>().unwrap(), vec![3, 4]);
}

#[test]
fn forward_with_map_transforms_during_transfer() {
  let mut src = Port::new_output("o");
  src.put_signals([Signal::new(2i64)]);
  let mut dest = Port::new_input("i");
  forward_with_map(&src, &mut dest, |s| Signal::new(s.payload_or_default(0i64) * 3));
  assert_eq!(dest.buffer().payloads_as::<i64>().unwrap(), vec![6]);
}

#[test]
fn operations_on_a_poisoned_port_short_circuit() {
  let mut p = Port::new_input("i").with_chainable_err(MeshError::NoSignalsInGroup);
  p.put_signals([Signal::new(1i64)]);
  assert!(!p.has_signals());
}
