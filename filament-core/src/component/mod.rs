//! Component lifecycle.
//!
//! [`Scope`] models the host framework's component instance: hook slots
//! claimed in call order, effects with dependency lists and cleanups, and
//! re-render requests driven by state setters. The hooks in this module
//! build the signal integration on top of that contract:
//!
//! - [`use_const`]: a value computed once per component instance
//! - [`use_signal`]: a signal whose identity is stable across renders
//! - [`use_computed`]: a derived signal recomputed when dependencies change
//!
//! [`ReadSignal`] additionally gains `use_value`, `use_selected`, and
//! `use_effect` methods here, binding a component's render state or side
//! effects to a signal's changes.
//!
//! [`ReadSignal`]: crate::reactive::ReadSignal

mod hooks;
mod scope;

pub use hooks::{use_computed, use_const, use_signal};
pub use scope::{Cleanup, Scope, SetState, StableRef};
