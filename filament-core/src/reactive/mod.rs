//! Reactive Primitives
//!
//! This module implements the signal core: a single-value reactive cell
//! with change notification, the subscription handles that manage handler
//! registrations, and the tagged dependency entries hooks use to mix
//! signals with plain values.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A [`Signal`] holds one value. Assigning a value that differs from the
//! current one (under the signal's change test) synchronously notifies
//! every subscriber, in subscription order. [`Signal::bump`] forces a
//! notification for values mutated in place.
//!
//! ## Read-only views
//!
//! [`ReadSignal`] is the read capability of the same cell: reading and
//! subscribing, with no way to write. It aliases the writable signal's
//! state; it is never a snapshot.
//!
//! ## Dependency entries
//!
//! [`Dep`] tags each dependency-list entry as either a plain value or a
//! tracked signal, so hooks can subscribe to the signal entries and
//! compare the rest across renders.
//!
//! # Dispatch model
//!
//! Notification is synchronous and re-entrant on the thread that called
//! `set` or `bump`. There is no queueing, no batching, and no cycle
//! detection: a set-chain that loops back into a signal it reacts to
//! recurses until the stack gives out. Keeping chains acyclic is the
//! caller's job.

mod dep;
mod emitter;
mod signal;
mod subscription;

pub use dep::{deps_changed, Dep, DepValue, Track};
pub use signal::{ReadSignal, Signal};
pub use subscription::{Subscription, SubscriptionId};
