//! Filament Core
//!
//! This crate provides the reactive signal primitives for the Filament UI
//! framework. It implements:
//!
//! - The signal cell: a single reactive value with change notification
//!   and a capability-restricted read-only view
//! - Component hooks binding signals to the host lifecycle (stable
//!   values, owned signals, computed signals)
//! - A direct-write display primitive that updates a text leaf from
//!   change notifications, outside the re-render path
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - `reactive`: the signal cell, subscriptions, and dependency entries
//! - `component`: the component lifecycle contract and the signal hooks
//! - `render`: the text leaf boundary and the display primitive
//!
//! # Example
//!
//! ```rust
//! use filament_core::{use_computed, use_signal, Dep, Scope};
//!
//! let mut scope = Scope::new();
//!
//! let doubled = scope.render(|cx| {
//!     let count = use_signal(cx, 1);
//!     let doubled = use_computed(
//!         cx,
//!         {
//!             let count = count.clone();
//!             move || count.get() * 2
//!         },
//!         vec![Dep::from(&count)],
//!     );
//!     count.set(5);
//!     doubled
//! });
//!
//! // The computed signal refreshed when its subscription went live.
//! assert_eq!(doubled.get(), 10);
//! ```

pub mod component;
pub mod reactive;
pub mod render;

pub use component::{use_computed, use_const, use_signal, Cleanup, Scope, SetState, StableRef};
pub use reactive::{deps_changed, Dep, ReadSignal, Signal, Subscription, SubscriptionId, Track};
pub use render::{signal_text, TextNode};
