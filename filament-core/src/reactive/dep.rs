//! Dependency-list entries.
//!
//! Hooks that take a dependency list accept a mix of plain values and
//! signals. A plain value only participates in the render-to-render
//! comparison that decides whether an effect re-runs; a signal is
//! additionally subscribed for changes while the effect is live. [`Dep`]
//! makes the two cases explicit variants instead of probing arbitrary
//! values for signal-ness at runtime.

use std::any::Any;
use std::sync::Arc;

use super::signal::{ReadSignal, Signal};
use super::subscription::SubscriptionId;

/// Type-erased tracking capability of a signal.
///
/// Implemented by [`ReadSignal`]; lets dependency handling subscribe to a
/// signal without knowing its value type.
pub trait Track: Send + Sync {
    /// Stable identity of the underlying signal.
    fn signal_id(&self) -> u64;

    /// Register a value-less change callback.
    fn on_change(&self, f: Arc<dyn Fn() + Send + Sync>) -> SubscriptionId;

    /// Remove a registration made through [`Track::on_change`].
    fn remove(&self, id: SubscriptionId);
}

/// A plain (non-signal) dependency value.
///
/// The value is stored type-erased together with a monomorphized equality
/// fn, so entries can be compared shallowly against the previous render's
/// list.
pub struct DepValue {
    value: Arc<dyn Any + Send + Sync>,
    eq: fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> bool,
}

impl Clone for DepValue {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            eq: self.eq,
        }
    }
}

fn eq_as<T>(a: &(dyn Any + Send + Sync), b: &(dyn Any + Send + Sync)) -> bool
where
    T: PartialEq + Send + Sync + 'static,
{
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// One entry of a hook dependency list.
#[derive(Clone)]
pub enum Dep {
    /// A plain value, compared by `PartialEq` against the entry at the
    /// same position in the previous render's list.
    Value(DepValue),

    /// A signal, identified across renders by its id and subscribed for
    /// changes by hooks that track dependencies.
    Tracked(Arc<dyn Track>),
}

impl Dep {
    /// Wrap a plain value.
    pub fn value<T>(value: T) -> Self
    where
        T: PartialEq + Send + Sync + 'static,
    {
        Dep::Value(DepValue {
            value: Arc::new(value),
            eq: eq_as::<T>,
        })
    }

    /// Whether this entry is a signal.
    pub fn is_signal(&self) -> bool {
        matches!(self, Dep::Tracked(_))
    }

    /// The tracking capability, for signal entries.
    pub(crate) fn tracked(&self) -> Option<Arc<dyn Track>> {
        match self {
            Dep::Tracked(tracked) => Some(Arc::clone(tracked)),
            Dep::Value(_) => None,
        }
    }

    /// Whether this entry matches `other` under dependency-array
    /// semantics: signals compare by identity, plain values by
    /// `PartialEq`, and a signal never matches a plain value.
    pub fn same(&self, other: &Dep) -> bool {
        match (self, other) {
            (Dep::Tracked(a), Dep::Tracked(b)) => a.signal_id() == b.signal_id(),
            (Dep::Value(a), Dep::Value(b)) => (a.eq)(&*a.value, &*b.value),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dep::Value(_) => f.write_str("Dep::Value"),
            Dep::Tracked(tracked) => write!(f, "Dep::Tracked({})", tracked.signal_id()),
        }
    }
}

impl<T> From<&ReadSignal<T>> for Dep
where
    T: Clone + Send + Sync + 'static,
{
    fn from(signal: &ReadSignal<T>) -> Self {
        Dep::Tracked(Arc::new(signal.clone()))
    }
}

impl<T> From<&Signal<T>> for Dep
where
    T: Clone + Send + Sync + 'static,
{
    fn from(signal: &Signal<T>) -> Self {
        Dep::Tracked(Arc::new(signal.readonly()))
    }
}

/// Shallow comparison of two dependency lists: changed when the lengths
/// differ or any element differs from the one at the same position.
pub fn deps_changed(prev: &[Dep], next: &[Dep]) -> bool {
    prev.len() != next.len() || prev.iter().zip(next).any(|(a, b)| !a.same(b))
}
