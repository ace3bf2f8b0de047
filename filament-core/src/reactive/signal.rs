//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a single value
//! and notifies registered handlers when the value changes.
//!
//! # How Signals Work
//!
//! 1. `set` compares the new value against the current one using the
//!    signal's change test (the type's `==` by default).
//!
//! 2. When the value differs, it is stored and every subscriber is
//!    notified synchronously, in subscription order, before `set` returns.
//!
//! 3. An unchanged assignment is a no-op: no storage, no notification.
//!
//! `bump` sidesteps the change test and notifies with the current value,
//! for values that were mutated in place and therefore never compare
//! unequal to themselves.
//!
//! # Read-only views
//!
//! [`Signal::readonly`] returns a [`ReadSignal`] over the same cell. The
//! view is a capability subset, not a copy: a write through the signal is
//! immediately visible through every view, and views can subscribe to the
//! same emitter. [`Signal`] derefs to [`ReadSignal`], so every read
//! operation is available on the writable handle as well.
//!
//! # Dispatch model
//!
//! Notification is synchronous and re-entrant on the thread that called
//! `set` or `bump`. A handler that sets another signal cascades further
//! notifications on the same stack. Cycles between signals are not
//! detected; a cyclic set-chain recurses until the stack overflows, and
//! keeping chains acyclic is the caller's responsibility.
//!
//! # Thread Safety
//!
//! The cell is `Send + Sync`: the value sits behind a `RwLock` and the
//! subscriber registry behind another. No lock is held while handlers run.

use std::fmt::Debug;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use super::dep::Track;
use super::emitter::ChangeEmitter;
use super::subscription::{Subscription, SubscriptionId};

/// Counter for generating unique signal ids.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal id.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

type EqFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// The cell shared by a signal and all of its views and clones.
struct Shared<T> {
    id: u64,
    value: RwLock<T>,
    eq: EqFn<T>,
    emitter: ChangeEmitter<T>,
}

/// The read-only view of a signal.
///
/// Exposes reading and subscribing over the same cell as the writable
/// [`Signal`], with no way to write. The view is an alias, never a
/// snapshot: it always observes the latest value.
///
/// `Clone` shares the cell.
pub struct ReadSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    shared: Arc<Shared<T>>,
}

/// A reactive cell holding a value of type `T`.
///
/// # Example
///
/// ```rust
/// use filament_core::Signal;
///
/// let count = Signal::new(0);
///
/// let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
/// let subscription = count.subscribe({
///     let seen = seen.clone();
///     move |v| seen.lock().push(*v)
/// });
///
/// count.set(1);
/// count.set(1); // unchanged, silent
/// count.set(2);
///
/// assert_eq!(*seen.lock(), vec![1, 2]);
/// subscription.cancel();
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    read: ReadSignal<T>,
}

impl<T> ReadSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The signal's unique id. Stable for the cell's lifetime and shared
    /// by every view and clone of it.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.shared.value.read().clone()
    }

    /// Read the current value by reference, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.read())
    }

    /// Register `handler` for change notifications.
    ///
    /// Handlers fire in subscription order. Registering the same closure
    /// twice registers it twice, producing two notifications per change.
    ///
    /// The returned [`Subscription`] removes the registration via
    /// [`Subscription::cancel`]; it does not remove it on drop.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.emitter.add(Arc::new(handler));
        trace!(signal = self.shared.id, subscription = ?id, "subscribed");

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription::new(
            id,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    if shared.emitter.remove(id) {
                        trace!(signal = shared.id, subscription = ?id, "unsubscribed");
                    }
                }
            }),
        )
    }

    /// Remove one handler registration by id. No-op when already removed.
    ///
    /// Prefer cancelling the [`Subscription`] returned by `subscribe`.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.shared.emitter.remove(id);
    }

    /// The number of currently registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.emitter.len()
    }
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a signal with the given initial value, using the type's
    /// `==` as the change test.
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::with_eq(value, |a, b| a == b)
    }

    /// Create a signal with a custom change test.
    ///
    /// `set` is a silent no-op when `eq(current, new)` holds. Passing
    /// `|_, _| false` notifies on every assignment.
    pub fn with_eq(value: T, eq: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            read: ReadSignal {
                shared: Arc::new(Shared {
                    id: next_signal_id(),
                    value: RwLock::new(value),
                    eq: Arc::new(eq),
                    emitter: ChangeEmitter::new(),
                }),
            },
        }
    }

    /// Assign a new value, notifying subscribers if it differs from the
    /// current one under the signal's change test.
    ///
    /// Notifications are dispatched synchronously, in subscription order,
    /// before `set` returns. An unchanged assignment has no observable
    /// effect.
    pub fn set(&self, value: T) {
        let shared = &self.read.shared;
        {
            let current = shared.value.read();
            if (shared.eq)(&current, &value) {
                return;
            }
        }
        *shared.value.write() = value.clone();
        trace!(
            signal = shared.id,
            subscribers = shared.emitter.len(),
            "value changed"
        );
        shared.emitter.emit(&value);
    }

    /// Update the value from the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = {
            let guard = self.read.shared.value.read();
            f(&guard)
        };
        self.set(next);
    }

    /// Notify subscribers with the current value, without changing it.
    ///
    /// The escape hatch for in-place mutation: a value mutated through
    /// interior means never differs from itself under the change test, so
    /// `set` stays silent about it.
    pub fn bump(&self) {
        let shared = &self.read.shared;
        let value = shared.value.read().clone();
        trace!(
            signal = shared.id,
            subscribers = shared.emitter.len(),
            "bump"
        );
        shared.emitter.emit(&value);
    }

    /// The read-only view of this signal.
    ///
    /// The view aliases the same cell and emitter. Writes through this
    /// handle are immediately visible through the view.
    pub fn readonly(&self) -> ReadSignal<T> {
        self.read.clone()
    }
}

impl<T> Deref for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Target = ReadSignal<T>;

    fn deref(&self) -> &ReadSignal<T> {
        &self.read
    }
}

impl<T> Clone for ReadSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
        }
    }
}

impl<T> Track for ReadSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn signal_id(&self) -> u64 {
        self.shared.id
    }

    fn on_change(&self, f: Arc<dyn Fn() + Send + Sync>) -> SubscriptionId {
        self.shared.emitter.add(Arc::new(move |_| f()))
    }

    fn remove(&self, id: SubscriptionId) {
        self.shared.emitter.remove(id);
    }
}

impl<T> Debug for ReadSignal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSignal")
            .field("id", &self.shared.id)
            .field("value", &self.get())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id())
            .field("value", &self.get())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
