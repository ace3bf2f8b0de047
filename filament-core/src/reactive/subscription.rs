//! Subscription types for the reactive system.
//!
//! Every handler registered on a signal gets a unique id, and the
//! registration is handed back to the caller as a [`Subscription`] that can
//! remove exactly that handler.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a single handler registration.
///
/// Each `subscribe` call gets a fresh id, even when the same closure is
/// registered twice. The id is what removal operates on, so a doubly
/// registered handler is removed one registration at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generate a new unique subscription id.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle to one handler registration on a signal.
///
/// Returned by [`ReadSignal::subscribe`]. Calling [`cancel`] removes the
/// handler; calling it again is a no-op.
///
/// Dropping a `Subscription` without cancelling does NOT remove the
/// handler: the registration stays alive for as long as the signal does.
/// A subscriber that outlives its interest in the signal must cancel, or
/// it leaks a handler reference.
///
/// [`ReadSignal::subscribe`]: super::ReadSignal::subscribe
/// [`cancel`]: Subscription::cancel
pub struct Subscription {
    id: SubscriptionId,
    detach: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, detach: Box<dyn Fn() + Send + Sync>) -> Self {
        Self { id, detach }
    }

    /// The id of the registration this handle controls.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the handler registration. Idempotent.
    pub fn cancel(&self) {
        (self.detach)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
