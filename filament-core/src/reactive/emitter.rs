//! Single-event change channel.
//!
//! Each signal owns one `ChangeEmitter`, the publish/subscribe list for its
//! "changed" event. Handlers are kept in insertion order so notifications
//! fire in subscription order.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use smallvec::SmallVec;

use super::subscription::SubscriptionId;

/// A registered change handler.
pub(crate) type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered registry of change handlers for one signal.
pub(crate) struct ChangeEmitter<T> {
    handlers: RwLock<IndexMap<SubscriptionId, Handler<T>>>,
}

impl<T> ChangeEmitter<T> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: RwLock::new(IndexMap::new()),
        }
    }

    /// Register a handler. The same closure registered twice gets two
    /// independent entries and fires twice per change.
    pub(crate) fn add(&self, handler: Handler<T>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, handler);
        id
    }

    /// Remove one registration. Returns false when it was already gone.
    ///
    /// `shift_remove` keeps the remaining handlers in subscription order.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        self.handlers.write().shift_remove(&id).is_some()
    }

    /// Invoke every current handler with `value`, in subscription order,
    /// once each.
    ///
    /// The handler list is snapshotted before dispatch so no lock is held
    /// while handlers run. Handlers may re-enter the emitter (subscribe,
    /// unsubscribe, set other signals); registry changes apply from the
    /// next emit onward.
    pub(crate) fn emit(&self, value: &T) {
        let snapshot: SmallVec<[Handler<T>; 4]> =
            self.handlers.read().values().cloned().collect();
        for handler in snapshot {
            handler(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.read().len()
    }
}
