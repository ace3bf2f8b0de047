//! Signal hooks.
//!
//! The hooks that tie signals to a component's lifetime: stable values,
//! component-owned signals, computed signals driven by a dependency list,
//! and the subscription helpers on [`ReadSignal`] that bind a component's
//! render state to a signal.

use std::sync::Arc;

use tracing::trace;

use super::scope::{Cleanup, Scope};
use crate::reactive::{Dep, ReadSignal, Signal, SubscriptionId, Track};

/// Compute a value once per component instance.
///
/// `producer` runs on the first render only; every later render returns a
/// clone of the stored value, so producers passed on later renders are
/// never invoked. For handle types backed by shared state (signals in
/// particular) the clone has the same identity as the stored value.
pub fn use_const<T>(scope: &mut Scope, producer: impl FnOnce() -> T) -> T
where
    T: Clone + Send + Sync + 'static,
{
    scope.use_ref(producer).get()
}

/// A signal owned by the component.
///
/// Constructed once from `default`; the same signal (same cell, same
/// emitter) is returned on every render. A different `default` on a later
/// render has no effect, the first value wins.
pub fn use_signal<T>(scope: &mut Scope, default: T) -> Signal<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    use_const(scope, move || Signal::new(default))
}

/// A signal computed from a dependency list.
///
/// `compute` seeds the internal signal on the first render. On mount and
/// whenever `deps` changes, every signal entry in `deps` is subscribed
/// (once per occurrence) and `compute` runs immediately, so the value is
/// fresh even when a dependency changed between renders. Each change
/// notification from a subscribed dependency recomputes synchronously and
/// assigns into the internal signal, which notifies its own subscribers
/// when the result differs. Cleanup removes every subscription.
///
/// The returned view is read-only: a computed value cannot be set
/// directly.
pub fn use_computed<R>(
    scope: &mut Scope,
    compute: impl Fn() -> R + Send + Sync + 'static,
    deps: Vec<Dep>,
) -> ReadSignal<R>
where
    R: Clone + PartialEq + Send + Sync + 'static,
{
    let compute: Arc<dyn Fn() -> R + Send + Sync> = Arc::new(compute);

    let initial = use_const(scope, {
        let compute = Arc::clone(&compute);
        move || compute()
    });
    let signal = use_signal(scope, initial);

    let effect_deps = deps.clone();
    let inner = signal.clone();
    scope.use_effect(deps, move || {
        let recompute: Arc<dyn Fn() + Send + Sync> = {
            let signal = inner.clone();
            let compute = Arc::clone(&compute);
            Arc::new(move || {
                trace!(signal = signal.id(), "recomputing");
                signal.set(compute());
            })
        };

        let subscriptions: Vec<(Arc<dyn Track>, SubscriptionId)> = effect_deps
            .iter()
            .filter_map(|dep| dep.tracked())
            .map(|tracked| {
                let id = tracked.on_change(Arc::clone(&recompute));
                (tracked, id)
            })
            .collect();

        recompute();

        Some(Box::new(move || {
            for (tracked, id) in subscriptions {
                tracked.remove(id);
            }
        }) as Cleanup)
    });

    signal.readonly()
}

impl<T> ReadSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscribe the component to a projection of this signal.
    ///
    /// `selector(value)` is stored as render state. On each change the
    /// selector output replaces the state, requesting a re-render only
    /// when it differs from the stored one. `deps` controls
    /// re-subscription; the empty list subscribes once for the
    /// component's lifetime.
    pub fn use_selected<R>(
        &self,
        scope: &mut Scope,
        selector: impl Fn(&T) -> R + Send + Sync + 'static,
        deps: Vec<Dep>,
    ) -> R
    where
        R: Clone + PartialEq + Send + Sync + 'static,
    {
        let selector: Arc<dyn Fn(&T) -> R + Send + Sync> = Arc::new(selector);

        let (state, set_state) = scope.use_state({
            let selector = Arc::clone(&selector);
            let signal = self.clone();
            move || signal.with(|value| selector(value))
        });

        let signal = self.clone();
        scope.use_effect(deps, move || {
            let selector = Arc::clone(&selector);
            let set_state = set_state.clone();
            let subscription = signal.subscribe(move |value| set_state.set(selector(value)));
            Some(Box::new(move || subscription.cancel()) as Cleanup)
        });

        state
    }

    /// Subscribe the component to the signal's value itself.
    pub fn use_value(&self, scope: &mut Scope) -> T
    where
        T: PartialEq,
    {
        self.use_selected(scope, T::clone, Vec::new())
    }

    /// Run `handler` on every change, bound to the component lifecycle:
    /// subscribed on mount (or deps change), unsubscribed on cleanup.
    pub fn use_effect(
        &self,
        scope: &mut Scope,
        handler: impl Fn(&T) + Send + Sync + 'static,
        deps: Vec<Dep>,
    ) {
        let handler: Arc<dyn Fn(&T) + Send + Sync> = Arc::new(handler);
        let signal = self.clone();
        scope.use_effect(deps, move || {
            let handler = Arc::clone(&handler);
            let subscription = signal.subscribe(move |value| handler(value));
            Some(Box::new(move || subscription.cancel()) as Cleanup)
        });
    }
}
