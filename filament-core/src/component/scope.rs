//! Component Scope
//!
//! The host framework's lifecycle contract, modelled as a concrete
//! component instance. A `Scope` owns the hook slots of one component:
//! local render state, stable refs, and effects with dependency lists and
//! cleanup functions. Hooks claim slots in call order, which is how the
//! same state is found again on the next render.
//!
//! # Render protocol
//!
//! 1. The driver calls [`Scope::render`] with the component body. Hook
//!    calls inside the body claim slots in call order.
//!
//! 2. After the body returns, effects whose dependency lists changed run:
//!    the previous run's cleanup first, then the effect, keeping its new
//!    cleanup.
//!
//! 3. A state setter that observes an actual change requests a re-render.
//!    The driver polls [`Scope::needs_render`] and calls `render` again.
//!
//! 4. [`Scope::unmount`] runs every outstanding cleanup and retires the
//!    scope.
//!
//! Hooks must be called in the same order with the same types on every
//! render; violations panic. Scopes are single-threaded: setters and refs
//! are `Send + Sync` and may be poked from signal handlers, but the scope
//! itself stays on the thread that drives it.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::reactive::{deps_changed, Dep};

/// Cleanup function returned by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

type EffectFn = Box<dyn FnMut() -> Option<Cleanup>>;

struct StateCell<T> {
    value: RwLock<T>,
    render_requested: Arc<AtomicBool>,
}

/// Setter half of [`Scope::use_state`].
pub struct SetState<T> {
    cell: Arc<StateCell<T>>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> SetState<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// Store `next` and request a re-render, unless it equals the current
    /// state. Equality is the host's default change comparison for render
    /// state.
    pub fn set(&self, next: T) {
        let mut value = self.cell.value.write();
        if *value != next {
            *value = next;
            self.cell.render_requested.store(true, Ordering::SeqCst);
        }
    }
}

/// Stable mutable holder created by [`Scope::use_ref`].
///
/// Identity survives re-renders; mutation never requests a render.
pub struct StableRef<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for StableRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> StableRef<T>
where
    T: Send + Sync + 'static,
{
    /// A clone of the held value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.read().clone()
    }

    /// Replace the held value.
    pub fn set(&self, value: T) {
        *self.inner.write() = value;
    }

    /// Read the held value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read())
    }
}

struct EffectSlot {
    deps: Vec<Dep>,
    run: Option<EffectFn>,
    cleanup: Option<Cleanup>,
    scheduled: bool,
}

enum Slot {
    State(Arc<dyn Any + Send + Sync>),
    Ref(Arc<dyn Any + Send + Sync>),
    Effect(EffectSlot),
}

/// One component instance: hook storage plus lifecycle.
pub struct Scope {
    slots: Vec<Slot>,
    cursor: usize,
    mounted: bool,
    render_requested: Arc<AtomicBool>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            cursor: 0,
            mounted: true,
            render_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run one render pass: the component body, then scheduled effects.
    pub fn render<R>(&mut self, body: impl FnOnce(&mut Scope) -> R) -> R {
        assert!(self.mounted, "render called on an unmounted scope");
        self.cursor = 0;
        self.render_requested.store(false, Ordering::SeqCst);
        let output = body(self);
        self.flush_effects();
        output
    }

    /// Whether a state setter requested a re-render since the last render
    /// pass started.
    pub fn needs_render(&self) -> bool {
        self.render_requested.load(Ordering::SeqCst)
    }

    /// Run outstanding effect cleanups and retire the scope. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        for slot in self.slots.iter_mut() {
            if let Slot::Effect(effect) = slot {
                if let Some(cleanup) = effect.cleanup.take() {
                    cleanup();
                }
            }
        }
    }

    /// Local render state. `init` runs on the first render only; later
    /// renders return the current value.
    pub fn use_state<T>(&mut self, init: impl FnOnce() -> T) -> (T, SetState<T>)
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        let index = self.claim_slot();
        if index == self.slots.len() {
            let cell = Arc::new(StateCell {
                value: RwLock::new(init()),
                render_requested: Arc::clone(&self.render_requested),
            });
            self.slots.push(Slot::State(cell));
        }
        let cell = match &self.slots[index] {
            Slot::State(any) => Arc::clone(any)
                .downcast::<StateCell<T>>()
                .unwrap_or_else(|_| panic!("state hook type changed between renders")),
            _ => panic!("hook order changed between renders"),
        };
        let value = cell.value.read().clone();
        (value, SetState { cell })
    }

    /// A holder whose identity is stable across renders. `init` runs on
    /// the first render only.
    pub fn use_ref<T>(&mut self, init: impl FnOnce() -> T) -> StableRef<T>
    where
        T: Send + Sync + 'static,
    {
        let index = self.claim_slot();
        if index == self.slots.len() {
            self.slots.push(Slot::Ref(Arc::new(RwLock::new(init()))));
        }
        match &self.slots[index] {
            Slot::Ref(any) => StableRef {
                inner: Arc::clone(any)
                    .downcast::<RwLock<T>>()
                    .unwrap_or_else(|_| panic!("ref hook type changed between renders")),
            },
            _ => panic!("hook order changed between renders"),
        }
    }

    /// Register an effect.
    ///
    /// The effect runs after the render in which its dependency list
    /// first appears or changes (shallow per-element comparison); the
    /// empty list means the mount render only. The closure passed on the
    /// latest render is the one that runs. A returned cleanup runs before
    /// the next execution and on unmount.
    pub fn use_effect(&mut self, deps: Vec<Dep>, run: impl FnMut() -> Option<Cleanup> + 'static) {
        let index = self.claim_slot();
        if index == self.slots.len() {
            self.slots.push(Slot::Effect(EffectSlot {
                deps,
                run: Some(Box::new(run)),
                cleanup: None,
                scheduled: true,
            }));
            return;
        }
        match &mut self.slots[index] {
            Slot::Effect(effect) => {
                let changed = deps_changed(&effect.deps, &deps);
                effect.run = Some(Box::new(run));
                if changed {
                    effect.deps = deps;
                    effect.scheduled = true;
                }
            }
            _ => panic!("hook order changed between renders"),
        }
    }

    fn claim_slot(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        assert!(index <= self.slots.len(), "hook slots out of sync");
        index
    }

    fn flush_effects(&mut self) {
        for index in 0..self.slots.len() {
            let (mut run, cleanup) = match &mut self.slots[index] {
                Slot::Effect(effect) if effect.scheduled => {
                    effect.scheduled = false;
                    (effect.run.take(), effect.cleanup.take())
                }
                _ => continue,
            };
            if let Some(cleanup) = cleanup {
                cleanup();
            }
            trace!(slot = index, "running effect");
            let next_cleanup = run.as_mut().and_then(|f| f());
            if let Some(Slot::Effect(effect)) = self.slots.get_mut(index) {
                effect.run = run;
                effect.cleanup = next_cleanup;
            }
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
