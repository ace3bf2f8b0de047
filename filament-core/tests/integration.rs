//! Integration Tests for the Reactive System
//!
//! These tests drive signals, component hooks, and the display primitive
//! together through a component scope.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use filament_core::{use_computed, use_const, use_signal, Dep, Scope, Signal};

/// `set` notifies exactly once per actual change and stays silent on
/// unchanged assignments.
#[test]
fn set_dedupes_unchanged_values() {
    let signal = Signal::new(0);
    let log = Arc::new(Mutex::new(Vec::new()));

    let subscription = signal.subscribe({
        let log = Arc::clone(&log);
        move |v| log.lock().push(*v)
    });

    signal.set(1);
    signal.set(1);
    signal.set(2);

    assert_eq!(*log.lock(), vec![1, 2]);
    subscription.cancel();
}

/// A cancelled subscription never fires, even when cancelled before any
/// change happened.
#[test]
fn cancelled_subscription_never_fires() {
    let signal = Signal::new(0);
    let fired = Arc::new(AtomicUsize::new(0));

    let subscription = signal.subscribe({
        let fired = Arc::clone(&fired);
        move |_| {
            fired.fetch_add(1, Ordering::SeqCst);
        }
    });

    subscription.cancel();
    signal.set(1);

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

/// `bump` notifies with the current value regardless of equality.
#[test]
fn bump_carries_the_current_value() {
    let signal = Signal::new(7);
    let log = Arc::new(Mutex::new(Vec::new()));

    let subscription = signal.subscribe({
        let log = Arc::clone(&log);
        move |v| log.lock().push(*v)
    });

    signal.bump();
    signal.set(8);
    signal.bump();

    assert_eq!(*log.lock(), vec![7, 8, 8]);
    subscription.cancel();
}

/// The read-only view observes every write immediately; it is an alias,
/// not a copy.
#[test]
fn readonly_view_is_never_stale() {
    let signal = Signal::new(1);
    let view = signal.readonly();

    for next in 2..=5 {
        signal.set(next);
        assert_eq!(view.get(), signal.get());
    }
}

/// A handler that writes a second signal cascades synchronously, before
/// the outer `set` returns.
#[test]
fn set_cascades_synchronously() {
    let first = Signal::new(0);
    let second = Signal::new(0);
    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let forward = first.subscribe({
        let second = second.clone();
        let order = Arc::clone(&order);
        move |v| {
            order.lock().push(format!("first={v}"));
            second.set(v * 10);
        }
    });
    let observe = second.subscribe({
        let order = Arc::clone(&order);
        move |v| order.lock().push(format!("second={v}"))
    });

    first.set(1);
    assert_eq!(*order.lock(), vec!["first=1", "second=10"]);

    forward.cancel();
    observe.cancel();
}

/// Only the first render's producer ever runs; later producers are
/// ignored along with their values.
#[test]
fn stable_value_ignores_later_producers() {
    let mut scope = Scope::new();
    let second_ran = Arc::new(AtomicUsize::new(0));

    let first = scope.render(|cx| use_const(cx, || "first"));

    let value = {
        let second_ran = Arc::clone(&second_ran);
        scope.render(move |cx| {
            use_const(cx, move || {
                second_ran.fetch_add(1, Ordering::SeqCst);
                "second"
            })
        })
    };

    assert_eq!(first, "first");
    assert_eq!(value, "first");
    assert_eq!(second_ran.load(Ordering::SeqCst), 0);
    scope.unmount();
}

/// The component-owned signal keeps its identity across renders and
/// ignores later defaults.
#[test]
fn component_signal_identity_is_stable() {
    let mut scope = Scope::new();

    let first = scope.render(|cx| use_signal(cx, 1));
    let second = scope.render(|cx| use_signal(cx, 99));

    assert_eq!(first.id(), second.id());
    assert_eq!(second.get(), 1);

    first.set(5);
    assert_eq!(second.get(), 5);
    scope.unmount();
}

/// The computed-signal scenario: sum of two signals, one notification per
/// recomputation, dead after unmount.
#[test]
fn computed_signal_follows_dependencies() {
    let mut scope = Scope::new();
    let a = Signal::new(1);
    let b = Signal::new(2);

    let sum = {
        let (a_inner, b_inner) = (a.clone(), b.clone());
        scope.render(|cx| {
            use_computed(
                cx,
                move || a_inner.get() + b_inner.get(),
                vec![Dep::from(&a), Dep::from(&b)],
            )
        })
    };

    assert_eq!(sum.get(), 3);

    let notifications = Arc::new(Mutex::new(Vec::new()));
    let subscription = sum.subscribe({
        let notifications = Arc::clone(&notifications);
        move |v| notifications.lock().push(*v)
    });

    a.set(5);
    assert_eq!(sum.get(), 8);
    assert_eq!(*notifications.lock(), vec![8]);

    subscription.cancel();
    scope.unmount();

    a.set(100);
    assert_eq!(sum.get(), 8);
    assert_eq!(a.subscriber_count(), 0);
    assert_eq!(b.subscriber_count(), 0);
}

/// Changing the dependency list re-subscribes and refreshes the computed
/// value immediately, without waiting for a change event.
#[test]
fn computed_resubscribes_on_dependency_change() {
    let mut scope = Scope::new();
    let first = Signal::new(10);
    let second = Signal::new(20);

    let render_with = |scope: &mut Scope, source: &Signal<i32>| {
        let source_inner = source.clone();
        scope.render(|cx| use_computed(cx, move || source_inner.get(), vec![Dep::from(source)]))
    };

    let view = render_with(&mut scope, &first);
    assert_eq!(view.get(), 10);

    let view = render_with(&mut scope, &second);
    assert_eq!(view.get(), 20);
    assert_eq!(first.subscriber_count(), 0);

    first.set(11);
    assert_eq!(view.get(), 20);

    second.set(21);
    assert_eq!(view.get(), 21);

    scope.unmount();
    assert_eq!(second.subscriber_count(), 0);
}

/// A signal listed twice in the dependency list is subscribed once per
/// occurrence and recomputes once per occurrence per change.
#[test]
fn duplicate_dependency_entries_subscribe_twice() {
    let mut scope = Scope::new();
    let source = Signal::new(1);
    let runs = Arc::new(AtomicUsize::new(0));

    let view = {
        let runs = Arc::clone(&runs);
        let source_inner = source.clone();
        scope.render(|cx| {
            use_computed(
                cx,
                move || {
                    runs.fetch_add(1, Ordering::SeqCst);
                    source_inner.get()
                },
                vec![Dep::from(&source), Dep::from(&source)],
            )
        })
    };

    // Seed plus the mount refresh.
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(source.subscriber_count(), 2);

    source.set(5);
    assert_eq!(runs.load(Ordering::SeqCst), 4);
    assert_eq!(view.get(), 5);

    scope.unmount();
    assert_eq!(source.subscriber_count(), 0);
}

/// `use_value` subscribes the component and requests a re-render exactly
/// when the value changes.
#[test]
fn use_value_drives_re_renders() {
    let mut scope = Scope::new();
    let count = Signal::new(0);

    let shown = scope.render(|cx| count.use_value(cx));
    assert_eq!(shown, 0);
    assert!(!scope.needs_render());

    count.set(3);
    assert!(scope.needs_render());

    let shown = scope.render(|cx| count.use_value(cx));
    assert_eq!(shown, 3);

    scope.unmount();
    count.set(9);
    assert!(!scope.needs_render());
    assert_eq!(count.subscriber_count(), 0);
}

/// A selector gates re-renders on its own output, not on the raw value.
#[test]
fn selector_filters_re_renders() {
    let mut scope = Scope::new();
    let count = Signal::new(1);

    let parity = scope.render(|cx| count.use_selected(cx, |v| v % 2, Vec::new()));
    assert_eq!(parity, 1);

    count.set(3);
    assert!(!scope.needs_render());

    count.set(4);
    assert!(scope.needs_render());

    let parity = scope.render(|cx| count.use_selected(cx, |v| v % 2, Vec::new()));
    assert_eq!(parity, 0);
    scope.unmount();
}

/// The display primitive writes straight into the node: one mutation per
/// displayed change, none for unchanged values, no component re-render.
#[test]
fn display_writes_directly_into_the_node() {
    let mut scope = Scope::new();
    let word = Signal::new("x".to_string());

    let node = scope.render(|cx| word.display(cx));
    assert_eq!(node.text(), "x");
    assert_eq!(node.mutation_count(), 0);

    word.set("y".to_string());
    assert_eq!(node.text(), "y");
    assert_eq!(node.mutation_count(), 1);
    assert!(!scope.needs_render());

    // Unchanged set: the signal itself stays silent.
    word.set("y".to_string());
    assert_eq!(node.mutation_count(), 1);

    // Forced notification that formats to the displayed text: no write.
    word.bump();
    assert_eq!(node.mutation_count(), 1);

    scope.unmount();
    word.set("z".to_string());
    assert_eq!(node.text(), "y");
}

/// A formatter swapped between renders applies on the next change event,
/// through the same single subscription.
#[test]
fn formatter_swaps_without_resubscribing() {
    let mut scope = Scope::new();
    let count = Signal::new(1);

    let node = scope.render(|cx| count.display_with(cx, |v| format!("n={v}")));
    assert_eq!(node.text(), "n=1");
    assert_eq!(count.subscriber_count(), 1);

    let node = scope.render(|cx| count.display_with(cx, |v| format!("#{v}")));
    assert_eq!(count.subscriber_count(), 1);
    assert_eq!(node.text(), "n=1");

    count.set(2);
    assert_eq!(node.text(), "#2");
    assert_eq!(node.mutation_count(), 1);

    scope.unmount();
    assert_eq!(count.subscriber_count(), 0);
}

/// In-place mutation is invisible to the change test until `bump`.
#[test]
fn in_place_mutation_needs_bump() {
    let items = Signal::with_eq(Arc::new(Mutex::new(vec![1, 2])), |a, b| Arc::ptr_eq(a, b));
    let lengths = Arc::new(Mutex::new(Vec::new()));

    let subscription = items.subscribe({
        let lengths = Arc::clone(&lengths);
        move |v: &Arc<Mutex<Vec<i32>>>| lengths.lock().push(v.lock().len())
    });

    // Mutate in place: the cell still holds the same allocation, so
    // re-setting the handle is silent.
    items.get().lock().push(3);
    items.set(items.get());
    assert!(lengths.lock().is_empty());

    items.bump();
    assert_eq!(*lengths.lock(), vec![3]);

    subscription.cancel();
}
