//! Direct-write display primitive.
//!
//! Binds a read-only signal to a [`TextNode`] and keeps the node's text in
//! sync by writing into it from the signal's change notifications,
//! bypassing the component re-render path for that leaf entirely.

use std::fmt::Display;
use std::sync::Arc;

use tracing::trace;

use super::text::TextNode;
use crate::component::{use_const, Cleanup, Scope};
use crate::reactive::{Dep, ReadSignal};

type Formatter<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Mount a text leaf showing `signal`'s formatted value.
///
/// The initial text is `formatter(signal.get())` at construction. The
/// subscription writes the formatted value into the node only when it
/// differs from the node's currently displayed text, so a change event
/// that formats to the displayed text performs no write.
///
/// The formatter passed on the latest render is the one the subscription
/// uses for the next change event; swapping formatters between renders
/// takes effect without re-subscribing.
pub fn signal_text<T>(
    scope: &mut Scope,
    signal: &ReadSignal<T>,
    formatter: impl Fn(&T) -> String + Send + Sync + 'static,
) -> TextNode
where
    T: Clone + Send + Sync + 'static,
{
    let formatter: Formatter<T> = Arc::new(formatter);

    let formatter_ref = scope.use_ref({
        let formatter = Arc::clone(&formatter);
        move || formatter
    });
    formatter_ref.set(Arc::clone(&formatter));

    let node = {
        let signal = signal.clone();
        let formatter = Arc::clone(&formatter);
        use_const(scope, move || {
            TextNode::new(signal.with(|value| formatter(value)))
        })
    };

    let subscribed = signal.clone();
    let target = node.clone();
    scope.use_effect(vec![Dep::from(signal)], move || {
        let target = target.clone();
        let formatter_ref = formatter_ref.clone();
        let signal_id = subscribed.id();
        let subscription = subscribed.subscribe(move |value| {
            let text = formatter_ref.with(|format| format(value));
            if text != target.text() {
                trace!(signal = signal_id, "direct text write");
                target.set_text(text);
            }
        });
        Some(Box::new(move || subscription.cancel()) as Cleanup)
    });

    node
}

impl<T> ReadSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Mount a text leaf bound to this signal with a custom formatter.
    pub fn display_with(
        &self,
        scope: &mut Scope,
        formatter: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> TextNode {
        signal_text(scope, self, formatter)
    }
}

impl<T> ReadSignal<T>
where
    T: Clone + Send + Sync + Display + 'static,
{
    /// Mount a text leaf showing this signal through its `Display` impl.
    pub fn display(&self, scope: &mut Scope) -> TextNode {
        signal_text(scope, self, |value| value.to_string())
    }
}
