//! Text leaf node.
//!
//! The rendering boundary the display primitive writes into: a leaf node
//! holding mutable text content, with a handle that stays valid after
//! mount. Writes go straight to the node; nothing above it re-renders.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

struct TextInner {
    text: RwLock<String>,
    mutations: AtomicUsize,
}

/// Shared handle to a mutable text leaf.
#[derive(Clone)]
pub struct TextNode {
    inner: Arc<TextInner>,
}

impl TextNode {
    /// Create a node with its initial content. The initial content does
    /// not count as a mutation.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TextInner {
                text: RwLock::new(text.into()),
                mutations: AtomicUsize::new(0),
            }),
        }
    }

    /// The currently displayed text.
    pub fn text(&self) -> String {
        self.inner.text.read().clone()
    }

    /// Overwrite the displayed text.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.inner.text.write() = text.into();
        self.inner.mutations.fetch_add(1, Ordering::Relaxed);
    }

    /// How many direct writes the node has received since creation.
    pub fn mutation_count(&self) -> usize {
        self.inner.mutations.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNode")
            .field("text", &*self.inner.text.read())
            .field("mutations", &self.mutation_count())
            .finish()
    }
}

impl fmt::Display for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.text.read())
    }
}
