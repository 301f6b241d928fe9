//! Single-slot holder for the latest source text.
//!
//! Producers replace or extend the text as chunks arrive; the reveal tick
//! loads whatever is current without being restarted. Readers never block
//! writers and always see a complete string.

use arc_swap::ArcSwap;
use std::sync::Arc;

/// Shared, append-mostly source text.
///
/// Cloning the cell shares the slot, so a network reader and the reveal
/// tick can hold their own handles.
#[derive(Debug, Clone)]
pub struct SourceCell {
    slot: Arc<ArcSwap<String>>,
}

impl Default for SourceCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::with_text(String::new())
    }

    /// Create a cell holding `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(ArcSwap::from_pointee(text.into())),
        }
    }

    /// Snapshot of the current text.
    pub fn load(&self) -> Arc<String> {
        self.slot.load_full()
    }

    /// Replace the text. No-op when the text is unchanged.
    pub fn set(&self, text: &str) {
        if self.slot.load().as_str() != text {
            self.slot.store(Arc::new(text.to_owned()));
        }
    }

    /// Append a chunk to the current text.
    pub fn append(&self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.slot.rcu(|current| {
            let mut next = String::with_capacity(current.len() + chunk.len());
            next.push_str(current);
            next.push_str(chunk);
            next
        });
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.slot.load().len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.slot.load().is_empty()
    }

    /// Whether two handles share the same slot.
    pub fn shares_slot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}
