//! One-shot cancellation latch for async work owned by a widget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A boolean latch shared between the owner of some async work and the work
/// itself.
///
/// The owner trips the latch when the work becomes irrelevant (parameters
/// changed, widget torn down). Whoever applies the result checks the latch
/// first and drops the result if it was tripped.
#[derive(Debug, Clone, Default)]
pub struct CancelLatch(Arc<AtomicBool>);

impl CancelLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the associated work as stale.
    pub fn trip(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
