//! Run interruption: a shared flag set by Ctrl-C and checked by workers.
//!
//! Workers check the token between items; the streaming write callback checks
//! it per chunk and aborts the in-flight transfer. A `.part` file may be left
//! behind; it is never renamed into place.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable interrupt flag shared between the signal handler and workers.
#[derive(Debug, Clone, Default)]
pub struct InterruptToken {
    flag: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request termination. Idempotent.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
