//! Debug-only reentrancy detection for table entry points.
//!
//! The only user code a table runs is its `KeyHasher`. A hasher that reaches
//! back into the same table (through a raw pointer or a shared cell) would
//! observe a half-updated bucket array during `put` or `resize_table`. In
//! debug builds every public operation marks the table busy and a nested
//! entry panics naming both operations. Release builds compile this away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Busy marker embedded in each table.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Tables are single-threaded; this keeps them !Send and !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _single_thread: PhantomData,
        }
    }

    /// Marks the table busy with `op` until the returned guard drops.
    ///
    /// Panics in debug builds if another operation is already in progress.
    #[inline]
    pub fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call to `{op}` while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            ReentrancyGuard {
                _owner: PhantomData,
            }
        }
    }

    /// Name of the operation currently holding the table, if any.
    #[cfg(debug_assertions)]
    pub fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the busy marker on drop.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let prev = self.owner.active.take();
            debug_assert!(prev.is_some());
        }
    }
}
