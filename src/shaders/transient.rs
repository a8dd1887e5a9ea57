// SPDX-License-Identifier: GPL-3.0-only

//! Pool of transient per-frame texel buffers
//!
//! Pyramids are rebuilt every frame. Instead of allocating a fresh chain each
//! time, level buffers are borrowed from this pool and handed back when the
//! owning pyramid is dropped. `live()` counts buffers currently checked out,
//! which lets callers verify that every frame releases what it acquired.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Texel of a luminance pyramid: `[weighted luminance, weight]`
pub type LumTexel = [f32; 2];

/// Upper bound on idle buffers kept for reuse
const MAX_FREE_BUFFERS: usize = 64;

#[derive(Default)]
struct PoolInner {
    free: Vec<Vec<LumTexel>>,
    live: usize,
}

/// Shared, cloneable handle to a buffer pool
#[derive(Clone, Default)]
pub struct TransientPool {
    inner: Arc<Mutex<PoolInner>>,
}

impl TransientPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner> {
        // A panic while holding the lock leaves only bookkeeping behind
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Zeroed buffer of `len` texels, reusing an idle allocation when one fits
    pub fn acquire(&self, len: usize) -> Vec<LumTexel> {
        let mut inner = self.lock();
        inner.live += 1;
        let reuse = inner
            .free
            .iter()
            .position(|buf| buf.capacity() >= len)
            .map(|index| inner.free.swap_remove(index));
        drop(inner);

        match reuse {
            Some(mut buf) => {
                buf.clear();
                buf.resize(len, [0.0; 2]);
                buf
            }
            None => {
                debug!(len, "Allocating transient buffer");
                vec![[0.0; 2]; len]
            }
        }
    }

    /// Return a buffer obtained from [`acquire`](Self::acquire)
    pub fn release(&self, buf: Vec<LumTexel>) {
        let mut inner = self.lock();
        inner.live = inner.live.saturating_sub(1);
        if inner.free.len() < MAX_FREE_BUFFERS {
            inner.free.push(buf);
        }
    }

    /// Buffers currently checked out
    pub fn live(&self) -> usize {
        self.lock().live
    }

    /// Idle buffers available for reuse
    pub fn idle(&self) -> usize {
        self.lock().free.len()
    }

    /// Drop all idle buffers
    pub fn purge(&self) {
        self.lock().free.clear();
    }
}

impl std::fmt::Debug for TransientPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("TransientPool")
            .field("live", &inner.live)
            .field("idle", &inner.free.len())
            .finish()
    }
}
