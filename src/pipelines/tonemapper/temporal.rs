// SPDX-License-Identifier: GPL-3.0-only

//! Persistent adapted luminance carried from frame to frame
//!
//! Two 1x1xN slots: `front` is what this frame reads, `back` receives this
//! frame's write. [`TemporalLuminanceStore::end_frame`] publishes the back
//! slot, so a value written in frame N is first readable in frame N+1.

use tracing::trace;

/// Double-buffered per-layer luminance scalar
#[derive(Debug, Clone)]
pub struct TemporalLuminanceStore {
    slots: [Option<Vec<f32>>; 2],
    front: usize,
    pending: bool,
    layers: usize,
}

impl TemporalLuminanceStore {
    /// Allocate an empty store for `layers` views
    pub fn new(layers: usize) -> Self {
        Self {
            slots: [None, None],
            front: 0,
            pending: false,
            layers: layers.max(1),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers
    }

    /// Whether a value has been published yet
    pub fn is_initialized(&self) -> bool {
        self.slots[self.front].is_some()
    }

    /// Values published by the previous frame; `None` before the first commit
    pub fn read(&self) -> Option<&[f32]> {
        self.slots[self.front].as_deref()
    }

    /// Overwrite the back slot. Not visible to [`read`](Self::read) until
    /// [`end_frame`](Self::end_frame).
    pub fn write(&mut self, values: &[f32]) {
        let back = 1 - self.front;
        let slot = self.slots[back].get_or_insert_with(Vec::new);
        slot.clear();
        slot.extend_from_slice(values);
        slot.resize(self.layers, values.last().copied().unwrap_or(0.0));
        self.pending = true;
        trace!(?values, "Temporal luminance written");
    }

    /// Publish this frame's write, if any
    pub fn end_frame(&mut self) {
        if self.pending {
            self.front = 1 - self.front;
            self.pending = false;
        }
    }

    /// Forget every stored value
    pub fn clear(&mut self) {
        self.slots = [None, None];
        self.front = 0;
        self.pending = false;
    }
}
