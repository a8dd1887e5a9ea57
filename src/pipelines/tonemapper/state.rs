// SPDX-License-Identifier: GPL-3.0-only

//! Lifecycle and per-frame mode of a tone mapper instance

use super::temporal::TemporalLuminanceStore;
use crate::gaze::GazeState;
use crate::shaders::ShadingProgram;
use std::sync::Arc;

/// Behavior governing one frame. Derived from the lifecycle and the gaze,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// No program available or sigma <= 0; render leaves the destination alone
    Disabled,
    /// First frame after setup; seeds the temporal store
    Bootstrapping,
    /// Regular frames; blend and tone map
    Steady,
}

/// What a call to `render` did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Nothing ran; destination untouched
    Skipped,
    /// Gaze mask written to destination
    Mask,
    /// Temporal store seeded with the measured luminance; destination untouched
    Bootstrapped { measured: Vec<f32> },
    /// Destination tone mapped with the adapted luminance
    ToneMapped {
        measured: Vec<f32>,
        adapted: Vec<f32>,
    },
}

impl FrameOutcome {
    /// Whether the destination was written
    pub fn wrote_destination(&self) -> bool {
        matches!(self, FrameOutcome::Mask | FrameOutcome::ToneMapped { .. })
    }
}

/// Resources held between `setup` and `teardown`
pub(crate) struct ActivePipeline {
    pub program: Arc<dyn ShadingProgram>,
    pub store: TemporalLuminanceStore,
    /// Cleared once the bootstrap frame has run
    pub bootstrap_pending: bool,
}

/// Explicit per-instance state
pub(crate) enum PipelineState {
    /// Before setup or after teardown
    Uninitialized,
    /// Setup failed; stays disabled until teardown
    Failed,
    Active(ActivePipeline),
}

impl PipelineState {
    pub fn mode(&self, gaze: &GazeState) -> PipelineMode {
        match self {
            PipelineState::Active(active) if gaze.is_enabled() => {
                if active.bootstrap_pending {
                    PipelineMode::Bootstrapping
                } else {
                    PipelineMode::Steady
                }
            }
            _ => PipelineMode::Disabled,
        }
    }
}
