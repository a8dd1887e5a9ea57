// SPDX-License-Identifier: GPL-3.0-only

//! Gaze-adaptive tone mapper
//!
//! Runs the per-frame pass sequence and owns the only state that survives
//! between frames, the temporal luminance store.
//!
//! ```text
//! source ─▶ Weight (+ mips) ─▶ coarse luminance ─┬─▶ Init        (bootstrap frame)
//!                                                 └─▶ Luminance ─▶ tone map ─▶ destination
//! ```
//!
//! Each pass completes before the next one starts. The store is double
//! buffered, so the blend always reads the previous frame's value even though
//! the same frame writes a new one.

pub mod state;
pub mod temporal;

pub use state::{FrameOutcome, PipelineMode};
pub use temporal::TemporalLuminanceStore;

use crate::constants::{PROGRAM_NAME, defaults};
use crate::errors::{ConfigurationError, PipelineError, PipelineResult};
use crate::gaze::GazeState;
use crate::shaders::{
    self, Pass, PassParams, ProgramRegistry, ShadingProgram, ToneMappingOperatorType,
    TransientPool,
};
use crate::texture::Texture;
use state::{ActivePipeline, PipelineState};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// How fast and how strongly the stored luminance follows the measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptationParameters {
    /// 0 never adapts; larger values adapt faster
    pub adaptation_scale: f32,
    /// Reinhard key
    pub luminance_key: f32,
}

impl Default for AdaptationParameters {
    fn default() -> Self {
        Self {
            adaptation_scale: defaults::ADAPTATION_SCALE,
            luminance_key: defaults::LUMINANCE_KEY,
        }
    }
}

/// Diagnostic switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugFlags {
    /// Render only the gaze mask
    pub show_mask: bool,
    /// Isoline level for the debug operator
    pub debug_parameter: f32,
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self {
            show_mask: false,
            debug_parameter: defaults::DEBUG_PARAMETER,
        }
    }
}

/// Everything `render` consumes besides the textures
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameParams {
    pub gaze: GazeState,
    pub adaptation: AdaptationParameters,
    pub operator: ToneMappingOperatorType,
    pub debug: DebugFlags,
}

/// Temporal, gaze-weighted tone mapper for one view set.
///
/// Each concurrently rendered view set needs its own instance.
pub struct GazeToneMapper {
    registry: ProgramRegistry,
    program_name: String,
    layers: usize,
    pool: TransientPool,
    state: PipelineState,
    frame_index: u64,
}

impl GazeToneMapper {
    /// Tone mapper resolving its program from `registry`
    pub fn new(registry: ProgramRegistry) -> Self {
        Self {
            registry,
            program_name: PROGRAM_NAME.to_string(),
            layers: 1,
            pool: TransientPool::new(),
            state: PipelineState::Uninitialized,
            frame_index: 0,
        }
    }

    /// Tone mapper backed by the built-in program
    pub fn with_builtin() -> Self {
        Self::new(ProgramRegistry::with_builtin())
    }

    /// Number of texture layers (views) rendered per frame; applies at setup
    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers.max(1);
        self
    }

    /// Resolve a different program name at setup
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    /// Resolve the program, allocate the temporal store and arm the
    /// bootstrap frame.
    ///
    /// Calling it again without [`teardown`](Self::teardown) clears the
    /// existing store and re-arms the bootstrap. On error the instance stays
    /// disabled until teardown.
    pub fn setup(&mut self) -> PipelineResult<()> {
        let previous = match std::mem::replace(&mut self.state, PipelineState::Uninitialized) {
            PipelineState::Uninitialized => None,
            PipelineState::Failed => {
                warn!("Tone mapper set up again after a failed setup");
                None
            }
            PipelineState::Active(active) => {
                warn!("Tone mapper set up again without teardown; re-arming bootstrap");
                Some(active.store)
            }
        };
        self.pool.purge();
        self.frame_index = 0;

        match self.resolve_program() {
            Ok(program) => {
                info!(
                    program = program.name(),
                    layers = self.layers,
                    "Tone mapper ready"
                );
                let store = match previous {
                    Some(mut store) if store.layer_count() == self.layers => {
                        store.clear();
                        store
                    }
                    _ => TemporalLuminanceStore::new(self.layers),
                };
                self.state = PipelineState::Active(ActivePipeline {
                    program,
                    store,
                    bootstrap_pending: true,
                });
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Tone mapper setup failed, effect disabled");
                self.state = PipelineState::Failed;
                Err(err.into())
            }
        }
    }

    fn resolve_program(&self) -> Result<Arc<dyn ShadingProgram>, ConfigurationError> {
        let program = self
            .registry
            .find(&self.program_name)
            .ok_or_else(|| ConfigurationError::ProgramNotFound(self.program_name.clone()))?;

        if let Some(pass) = Pass::CORE.iter().find(|pass| !program.has_pass(**pass)) {
            return Err(ConfigurationError::MissingPass {
                program: self.program_name.clone(),
                pass: pass.name().to_string(),
            });
        }

        Ok(program)
    }

    /// Release the store and the program
    pub fn teardown(&mut self) {
        if matches!(self.state, PipelineState::Active(_)) {
            info!(frames = self.frame_index, "Tone mapper torn down");
        }
        self.state = PipelineState::Uninitialized;
        self.pool.purge();
        self.frame_index = 0;
    }

    /// Mode the next frame runs in for the given gaze
    pub fn mode(&self, gaze: &GazeState) -> PipelineMode {
        self.state.mode(gaze)
    }

    /// Whether setup succeeded and teardown has not run since
    pub fn is_active(&self) -> bool {
        matches!(self.state, PipelineState::Active(_))
    }

    /// Adapted luminance published by the last completed frame, per layer
    pub fn stored_luminance(&self) -> Option<&[f32]> {
        match &self.state {
            PipelineState::Active(active) => active.store.read(),
            _ => None,
        }
    }

    /// Pool backing the per-frame pyramids
    pub fn transient_pool(&self) -> &TransientPool {
        &self.pool
    }

    /// Render one frame.
    ///
    /// Leaves `destination` untouched when disabled and on the bootstrap
    /// frame; the host shows the source unchanged in that case.
    pub fn render(
        &mut self,
        source: &Texture,
        destination: &mut Texture,
        frame: &FrameParams,
    ) -> PipelineResult<FrameOutcome> {
        let mode = self.state.mode(&frame.gaze);
        let PipelineState::Active(active) = &mut self.state else {
            trace!("Tone mapper inactive, skipping frame");
            return Ok(FrameOutcome::Skipped);
        };
        if mode == PipelineMode::Disabled {
            trace!(sigma = frame.gaze.sigma, "Gaze weighting disabled, skipping frame");
            return Ok(FrameOutcome::Skipped);
        }

        source.ensure_compatible(destination)?;
        if source.layer_count() != active.store.layer_count() {
            return Err(PipelineError::TextureMismatch(format!(
                "{} layers rendered, store holds {}",
                source.layer_count(),
                active.store.layer_count()
            )));
        }
        if source.is_empty() {
            return Ok(FrameOutcome::Skipped);
        }

        self.frame_index += 1;
        let program = active.program.as_ref();
        let mut params =
            PassParams::new(&frame.gaze, &frame.adaptation, frame.debug.debug_parameter);

        if frame.debug.show_mask {
            shaders::render_mask(program, destination, &params);
            debug!(frame = self.frame_index, "Rendered gaze mask");
            return Ok(FrameOutcome::Mask);
        }

        let tone_pass = Pass::ToneMap(frame.operator);
        if !program.has_pass(tone_pass) {
            return Err(ConfigurationError::MissingPass {
                program: program.name().to_string(),
                pass: tone_pass.name().to_string(),
            }
            .into());
        }

        let pyramid = shaders::reduce(program, source, &params, &self.pool);
        params.max_mip_level = pyramid.max_mip_level();
        let measured = pyramid.measured();

        // The store holds a committed value exactly when bootstrap has run
        debug_assert_eq!(active.bootstrap_pending, !active.store.is_initialized());
        let stored = if active.bootstrap_pending {
            None
        } else {
            active.store.read().map(<[f32]>::to_vec)
        };
        let Some(stored) = stored else {
            debug!(frame = self.frame_index, ?measured, "First frame, seeding luminance");
            active.store.write(&measured);
            active.store.end_frame();
            active.bootstrap_pending = false;
            return Ok(FrameOutcome::Bootstrapped { measured });
        };

        let adapted: Vec<f32> = stored
            .iter()
            .zip(&measured)
            .map(|(&stored, &measured)| {
                program.adapt(stored, measured, frame.adaptation.adaptation_scale)
            })
            .collect();
        active.store.write(&adapted);

        shaders::tonemap::apply(
            program,
            frame.operator,
            source,
            destination,
            &adapted,
            &params,
        );
        drop(pyramid);
        active.store.end_frame();

        debug!(
            frame = self.frame_index,
            operator = %frame.operator,
            max_mip = params.max_mip_level,
            ?measured,
            ?adapted,
            "Tone mapped frame"
        );

        Ok(FrameOutcome::ToneMapped { measured, adapted })
    }
}

impl Drop for GazeToneMapper {
    fn drop(&mut self) {
        self.teardown();
    }
}
