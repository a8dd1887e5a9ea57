// SPDX-License-Identifier: GPL-3.0-only
//! Shading program and pass implementations
//!
//! A shading program bundles the per-pixel functions every pass evaluates
//! (luminance, gaze weight, temporal blend) together with the set of named
//! passes it provides. The pipeline resolves one program by name at setup,
//! checks that it provides the core passes, and from then on dispatches
//! passes by [`Pass`] value only. Tone mapping passes are checked when an
//! operator is selected.
//!
//! Passes:
//! - `Mask`: gaze weight field into the destination
//! - `Weight`: weighted luminance into level 0 of the pyramid, plus mips
//! - `Init`: coarse luminance copied into the temporal store
//! - `Luminance`: coarse luminance blended with the temporal store
//! - one tone mapping pass per [`ToneMappingOperatorType`]

pub mod luminance;
pub mod mask;
pub mod params;
pub mod tonemap;
pub mod transient;

pub use luminance::{LuminancePyramid, MipLevel, blend_luminance, reduce, relative_luminance};
pub use mask::render_mask;
pub use params::PassParams;
pub use tonemap::ToneMappingOperatorType;
pub use transient::TransientPool;

use crate::constants::PROGRAM_NAME;
use crate::gaze::{GazeState, gaze_weight};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Named pass of a shading program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Mask,
    Weight,
    Init,
    Luminance,
    ToneMap(ToneMappingOperatorType),
}

impl Pass {
    /// Passes every frame depends on regardless of the selected operator
    pub const CORE: [Pass; 4] = [Pass::Mask, Pass::Weight, Pass::Init, Pass::Luminance];

    /// Every pass the tone mapping pipeline may dispatch
    pub const ALL: [Pass; 8] = [
        Pass::Mask,
        Pass::Weight,
        Pass::Init,
        Pass::Luminance,
        Pass::ToneMap(ToneMappingOperatorType::None),
        Pass::ToneMap(ToneMappingOperatorType::Reinhard),
        Pass::ToneMap(ToneMappingOperatorType::ReinhardWithGaze),
        Pass::ToneMap(ToneMappingOperatorType::Debug),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pass::Mask => "Mask",
            Pass::Weight => "Weight",
            Pass::Init => "Init",
            Pass::Luminance => "Luminance",
            Pass::ToneMap(ToneMappingOperatorType::None) => "None",
            Pass::ToneMap(ToneMappingOperatorType::Reinhard) => "Reinhard",
            Pass::ToneMap(ToneMappingOperatorType::ReinhardWithGaze) => "ReinhardGaze",
            Pass::ToneMap(ToneMappingOperatorType::Debug) => "Debug",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-pixel functions and pass table of a shading program.
///
/// The default method bodies are the reference implementations; a program
/// only overrides what it does differently.
pub trait ShadingProgram: Send + Sync {
    /// Name the program is registered under
    fn name(&self) -> &str;

    /// Whether the program provides `pass`
    fn has_pass(&self, pass: Pass) -> bool;

    /// Scalar luminance of a linear RGB color
    fn luminance(&self, rgb: [f32; 3]) -> f32 {
        relative_luminance(rgb)
    }

    /// Importance of normalized position `(u, v)`; `gaze.sigma > 0`
    fn weight(&self, u: f32, v: f32, gaze: &GazeState, aspect: f32) -> f32 {
        gaze_weight(u, v, gaze, aspect)
    }

    /// Temporal blend used by the `Luminance` pass
    fn adapt(&self, stored: f32, measured: f32, adaptation_scale: f32) -> f32 {
        blend_luminance(stored, measured, adaptation_scale)
    }
}

/// The built-in program; provides every pass with the reference functions
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProgram;

impl ShadingProgram for BuiltinProgram {
    fn name(&self) -> &str {
        PROGRAM_NAME
    }

    fn has_pass(&self, _pass: Pass) -> bool {
        true
    }
}

/// Programs available for lookup by name
#[derive(Clone, Default)]
pub struct ProgramRegistry {
    programs: HashMap<String, Arc<dyn ShadingProgram>>,
}

impl ProgramRegistry {
    /// Registry with nothing in it
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding [`BuiltinProgram`]
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(BuiltinProgram));
        registry
    }

    /// Add or replace a program under its own name
    pub fn register(&mut self, program: Arc<dyn ShadingProgram>) {
        debug!(name = program.name(), "Registering shading program");
        self.programs.insert(program.name().to_string(), program);
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn ShadingProgram>> {
        self.programs.get(name).cloned()
    }
}

impl fmt::Debug for ProgramRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRegistry")
            .field("programs", &self.programs.keys().collect::<Vec<_>>())
            .finish()
    }
}
