// SPDX-License-Identifier: GPL-3.0-only

//! Gaze Tonemap - gaze-weighted temporal luminance adaptation
//!
//! Measures scene luminance weighted by where the viewer looks, adapts a
//! persistent luminance value toward it over time, and tone maps each frame
//! against the adapted value.
//!
//! # Architecture
//!
//! - [`gaze`]: gaze state, the Gaussian weight field and gaze sources
//! - [`shaders`]: shading programs and the per-pixel passes
//! - [`pipelines`]: the per-frame orchestrator and the temporal store
//! - [`texture`]: layered RGBA float textures
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```no_run
//! use gaze_tonemap::{Config, GazeToneMapper, Texture};
//!
//! let mut mapper = GazeToneMapper::with_builtin();
//! mapper.setup()?;
//! let source = Texture::filled(64, 64, 1, [0.5, 0.5, 0.5, 1.0]);
//! let mut destination = source.clone();
//! let frame = Config::default().frame_params();
//! for _ in 0..2 {
//!     mapper.render(&source, &mut destination, &frame)?;
//! }
//! # Ok::<(), gaze_tonemap::PipelineError>(())
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod gaze;
pub mod pipelines;
pub mod shaders;
pub mod texture;

// Re-export commonly used types
pub use config::ToneMapperConfig;
pub use config::ToneMapperConfig as Config;
pub use errors::{ConfigurationError, PipelineError, PipelineResult};
pub use gaze::{FixedGaze, GazeSource, GazeState, SimulatedGaze};
pub use pipelines::tonemapper::{
    AdaptationParameters, DebugFlags, FrameOutcome, FrameParams, GazeToneMapper, PipelineMode,
};
pub use shaders::{Pass, ProgramRegistry, ShadingProgram, ToneMappingOperatorType};
pub use texture::Texture;
