// SPDX-License-Identifier: GPL-3.0-only

//! Pipeline-wide constants

/// Name the orchestrator resolves its shading program by
pub const PROGRAM_NAME: &str = "Hidden/Shader/GazeToneMapper";

/// Rec.709 relative luminance coefficients (R, G, B)
pub const LUMINANCE_COEFFICIENTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Lower bound applied to adapted luminance before it is used as a divisor
pub const LUMINANCE_FLOOR: f32 = 1e-4;

/// Mean weight below which the coarse mip is treated as carrying no signal
pub const WEIGHT_EPSILON: f32 = 1e-12;

/// Half-width of the isoline band drawn by the debug operator
pub const DEBUG_ISOLINE_WIDTH: f32 = 0.01;

/// Angular speed of the simulated gaze sweep (radians per second)
pub const SIMULATED_GAZE_SPEED: f32 = 0.5;

/// Default parameter values
pub mod defaults {
    /// Horizontal gaze center
    pub const GAZE_CENTER_X: f32 = 0.1;
    /// Vertical gaze center
    pub const GAZE_CENTER_Y: f32 = 0.1;
    /// Gaussian spread in normalized image units
    pub const SIGMA: f32 = 0.1;
    /// Adaptation speed scale
    pub const ADAPTATION_SCALE: f32 = 1.0;
    /// Reinhard key
    pub const LUMINANCE_KEY: f32 = 1.0;
    /// Debug operator isoline level
    pub const DEBUG_PARAMETER: f32 = 0.5;
}

/// Config directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "gaze-tonemap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.json";
