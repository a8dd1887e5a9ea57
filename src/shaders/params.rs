// SPDX-License-Identifier: GPL-3.0-only
//
// Parameter block shared by every pass of the tone mapping program.

use crate::gaze::GazeState;
use crate::pipelines::tonemapper::AdaptationParameters;

/// Per-frame parameters bound to each pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassParams {
    pub gaze_center_x: f32,
    pub gaze_center_y: f32,
    pub sigma: f32,
    pub adaptation_scale: f32,
    pub luminance_key: f32,
    pub debug_parameter: f32,
    /// Index of the coarsest mip level of the current pyramid
    pub max_mip_level: u32,
}

impl PassParams {
    pub fn new(gaze: &GazeState, adaptation: &AdaptationParameters, debug_parameter: f32) -> Self {
        Self {
            gaze_center_x: gaze.center_x,
            gaze_center_y: gaze.center_y,
            sigma: gaze.sigma,
            adaptation_scale: adaptation.adaptation_scale,
            luminance_key: adaptation.luminance_key,
            debug_parameter,
            max_mip_level: 0,
        }
    }

    /// Gaze state encoded in this block
    pub fn gaze(&self) -> GazeState {
        GazeState {
            center_x: self.gaze_center_x,
            center_y: self.gaze_center_y,
            sigma: self.sigma,
        }
    }
}
