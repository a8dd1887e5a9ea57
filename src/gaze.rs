// SPDX-License-Identifier: GPL-3.0-only

//! Gaze state and the Gaussian importance weight around it
//!
//! Positions are normalized to `[0, 1]` with the origin at the top-left
//! corner of the image. Distances are aspect-corrected so the falloff is
//! circular on screen regardless of the frame's width/height ratio.

use crate::constants::{SIMULATED_GAZE_SPEED, defaults};

/// Region-of-interest weighting for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeState {
    /// Horizontal gaze center in `[0, 1]`
    pub center_x: f32,
    /// Vertical gaze center in `[0, 1]`
    pub center_y: f32,
    /// Gaussian spread in normalized units; `<= 0` disables the effect
    pub sigma: f32,
}

impl Default for GazeState {
    fn default() -> Self {
        Self {
            center_x: defaults::GAZE_CENTER_X,
            center_y: defaults::GAZE_CENTER_Y,
            sigma: defaults::SIGMA,
        }
    }
}

impl GazeState {
    pub fn new(center_x: f32, center_y: f32, sigma: f32) -> Self {
        Self {
            center_x: center_x.clamp(0.0, 1.0),
            center_y: center_y.clamp(0.0, 1.0),
            sigma,
        }
    }

    /// Whether the weighting is defined at all (NaN counts as disabled)
    pub fn is_enabled(&self) -> bool {
        self.sigma > 0.0
    }

    /// Same sigma, new center
    pub fn with_center(self, center_x: f32, center_y: f32) -> Self {
        Self::new(center_x, center_y, self.sigma)
    }
}

/// Gaussian importance of a normalized position relative to the gaze center.
///
/// Returns exactly 1.0 at the center and decays with squared distance.
/// `aspect` is width / height of the image being weighted. The caller
/// guarantees `gaze.sigma > 0`.
#[inline]
pub fn gaze_weight(u: f32, v: f32, gaze: &GazeState, aspect: f32) -> f32 {
    let dx = (u - gaze.center_x) * aspect;
    let dy = v - gaze.center_y;
    let dist_sq = dx * dx + dy * dy;
    (-dist_sq / (2.0 * gaze.sigma * gaze.sigma)).exp()
}

/// Normalized coordinate of a pixel center
#[inline]
pub fn pixel_center(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    (
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    )
}

/// Gaze weight for pixel `(x, y)` of a `width` x `height` image
#[inline]
pub fn pixel_weight(x: u32, y: u32, width: u32, height: u32, gaze: &GazeState) -> f32 {
    let (u, v) = pixel_center(x, y, width, height);
    gaze_weight(u, v, gaze, width as f32 / height as f32)
}

/// Supplies the gaze center once per frame.
///
/// Implemented by eye-tracker adapters and simulators. The pipeline only
/// consumes the returned values.
pub trait GazeSource {
    /// Gaze center `(x, y)` for the frame at `time_seconds`
    fn sample(&mut self, time_seconds: f32) -> (f32, f32);
}

/// Gaze pinned to one point
#[derive(Debug, Clone, Copy)]
pub struct FixedGaze {
    pub x: f32,
    pub y: f32,
}

impl GazeSource for FixedGaze {
    fn sample(&mut self, _time_seconds: f32) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Horizontal sine sweep across the frame at mid height
#[derive(Debug, Clone, Copy)]
pub struct SimulatedGaze {
    /// Radians per second
    pub speed: f32,
    pub y: f32,
}

impl Default for SimulatedGaze {
    fn default() -> Self {
        Self {
            speed: SIMULATED_GAZE_SPEED,
            y: 0.5,
        }
    }
}

impl GazeSource for SimulatedGaze {
    fn sample(&mut self, time_seconds: f32) -> (f32, f32) {
        ((time_seconds * self.speed).sin() * 0.5 + 0.5, self.y)
    }
}
