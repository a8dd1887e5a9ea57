// SPDX-License-Identifier: GPL-3.0-only

//! Tone mapping operators and the final tone mapping pass
//!
//! Every operator is a pure per-pixel function of the source color, the
//! adapted luminance of the pixel's layer and the pass parameters. Gaze
//! weight is evaluated only for operators that use it.

use super::ShadingProgram;
use super::params::PassParams;
use crate::constants::{DEBUG_ISOLINE_WIDTH, LUMINANCE_FLOOR};
use crate::errors::ConfigurationError;
use crate::gaze::pixel_center;
use crate::texture::Texture;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tone mapping operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ToneMappingOperatorType {
    /// Identity
    None,
    /// Global Reinhard compression against the adapted luminance
    #[default]
    Reinhard,
    /// Reinhard with stronger compression away from the gaze point
    ReinhardWithGaze,
    /// Gaze weight field visualization
    Debug,
}

impl ToneMappingOperatorType {
    /// All operators for UI/CLI iteration
    pub const ALL: [ToneMappingOperatorType; 4] = [
        ToneMappingOperatorType::None,
        ToneMappingOperatorType::Reinhard,
        ToneMappingOperatorType::ReinhardWithGaze,
        ToneMappingOperatorType::Debug,
    ];

    /// Canonical lowercase name used in config files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ToneMappingOperatorType::None => "none",
            ToneMappingOperatorType::Reinhard => "reinhard",
            ToneMappingOperatorType::ReinhardWithGaze => "reinhard-gaze",
            ToneMappingOperatorType::Debug => "debug",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ToneMappingOperatorType::None => "None",
            ToneMappingOperatorType::Reinhard => "Standard Reinhard",
            ToneMappingOperatorType::ReinhardWithGaze => "Reinhard with Gaze",
            ToneMappingOperatorType::Debug => "Debug",
        }
    }

    /// Whether the operator evaluates the gaze weight per pixel
    pub fn uses_gaze_weight(&self) -> bool {
        matches!(
            self,
            ToneMappingOperatorType::ReinhardWithGaze | ToneMappingOperatorType::Debug
        )
    }
}

impl fmt::Display for ToneMappingOperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToneMappingOperatorType {
    type Err = ConfigurationError;

    /// Case-insensitive; `-`, `_` and spaces are ignored, and the numeric
    /// index of the operator is accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "none" => Ok(ToneMappingOperatorType::None),
            "reinhard" | "standardreinhard" => Ok(ToneMappingOperatorType::Reinhard),
            "reinhardgaze" | "reinhardwithgaze" => Ok(ToneMappingOperatorType::ReinhardWithGaze),
            "debug" => Ok(ToneMappingOperatorType::Debug),
            other => match other.parse::<u32>() {
                Ok(index) => ToneMappingOperatorType::try_from(index),
                Err(_) => Err(ConfigurationError::UnknownOperator(s.to_string())),
            },
        }
    }
}

impl TryFrom<u32> for ToneMappingOperatorType {
    type Error = ConfigurationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownOperator(value.to_string()))
    }
}

impl TryFrom<String> for ToneMappingOperatorType {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToneMappingOperatorType> for String {
    fn from(op: ToneMappingOperatorType) -> Self {
        op.name().to_string()
    }
}

/// Reinhard compression of one pixel.
///
/// `luminance` is the pixel's own luminance, `adapted` the scene estimate.
/// Alpha passes through.
#[inline]
pub fn reinhard(color: [f32; 4], luminance: f32, adapted: f32, key: f32) -> [f32; 4] {
    let key = key.max(0.0);
    let adapted = adapted.max(LUMINANCE_FLOOR);
    let scale = 1.0 / (1.0 + luminance * key / adapted);
    [color[0] * scale, color[1] * scale, color[2] * scale, color[3]]
}

/// Reinhard whose key grows from 1x at the gaze point to 2x in the far periphery
#[inline]
pub fn reinhard_gaze(
    color: [f32; 4],
    luminance: f32,
    adapted: f32,
    key: f32,
    weight: f32,
) -> [f32; 4] {
    let peripheral = 2.0 - weight.clamp(0.0, 1.0);
    reinhard(color, luminance, adapted, key.max(0.0) * peripheral)
}

/// Gaze weight as gray, with a red isoline at `debug_parameter`
#[inline]
pub fn debug_weight(weight: f32, debug_parameter: f32) -> [f32; 4] {
    if (weight - debug_parameter).abs() <= DEBUG_ISOLINE_WIDTH {
        [1.0, 0.0, 0.0, 1.0]
    } else {
        [weight, weight, weight, 1.0]
    }
}

/// Run one operator on one pixel
#[inline]
pub fn tone_map_pixel(
    program: &dyn ShadingProgram,
    operator: ToneMappingOperatorType,
    color: [f32; 4],
    adapted: f32,
    weight: f32,
    params: &PassParams,
) -> [f32; 4] {
    match operator {
        ToneMappingOperatorType::None => color,
        ToneMappingOperatorType::Reinhard => {
            let lum = program.luminance([color[0], color[1], color[2]]);
            reinhard(color, lum, adapted, params.luminance_key)
        }
        ToneMappingOperatorType::ReinhardWithGaze => {
            let lum = program.luminance([color[0], color[1], color[2]]);
            reinhard_gaze(color, lum, adapted, params.luminance_key, weight)
        }
        ToneMappingOperatorType::Debug => debug_weight(weight, params.debug_parameter),
    }
}

/// Final pass: tone map every layer of `source` into `destination`.
///
/// `adapted` holds one adapted luminance per layer. Both textures must have
/// matching dimensions.
pub fn apply(
    program: &dyn ShadingProgram,
    operator: ToneMappingOperatorType,
    source: &Texture,
    destination: &mut Texture,
    adapted: &[f32],
    params: &PassParams,
) {
    let width = source.width();
    let height = source.height();
    let aspect = source.aspect();
    let gaze = params.gaze();
    let needs_weight = operator.uses_gaze_weight();

    for (index, (src, dst)) in source
        .layers()
        .iter()
        .zip(destination.layers_mut().iter_mut())
        .enumerate()
    {
        let layer_adapted = adapted.get(index).copied().unwrap_or(LUMINANCE_FLOOR);
        let raw = src.as_raw();
        dst.par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.chunks_exact_mut(4).enumerate() {
                    let idx = (y * width as usize + x) * 4;
                    let color = [raw[idx], raw[idx + 1], raw[idx + 2], raw[idx + 3]];
                    let weight = if needs_weight {
                        let (u, v) = pixel_center(x as u32, y as u32, width, height);
                        program.weight(u, v, &gaze, aspect)
                    } else {
                        1.0
                    };
                    let mapped =
                        tone_map_pixel(program, operator, color, layer_adapted, weight, params);
                    out.copy_from_slice(&mapped);
                }
            });
    }
}
