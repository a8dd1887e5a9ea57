// SPDX-License-Identifier: GPL-3.0-only

//! Gaze-weighted luminance pyramid and temporal luminance blend
//!
//! The weight pass writes `[luminance * weight, weight]` into level 0 of a
//! full mip chain. Each further level halves the size and stores, per texel,
//! the sum over its footprint in the level below. Footprints tile the level
//! exactly, so the 1x1 top level holds the frame totals, and their quotient is
//! the gaze-weighted average luminance regardless of odd sizes.

use super::ShadingProgram;
use super::params::PassParams;
use super::transient::{LumTexel, TransientPool};
use crate::constants::{LUMINANCE_COEFFICIENTS, WEIGHT_EPSILON};
use crate::gaze::pixel_center;
use crate::texture::Texture;
use rayon::prelude::*;
use tracing::debug;

/// Rec.709 relative luminance; negative and non-finite input reads as 0
#[inline]
pub fn relative_luminance(rgb: [f32; 3]) -> f32 {
    let lum = rgb[0] * LUMINANCE_COEFFICIENTS[0]
        + rgb[1] * LUMINANCE_COEFFICIENTS[1]
        + rgb[2] * LUMINANCE_COEFFICIENTS[2];
    if lum.is_finite() { lum.max(0.0) } else { 0.0 }
}

/// Move `stored` toward `measured`.
///
/// `scale` is the adaptation rate: 0 keeps `stored`, larger values move
/// further each frame and infinity lands on `measured` exactly.
#[inline]
pub fn blend_luminance(stored: f32, measured: f32, scale: f32) -> f32 {
    if scale.is_nan() || scale <= 0.0 {
        return stored;
    }
    if scale == f32::INFINITY {
        return measured;
    }
    let alpha = 1.0 - (-scale).exp();
    stored + (measured - stored) * alpha
}

/// Number of levels in a full chain for the given base size
pub fn mip_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    32 - largest.leading_zeros()
}

/// One level of the pyramid
#[derive(Debug)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<LumTexel>,
}

impl MipLevel {
    pub fn texel(&self, x: u32, y: u32) -> LumTexel {
        self.texels[y as usize * self.width as usize + x as usize]
    }
}

/// Transient pyramid for every layer of one frame.
///
/// Level buffers go back to the pool on drop, so every exit path of a frame
/// releases them.
#[derive(Debug)]
pub struct LuminancePyramid {
    layers: Vec<Vec<MipLevel>>,
    pool: TransientPool,
}

impl LuminancePyramid {
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn level_count(&self) -> usize {
        self.layers.first().map_or(0, Vec::len)
    }

    /// Index of the coarsest level
    pub fn max_mip_level(&self) -> u32 {
        self.level_count().saturating_sub(1) as u32
    }

    pub fn level(&self, layer: usize, level: usize) -> &MipLevel {
        &self.layers[layer][level]
    }

    /// Gaze-weighted average luminance read from the coarsest level
    pub fn measured_luminance(&self, layer: usize) -> f32 {
        let Some(top) = self.layers[layer].last() else {
            return 0.0;
        };
        let [weighted, weight] = top.texels[0];
        let area = self.layers[layer][0].texels.len() as f32;
        if weight / area > WEIGHT_EPSILON {
            weighted / weight
        } else {
            0.0
        }
    }

    /// Measured luminance of every layer
    pub fn measured(&self) -> Vec<f32> {
        (0..self.layers.len())
            .map(|layer| self.measured_luminance(layer))
            .collect()
    }
}

impl Drop for LuminancePyramid {
    fn drop(&mut self) {
        for level in self.layers.drain(..).flatten() {
            self.pool.release(level.texels);
        }
    }
}

/// Weight pass plus mip generation.
///
/// Returns a pyramid holding one full chain per source layer. The source must
/// not be empty.
pub fn reduce(
    program: &dyn ShadingProgram,
    source: &Texture,
    params: &PassParams,
    pool: &TransientPool,
) -> LuminancePyramid {
    let width = source.width();
    let height = source.height();
    let levels = mip_count(width, height);
    let gaze = params.gaze();
    let aspect = source.aspect();

    let mut pyramid = LuminancePyramid {
        layers: Vec::with_capacity(source.layer_count()),
        pool: pool.clone(),
    };

    for layer in source.layers() {
        let raw = layer.as_raw();
        let mut base = pool.acquire(width as usize * height as usize);
        base.par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, texel) in row.iter_mut().enumerate() {
                    let idx = (y * width as usize + x) * 4;
                    let lum = program.luminance([raw[idx], raw[idx + 1], raw[idx + 2]]);
                    let (u, v) = pixel_center(x as u32, y as u32, width, height);
                    let weight = program.weight(u, v, &gaze, aspect);
                    *texel = [lum * weight, weight];
                }
            });

        let mut chain = Vec::with_capacity(levels as usize);
        chain.push(MipLevel {
            width,
            height,
            texels: base,
        });
        for _ in 1..levels {
            let next = downsample(&chain[chain.len() - 1], pool);
            chain.push(next);
        }
        pyramid.layers.push(chain);
    }

    debug!(
        width,
        height,
        levels,
        layers = source.layer_count(),
        "Built luminance pyramid"
    );

    pyramid
}

/// Source range `[start, end)` covered by destination index `dst`.
///
/// Consecutive ranges meet, so the footprints of one level partition the
/// level below. Ranges are 2 wide for even sizes and 3 at the trailing edge
/// of odd sizes.
fn footprint(dst: u32, dst_len: u32, src_len: u32) -> (u32, u32) {
    let edge = |index: u32| (index as u64 * src_len as u64 / dst_len as u64) as u32;
    let start = edge(dst);
    (start, edge(dst + 1).max(start + 1))
}

/// Reduce `src` to the next level's size, summing each footprint
fn downsample(src: &MipLevel, pool: &TransientPool) -> MipLevel {
    let width = (src.width / 2).max(1);
    let height = (src.height / 2).max(1);
    let mut texels = pool.acquire(width as usize * height as usize);

    texels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let (y0, y1) = footprint(y as u32, height, src.height);
            for (x, out) in row.iter_mut().enumerate() {
                let (x0, x1) = footprint(x as u32, width, src.width);
                let mut sum = [0.0f32; 2];
                for sy in y0..y1 {
                    for sx in x0..x1 {
                        let t = src.texel(sx, sy);
                        sum[0] += t[0];
                        sum[1] += t[1];
                    }
                }
                *out = sum;
            }
        });

    MipLevel {
        width,
        height,
        texels,
    }
}
