// SPDX-License-Identifier: GPL-3.0-only

//! Gaze mask pass: writes the raw weight field as opaque gray

use super::ShadingProgram;
use super::params::PassParams;
use crate::gaze::pixel_center;
use crate::texture::Texture;
use rayon::prelude::*;

/// Fill every layer of `destination` with `(w, w, w, 1)`
pub fn render_mask(program: &dyn ShadingProgram, destination: &mut Texture, params: &PassParams) {
    let width = destination.width();
    let height = destination.height();
    let aspect = destination.aspect();
    let gaze = params.gaze();

    for layer in destination.layers_mut() {
        layer
            .par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.chunks_exact_mut(4).enumerate() {
                    let (u, v) = pixel_center(x as u32, y as u32, width, height);
                    let w = program.weight(u, v, &gaze, aspect);
                    out.copy_from_slice(&[w, w, w, 1.0]);
                }
            });
    }
}
