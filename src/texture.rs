// SPDX-License-Identifier: GPL-3.0-only

//! Layered RGBA float textures exchanged with the host
//!
//! A texture is one or more equally sized RGBA32F layers. Single-view
//! rendering uses one layer; multi-view rendering uses one layer per view.

use crate::errors::{PipelineError, PipelineResult};
use image::{DynamicImage, Rgba, Rgba32FImage, RgbaImage};

/// Layered RGBA32F image
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    layers: Vec<Rgba32FImage>,
}

impl Texture {
    /// Texture filled with `color` in every layer
    pub fn filled(width: u32, height: u32, layer_count: usize, color: [f32; 4]) -> Self {
        let layers = (0..layer_count.max(1))
            .map(|_| Rgba32FImage::from_pixel(width, height, Rgba(color)))
            .collect();
        Self {
            width,
            height,
            layers,
        }
    }

    /// Single-layer texture wrapping an existing image
    pub fn from_image(image: Rgba32FImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            layers: vec![image],
        }
    }

    /// Layered texture; all layers must share one size
    pub fn from_layers(layers: Vec<Rgba32FImage>) -> PipelineResult<Self> {
        let first = layers
            .first()
            .ok_or_else(|| PipelineError::TextureMismatch("texture has no layers".to_string()))?;
        let (width, height) = first.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::TextureMismatch(format!(
                "empty texture {}x{}",
                width, height
            )));
        }
        if let Some(bad) = layers.iter().find(|l| l.dimensions() != (width, height)) {
            return Err(PipelineError::TextureMismatch(format!(
                "layer size {:?} differs from {}x{}",
                bad.dimensions(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    /// Convert any decoded image to a single-layer float texture
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_image(image.to_rgba32f())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width / height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> &Rgba32FImage {
        &self.layers[index]
    }

    pub fn layers(&self) -> &[Rgba32FImage] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Rgba32FImage] {
        &mut self.layers
    }

    /// Pixel accessor, mostly for tests and diagnostics
    pub fn pixel(&self, layer: usize, x: u32, y: u32) -> [f32; 4] {
        self.layers[layer].get_pixel(x, y).0
    }

    /// Error unless `other` has the same size and layer count
    pub fn ensure_compatible(&self, other: &Texture) -> PipelineResult<()> {
        if self.width != other.width
            || self.height != other.height
            || self.layers.len() != other.layers.len()
        {
            return Err(PipelineError::TextureMismatch(format!(
                "{}x{}x{} vs {}x{}x{}",
                self.width,
                self.height,
                self.layers.len(),
                other.width,
                other.height,
                other.layers.len()
            )));
        }
        Ok(())
    }

    /// Clamp a layer to `[0, 1]` and quantize it to 8 bits for display/export
    pub fn to_rgba8(&self, layer: usize) -> RgbaImage {
        DynamicImage::ImageRgba32F(self.clamped_layer(layer)).to_rgba8()
    }

    fn clamped_layer(&self, layer: usize) -> Rgba32FImage {
        let mut out = self.layers[layer].clone();
        for value in out.iter_mut() {
            let v = *value;
            *value = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
        out
    }
}
