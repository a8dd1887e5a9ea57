// SPDX-License-Identifier: GPL-3.0-only

//! User configuration for the tone mapper
//!
//! Stored as JSON under the user config directory
//! (`~/.config/gaze-tonemap/config.json` on Linux). Every field has a
//! default, so partial files are fine.

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, defaults};
use crate::errors::{ConfigurationError, PipelineResult};
use crate::gaze::GazeState;
use crate::pipelines::tonemapper::{AdaptationParameters, DebugFlags, FrameParams};
use crate::shaders::ToneMappingOperatorType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMapperConfig {
    /// Horizontal gaze center, normalized (0 = left)
    pub gaze_center_x: f32,
    /// Vertical gaze center, normalized (0 = top)
    pub gaze_center_y: f32,
    /// Gaussian spread; 0 or less turns the effect off
    pub sigma: f32,
    /// Adaptation speed; 0 freezes the adapted luminance
    pub adaptation_scale: f32,
    /// Reinhard key
    pub luminance_key: f32,
    /// Tone mapping operator
    pub operator: ToneMappingOperatorType,
    /// Show the gaze weight field instead of the image
    pub show_mask: bool,
    /// Isoline level for the debug operator
    pub debug_parameter: f32,
}

impl Default for ToneMapperConfig {
    fn default() -> Self {
        Self {
            gaze_center_x: defaults::GAZE_CENTER_X,
            gaze_center_y: defaults::GAZE_CENTER_Y,
            sigma: defaults::SIGMA,
            adaptation_scale: defaults::ADAPTATION_SCALE,
            luminance_key: defaults::LUMINANCE_KEY,
            operator: ToneMappingOperatorType::default(),
            show_mask: false,
            debug_parameter: defaults::DEBUG_PARAMETER,
        }
    }
}

impl ToneMapperConfig {
    /// `<config dir>/gaze-tonemap/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when
    /// `None`. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> PipelineResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    warn!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let mut config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        info!(path = %path.display(), operator = %config.operator, "Loaded config");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Clamp the gaze center into [0, 1] and reject values no frame can use
    pub fn validate(&mut self) -> PipelineResult<()> {
        if !self.gaze_center_x.is_finite() || !self.gaze_center_y.is_finite() {
            return Err(ConfigurationError::InvalidParameter {
                name: "gaze_center",
                reason: "must be finite".to_string(),
            }
            .into());
        }
        self.gaze_center_x = self.gaze_center_x.clamp(0.0, 1.0);
        self.gaze_center_y = self.gaze_center_y.clamp(0.0, 1.0);

        if self.sigma.is_nan() {
            return Err(ConfigurationError::InvalidParameter {
                name: "sigma",
                reason: "is NaN".to_string(),
            }
            .into());
        }
        if self.adaptation_scale.is_nan() || self.adaptation_scale < 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "adaptation_scale",
                reason: format!("must be >= 0, got {}", self.adaptation_scale),
            }
            .into());
        }
        if self.luminance_key.is_nan() {
            return Err(ConfigurationError::InvalidParameter {
                name: "luminance_key",
                reason: "is NaN".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn gaze(&self) -> GazeState {
        GazeState::new(self.gaze_center_x, self.gaze_center_y, self.sigma)
    }

    /// Per-frame input for [`GazeToneMapper::render`](crate::GazeToneMapper::render)
    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            gaze: self.gaze(),
            adaptation: AdaptationParameters {
                adaptation_scale: self.adaptation_scale,
                luminance_key: self.luminance_key,
            },
            operator: self.operator,
            debug: DebugFlags {
                show_mask: self.show_mask,
                debug_parameter: self.debug_parameter,
            },
        }
    }
}
