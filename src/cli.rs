// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for offline tone mapping
//!
//! This module provides command-line functionality for:
//! - Rendering an image through the tone mapper over several frames
//! - Showing and writing the configuration

use gaze_tonemap::{
    Config, FixedGaze, FrameOutcome, GazeSource, GazeToneMapper, SimulatedGaze, Texture,
    ToneMappingOperatorType,
};
use std::path::PathBuf;
use std::time::Instant;

/// Frame rate the simulated gaze clock advances at
const SIMULATION_FPS: f32 = 60.0;

/// Arguments of the `render` command
pub struct RenderOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub frames: u32,
    pub config: Option<PathBuf>,
    pub operator: Option<ToneMappingOperatorType>,
    pub sigma: Option<f32>,
    pub show_mask: bool,
    pub simulate_gaze: bool,
}

/// Tone map an image over a sequence of frames and save every produced frame
pub fn render_frames(options: RenderOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load(options.config.as_deref())?;
    if let Some(operator) = options.operator {
        config.operator = operator;
    }
    if let Some(sigma) = options.sigma {
        config.sigma = sigma;
    }
    config.show_mask |= options.show_mask;
    config.validate()?;

    println!("Gaze Tone Mapping");
    println!("=================");
    println!("Input: {}", options.input.display());
    println!("Output directory: {}", options.output_dir.display());
    println!("Operator: {}", config.operator.display_name());
    println!(
        "Gaze: {} (sigma {})",
        if options.simulate_gaze {
            "simulated sweep".to_string()
        } else {
            format!("({}, {})", config.gaze_center_x, config.gaze_center_y)
        },
        config.sigma
    );
    println!();

    std::fs::create_dir_all(&options.output_dir)?;

    let image = image::open(&options.input)?;
    let source = Texture::from_dynamic(&image);
    if source.is_empty() {
        return Err("Input image is empty".into());
    }
    println!("Frame size: {}x{}", source.width(), source.height());

    let mut gaze_source: Box<dyn GazeSource> = if options.simulate_gaze {
        Box::new(SimulatedGaze::default())
    } else {
        Box::new(FixedGaze {
            x: config.gaze_center_x,
            y: config.gaze_center_y,
        })
    };

    let mut mapper = GazeToneMapper::with_builtin();
    mapper.setup()?;

    let mut destination = source.clone();
    let mut frame_params = config.frame_params();
    let start = Instant::now();
    let mut written = 0;

    for frame in 0..options.frames {
        let (x, y) = gaze_source.sample(frame as f32 / SIMULATION_FPS);
        frame_params.gaze = frame_params.gaze.with_center(x, y);

        let outcome = mapper.render(&source, &mut destination, &frame_params)?;
        match &outcome {
            FrameOutcome::Skipped => println!("  Frame {}: skipped (effect disabled)", frame + 1),
            FrameOutcome::Bootstrapped { measured } => {
                println!("  Frame {}: seeded luminance {:?}", frame + 1, measured)
            }
            FrameOutcome::Mask => println!("  Frame {}: gaze mask", frame + 1),
            FrameOutcome::ToneMapped { measured, adapted } => println!(
                "  Frame {}: measured {:?}, adapted {:?}",
                frame + 1,
                measured,
                adapted
            ),
        }

        if outcome.wrote_destination() {
            let path = options
                .output_dir
                .join(format!("frame_{:04}.png", frame + 1));
            destination.to_rgba8(0).save(&path)?;
            written += 1;
        }
    }

    mapper.teardown();

    println!();
    println!("Processing time: {:.2}s", start.elapsed().as_secs_f64());
    println!("Saved {} frames to: {}", written, options.output_dir.display());

    Ok(())
}

/// Print the effective configuration as JSON
pub fn show_config(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(path.as_deref())?;
    if let Some(path) = path.or_else(Config::default_path) {
        println!("# {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Write the default configuration
pub fn write_config(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = path
        .or_else(Config::default_path)
        .ok_or("No config directory available, pass --path")?;
    Config::default().save(&path)?;
    println!("Config written: {}", path.display());
    Ok(())
}
