// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the gaze tone mapping pipeline

use gaze_tonemap::gaze::pixel_weight;
use gaze_tonemap::{
    AdaptationParameters, ConfigurationError, DebugFlags, FrameOutcome, FrameParams, GazeState,
    GazeToneMapper, PipelineError, PipelineMode, ProgramRegistry, Texture,
    ToneMappingOperatorType,
};
use image::{Rgba, Rgba32FImage};

fn assert_close(actual: f32, expected: f32, tolerance: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{}: expected {} got {}",
        what,
        expected,
        actual
    );
}

fn gray(width: u32, height: u32, value: f32) -> Texture {
    Texture::filled(width, height, 1, [value, value, value, 1.0])
}

fn frame(operator: ToneMappingOperatorType) -> FrameParams {
    FrameParams {
        gaze: GazeState::new(0.5, 0.5, 0.2),
        adaptation: AdaptationParameters::default(),
        operator,
        debug: DebugFlags::default(),
    }
}

fn ready_mapper() -> GazeToneMapper {
    let mut mapper = GazeToneMapper::with_builtin();
    mapper.setup().expect("built-in program should set up");
    mapper
}

#[test]
fn test_uniform_gray_end_to_end() {
    let mut mapper = ready_mapper();
    let source = gray(64, 32, 0.5);
    let sentinel = gray(64, 32, 0.0);
    let mut destination = sentinel.clone();
    let params = frame(ToneMappingOperatorType::Reinhard);

    // Frame 1 seeds the store and leaves the destination alone
    let outcome = mapper.render(&source, &mut destination, &params).unwrap();
    assert!(matches!(outcome, FrameOutcome::Bootstrapped { .. }));
    assert_eq!(destination, sentinel, "Bootstrap frame must not write");
    assert_close(mapper.stored_luminance().unwrap()[0], 0.5, 1e-4, "seeded");

    // Frame 2 blends and tone maps
    let outcome = mapper.render(&source, &mut destination, &params).unwrap();
    match outcome {
        FrameOutcome::ToneMapped { adapted, .. } => assert_close(adapted[0], 0.5, 1e-4, "adapted"),
        other => panic!("expected tone mapped frame, got {:?}", other),
    }
    let pixel = destination.pixel(0, 10, 10);
    assert!(pixel[0] < 0.5, "Reinhard should compress mid gray");
    assert_close(pixel[0], 0.25, 1e-3, "reinhard output");
    assert_eq!(pixel[3], 1.0, "alpha preserved");
}

#[test]
fn test_zero_sigma_leaves_destination_untouched() {
    let mut mapper = ready_mapper();
    let source = gray(16, 16, 0.8);
    let sentinel = gray(16, 16, 0.1);
    let mut destination = sentinel.clone();
    let mut params = frame(ToneMappingOperatorType::Reinhard);
    params.gaze.sigma = 0.0;

    for _ in 0..3 {
        let outcome = mapper.render(&source, &mut destination, &params).unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped);
    }
    assert_eq!(destination, sentinel);
    assert!(mapper.stored_luminance().is_none());
    assert_eq!(mapper.mode(&params.gaze), PipelineMode::Disabled);
}

#[test]
fn test_zero_adaptation_scale_keeps_stored_value() {
    let mut mapper = ready_mapper();
    let mut destination = gray(16, 16, 0.0);
    let mut params = frame(ToneMappingOperatorType::Reinhard);

    mapper
        .render(&gray(16, 16, 0.5), &mut destination, &params)
        .unwrap();
    params.adaptation.adaptation_scale = 0.0;
    for _ in 0..3 {
        mapper
            .render(&gray(16, 16, 2.0), &mut destination, &params)
            .unwrap();
        assert_close(mapper.stored_luminance().unwrap()[0], 0.5, 1e-4, "frozen");
    }
}

#[test]
fn test_large_adaptation_scale_snaps_to_measured() {
    let mut mapper = ready_mapper();
    let mut destination = gray(16, 16, 0.0);
    let mut params = frame(ToneMappingOperatorType::Reinhard);

    mapper
        .render(&gray(16, 16, 0.5), &mut destination, &params)
        .unwrap();
    params.adaptation.adaptation_scale = 100.0;
    mapper
        .render(&gray(16, 16, 2.0), &mut destination, &params)
        .unwrap();
    assert_close(mapper.stored_luminance().unwrap()[0], 2.0, 1e-4, "snapped");
}

#[test]
fn test_adaptation_converges_gradually() {
    let mut mapper = ready_mapper();
    let mut destination = gray(16, 16, 0.0);
    let params = frame(ToneMappingOperatorType::Reinhard);

    mapper
        .render(&gray(16, 16, 0.1), &mut destination, &params)
        .unwrap();
    let bright = gray(16, 16, 1.0);
    let mut previous = 0.1;
    for _ in 0..5 {
        mapper.render(&bright, &mut destination, &params).unwrap();
        let current = mapper.stored_luminance().unwrap()[0];
        assert!(current > previous && current <= 1.0 + 1e-4);
        previous = current;
    }
    assert_close(previous, 1.0, 0.01, "converged");
}

#[test]
fn test_none_operator_is_identity() {
    let mut mapper = ready_mapper();
    let source = gray(16, 8, 3.5);
    let mut destination = gray(16, 8, 0.0);
    let params = frame(ToneMappingOperatorType::None);

    mapper.render(&source, &mut destination, &params).unwrap();
    mapper.render(&source, &mut destination, &params).unwrap();
    assert_eq!(destination, source);
}

#[test]
fn test_gaze_weighting_favors_looked_at_region() {
    let image = Rgba32FImage::from_fn(64, 32, |x, _| {
        if x < 32 {
            Rgba([1.0, 1.0, 1.0, 1.0])
        } else {
            Rgba([0.0, 0.0, 0.0, 1.0])
        }
    });
    let source = Texture::from_image(image);
    let mut destination = source.clone();

    let mut measure = |center_x: f32| {
        let mut mapper = ready_mapper();
        let mut params = frame(ToneMappingOperatorType::Reinhard);
        params.gaze = GazeState::new(center_x, 0.5, 0.1);
        match mapper.render(&source, &mut destination, &params).unwrap() {
            FrameOutcome::Bootstrapped { measured } => measured[0],
            other => panic!("expected bootstrap, got {:?}", other),
        }
    };

    let left = measure(0.25);
    let right = measure(0.75);
    assert!(left > 0.9, "looking at the bright half measured {}", left);
    assert!(right < 0.1, "looking at the dark half measured {}", right);
}

#[test]
fn test_mask_matches_weight_field() {
    let mut mapper = ready_mapper();
    let source = gray(32, 16, 0.7);
    let mut destination = gray(32, 16, 0.0);
    let mut params = frame(ToneMappingOperatorType::Debug);
    params.debug.show_mask = true;

    let outcome = mapper.render(&source, &mut destination, &params).unwrap();
    assert_eq!(outcome, FrameOutcome::Mask);
    for (x, y) in [(0, 0), (16, 8), (31, 15), (5, 12)] {
        let weight = pixel_weight(x, y, 32, 16, &params.gaze);
        let pixel = destination.pixel(0, x, y);
        assert_close(pixel[0], weight, 1e-6, "mask red");
        assert_close(pixel[1], weight, 1e-6, "mask green");
        assert_close(pixel[2], weight, 1e-6, "mask blue");
        assert_eq!(pixel[3], 1.0);
    }

    // Mask frames do not consume the bootstrap
    assert_eq!(mapper.mode(&params.gaze), PipelineMode::Bootstrapping);
    assert!(mapper.stored_luminance().is_none());
}

#[test]
fn test_mask_ignores_operator_and_store() {
    let source = gray(16, 16, 0.4);
    let mut reference = gray(16, 16, 0.0);
    let mut params = frame(ToneMappingOperatorType::None);
    params.debug.show_mask = true;
    ready_mapper()
        .render(&source, &mut reference, &params)
        .unwrap();

    let mut mapper = ready_mapper();
    let mut destination = gray(16, 16, 0.0);
    let steady = frame(ToneMappingOperatorType::Reinhard);
    mapper.render(&source, &mut destination, &steady).unwrap();
    mapper.render(&source, &mut destination, &steady).unwrap();

    params.operator = ToneMappingOperatorType::ReinhardWithGaze;
    mapper.render(&source, &mut destination, &params).unwrap();
    assert_eq!(destination, reference);
}

#[test]
fn test_teardown_then_setup_bootstraps_again() {
    let mut mapper = ready_mapper();
    let source = gray(8, 8, 0.5);
    let mut destination = source.clone();
    let params = frame(ToneMappingOperatorType::Reinhard);

    mapper.render(&source, &mut destination, &params).unwrap();
    mapper.render(&source, &mut destination, &params).unwrap();
    assert_eq!(mapper.mode(&params.gaze), PipelineMode::Steady);

    mapper.teardown();
    mapper.setup().unwrap();
    let outcome = mapper.render(&source, &mut destination, &params).unwrap();
    assert!(matches!(outcome, FrameOutcome::Bootstrapped { .. }));
}

#[test]
fn test_missing_program_reports_once_then_skips() {
    let mut mapper = GazeToneMapper::new(ProgramRegistry::empty());
    let result = mapper.setup();
    assert!(matches!(
        result,
        Err(PipelineError::Configuration(ConfigurationError::ProgramNotFound(_)))
    ));

    let source = gray(8, 8, 0.5);
    let mut destination = gray(8, 8, 0.0);
    let params = frame(ToneMappingOperatorType::Reinhard);
    for _ in 0..3 {
        let outcome = mapper.render(&source, &mut destination, &params).unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped);
    }
    assert_eq!(destination, gray(8, 8, 0.0));
}

#[test]
fn test_texture_mismatch_is_an_error() {
    let mut mapper = ready_mapper();
    let source = gray(8, 8, 0.5);
    let mut destination = gray(4, 8, 0.0);
    let result = mapper.render(&source, &mut destination, &frame(ToneMappingOperatorType::None));
    assert!(matches!(result, Err(PipelineError::TextureMismatch(_))));
    assert_eq!(mapper.mode(&GazeState::new(0.5, 0.5, 0.2)), PipelineMode::Bootstrapping);
}

#[test]
fn test_transient_resources_released_every_frame() {
    let mut mapper = ready_mapper();
    let source = gray(33, 17, 0.5);
    let mut destination = source.clone();
    let mut params = frame(ToneMappingOperatorType::ReinhardWithGaze);

    for show_mask in [true, false, false, true, false] {
        params.debug.show_mask = show_mask;
        mapper.render(&source, &mut destination, &params).unwrap();
        assert_eq!(mapper.transient_pool().live(), 0);
    }
}

#[test]
fn test_layers_adapt_independently() {
    let layers = vec![
        gray(8, 8, 0.2).layer(0).clone(),
        gray(8, 8, 0.8).layer(0).clone(),
    ];
    let source = Texture::from_layers(layers).unwrap();
    let mut destination = source.clone();
    let mut mapper = GazeToneMapper::with_builtin().with_layers(2);
    mapper.setup().unwrap();

    mapper
        .render(&source, &mut destination, &frame(ToneMappingOperatorType::Reinhard))
        .unwrap();
    let stored = mapper.stored_luminance().unwrap();
    assert_eq!(stored.len(), 2);
    assert_close(stored[0], 0.2, 1e-4, "left eye");
    assert_close(stored[1], 0.8, 1e-4, "right eye");

    mapper
        .render(&source, &mut destination, &frame(ToneMappingOperatorType::Reinhard))
        .unwrap();
    // Each layer is compressed against its own adapted luminance: L / (1 + 1)
    assert_close(destination.pixel(0, 3, 3)[0], 0.1, 1e-3, "left eye output");
    assert_close(destination.pixel(1, 3, 3)[0], 0.4, 1e-3, "right eye output");
}

#[test]
fn test_very_wide_frame_renders() {
    let mut mapper = ready_mapper();
    let source = gray(100_000, 1, 0.5);
    let mut destination = source.clone();
    let params = frame(ToneMappingOperatorType::Reinhard);

    let outcome = mapper.render(&source, &mut destination, &params).unwrap();
    match outcome {
        FrameOutcome::Bootstrapped { measured } => assert_close(measured[0], 0.5, 1e-3, "measured"),
        other => panic!("expected bootstrap, got {:?}", other),
    }
    mapper.render(&source, &mut destination, &params).unwrap();
    assert_close(destination.pixel(0, 50_000, 0)[0], 0.25, 1e-3, "wide frame output");
}

#[test]
fn test_odd_sized_frame_measures_plain_mean() {
    // Two bright pixels out of five, with a spread wide enough to weight them all alike
    let image = Rgba32FImage::from_fn(5, 1, |x, _| {
        let v = if x < 2 { 1.0 } else { 0.0 };
        Rgba([v, v, v, 1.0])
    });
    let source = Texture::from_image(image);
    let mut destination = source.clone();
    let mut params = frame(ToneMappingOperatorType::Reinhard);
    params.gaze.sigma = 1000.0;

    let mut mapper = ready_mapper();
    match mapper.render(&source, &mut destination, &params).unwrap() {
        FrameOutcome::Bootstrapped { measured } => assert_close(measured[0], 0.4, 1e-4, "mean"),
        other => panic!("expected bootstrap, got {:?}", other),
    }
}
