// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use gaze_tonemap::constants::{LUMINANCE_COEFFICIENTS, PROGRAM_NAME, defaults};
use gaze_tonemap::{Pass, ProgramRegistry, ToneMappingOperatorType};

#[test]
fn test_luminance_coefficients_sum_to_one() {
    let sum: f32 = LUMINANCE_COEFFICIENTS.iter().sum();
    assert!(
        (sum - 1.0).abs() < 1e-5,
        "Gray input should keep its value as luminance"
    );
}

#[test]
fn test_builtin_program_registered_under_default_name() {
    let registry = ProgramRegistry::with_builtin();
    let program = registry
        .find(PROGRAM_NAME)
        .expect("Built-in program should be registered");
    for pass in Pass::ALL {
        assert!(program.has_pass(pass), "Built-in program lacks {}", pass);
    }
}

#[test]
fn test_operator_display_names() {
    for operator in ToneMappingOperatorType::ALL {
        assert!(
            !operator.display_name().is_empty(),
            "Operator {:?} should have a display name",
            operator
        );
        let reparsed: ToneMappingOperatorType = operator.to_string().parse().unwrap();
        assert_eq!(reparsed, operator);
    }
}

#[test]
fn test_defaults_are_usable() {
    assert!(defaults::SIGMA > 0.0, "Effect should be on by default");
    assert!((0.0..=1.0).contains(&defaults::GAZE_CENTER_X));
    assert!((0.0..=1.0).contains(&defaults::GAZE_CENTER_Y));
    assert!(defaults::ADAPTATION_SCALE >= 0.0);
}
