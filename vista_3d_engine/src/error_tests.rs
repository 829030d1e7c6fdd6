//! Unit tests for error.rs
//!
//! Covers every variant's Display output, the std::error::Error impl,
//! Result propagation and the engine_err! macro.

use crate::engine_err;
use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_parameters_display() {
    let err = Error::InvalidParameters("fov must be positive".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid parameters"));
    assert!(display.contains("fov must be positive"));
}

#[test]
fn test_resource_allocation_display() {
    let err = Error::ResourceAllocation("texture pool exhausted".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Resource allocation failed"));
    assert!(display.contains("texture pool exhausted"));
}

#[test]
fn test_not_found_display() {
    let err = Error::NotFound("LOD list 'robot'".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Not found"));
    assert!(display.contains("robot"));
}

#[test]
fn test_unit_variant_display() {
    assert_eq!(format!("{}", Error::StreamExhausted), "Stream exhausted");
    assert_eq!(format!("{}", Error::Cancelled), "Cancelled");
    assert_eq!(format!("{}", Error::DeviceLost), "Rendering device lost");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::StreamExhausted;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_eq() {
    let err = Error::NotFound("x".to_string());
    assert_eq!(err.clone(), err);
    assert_ne!(err, Error::Cancelled);
}

#[test]
fn test_error_debug() {
    assert!(format!("{:?}", Error::DeviceLost).contains("DeviceLost"));
    assert!(format!("{:?}", Error::InvalidParameters("p".into())).contains("InvalidParameters"));
}

// ============================================================================
// RESULT PROPAGATION
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::Cancelled)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::Cancelled));
}

// ============================================================================
// engine_err! MACRO
// ============================================================================

#[test]
fn test_engine_err_builds_payload_variant() {
    let err = engine_err!(InvalidParameters, "vista3d::test", "bad value {}", 7);
    assert_eq!(err, Error::InvalidParameters("bad value 7".to_string()));
}

#[test]
fn test_engine_err_builds_unit_variants() {
    let err = engine_err!(StreamExhausted, "vista3d::test", "end of chunks");
    assert_eq!(err, Error::StreamExhausted);

    let err = engine_err!(Cancelled, "vista3d::test", "worker shutdown");
    assert_eq!(err, Error::Cancelled);

    let err = engine_err!(DeviceLost, "vista3d::test", "surface lost");
    assert_eq!(err, Error::DeviceLost);
}
