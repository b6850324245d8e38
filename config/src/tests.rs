//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_csg_epsilon_larger_than_epsilon() {
    assert!(
        CSG_EPSILON >= EPSILON,
        "CSG_EPSILON should be >= EPSILON to absorb split error"
    );
}

#[test]
fn test_degenerate_area_epsilon_is_small() {
    assert!(DEGENERATE_AREA_EPSILON > 0.0);
    assert!(DEGENERATE_AREA_EPSILON < 1e-6);
}

// =============================================================================
// TOLERANCE TESTS
// =============================================================================

#[test]
fn test_weld_epsilon_is_positive() {
    assert!(VERTEX_WELD_EPSILON > 0.0, "weld tolerance must be positive");
}

#[test]
fn test_island_cell_covers_weld_tolerance() {
    // A quantization cell smaller than the weld tolerance can split one
    // welded seam into spurious islands.
    assert!(
        ISLAND_QUANT_CELL >= VERTEX_WELD_EPSILON,
        "ISLAND_QUANT_CELL must be >= VERTEX_WELD_EPSILON"
    );
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_limits_are_reasonable() {
    assert!(MAX_VERTICES >= 1_000_000);
    assert!(MAX_TRIANGLES >= 1_000_000);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_approx_equal() {
    assert!(approx_equal(1.0, 1.0));
    assert!(approx_equal(1.0, 1.0 + EPSILON / 2.0));
    assert!(!approx_equal(1.0, 1.0 + 1e-9));
}

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(approx_zero(-EPSILON / 2.0));
    assert!(!approx_zero(1e-9));
}
