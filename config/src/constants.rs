//! # Configuration Constants
//!
//! Centralized constants for the carve pipeline. All geometric tolerances,
//! precision values, and safety limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Tolerances**: Welding and island-adjacency quantization
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for general floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Plane-side classification tolerance for the boolean kernel.
///
/// Signed distances with absolute value below this are treated as
/// "on the plane". Larger than [`EPSILON`] because the BSP kernel
/// accumulates error through repeated polygon splitting.
pub const CSG_EPSILON: f64 = 1e-5;

/// Squared-area cutoff below which a triangle is considered degenerate.
///
/// Degenerate triangles are dropped when converting a buffer into kernel
/// polygons; they carry no volume information and produce unstable planes.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-10;

// =============================================================================
// TOLERANCE CONSTANTS
// =============================================================================

/// Distance below which two vertex positions are welded into one.
///
/// Welding runs on brush geometry before it enters the boolean evaluator;
/// the evaluator itself assumes welded input and never deduplicates.
pub const VERTEX_WELD_EPSILON: f64 = 1e-3;

/// Quantization cell size for island-adjacency vertex keys.
///
/// Each coordinate is divided by this value and rounded to form an integer
/// key; vertices mapping to the same key are treated as identical when
/// building face adjacency.
///
/// Must be `>= VERTEX_WELD_EPSILON`: a cell smaller than the weld tolerance
/// can fail to bridge a seam that was welded upstream, splitting one
/// continuous surface into spurious islands. The relationship is asserted
/// by a test rather than corrected at runtime; both values are tunables.
pub const ISLAND_QUANT_CELL: f64 = 1e-3;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single mesh buffer.
///
/// Safety limit to prevent memory exhaustion from extremely complex models.
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single mesh buffer.
///
/// Safety limit to prevent memory exhaustion from extremely complex models.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
