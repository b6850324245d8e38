//! # Carve Mesh
//!
//! Data model for the carve pipeline: flat triangle buffers, posed
//! brushes, vertex welding, and the primitives the orchestrator builds
//! targets and cutters from.
//!
//! ## Architecture
//!
//! ```text
//! stroke outline → primitives (prism) → Brush::bake → weld_vertices → CSG
//! ```
//!
//! Buffers are moved, never shared, between pipeline stages.

pub mod brush;
pub mod buffer;
pub mod error;
pub mod primitives;
pub mod weld;

pub use brush::Brush;
pub use buffer::MeshBuffer;
pub use error::GeometryError;
pub use weld::weld_vertices;
