//! # Carve History
//!
//! Transactional undo/redo for scene edits produced by the cut pipeline.
//!
//! A [`SceneEdit`] is a reversible edit with explicit apply/revert/release
//! behavior; [`ReplaceNodes`] is the edit a successful cut produces; the
//! [`CommandStack`] records them and owns the release of geometry made
//! unreachable when the redo branch is discarded.
//!
//! Everything here runs on the single interactive thread.

pub mod command;
pub mod scene;
pub mod stack;

pub use command::{ReplaceNodes, SceneEdit};
pub use scene::{MemoryScene, NodeHandle, SceneHost};
pub use stack::CommandStack;
