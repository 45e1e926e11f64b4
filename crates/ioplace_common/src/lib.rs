//! Shared foundational types used across the ioplace workspace.
//!
//! This crate provides the integer database-unit geometry primitives used by
//! every placement stage, and the internal error type for engine bugs.

#![warn(missing_docs)]

pub mod geometry;
pub mod result;

pub use geometry::{Coordinate, Dbu, Rect};
pub use result::{InternalError, IoplaceResult};
