//! Presentation-facing state holder.
//!
//! # Responsibility
//! - Own the single authoritative UI state snapshot and its transitions.
//! - Turn use-case failures into user-visible text with explicit dismissal.

pub mod view_model;
