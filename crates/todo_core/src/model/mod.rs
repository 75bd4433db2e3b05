//! Domain model for the todo list.
//!
//! # Responsibility
//! - Define the single business entity shared by every layer.
//!
//! # Invariants
//! - A persisted `Todo` is addressed only by its store-assigned `id`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod todo;
