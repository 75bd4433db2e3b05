//! Repository layer: the single point of truth exposed to business logic.
//!
//! # Responsibility
//! - Run store mutations off the async executor and report one result per call.
//! - Pass the data source's live read query through unchanged.
//!
//! # Invariants
//! - Store failures come back as `TodoError::Storage`, never as panics.

pub mod todo_repo;
