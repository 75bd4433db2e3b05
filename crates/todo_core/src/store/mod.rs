//! Persisted todo storage and its live read query.
//!
//! # Responsibility
//! - Define the storage contract (`TodoStore`) used by the data layer.
//! - Keep SQL details inside the persistence boundary.
//! - Push the full ordered result set to subscribers after every mutation.
//!
//! # Invariants
//! - `list` and every live snapshot are ordered by `createdAt DESC, id DESC`.
//! - Update/delete are addressed by primary key only.

pub mod live;
pub mod todo_store;
