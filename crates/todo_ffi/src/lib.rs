//! Flutter-facing bridge over `todo_core`.

pub mod api;
