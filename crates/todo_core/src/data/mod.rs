//! Data layer adapters between persisted rows and the domain model.

pub mod local_source;
