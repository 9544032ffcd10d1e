//! Outbound adapters implementing the driven repository ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: a process-local store used when no database is configured.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;
