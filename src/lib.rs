//! One query model compiled for many SQL dialects, and one bidirectional cursor over every
//! driver's result handle.
//!
//! Drivers live in their own crates (`quarry-sqlite`, `quarry-duckdb`, `quarry-mysql`),
//! this crate exposes the backend independent API:
//! - [`Query`] describes a create, read, update or delete.
//! - [`SqlWriter`] compiles it for one dialect.
//! - [`Connection`] executes SQL and returns native handles.
//! - [`ResultCursor`] moves forward and backward over a handle.
//! - [`Database`] ties them together behind an interceptor [`Chain`].
pub use quarry_core::*;
