//! Persisted path
//!
//! Cleansed records land in the relational schema through idempotent
//! upserts keyed by the natural unique constraints. Reloading the same
//! source files leaves the database unchanged.

pub mod customers;
pub mod orders;

/// Storage layout of UTC timestamps in `orders_fact`.
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
