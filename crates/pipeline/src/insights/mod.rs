//! KPI engine
//!
//! Four aggregations, each available over the in-memory unified view
//! (`memory`) and over the persisted schema (`sql`). The two backends must
//! agree row for row, up to float rounding on sums; the contract test below
//! holds them to it.

pub mod memory;
pub mod sql;
