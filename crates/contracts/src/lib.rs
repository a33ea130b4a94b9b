//! Shared boundary types for the insights pipeline.
//!
//! Cleansed record shapes produced by the pipeline and the KPI row types
//! consumed by the presentation layer. Column sets on the KPI rows are
//! fixed; downstream renders them verbatim.

pub mod insights;
pub mod records;
