//! AirWatch domain logic.
//!
//! Pure functions and types with no I/O. The `db` and `api` crates depend on
//! this crate for the compliance rule, role names, pagination, date filters,
//! dashboard aggregation, report formatting and upload naming.

pub mod compliance;
pub mod contact;
pub mod dashboard;
pub mod date_range;
pub mod error;
pub mod pagination;
pub mod report;
pub mod roles;
pub mod types;
pub mod uploads;
