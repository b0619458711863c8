//! Domain layer for the e-learning backend.
//!
//! Everything here is pure: no database, no HTTP. The `db` and `api` crates
//! build on these types and rules.

pub mod error;
pub mod ordering;
pub mod roles;
pub mod types;
pub mod validation;
