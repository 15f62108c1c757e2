//! Data models for the registration portal.
//!
//! Field names serialize in camelCase to match the dashboard's JSON contract.

mod person;
mod requests;
mod team;

pub use person::*;
pub use requests::*;
pub use team::*;
