//! Pure views over the team collection.
//!
//! Every admin screen and export is a fresh projection of the stored teams:
//! flatten them into people, narrow with a filter, count with stats, and
//! serialize to CSV. Nothing here touches the database or session state.

mod csv;
mod filter;
mod flatten;
mod patch;
mod rooms;
mod stats;

pub use csv::*;
pub use filter::*;
pub use flatten::*;
pub use patch::*;
pub use rooms::*;
pub use stats::*;
