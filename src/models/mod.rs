//! Core data models: canonical match records, standings and derived insights.

mod ids;
mod insights;
pub mod lenient;
mod match_record;
mod standings;

pub use ids::*;
pub use insights::*;
pub use match_record::*;
pub use standings::*;
