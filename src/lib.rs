//! # Cricket Insights
//!
//! Narrative and analytical insights for completed T20 cricket matches.
//!
//! ## Architecture
//!
//! - **models**: Canonical match records, standings rows and insight types
//! - **insights**: The pure insights engine (classification, narrative,
//!   key moments, tags, sorting, filtering, relations, timelines)
//! - **storage**: JSONL data directory operations
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod insights;
pub mod models;
pub mod storage;

pub use models::*;
