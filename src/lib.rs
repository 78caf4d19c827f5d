//! `evict` - Scores old build archives by age and size and plans which to delete.

#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

pub mod config;
pub mod crawler;
pub mod error;
pub mod evictor;
pub mod manifest;
pub mod planner;
pub mod report;
pub mod types;
pub mod weight;
