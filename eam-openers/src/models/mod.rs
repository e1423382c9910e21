//! Data models for setlist lookups, detection results, and reports

pub mod concert;
pub mod detection;
pub mod report;
pub mod setlist;
