//! eam-openers - missing opener detection
//!
//! Looks up single-headliner concerts on setlist.fm and reports other acts
//! that played the same venue on the same date, with a confidence score that
//! each one was an opening act.

pub mod models;
pub mod services;

pub use models::detection::{ConfidenceLabel, DetectedOpener, DetectionResult, Evidence};
pub use models::report::ScanReport;
pub use services::opener_detector::OpenerDetector;
pub use services::setlistfm_client::{SetlistError, SetlistFmClient, SetlistQuery, SetlistSource};
