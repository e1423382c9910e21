//! Services for opener detection

pub mod concert_scanner;
pub mod confidence_scorer;
pub mod opener_detector;
pub mod setlistfm_client;
