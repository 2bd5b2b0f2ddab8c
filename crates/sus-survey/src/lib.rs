//! System Usability Scale scoring with questionnaire intake and reporting.

pub mod config;
pub mod error;
pub mod questionnaire;
pub mod scoring;
pub mod telemetry;
