//! Gateway domain: configuration, errors and the JSON bodies served.

pub mod config;
pub mod error;
pub mod types;
