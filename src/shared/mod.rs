//! Shared Module
//!
//! Types that describe the backend's JSON API and the errors the client can
//! raise. Nothing in here performs I/O except reading the config file.

/// Client error taxonomy
pub mod error;

/// Application configuration
pub mod config;

/// Status flag, reply envelope and lenient field decoders
pub mod wire;

/// Request and response bodies per endpoint
pub mod models;

pub use config::{AppConfig, AppConfigBuilder, ConfigError, PageSizes};
pub use error::{ClientError, LocationError};
pub use wire::{Ack, Envelope, RecordId, StatusFlag};
