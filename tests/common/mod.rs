//! Shared helpers for the integration tests
//!
//! - a wiremock-backed fake of the attendance backend
//! - assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod mock_backend;

pub use mock_backend::*;
