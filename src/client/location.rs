//! Geolocation input for marking attendance.
//!
//! The platform owns the actual positioning. The client only needs one
//! sample per attend screen, so a provider is asked once and the result is
//! kept by the session.

use crate::shared::error::LocationError;
use crate::shared::models::attendance::Coordinates;
use std::future::Future;

/// A position fix
pub type GeoSample = Coordinates;

/// Source of the device position
pub trait LocationProvider {
    /// Ask for permission if needed and return the current position
    fn current_position(&self) -> impl Future<Output = Result<GeoSample, LocationError>> + Send;
}

/// Provider that always answers the same way. Used by the CLI, where the
/// position is passed on the command line, and by tests.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    result: Result<GeoSample, LocationError>,
}

impl FixedLocation {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            result: Ok(Coordinates { latitude, longitude }),
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self { result: Err(error) }
    }
}

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> impl Future<Output = Result<GeoSample, LocationError>> + Send {
        let result = self.result.clone();
        async move { result }
    }
}

/// Validate a user-supplied position
pub fn parse_position(latitude: f64, longitude: f64) -> Result<GeoSample, LocationError> {
    if latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
    {
        Ok(Coordinates { latitude, longitude })
    } else {
        Err(LocationError::Unavailable)
    }
}
