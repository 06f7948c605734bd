//! Ellipsoidal Mercator projection.
//!
//! The latitude term uses the eccentricity correction of the WGS84 ellipsoid,
//! which is what the hotspot client expects. Results are in meters and do not
//! depend on the zoom level.

use std::f64::consts::{FRAC_PI_4, PI};

use crate::error::GeoError;

/// Equatorial radius of the Earth in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Length of the equator in projected meters (2·π·R).
pub const EQUATOR_LENGTH: f64 = 40_075_016.685_578_488;

/// First eccentricity of the ellipsoid.
pub const ECCENTRICITY: f64 = 0.081_819_190_842_6;

/// Project longitude/latitude (degrees) to Mercator meters.
///
/// No domain check is performed: latitudes at or beyond ±90° yield
/// non-finite values. Use [`GeoPoint::new`] for validated input.
pub fn project(longitude: f64, latitude: f64) -> (f64, f64) {
    let lambda = longitude * PI / 180.0;
    let phi = latitude * PI / 180.0;

    let esin_phi = ECCENTRICITY * phi.sin();
    let tan_phi = (FRAC_PI_4 + phi / 2.0).tan();
    let tan_correction = (FRAC_PI_4 + esin_phi.asin() / 2.0)
        .tan()
        .powf(ECCENTRICITY);

    (
        EARTH_RADIUS * lambda,
        EARTH_RADIUS * (tan_phi / tan_correction).ln(),
    )
}

/// A geographic point together with its Mercator projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lng: f64,
    lat: f64,
    mercator_x: f64,
    mercator_y: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite or if the latitude is
    /// not strictly between -90 and 90.
    pub fn new(lng: f64, lat: f64) -> Result<Self, GeoError> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(GeoError::NonFinite { lng, lat });
        }
        if lat.abs() >= 90.0 {
            return Err(GeoError::LatitudeOutOfDomain { lat });
        }

        let (mercator_x, mercator_y) = project(lng, lat);
        if !mercator_y.is_finite() {
            return Err(GeoError::LatitudeOutOfDomain { lat });
        }

        Ok(Self {
            lng,
            lat,
            mercator_x,
            mercator_y,
        })
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Projected `(x, y)` in meters. Y grows northward.
    pub fn mercator(&self) -> (f64, f64) {
        (self.mercator_x, self.mercator_y)
    }
}
