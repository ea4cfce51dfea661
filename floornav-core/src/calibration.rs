//! Pixel to real-world scale and pixel to GPS anchoring
//!
//! The two are independent: calibration drives reported path
//! lengths, the georeference is raw anchor data for mobile clients locating
//! a device on the floorplan. Nothing here forces them to agree.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{Error, geometry};

/// Meters spanned by one degree of latitude on the WGS84 equator sphere
const METERS_PER_DEGREE: f64 = 6_378_137.0 * std::f64::consts::PI / 180.0;

/// Below this many meters per degree of longitude the anchor sits on a pole
const POLAR_LNG_SCALE: f64 = 1e-6;

/// Folds a longitude into [-180, 180)
fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Meters per pixel from two picked points and the real distance between them
///
/// # Errors
///
/// Returns [`Error::InvalidCalibration`] if `real_meters` is not positive or
/// the points coincide.
pub fn compute_scale(a: Point<f64>, b: Point<f64>, real_meters: f64) -> Result<f64, Error> {
    if !real_meters.is_finite() || real_meters <= 0.0 {
        return Err(Error::InvalidCalibration(format!(
            "real distance must be positive, got {real_meters}"
        )));
    }

    let distance_px = geometry::distance(a, b);
    if !distance_px.is_finite() || distance_px < f64::EPSILON {
        return Err(Error::InvalidCalibration(
            "calibration points coincide".to_string(),
        ));
    }

    Ok(real_meters / distance_px)
}

/// Active pixel to meters scale of a floorplan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub meters_per_pixel: f64,
    /// Picked reference points and the distance entered for them
    pub point_a: Point<f64>,
    pub point_b: Point<f64>,
    pub real_meters: f64,
}

impl Calibration {
    pub fn from_points(a: Point<f64>, b: Point<f64>, real_meters: f64) -> Result<Self, Error> {
        Ok(Self {
            meters_per_pixel: compute_scale(a, b, real_meters)?,
            point_a: a,
            point_b: b,
            real_meters,
        })
    }

    pub fn pixels_to_meters(&self, pixels: f64) -> f64 {
        pixels * self.meters_per_pixel
    }

    pub fn meters_to_pixels(&self, meters: f64) -> f64 {
        meters / self.meters_per_pixel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Anchor pixel pinned to a GPS position, plus the clockwise angle between
/// image "up" and true north.
///
/// Stored verbatim. The transform helpers below are for consumers and are
/// never applied when the georeference is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Georeference {
    pub anchor_pixel: Point<f64>,
    pub anchor: LatLng,
    pub bearing_degrees: f64,
}

impl Georeference {
    pub fn new(anchor_pixel: Point<f64>, anchor: LatLng, bearing_degrees: f64) -> Result<Self, Error> {
        let finite = [
            anchor_pixel.x(),
            anchor_pixel.y(),
            anchor.lat,
            anchor.lng,
            bearing_degrees,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidGeoreference(
                "all values must be finite".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&anchor.lat) {
            return Err(Error::InvalidGeoreference(format!(
                "latitude {} out of range",
                anchor.lat
            )));
        }
        if !(-180.0..=180.0).contains(&anchor.lng) {
            return Err(Error::InvalidGeoreference(format!(
                "longitude {} out of range",
                anchor.lng
            )));
        }

        Ok(Self {
            anchor_pixel,
            anchor,
            bearing_degrees,
        })
    }

    fn meters_per_degree_lng(&self) -> f64 {
        METERS_PER_DEGREE * self.anchor.lat.to_radians().cos()
    }

    /// Projects a floorplan pixel to GPS using a local flat-earth approximation
    ///
    /// Accurate over building-sized offsets away from the poles. Longitude
    /// wraps across the antimeridian and latitude saturates at ±90°. With the
    /// anchor on a pole every pixel keeps the anchor longitude.
    pub fn pixel_to_lat_lng(&self, pixel: Point<f64>, meters_per_pixel: f64) -> LatLng {
        let right = (pixel.x() - self.anchor_pixel.x()) * meters_per_pixel;
        // image y grows downwards
        let up = (self.anchor_pixel.y() - pixel.y()) * meters_per_pixel;

        let (sin, cos) = self.bearing_degrees.to_radians().sin_cos();
        let east = right * cos + up * sin;
        let north = up * cos - right * sin;

        let lng_scale = self.meters_per_degree_lng();
        let lng = if lng_scale < POLAR_LNG_SCALE {
            self.anchor.lng
        } else {
            wrap_longitude(self.anchor.lng + east / lng_scale)
        };

        LatLng {
            lat: (self.anchor.lat + north / METERS_PER_DEGREE).clamp(-90.0, 90.0),
            lng,
        }
    }

    /// Inverse of [`Georeference::pixel_to_lat_lng`]
    pub fn lat_lng_to_pixel(&self, position: LatLng, meters_per_pixel: f64) -> Point<f64> {
        let north = (position.lat - self.anchor.lat) * METERS_PER_DEGREE;
        let east = wrap_longitude(position.lng - self.anchor.lng) * self.meters_per_degree_lng();

        let (sin, cos) = self.bearing_degrees.to_radians().sin_cos();
        let right = east * cos - north * sin;
        let up = east * sin + north * cos;

        Point::new(
            self.anchor_pixel.x() + right / meters_per_pixel,
            self.anchor_pixel.y() - up / meters_per_pixel,
        )
    }
}
