//! Coordinate pair used for every entity position.
//!
//! The engine is coordinate-system agnostic: `lat`/`lng` are treated as two
//! independent axes and interpolated linearly in unprojected space.  No
//! great-circle or projection correction is applied anywhere.

use serde::{Deserialize, Serialize};

/// A position stored as double-precision latitude/longitude.
///
/// `f64` is required so a stored trajectory survives a round trip through
/// JSON or CSV bit-for-bit.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when neither coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Component-wise difference `other − self`.
    #[inline]
    pub fn delta_to(self, other: LatLng) -> (f64, f64) {
        (other.lat - self.lat, other.lng - self.lng)
    }

    /// `self` shifted by `(d_lat, d_lng)`.
    #[inline]
    pub fn offset(self, d_lat: f64, d_lng: f64) -> LatLng {
        LatLng::new(self.lat + d_lat, self.lng + d_lng)
    }
}

impl From<(f64, f64)> for LatLng {
    #[inline]
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
