//! Trajectory legs and their persisted forms.
//!
//! # Record layout
//!
//! A leg is `{lat, lng, durationMs}`; an ordered list of legs fully describes
//! a trajectory.  Two encodings are supported:
//!
//! ```json
//! [{"lat": 5.0, "lng": 0.0, "durationMs": 500.0},
//!  {"lat": 5.0, "lng": 5.0, "durationMs": 500.0}]
//! ```
//!
//! ```csv
//! lat,lng,duration_ms
//! 5.0,0.0,500
//! 5.0,5.0,500
//! ```
//!
//! Both preserve order and the exact `f64` values.

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, LatLng};

/// Smallest duration a motion may have.  Zero, negative, and NaN requests are
/// raised to this value so every motion terminates and velocity never
/// divides by zero.
pub const MIN_DURATION: Duration = Duration::from_millis(1);

/// Raise `d` to at least [`MIN_DURATION`].
#[inline]
pub fn clamp_duration(d: Duration) -> Duration {
    d.max(MIN_DURATION)
}

/// Convert a millisecond count to a [`Duration`], clamping non-positive and
/// NaN inputs to [`MIN_DURATION`] and saturating huge ones.
pub fn clamp_duration_ms(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return MIN_DURATION;
    }
    Duration::try_from_secs_f64(ms / 1_000.0)
        .unwrap_or(Duration::MAX)
        .max(MIN_DURATION)
}

// ── Leg ───────────────────────────────────────────────────────────────────────

/// One step of a trajectory: fly to `(lat, lng)` over `duration_ms`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "durationMs", alias = "duration_ms")]
    pub duration_ms: f64,
}

impl Leg {
    #[inline]
    pub fn new(target: LatLng, duration_ms: f64) -> Self {
        Self { lat: target.lat, lng: target.lng, duration_ms }
    }

    #[inline]
    pub fn target(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Traversal time with the [`MIN_DURATION`] clamp applied.
    #[inline]
    pub fn duration(&self) -> Duration {
        clamp_duration_ms(self.duration_ms)
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct LegRecord {
    lat:         f64,
    lng:         f64,
    duration_ms: f64,
}

/// Load an ordered leg list from a CSV file.
pub fn load_legs_csv(path: &Path) -> CoreResult<Vec<Leg>> {
    let file = std::fs::File::open(path)?;
    load_legs_reader(file)
}

/// Like [`load_legs_csv`] but accepts any `Read` source.
pub fn load_legs_reader<R: Read>(reader: R) -> CoreResult<Vec<Leg>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<LegRecord>()
        .map(|row| {
            let row = row.map_err(|e| CoreError::Parse(e.to_string()))?;
            Ok(Leg { lat: row.lat, lng: row.lng, duration_ms: row.duration_ms })
        })
        .collect()
}

/// Write `legs` as CSV (with header) to `writer`.
pub fn write_legs_csv<W: Write>(writer: W, legs: &[Leg]) -> CoreResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for leg in legs {
        csv_writer
            .serialize(LegRecord { lat: leg.lat, lng: leg.lng, duration_ms: leg.duration_ms })
            .map_err(|e| CoreError::Parse(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

// ── JSON ──────────────────────────────────────────────────────────────────────

/// Parse a JSON array of `{lat, lng, durationMs}` objects.
pub fn legs_from_json(json: &str) -> CoreResult<Vec<Leg>> {
    serde_json::from_str(json).map_err(|e| CoreError::Parse(e.to_string()))
}

/// Serialise `legs` as a JSON array of `{lat, lng, durationMs}` objects.
pub fn legs_to_json(legs: &[Leg]) -> CoreResult<String> {
    serde_json::to_string(legs).map_err(|e| CoreError::Parse(e.to_string()))
}
