//! Plain data row types written by output backends.

use uav_engine::TickReport;
use uav_fleet::EntitySnapshot;

/// One entity's live position at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRow {
    pub entity_id: u32,
    pub tick:      u64,
    pub lat:       f64,
    pub lng:       f64,
    pub moving:    bool,
}

impl PositionRow {
    pub fn from_snapshot(tick: u64, snapshot: &EntitySnapshot) -> Self {
        Self {
            entity_id: snapshot.id.0,
            tick,
            lat:       snapshot.position.lat,
            lng:       snapshot.position.lng,
            moving:    snapshot.moving,
        }
    }
}

/// Per-tick scheduler counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:        u64,
    /// Simulated time at the end of the tick.
    pub sim_time_ms: u64,
    pub stepped:     u64,
    pub failed:      u64,
    pub finished:    u64,
    pub orphaned:    u64,
}

impl TickSummaryRow {
    pub fn from_report(report: &TickReport, sim_time_ms: u64) -> Self {
        Self {
            tick:     report.tick.0,
            sim_time_ms,
            stepped:  report.stepped as u64,
            failed:   report.failed as u64,
            finished: report.finished as u64,
            orphaned: report.orphaned as u64,
        }
    }
}
