//! Plain data row types written by output backends.

use fls_sim::UnitTickRecord;

/// One unit at one tick, flattened for tabular output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTickRow {
    pub segment:        u16,
    pub tick:           u64,
    pub frame:          i64,
    pub unit_id:        u32,
    pub local_clock:    f64,
    pub x:              f64,
    pub y:              f64,
    pub z:              f64,
    pub frame_length:   f64,
    pub nominal_length: f64,
    pub velocity:       f64,
}

impl From<&UnitTickRecord> for UnitTickRow {
    fn from(r: &UnitTickRecord) -> Self {
        Self {
            segment:        r.segment.0,
            tick:           r.tick,
            frame:          r.frame.0,
            unit_id:        r.unit.0,
            local_clock:    r.local_clock,
            x:              r.position.x,
            y:              r.position.y,
            z:              r.position.z,
            frame_length:   r.frame_length,
            nominal_length: r.nominal_length,
            velocity:       r.velocity,
        }
    }
}
