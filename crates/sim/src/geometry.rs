use aircombat_shared::*;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Local kinematic feature of one aircraft.
///
/// Position is north/east/down in km relative to the task origin, velocity is
/// north/east/down in Mach units. Down is positive towards the ground, so an
/// aircraft at altitude has a negative `position.z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicFeature {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl KinematicFeature {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    pub fn from_array(v: [f64; 6]) -> Self {
        Self {
            position: DVec3::new(v[0], v[1], v[2]),
            velocity: DVec3::new(v[3], v[4], v[5]),
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }

    /// Project raw simulator readings into the local frame around `origin`.
    pub fn from_state(state: &AircraftState, origin: &GeoOrigin) -> Self {
        let (north_m, east_m) = origin.to_local_m(state.longitude_deg, state.latitude_deg);
        Self {
            position: DVec3::new(
                north_m / METERS_PER_KM,
                east_m / METERS_PER_KM,
                -state.altitude_km(),
            ),
            velocity: state.velocity_mach(),
        }
    }
}

/// Relative geometry between an ego aircraft and its opponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryResult {
    /// Angle-off: ego velocity vs. line of sight to the enemy. [0, PI]
    pub ao: f64,
    /// Target-aspect: enemy velocity vs. the same ego->enemy line of sight.
    /// 0 when the ego sits dead astern of the enemy, PI when the enemy points
    /// straight at the ego. [0, PI]
    pub ta: f64,
    /// km
    pub range: f64,
    /// +1 enemy right of the ego's ground track, -1 left, 0 collinear.
    pub side: i8,
}

/// Compute AO, TA, range and (optionally) the side flag.
///
/// Angles whose vectors are degenerate (`|a| * |b|` below `GEOMETRY_EPSILON`)
/// are reported as 0.
pub fn compute(ego: &KinematicFeature, enemy: &KinematicFeature, want_side: bool) -> GeometryResult {
    let los = enemy.position - ego.position;
    let range = los.length();
    let ao = angle_between(ego.velocity, los);
    let ta = angle_between(enemy.velocity, los);

    let side = if want_side {
        let cross = ego.velocity.x * los.y - ego.velocity.y * los.x;
        sign(cross) as i8
    } else {
        0
    };

    GeometryResult { ao, ta, range, side }
}

/// Unsigned angle between two vectors in [0, PI].
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let denom = a.length() * b.length();
    if !(denom >= GEOMETRY_EPSILON) {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Three-valued sign. Unlike `f64::signum`, zero (and NaN) map to 0.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
