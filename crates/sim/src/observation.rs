use aircombat_shared::*;

use crate::geometry::{self, KinematicFeature};

/// Converts raw readings of both aircraft into the 18-float observation.
///
/// Values are scaled so a typical flight envelope stays inside [-10, 10], but
/// nothing is clipped: extreme states may fall outside the declared box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationNormalizer {
    origin: GeoOrigin,
}

impl ObservationNormalizer {
    pub fn new(origin: GeoOrigin) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &GeoOrigin {
        &self.origin
    }

    /// Observation of `ego`, with `enemy` as its opponent.
    pub fn normalize_agent(&self, ego: &AircraftState, enemy: &AircraftState) -> Observation {
        let ego_feature = KinematicFeature::from_state(ego, &self.origin);
        let enm_feature = KinematicFeature::from_state(enemy, &self.origin);
        let mut data = [0.0f32; OBS_SIZE];

        // EGO STATE (11 floats) [0..11)
        data[0] = (ego.altitude_m() / OBS_ALTITUDE_UNIT_M) as f32;
        data[1] = ego_feature.velocity.length() as f32;
        data[2] = ego.v_down_mach() as f32;
        data[3] = ego.roll_rad.sin() as f32;
        data[4] = ego.roll_rad.cos() as f32;
        data[5] = ego.pitch_rad.sin() as f32;
        data[6] = ego.pitch_rad.cos() as f32;
        data[7] = ego.vc_mach() as f32;
        data[8] = ego.accel_x_g as f32;
        data[9] = ego.accel_y_g as f32;
        data[10] = ego.accel_z_g as f32;

        // RELATIVE GEOMETRY (4 floats) [11..15)
        let g = geometry::compute(&ego_feature, &enm_feature, true);
        data[11] = (g.range / OBS_RANGE_UNIT_KM) as f32;
        data[12] = g.ao as f32;
        data[13] = g.ta as f32;
        data[14] = g.side as f32;

        // ENEMY STATE (3 floats) [15..18)
        data[15] = (enemy.altitude_m() / OBS_ALTITUDE_UNIT_M) as f32;
        data[16] = enm_feature.velocity.length() as f32;
        data[17] = enemy.v_down_mach() as f32;

        Observation { data }
    }

    /// One observation per agent, each seeing the other as its enemy.
    pub fn normalize(&self, states: &[AircraftState; NUM_AGENTS]) -> [Observation; NUM_AGENTS] {
        [
            self.normalize_agent(&states[0], &states[1]),
            self.normalize_agent(&states[1], &states[0]),
        ]
    }
}
