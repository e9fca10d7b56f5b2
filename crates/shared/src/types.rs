use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Raw per-step readings for one aircraft, in simulator-native units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_ft: f64,
    pub roll_rad: f64,
    pub pitch_rad: f64,
    pub heading_rad: f64,
    pub v_north_fps: f64,
    pub v_east_fps: f64,
    pub v_down_fps: f64,
    /// Calibrated airspeed.
    pub vc_fps: f64,
    /// Normalized pilot accelerations.
    pub accel_x_g: f64,
    pub accel_y_g: f64,
    pub accel_z_g: f64,
}

impl AircraftState {
    pub fn altitude_m(&self) -> f64 {
        self.altitude_ft * FEET_TO_METERS
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude_m() / METERS_PER_KM
    }

    /// North/east/down velocity in Mach units.
    pub fn velocity_mach(&self) -> DVec3 {
        DVec3::new(self.v_north_fps, self.v_east_fps, self.v_down_fps) * FEET_TO_METERS
            / SPEED_OF_SOUND_MPS
    }

    pub fn speed_mach(&self) -> f64 {
        self.velocity_mach().length()
    }

    pub fn v_down_mach(&self) -> f64 {
        self.v_down_fps * FEET_TO_METERS / SPEED_OF_SOUND_MPS
    }

    pub fn vc_mach(&self) -> f64 {
        self.vc_fps * FEET_TO_METERS / SPEED_OF_SOUND_MPS
    }

    pub fn acceleration_g(&self) -> DVec3 {
        DVec3::new(self.accel_x_g, self.accel_y_g, self.accel_z_g)
    }

    pub fn is_finite(&self) -> bool {
        [
            self.longitude_deg,
            self.latitude_deg,
            self.altitude_ft,
            self.roll_rad,
            self.pitch_rad,
            self.heading_rad,
            self.v_north_fps,
            self.v_east_fps,
            self.v_down_fps,
            self.vc_fps,
            self.accel_x_g,
            self.accel_y_g,
            self.accel_z_g,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Continuous control command sent back to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlCommand {
    pub aileron: f64,
    pub elevator: f64,
    pub rudder: f64,
    pub throttle: f64,
}

impl ControlCommand {
    pub fn to_raw(&self) -> [f64; ACTION_SIZE] {
        [self.aileron, self.elevator, self.rudder, self.throttle]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub data: [f32; OBS_SIZE],
}

impl Observation {
    /// True if every dimension lies inside the declared box.
    pub fn within_bounds(&self) -> bool {
        self.data.iter().all(|v| (OBS_LOW..=OBS_HIGH).contains(v))
    }
}

impl serde::Serialize for Observation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.as_slice().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Observation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v: Vec<f32> = Vec::deserialize(deserializer)?;
        if v.len() != OBS_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {} floats, got {}",
                OBS_SIZE,
                v.len()
            )));
        }
        let mut data = [0.0f32; OBS_SIZE];
        data.copy_from_slice(&v);
        Ok(Observation { data })
    }
}

/// Declared observation box for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    pub low: f32,
    pub high: f32,
    pub shape: usize,
}

impl Default for ObservationSpace {
    fn default() -> Self {
        Self {
            low: OBS_LOW,
            high: OBS_HIGH,
            shape: OBS_SIZE,
        }
    }
}

/// Declared multi-discrete action space for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    pub nvec: [usize; ACTION_SIZE],
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self {
            nvec: [STICK_LEVELS, STICK_LEVELS, STICK_LEVELS, THROTTLE_LEVELS],
        }
    }
}

/// One recorded step of an engagement: raw readings for both agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFrame {
    pub states: [AircraftState; NUM_AGENTS],
}
