// Agents (one-versus-one only)
pub const NUM_AGENTS: usize = 2;

// Unit conversion
pub const FEET_TO_METERS: f64 = 0.304;
pub const SPEED_OF_SOUND_MPS: f64 = 340.0;
pub const METERS_PER_KM: f64 = 1000.0;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Local tangent-plane origin
pub const DEFAULT_ORIGIN_LONGITUDE_DEG: f64 = 120.0;
pub const DEFAULT_ORIGIN_LATITUDE_DEG: f64 = 60.0;

// Observation
pub const OBS_SIZE: usize = 18;
pub const OBS_LOW: f32 = -10.0;
pub const OBS_HIGH: f32 = 10.0;
pub const OBS_ALTITUDE_UNIT_M: f64 = 5000.0; // altitude reported in 5 km units
pub const OBS_RANGE_UNIT_KM: f64 = 10.0;

// Action (aileron, elevator, rudder, throttle)
pub const ACTION_SIZE: usize = 4;
pub const STICK_LEVELS: usize = 41;
pub const THROTTLE_LEVELS: usize = 30;
pub const STICK_MIN: f64 = -1.0;
pub const STICK_MAX: f64 = 1.0;
pub const THROTTLE_MIN: f64 = 0.4;
pub const THROTTLE_MAX: f64 = 0.9;

// Geometry
pub const GEOMETRY_EPSILON: f64 = 1e-8;

// Posture reward shaping
pub const DEFAULT_TARGET_DIST_KM: f64 = 3.0;
pub const ASPECT_FLOOR: f64 = 1e-4; // keeps arctanh away from its +/-1 poles
pub const RANGE_SIGN_FLOOR_KM: f64 = 7.0;
pub const RANGE_CLIP_MIN: f64 = 0.3;
pub const RANGE_CLIP_MAX: f64 = 1.0;

// Altitude rewards
pub const DEFAULT_SAFE_ALTITUDE_KM: f64 = 4.0;
pub const DEFAULT_DANGER_ALTITUDE_KM: f64 = 3.5;
pub const DEFAULT_KV_MACH: f64 = 0.2;
pub const DEFAULT_KH_KM: f64 = 1.0;

// Termination
pub const DEFAULT_MAX_STEPS: u32 = 1000;
pub const DEFAULT_STEP_DURATION_S: f64 = 0.2; // 12 sim frames at 60 Hz per agent step
pub const DEFAULT_ALTITUDE_LIMIT_KM: f64 = 2.5;
pub const DEFAULT_ACCEL_LIMIT_G: f64 = 10.0;
pub const DEFAULT_OVERLOAD_WARMUP_S: f64 = 10.0;
pub const DEFAULT_EXTREME_MAX_MACH: f64 = 3.0;
