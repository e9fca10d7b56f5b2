//! Task configuration for one-versus-one combat.
//!
//! Every field carries an explicit default, so a config file only needs the
//! keys it wants to override. Unknown keys are ignored; unknown version tags
//! are a hard error.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unknown {family} function version: {tag}")]
    UnknownVersion { family: &'static str, tag: String },
    #[error("Only one-to-one combat is supported, got {0} agents")]
    AgentCount(usize),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Version tag selecting one member of a shaping-function family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapingVersion {
    V0,
    V1,
    #[default]
    V2,
}

impl ShapingVersion {
    pub const ALL: [ShapingVersion; 3] = [ShapingVersion::V0, ShapingVersion::V1, ShapingVersion::V2];

    /// Parse a tag, reporting `family` in the error.
    pub fn parse(family: &'static str, tag: &str) -> Result<Self, ConfigError> {
        match tag {
            "v0" => Ok(ShapingVersion::V0),
            "v1" => Ok(ShapingVersion::V1),
            "v2" => Ok(ShapingVersion::V2),
            other => Err(ConfigError::UnknownVersion {
                family,
                tag: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapingVersion::V0 => "v0",
            ShapingVersion::V1 => "v1",
            ShapingVersion::V2 => "v2",
        }
    }
}

impl FromStr for ShapingVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("shaping", s)
    }
}

impl fmt::Display for ShapingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geodetic point the local north/east/down frame is anchored at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoOrigin {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
}

impl Default for GeoOrigin {
    fn default() -> Self {
        Self {
            longitude_deg: DEFAULT_ORIGIN_LONGITUDE_DEG,
            latitude_deg: DEFAULT_ORIGIN_LATITUDE_DEG,
        }
    }
}

impl GeoOrigin {
    /// Equirectangular projection of a lon/lat pair onto the local plane.
    /// Returns (north, east) in meters.
    pub fn to_local_m(&self, longitude_deg: f64, latitude_deg: f64) -> (f64, f64) {
        let north = (latitude_deg - self.latitude_deg).to_radians() * EARTH_RADIUS_M;
        let east = (longitude_deg - self.longitude_deg).to_radians()
            * EARTH_RADIUS_M
            * self.latitude_deg.to_radians().cos();
        (north, east)
    }

    /// Inverse of [`GeoOrigin::to_local_m`]. Returns (longitude, latitude) in degrees.
    pub fn from_local_m(&self, north_m: f64, east_m: f64) -> (f64, f64) {
        let latitude = self.latitude_deg + (north_m / EARTH_RADIUS_M).to_degrees();
        let longitude = self.longitude_deg
            + (east_m / (EARTH_RADIUS_M * self.latitude_deg.to_radians().cos())).to_degrees();
        (longitude, latitude)
    }
}

/// Parameters of the orientation x range posture shaping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub orientation_version: ShapingVersion,
    pub range_version: ShapingVersion,
    /// Preferred engagement distance, km.
    pub target_dist: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            orientation_version: ShapingVersion::V2,
            range_version: ShapingVersion::V2,
            target_dist: DEFAULT_TARGET_DIST_KM,
        }
    }
}

impl RewardConfig {
    /// Build from string tags, failing on anything but v0/v1/v2.
    pub fn from_tags(orientation: &str, range: &str, target_dist: f64) -> Result<Self, ConfigError> {
        let config = Self {
            orientation_version: ShapingVersion::parse("orientation", orientation)?,
            range_version: ShapingVersion::parse("range", range)?,
            target_dist,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("target_dist", self.target_dist)
    }
}

/// Scaling and potential-mode switches shared by every reward term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermOptions {
    pub scale: f64,
    /// Report the change in reward since the previous step instead of the reward itself.
    pub potential: bool,
}

impl Default for TermOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            potential: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureRewardConfig {
    #[serde(flatten)]
    pub shaping: RewardConfig,
    #[serde(flatten)]
    pub options: TermOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltitudeRewardConfig {
    /// Below this altitude, descending is penalized. km
    pub safe_altitude: f64,
    /// Below this altitude, altitude itself is penalized. km
    pub danger_altitude: f64,
    /// Descent rate that saturates the penalty. Mach
    pub kv: f64,
    #[serde(flatten)]
    pub options: TermOptions,
}

impl Default for AltitudeRewardConfig {
    fn default() -> Self {
        Self {
            safe_altitude: DEFAULT_SAFE_ALTITUDE_KM,
            danger_altitude: DEFAULT_DANGER_ALTITUDE_KM,
            kv: DEFAULT_KV_MACH,
            options: TermOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeAltitudeRewardConfig {
    /// Tolerated altitude difference. km
    pub kh: f64,
    #[serde(flatten)]
    pub options: TermOptions,
}

impl Default for RelativeAltitudeRewardConfig {
    fn default() -> Self {
        Self {
            kh: DEFAULT_KH_KM,
            options: TermOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtremeStateConfig {
    pub max_mach: f64,
}

impl Default for ExtremeStateConfig {
    fn default() -> Self {
        Self {
            max_mach: DEFAULT_EXTREME_MAX_MACH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverloadConfig {
    pub limit_x: f64,
    pub limit_y: f64,
    pub limit_z: f64,
    /// Overload is ignored until the episode has run this long. s
    pub warmup_s: f64,
}

impl Default for OverloadConfig {
    fn default() -> Self {
        Self {
            limit_x: DEFAULT_ACCEL_LIMIT_G,
            limit_y: DEFAULT_ACCEL_LIMIT_G,
            limit_z: DEFAULT_ACCEL_LIMIT_G,
            warmup_s: DEFAULT_OVERLOAD_WARMUP_S,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowAltitudeConfig {
    /// km
    pub altitude_limit: f64,
}

impl Default for LowAltitudeConfig {
    fn default() -> Self {
        Self {
            altitude_limit: DEFAULT_ALTITUDE_LIMIT_KM,
        }
    }
}

/// Root configuration of a single-combat task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub num_agents: usize,
    pub origin: GeoOrigin,
    pub max_steps: u32,
    /// Simulated time covered by one agent step. s
    pub step_duration_s: f64,
    pub posture: PostureRewardConfig,
    pub altitude: AltitudeRewardConfig,
    pub relative_altitude: RelativeAltitudeRewardConfig,
    pub extreme_state: ExtremeStateConfig,
    pub overload: OverloadConfig,
    pub low_altitude: LowAltitudeConfig,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            num_agents: NUM_AGENTS,
            origin: GeoOrigin::default(),
            max_steps: DEFAULT_MAX_STEPS,
            step_duration_s: DEFAULT_STEP_DURATION_S,
            posture: PostureRewardConfig::default(),
            altitude: AltitudeRewardConfig::default(),
            relative_altitude: RelativeAltitudeRewardConfig::default(),
            extreme_state: ExtremeStateConfig::default(),
            overload: OverloadConfig::default(),
            low_altitude: LowAltitudeConfig::default(),
        }
    }
}

impl TaskConfig {
    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: TaskConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_agents != NUM_AGENTS {
            return Err(ConfigError::AgentCount(self.num_agents));
        }
        if !(-90.0..90.0).contains(&self.origin.latitude_deg) {
            return Err(ConfigError::InvalidValue {
                field: "origin.latitude_deg",
                reason: format!("{} is outside (-90, 90)", self.origin.latitude_deg),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_steps",
                reason: "must be at least 1".into(),
            });
        }
        positive("step_duration_s", self.step_duration_s)?;
        self.posture.shaping.validate()?;
        positive("altitude.safe_altitude", self.altitude.safe_altitude)?;
        positive("altitude.danger_altitude", self.altitude.danger_altitude)?;
        positive("altitude.kv", self.altitude.kv)?;
        positive("relative_altitude.kh", self.relative_altitude.kh)?;
        positive("extreme_state.max_mach", self.extreme_state.max_mach)?;
        positive("overload.limit_x", self.overload.limit_x)?;
        positive("overload.limit_y", self.overload.limit_y)?;
        positive("overload.limit_z", self.overload.limit_z)?;
        for (field, scale) in [
            ("posture.scale", self.posture.options.scale),
            ("altitude.scale", self.altitude.options.scale),
            ("relative_altitude.scale", self.relative_altitude.options.scale),
        ] {
            if !scale.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{scale} is not finite"),
                });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} is not a positive finite number"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TaskConfig::default();
        assert_eq!(config.num_agents, 2);
        assert_eq!(config.posture.shaping.orientation_version, ShapingVersion::V2);
        assert_eq!(config.posture.shaping.range_version, ShapingVersion::V2);
        assert!((config.posture.shaping.target_dist - 3.0).abs() < 1e-12);
        assert!((config.posture.options.scale - 1.0).abs() < 1e-12);
        assert!(!config.posture.options.potential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = TaskConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, TaskConfig::default());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
posture:
  orientation_version: v0
  range_version: v1
  target_dist: 5.0
  potential: true
max_steps: 200
"#;
        let config = TaskConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.posture.shaping.orientation_version, ShapingVersion::V0);
        assert_eq!(config.posture.shaping.range_version, ShapingVersion::V1);
        assert!((config.posture.shaping.target_dist - 5.0).abs() < 1e-12);
        assert!(config.posture.options.potential);
        assert_eq!(config.max_steps, 200);
        assert_eq!(config.altitude, AltitudeRewardConfig::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let yaml = "some_future_option: 12\nposture:\n  unrelated: true\n";
        let config = TaskConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.posture, PostureRewardConfig::default());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let yaml = "posture:\n  orientation_version: v3\n";
        let err = TaskConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)), "got {err:?}");
    }

    #[test]
    fn test_agent_count_rejected() {
        let err = TaskConfig::from_yaml_str("num_agents: 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::AgentCount(4)));
    }

    #[test]
    fn test_invalid_target_dist_rejected() {
        let err = TaskConfig::from_yaml_str("posture:\n  target_dist: -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "target_dist", .. }));
    }

    #[test]
    fn test_from_tags() {
        let config = RewardConfig::from_tags("v1", "v0", 2.0).unwrap();
        assert_eq!(config.orientation_version, ShapingVersion::V1);
        assert_eq!(config.range_version, ShapingVersion::V0);

        let err = RewardConfig::from_tags("v9", "v0", 2.0).unwrap_err();
        match err {
            ConfigError::UnknownVersion { family, tag } => {
                assert_eq!(family, "orientation");
                assert_eq!(tag, "v9");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(RewardConfig::from_tags("v2", "latest", 2.0).is_err());
    }

    #[test]
    fn test_version_from_str_and_display() {
        for v in ShapingVersion::ALL {
            assert_eq!(v.to_string().parse::<ShapingVersion>().unwrap(), v);
        }
        assert!("V2".parse::<ShapingVersion>().is_err());
    }

    #[test]
    fn test_origin_projection_roundtrip() {
        let origin = GeoOrigin::default();
        let (north, east) = origin.to_local_m(origin.longitude_deg, origin.latitude_deg);
        assert!(north.abs() < 1e-9 && east.abs() < 1e-9);

        let (lon, lat) = origin.from_local_m(12_000.0, -4_000.0);
        let (north, east) = origin.to_local_m(lon, lat);
        assert!((north - 12_000.0).abs() < 1e-6);
        assert!((east + 4_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_latitude_is_about_111_km() {
        let origin = GeoOrigin::default();
        let (north, _) = origin.to_local_m(origin.longitude_deg, origin.latitude_deg + 1.0);
        assert!((north - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "posture:\n  range_version: v0").unwrap();
        let config = TaskConfig::load(file.path()).unwrap();
        assert_eq!(config.posture.shaping.range_version, ShapingVersion::V0);

        let missing = TaskConfig::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
