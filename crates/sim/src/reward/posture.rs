use std::f64::consts::PI;

use aircombat_shared::*;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{RewardProcessor, RewardTerm};
use crate::context::{opponent, Diagnostics, StepContext};
use crate::geometry::{self, sign, GeometryResult, KinematicFeature};

/// Orientation shaping over (AO, TA), radians.
pub type OrientationFn = fn(f64, f64) -> f64;
/// Range shaping over (range, target_dist), km.
pub type RangeFn = fn(f64, f64) -> f64;

/// Output of one posture evaluation. `total = orientation * range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub total: f64,
    pub orientation: f64,
    pub range: f64,
}

/// Aspect contribution shared by every orientation version.
///
/// `arctanh(1 - 2*TA/PI) / 2PI`: positive while the enemy is flying away from
/// the ego (TA < PI/2), negative once it turns towards it. The argument is kept
/// off the +/-1 poles at TA = 0 and TA = PI.
fn aspect_term(ta: f64) -> f64 {
    let x = (2.0 * ta / PI).clamp(ASPECT_FLOOR, 2.0 - ASPECT_FLOOR);
    (1.0 - x).atanh() / (2.0 * PI)
}

fn orientation_v0(ao: f64, ta: f64) -> f64 {
    (1.0 - (9.0 * (ao - PI / 9.0)).tanh()) / 3.0 + 1.0 / 3.0 + aspect_term(ta).min(0.0) + 0.5
}

fn orientation_v1(ao: f64, ta: f64) -> f64 {
    (1.0 - (2.0 * (ao - PI / 2.0)).tanh()) / 2.0 * aspect_term(ta) + 0.5
}

fn orientation_v2(ao: f64, ta: f64) -> f64 {
    1.0 / (50.0 * ao / PI + 2.0) + 0.5 + aspect_term(ta).min(0.0) + 0.5
}

fn range_v0(r: f64, target_dist: f64) -> f64 {
    let d = r - target_dist;
    (-d * d * 0.004).exp() / (1.0 + (-(d + 2.0) * 2.0).exp())
}

fn range_v1(r: f64, target_dist: f64) -> f64 {
    let d = r - target_dist;
    let raw = 1.2 * (-d * 0.21).exp().min(1.0) / (1.0 + (-(d + 1.0) * 0.8).exp());
    raw.clamp(RANGE_CLIP_MIN, RANGE_CLIP_MAX)
}

fn range_v2(r: f64, target_dist: f64) -> f64 {
    range_v1(r, target_dist).max(sign(RANGE_SIGN_FLOOR_KM - r))
}

pub fn orientation_fn(version: ShapingVersion) -> OrientationFn {
    match version {
        ShapingVersion::V0 => orientation_v0,
        ShapingVersion::V1 => orientation_v1,
        ShapingVersion::V2 => orientation_v2,
    }
}

pub fn range_fn(version: ShapingVersion) -> RangeFn {
    match version {
        ShapingVersion::V0 => range_v0,
        ShapingVersion::V1 => range_v1,
        ShapingVersion::V2 => range_v2,
    }
}

/// Posture shaping: orientation x range.
///
/// The shaping functions are looked up once from the config's version tags;
/// evaluation is a pair of plain function calls.
#[derive(Debug, Clone, Copy)]
pub struct RewardEngine {
    config: RewardConfig,
    orientation: OrientationFn,
    range: RangeFn,
}

impl RewardEngine {
    pub fn new(config: RewardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "posture reward: orientation={} range={} target_dist={}km",
            config.orientation_version, config.range_version, config.target_dist
        );
        Ok(Self {
            config,
            orientation: orientation_fn(config.orientation_version),
            range: range_fn(config.range_version),
        })
    }

    /// Build from string version tags as found in external configuration.
    pub fn from_tags(orientation: &str, range: &str, target_dist: f64) -> Result<Self, ConfigError> {
        Self::new(RewardConfig::from_tags(orientation, range, target_dist)?)
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn orientation_reward(&self, ao: f64, ta: f64) -> f64 {
        (self.orientation)(ao, ta)
    }

    pub fn range_reward(&self, range: f64) -> f64 {
        (self.range)(range, self.config.target_dist)
    }

    pub fn evaluate(&self, geometry: &GeometryResult) -> RewardBreakdown {
        let orientation = self.orientation_reward(geometry.ao, geometry.ta);
        let range = self.range_reward(geometry.range);
        trace!(
            "posture: ao={:.4} ta={:.4} r={:.3} -> orn={:.4} range={:.4}",
            geometry.ao,
            geometry.ta,
            geometry.range,
            orientation,
            range
        );
        RewardBreakdown {
            total: orientation * range,
            orientation,
            range,
        }
    }

    pub fn evaluate_features(&self, ego: &KinematicFeature, enemy: &KinematicFeature) -> RewardBreakdown {
        self.evaluate(&geometry::compute(ego, enemy, false))
    }
}

/// Reward term wrapping [`RewardEngine`] for the task's reward list.
///
/// Encourages pointing at the enemy, punishes being pointed at, and keeps the
/// ego near the target distance.
pub struct PostureReward {
    engine: RewardEngine,
    processor: RewardProcessor,
}

impl PostureReward {
    pub const NAME: &'static str = "posture";

    pub fn new(config: &PostureRewardConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: RewardEngine::new(config.shaping)?,
            processor: RewardProcessor::new(config.options),
        })
    }

    pub fn engine(&self) -> &RewardEngine {
        &self.engine
    }

    fn breakdown(&self, ctx: &StepContext<'_>, agent: usize) -> RewardBreakdown {
        let ego = ctx.feature(agent);
        let enemy = ctx.feature(opponent(agent));
        self.engine.evaluate_features(&ego, &enemy)
    }
}

impl RewardTerm for PostureReward {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reset(&mut self, ctx: &StepContext<'_>, agent: usize) {
        let b = self.breakdown(ctx, agent);
        self.processor.seed(agent, b.total);
    }

    fn get_reward(&mut self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> f64 {
        let b = self.breakdown(ctx, agent);
        let reward = self.processor.process(agent, b.total);
        info.record(Self::NAME, reward);
        info.record("posture_orn", b.orientation);
        info.record("posture_range", b.range);
        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine(o: ShapingVersion, r: ShapingVersion) -> RewardEngine {
        RewardEngine::new(RewardConfig {
            orientation_version: o,
            range_version: r,
            target_dist: 3.0,
        })
        .unwrap()
    }

    #[test]
    fn test_orientation_v2_maximum() {
        let e = engine(ShapingVersion::V2, ShapingVersion::V2);
        assert!((e.orientation_reward(0.0, 0.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_orientation_reference_values() {
        let v0 = engine(ShapingVersion::V0, ShapingVersion::V2);
        let v1 = engine(ShapingVersion::V1, ShapingVersion::V2);
        let v2 = engine(ShapingVersion::V2, ShapingVersion::V2);
        assert!((v0.orientation_reward(0.0, 0.0) - 1.498757358740).abs() < 1e-9);
        assert!((v1.orientation_reward(0.0, 0.0) - 1.286621549250).abs() < 1e-9);
        assert!((v0.orientation_reward(PI / 2.0, PI / 2.0) - 0.833333333521).abs() < 1e-9);
        assert!((v1.orientation_reward(PI / 2.0, PI / 2.0) - 0.5).abs() < 1e-12);
        assert!((v2.orientation_reward(PI / 2.0, PI / 2.0) - 1.037037037037).abs() < 1e-9);
        assert!((v2.orientation_reward(PI, 0.75 * PI) - 0.931805981089).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_only_penalizes_in_v0_and_v2() {
        for version in [ShapingVersion::V0, ShapingVersion::V2] {
            let e = engine(version, ShapingVersion::V2);
            let away = e.orientation_reward(0.3, 0.0);
            let beam = e.orientation_reward(0.3, PI / 2.0);
            let facing = e.orientation_reward(0.3, 0.9 * PI);
            assert!((away - beam).abs() < 1e-12, "{version}: aspect must not add reward");
            assert!(facing < beam, "{version}: being pointed at must cost reward");
        }
    }

    #[test]
    fn test_orientation_finite_at_aspect_poles() {
        for version in ShapingVersion::ALL {
            let e = engine(version, ShapingVersion::V2);
            for ta in [0.0, PI] {
                for ao in [0.0, PI / 2.0, PI] {
                    assert!(e.orientation_reward(ao, ta).is_finite(), "{version} ao={ao} ta={ta}");
                }
            }
        }
    }

    #[test]
    fn test_orientation_decreases_with_angle_off() {
        for version in ShapingVersion::ALL {
            let e = engine(version, ShapingVersion::V2);
            let mut prev = f64::INFINITY;
            for i in 0..=20 {
                let ao = PI * i as f64 / 20.0;
                let v = e.orientation_reward(ao, 0.2);
                assert!(v <= prev + 1e-12, "{version} not monotone at ao={ao}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_range_v1_at_target_dist() {
        let e = engine(ShapingVersion::V2, ShapingVersion::V1);
        let expected = 1.2 / (1.0 + (-0.8f64).exp());
        assert!((e.range_reward(3.0) - expected).abs() < 1e-12);
        assert!((e.range_reward(3.0) - 0.827969377353).abs() < 1e-9);
    }

    #[test]
    fn test_range_reference_values() {
        let v0 = engine(ShapingVersion::V2, ShapingVersion::V0);
        let v2 = engine(ShapingVersion::V2, ShapingVersion::V2);
        assert!((v0.range_reward(3.0) - 0.982013790038).abs() < 1e-9);
        assert!((v0.range_reward(0.0) - 0.114987941683).abs() < 1e-9);
        assert!((v2.range_reward(3.0) - 1.0).abs() < 1e-12);
        assert!((v2.range_reward(7.0) - 0.508734824774).abs() < 1e-9);
        assert!((v2.range_reward(10.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_total_is_product() {
        let e = engine(ShapingVersion::V0, ShapingVersion::V0);
        let g = GeometryResult {
            ao: 0.4,
            ta: 2.0,
            range: 5.0,
            side: 0,
        };
        let b = e.evaluate(&g);
        assert!((b.total - b.orientation * b.range).abs() < 1e-12);
        assert!((b.orientation - e.orientation_reward(0.4, 2.0)).abs() < 1e-12);
        assert!((b.range - e.range_reward(5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_tag_fails() {
        assert!(matches!(
            RewardEngine::from_tags("v3", "v2", 3.0),
            Err(ConfigError::UnknownVersion { family: "orientation", .. })
        ));
        assert!(matches!(
            RewardEngine::from_tags("v2", "", 3.0),
            Err(ConfigError::UnknownVersion { family: "range", .. })
        ));
        assert!(RewardEngine::from_tags("v1", "v0", 3.0).is_ok());
    }

    #[test]
    fn test_bad_target_dist_fails() {
        let config = RewardConfig {
            target_dist: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(RewardEngine::new(config), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_target_dist_shifts_peak() {
        let near = RewardEngine::new(RewardConfig {
            range_version: ShapingVersion::V0,
            target_dist: 1.0,
            ..Default::default()
        })
        .unwrap();
        let far = RewardEngine::new(RewardConfig {
            range_version: ShapingVersion::V0,
            target_dist: 6.0,
            ..Default::default()
        })
        .unwrap();
        assert!(near.range_reward(1.5) > far.range_reward(1.5));
        assert!(far.range_reward(6.5) > near.range_reward(6.5));
    }

    proptest! {
        #[test]
        fn prop_range_v1_clipped(r in 0.0..200.0f64, d in 0.5..10.0f64) {
            let v = range_v1(r, d);
            prop_assert!((0.3..=1.0).contains(&v));
        }

        #[test]
        fn prop_range_v2_floor(r in 0.0..200.0f64, d in 0.5..10.0f64) {
            let v = range_v2(r, d);
            prop_assert!(v >= sign(7.0 - r));
            prop_assert!(v >= range_v1(r, d));
        }

        #[test]
        fn prop_orientation_finite(ao in 0.0..=PI, ta in 0.0..=PI) {
            for version in ShapingVersion::ALL {
                prop_assert!(orientation_fn(version)(ao, ta).is_finite());
            }
        }
    }
}
