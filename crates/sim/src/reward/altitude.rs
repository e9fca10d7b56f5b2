use aircombat_shared::*;

use super::{RewardProcessor, RewardTerm};
use crate::context::{Diagnostics, StepContext};

/// Punishes descending below a safe altitude and flying below a danger altitude.
///
/// - `Pv = -clip(v_down / kv * (safe - h) / safe, 0, 1)` while `h <= safe`
/// - `Ph = clip(h / danger, 0, 1) - 2` while `h <= danger`
pub struct AltitudeReward {
    safe_altitude: f64,
    danger_altitude: f64,
    kv: f64,
    processor: RewardProcessor,
}

impl AltitudeReward {
    pub const NAME: &'static str = "altitude";

    pub fn new(config: &AltitudeRewardConfig) -> Self {
        Self {
            safe_altitude: config.safe_altitude,
            danger_altitude: config.danger_altitude,
            kv: config.kv,
            processor: RewardProcessor::new(config.options),
        }
    }

    /// Returns (Pv, Ph) for altitude `h` km and descent rate `v_down` Mach.
    pub fn components(&self, h: f64, v_down: f64) -> (f64, f64) {
        let mut pv = 0.0;
        if h <= self.safe_altitude {
            pv = -(v_down / self.kv * (self.safe_altitude - h) / self.safe_altitude).clamp(0.0, 1.0);
        }
        let mut ph = 0.0;
        if h <= self.danger_altitude {
            ph = (h / self.danger_altitude).clamp(0.0, 1.0) - 1.0 - 1.0;
        }
        (pv, ph)
    }

    fn raw(&self, ctx: &StepContext<'_>, agent: usize) -> (f64, f64) {
        let ego = &ctx.states[agent];
        self.components(ego.altitude_km(), ego.v_down_mach())
    }
}

impl RewardTerm for AltitudeReward {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reset(&mut self, ctx: &StepContext<'_>, agent: usize) {
        let (pv, ph) = self.raw(ctx, agent);
        self.processor.seed(agent, pv + ph);
    }

    fn get_reward(&mut self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> f64 {
        let (pv, ph) = self.raw(ctx, agent);
        let reward = self.processor.process(agent, pv + ph);
        info.record(Self::NAME, reward);
        info.record("altitude_pv", pv);
        info.record("altitude_ph", ph);
        reward
    }
}

/// Punishes altitude separation from the enemy beyond `kh` km:
/// `min(kh - |h_ego - h_enemy|, 0)`.
pub struct RelativeAltitudeReward {
    kh: f64,
    processor: RewardProcessor,
}

impl RelativeAltitudeReward {
    pub const NAME: &'static str = "relative_altitude";

    pub fn new(config: &RelativeAltitudeRewardConfig) -> Self {
        Self {
            kh: config.kh,
            processor: RewardProcessor::new(config.options),
        }
    }

    pub fn raw_reward(&self, ego_km: f64, enemy_km: f64) -> f64 {
        (self.kh - (ego_km - enemy_km).abs()).min(0.0)
    }

    fn raw(&self, ctx: &StepContext<'_>, agent: usize) -> f64 {
        let (ego, enemy) = ctx.ego_enemy(agent);
        self.raw_reward(ego.altitude_km(), enemy.altitude_km())
    }
}

impl RewardTerm for RelativeAltitudeReward {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reset(&mut self, ctx: &StepContext<'_>, agent: usize) {
        let raw = self.raw(ctx, agent);
        self.processor.seed(agent, raw);
    }

    fn get_reward(&mut self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> f64 {
        let raw = self.raw(ctx, agent);
        let reward = self.processor.process(agent, raw);
        info.record(Self::NAME, reward);
        reward
    }
}
