//! Per-step reward terms.
//!
//! A task owns a list of terms and sums their outputs. Each term writes its
//! sub-components into the step's [`Diagnostics`].

pub mod altitude;
pub mod posture;

pub use altitude::{AltitudeReward, RelativeAltitudeReward};
pub use posture::{PostureReward, RewardBreakdown, RewardEngine};

use aircombat_shared::{TermOptions, NUM_AGENTS};

use crate::context::{Diagnostics, StepContext};

pub trait RewardTerm: Send {
    fn name(&self) -> &str;

    /// Called at the start of an episode, after the first observation.
    fn reset(&mut self, ctx: &StepContext<'_>, agent: usize);

    fn get_reward(&mut self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> f64;
}

/// Applies a term's scale and, in potential mode, turns the reward into its
/// change since the previous step.
#[derive(Debug, Clone)]
pub struct RewardProcessor {
    options: TermOptions,
    previous: [f64; NUM_AGENTS],
}

impl RewardProcessor {
    pub fn new(options: TermOptions) -> Self {
        Self {
            options,
            previous: [0.0; NUM_AGENTS],
        }
    }

    pub fn options(&self) -> &TermOptions {
        &self.options
    }

    /// Seed the potential baseline with the reward at episode start.
    pub fn seed(&mut self, agent: usize, raw: f64) {
        self.previous[agent] = raw * self.options.scale;
    }

    pub fn process(&mut self, agent: usize, raw: f64) -> f64 {
        let reward = raw * self.options.scale;
        if self.options.potential {
            let delta = reward - self.previous[agent];
            self.previous[agent] = reward;
            delta
        } else {
            reward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_scales() {
        let mut p = RewardProcessor::new(TermOptions {
            scale: 2.0,
            potential: false,
        });
        assert!((p.process(0, 0.75) - 1.5).abs() < 1e-12);
        assert!((p.process(0, 0.75) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_processor_potential_mode() {
        let mut p = RewardProcessor::new(TermOptions {
            scale: 1.0,
            potential: true,
        });
        p.seed(0, 1.0);
        p.seed(1, 0.2);
        assert!((p.process(0, 1.5) - 0.5).abs() < 1e-12);
        assert!((p.process(0, 1.25) + 0.25).abs() < 1e-12);
        // agents keep separate baselines
        assert!((p.process(1, 0.2)).abs() < 1e-12);
    }
}
