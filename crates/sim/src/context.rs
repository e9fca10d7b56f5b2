use std::collections::BTreeMap;

use aircombat_shared::*;
use serde::{Deserialize, Serialize};

use crate::geometry::KinematicFeature;

/// Everything a reward term or termination condition may look at for one step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub states: &'a [AircraftState; NUM_AGENTS],
    pub origin: GeoOrigin,
    pub current_step: u32,
    pub step_duration_s: f64,
}

impl<'a> StepContext<'a> {
    pub fn sim_time_s(&self) -> f64 {
        self.current_step as f64 * self.step_duration_s
    }

    /// Raw readings of `agent` and of its opponent.
    ///
    /// Panics if `agent` is not 0 or 1.
    pub fn ego_enemy(&self, agent: usize) -> (&'a AircraftState, &'a AircraftState) {
        (&self.states[agent], &self.states[opponent(agent)])
    }

    pub fn feature(&self, agent: usize) -> KinematicFeature {
        KinematicFeature::from_state(&self.states[agent], &self.origin)
    }
}

pub fn opponent(agent: usize) -> usize {
    (agent + 1) % NUM_AGENTS
}

/// Named per-step values reported alongside rewards and terminations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub values: BTreeMap<String, f64>,
    pub end_reasons: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn push_reason(&mut self, reason: String) {
        self.end_reasons.push(reason);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.end_reasons.clear();
    }
}
