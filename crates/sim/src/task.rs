use aircombat_shared::*;
use log::debug;

use crate::action::{ActionError, ActionMapper};
use crate::context::{Diagnostics, StepContext};
use crate::observation::ObservationNormalizer;
use crate::reward::{AltitudeReward, PostureReward, RelativeAltitudeReward, RewardTerm};
use crate::termination::{ExtremeState, LowAltitude, Overload, Termination, TerminationCondition, Timeout};

/// One-versus-one combat task.
///
/// Owns the reward terms and termination conditions for an episode and
/// sequences the per-step calls: rewards are summed across terms, `done` is
/// OR-ed across conditions.
pub struct SingleCombatTask {
    config: TaskConfig,
    normalizer: ObservationNormalizer,
    mapper: ActionMapper,
    reward_terms: Vec<Box<dyn RewardTerm>>,
    termination_conditions: Vec<Box<dyn TerminationCondition>>,
}

impl SingleCombatTask {
    pub fn new(config: TaskConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let reward_terms: Vec<Box<dyn RewardTerm>> = vec![
            Box::new(AltitudeReward::new(&config.altitude)),
            Box::new(PostureReward::new(&config.posture)?),
            Box::new(RelativeAltitudeReward::new(&config.relative_altitude)),
        ];
        let termination_conditions: Vec<Box<dyn TerminationCondition>> = vec![
            Box::new(ExtremeState::new(&config.extreme_state)),
            Box::new(Overload::new(&config.overload)),
            Box::new(LowAltitude::new(&config.low_altitude)),
            Box::new(Timeout::new(config.max_steps)),
        ];

        let task = Self {
            normalizer: ObservationNormalizer::new(config.origin),
            mapper: ActionMapper::default(),
            config,
            reward_terms,
            termination_conditions,
        };
        debug!(
            "single combat task: rewards={:?} terminations={:?}",
            task.reward_term_names(),
            task.termination_names()
        );
        Ok(task)
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn num_agents(&self) -> usize {
        NUM_AGENTS
    }

    pub fn observation_space(&self) -> [ObservationSpace; NUM_AGENTS] {
        [ObservationSpace::default(); NUM_AGENTS]
    }

    pub fn action_space(&self) -> [ActionSpace; NUM_AGENTS] {
        [self.mapper.action_space(); NUM_AGENTS]
    }

    pub fn reward_term_names(&self) -> Vec<&str> {
        self.reward_terms.iter().map(|t| t.name()).collect()
    }

    pub fn termination_names(&self) -> Vec<&str> {
        self.termination_conditions.iter().map(|c| c.name()).collect()
    }

    pub fn add_reward_term(&mut self, term: Box<dyn RewardTerm>) {
        self.reward_terms.push(term);
    }

    pub fn add_termination_condition(&mut self, condition: Box<dyn TerminationCondition>) {
        self.termination_conditions.push(condition);
    }

    pub fn normalizer(&self) -> &ObservationNormalizer {
        &self.normalizer
    }

    pub fn mapper(&self) -> &ActionMapper {
        &self.mapper
    }

    pub fn normalize_observation(&self, states: &[AircraftState; NUM_AGENTS]) -> [Observation; NUM_AGENTS] {
        self.normalizer.normalize(states)
    }

    pub fn normalize_action(
        &self,
        actions: &[[usize; ACTION_SIZE]; NUM_AGENTS],
    ) -> Result<[ControlCommand; NUM_AGENTS], ActionError> {
        Ok([self.mapper.denormalize(actions[0])?, self.mapper.denormalize(actions[1])?])
    }

    fn context<'a>(&self, states: &'a [AircraftState; NUM_AGENTS], current_step: u32) -> StepContext<'a> {
        StepContext {
            states,
            origin: self.config.origin,
            current_step,
            step_duration_s: self.config.step_duration_s,
        }
    }

    /// Start of episode. Call with the first observed states.
    pub fn reset(&mut self, states: &[AircraftState; NUM_AGENTS]) {
        let ctx = self.context(states, 0);
        for term in self.reward_terms.iter_mut() {
            for agent in 0..NUM_AGENTS {
                term.reset(&ctx, agent);
            }
        }
    }

    /// Sum of every reward term for `agent`. Panics if `agent` is not 0 or 1.
    pub fn get_reward(
        &mut self,
        states: &[AircraftState; NUM_AGENTS],
        current_step: u32,
        agent: usize,
        info: &mut Diagnostics,
    ) -> f64 {
        let ctx = self.context(states, current_step);
        self.reward_terms
            .iter_mut()
            .map(|term| term.get_reward(&ctx, agent, info))
            .sum()
    }

    pub fn get_termination(
        &self,
        states: &[AircraftState; NUM_AGENTS],
        current_step: u32,
        agent: usize,
        info: &mut Diagnostics,
    ) -> Termination {
        let ctx = self.context(states, current_step);
        for condition in &self.termination_conditions {
            let t = condition.get_termination(&ctx, agent, info);
            if t.done {
                return t;
            }
        }
        Termination::CONTINUE
    }
}
