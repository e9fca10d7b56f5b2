use aircombat_shared::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::context::Diagnostics;
use crate::task::SingleCombatTask;
use crate::termination::Termination;

/// Outcome of replaying a recorded trace through a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Frames evaluated after the reset frame.
    pub steps: u32,
    pub rewards: Vec<[f64; NUM_AGENTS]>,
    pub returns: [f64; NUM_AGENTS],
    pub terminations: [Termination; NUM_AGENTS],
    pub end_reasons: Vec<String>,
    /// Diagnostics of the last evaluated step, per agent.
    pub last_info: [Diagnostics; NUM_AGENTS],
}

impl EpisodeReport {
    pub fn done(&self) -> bool {
        self.terminations.iter().any(|t| t.done)
    }
}

/// Replay `trace` through `task`.
///
/// Frame 0 resets the task; frame `i` is evaluated as step `i`. Stops at the
/// first frame where either agent terminates.
pub fn rollout(task: &mut SingleCombatTask, trace: &[TraceFrame]) -> EpisodeReport {
    let mut report = EpisodeReport::default();
    let Some((first, rest)) = trace.split_first() else {
        warn!("rollout: empty trace");
        return report;
    };
    if rest.is_empty() {
        warn!("rollout: trace has a single frame, nothing to evaluate");
    }

    task.reset(&first.states);

    for (i, frame) in rest.iter().enumerate() {
        let step = (i + 1) as u32;
        let mut rewards = [0.0; NUM_AGENTS];
        for agent in 0..NUM_AGENTS {
            let info = &mut report.last_info[agent];
            info.clear();
            rewards[agent] = task.get_reward(&frame.states, step, agent, info);
            report.terminations[agent] = task.get_termination(&frame.states, step, agent, info);
            report.returns[agent] += rewards[agent];
            report.end_reasons.extend(info.end_reasons.iter().cloned());
        }
        report.rewards.push(rewards);
        report.steps = step;

        if report.done() {
            debug!("rollout: episode ended at step {step}");
            break;
        }
    }

    report
}
