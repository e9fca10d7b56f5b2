//! Episode termination conditions.
//!
//! The task ORs `done` across conditions in order and stops at the first one
//! that fires.

use aircombat_shared::*;
use log::info;
use serde::{Deserialize, Serialize};

use crate::context::{Diagnostics, StepContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Termination {
    pub done: bool,
    /// Only meaningful when `done`.
    pub success: bool,
}

impl Termination {
    pub const CONTINUE: Termination = Termination {
        done: false,
        success: false,
    };

    pub fn failure() -> Self {
        Self {
            done: true,
            success: false,
        }
    }
}

pub trait TerminationCondition: Send {
    fn name(&self) -> &str;

    fn get_termination(&self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> Termination;
}

fn end(info: &mut Diagnostics, agent: usize, reason: String) {
    info!("agent {agent}: {reason}");
    info.push_reason(reason);
}

/// Non-finite readings or supersonic runaway.
pub struct ExtremeState {
    max_mach: f64,
}

impl ExtremeState {
    pub fn new(config: &ExtremeStateConfig) -> Self {
        Self {
            max_mach: config.max_mach,
        }
    }
}

impl TerminationCondition for ExtremeState {
    fn name(&self) -> &str {
        "extreme_state"
    }

    fn get_termination(&self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> Termination {
        let ego = &ctx.states[agent];
        if !ego.is_finite() {
            end(info, agent, "extreme state: non-finite simulator reading".into());
            return Termination::failure();
        }
        let mach = ego.speed_mach();
        if mach > self.max_mach {
            end(info, agent, format!("extreme state: speed {mach:.2} Mach"));
            return Termination::failure();
        }
        Termination::CONTINUE
    }
}

/// Load factor beyond the airframe limit on any axis.
pub struct Overload {
    limits: [f64; 3],
    warmup_s: f64,
}

impl Overload {
    pub fn new(config: &OverloadConfig) -> Self {
        Self {
            limits: [config.limit_x, config.limit_y, config.limit_z],
            warmup_s: config.warmup_s,
        }
    }
}

impl TerminationCondition for Overload {
    fn name(&self) -> &str {
        "overload"
    }

    fn get_termination(&self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> Termination {
        if ctx.sim_time_s() < self.warmup_s {
            return Termination::CONTINUE;
        }
        let accel = ctx.states[agent].acceleration_g().to_array();
        for (axis, (a, limit)) in ["x", "y", "z"].iter().zip(accel.iter().zip(self.limits.iter())) {
            if a.abs() > *limit {
                end(info, agent, format!("overload: {a:.1} G on {axis} axis"));
                return Termination::failure();
            }
        }
        Termination::CONTINUE
    }
}

pub struct LowAltitude {
    altitude_limit: f64,
}

impl LowAltitude {
    pub fn new(config: &LowAltitudeConfig) -> Self {
        Self {
            altitude_limit: config.altitude_limit,
        }
    }
}

impl TerminationCondition for LowAltitude {
    fn name(&self) -> &str {
        "low_altitude"
    }

    fn get_termination(&self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> Termination {
        let h = ctx.states[agent].altitude_km();
        if h <= self.altitude_limit {
            end(info, agent, format!("low altitude: {h:.2} km"));
            return Termination::failure();
        }
        Termination::CONTINUE
    }
}

/// Step budget exhausted. Not counted as a success.
pub struct Timeout {
    max_steps: u32,
}

impl Timeout {
    pub fn new(max_steps: u32) -> Self {
        Self { max_steps }
    }
}

impl TerminationCondition for Timeout {
    fn name(&self) -> &str {
        "timeout"
    }

    fn get_termination(&self, ctx: &StepContext<'_>, agent: usize, info: &mut Diagnostics) -> Termination {
        if ctx.current_step >= self.max_steps {
            end(info, agent, format!("timeout: {} steps", ctx.current_step));
            return Termination::failure();
        }
        Termination::CONTINUE
    }
}
