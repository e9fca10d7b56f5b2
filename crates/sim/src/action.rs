use aircombat_shared::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{axis} index {index} out of range (levels: {levels})")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        levels: usize,
    },
}

/// One discretized control: `levels` evenly spaced values over `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlAxis {
    pub name: &'static str,
    pub levels: usize,
    pub low: f64,
    pub high: f64,
}

impl ControlAxis {
    pub const fn new(name: &'static str, levels: usize, low: f64, high: f64) -> Self {
        Self {
            name,
            levels,
            low,
            high,
        }
    }

    /// `index * (high - low) / (levels - 1) + low`
    pub fn value(&self, index: usize) -> Result<f64, ActionError> {
        if index >= self.levels {
            return Err(ActionError::IndexOutOfRange {
                axis: self.name,
                index,
                levels: self.levels,
            });
        }
        Ok(index as f64 * (self.high - self.low) / (self.levels - 1) as f64 + self.low)
    }

    /// Nearest grid index for a continuous value, clamped to the grid.
    pub fn index(&self, value: f64) -> usize {
        let t = (value - self.low) * (self.levels - 1) as f64 / (self.high - self.low);
        (t.round().max(0.0) as usize).min(self.levels - 1)
    }
}

pub const AILERON: ControlAxis = ControlAxis::new("aileron", STICK_LEVELS, STICK_MIN, STICK_MAX);
pub const ELEVATOR: ControlAxis = ControlAxis::new("elevator", STICK_LEVELS, STICK_MIN, STICK_MAX);
pub const RUDDER: ControlAxis = ControlAxis::new("rudder", STICK_LEVELS, STICK_MIN, STICK_MAX);
pub const THROTTLE: ControlAxis = ControlAxis::new("throttle", THROTTLE_LEVELS, THROTTLE_MIN, THROTTLE_MAX);

/// Maps multi-discrete policy output to simulator control commands.
///
/// Indices outside an axis' grid are rejected, never clamped.
#[derive(Debug, Clone, Copy)]
pub struct ActionMapper {
    axes: [ControlAxis; ACTION_SIZE],
}

impl Default for ActionMapper {
    fn default() -> Self {
        Self {
            axes: [AILERON, ELEVATOR, RUDDER, THROTTLE],
        }
    }
}

impl ActionMapper {
    pub fn axes(&self) -> &[ControlAxis; ACTION_SIZE] {
        &self.axes
    }

    pub fn nvec(&self) -> [usize; ACTION_SIZE] {
        [
            self.axes[0].levels,
            self.axes[1].levels,
            self.axes[2].levels,
            self.axes[3].levels,
        ]
    }

    pub fn action_space(&self) -> ActionSpace {
        ActionSpace { nvec: self.nvec() }
    }

    pub fn denormalize(&self, indices: [usize; ACTION_SIZE]) -> Result<ControlCommand, ActionError> {
        Ok(ControlCommand {
            aileron: self.axes[0].value(indices[0])?,
            elevator: self.axes[1].value(indices[1])?,
            rudder: self.axes[2].value(indices[2])?,
            throttle: self.axes[3].value(indices[3])?,
        })
    }

    /// Inverse of [`ActionMapper::denormalize`].
    pub fn quantize(&self, command: &ControlCommand) -> [usize; ACTION_SIZE] {
        let raw = command.to_raw();
        [
            self.axes[0].index(raw[0]),
            self.axes[1].index(raw[1]),
            self.axes[2].index(raw[2]),
            self.axes[3].index(raw[3]),
        ]
    }
}
