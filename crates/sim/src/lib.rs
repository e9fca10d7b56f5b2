pub mod action;
pub mod batch;
pub mod context;
pub mod geometry;
pub mod observation;
pub mod reward;
pub mod rollout;
pub mod scenario;
pub mod task;
pub mod termination;

pub use action::*;
pub use batch::*;
pub use context::*;
pub use geometry::{GeometryResult, KinematicFeature};
pub use observation::*;
pub use reward::{RewardBreakdown, RewardEngine, RewardTerm};
pub use rollout::*;
pub use task::*;
pub use termination::*;
