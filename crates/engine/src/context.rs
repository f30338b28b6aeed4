use liftlog_domain::{ExecutionState, SetProgressionData};
use serde::Serialize;

use crate::{RestTimer, State};

/// Data carried alongside the controller state.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ControllerContext {
    pub execution_state: Option<ExecutionState>,
    /// Message of the last strategy failure, cleared on re-initialization.
    pub error: Option<String>,
    /// Sets accepted by the strategy, in order.
    pub completed_sets: Vec<SetProgressionData>,
    pub timer: RestTimer,
}

/// What observers receive after every transition and timer update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: State,
    pub context: ControllerContext,
}
