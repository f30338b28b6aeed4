use std::fmt;

use liftlog_domain::{ExecutionID, ExecutionState, SetType};

use crate::{State, Trigger};

/// Journal entry written for every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: State,
    pub to: State,
    pub trigger: Trigger,
    pub diagnostics: Option<Diagnostics>,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} on {}", self.from, self.to, self.trigger)?;
        if let Some(diagnostics) = &self.diagnostics {
            write!(f, " ({diagnostics})")?;
        }
        Ok(())
    }
}

/// Identifies the execution a transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub execution_id: ExecutionID,
    pub set_type: SetType,
    pub current_phase: u32,
    pub total_phases: u32,
}

impl From<&ExecutionState> for Diagnostics {
    fn from(state: &ExecutionState) -> Self {
        Self {
            execution_id: state.id,
            set_type: state.set_type(),
            current_phase: state.current_phase,
            total_phases: state.total_phases,
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} phase {}/{}",
            self.set_type, *self.execution_id, self.current_phase, self.total_phases
        )
    }
}
