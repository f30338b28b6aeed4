use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Idle,
    Initializing,
    Ready,
    /// A completed set is being validated and applied by the strategy.
    Progressing,
    Resting(Rest),
    Completed,
    Error,
}

impl State {
    #[must_use]
    pub fn is_resting(self) -> bool {
        matches!(self, State::Resting(_))
    }

    /// Waiting for a strategy call to settle.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, State::Initializing | State::Progressing)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => write!(f, "idle"),
            State::Initializing => write!(f, "initializing"),
            State::Ready => write!(f, "ready"),
            State::Progressing => write!(f, "progressing"),
            State::Resting(rest) => write!(f, "resting.{rest}"),
            State::Completed => write!(f, "completed"),
            State::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Rest {
    TimerReady,
    TimerRunning,
    TimerPaused,
}
