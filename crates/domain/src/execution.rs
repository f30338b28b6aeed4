use derive_more::Deref;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{RPE, Reps, SetConfiguration, SetType, Volume, Weight};

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutionID(Uuid);

impl ExecutionID {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl From<Uuid> for ExecutionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExecutionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Snapshot of a single advanced set in progress.
///
/// Strategies never mutate a state. Every progression returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub id: ExecutionID,
    pub configuration: SetConfiguration,
    /// 1-based; exceeds `total_phases` once the last phase has been completed.
    pub current_phase: u32,
    pub total_phases: u32,
    pub is_completed: bool,
    /// Planned set before the first phase, afterwards the set most recently performed.
    pub current_set: SetData,
    /// Target of the current phase once a phase has been performed.
    pub next_set: Option<NextSetData>,
    /// `None` means no rest is required before the current phase.
    pub rest_period_seconds: Option<u32>,
    pub progress: ProtocolProgress,
}

impl ExecutionState {
    #[must_use]
    pub fn set_type(&self) -> SetType {
        self.progress.set_type()
    }

    /// What the user is asked to perform in the current phase.
    #[must_use]
    pub fn target(&self) -> NextSetData {
        self.next_set.unwrap_or(NextSetData {
            weight: self.current_set.weight,
            expected_counts: self.current_set.counts,
            suggested_rpe: self.current_set.rpe,
        })
    }

    #[must_use]
    pub fn remaining_phases(&self) -> u32 {
        if self.is_completed {
            0
        } else {
            self.total_phases.saturating_sub(self.current_phase) + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetData {
    pub weight: Weight,
    pub counts: Reps,
    pub rpe: Option<RPE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextSetData {
    pub weight: Weight,
    pub expected_counts: Reps,
    pub suggested_rpe: Option<RPE>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolProgress {
    DropSet {
        /// Number of load reductions applied so far.
        drops_completed: u32,
    },
    MyoReps {
        is_activation_phase: bool,
        mini_sets_completed: u32,
        activation_reps: Option<Reps>,
    },
    Mav {
        sets_completed: u32,
        total_volume_achieved: Volume,
        performance_decline: bool,
        first_set_counts: Option<Reps>,
        last_set_performance: Option<SetData>,
    },
}

impl ProtocolProgress {
    #[must_use]
    pub fn set_type(&self) -> SetType {
        match self {
            ProtocolProgress::DropSet { .. } => SetType::DropSet,
            ProtocolProgress::MyoReps { .. } => SetType::MyoReps,
            ProtocolProgress::Mav { .. } => SetType::Mav,
        }
    }
}

/// Input reported by the caller when a set has been performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetProgressionData {
    /// Weight actually lifted; the planned weight of the phase applies if absent.
    pub weight: Option<f32>,
    pub counts: u32,
    pub rpe: Option<f32>,
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SetProgressionData {
    #[must_use]
    pub fn new(weight: Option<f32>, counts: u32, rpe: Option<f32>) -> Self {
        Self {
            weight,
            counts,
            rpe,
            completed: true,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{MavConfiguration, Range};

    fn state(current_phase: u32, total_phases: u32, is_completed: bool) -> ExecutionState {
        ExecutionState {
            id: 1.into(),
            configuration: SetConfiguration::Mav(MavConfiguration {
                sets: Range::from_min(1),
                counts: Range::from_min(Reps::new(10).unwrap()),
                rpe: None,
            }),
            current_phase,
            total_phases,
            is_completed,
            current_set: SetData {
                weight: Weight::ZERO,
                counts: Reps::new(10).unwrap(),
                rpe: None,
            },
            next_set: None,
            rest_period_seconds: None,
            progress: ProtocolProgress::Mav {
                sets_completed: 0,
                total_volume_achieved: Volume::default(),
                performance_decline: false,
                first_set_counts: None,
                last_set_performance: None,
            },
        }
    }

    #[rstest]
    #[case(1, 3, false, 3)]
    #[case(3, 3, false, 1)]
    #[case(4, 3, true, 0)]
    #[case(2, 3, true, 0)]
    fn test_execution_state_remaining_phases(
        #[case] current_phase: u32,
        #[case] total_phases: u32,
        #[case] is_completed: bool,
        #[case] expected: u32,
    ) {
        assert_eq!(
            state(current_phase, total_phases, is_completed).remaining_phases(),
            expected
        );
    }

    #[test]
    fn test_execution_state_target() {
        let mut state = state(1, 3, false);
        assert_eq!(
            state.target(),
            NextSetData {
                weight: Weight::ZERO,
                expected_counts: Reps::new(10).unwrap(),
                suggested_rpe: None
            }
        );
        let next = NextSetData {
            weight: Weight::new(80.0).unwrap(),
            expected_counts: Reps::new(8).unwrap(),
            suggested_rpe: Some(RPE::NINE),
        };
        state.next_set = Some(next);
        assert_eq!(state.target(), next);
    }

    #[test]
    fn test_execution_state_set_type() {
        assert_eq!(state(1, 3, false).set_type(), SetType::Mav);
    }

    #[test]
    fn test_execution_id_from_u128() {
        assert_eq!(ExecutionID::from(0), ExecutionID::nil());
        assert_ne!(ExecutionID::new(), ExecutionID::new());
    }

    #[test]
    fn test_set_progression_data_from_json() {
        assert_eq!(
            serde_json::from_str::<SetProgressionData>(
                r#"{ "weight": 100.0, "counts": 8, "rpe": 8.0, "completed": true }"#
            )
            .unwrap(),
            SetProgressionData::new(Some(100.0), 8, Some(8.0))
        );
    }
}
