use crate::{
    Advisory, ExecutionID, ExecutionState, ExecutionStrategy, MavConfiguration, MavSettings,
    NextSetData, ProtocolProgress, RPE, Reps, SetConfiguration, SetData, SetProgressionData,
    SetType, StrategyError, Volume, Weight,
    strategy::{ensure_in_progress, ensure_set_type, rest_period},
    validation::{log_advisories, validate_set},
};

/// Consecutive sets at a fixed load until performance declines or a limit is reached.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MavStrategy {
    settings: MavSettings,
}

impl MavStrategy {
    #[must_use]
    pub fn new(settings: MavSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn set_ceiling(&self, config: &MavConfiguration) -> u32 {
        config.sets.max.unwrap_or(self.settings.safety_set_ceiling)
    }

    /// Whether `counts` fell below the decline threshold relative to the first set.
    #[must_use]
    pub fn is_declined(&self, first_set_counts: Reps, counts: Reps) -> bool {
        f32::from(counts) < f32::from(first_set_counts) * self.settings.decline_threshold
    }

    /// Rest after `sets_completed` sets, the last one reported with `rpe`.
    #[must_use]
    pub fn rest_after(&self, sets_completed: u32, rpe: Option<RPE>) -> u32 {
        if sets_completed == 0 {
            return 0;
        }
        let fatigue = self
            .settings
            .rest_per_set_seconds
            .saturating_mul(sets_completed);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss
        )]
        let effort = rpe.map_or(0, |rpe| {
            (rpe.points_above(RPE::SEVEN) * self.settings.rest_per_rpe_point_seconds as f32)
                .round() as u32
        });
        self.settings
            .base_rest_seconds
            .saturating_add(fatigue)
            .saturating_add(effort)
            .clamp(
                self.settings.base_rest_seconds,
                self.settings.maximum_rest_seconds,
            )
    }

    pub fn initialize(
        &self,
        configuration: &SetConfiguration,
        last_known_weight: Option<Weight>,
    ) -> Result<ExecutionState, StrategyError> {
        let config = Self::configuration(configuration)?;
        configuration.validate()?;
        let total_phases = self.set_ceiling(config);

        Ok(ExecutionState {
            id: ExecutionID::new(),
            configuration: configuration.clone(),
            current_phase: 1,
            total_phases,
            is_completed: total_phases == 0,
            current_set: SetData {
                weight: last_known_weight.unwrap_or_default(),
                counts: config.counts.min,
                rpe: config.rpe.map(|rpe| rpe.min),
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
        })
    }

    pub fn progress(
        &self,
        state: &ExecutionState,
        completed_set: &SetProgressionData,
    ) -> Result<ExecutionState, StrategyError> {
        ensure_in_progress(SetType::Mav, state)?;
        let config = Self::configuration(&state.configuration)?;
        let (sets_completed, total_volume_achieved, first_set_counts) = match state.progress {
            ProtocolProgress::Mav {
                sets_completed,
                total_volume_achieved,
                first_set_counts,
                ..
            } => (sets_completed, total_volume_achieved, first_set_counts),
            _ => {
                return Err(StrategyError::ConfigurationMismatch {
                    expected: SetType::Mav,
                    actual: state.set_type(),
                });
            }
        };
        let performed = validate_set(completed_set, state.target().weight)?;

        let sets_completed = sets_completed + 1;
        let total_volume_achieved = total_volume_achieved + performed.weight * performed.counts;
        let first_set_counts = first_set_counts.unwrap_or(performed.counts);
        let performance_decline = self.is_declined(first_set_counts, performed.counts);
        let reached_failure = performed.rpe.is_some_and(|rpe| rpe >= RPE::TEN);

        let current_phase = state.current_phase + 1;
        let is_completed =
            performance_decline || reached_failure || current_phase > state.total_phases;
        let progress = ProtocolProgress::Mav {
            sets_completed,
            total_volume_achieved,
            performance_decline,
            first_set_counts: Some(first_set_counts),
            last_set_performance: Some(performed),
        };

        if is_completed {
            return Ok(ExecutionState {
                current_phase,
                is_completed: true,
                current_set: performed,
                next_set: None,
                rest_period_seconds: None,
                progress,
                ..state.clone()
            });
        }

        Ok(ExecutionState {
            current_phase,
            is_completed: false,
            current_set: performed,
            next_set: Some(NextSetData {
                weight: performed.weight,
                expected_counts: first_set_counts,
                suggested_rpe: config.rpe.and_then(|rpe| rpe.max),
            }),
            rest_period_seconds: rest_period(self.rest_after(sets_completed, performed.rpe)),
            progress,
            ..state.clone()
        })
    }

    #[must_use]
    pub fn advisories(&self, state: &ExecutionState, performed: &SetData) -> Vec<Advisory> {
        let mut advisories = vec![];
        let expected = state.target().expected_counts;
        if f32::from(performed.counts) < f32::from(expected) * self.settings.far_below_target_ratio
        {
            advisories.push(Advisory::FarBelowTarget {
                counts: performed.counts,
                expected,
            });
        }
        if let Some(rpe) = performed
            .rpe
            .filter(|rpe| *rpe >= self.settings.near_maximal_rpe)
        {
            advisories.push(Advisory::NearMaximalEffort { rpe });
        }
        advisories
    }

    #[must_use]
    pub fn rest_before(&self, state: &ExecutionState) -> u32 {
        match state.progress {
            ProtocolProgress::Mav {
                sets_completed,
                last_set_performance,
                ..
            } if !state.is_completed => {
                self.rest_after(sets_completed, last_set_performance.and_then(|set| set.rpe))
            }
            _ => 0,
        }
    }

    fn configuration(configuration: &SetConfiguration) -> Result<&MavConfiguration, StrategyError> {
        match configuration {
            SetConfiguration::Mav(config) => Ok(config),
            other => Err(StrategyError::ConfigurationMismatch {
                expected: SetType::Mav,
                actual: other.set_type(),
            }),
        }
    }
}

impl ExecutionStrategy for MavStrategy {
    fn set_type(&self) -> SetType {
        SetType::Mav
    }

    async fn initialize_execution(
        &self,
        configuration: &SetConfiguration,
        last_known_weight: Option<Weight>,
    ) -> Result<ExecutionState, StrategyError> {
        self.initialize(configuration, last_known_weight)
    }

    async fn progress_to_next_phase(
        &self,
        state: &ExecutionState,
        completed_set: &SetProgressionData,
    ) -> Result<ExecutionState, StrategyError> {
        self.progress(state, completed_set)
    }

    async fn validate_phase_completion(
        &self,
        state: &ExecutionState,
        proposed: &SetProgressionData,
    ) -> Result<bool, StrategyError> {
        ensure_in_progress(SetType::Mav, state)?;
        if !proposed.completed {
            return Ok(false);
        }
        let performed = validate_set(proposed, state.target().weight)?;
        log_advisories(state, &self.advisories(state, &performed));
        Ok(true)
    }

    async fn get_suggested_rest_period(
        &self,
        state: &ExecutionState,
    ) -> Result<u32, StrategyError> {
        ensure_set_type(SetType::Mav, state.set_type())?;
        Ok(self.rest_before(state))
    }
}
