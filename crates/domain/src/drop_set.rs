use crate::{
    Advisory, DropSetConfiguration, DropSetSettings, ExecutionID, ExecutionState,
    ExecutionStrategy, NextSetData, ProtocolProgress, SetConfiguration, SetData,
    SetProgressionData, SetType, StrategyError, Weight,
    strategy::{ensure_in_progress, ensure_set_type, rest_period},
    validation::{exceeds_twice, log_advisories, validate_set},
};

/// A top set followed by a configured number of load reductions without meaningful rest.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DropSetStrategy {
    settings: DropSetSettings,
}

impl DropSetStrategy {
    #[must_use]
    pub fn new(settings: DropSetSettings) -> Self {
        Self { settings }
    }

    /// Target weight of the drop following a set lifted with `lifted`.
    #[must_use]
    pub fn drop_weight(&self, lifted: Weight) -> Weight {
        lifted
            .scale(self.settings.load_factor)
            .round_down_to(self.settings.weight_step)
            .at_least(self.settings.minimum_weight)
    }

    pub fn initialize(
        &self,
        configuration: &SetConfiguration,
        last_known_weight: Option<Weight>,
    ) -> Result<ExecutionState, StrategyError> {
        let config = Self::configuration(configuration)?;
        configuration.validate()?;

        Ok(ExecutionState {
            id: ExecutionID::new(),
            configuration: configuration.clone(),
            current_phase: 1,
            total_phases: 1 + config.drop_count(),
            is_completed: false,
            current_set: SetData {
                weight: last_known_weight.unwrap_or_default(),
                counts: config.start_counts.min,
                rpe: config.rpe.map(|rpe| rpe.min),
            },
            next_set: None,
            rest_period_seconds: None,
            progress: ProtocolProgress::DropSet { drops_completed: 0 },
        })
    }

    pub fn progress(
        &self,
        state: &ExecutionState,
        completed_set: &SetProgressionData,
    ) -> Result<ExecutionState, StrategyError> {
        ensure_in_progress(SetType::DropSet, state)?;
        let config = Self::configuration(&state.configuration)?;
        let performed = validate_set(completed_set, state.target().weight)?;

        let current_phase = state.current_phase + 1;
        let drops_completed = (current_phase - 1).min(config.drop_count());
        let progress = ProtocolProgress::DropSet { drops_completed };

        if current_phase > state.total_phases {
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
                weight: self.drop_weight(performed.weight),
                expected_counts: performed.counts,
                suggested_rpe: config.rpe.and_then(|rpe| rpe.max),
            }),
            rest_period_seconds: rest_period(self.settings.rest_seconds),
            progress,
            ..state.clone()
        })
    }

    #[must_use]
    pub fn advisories(&self, state: &ExecutionState, performed: &SetData) -> Vec<Advisory> {
        let expected = state.target().expected_counts;
        if exceeds_twice(performed.counts, expected) {
            vec![Advisory::ExcessiveReps {
                counts: performed.counts,
                expected,
            }]
        } else {
            vec![]
        }
    }

    #[must_use]
    pub fn rest_before(&self, state: &ExecutionState) -> u32 {
        if state.is_completed || state.current_phase <= 1 {
            0
        } else {
            self.settings.rest_seconds
        }
    }

    fn configuration(
        configuration: &SetConfiguration,
    ) -> Result<&DropSetConfiguration, StrategyError> {
        match configuration {
            SetConfiguration::DropSet(config) => Ok(config),
            other => Err(StrategyError::ConfigurationMismatch {
                expected: SetType::DropSet,
                actual: other.set_type(),
            }),
        }
    }
}

impl ExecutionStrategy for DropSetStrategy {
    fn set_type(&self) -> SetType {
        SetType::DropSet
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
        ensure_in_progress(SetType::DropSet, state)?;
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
        ensure_set_type(SetType::DropSet, state.set_type())?;
        Ok(self.rest_before(state))
    }
}
