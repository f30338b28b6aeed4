use crate::{
    DropSetStrategy, ExecutionState, MavStrategy, MyoRepsStrategy, SetConfiguration,
    SetProgressionData, SetType, Settings, StrategyError, Weight,
};

/// Numeric decisions of one advanced-set protocol.
///
/// Implementations report every failure as an `Err` and must not panic.
#[allow(async_fn_in_trait)]
pub trait ExecutionStrategy {
    fn set_type(&self) -> SetType;

    async fn initialize_execution(
        &self,
        configuration: &SetConfiguration,
        last_known_weight: Option<Weight>,
    ) -> Result<ExecutionState, StrategyError>;

    /// Fails with [`StrategyError::AlreadyCompleted`] once the execution has finished.
    async fn progress_to_next_phase(
        &self,
        state: &ExecutionState,
        completed_set: &SetProgressionData,
    ) -> Result<ExecutionState, StrategyError>;

    /// `Ok(false)` if the proposed set is not flagged as completed.
    ///
    /// Protocol anomalies are logged as warnings and never fail.
    async fn validate_phase_completion(
        &self,
        state: &ExecutionState,
        proposed: &SetProgressionData,
    ) -> Result<bool, StrategyError>;

    /// Seconds of rest before the current phase, zero if none is needed.
    async fn get_suggested_rest_period(&self, state: &ExecutionState)
    -> Result<u32, StrategyError>;
}

/// One of the built-in strategies, selected by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    DropSet(DropSetStrategy),
    MyoReps(MyoRepsStrategy),
    Mav(MavStrategy),
}

impl Strategy {
    #[must_use]
    pub fn new(set_type: SetType, settings: &Settings) -> Self {
        match set_type {
            SetType::DropSet => Strategy::DropSet(DropSetStrategy::new(settings.drop_set)),
            SetType::MyoReps => Strategy::MyoReps(MyoRepsStrategy::new(settings.myo_reps)),
            SetType::Mav => Strategy::Mav(MavStrategy::new(settings.mav)),
        }
    }

    #[must_use]
    pub fn for_configuration(configuration: &SetConfiguration, settings: &Settings) -> Self {
        Strategy::new(configuration.set_type(), settings)
    }
}

impl ExecutionStrategy for Strategy {
    fn set_type(&self) -> SetType {
        match self {
            Strategy::DropSet(s) => s.set_type(),
            Strategy::MyoReps(s) => s.set_type(),
            Strategy::Mav(s) => s.set_type(),
        }
    }

    async fn initialize_execution(
        &self,
        configuration: &SetConfiguration,
        last_known_weight: Option<Weight>,
    ) -> Result<ExecutionState, StrategyError> {
        match self {
            Strategy::DropSet(s) => s.initialize_execution(configuration, last_known_weight).await,
            Strategy::MyoReps(s) => s.initialize_execution(configuration, last_known_weight).await,
            Strategy::Mav(s) => s.initialize_execution(configuration, last_known_weight).await,
        }
    }

    async fn progress_to_next_phase(
        &self,
        state: &ExecutionState,
        completed_set: &SetProgressionData,
    ) -> Result<ExecutionState, StrategyError> {
        match self {
            Strategy::DropSet(s) => s.progress_to_next_phase(state, completed_set).await,
            Strategy::MyoReps(s) => s.progress_to_next_phase(state, completed_set).await,
            Strategy::Mav(s) => s.progress_to_next_phase(state, completed_set).await,
        }
    }

    async fn validate_phase_completion(
        &self,
        state: &ExecutionState,
        proposed: &SetProgressionData,
    ) -> Result<bool, StrategyError> {
        match self {
            Strategy::DropSet(s) => s.validate_phase_completion(state, proposed).await,
            Strategy::MyoReps(s) => s.validate_phase_completion(state, proposed).await,
            Strategy::Mav(s) => s.validate_phase_completion(state, proposed).await,
        }
    }

    async fn get_suggested_rest_period(
        &self,
        state: &ExecutionState,
    ) -> Result<u32, StrategyError> {
        match self {
            Strategy::DropSet(s) => s.get_suggested_rest_period(state).await,
            Strategy::MyoReps(s) => s.get_suggested_rest_period(state).await,
            Strategy::Mav(s) => s.get_suggested_rest_period(state).await,
        }
    }
}

pub(crate) fn ensure_set_type(expected: SetType, actual: SetType) -> Result<(), StrategyError> {
    if expected != actual {
        return Err(StrategyError::ConfigurationMismatch { expected, actual });
    }
    Ok(())
}

/// Guards shared by every progression and validation.
pub(crate) fn ensure_in_progress(
    expected: SetType,
    state: &ExecutionState,
) -> Result<(), StrategyError> {
    ensure_set_type(expected, state.set_type())?;
    if state.is_completed {
        return Err(StrategyError::AlreadyCompleted);
    }
    Ok(())
}

pub(crate) fn rest_period(seconds: u32) -> Option<u32> {
    if seconds == 0 { None } else { Some(seconds) }
}
