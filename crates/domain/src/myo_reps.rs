use crate::{
    Advisory, ExecutionID, ExecutionState, ExecutionStrategy, MyoRepsConfiguration,
    MyoRepsSettings, NextSetData, ProtocolProgress, Reps, SetConfiguration, SetData,
    SetProgressionData, SetType, StrategyError, ValidationError, Weight,
    strategy::{ensure_in_progress, ensure_set_type, rest_period},
    validation::{exceeds_twice, log_advisories, validate_set},
};

/// An activation set close to failure followed by short mini-sets at the same load.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MyoRepsStrategy {
    settings: MyoRepsSettings,
}

impl MyoRepsStrategy {
    #[must_use]
    pub fn new(settings: MyoRepsSettings) -> Self {
        Self { settings }
    }

    /// Reps of each mini-set derived from the reps of the activation set.
    #[must_use]
    pub fn mini_set_target(&self, config: &MyoRepsConfiguration, activation_reps: Reps) -> Reps {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let share =
            (f32::from(activation_reps) * self.settings.mini_set_fraction).ceil() as u32;
        let cap = config
            .mini_set_cap()
            .unwrap_or(self.settings.default_mini_set_cap);
        Reps::new(share)
            .unwrap_or_default()
            .max(self.settings.minimum_mini_set_reps)
            .min(cap)
    }

    /// Rest before the next mini-set, shrinking with every mini-set performed.
    #[must_use]
    pub fn mini_set_rest(&self, mini_sets_completed: u32) -> u32 {
        self.settings
            .base_rest_seconds
            .saturating_sub(
                self.settings
                    .rest_decrement_seconds
                    .saturating_mul(mini_sets_completed),
            )
            .max(self.settings.minimum_rest_seconds)
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
            total_phases: 1 + config.mini_sets.min,
            is_completed: false,
            current_set: SetData {
                weight: last_known_weight.unwrap_or_default(),
                counts: config.activation_counts.min,
                rpe: config.rpe.map(|rpe| rpe.min),
            },
            next_set: None,
            rest_period_seconds: None,
            progress: ProtocolProgress::MyoReps {
                is_activation_phase: true,
                mini_sets_completed: 0,
                activation_reps: None,
            },
        })
    }

    pub fn progress(
        &self,
        state: &ExecutionState,
        completed_set: &SetProgressionData,
    ) -> Result<ExecutionState, StrategyError> {
        ensure_in_progress(SetType::MyoReps, state)?;
        let config = Self::configuration(&state.configuration)?;
        let (is_activation_phase, mini_sets_completed, activation_reps) =
            Self::progress_of(state)?;
        let target = state.target();
        let performed = validate_set(completed_set, target.weight)?;

        let (mini_sets_completed, activation_reps, held_weight, suggested_rpe) =
            if is_activation_phase {
                (
                    0,
                    performed.counts,
                    performed.weight,
                    performed.rpe.or(config.rpe.map(|rpe| rpe.min)),
                )
            } else {
                (
                    mini_sets_completed + 1,
                    activation_reps.unwrap_or(performed.counts),
                    target.weight,
                    target.suggested_rpe.map(|rpe| rpe.saturating_add(1)),
                )
            };

        let current_phase = state.current_phase + 1;
        let progress = ProtocolProgress::MyoReps {
            is_activation_phase: false,
            mini_sets_completed,
            activation_reps: Some(activation_reps),
        };

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
                weight: held_weight,
                expected_counts: self.mini_set_target(config, activation_reps),
                suggested_rpe,
            }),
            rest_period_seconds: rest_period(self.mini_set_rest(mini_sets_completed)),
            progress,
            ..state.clone()
        })
    }

    #[must_use]
    pub fn advisories(&self, state: &ExecutionState, performed: &SetData) -> Vec<Advisory> {
        let mut advisories = vec![];
        if matches!(
            state.progress,
            ProtocolProgress::MyoReps {
                is_activation_phase: true,
                ..
            }
        ) {
            if let Some(rpe) = performed
                .rpe
                .filter(|rpe| *rpe < self.settings.activation_rpe_warning)
            {
                advisories.push(Advisory::LowActivationEffort { rpe });
            }
        } else {
            let expected = state.target().expected_counts;
            if exceeds_twice(performed.counts, expected) {
                advisories.push(Advisory::ExcessiveReps {
                    counts: performed.counts,
                    expected,
                });
            }
        }
        advisories
    }

    pub fn rest_before(&self, state: &ExecutionState) -> Result<u32, StrategyError> {
        let (is_activation_phase, mini_sets_completed, _) = Self::progress_of(state)?;
        if state.is_completed || is_activation_phase {
            return Ok(0);
        }
        Ok(self.mini_set_rest(mini_sets_completed))
    }

    fn configuration(
        configuration: &SetConfiguration,
    ) -> Result<&MyoRepsConfiguration, StrategyError> {
        match configuration {
            SetConfiguration::MyoReps(config) => Ok(config),
            other => Err(StrategyError::ConfigurationMismatch {
                expected: SetType::MyoReps,
                actual: other.set_type(),
            }),
        }
    }

    fn progress_of(state: &ExecutionState) -> Result<(bool, u32, Option<Reps>), StrategyError> {
        match state.progress {
            ProtocolProgress::MyoReps {
                is_activation_phase,
                mini_sets_completed,
                activation_reps,
            } => Ok((is_activation_phase, mini_sets_completed, activation_reps)),
            _ => Err(StrategyError::ConfigurationMismatch {
                expected: SetType::MyoReps,
                actual: state.set_type(),
            }),
        }
    }
}

impl ExecutionStrategy for MyoRepsStrategy {
    fn set_type(&self) -> SetType {
        SetType::MyoReps
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
        ensure_in_progress(SetType::MyoReps, state)?;
        if !proposed.completed {
            return Ok(false);
        }
        let config = Self::configuration(&state.configuration)?;
        let (is_activation_phase, _, _) = Self::progress_of(state)?;
        let performed = validate_set(proposed, state.target().weight)?;
        if is_activation_phase && performed.counts < config.minimum_activation_reps() {
            return Err(ValidationError::InsufficientActivationReps {
                actual: performed.counts,
                minimum: config.minimum_activation_reps(),
            }
            .into());
        }
        log_advisories(state, &self.advisories(state, &performed));
        Ok(true)
    }

    async fn get_suggested_rest_period(
        &self,
        state: &ExecutionState,
    ) -> Result<u32, StrategyError> {
        ensure_set_type(SetType::MyoReps, state.set_type())?;
        self.rest_before(state)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{RPE, Range};

    fn reps(value: u32) -> Reps {
        Reps::new(value).unwrap()
    }

    fn weight(value: f32) -> Weight {
        Weight::new(value).unwrap()
    }

    fn config(mini_set_cap: Option<u32>, mini_sets: u32) -> MyoRepsConfiguration {
        MyoRepsConfiguration {
            activation_counts: Range::between(reps(15), reps(20)),
            rpe: Some(Range::between(RPE::EIGHT, RPE::TEN)),
            mini_set_counts: mini_set_cap.map(|cap| Range::between(reps(1), reps(cap))),
            mini_sets: Range::between(mini_sets, 5),
        }
    }

    fn configuration(mini_set_cap: Option<u32>, mini_sets: u32) -> SetConfiguration {
        SetConfiguration::MyoReps(config(mini_set_cap, mini_sets))
    }

    fn progress(state: &ExecutionState) -> (bool, u32, Option<Reps>) {
        MyoRepsStrategy::progress_of(state).unwrap()
    }

    #[test]
    fn test_initialize() {
        let state = MyoRepsStrategy::default()
            .initialize(&configuration(None, 3), Some(weight(40.0)))
            .unwrap();
        assert_eq!(state.current_phase, 1);
        assert_eq!(state.total_phases, 4);
        assert!(!state.is_completed);
        assert_eq!(
            state.current_set,
            SetData {
                weight: weight(40.0),
                counts: reps(15),
                rpe: Some(RPE::EIGHT)
            }
        );
        assert_eq!(state.rest_period_seconds, None);
        assert_eq!(progress(&state), (true, 0, None));
    }

    #[rstest]
    #[case::minimum_applies(None, 10, 3)]
    #[case::quarter(None, 16, 4)]
    #[case::rounded_up(None, 17, 5)]
    #[case::default_cap(None, 30, 5)]
    #[case::configured_cap(Some(4), 30, 4)]
    #[case::cap_below_minimum(Some(2), 10, 2)]
    fn test_mini_set_target(
        #[case] cap: Option<u32>,
        #[case] activation_reps: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(
            MyoRepsStrategy::default().mini_set_target(&config(cap, 3), reps(activation_reps)),
            reps(expected)
        );
    }

    #[rstest]
    #[case(0, 20)]
    #[case(1, 18)]
    #[case(4, 12)]
    #[case(5, 10)]
    #[case(9, 10)]
    #[case(u32::MAX, 10)]
    fn test_mini_set_rest(#[case] mini_sets_completed: u32, #[case] expected: u32) {
        assert_eq!(
            MyoRepsStrategy::default().mini_set_rest(mini_sets_completed),
            expected
        );
    }

    #[test]
    fn test_progress_from_activation() {
        let strategy = MyoRepsStrategy::default();
        let state = strategy
            .initialize(&configuration(None, 3), Some(weight(40.0)))
            .unwrap();
        let state = strategy
            .progress(&state, &SetProgressionData::new(Some(40.0), 10, Some(9.0)))
            .unwrap();
        assert_eq!(state.current_phase, 2);
        assert!(!state.is_completed);
        assert_eq!(progress(&state), (false, 0, Some(reps(10))));
        assert_eq!(
            state.next_set,
            Some(NextSetData {
                weight: weight(40.0),
                expected_counts: reps(3),
                suggested_rpe: Some(RPE::NINE)
            })
        );
        assert_eq!(state.rest_period_seconds, Some(20));
    }

    #[test]
    fn test_progress_through_mini_sets() {
        let strategy = MyoRepsStrategy::default();
        let state = strategy
            .initialize(&configuration(None, 3), Some(weight(40.0)))
            .unwrap();
        let state = strategy
            .progress(&state, &SetProgressionData::new(Some(40.0), 18, Some(9.0)))
            .unwrap();
        assert_eq!(state.next_set.unwrap().expected_counts, reps(5));

        let state = strategy
            .progress(&state, &SetProgressionData::new(Some(42.5), 5, Some(9.0)))
            .unwrap();
        assert_eq!(state.current_phase, 3);
        assert_eq!(progress(&state), (false, 1, Some(reps(18))));
        let next = state.next_set.unwrap();
        assert_eq!(next.weight, weight(40.0));
        assert_eq!(next.expected_counts, reps(5));
        assert_eq!(next.suggested_rpe, Some(RPE::TEN));
        assert_eq!(state.rest_period_seconds, Some(18));

        let state = strategy
            .progress(&state, &SetProgressionData::new(None, 4, Some(10.0)))
            .unwrap();
        assert_eq!(state.current_phase, 4);
        assert_eq!(state.next_set.unwrap().suggested_rpe, Some(RPE::TEN));
        assert_eq!(state.rest_period_seconds, Some(16));

        let state = strategy
            .progress(&state, &SetProgressionData::new(None, 3, Some(10.0)))
            .unwrap();
        assert!(state.is_completed);
        assert_eq!(state.current_phase, 5);
        assert_eq!(progress(&state), (false, 3, Some(reps(18))));
        assert_eq!(state.rest_period_seconds, None);
        assert_eq!(state.next_set, None);

        assert!(matches!(
            strategy.progress(&state, &SetProgressionData::new(None, 3, None)),
            Err(StrategyError::AlreadyCompleted)
        ));
    }

    #[test]
    fn test_progress_suggested_rpe_from_configuration() {
        let strategy = MyoRepsStrategy::default();
        let state = strategy
            .initialize(&configuration(None, 3), Some(weight(40.0)))
            .unwrap();
        let state = strategy
            .progress(&state, &SetProgressionData::new(None, 15, None))
            .unwrap();
        assert_eq!(state.next_set.unwrap().suggested_rpe, Some(RPE::EIGHT));
    }

    #[tokio::test]
    async fn test_validate_phase_completion_activation_threshold() {
        let strategy = MyoRepsStrategy::default();
        let state = strategy
            .initialize(&configuration(None, 3), Some(weight(40.0)))
            .unwrap();
        assert!(matches!(
            strategy
                .validate_phase_completion(&state, &SetProgressionData::new(None, 10, Some(9.0)))
                .await,
            Err(StrategyError::Validation(
                ValidationError::InsufficientActivationReps { .. }
            ))
        ));
        assert!(
            strategy
                .validate_phase_completion(&state, &SetProgressionData::new(None, 15, Some(6.0)))
                .await
                .unwrap()
        );

        let state = strategy
            .progress(&state, &SetProgressionData::new(None, 16, Some(9.0)))
            .unwrap();
        assert!(
            strategy
                .validate_phase_completion(&state, &SetProgressionData::new(None, 2, Some(9.0)))
                .await
                .unwrap()
        );
        assert!(matches!(
            strategy
                .validate_phase_completion(&state, &SetProgressionData::new(None, 0, None))
                .await,
            Err(StrategyError::Validation(ValidationError::NonPositiveCounts))
        ));
    }

    #[test]
    fn test_advisories() {
        let strategy = MyoRepsStrategy::default();
        let state = strategy
            .initialize(&configuration(None, 3), Some(weight(40.0)))
            .unwrap();
        let performed = SetData {
            weight: weight(40.0),
            counts: reps(16),
            rpe: Some(RPE::SIX),
        };
        assert_eq!(
            strategy.advisories(&state, &performed),
            vec![Advisory::LowActivationEffort { rpe: RPE::SIX }]
        );

        let state = strategy.progress(&state, &SetProgressionData::new(None, 16, Some(9.0))).unwrap();
        let performed = SetData {
            weight: weight(40.0),
            counts: reps(9),
            rpe: Some(RPE::NINE),
        };
        assert_eq!(
            strategy.advisories(&state, &performed),
            vec![Advisory::ExcessiveReps {
                counts: reps(9),
                expected: reps(4)
            }]
        );
    }

    #[tokio::test]
    async fn test_get_suggested_rest_period() {
        let strategy = MyoRepsStrategy::default();
        let state = strategy
            .initialize(&configuration(None, 1), Some(weight(40.0)))
            .unwrap();
        assert_eq!(strategy.get_suggested_rest_period(&state).await.unwrap(), 0);
        let state = strategy
            .progress(&state, &SetProgressionData::new(None, 15, Some(9.0)))
            .unwrap();
        assert_eq!(strategy.get_suggested_rest_period(&state).await.unwrap(), 20);
        let state = strategy
            .progress(&state, &SetProgressionData::new(None, 4, Some(9.0)))
            .unwrap();
        assert!(state.is_completed);
        assert_eq!(strategy.get_suggested_rest_period(&state).await.unwrap(), 0);
    }
}
