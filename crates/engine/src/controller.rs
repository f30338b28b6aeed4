use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use liftlog_domain::{
    ExecutionState, ExecutionStrategy, SetConfiguration, SetProgressionData, StrategyError, Weight,
};
use log::{debug, error, info};

use crate::{
    Call, ControllerContext, Diagnostics, Event, Rest, RestTimer, Snapshot, State, Transition,
    Trigger,
};

type Observer = Box<dyn FnMut(&Snapshot)>;

/// Drives one advanced set from initialization to completion.
///
/// Strategy calls are not awaited inside [`dispatch`](Self::dispatch). The returned
/// [`PendingCall`] is executed by the caller and its [`Settlement`] handed back to
/// [`settle`](Self::settle). Settlements issued before a reset or abort are discarded.
pub struct AdvancedSetController<S> {
    strategy: Arc<S>,
    state: State,
    context: ControllerContext,
    generation: u64,
    transitions: Vec<Transition>,
    observers: Vec<Observer>,
}

impl<S: ExecutionStrategy> AdvancedSetController<S> {
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self::with_strategy(Arc::new(strategy))
    }

    #[must_use]
    pub fn with_strategy(strategy: Arc<S>) -> Self {
        Self {
            strategy,
            state: State::Idle,
            context: ControllerContext::default(),
            generation: 0,
            transitions: vec![],
            observers: vec![],
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &Arc<S> {
        &self.strategy
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn context(&self) -> &ControllerContext {
        &self.context
    }

    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            context: self.context.clone(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Processes an event and runs the resulting strategy call to completion.
    pub async fn send(&mut self, event: Event) {
        if let Some(call) = self.dispatch(event) {
            let strategy = Arc::clone(&self.strategy);
            let settlement = call.execute(strategy.as_ref()).await;
            self.settle(settlement);
        }
    }

    pub fn dispatch(&mut self, event: Event) -> Option<PendingCall> {
        self.dispatch_at(event, Utc::now())
    }

    pub fn dispatch_at(&mut self, event: Event, now: DateTime<Utc>) -> Option<PendingCall> {
        let kind = event.kind();
        let trigger = Trigger::Event(kind);

        match (self.state, event) {
            (
                State::Idle | State::Completed | State::Error,
                Event::Initialize {
                    configuration,
                    last_weight,
                },
            ) => {
                self.context = ControllerContext::default();
                self.generation += 1;
                self.transition(State::Initializing, trigger);
                return Some(PendingCall {
                    generation: self.generation,
                    request: Request::Initialize {
                        configuration,
                        last_weight,
                    },
                });
            }
            (State::Ready, Event::CompleteSet(set)) => {
                let Some(execution_state) = self.context.execution_state.clone() else {
                    self.fail(trigger, "no execution in progress".to_string());
                    return None;
                };
                self.generation += 1;
                self.transition(State::Progressing, trigger);
                return Some(PendingCall {
                    generation: self.generation,
                    request: Request::Progress {
                        state: execution_state,
                        set,
                    },
                });
            }
            (State::Resting(Rest::TimerReady), Event::StartRestTimer) => {
                self.context.timer.start(now);
                self.transition(State::Resting(Rest::TimerRunning), trigger);
            }
            (State::Resting(Rest::TimerRunning), Event::PauseTimer) => {
                self.context.timer.pause(now);
                self.transition(State::Resting(Rest::TimerPaused), trigger);
            }
            (State::Resting(Rest::TimerPaused), Event::ResumeTimer) => {
                self.context.timer.resume(now);
                self.transition(State::Resting(Rest::TimerRunning), trigger);
            }
            (State::Resting(_), Event::SkipRest)
            | (State::Resting(Rest::TimerRunning), Event::TimerComplete) => {
                self.context.timer.stop();
                self.transition(State::Ready, trigger);
            }
            (State::Idle, Event::ResetSet | Event::AbortSet) => {
                debug!("nothing to {kind} in state {}", self.state);
            }
            (_, Event::ResetSet | Event::AbortSet) => {
                let diagnostics = self.diagnostics();
                self.generation += 1;
                self.context = ControllerContext::default();
                self.record(State::Idle, trigger, diagnostics);
            }
            (state, _) => {
                debug!("ignoring {kind} in state {state}");
            }
        }

        None
    }

    /// Applies the outcome of a strategy call.
    pub fn settle(&mut self, settlement: Settlement) {
        if settlement.generation != self.generation {
            debug!(
                "discarding stale settlement of generation {} (current {})",
                settlement.generation, self.generation
            );
            return;
        }

        match (self.state, settlement.outcome) {
            (State::Initializing, Outcome::Initialized(Ok(execution_state))) => {
                let to = if execution_state.is_completed {
                    State::Completed
                } else {
                    State::Ready
                };
                self.context.execution_state = Some(execution_state);
                self.transition(to, Trigger::Done(Call::Initialize));
            }
            (State::Initializing, Outcome::Initialized(Err(err))) => {
                self.fail(Trigger::Failed(Call::Initialize), err.to_string());
            }
            (
                State::Progressing,
                Outcome::Progressed {
                    set,
                    result:
                        Ok(Progression::Advanced {
                            state: execution_state,
                            rest_seconds,
                        }),
                },
            ) => {
                let to = if execution_state.is_completed {
                    State::Completed
                } else if rest_seconds > 0 {
                    self.context.timer = RestTimer::new(rest_seconds);
                    State::Resting(Rest::TimerReady)
                } else {
                    State::Ready
                };
                self.context.completed_sets.push(set);
                self.context.execution_state = Some(execution_state);
                self.transition(to, Trigger::Done(Call::Progress));
            }
            (
                State::Progressing,
                Outcome::Progressed {
                    result: Ok(Progression::Declined),
                    ..
                },
            ) => {
                self.transition(State::Ready, Trigger::Done(Call::Progress));
            }
            (State::Progressing, Outcome::Progressed { result: Err(err), .. }) => {
                self.fail(Trigger::Failed(Call::Progress), err.to_string());
            }
            (state, _) => {
                debug!("discarding settlement in state {state}");
            }
        }
    }

    /// Advances a running rest timer and completes the rest once it reaches zero.
    pub fn tick(&mut self) {
        self.tick_at(Utc::now());
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) {
        if self.state != State::Resting(Rest::TimerRunning) {
            return;
        }
        self.context.timer.update(now);
        if self.context.timer.is_finished() {
            self.dispatch_at(Event::TimerComplete, now);
        } else {
            self.notify();
        }
    }

    fn fail(&mut self, trigger: Trigger, message: String) {
        error!("{message}");
        self.context.error = Some(message);
        self.transition(State::Error, trigger);
    }

    fn diagnostics(&self) -> Option<Diagnostics> {
        self.context
            .execution_state
            .as_ref()
            .map(Diagnostics::from)
    }

    fn transition(&mut self, to: State, trigger: Trigger) {
        let diagnostics = self.diagnostics();
        self.record(to, trigger, diagnostics);
    }

    fn record(&mut self, to: State, trigger: Trigger, diagnostics: Option<Diagnostics>) {
        let transition = Transition {
            from: self.state,
            to,
            trigger,
            diagnostics,
        };
        info!("{transition}");
        self.state = to;
        self.transitions.push(transition);
        self.notify();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

/// Strategy call requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    generation: u64,
    request: Request,
}

#[derive(Debug, Clone, PartialEq)]
enum Request {
    Initialize {
        configuration: SetConfiguration,
        last_weight: Option<Weight>,
    },
    Progress {
        state: ExecutionState,
        set: SetProgressionData,
    },
}

impl PendingCall {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs the call against the strategy. A panicking strategy settles as an infrastructure error.
    pub async fn execute<S: ExecutionStrategy>(self, strategy: &S) -> Settlement {
        let outcome = match self.request {
            Request::Initialize {
                configuration,
                last_weight,
            } => Outcome::Initialized(
                guard(strategy.initialize_execution(&configuration, last_weight)).await,
            ),
            Request::Progress { state, set } => {
                let result = guard(progress(strategy, &state, &set)).await;
                Outcome::Progressed { set, result }
            }
        };
        Settlement {
            generation: self.generation,
            outcome,
        }
    }
}

/// Result of a [`PendingCall`].
#[derive(Debug)]
pub struct Settlement {
    generation: u64,
    outcome: Outcome,
}

impl Settlement {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
enum Outcome {
    Initialized(Result<ExecutionState, StrategyError>),
    Progressed {
        set: SetProgressionData,
        result: Result<Progression, StrategyError>,
    },
}

#[derive(Debug)]
enum Progression {
    Advanced {
        state: ExecutionState,
        rest_seconds: u32,
    },
    /// The set was not flagged as completed.
    Declined,
}

async fn progress<S: ExecutionStrategy>(
    strategy: &S,
    state: &ExecutionState,
    set: &SetProgressionData,
) -> Result<Progression, StrategyError> {
    if !strategy.validate_phase_completion(state, set).await? {
        return Ok(Progression::Declined);
    }
    let state = strategy.progress_to_next_phase(state, set).await?;
    let rest_seconds = if state.is_completed {
        0
    } else {
        strategy.get_suggested_rest_period(&state).await?
    };
    Ok(Progression::Advanced {
        state,
        rest_seconds,
    })
}

async fn guard<T>(
    future: impl Future<Output = Result<T, StrategyError>>,
) -> Result<T, StrategyError> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(StrategyError::Infrastructure(panic_message(&*panic).into())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("strategy panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("strategy panicked: {message}")
    } else {
        "strategy panicked".to_string()
    }
}
