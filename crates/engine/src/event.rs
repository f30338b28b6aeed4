use std::fmt;

use liftlog_domain::{SetConfiguration, SetProgressionData, Weight};
use strum::{Display, EnumDiscriminants};

/// Input accepted by the controller.
///
/// Events that are not meaningful in the current state are ignored.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKind))]
#[strum_discriminants(derive(Display, Hash))]
#[strum_discriminants(strum(serialize_all = "SCREAMING_SNAKE_CASE"))]
pub enum Event {
    Initialize {
        configuration: SetConfiguration,
        last_weight: Option<Weight>,
    },
    CompleteSet(SetProgressionData),
    StartRestTimer,
    PauseTimer,
    ResumeTimer,
    SkipRest,
    TimerComplete,
    ResetSet,
    AbortSet,
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        EventKind::from(self)
    }
}

/// Cause of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Event(EventKind),
    Done(Call),
    Failed(Call),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Event(kind) => write!(f, "{kind}"),
            Trigger::Done(call) => write!(f, "done.{call}"),
            Trigger::Failed(call) => write!(f, "error.{call}"),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Call {
    Initialize,
    Progress,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Event::CompleteSet(SetProgressionData::new(None, 8, None)), "COMPLETE_SET")]
    #[case(Event::StartRestTimer, "START_REST_TIMER")]
    #[case(Event::TimerComplete, "TIMER_COMPLETE")]
    #[case(Event::AbortSet, "ABORT_SET")]
    fn test_event_kind_display(#[case] event: Event, #[case] expected: &str) {
        assert_eq!(event.kind().to_string(), expected);
    }

    #[rstest]
    #[case(Trigger::Event(EventKind::SkipRest), "SKIP_REST")]
    #[case(Trigger::Done(Call::Initialize), "done.initialize")]
    #[case(Trigger::Failed(Call::Progress), "error.progress")]
    fn test_trigger_display(#[case] trigger: Trigger, #[case] expected: &str) {
        assert_eq!(trigger.to_string(), expected);
    }
}
