use std::sync::Arc;

use liftlog_domain::{
    DropSetConfiguration, DropSetStrategy, Range, Reps, SetConfiguration, SetProgressionData,
    Weight,
};
use liftlog_engine::{
    AdvancedSetController, Event, State,
    log::{self, MemoryLog, Repository},
};
use ::log::{Level, LevelFilter};

#[tokio::test]
async fn test_transitions_and_advisories_are_logged() {
    let memory = Arc::new(MemoryLog::default());
    log::init(memory.clone(), LevelFilter::Debug).unwrap();

    let mut controller = AdvancedSetController::new(DropSetStrategy::default());
    controller.dispatch(Event::StartRestTimer);
    controller
        .send(Event::Initialize {
            configuration: SetConfiguration::DropSet(DropSetConfiguration {
                start_counts: Range::from_min(Reps::new(8).unwrap()),
                drops: Range::from_min(1),
                sets: Range::from_min(1),
                rpe: None,
            }),
            last_weight: Some(Weight::new(100.0).unwrap()),
        })
        .await;
    controller
        .send(Event::CompleteSet(SetProgressionData::new(
            Some(100.0),
            20,
            None,
        )))
        .await;
    assert_eq!(controller.state(), State::Resting(liftlog_engine::Rest::TimerReady));

    let entries = memory.read_entries().unwrap();
    let messages = |level: Level| {
        entries
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(
        messages(Level::Debug),
        vec![String::from("ignoring START_REST_TIMER in state idle")]
    );
    let transitions = messages(Level::Info);
    assert_eq!(transitions.len(), 4);
    assert!(transitions[0].starts_with("idle -> initializing on INITIALIZE"));
    assert!(transitions[3].starts_with("progressing -> resting.timer_ready on done.progress"));
    assert_eq!(messages(Level::Warn).len(), 1);
}
