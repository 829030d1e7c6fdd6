use super::*;
use crate::action::{Action, MediaInfo, MediaKind};
use crate::presenter::{EngineEvent, EventQueue};

fn ctx<'a>(events: &'a EventQueue) -> PresenterContext<'a> {
    PresenterContext { now_ms: 0, events }
}

fn trigger_action(extra: &[u8]) -> Action {
    let mut action = Action::media(MediaKind::Event, MediaInfo::default());
    action.core.object_id = 3;
    action.core.extra = extra.to_vec();
    action
}

// ============================================================================
// Script extraction and dispatch
// ============================================================================

#[test]
fn test_posts_action_request_and_completes() {
    let events = EventQueue::new();
    let mut presenter = ActionControlPresenter::new();
    presenter.start_action(trigger_action(b"action:race/start")).unwrap();

    // idle -> ready -> starting (fires and jumps to done) -> idle
    presenter.tickle(&mut ctx(&events)).unwrap();
    presenter.tickle(&mut ctx(&events)).unwrap();
    assert_eq!(presenter.script(), Some("race/start"));

    presenter.tickle(&mut ctx(&events)).unwrap();
    assert_eq!(presenter.state(), TickleState::Done);

    presenter.tickle(&mut ctx(&events)).unwrap();
    assert_eq!(presenter.state(), TickleState::Idle);

    let drained = events.drain();
    assert_eq!(
        drained,
        vec![
            EngineEvent::ActionRequested { script: "race/start".to_string() },
            EngineEvent::ActionEnded { object_id: 3 },
        ]
    );
}

#[test]
fn test_missing_action_reference_completes_silently() {
    let events = EventQueue::new();
    let mut presenter = ActionControlPresenter::new();
    presenter.start_action(trigger_action(b"speed:fast")).unwrap();

    for _ in 0..4 {
        presenter.tickle(&mut ctx(&events)).unwrap();
    }

    assert_eq!(presenter.script(), None);
    let drained = events.drain();
    assert_eq!(drained, vec![EngineEvent::ActionEnded { object_id: 3 }]);
}
