//! End-to-end action pipeline tests: deserialise an SI action tree,
//! instantiate presenters through the factory, drive them from the
//! tickle manager, watch the events come out.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

use vista_3d_engine_media::action::{
    deserialize_action, serialize_action, Action, DeserializeContext, MediaInfo, MediaKind,
    VariableTable,
};
use vista_3d_engine_media::atom::AtomId;
use vista_3d_engine_media::presenter::{
    presenter_for_action, EngineEvent, EventQueue, Presenter, PresenterClient,
};
use vista_3d_engine_media::tickle::{TickleHandle, TickleManager};

fn media(object_id: u32, start: i32, duration: i32) -> Action {
    let mut action = Action::media(MediaKind::Sound, MediaInfo::default());
    action.core.object_id = object_id;
    action.core.start_time = start;
    action.core.duration = duration;
    action
}

fn run_pipeline(action: Action, passes: u32) -> Vec<EngineEvent> {
    let events = Arc::new(EventQueue::new());
    let mut presenter = presenter_for_action(&action).unwrap();
    presenter.arm();

    let client: TickleHandle = Arc::new(Mutex::new(PresenterClient::new(
        presenter,
        Arc::clone(&events),
    )));

    let mut manager = TickleManager::new();
    manager.register(client, 0);
    for now in 0..passes {
        manager.tickle(now);
    }
    events.drain()
}

// ============================================================================
// Serialised tree to events
// ============================================================================

#[test]
fn test_deserialized_serial_action_plays_in_order() {
    let mut tree = Action::serial(vec![media(1, 0, 2), media(2, 0, 2)]);
    tree.core.object_id = 100;
    tree.set_atom_id(AtomId::new("test.si"));

    let mut bytes = Vec::new();
    serialize_action(&tree, &mut bytes);

    let variables = VariableTable::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut ctx = DeserializeContext { variables: &variables, rng: &mut rng };
    let parsed = deserialize_action(&bytes, &mut ctx).unwrap();

    // Serial duration property: sum of (start + duration)
    assert_eq!(parsed.duration(), 4);

    let events = run_pipeline(parsed, 64);
    let order: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::ActionEnded { object_id } => Some(*object_id),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec![1, 2, 100], "children end in sequence, then the composite");
}

#[test]
fn test_select_pipeline_runs_single_choice() {
    let tree = Action::select(
        "door".to_string(),
        vec!["open".to_string(), "closed".to_string()],
        vec![media(10, 0, 1), media(20, 0, 1)],
    );

    let mut bytes = Vec::new();
    serialize_action(&tree, &mut bytes);

    let mut variables = VariableTable::new();
    variables.set("door", "closed");
    let mut rng = StdRng::seed_from_u64(1);
    let mut ctx = DeserializeContext { variables: &variables, rng: &mut rng };
    let parsed = deserialize_action(&bytes, &mut ctx).unwrap();
    assert_eq!(parsed.children().len(), 1);

    let events = run_pipeline(parsed, 64);
    let ended: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::ActionEnded { object_id } => Some(*object_id),
            _ => None,
        })
        .collect();
    assert!(ended.contains(&20), "the selected child ran");
    assert!(!ended.contains(&10), "the dropped child never ran");
}

#[test]
fn test_parallel_pipeline_ends_once_after_all_children() {
    let mut tree = Action::parallel(vec![media(1, 0, 1), media(2, 0, 5), media(3, 0, 9)]);
    tree.core.object_id = 50;

    let events = run_pipeline(tree, 128);
    let composite_ends = events
        .iter()
        .filter(|event| **event == EngineEvent::ActionEnded { object_id: 50 })
        .count();
    assert_eq!(composite_ends, 1);

    let last_child_end = events
        .iter()
        .position(|event| *event == EngineEvent::ActionEnded { object_id: 3 })
        .expect("slowest child ended");
    let composite_end = events
        .iter()
        .position(|event| *event == EngineEvent::ActionEnded { object_id: 50 })
        .expect("composite ended");
    assert!(last_child_end < composite_end);
}
