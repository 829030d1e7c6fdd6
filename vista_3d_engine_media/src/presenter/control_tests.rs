use super::*;
use vista_3d_engine::texture::{Image, Palette, PaletteEntry};

use crate::action::Action;
use crate::presenter::{EngineEvent, EventQueue, Presenter, PresenterContext, TickleState};

fn ctx<'a>(now_ms: u32, events: &'a EventQueue) -> PresenterContext<'a> {
    PresenterContext { now_ms, events }
}

fn control_with_extra(extra: &[u8]) -> ControlPresenter {
    let mut action = Action::parallel(vec![Action::leaf(), Action::leaf(), Action::leaf(), Action::leaf()]);
    action.core.object_id = 66;
    action.core.extra = extra.to_vec();

    let mut presenter = ControlPresenter::new();
    presenter.start_action(action).unwrap();
    presenter.parse_extra().unwrap();
    presenter
}

// ============================================================================
// Extra data parsing
// ============================================================================

#[test]
fn test_parse_toggle_style() {
    let presenter = control_with_extra(b"style:toggle");
    assert_eq!(*presenter.style(), ControlStyle::Toggle);
}

#[test]
fn test_parse_grid_style() {
    let presenter = control_with_extra(b"style:grid:2,2");
    assert_eq!(*presenter.style(), ControlStyle::Grid { columns: 2, rows: 2 });
}

#[test]
fn test_parse_map_style() {
    let presenter = control_with_extra(b"style:map:1,4,7");
    assert_eq!(*presenter.style(), ControlStyle::Map { allowed: vec![1, 4, 7] });
}

#[test]
fn test_unknown_style_keeps_default() {
    let presenter = control_with_extra(b"style:hologram");
    assert_eq!(*presenter.style(), ControlStyle::Toggle);
}

// ============================================================================
// Toggle hit-testing
// ============================================================================

#[test]
fn test_toggle_flips_selected_state() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:toggle");
    assert_eq!(presenter.selected(), 0);

    assert!(presenter.handle_click(500, -3, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 1, "any click toggles");

    assert!(presenter.handle_click(0, 0, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 0);

    let drained = events.drain();
    assert_eq!(
        drained,
        vec![
            EngineEvent::ControlClicked { object_id: 66, selected: 1 },
            EngineEvent::ControlClicked { object_id: 66, selected: 0 },
        ]
    );
}

// ============================================================================
// Grid hit-testing
// ============================================================================

#[test]
fn test_grid_maps_click_to_cell() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:grid:2,2");
    presenter.set_rect(100, 100, 200, 100);

    // Top-left cell
    assert!(presenter.handle_click(110, 110, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 0);

    // Top-right cell
    assert!(presenter.handle_click(250, 120, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 1);

    // Bottom-left cell
    assert!(presenter.handle_click(130, 180, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 2);

    // Bottom-right cell
    assert!(presenter.handle_click(299, 199, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 3);
}

#[test]
fn test_grid_click_outside_rect_misses() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:grid:2,2");
    presenter.set_rect(100, 100, 200, 100);

    assert!(!presenter.handle_click(50, 50, None, &mut ctx(0, &events)));
    assert!(!presenter.handle_click(301, 150, None, &mut ctx(0, &events)));
    assert!(events.is_empty());
}

// ============================================================================
// Map hit-testing
// ============================================================================

fn map_image() -> Image {
    // 2x2 image with palette indices 0, 4, 7, 9
    let palette = Palette::new(vec![PaletteEntry::default(); 10]).unwrap();
    Image::new(2, 2, palette, vec![0, 4, 7, 9]).unwrap()
}

#[test]
fn test_map_selects_allowed_pixel_index() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:map:4,7");
    let image = map_image();

    // Pixel (1, 0) = index 4: allowed
    assert!(presenter.handle_click(1, 0, Some(&image), &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 4);

    // Pixel (0, 1) = index 7: allowed
    assert!(presenter.handle_click(0, 1, Some(&image), &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 7);
}

#[test]
fn test_map_rejects_unlisted_pixel_index() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:map:4,7");
    let image = map_image();

    // Pixel (0, 0) = index 0: not in the allow-list
    assert!(!presenter.handle_click(0, 0, Some(&image), &mut ctx(0, &events)));
    // Pixel (1, 1) = index 9: not in the allow-list
    assert!(!presenter.handle_click(1, 1, Some(&image), &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 0, "selection unchanged");
    assert!(events.is_empty());
}

#[test]
fn test_map_without_image_misses() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:map:4,7");
    assert!(!presenter.handle_click(0, 0, None, &mut ctx(0, &events)));
}

// ============================================================================
// Selection drives sub-presenters
// ============================================================================

#[test]
fn test_selection_enables_one_child() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:grid:2,2");
    presenter.set_rect(0, 0, 100, 100);

    presenter.handle_click(99, 99, None, &mut ctx(0, &events)); // cell 3

    assert_eq!(presenter.child_count(), 4);
    for index in 0..4 {
        assert_eq!(
            presenter.child_enabled(index),
            Some(index == 3),
            "only the selected child is enabled"
        );
    }
}

// ============================================================================
// Disabled controls
// ============================================================================

#[test]
fn test_disabled_control_ignores_clicks() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:toggle");
    presenter.set_control_enabled(false);

    assert!(!presenter.handle_click(0, 0, None, &mut ctx(0, &events)));
    assert_eq!(presenter.selected(), 0);
    assert!(events.is_empty());
}

// ============================================================================
// Tickle behaviour
// ============================================================================

#[test]
fn test_control_stays_streaming() {
    let events = EventQueue::new();
    let mut presenter = control_with_extra(b"style:toggle");

    for now in 0..10 {
        presenter.tickle(&mut ctx(now, &events)).unwrap();
    }
    assert_eq!(presenter.state(), TickleState::Streaming, "controls idle in streaming");
}
