//! Integration tests: board controller keeping params, item models, canvas
//! and sidebar lists in step (ab-editor ↔ ab-core).

mod common;

use ab_core::geometry::{Geometry, MediaInfo};
use ab_core::id::SubContentId;
use ab_core::model::{AnimationParams, BoardParams};
use ab_editor::events::{BoardEvent, DialogTarget, Sequence};
use ab_editor::gestures::GestureEvent;
use ab_editor::host::ClipboardPayload;
use ab_editor::order::Reorder;
use ab_editor::toolbar::ToolbarAction;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn id(s: &str) -> SubContentId {
    SubContentId::intern(s)
}

// ─── Loading ─────────────────────────────────────────────────────────────

#[test]
fn load_builds_parallel_orderings_silently() {
    let (mut board, host) = fixture_board();
    assert_eq!(board.element_ids(), vec![id("txt-1"), id("img-1"), id("txt-2")]);
    assert_coherent(&board);
    assert!(board.drain_events().is_empty());

    // One form per element, then one per animation.
    assert_eq!(host.form_count(), 6);
    assert_eq!(host.form(0).borrow().params["contentType"]["subContentId"], "txt-1");
    assert_eq!(host.form(0).borrow().schema["name"], "element");
    assert_eq!(host.form(3).borrow().schema["name"], "animation");

    let hidden = board.element_area().node(id("txt-2")).unwrap();
    assert!(!hidden.visible);
    assert!(!board.element_list().row(id("txt-2")).unwrap().visible);

    // Front-most element is listed first.
    let display: Vec<_> = board.element_list().display_rows().iter().map(|r| r.id).collect();
    assert_eq!(display, vec![id("txt-2"), id("img-1"), id("txt-1")]);

    let titles: Vec<_> = board
        .animation_list()
        .rows()
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Title", "Rocket", "Title"]);
    assert_eq!(
        board.animation_list().rows()[0].details,
        "Fade in \u{00b7} After previous \u{00b7} 1s"
    );
}

#[test]
fn duplicate_ids_are_regenerated_on_load() {
    let mut params = fixture_params();
    let copy = params.elements[0].clone();
    params.elements.push(copy);
    let (mut board, _) = board_with(params);

    let ids = board.element_ids();
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], id("txt-1"));
    assert_ne!(ids[3], id("txt-1"));
    assert_coherent(&board);
    assert_eq!(changed_count(&board.drain_events()), 1);
}

#[test]
fn load_reports_normalized_geometry_once() {
    let mut params = fixture_params();
    params.elements[1].x = 80.0;
    params.elements[1].width = 150.0;
    let (mut board, _) = board_with(params);

    let events = board.drain_events();
    assert_eq!(events.len(), 1);
    let Some(BoardEvent::Changed {
        elements: Some(elements),
        animations: None,
    }) = events.first()
    else {
        panic!("expected an elements change, got {events:?}");
    };
    let fitted = elements[1].geometry();
    assert!(fitted.is_within_bounds(), "{fitted:?}");
    assert_eq!(elements[1].geometry(), board.params().elements[1].geometry());
}

// ─── Creation ────────────────────────────────────────────────────────────

#[test]
fn dragged_toolbar_element_opens_dialog_on_release() {
    let (mut board, _) = fixture_board();
    let created = board.create_from_toolbar("image", false).unwrap();
    assert_eq!(board.element_ids().last(), Some(&created));
    assert_coherent(&board);
    assert_eq!(board.dialog(), None);

    let events = board.drain_events();
    assert!(matches!(events[0], BoardEvent::ElementAdded { id, .. } if id == created));
    assert_eq!(changed_count(&events), 1);

    board.handle_gesture(&GestureEvent::Released { index: 3 });
    assert_eq!(board.dialog(), Some(DialogTarget::Element(created)));

    // Releasing an existing element never opens the dialog.
    board.dialog_done();
    board.handle_gesture(&GestureEvent::Released { index: 3 });
    assert_eq!(board.dialog(), None);
}

#[test]
fn keyboard_toolbar_element_edits_immediately() {
    let (mut board, _) = fixture_board();
    let created = board.create_from_toolbar("shapes", true).unwrap();
    assert_eq!(board.dialog(), Some(DialogTarget::Element(created)));

    let events = board.drain_events();
    let resize = events.iter().find_map(|e| match e {
        BoardEvent::ElementAdded { resize, .. } => Some(*resize),
        _ => None,
    });
    assert_eq!(resize.and_then(|r| r.min_size), Some(10.0));
    assert!(board.create_from_toolbar("table", true).is_none());
}

#[test]
fn new_element_moves_and_persists() {
    let (mut board, _) = fixture_board();
    let created = board.create_from_toolbar("text", false).unwrap();

    assert!(board.update_element_position(created, 120.0, -5.0));
    assert!(!board.update_element_position(created, f64::NAN, 3.0));
    let element = board.params().element(created).unwrap();
    assert_eq!(element.geometry(), Geometry::new(50.0, 0.0, 50.0, 50.0));

    let saved: Value = serde_json::from_str(&board.persisted_json().unwrap()).unwrap();
    let last = &saved["elements"][3];
    assert_eq!(last["x"], json!(50.0));
    assert_eq!(last["y"], json!(0.0));
    assert_eq!(last["contentType"]["library"], "H5P.AdvancedText 1.1");
    assert_eq!(last["contentType"]["subContentId"], json!(created.as_str()));
    assert_coherent(&board);
}

#[test]
fn dragging_default_element_fires_one_change() {
    let (mut board, _) = fixture_board();
    board.resize(800.0, 450.0);
    board.on_animation_frame();
    let created = board.create_from_toolbar("text", false).unwrap();
    assert_eq!(
        board.params().element(created).unwrap().geometry(),
        Geometry::new(25.0, 37.5, 50.0, 50.0)
    );
    board.drain_events();

    // +10% horizontally, -5% vertically on an 800×450 canvas.
    board.handle_gesture(&GestureEvent::Moved {
        index: 3,
        x: 280.0,
        y: 146.25,
    });
    let events = board.drain_events();
    assert_eq!(changed_count(&events), 1);
    let Some(BoardEvent::Changed {
        elements: Some(elements),
        animations: None,
    }) = events.iter().find(|e| e.is_changed())
    else {
        panic!("expected an elements change, got {events:?}");
    };
    assert_eq!(elements.len(), 4);
    assert_eq!(elements[3].geometry(), Geometry::new(35.0, 32.5, 50.0, 50.0));
}

// ─── Removal ─────────────────────────────────────────────────────────────

#[test]
fn removal_waits_for_confirmation() {
    let (mut board, _) = fixture_board();
    let token = board.request_remove_element(id("txt-1")).unwrap();
    let events = board.drain_events();
    let [BoardEvent::ConfirmationRequested(request)] = events.as_slice() else {
        panic!("expected a confirmation request, got {events:?}");
    };
    assert_eq!(request.token, token);
    assert_eq!(request.header_text, "Remove element?");
    assert_eq!(request.cancel_text, "Keep");

    assert!(board.cancel(token));
    assert!(!board.confirm(token));
    assert!(board.params().has_element(id("txt-1")));
    assert!(board.request_remove_element(id("nope")).is_none());
}

#[test]
fn removing_element_cascades_to_its_animations() {
    let (mut board, _) = fixture_board();
    board.set_focus(Some(id("txt-1")));
    board.drain_events();

    let token = board.request_remove_element(id("txt-1")).unwrap();
    assert!(board.confirm(token));

    assert_eq!(board.element_ids(), vec![id("img-1"), id("txt-2")]);
    assert_eq!(board.items()[0].index(), 0);
    assert_eq!(board.items()[1].index(), 1);
    assert_eq!(board.focus(), None);
    assert_eq!(board.params().animations.len(), 1);
    assert_eq!(board.params().animations[0].sub_content_id, Some(id("img-1")));
    assert_coherent(&board);

    let events = board.drain_events();
    assert_eq!(changed_count(&events), 1);
    let removed = events
        .iter()
        .filter(|e| matches!(e, BoardEvent::AnimationRemoved { .. }))
        .count();
    assert_eq!(removed, 2);
    assert!(events.contains(&BoardEvent::FocusChanged { id: None }));
    let Some(BoardEvent::Changed {
        elements: Some(elements),
        animations: Some(animations),
    }) = events.iter().find(|e| e.is_changed())
    else {
        panic!("expected both sequences in the change");
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(animations.len(), 1);
}

#[test]
fn removing_one_animation_keeps_its_siblings() {
    let (mut board, _) = fixture_board();
    let ids = board.animation_ids();
    let token = board.request_remove_animation(ids[2]).unwrap();
    assert!(board.confirm(token));
    assert_eq!(board.animation_ids(), vec![ids[0], ids[1]]);
    assert_eq!(board.params().animations[0].effect.as_deref(), Some("fadeIn"));
    assert_coherent(&board);
}

// ─── Reordering ──────────────────────────────────────────────────────────

#[test]
fn invalid_swap_changes_nothing() {
    let (mut board, _) = fixture_board();
    assert!(!board.change_element_z_position(-1, 0, false));
    assert!(!board.change_element_z_position(0, 3, false));
    assert!(!board.change_animation_order(0, 7, false));
    assert!(board.drain_events().is_empty());

    assert!(board.change_element_z_position(0, 2, false));
    assert_eq!(board.element_ids(), vec![id("txt-2"), id("img-1"), id("txt-1")]);
    assert_coherent(&board);

    let events = board.drain_events();
    assert_eq!(changed_count(&events), 1);
    assert!(events.contains(&BoardEvent::Reordered {
        sequence: Sequence::Elements,
        reorder: Reorder::Swap { a: 0, b: 2 },
        active: false,
    }));
}

#[test]
fn front_and_back_move_through_every_ordering() {
    let (mut board, _) = fixture_board();
    assert!(board.bring_to_front(id("txt-1")));
    assert_eq!(board.element_ids(), vec![id("img-1"), id("txt-2"), id("txt-1")]);
    assert_coherent(&board);

    assert!(board.send_to_back(id("txt-2")));
    assert_eq!(board.element_ids(), vec![id("txt-2"), id("img-1"), id("txt-1")]);
    assert_eq!(board.element_area().ids(), board.element_ids());
    assert_coherent(&board);

    assert!(!board.bring_to_front(id("ghost")));
}

#[test]
fn animation_order_swaps_params_and_rows() {
    let (mut board, _) = fixture_board();
    let before = board.animation_ids();
    assert!(board.change_animation_order(0, 1, false));
    assert_eq!(board.animation_ids(), vec![before[1], before[0], before[2]]);
    assert_eq!(board.params().animations[0].sub_content_id, Some(id("img-1")));
    assert_coherent(&board);
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[test]
fn gestures_convert_pixels_on_the_current_canvas() {
    let (mut board, _) = fixture_board();
    board.resize(800.0, 450.0);
    assert!(board.on_animation_frame());
    board.drain_events();

    board.handle_gesture(&GestureEvent::Moved {
        index: 1,
        x: 80.0,
        y: 45.0,
    });
    assert_eq!(
        board.params().element(id("img-1")).unwrap().geometry(),
        Geometry::new(10.0, 10.0, 40.0, 30.0)
    );

    board.handle_gesture(&GestureEvent::Resized {
        index: 0,
        left: 0.0,
        top: 0.0,
        width: 400.0,
        height: 225.0,
    });
    assert_eq!(
        board.params().element(id("txt-1")).unwrap().geometry(),
        Geometry::new(0.0, 0.0, 50.0, 50.0)
    );
    assert_eq!(
        board.element_area().node(id("txt-1")).unwrap().geometry,
        Geometry::new(0.0, 0.0, 50.0, 50.0)
    );
    assert_eq!(changed_count(&board.drain_events()), 2);

    board.handle_gesture(&GestureEvent::FocusChanged { index: Some(2) });
    assert_eq!(board.focus(), Some(id("txt-2")));
    assert!(board.element_area().node(id("txt-2")).unwrap().focused);
}

#[test]
fn media_size_keeps_width_for_landscape_images() {
    let (mut board, _) = fixture_board();
    assert!(board.set_media_size(
        id("img-1"),
        MediaInfo::Image {
            width: 200.0,
            height: 100.0,
        }
    ));
    let g = board.params().element(id("img-1")).unwrap().geometry();
    assert_eq!(g.width, 40.0);
    assert!((g.height - 40.0 / 2.0 * 16.0 / 9.0).abs() < 1e-9);

    assert!(!board.set_media_size(id("gone"), MediaInfo::Video { aspect_ratio: None }));
}

#[test]
fn visibility_toggles_and_focuses_when_shown() {
    let (mut board, _) = fixture_board();
    assert!(board.toggle_element_visibility(id("txt-2"), None));
    assert!(!board.params().element(id("txt-2")).unwrap().hidden);
    assert!(board.element_area().node(id("txt-2")).unwrap().visible);
    assert!(board.element_list().row(id("txt-2")).unwrap().visible);
    assert_eq!(board.focus(), Some(id("txt-2")));

    let events = board.drain_events();
    assert_eq!(changed_count(&events), 1);
    assert!(events.contains(&BoardEvent::VisibilityChanged {
        id: id("txt-2"),
        visible: true,
    }));

    assert!(board.toggle_element_visibility(id("txt-2"), Some(false)));
    assert!(board.params().element(id("txt-2")).unwrap().hidden);
    assert!(!board.toggle_element_visibility(id("ghost"), None));
}

// ─── Clipboard ───────────────────────────────────────────────────────────

#[test]
fn same_origin_paste_offsets_a_copy() {
    let (mut board, _) = fixture_board();
    board.seed_rng(42);
    let payload = board.copy_element(id("txt-1")).unwrap();
    let pasted = board.paste(payload.clone()).unwrap();
    assert_ne!(pasted, id("txt-1"));
    assert_coherent(&board);

    let element = board.params().element(pasted).unwrap();
    for (moved, original) in [(element.x, 10.0), (element.y, 10.0)] {
        let offset = (moved - original).abs();
        assert!((2.5..=10.0).contains(&offset), "offset {offset} out of range");
    }
    assert_eq!((element.width, element.height), (30.0, 20.0));
    assert_eq!(element.content_type.params["text"], "<p>Title</p>");

    // Same seed, same offsets.
    let (mut other, _) = fixture_board();
    other.seed_rng(42);
    let again = other.paste(payload).unwrap();
    let twin = other.params().element(again).unwrap();
    let first = board.params().element(pasted).unwrap();
    assert_eq!((twin.x, twin.y), (first.x, first.y));
}

#[test]
fn foreign_paste_keeps_type_and_capped_size() {
    let (mut board, host) = fixture_board();
    let pasted = board
        .paste(ClipboardPayload::Foreign {
            library: "H5P.Image 1.1".into(),
            params: Value::Null,
            width: Some(250.0),
            height: Some(f64::NAN),
        })
        .unwrap();
    let element = board.params().element(pasted).unwrap();
    assert_eq!(element.content_type.library, "H5P.Image 1.1");
    assert_eq!(element.content_type.params, json!({}));
    assert_eq!(element.geometry(), Geometry::new(0.0, 37.5, 100.0, 50.0));

    host.refuse_paste.set(true);
    let payload = board.copy_element(id("img-1")).unwrap();
    assert!(board.paste(payload).is_none());
    assert_eq!(board.element_ids().len(), 4);
}

// ─── View ────────────────────────────────────────────────────────────────

#[test]
fn zoom_stays_within_the_factor_table() {
    let (mut board, _) = fixture_board();
    assert!(!board.zoom_out());
    assert!(board.drain_events().is_empty());

    for _ in 0..10 {
        assert!(board.zoom_in());
    }
    assert!(!board.zoom_in());
    assert_eq!(board.viewport().zoom_factor(), 5.0);
    assert!(!board.toolbar().is_enabled(ToolbarAction::ZoomIn));
    assert!(board.toolbar().is_enabled(ToolbarAction::ZoomOut));
    assert_eq!(
        board.drain_events().last(),
        Some(&BoardEvent::ZoomLevelChanged {
            index: 10,
            can_zoom_in: false,
            can_zoom_out: true,
        })
    );

    assert!(!board.set_zoom_factor(6.0));
    assert!(!board.set_zoom_factor(0.5));
    assert!(board.set_zoom_factor(1.34));
    assert_eq!(board.viewport().zoom_index(), 2);

    assert!(board.handle_key("-", Some("DIV")));
    assert!(!board.handle_key("-", Some("INPUT")));
    assert_eq!(board.viewport().zoom_index(), 1);
}

#[test]
fn resizes_are_debounced_to_the_next_frame() {
    let (mut board, _) = fixture_board();
    board.resize(800.0, 450.0);
    board.resize(1600.0, 900.0);
    assert!(board.drain_events().is_empty());

    assert!(board.on_animation_frame());
    assert_eq!(
        board.drain_events(),
        vec![BoardEvent::Resized {
            width: 1600.0,
            height: 900.0,
        }]
    );
    assert!(!board.on_animation_frame());
}

#[test]
fn list_view_toggle_requests_resize() {
    let (mut board, _) = fixture_board();
    assert!(board.toolbar_action(ToolbarAction::ListView));
    assert!(board.is_list_view_open());
    assert!(board.toolbar().action_button(ToolbarAction::ListView).unwrap().active);
    assert!(board.drain_events().contains(&BoardEvent::ListViewToggled { open: true }));
    assert!(board.on_animation_frame());

    assert!(!board.toggle_list_view(Some(false)));
    assert!(!board.toolbar().action_button(ToolbarAction::ListView).unwrap().active);
}

#[test]
fn preview_blurs_and_hands_over_saved_params() {
    let (mut board, _) = fixture_board();
    board.set_focus(Some(id("img-1")));
    board.drain_events();
    board.preview();

    assert_eq!(board.focus(), None);
    let events = board.drain_events();
    let Some(BoardEvent::PreviewToggled { params }) = events.last() else {
        panic!("expected a preview event, got {events:?}");
    };
    assert_eq!(params.elements.len(), 3);
}

#[test]
fn background_resolves_image_path() {
    let (mut board, _) = fixture_board();
    board.set_background(serde_json::from_value(json!({
        "backgroundColor": "#000",
        "backgroundImage": { "path": "images/sky.jpg" }
    }))
    .unwrap());
    assert_eq!(board.viewport().background_color(), Some("#000"));
    assert_eq!(
        board.viewport().background_image_url(),
        Some("https://cdn.test/images/sky.jpg")
    );
    assert_eq!(board.drain_events(), vec![BoardEvent::BackgroundChanged]);
}

// ─── Persistence ─────────────────────────────────────────────────────────

#[test]
fn orphaned_animations_are_left_out_when_saving() {
    let mut params = fixture_params();
    params.animations.push(AnimationParams::targeting(id("gone")));
    let (board, _) = board_with(params);

    assert_eq!(board.params().animations.len(), 4);
    assert_eq!(board.animation_list().rows()[3].title, "gone");
    assert!(board.lint().iter().any(|d| d.rule == "orphaned-animation"));

    let saved = board.persisted_params();
    assert_eq!(saved.animations.len(), 3);
    assert_eq!(saved.aspect_ratio, board.params().aspect_ratio);
}

#[test]
fn saved_json_loads_back_into_the_same_board() {
    let (board, _) = fixture_board();
    let saved = BoardParams::from_json(&board.persisted_json().unwrap()).unwrap();
    let (reloaded, _) = board_with(saved);
    assert_eq!(reloaded.element_ids(), board.element_ids());
    assert_eq!(reloaded.params().elements, board.params().elements);
}
