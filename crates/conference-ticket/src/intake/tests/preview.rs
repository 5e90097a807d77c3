use super::common::*;
use crate::intake::preview::{DropZoneAction, DropZoneEvent, DropZoneKey};
use crate::intake::validation::{AvatarRejection, AVATAR_UNSUPPORTED_TYPE};

const DEFAULT_HINT: &str = "Upload your photo (JPG or PNG, max size: 500KB).";
const TOO_LARGE: &str = "File too large. Please upload a photo under 500KB.";

#[test]
fn valid_selection_activates_preview() {
    let (mut preview, urls) = preview_manager();

    preview
        .select_file(png("me.png", 100 * 1024))
        .expect("png accepted");

    let view = preview.view();
    assert!(view.has_image);
    assert!(!view.icon_visible);
    assert!(!view.instructions_visible);
    assert!(view.actions_visible);
    assert_eq!(view.thumbnail, urls.live().first().cloned());
    assert_eq!(view.hint.text, DEFAULT_HINT);
    assert!(!view.hint.is_error);
}

#[test]
fn reselection_releases_previous_handle_first() {
    let (mut preview, urls) = preview_manager();

    preview.select_file(png("first.png", 1024)).expect("first");
    preview.select_file(jpeg("second.jpg", 2048)).expect("second");

    let events = urls.events();
    assert_eq!(events.len(), 3);
    let UrlEvent::Created(first) = &events[0] else {
        panic!("expected create, got {:?}", events[0]);
    };
    assert_eq!(events[1], UrlEvent::Revoked(first.clone()));
    assert!(matches!(&events[2], UrlEvent::Created(url) if url != first));
    assert_eq!(urls.peak_live(), 1);
    assert_eq!(urls.live().len(), 1);
    assert_eq!(
        preview.preview().map(|state| state.file_name.as_str()),
        Some("second.jpg")
    );
}

#[test]
fn rejected_selection_keeps_existing_preview() {
    let (mut preview, urls) = preview_manager();
    preview.select_file(png("keep.png", 1024)).expect("accepted");
    let kept = urls.live();

    let rejection = preview
        .select_file(gif("nope.gif"))
        .expect_err("gif rejected");
    assert!(matches!(rejection, AvatarRejection::UnsupportedType { .. }));

    assert_eq!(urls.live(), kept);
    assert!(preview.view().has_image);
    assert_eq!(preview.hint().text, AVATAR_UNSUPPORTED_TYPE);
    assert!(preview.hint().is_error);
    assert_eq!(
        preview.selected().map(|file| file.name.as_str()),
        Some("nope.gif")
    );
}

#[test]
fn oversized_selection_reports_limit_on_hint() {
    let (mut preview, urls) = preview_manager();

    let rejection = preview
        .select_file(png("huge.png", 512_001))
        .expect_err("too large");

    assert!(matches!(rejection, AvatarRejection::TooLarge { .. }));
    assert_eq!(preview.hint().text, TOO_LARGE);
    assert!(urls.events().is_empty());
}

#[test]
fn clear_restores_empty_drop_zone() {
    let (mut preview, urls) = preview_manager();
    preview.select_file(png("me.png", 1024)).expect("accepted");

    preview.clear();

    assert!(urls.live().is_empty());
    assert!(preview.selected().is_none());
    let view = preview.view();
    assert!(!view.has_image);
    assert!(view.icon_visible);
    assert!(view.instructions_visible);
    assert!(!view.actions_visible);
    assert!(view.thumbnail.is_none());
    assert_eq!(view.hint.text, DEFAULT_HINT);
    assert!(!view.hint.is_error);
}

#[test]
fn clear_after_error_resets_hint() {
    let (mut preview, _urls) = preview_manager();
    let _ = preview.select_file(gif("nope.gif"));
    assert!(preview.hint().is_error);

    preview.clear();

    assert_eq!(preview.hint().text, DEFAULT_HINT);
    assert!(!preview.hint().is_error);
}

#[test]
fn drag_events_toggle_dragover() {
    let (mut preview, _urls) = preview_manager();

    preview.handle_event(DropZoneEvent::DragEnter);
    assert!(preview.view().dragover);
    preview.handle_event(DropZoneEvent::DragLeave);
    assert!(!preview.view().dragover);

    preview.handle_event(DropZoneEvent::DragOver);
    preview.handle_event(DropZoneEvent::Drop(Some(png("dropped.png", 512))));
    let view = preview.view();
    assert!(!view.dragover);
    assert!(view.has_image);
}

#[test]
fn empty_drop_changes_nothing() {
    let (mut preview, urls) = preview_manager();
    preview.handle_event(DropZoneEvent::DragOver);
    preview.handle_event(DropZoneEvent::Drop(None));

    assert!(!preview.view().dragover);
    assert!(preview.selected().is_none());
    assert!(urls.events().is_empty());
}

#[test]
fn activation_requests_picker() {
    let (mut preview, _urls) = preview_manager();

    assert_eq!(
        preview.handle_event(DropZoneEvent::Click),
        DropZoneAction::OpenPicker
    );
    assert_eq!(
        preview.handle_event(DropZoneEvent::KeyDown(DropZoneKey::Enter)),
        DropZoneAction::OpenPicker
    );
    assert_eq!(
        preview.handle_event(DropZoneEvent::KeyDown(DropZoneKey::Space)),
        DropZoneAction::OpenPicker
    );
    assert_eq!(
        preview.handle_event(DropZoneEvent::KeyDown(DropZoneKey::Other)),
        DropZoneAction::None
    );
    assert_eq!(
        preview.handle_event(DropZoneEvent::ChangeImage),
        DropZoneAction::OpenPicker
    );
}

#[test]
fn remove_button_clears_preview() {
    let (mut preview, urls) = preview_manager();
    preview.picker_changed(Some(png("me.png", 1024)));
    assert_eq!(urls.live().len(), 1);

    preview.handle_event(DropZoneEvent::RemoveImage);
    assert!(urls.live().is_empty());
    assert!(!preview.is_active());
}

#[test]
fn picker_cancel_is_ignored() {
    let (mut preview, _urls) = preview_manager();
    preview.picker_changed(Some(png("me.png", 1024)));

    preview.picker_changed(None);

    assert!(preview.is_active());
    assert!(preview.selected().is_some());
}

#[test]
fn dropping_the_manager_releases_its_handle() {
    let (mut preview, urls) = preview_manager();
    preview.select_file(png("me.png", 1024)).expect("accepted");

    drop(preview);

    assert!(urls.live().is_empty());
    assert!(matches!(urls.events().last(), Some(UrlEvent::Revoked(_))));
}

#[test]
fn teardown_is_idempotent() {
    let (mut preview, urls) = preview_manager();
    preview.select_file(png("me.png", 1024)).expect("accepted");

    preview.teardown();
    preview.teardown();
    drop(preview);

    let revocations = urls
        .events()
        .iter()
        .filter(|event| matches!(event, UrlEvent::Revoked(_)))
        .count();
    assert_eq!(revocations, 1);
}
