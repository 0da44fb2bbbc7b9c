//! Integration tests for presenting, laying out and dismissing sheets.
//!
//! Everything runs headless: time only advances through `ModalPresenter::update`.

use bottomsheet::prelude::*;
use bottomsheet::presentation::PresentationState;
use bottomsheet::{DismissalHandler, SheetOrientation};
use bottomsheet_core::geometry::{EdgeInsets, Rect, Size};
use bottomsheet_test_utils::*;

fn present(
    presenter: &mut ModalPresenter,
    content: &MockContentHandle,
    configuration: SheetConfiguration,
    animated: bool,
) -> CallCounter {
    let completion = CallCounter::new();
    let presented = presenter.present_bottom_sheet(
        content.handle(),
        configuration,
        || true,
        Some(completion.callback()),
        animated,
    );
    assert!(presented.is_some());
    completion
}

fn assert_frame_eq(actual: Rect<f32>, expected: Rect<f32>) {
    let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
    assert!(
        close(actual.x, expected.x)
            && close(actual.y, expected.y)
            && close(actual.width, expected.width)
            && close(actual.height, expected.height),
        "expected {expected:?}, got {actual:?}"
    );
}

// ============================================================================
// Presentation
// ============================================================================

#[test]
fn test_animated_presentation_slides_in_from_bottom() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), true);

    assert_eq!(presenter.presentation_state(), Some(PresentationState::Presenting));
    assert_frame_eq(presenter.frame().unwrap(), Rect::new(0.0, 844.0, 390.0, 300.0));

    run_frames(&mut presenter, 5);
    let midway = presenter.frame().unwrap();
    assert!(midway.y < 844.0 && midway.y > 544.0);

    run_until_idle(&mut presenter);
    assert_eq!(presenter.presentation_state(), Some(PresentationState::Presented));
    assert_frame_eq(presenter.frame().unwrap(), Rect::new(0.0, 544.0, 390.0, 300.0));
    assert_eq!(content.last_frame(), presenter.frame());
}

#[test]
fn test_presentation_applies_sheet_style_once() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(
        &mut presenter,
        &content,
        SheetConfiguration::new().corner_radius(16.0),
        false,
    );

    assert_eq!(content.count_style_applications(), 1);
    let style = content.last_style().unwrap();
    assert_eq!(style, SurfaceStyle::sheet(16.0));
    assert!(style.clips_to_bounds);
}

#[test]
fn test_non_animated_presentation_is_presented_immediately() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    assert!(presenter.is_presented(content.id()));
    assert_eq!(presenter.presentation_state(), Some(PresentationState::Presented));
    assert!(!presenter.is_animating());
    assert!(presenter.controller().unwrap().pan_recognizer().is_some());
}

#[test]
fn test_safe_area_extends_sheet() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone_with_safe_area());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    assert_frame_eq(presenter.frame().unwrap(), Rect::new(0.0, 510.0, 390.0, 334.0));
}

#[test]
fn test_sheet_is_limited_to_screen() {
    let content = MockContent::new(2000.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    assert_frame_eq(presenter.frame().unwrap(), Rect::new(0.0, 0.0, 390.0, 844.0));
}

#[test]
fn test_geometry_is_pixel_ceiled() {
    let content = MockContent::new(123.3).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(
        &mut presenter,
        &content,
        SheetConfiguration::new().orientation(SheetOrientation::Landscape),
        false,
    );

    let frame = presenter.frame().unwrap();
    assert!(frame.width >= 123.3);
    assert!((frame.width - 370.0 / 3.0).abs() < 1e-3);
    assert!((frame.width * 3.0 - (frame.width * 3.0).round()).abs() < 1e-3);
    assert_eq!(frame.height, 844.0);
}

#[test]
fn test_landscape_sheet_sits_on_right_edge() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(landscape_phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    assert_frame_eq(presenter.frame().unwrap(), Rect::new(544.0, 0.0, 300.0, 390.0));
}

#[test]
fn test_double_presentation_is_refused() {
    let first = MockContent::new(300.0).into_handle();
    let second = MockContent::new(200.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &first, SheetConfiguration::new(), false);

    let refused = presenter.present_bottom_sheet(
        second.handle(),
        SheetConfiguration::new(),
        || true,
        None,
        true,
    );

    assert!(refused.is_none());
    assert!(presenter.is_presented(first.id()));
    assert!(!presenter.is_presented(second.id()));
    assert_eq!(second.count_style_applications(), 0);
}

#[test]
fn test_presenting_while_dismissing_finishes_outgoing_sheet() {
    let first = MockContent::new(300.0).into_handle();
    let second = MockContent::new(200.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    let first_completion = present(&mut presenter, &first, SheetConfiguration::new(), false);

    presenter.dismiss(first.id(), true);
    run_frames(&mut presenter, 2);
    assert_eq!(presenter.presentation_state(), Some(PresentationState::Dismissing));

    present(&mut presenter, &second, SheetConfiguration::new(), true);
    assert_eq!(first_completion.count(), 1);
    assert!(presenter.is_presented(second.id()));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "Style applied before the presented view was loaded")]
fn test_style_before_view_loaded_is_contract_violation() {
    let content = MockContent::new(300.0).unloaded().into_handle();
    let mut presenter = ModalPresenter::new(phone());
    presenter.present_bottom_sheet(content.handle(), SheetConfiguration::new(), || true, None, false);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_preferred_size_change_animates_relayout() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    content.set_preferred_content_size(Size::new(390.0, 500.0));
    presenter.update(FRAME);
    assert!(presenter.is_animating());
    let midway = presenter.frame().unwrap();
    assert!(midway.height > 300.0 && midway.height < 500.0);

    run_until_idle(&mut presenter);
    assert_frame_eq(presenter.frame().unwrap(), Rect::new(0.0, 344.0, 390.0, 500.0));
    assert_frame_eq(
        presenter.controller().unwrap().surface_frame(),
        presenter.frame().unwrap(),
    );
}

#[test]
fn test_resizing_twice_to_same_size_is_stable() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    content.set_preferred_content_size(Size::new(390.0, 450.0));
    run_until_idle(&mut presenter);
    let first = presenter.frame().unwrap();

    content.set_preferred_content_size(Size::new(390.0, 450.0));
    run_until_idle(&mut presenter);
    assert_eq!(presenter.frame().unwrap(), first);
}

#[test]
fn test_safe_area_change_relayouts_sheet() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    presenter.set_environment(phone_with_safe_area());
    run_until_idle(&mut presenter);
    assert_frame_eq(presenter.frame().unwrap(), Rect::new(0.0, 510.0, 390.0, 334.0));
}

#[test]
fn test_missing_container_skips_layout() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);
    let before = presenter.frame().unwrap();

    let mut environment = phone();
    environment.container = None;
    environment.safe_area = Some(EdgeInsets::new(0.0, 0.0, 100.0, 0.0));
    presenter.set_environment(environment);
    content.set_preferred_content_size(Size::new(390.0, 400.0));
    run_until_idle(&mut presenter);

    assert_eq!(presenter.frame().unwrap(), before);
}

// ============================================================================
// Dismissal
// ============================================================================

#[test]
fn test_animated_dismissal_runs_completion_once() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    let completion = present(&mut presenter, &content, SheetConfiguration::new(), false);

    presenter.dismiss(content.id(), true);
    assert_eq!(presenter.presentation_state(), Some(PresentationState::Dismissing));
    assert_eq!(completion.count(), 0);

    run_until_idle(&mut presenter);
    assert!(!presenter.is_presented(content.id()));
    assert_eq!(presenter.presentation_state(), None);
    assert_eq!(completion.count(), 1);
    assert_frame_eq(content.last_frame().unwrap(), Rect::new(0.0, 844.0, 390.0, 300.0));
}

#[test]
fn test_dismissing_presenting_sheet_settles_it_first() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    let completion = present(&mut presenter, &content, SheetConfiguration::new(), true);

    presenter.dismiss(content.id(), false);
    assert!(!presenter.is_presented(content.id()));
    assert_eq!(completion.count(), 1);
}

#[test]
fn test_dismissing_unknown_content_is_noop() {
    let content = MockContent::new(300.0).into_handle();
    let stranger = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    let completion = present(&mut presenter, &content, SheetConfiguration::new(), false);

    presenter.dismiss(stranger.id(), false);
    assert!(presenter.is_presented(content.id()));
    assert_eq!(completion.count(), 0);

    let mut empty = ModalPresenter::new(phone());
    empty.dismiss(content.id(), false);
    assert!(!empty.dismiss_if_possible());
}

#[test]
fn test_dismiss_if_possible_respects_handler() {
    let content = MockContent::new(300.0).into_handle();
    let handler = RecordingDismissalHandler::new(content.id());
    handler.set_can_be_dismissed(false);
    let mut presenter = ModalPresenter::new(phone());
    presenter.present(content.handle(), SheetConfiguration::new(), handler.boxed(), false);

    assert!(!presenter.dismiss_if_possible());
    assert!(presenter.is_presented(content.id()));
    assert_eq!(handler.count_perform_dismissals(), 0);

    handler.set_can_be_dismissed(true);
    assert!(presenter.dismiss_if_possible());
    assert_eq!(handler.count(DismissalCall::PerformDismissal { animated: true }), 1);

    run_until_idle(&mut presenter);
    assert!(!presenter.is_presented(content.id()));
    assert_eq!(handler.count(DismissalCall::DidEndDismissal), 1);
}

#[test]
fn test_presenting_same_content_again_after_dismissal() {
    let content = MockContent::new(300.0).into_handle();
    let mut presenter = ModalPresenter::new(phone());
    present(&mut presenter, &content, SheetConfiguration::new(), false);
    let first = presenter.presentation_id().unwrap();

    presenter.dismiss(content.id(), false);
    present(&mut presenter, &content, SheetConfiguration::new(), false);

    assert!(presenter.is_presented(content.id()));
    assert_ne!(presenter.presentation_id().unwrap(), first);
}

#[test]
fn test_custom_handler_is_told_about_dismissal_end() {
    let content = MockContent::new(300.0).into_handle();
    let handler = RecordingDismissalHandler::new(content.id());
    let mut presenter = ModalPresenter::new(phone());
    let boxed: Box<dyn DismissalHandler> = handler.boxed();
    presenter.present(content.handle(), SheetConfiguration::new(), boxed, false);

    presenter.dismiss(content.id(), false);
    assert_eq!(handler.calls(), vec![DismissalCall::DidEndDismissal]);
}
