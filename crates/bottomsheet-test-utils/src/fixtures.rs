//! Environments, gesture sequences and a frame driver.

use bottomsheet::ModalPresenter;
use bottomsheet::presentation::LayoutEnvironment;
use bottomsheet_core::geometry::{EdgeInsets, Size};
use bottomsheet_core::math::Vec2;
use bottomsheet_input::{GesturePhase, PanGesture, RecognizerId};

/// One frame at 60 Hz.
pub const FRAME: f32 = 1.0 / 60.0;

/// Frames after which [`run_until_idle`] gives up.
const MAX_FRAMES: usize = 600;

/// 390x844 portrait phone at 3x, container covering the screen.
pub fn phone() -> LayoutEnvironment {
    LayoutEnvironment::fullscreen(Size::new(390.0, 844.0), 3.0)
}

/// [`phone`] with a 47pt top and 34pt bottom safe area.
pub fn phone_with_safe_area() -> LayoutEnvironment {
    phone().with_safe_area(EdgeInsets::new(47.0, 0.0, 34.0, 0.0))
}

/// [`phone`] rotated to landscape.
pub fn landscape_phone() -> LayoutEnvironment {
    phone().rotated()
}

/// Advance the presenter `frames` times.
pub fn run_frames(presenter: &mut ModalPresenter, frames: usize) {
    for _ in 0..frames {
        presenter.update(FRAME);
    }
}

/// Advance the presenter until no transition or layout animation runs.
///
/// Returns the number of frames it took.
pub fn run_until_idle(presenter: &mut ModalPresenter) -> usize {
    presenter.update(0.0);
    let mut frames = 0;
    while presenter.is_animating() && frames < MAX_FRAMES {
        presenter.update(FRAME);
        frames += 1;
    }
    frames
}

/// A downward drag: `Began`, one `Changed` per translation, then `Ended` at the
/// last translation with `release_velocity`.
pub fn pan_sequence(
    recognizer: RecognizerId,
    translations: &[f32],
    release_velocity: f32,
) -> Vec<PanGesture> {
    let mut gestures = vec![
        PanGesture::new(recognizer, GesturePhase::Began)
            .with_location(Vec2::new(195.0, 40.0))
            .with_translation(Vec2::new(0.0, 1.0)),
    ];
    for y in translations {
        gestures.push(
            PanGesture::new(recognizer, GesturePhase::Changed)
                .with_location(Vec2::new(195.0, 40.0 + y))
                .with_translation(Vec2::new(0.0, *y)),
        );
    }
    let last = translations.last().copied().unwrap_or(0.0);
    gestures.push(
        PanGesture::new(recognizer, GesturePhase::Ended)
            .with_location(Vec2::new(195.0, 40.0 + last))
            .with_translation(Vec2::new(0.0, last))
            .with_velocity(Vec2::new(0.0, release_velocity)),
    );
    gestures
}
