//! Headless walkthrough of a drawer's life.
//!
//! This example shows how to:
//! - Present a half-height drawer and drive it frame by frame
//! - Resize the open drawer
//! - Follow a device rotation
//! - Dismiss the drawer with a drag delivered through a gesture queue
//!
//! Run with: RUST_LOG=info cargo run -p bottomsheet --example drawer_demo

use std::cell::RefCell;
use std::rc::Rc;

use bottomsheet::prelude::*;
use bottomsheet_core::geometry::{Rect, Size};
use bottomsheet_core::logging;
use bottomsheet_core::math::Vec2;
use bottomsheet_input::{GesturePhase, GestureQueue, PanGesture, ScrollView};

const FRAME: f32 = 1.0 / 60.0;

/// A settings menu with a scrollable list.
struct SettingsMenu {
    id: ContentId,
    size: Size<f32>,
    list: ScrollView,
}

impl SettingsMenu {
    fn new() -> Self {
        Self {
            id: ContentId::new(),
            size: Size::ZERO,
            list: ScrollView::new(Rect::new(0.0, 0.0, 390.0, 400.0), Size::new(390.0, 1600.0)),
        }
    }
}

impl PresentedContent for SettingsMenu {
    fn id(&self) -> ContentId {
        self.id
    }

    fn preferred_content_size(&self) -> Size<f32> {
        self.size
    }

    fn set_preferred_content_size(&mut self, size: Size<f32>) {
        self.size = size;
    }

    fn is_view_loaded(&self) -> bool {
        true
    }

    fn apply_surface_style(&mut self, style: SurfaceStyle) {
        tracing::info!(radius = style.corner_radius, "menu styled");
    }

    fn scroll_view_mut(&mut self) -> Option<&mut ScrollView> {
        Some(&mut self.list)
    }

    fn set_frame(&mut self, frame: Rect<f32>) {
        self.list.state.frame.width = frame.width;
        self.list.state.frame.height = frame.height;
    }
}

/// Run frames until every animation has settled.
fn settle(presenter: &mut ModalPresenter, drawers: &mut DrawerManager) -> usize {
    let mut frames = 0;
    loop {
        presenter.update(FRAME);
        drawers.update(presenter);
        frames += 1;
        if !presenter.is_animating() || frames >= 600 {
            return frames;
        }
    }
}

fn log_frame(label: &str, presenter: &ModalPresenter) {
    match presenter.frame() {
        Some(frame) => tracing::info!(
            x = frame.x,
            y = frame.y,
            width = frame.width,
            height = frame.height,
            state = ?presenter.presentation_state(),
            "{label}"
        ),
        None => tracing::info!("{label}: nothing presented"),
    }
}

fn main() {
    logging::init();

    let portrait = LayoutEnvironment::fullscreen(Size::new(390.0, 844.0), 3.0);
    let notifier = OrientationNotifier::new();
    let mut presenter = ModalPresenter::new(portrait);
    let mut drawers = DrawerManager::new(&presenter, notifier.subscribe());
    drawers.set_delegate(|state: DrawerState| tracing::info!(?state, "drawer state changed"));

    let menu: ContentHandle = Rc::new(RefCell::new(SettingsMenu::new()));

    // Open
    drawers.present_drawer(
        &mut presenter,
        menu.clone(),
        SheetConfiguration::drawer_default().corner_radius(14.0),
        Some(Box::new(|| tracing::info!("settings menu dismissed"))),
    );
    let frames = settle(&mut presenter, &mut drawers);
    tracing::info!(frames, "drawer opened");
    log_frame("half height", &presenter);

    // Resize
    drawers.refresh_size(Some(600.0), None);
    settle(&mut presenter, &mut drawers);
    log_frame("resized", &presenter);

    // Rotate and back
    presenter.set_environment(portrait.rotated());
    notifier.notify(DeviceOrientation::LandscapeLeft);
    settle(&mut presenter, &mut drawers);
    log_frame("landscape", &presenter);

    presenter.set_environment(portrait);
    notifier.notify(DeviceOrientation::Portrait);
    settle(&mut presenter, &mut drawers);
    log_frame("portrait again", &presenter);

    // Drag down to dismiss
    let Some(recognizer) = presenter
        .controller()
        .and_then(|controller| controller.pan_recognizer())
    else {
        tracing::warn!("drawer is not interactive");
        return;
    };

    let mut queue = GestureQueue::new();
    queue.push(
        PanGesture::new(recognizer, GesturePhase::Began)
            .with_location(Vec2::new(195.0, 20.0))
            .with_translation(Vec2::new(0.0, 2.0)),
    );
    for step in 1..=12 {
        queue.push(
            PanGesture::new(recognizer, GesturePhase::Changed)
                .with_location(Vec2::new(195.0, 20.0 + 20.0 * step as f32))
                .with_translation(Vec2::new(0.0, 20.0 * step as f32)),
        );
    }
    queue.push(
        PanGesture::new(recognizer, GesturePhase::Ended)
            .with_translation(Vec2::new(0.0, 240.0))
            .with_velocity(Vec2::new(0.0, 1400.0)),
    );

    let mut batch = queue.drain();
    presenter.handle_gestures(&mut batch);
    tracing::info!(
        coalesced = queue.stats().samples_coalesced,
        unclaimed = batch.len(),
        "drag delivered"
    );

    settle(&mut presenter, &mut drawers);
    log_frame("after drag", &presenter);
    tracing::info!(state = ?drawers.drawer_state(), "done");
}
