//! Modal presentation host.
//!
//! [`ModalPresenter`] is the machinery a presentation controller expects
//! around it: it runs the presentation and dismissal transitions, calls the
//! lifecycle hooks in order, executes the controller's [`SheetRequest`]s and
//! routes gestures, scroll events and navigation events to the controller.
//! Time only advances through [`ModalPresenter::update`].
//!
//! # Example
//!
//! ```
//! use bottomsheet::host::{ContentHandle, ContentId, PresentedContent, SurfaceStyle};
//! use bottomsheet::presentation::{LayoutEnvironment, PresentationState};
//! use bottomsheet::{ModalPresenter, SheetConfiguration};
//! use bottomsheet_core::geometry::Size;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Card {
//!     id: ContentId,
//!     size: Size<f32>,
//! }
//!
//! impl PresentedContent for Card {
//!     fn id(&self) -> ContentId { self.id }
//!     fn preferred_content_size(&self) -> Size<f32> { self.size }
//!     fn set_preferred_content_size(&mut self, size: Size<f32>) { self.size = size; }
//!     fn is_view_loaded(&self) -> bool { true }
//!     fn apply_surface_style(&mut self, _style: SurfaceStyle) {}
//! }
//!
//! let card_id = ContentId::new();
//! let card: ContentHandle = Rc::new(RefCell::new(Card { id: card_id, size: Size::new(390.0, 300.0) }));
//!
//! let mut presenter = ModalPresenter::new(LayoutEnvironment::fullscreen(Size::new(390.0, 844.0), 3.0));
//! presenter.present_bottom_sheet(card, SheetConfiguration::new(), || true, None, true);
//! presenter.update(0.3);
//! assert_eq!(presenter.presentation_state(), Some(PresentationState::Presented));
//! assert_eq!(presenter.frame().map(|frame| frame.y), Some(544.0));
//!
//! presenter.dismiss(card_id, false);
//! assert!(!presenter.is_presented(card_id));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use bottomsheet_core::geometry::{Pos, Rect, Size};
use bottomsheet_core::profiling::{profile_function, profile_scope};
use bottomsheet_input::{GestureBatch, GesturePhase, HandleStatus, PanGesture, ScrollEvent, ScrollViewId};

use crate::animation::{EasingFunction, FrameAnimation};
use crate::configuration::{SheetConfiguration, SheetTuning};
use crate::host::{ContentHandle, ContentId, DefaultDismissalHandler, DismissalHandler, DismissalHost};
use crate::presentation::{LayoutEnvironment, PresentationController, PresentationState, SheetRequest};
use crate::transition::{PercentDrivenTransition, TransitionAnimator, TransitionKind, TransitionOutcome};

static HOST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static PRESENTATION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(pub u64);

impl HostId {
    pub fn new() -> Self {
        Self(HOST_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for HostId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one presentation. Presenting the same content twice yields two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresentationId(pub u64);

impl PresentationId {
    pub fn new() -> Self {
        Self(PRESENTATION_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for PresentationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Navigation inside the presented content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    WillShow,
    DidShow,
}

struct Presentation {
    id: PresentationId,
    content_id: ContentId,
    content: ContentHandle,
    controller: PresentationController,
    animator: Option<TransitionAnimator>,
    layout: Option<FrameAnimation>,
    /// Frame currently shown.
    frame: Rect<f32>,
    /// Frame the sheet rests at once animations settle.
    target: Rect<f32>,
    last_preferred_size: Size<f32>,
    pan_active: bool,
}

impl Presentation {
    fn set_frame(&mut self, frame: Rect<f32>) {
        if self.frame != frame {
            self.frame = frame;
            self.content.borrow_mut().set_frame(frame);
        }
    }
}

/// The presenter's side of [`DismissalHost`]: dismissals requested by
/// handlers are queued and run once the current call returns.
#[derive(Debug, Default)]
struct HostLink {
    presented: Option<ContentId>,
    pending: Vec<(ContentId, bool)>,
}

impl DismissalHost for HostLink {
    fn dismiss(&mut self, content: ContentId, animated: bool) {
        self.pending.push((content, animated));
    }

    fn is_presented(&self, content: ContentId) -> bool {
        self.presented == Some(content)
    }
}

/// Presents at most one bottom sheet at a time.
pub struct ModalPresenter {
    id: HostId,
    environment: LayoutEnvironment,
    tuning: SheetTuning,
    presentation: Option<Presentation>,
    link: HostLink,
}

impl ModalPresenter {
    pub fn new(environment: LayoutEnvironment) -> Self {
        Self {
            id: HostId::new(),
            environment,
            tuning: SheetTuning::default(),
            presentation: None,
            link: HostLink::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: SheetTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn id(&self) -> HostId {
        self.id
    }

    pub fn environment(&self) -> &LayoutEnvironment {
        &self.environment
    }

    pub fn tuning(&self) -> &SheetTuning {
        &self.tuning
    }

    /// Update the container, screen or safe area; a presented sheet is laid out again.
    pub fn set_environment(&mut self, environment: LayoutEnvironment) {
        self.environment = environment;
        if let Some(presentation) = self.presentation.as_mut() {
            let preferred = presentation.last_preferred_size;
            presentation
                .controller
                .container_did_layout(&self.environment, preferred);
        }
        self.process_requests();
    }

    /// Whether `content` is the presented surface.
    pub fn is_presented(&self, content: ContentId) -> bool {
        self.link.is_presented(content)
    }

    pub fn presented_content(&self) -> Option<ContentId> {
        self.link.presented
    }

    pub fn presentation_id(&self) -> Option<PresentationId> {
        self.presentation.as_ref().map(|presentation| presentation.id)
    }

    pub fn presentation_state(&self) -> Option<PresentationState> {
        self.presentation
            .as_ref()
            .map(|presentation| presentation.controller.state())
    }

    pub fn controller(&self) -> Option<&PresentationController> {
        self.presentation
            .as_ref()
            .map(|presentation| &presentation.controller)
    }

    /// Frame of the presented surface as currently shown.
    pub fn frame(&self) -> Option<Rect<f32>> {
        self.presentation.as_ref().map(|presentation| presentation.frame)
    }

    /// A transition or a layout animation is still running.
    pub fn is_animating(&self) -> bool {
        self.presentation
            .as_ref()
            .is_some_and(|presentation| presentation.animator.is_some() || presentation.layout.is_some())
    }

    /// Present `content` from the bottom edge.
    ///
    /// `can_be_dismissed` is asked whenever a dismissal is about to commit and
    /// `dismiss_completion` runs once the dismissal transition completes.
    /// Returns `None` while another sheet is presented.
    pub fn present_bottom_sheet(
        &mut self,
        content: ContentHandle,
        configuration: SheetConfiguration,
        can_be_dismissed: impl Fn() -> bool + 'static,
        dismiss_completion: Option<Box<dyn FnOnce()>>,
        animated: bool,
    ) -> Option<PresentationId> {
        let content_id = content.borrow().id();
        let handler = DefaultDismissalHandler::new(content_id, can_be_dismissed, dismiss_completion);
        self.present(content, configuration, Box::new(handler), animated)
    }

    /// Present `content` with a custom dismissal handler.
    pub fn present(
        &mut self,
        content: ContentHandle,
        configuration: SheetConfiguration,
        dismissal_handler: Box<dyn DismissalHandler>,
        animated: bool,
    ) -> Option<PresentationId> {
        if let Some(current) = &self.presentation
            && current.controller.state() == PresentationState::Dismissing
        {
            // Finish the outgoing sheet so surfaces never overlap.
            let outgoing = current.content_id;
            self.dismiss(outgoing, false);
        }
        if let Some(current) = &self.presentation {
            tracing::warn!(
                host = self.id.0,
                presented = current.content_id.0,
                "a sheet is already presented, ignoring presentation request"
            );
            return None;
        }

        let id = PresentationId::new();
        let (content_id, preferred) = {
            let content = content.borrow();
            (content.id(), content.preferred_content_size())
        };
        let mut controller =
            PresentationController::new(content_id, configuration, dismissal_handler, self.tuning);

        controller.presentation_transition_will_begin();
        let target = controller.target_frame(&self.environment, preferred);
        controller.set_surface_frame(target);
        controller.apply_style(&mut *content.borrow_mut());

        let animator = TransitionAnimator::timed(
            TransitionKind::Presentation,
            target,
            self.container(),
            self.tuning.transition_duration,
            animated,
        );
        let frame = animator.frame();
        content.borrow_mut().set_frame(frame);

        tracing::debug!(host = self.id.0, presentation = id.0, content = content_id.0, animated, "presenting sheet");

        self.link.presented = Some(content_id);
        self.presentation = Some(Presentation {
            id,
            content_id,
            content,
            controller,
            animator: Some(animator),
            layout: None,
            frame,
            target,
            last_preferred_size: preferred,
            pan_active: false,
        });

        if !animated {
            self.settle_transition();
        }
        Some(id)
    }

    /// Dismiss `content`. Does nothing if it is not the presented sheet.
    ///
    /// A non-animated dismissal completes before this returns.
    pub fn dismiss(&mut self, content: ContentId, animated: bool) {
        let Some(presentation) = self.presentation.as_ref() else {
            tracing::debug!(host = self.id.0, content = content.0, "nothing presented, ignoring dismissal");
            return;
        };
        if presentation.content_id != content || !self.link.is_presented(content) {
            tracing::debug!(host = self.id.0, content = content.0, "content not presented, ignoring dismissal");
            return;
        }

        match presentation.controller.state() {
            PresentationState::Presenting => {
                self.settle_transition();
            }
            PresentationState::Dismissing => {
                if !animated {
                    self.complete_transition(TransitionOutcome { completed: true });
                }
                self.process_pending_dismissals();
                return;
            }
            PresentationState::Presented | PresentationState::Dismissed => {}
        }

        let container = self.container();
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        if presentation.controller.state() != PresentationState::Presented {
            return;
        }

        tracing::debug!(host = self.id.0, presentation = presentation.id.0, animated, "dismissing sheet");
        presentation.controller.dismissal_transition_will_begin();
        presentation.layout = None;
        let animator = TransitionAnimator::timed(
            TransitionKind::Dismissal,
            presentation.target,
            container,
            self.tuning.transition_duration,
            animated,
        );
        presentation.animator = Some(animator);

        if !animated {
            self.settle_transition();
        }
        self.process_pending_dismissals();
    }

    /// Ask the presented sheet's dismissal handler to dismiss it, if allowed.
    pub fn dismiss_if_possible(&mut self) -> bool {
        let Some(presentation) = self.presentation.as_mut() else {
            return false;
        };
        let dismissed = presentation.controller.dismiss_if_possible(&mut self.link);
        self.process_pending_dismissals();
        dismissed
    }

    // Input routing

    /// Offer a frame's gesture samples to the sheet; claimed samples leave the batch.
    pub fn handle_gestures(&mut self, batch: &mut GestureBatch) {
        batch.dispatch(|gesture| self.handle_pan(gesture));
    }

    /// Offer one sample of the sheet's pan recognizer.
    pub fn handle_pan(&mut self, gesture: &PanGesture) -> HandleStatus {
        profile_function!();

        let Some(presentation) = self.presentation.as_mut() else {
            return HandleStatus::ignored();
        };
        if presentation.controller.pan_recognizer() != Some(gesture.recognizer) {
            return HandleStatus::ignored();
        }

        match gesture.phase {
            GesturePhase::Began => {
                let location = Pos::from(gesture.location);
                let controller = &presentation.controller;
                let scroll_tracking = {
                    let mut content = presentation.content.borrow_mut();
                    content.scroll_view_mut().is_some_and(|scroll_view| {
                        controller.should_require_failure_of(scroll_view.state.pan_recognizer)
                            && scroll_view.state.is_tracking
                    })
                };

                if scroll_tracking
                    || !controller.should_receive_touch(location)
                    || !controller.gesture_should_begin(gesture)
                {
                    tracing::trace!(recognizer = gesture.recognizer.0, scroll_tracking, "sheet pan did not begin");
                    presentation.pan_active = false;
                    return HandleStatus::ignored();
                }
                presentation.pan_active = true;
            }
            GesturePhase::Changed | GesturePhase::Ended | GesturePhase::Cancelled => {
                if !presentation.pan_active {
                    return HandleStatus::ignored();
                }
                if gesture.phase.is_terminal() {
                    presentation.pan_active = false;
                }
            }
            GesturePhase::Possible | GesturePhase::Failed => {
                presentation.pan_active = false;
                return HandleStatus::ignored();
            }
        }

        presentation.controller.handle_pan(gesture);
        self.process_requests();
        HandleStatus::consumed()
    }

    /// Deliver a scroll view delegate callback through the content's scroll view.
    pub fn handle_scroll_event(&mut self, scroll_view: ScrollViewId, event: ScrollEvent) {
        profile_function!();

        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };

        {
            let Presentation {
                content, controller, ..
            } = presentation;
            let mut content = content.borrow_mut();
            let Some(view) = content.scroll_view_mut() else {
                return;
            };
            if view.id() != scroll_view {
                tracing::trace!(scroll_view = scroll_view.0, "scroll view is not part of the presented content");
                return;
            }

            let observer = controller.observer_id();
            view.send(&event, |id, state, event| {
                if id == observer {
                    controller.handle_scroll_event(state, event);
                }
            });
        }

        self.process_requests();
    }

    pub fn handle_navigation_event(&mut self, event: NavigationEvent) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        match event {
            NavigationEvent::WillShow => presentation.controller.navigation_will_show(),
            NavigationEvent::DidShow => presentation
                .controller
                .navigation_did_show(&mut *presentation.content.borrow_mut()),
        }
    }

    // Time

    /// Advance transitions and layout animations by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        profile_function!();

        if let Some(presentation) = self.presentation.as_mut() {
            let preferred = presentation.content.borrow().preferred_content_size();
            if preferred != presentation.last_preferred_size {
                tracing::debug!(
                    presentation = presentation.id.0,
                    width = preferred.width,
                    height = preferred.height,
                    "preferred content size changed"
                );
                presentation.last_preferred_size = preferred;
                presentation
                    .controller
                    .preferred_content_size_did_change(&self.environment, preferred);
            }
        }
        self.process_requests();

        let mut outcome = None;
        if let Some(presentation) = self.presentation.as_mut() {
            profile_scope!("animations");
            if let Some(animator) = presentation.animator.as_mut() {
                outcome = animator.advance(delta_time);
                let frame = animator.frame();
                presentation.set_frame(frame);
            } else if let Some(layout) = presentation.layout.as_mut() {
                let running = layout.update(delta_time);
                let frame = layout.frame();
                presentation.set_frame(frame);
                if !running {
                    presentation.layout = None;
                }
            }
        }

        if let Some(outcome) = outcome {
            self.complete_transition(outcome);
        }
        self.process_pending_dismissals();
    }

    // Internals

    fn container(&self) -> Rect<f32> {
        self.environment.container.unwrap_or(Rect::ZERO)
    }

    fn settle_transition(&mut self) {
        let outcome = self
            .presentation
            .as_mut()
            .and_then(|presentation| presentation.animator.as_mut())
            .map(|animator| animator.settle());
        if let Some(outcome) = outcome {
            self.complete_transition(outcome);
        }
    }

    fn complete_transition(&mut self, outcome: TransitionOutcome) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        let Some(animator) = presentation.animator.take() else {
            return;
        };
        let interactive = animator.is_interactive();

        match animator.kind() {
            TransitionKind::Presentation => {
                presentation
                    .controller
                    .presentation_transition_did_end(outcome.completed, &mut *presentation.content.borrow_mut());
                if outcome.completed {
                    let target = presentation.target;
                    presentation.set_frame(target);
                } else {
                    self.link.presented = None;
                    self.presentation = None;
                }
            }
            TransitionKind::Dismissal => {
                if outcome.completed {
                    // The sheet is gone before the handler hears about it, so
                    // completions observe a host that no longer presents it.
                    self.link.presented = None;
                    let Some(mut presentation) = self.presentation.take() else {
                        return;
                    };
                    tracing::debug!(host = self.id.0, presentation = presentation.id.0, "sheet dismissed");
                    presentation
                        .controller
                        .dismissal_transition_did_end(true, &mut *presentation.content.borrow_mut());
                    if interactive {
                        presentation
                            .controller
                            .interactive_dismissal_completed(&mut self.link);
                    }
                } else {
                    presentation
                        .controller
                        .dismissal_transition_did_end(false, &mut *presentation.content.borrow_mut());
                    let target = presentation.target;
                    presentation.set_frame(target);
                    if interactive {
                        presentation
                            .controller
                            .interactive_dismissal_completed(&mut self.link);
                    }
                }
            }
        }
    }

    fn process_requests(&mut self) {
        let container = self.container();
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };

        for request in presentation.controller.drain_requests() {
            match request {
                SheetRequest::BeginInteractiveDismissal { transition } => {
                    if presentation.controller.state() != PresentationState::Presented
                        || presentation.animator.is_some()
                    {
                        tracing::debug!(transition = transition.0, "cannot begin interactive dismissal now");
                        continue;
                    }
                    presentation.controller.dismissal_transition_will_begin();
                    presentation.layout = None;
                    presentation.animator = Some(TransitionAnimator::interactive_dismissal(
                        PercentDrivenTransition::with_id(transition),
                        presentation.target,
                        container,
                        self.tuning.transition_duration,
                    ));
                }
                SheetRequest::UpdateTransition { percent } => {
                    if let Some(animator) = presentation.animator.as_mut() {
                        animator.update_interactive(percent);
                        let frame = animator.frame();
                        presentation.set_frame(frame);
                    }
                }
                SheetRequest::FinishTransition => {
                    if let Some(animator) = presentation.animator.as_mut() {
                        animator.finish_interactive();
                    }
                }
                SheetRequest::CancelTransition => {
                    if let Some(animator) = presentation.animator.as_mut() {
                        animator.cancel_interactive();
                    }
                }
                SheetRequest::Layout { frame, animated } => {
                    if frame == presentation.target {
                        continue;
                    }
                    presentation.target = frame;
                    presentation.controller.set_surface_frame(frame);
                    if presentation.animator.is_some() {
                        continue;
                    }
                    if animated {
                        let duration = self.tuning.layout_animation_duration;
                        if let Some(layout) = presentation.layout.as_mut() {
                            layout.retarget(frame, duration, EasingFunction::EaseInOut);
                        } else {
                            presentation.layout = Some(FrameAnimation::new(
                                presentation.frame,
                                frame,
                                duration,
                                EasingFunction::EaseInOut,
                            ));
                        }
                    } else {
                        presentation.layout = None;
                        presentation.set_frame(frame);
                    }
                }
            }
        }
    }

    fn process_pending_dismissals(&mut self) {
        loop {
            let pending = std::mem::take(&mut self.link.pending);
            if pending.is_empty() {
                break;
            }
            for (content, animated) in pending {
                self.dismiss(content, animated);
            }
        }
    }
}

impl std::fmt::Debug for ModalPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalPresenter")
            .field("id", &self.id)
            .field("environment", &self.environment)
            .field("presented", &self.link.presented)
            .field("state", &self.presentation_state())
            .finish()
    }
}
