//! The presentation controller.
//!
//! One controller exists per presentation. It owns the sheet's geometry, the
//! presentation state machine, the dismiss gesture and the cooperation with a
//! nested scroll view. It never touches the host directly: everything the host
//! has to do is queued as a [`SheetRequest`] and drained by the host after each
//! call.
//!
//! ```text
//! Dismissed --will_begin--> Presenting --did_end(true)--> Presented
//!     ^                         |                             |
//!     +------did_end(false)-----+                     dismissal_will_begin
//!     |                                                       v
//!     +--------------dismissal_did_end(true)-------------- Dismissing
//!                      Presented <--dismissal_did_end(false)--+
//! ```

use bottomsheet_core::geometry::{EdgeInsets, Pos, Rect, Size};
use bottomsheet_core::math::is_almost_equal;
use bottomsheet_core::profiling::profile_function;
use bottomsheet_input::{
    GesturePhase, ObserverId, PanGesture, RecognizerId, ScrollEvent, ScrollState, ScrollViewId,
};

use crate::configuration::{SheetConfiguration, SheetOrientation, SheetTuning};
use crate::error::ContractViolation;
use crate::host::{ContentId, DismissalHandler, DismissalHost, PresentedContent, SurfaceStyle};
use crate::interactive::{Decision, InteractionSession};
use crate::transition::TransitionId;

/// Presentation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationState {
    #[default]
    Dismissed,
    Presenting,
    Presented,
    Dismissing,
}

/// What the host knows about the space the sheet is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEnvironment {
    /// Bounds of the presentation container, if one exists.
    pub container: Option<Rect<f32>>,
    /// Bounds of the whole screen.
    pub screen: Size<f32>,
    /// Window safe area, once the surface is in a window.
    pub safe_area: Option<EdgeInsets<f32>>,
    /// Physical pixels per point.
    pub scale_factor: f32,
}

impl LayoutEnvironment {
    /// Environment whose container covers the whole screen.
    pub fn fullscreen(screen: Size<f32>, scale_factor: f32) -> Self {
        Self {
            container: Some(Rect::from_size(screen)),
            screen,
            safe_area: None,
            scale_factor,
        }
    }

    pub fn with_safe_area(mut self, safe_area: EdgeInsets<f32>) -> Self {
        self.safe_area = Some(safe_area);
        self
    }

    pub fn with_container(mut self, container: Rect<f32>) -> Self {
        self.container = Some(container);
        self
    }

    /// The same environment after a device rotation.
    pub fn rotated(&self) -> Self {
        let screen = Size::new(self.screen.height, self.screen.width);
        Self {
            container: self
                .container
                .map(|container| Rect::new(container.y, container.x, container.height, container.width)),
            screen,
            ..*self
        }
    }
}

/// Work the controller asks its host to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetRequest {
    /// Start an animated dismissal driven by the given transition.
    BeginInteractiveDismissal { transition: TransitionId },
    UpdateTransition { percent: f32 },
    FinishTransition,
    CancelTransition,
    /// Move the surface to `frame`.
    Layout { frame: Rect<f32>, animated: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedScrollView {
    view: ScrollViewId,
    recognizer: RecognizerId,
}

/// Drives one sheet presentation.
pub struct PresentationController {
    content: ContentId,
    state: PresentationState,
    configuration: SheetConfiguration,
    tuning: SheetTuning,
    dismissal_handler: Box<dyn DismissalHandler>,

    pan_recognizer: Option<RecognizerId>,
    observer: ObserverId,
    tracked_scroll_view: Option<TrackedScrollView>,

    surface_frame: Rect<f32>,
    cached_insets: EdgeInsets<f32>,

    session: Option<InteractionSession>,
    is_dragging: bool,
    is_navigation_transition_in_progress: bool,
    did_start_dragging: bool,
    scroll_view_translation: f32,
    translation_before_dragging: f32,

    requests: Vec<SheetRequest>,
}

impl PresentationController {
    pub fn new(
        content: ContentId,
        configuration: SheetConfiguration,
        dismissal_handler: Box<dyn DismissalHandler>,
        tuning: SheetTuning,
    ) -> Self {
        Self {
            content,
            state: PresentationState::Dismissed,
            configuration,
            tuning,
            dismissal_handler,
            pan_recognizer: None,
            observer: ObserverId::new(),
            tracked_scroll_view: None,
            surface_frame: Rect::ZERO,
            cached_insets: EdgeInsets::ZERO,
            session: None,
            is_dragging: false,
            is_navigation_transition_in_progress: false,
            did_start_dragging: false,
            scroll_view_translation: 0.0,
            translation_before_dragging: 0.0,
            requests: Vec::new(),
        }
    }

    pub fn content(&self) -> ContentId {
        self.content
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    pub fn configuration(&self) -> &SheetConfiguration {
        &self.configuration
    }

    pub fn tuning(&self) -> &SheetTuning {
        &self.tuning
    }

    /// The dismiss recognizer, attached once presentation completes.
    pub fn pan_recognizer(&self) -> Option<RecognizerId> {
        self.pan_recognizer
    }

    /// Id under which the controller observes the tracked scroll view.
    pub fn observer_id(&self) -> ObserverId {
        self.observer
    }

    pub fn tracked_scroll_view(&self) -> Option<ScrollViewId> {
        self.tracked_scroll_view.map(|tracked| tracked.view)
    }

    pub fn has_interaction(&self) -> bool {
        self.session.is_some()
    }

    pub fn interaction(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn is_navigation_transition_in_progress(&self) -> bool {
        self.is_navigation_transition_in_progress
    }

    /// Frame the surface was last laid out at; its height scales drag progress.
    pub fn surface_frame(&self) -> Rect<f32> {
        self.surface_frame
    }

    pub fn set_surface_frame(&mut self, frame: Rect<f32>) {
        self.surface_frame = frame;
    }

    /// Take every request queued since the last drain.
    pub fn drain_requests(&mut self) -> Vec<SheetRequest> {
        std::mem::take(&mut self.requests)
    }

    // Lifecycle

    pub fn presentation_transition_will_begin(&mut self) {
        self.set_state(PresentationState::Presenting);
    }

    pub fn presentation_transition_did_end(
        &mut self,
        completed: bool,
        content: &mut dyn PresentedContent,
    ) {
        if completed {
            self.pan_recognizer = Some(RecognizerId::new());
            self.track_scroll_view(content);
            self.set_state(PresentationState::Presented);
        } else {
            self.set_state(PresentationState::Dismissed);
        }
    }

    pub fn dismissal_transition_will_begin(&mut self) {
        self.set_state(PresentationState::Dismissing);
    }

    pub fn dismissal_transition_did_end(
        &mut self,
        completed: bool,
        content: &mut dyn PresentedContent,
    ) {
        if completed {
            self.stop_scroll_tracking(content);
            self.set_state(PresentationState::Dismissed);
            self.dismissal_handler.did_end_dismissal();
        } else {
            self.set_state(PresentationState::Presented);
        }
    }

    fn set_state(&mut self, state: PresentationState) {
        if self.state != state {
            tracing::debug!(content = self.content.0, from = ?self.state, to = ?state, "presentation state");
        }
        self.state = state;
    }

    // Geometry

    /// Frame of the presented surface inside the container.
    ///
    /// Portrait sheets span the container width and sit on the bottom edge of
    /// the screen; landscape sheets span the container height and sit on the
    /// right edge. The extent is the preferred height plus the bottom safe-area
    /// inset, limited to the screen, and every component is rounded up to the
    /// pixel grid.
    ///
    /// A landscape sheet whose configuration carries a landscape extent reads
    /// its extent from the preferred width instead, which is where drawers keep
    /// their landscape size.
    pub fn target_frame(&self, environment: &LayoutEnvironment, preferred: Size<f32>) -> Rect<f32> {
        profile_function!();

        let Some(container) = environment.container else {
            return Rect::ZERO;
        };

        let screen = environment.screen;
        let insets = environment.safe_area.unwrap_or(self.cached_insets);
        let orientation = self
            .configuration
            .orientation
            .unwrap_or_else(|| SheetOrientation::for_screen(screen));
        let content_extent = match orientation {
            SheetOrientation::Landscape if self.configuration.landscape_extent.is_some() => preferred.width,
            _ => preferred.height,
        };
        let preferred_extent = content_extent + insets.bottom;

        let frame = match orientation {
            SheetOrientation::Portrait => {
                let width = container.width;
                let height = preferred_extent.min(screen.height);
                Rect::new((container.width - width) / 2.0, screen.height - height, width, height)
            }
            SheetOrientation::Landscape => {
                let width = preferred_extent.min(screen.width);
                let height = container.height;
                Rect::new(screen.width - width, (container.height - height) / 2.0, width, height)
            }
        };

        frame.pixel_ceiled(environment.scale_factor)
    }

    /// The content asked for a new size; re-lay the sheet out animated.
    pub fn preferred_content_size_did_change(
        &mut self,
        environment: &LayoutEnvironment,
        preferred: Size<f32>,
    ) {
        self.update_surface_size(environment, preferred);
    }

    /// The container was laid out again (rotation, safe-area change).
    pub fn container_did_layout(&mut self, environment: &LayoutEnvironment, preferred: Size<f32>) {
        if let Some(safe_area) = environment.safe_area {
            self.cached_insets = safe_area;
        }
        self.update_surface_size(environment, preferred);
    }

    fn update_surface_size(&mut self, environment: &LayoutEnvironment, preferred: Size<f32>) {
        if environment.container.is_none() {
            tracing::trace!(content = self.content.0, "no container, skipping layout");
            return;
        }
        let frame = self.target_frame(environment, preferred);
        self.requests.push(SheetRequest::Layout {
            frame,
            animated: true,
        });
    }

    /// Round the top corners of the presented content.
    pub fn apply_style(&self, content: &mut dyn PresentedContent) {
        if !content.is_view_loaded() {
            ContractViolation::StyleBeforeViewLoaded.report();
            return;
        }
        content.apply_surface_style(SurfaceStyle::sheet(self.configuration.corner_radius));
    }

    /// The container only ever holds the presented surface.
    pub fn add_subview(&self) {
        ContractViolation::ContainerSubview.report();
    }

    // Dismiss gesture

    /// Only a downward drag on a presented sheet may start the dismiss gesture.
    pub fn gesture_should_begin(&self, gesture: &PanGesture) -> bool {
        self.state == PresentationState::Presented && gesture.translation.y > 0.0
    }

    /// `location` is in the presented surface's coordinate space.
    pub fn should_receive_touch(&self, location: Pos<f32>) -> bool {
        if let Some(region) = &self.configuration.gesture_intercept_region
            && region.contains(location)
        {
            return false;
        }
        !self.is_navigation_transition_in_progress
    }

    /// The sheet pan waits for the tracked scroll view's pan to fail.
    pub fn should_require_failure_of(&self, other: RecognizerId) -> bool {
        self.tracked_scroll_view
            .is_some_and(|tracked| tracked.recognizer == other)
    }

    pub fn handle_pan(&mut self, gesture: &PanGesture) {
        profile_function!();

        match gesture.phase {
            GesturePhase::Began => self.start_interactive_transition(),
            GesturePhase::Changed => self.update_interaction_progress(gesture.translation.y),
            GesturePhase::Ended => {
                self.end_interactive_transition(gesture.velocity.y, gesture.translation.y)
            }
            GesturePhase::Cancelled => self.cancel_interactive_transition(),
            GesturePhase::Possible | GesturePhase::Failed => {}
        }
    }

    fn start_interactive_transition(&mut self) {
        if self.session.is_some() {
            ContractViolation::InteractionReentered.report();
            return;
        }

        let transition = TransitionId::new();
        tracing::debug!(content = self.content.0, transition = transition.0, "interactive dismissal started");
        self.session = Some(InteractionSession::new(transition, self.tuning));
        self.requests
            .push(SheetRequest::BeginInteractiveDismissal { transition });
    }

    fn start_interactive_transition_if_needed(&mut self) {
        if self.session.is_none() {
            self.start_interactive_transition();
        }
    }

    fn update_interaction_progress(&mut self, vertical_translation: f32) {
        let height = self.surface_frame.height;
        if height <= 0.0 {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let progress = vertical_translation / height;
        session.coordinator.update(progress);
        self.requests
            .push(SheetRequest::UpdateTransition { percent: progress });
    }

    fn end_interactive_transition(&mut self, vertical_velocity: f32, vertical_translation: f32) {
        let Some(session) = self.session.take() else {
            return;
        };

        let decision = session.coordinator.decide(
            vertical_velocity,
            vertical_translation,
            self.surface_frame.height,
        );
        let decision = session
            .coordinator
            .resolve(decision, self.dismissal_handler.can_be_dismissed());

        self.requests.push(match decision {
            Decision::Finish => SheetRequest::FinishTransition,
            Decision::Cancel => SheetRequest::CancelTransition,
        });
    }

    fn cancel_interactive_transition(&mut self) {
        if self.session.take().is_some() {
            self.requests.push(SheetRequest::CancelTransition);
        }
    }

    /// The dismissal started by the dismiss gesture has settled.
    ///
    /// The handler's dismissal only runs when the host no longer presents this
    /// content; a cancelled drag, or a newer presentation of the same content,
    /// leaves it untouched.
    pub fn interactive_dismissal_completed(&mut self, host: &mut dyn DismissalHost) {
        if host.is_presented(self.content) {
            tracing::debug!(content = self.content.0, "content still presented, skipping dismissal handler");
            return;
        }
        self.dismissal_handler.perform_dismissal(host, true);
    }

    /// Dismiss through the handler when the sheet is presented and allowed to go.
    pub fn dismiss_if_possible(&mut self, host: &mut dyn DismissalHost) -> bool {
        let can_be_dismissed =
            self.state == PresentationState::Presented && self.dismissal_handler.can_be_dismissed();
        if can_be_dismissed {
            self.dismissal_handler.perform_dismissal(host, true);
        }
        can_be_dismissed
    }

    // Scroll cooperation

    fn track_scroll_view(&mut self, content: &mut dyn PresentedContent) {
        let Some(scroll_view) = content.scroll_view_mut() else {
            return;
        };

        scroll_view.delegate.add_forwarded(self.observer);
        self.tracked_scroll_view = Some(TrackedScrollView {
            view: scroll_view.id(),
            recognizer: scroll_view.state.pan_recognizer,
        });
        tracing::debug!(content = self.content.0, scroll_view = scroll_view.id().0, "tracking scroll view");
    }

    fn stop_scroll_tracking(&mut self, content: &mut dyn PresentedContent) {
        let Some(tracked) = self.tracked_scroll_view.take() else {
            return;
        };
        if let Some(scroll_view) = content.scroll_view_mut()
            && scroll_view.id() == tracked.view
        {
            scroll_view.delegate.remove(self.observer);
        }
    }

    /// Forwarded scroll view delegate callback.
    pub fn handle_scroll_event(&mut self, scroll: &mut ScrollState, event: &ScrollEvent) {
        profile_function!();

        if self.tracked_scroll_view.map(|tracked| tracked.view) != Some(scroll.id) {
            tracing::trace!(scroll_view = scroll.id.0, "event from untracked scroll view");
            return;
        }

        match event {
            ScrollEvent::WillBeginDragging => self.is_dragging = true,
            ScrollEvent::DidScroll => self.scroll_view_did_scroll(scroll),
            ScrollEvent::WillEndDragging { .. } => self.scroll_view_will_end_dragging(scroll),
        }
    }

    fn scroll_view_did_scroll(&mut self, scroll: &mut ScrollState) {
        if let Some(region) = &self.configuration.gesture_intercept_region {
            let touch = scroll.touch_location();
            let local = Pos::new(touch.x - self.surface_frame.x, touch.y - self.surface_frame.y);
            if region.contains(local) {
                return;
            }
        }

        if scroll.content_fits_frame() {
            scroll.snap_to_top();
        }

        let previous_translation = self.scroll_view_translation;
        self.scroll_view_translation = scroll.pan.translation.y;

        self.did_start_dragging = self.should_drag_overlay(scroll);
        if self.did_start_dragging {
            self.start_interactive_transition_if_needed();
            let overlay_translation = match self.session.as_mut() {
                Some(session) => {
                    session.overlay_translation +=
                        self.scroll_view_translation - previous_translation;
                    session.overlay_translation
                }
                None => return,
            };
            scroll.snap_to_top();
            self.update_interaction_progress(overlay_translation);
        } else {
            self.translation_before_dragging = scroll.pan.translation.y;
        }
    }

    fn scroll_view_will_end_dragging(&mut self, scroll: &ScrollState) {
        if self.did_start_dragging {
            let translation = scroll.pan.translation.y - self.translation_before_dragging;
            self.end_interactive_transition(scroll.pan.velocity.y, translation);
        } else {
            self.cancel_interactive_transition();
        }

        self.scroll_view_translation = 0.0;
        self.translation_before_dragging = 0.0;
        self.did_start_dragging = false;
        self.is_dragging = false;
    }

    fn should_drag_overlay(&self, scroll: &ScrollState) -> bool {
        let can_be_handled = self.is_dragging && !self.is_navigation_transition_in_progress;
        if !scroll.is_tracking || !can_be_handled {
            return false;
        }

        let at_top_moving_down = scroll.is_content_origin_in_bounds() && scroll.scrolls_down();
        match &self.session {
            Some(session) if !is_almost_equal(session.coordinator.percent_complete(), 0.0) => true,
            Some(_) => at_top_moving_down,
            None => self.state == PresentationState::Presented && at_top_moving_down,
        }
    }

    // Navigation

    /// A screen is about to be pushed or popped inside the presented content.
    pub fn navigation_will_show(&mut self) {
        self.is_navigation_transition_in_progress = true;
    }

    /// The new screen is visible; follow its scroll view instead.
    pub fn navigation_did_show(&mut self, content: &mut dyn PresentedContent) {
        if self.state == PresentationState::Presented {
            self.track_scroll_view(content);
        }
        self.is_navigation_transition_in_progress = false;
    }
}

impl std::fmt::Debug for PresentationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationController")
            .field("content", &self.content)
            .field("state", &self.state)
            .field("surface_frame", &self.surface_frame)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::InterceptRegion;
    use crate::host::DefaultDismissalHandler;
    use bottomsheet_core::math::Vec2;
    use bottomsheet_input::ScrollView;

    struct Content {
        id: ContentId,
        loaded: bool,
        style: Option<SurfaceStyle>,
        scroll: Option<ScrollView>,
    }

    impl Content {
        fn new() -> Self {
            Self {
                id: ContentId::new(),
                loaded: true,
                style: None,
                scroll: None,
            }
        }
    }

    impl PresentedContent for Content {
        fn id(&self) -> ContentId {
            self.id
        }

        fn preferred_content_size(&self) -> Size<f32> {
            Size::new(390.0, 300.0)
        }

        fn set_preferred_content_size(&mut self, _size: Size<f32>) {}

        fn is_view_loaded(&self) -> bool {
            self.loaded
        }

        fn apply_surface_style(&mut self, style: SurfaceStyle) {
            self.style = Some(style);
        }

        fn scroll_view_mut(&mut self) -> Option<&mut ScrollView> {
            self.scroll.as_mut()
        }
    }

    fn controller(content: &Content, configuration: SheetConfiguration) -> PresentationController {
        PresentationController::new(
            content.id,
            configuration,
            Box::new(DefaultDismissalHandler::new(content.id, || true, None)),
            SheetTuning::default(),
        )
    }

    fn presented(content: &mut Content) -> PresentationController {
        let mut controller = controller(content, SheetConfiguration::new());
        controller.presentation_transition_will_begin();
        controller.presentation_transition_did_end(true, content);
        controller.set_surface_frame(Rect::new(0.0, 244.0, 390.0, 600.0));
        controller
    }

    fn phone() -> LayoutEnvironment {
        LayoutEnvironment::fullscreen(Size::new(390.0, 844.0), 3.0)
    }

    #[test]
    fn test_lifecycle_and_rollbacks() {
        let mut content = Content::new();
        let mut controller = controller(&content, SheetConfiguration::new());
        assert_eq!(controller.state(), PresentationState::Dismissed);

        controller.presentation_transition_will_begin();
        assert_eq!(controller.state(), PresentationState::Presenting);
        controller.presentation_transition_did_end(false, &mut content);
        assert_eq!(controller.state(), PresentationState::Dismissed);
        assert_eq!(controller.pan_recognizer(), None);

        controller.presentation_transition_will_begin();
        controller.presentation_transition_did_end(true, &mut content);
        assert_eq!(controller.state(), PresentationState::Presented);
        assert!(controller.pan_recognizer().is_some());

        controller.dismissal_transition_will_begin();
        assert_eq!(controller.state(), PresentationState::Dismissing);
        controller.dismissal_transition_did_end(false, &mut content);
        assert_eq!(controller.state(), PresentationState::Presented);

        controller.dismissal_transition_will_begin();
        controller.dismissal_transition_did_end(true, &mut content);
        assert_eq!(controller.state(), PresentationState::Dismissed);
    }

    #[test]
    fn test_portrait_frame_anchors_to_screen_bottom() {
        let content = Content::new();
        let controller = controller(&content, SheetConfiguration::new());
        let environment = phone()
            .with_container(Rect::new(0.0, 0.0, 390.0, 700.0))
            .with_safe_area(EdgeInsets::new(47.0, 0.0, 34.0, 0.0));

        let frame = controller.target_frame(&environment, Size::new(390.0, 300.0));
        assert_eq!(frame, Rect::new(0.0, 510.0, 390.0, 334.0));
    }

    #[test]
    fn test_frame_is_limited_to_screen() {
        let content = Content::new();
        let controller = controller(&content, SheetConfiguration::new());
        let frame = controller.target_frame(&phone(), Size::new(390.0, 2000.0));
        assert_eq!(frame.height, 844.0);
        assert_eq!(frame.y, 0.0);
    }

    #[test]
    fn test_landscape_frame_is_right_aligned() {
        let content = Content::new();
        let controller = controller(
            &content,
            SheetConfiguration::new().orientation(SheetOrientation::Landscape),
        );
        let environment = LayoutEnvironment::fullscreen(Size::new(844.0, 390.0), 2.0);
        let frame = controller.target_frame(&environment, Size::new(400.0, 300.0));
        assert_eq!(frame, Rect::new(544.0, 0.0, 300.0, 390.0));
    }

    #[test]
    fn test_landscape_extent_drives_landscape_width() {
        let content = Content::new();
        let configuration = SheetConfiguration::new()
            .portrait_extent(500.0)
            .landscape_extent(300.0);
        let controller = controller(&content, configuration);
        let landscape = LayoutEnvironment::fullscreen(Size::new(844.0, 390.0), 2.0);
        let frame = controller.target_frame(&landscape, Size::new(300.0, 500.0));
        assert_eq!(frame, Rect::new(544.0, 0.0, 300.0, 390.0));

        // Portrait keeps reading the height.
        let frame = controller.target_frame(&phone(), Size::new(300.0, 500.0));
        assert_eq!(frame, Rect::new(0.0, 344.0, 390.0, 500.0));
    }

    #[test]
    fn test_orientation_follows_screen_when_unset() {
        let content = Content::new();
        let controller = controller(&content, SheetConfiguration::new());
        let environment = LayoutEnvironment::fullscreen(Size::new(844.0, 390.0), 2.0);
        let frame = controller.target_frame(&environment, Size::new(400.0, 300.0));
        assert_eq!(frame.x, 544.0);
        assert_eq!(frame.height, 390.0);
    }

    #[test]
    fn test_frame_is_pixel_ceiled() {
        let content = Content::new();
        let controller = controller(&content, SheetConfiguration::new());
        let frame = controller.target_frame(&phone(), Size::new(390.0, 123.3));
        assert!((frame.height - 370.0 / 3.0).abs() < 1e-3);
        assert!(frame.height >= 123.3);
    }

    #[test]
    fn test_no_container_gives_zero_frame() {
        let content = Content::new();
        let mut controller = controller(&content, SheetConfiguration::new());
        let environment = LayoutEnvironment {
            container: None,
            ..phone()
        };
        assert_eq!(controller.target_frame(&environment, Size::new(390.0, 300.0)), Rect::ZERO);
        controller.preferred_content_size_did_change(&environment, Size::new(390.0, 300.0));
        assert!(controller.drain_requests().is_empty());
    }

    #[test]
    fn test_container_layout_caches_safe_area() {
        let content = Content::new();
        let mut controller = controller(&content, SheetConfiguration::new());
        let with_insets = phone().with_safe_area(EdgeInsets::new(0.0, 0.0, 34.0, 0.0));
        controller.container_did_layout(&with_insets, Size::new(390.0, 300.0));
        assert_eq!(
            controller.drain_requests(),
            vec![SheetRequest::Layout {
                frame: Rect::new(0.0, 510.0, 390.0, 334.0),
                animated: true
            }]
        );

        // Without a window the cached inset still applies.
        let frame = controller.target_frame(&phone(), Size::new(390.0, 300.0));
        assert_eq!(frame.height, 334.0);
    }

    #[test]
    fn test_apply_style() {
        let mut content = Content::new();
        let controller = controller(&content, SheetConfiguration::new().corner_radius(16.0));
        controller.apply_style(&mut content);
        assert_eq!(content.style, Some(SurfaceStyle::sheet(16.0)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Style applied before")]
    fn test_style_before_view_loaded_is_fatal() {
        let mut content = Content::new();
        content.loaded = false;
        let controller = controller(&content, SheetConfiguration::new());
        controller.apply_style(&mut content);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Subviews must not be added")]
    fn test_add_subview_is_fatal() {
        let content = Content::new();
        controller(&content, SheetConfiguration::new()).add_subview();
    }

    #[test]
    fn test_gesture_begins_only_downward_when_presented() {
        let mut content = Content::new();
        let mut controller = controller(&content, SheetConfiguration::new());
        let recognizer = RecognizerId::new();
        let down = PanGesture::new(recognizer, GesturePhase::Began)
            .with_translation(Vec2::new(0.0, 4.0));
        let up = PanGesture::new(recognizer, GesturePhase::Began)
            .with_translation(Vec2::new(0.0, -4.0));

        assert!(!controller.gesture_should_begin(&down));
        controller.presentation_transition_will_begin();
        controller.presentation_transition_did_end(true, &mut content);
        assert!(controller.gesture_should_begin(&down));
        assert!(!controller.gesture_should_begin(&up));
    }

    #[test]
    fn test_intercept_region_rejects_touches() {
        let content = Content::new();
        let region = InterceptRegion::new(Rect::new(0.0, 0.0, 390.0, 60.0));
        let mut controller = controller(
            &content,
            SheetConfiguration::new().gesture_intercept_region(region),
        );
        assert!(!controller.should_receive_touch(Pos::new(100.0, 30.0)));
        assert!(controller.should_receive_touch(Pos::new(100.0, 200.0)));

        controller.navigation_will_show();
        assert!(!controller.should_receive_touch(Pos::new(100.0, 200.0)));
    }

    #[test]
    fn test_pan_drag_and_release() {
        let mut content = Content::new();
        let mut controller = presented(&mut content);
        let recognizer = RecognizerId::new();

        controller.handle_pan(&PanGesture::new(recognizer, GesturePhase::Began));
        let requests = controller.drain_requests();
        assert!(matches!(
            requests.as_slice(),
            [SheetRequest::BeginInteractiveDismissal { .. }]
        ));

        controller.handle_pan(
            &PanGesture::new(recognizer, GesturePhase::Changed)
                .with_translation(Vec2::new(0.0, 150.0)),
        );
        assert_eq!(
            controller.drain_requests(),
            vec![SheetRequest::UpdateTransition { percent: 0.25 }]
        );

        controller.handle_pan(
            &PanGesture::new(recognizer, GesturePhase::Ended)
                .with_translation(Vec2::new(0.0, 400.0)),
        );
        assert_eq!(controller.drain_requests(), vec![SheetRequest::FinishTransition]);
        assert!(!controller.has_interaction());
    }

    #[test]
    fn test_pan_cancel_always_cancels() {
        let mut content = Content::new();
        let mut controller = presented(&mut content);
        let recognizer = RecognizerId::new();
        controller.handle_pan(&PanGesture::new(recognizer, GesturePhase::Began));
        controller.handle_pan(
            &PanGesture::new(recognizer, GesturePhase::Cancelled)
                .with_translation(Vec2::new(0.0, 590.0)),
        );
        let requests = controller.drain_requests();
        assert_eq!(requests.last(), Some(&SheetRequest::CancelTransition));
    }

    #[test]
    fn test_refused_dismissal_cancels() {
        let mut content = Content::new();
        let mut controller = PresentationController::new(
            content.id,
            SheetConfiguration::new(),
            Box::new(DefaultDismissalHandler::new(content.id, || false, None)),
            SheetTuning::default(),
        );
        controller.presentation_transition_will_begin();
        controller.presentation_transition_did_end(true, &mut content);
        controller.set_surface_frame(Rect::new(0.0, 244.0, 390.0, 600.0));

        let recognizer = RecognizerId::new();
        controller.handle_pan(&PanGesture::new(recognizer, GesturePhase::Began));
        controller.handle_pan(
            &PanGesture::new(recognizer, GesturePhase::Ended)
                .with_translation(Vec2::new(0.0, 500.0)),
        );
        assert_eq!(
            controller.drain_requests().last(),
            Some(&SheetRequest::CancelTransition)
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Interactive transition started")]
    fn test_reentering_interaction_is_fatal() {
        let mut content = Content::new();
        let mut controller = presented(&mut content);
        let recognizer = RecognizerId::new();
        controller.handle_pan(&PanGesture::new(recognizer, GesturePhase::Began));
        controller.handle_pan(&PanGesture::new(recognizer, GesturePhase::Began));
    }

    #[test]
    fn test_scroll_view_is_tracked_and_released() {
        let mut content = Content::new();
        content.scroll = Some(ScrollView::new(
            Rect::new(0.0, 0.0, 390.0, 600.0),
            Size::new(390.0, 1200.0),
        ));
        let mut controller = presented(&mut content);
        let scroll_view = content.scroll.as_ref().map(|view| view.id());
        assert_eq!(controller.tracked_scroll_view(), scroll_view);
        assert!(content.scroll.as_ref().is_some_and(|view| view.delegate.contains(controller.observer_id())));
        let scroll_pan = content.scroll.as_ref().map(|view| view.state.pan_recognizer);
        assert!(scroll_pan.is_some_and(|recognizer| controller.should_require_failure_of(recognizer)));

        controller.dismissal_transition_will_begin();
        controller.dismissal_transition_did_end(true, &mut content);
        assert_eq!(controller.tracked_scroll_view(), None);
        assert!(content.scroll.as_ref().is_some_and(|view| view.delegate.is_empty()));
    }

    #[test]
    fn test_dismiss_if_possible_requires_presented_state() {
        struct Host(Vec<ContentId>);
        impl DismissalHost for Host {
            fn dismiss(&mut self, content: ContentId, _animated: bool) {
                self.0.push(content);
            }
            fn is_presented(&self, _content: ContentId) -> bool {
                true
            }
        }

        let mut content = Content::new();
        let mut controller = controller(&content, SheetConfiguration::new());
        let mut host = Host(Vec::new());
        assert!(!controller.dismiss_if_possible(&mut host));

        controller.presentation_transition_will_begin();
        controller.presentation_transition_did_end(true, &mut content);
        assert!(controller.dismiss_if_possible(&mut host));
        assert_eq!(host.0, vec![content.id]);
    }
}
