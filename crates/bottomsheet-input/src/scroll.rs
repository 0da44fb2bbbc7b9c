//! Scroll view state and multicast scroll delegation.
//!
//! Platform scroll views report to a single delegate. [`MulticastScrollDelegate`]
//! is the forwarding shim that fans each event out to an ordered list of
//! observers. Observers are either local callbacks or *forwarded* entries: the
//! latter are resolved by the caller of [`MulticastScrollDelegate::dispatch`],
//! which lets an owner that cannot be boxed into the list (the presentation
//! controller) still receive events in registration order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bottomsheet_core::alloc::IndexMap;
use bottomsheet_core::geometry::{EdgeInsets, Pos, Rect, Size};
use bottomsheet_core::math::{Vec2, is_almost_equal};

use crate::gesture::RecognizerId;

static SCROLL_VIEW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static OBSERVER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a scroll view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScrollViewId(pub u64);

impl ScrollViewId {
    pub fn new() -> Self {
        Self(SCROLL_VIEW_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for ScrollViewId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one registration in a [`MulticastScrollDelegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

impl ObserverId {
    pub fn new() -> Self {
        Self(OBSERVER_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest sample of the scroll view's own pan recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanSample {
    /// Cumulative translation since the drag began, in scroll view coordinates.
    pub translation: Vec2,
    /// Points per second.
    pub velocity: Vec2,
    /// Touch location in window coordinates.
    pub location: Vec2,
}

/// Scroll view state shared between the host and its observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    pub id: ScrollViewId,
    /// Recognizer that drives scrolling.
    pub pan_recognizer: RecognizerId,
    pub content_offset: Vec2,
    pub content_size: Size<f32>,
    pub frame: Rect<f32>,
    /// Content insets including any safe-area adjustment.
    pub adjusted_content_inset: EdgeInsets<f32>,
    /// A finger is down on the scroll view.
    pub is_tracking: bool,
    pub pan: PanSample,
}

impl ScrollState {
    pub fn new(frame: Rect<f32>, content_size: Size<f32>) -> Self {
        Self {
            id: ScrollViewId::new(),
            pan_recognizer: RecognizerId::new(),
            content_offset: Vec2::ZERO,
            content_size,
            frame,
            adjusted_content_inset: EdgeInsets::ZERO,
            is_tracking: false,
            pan: PanSample::default(),
        }
    }

    /// Offset at which the first row of content sits at the top inset.
    pub fn top_offset(&self) -> f32 {
        -self.adjusted_content_inset.top
    }

    /// The content is scrolled to (or pulled past) its top.
    pub fn is_content_origin_in_bounds(&self) -> bool {
        self.content_offset.y <= self.top_offset()
    }

    pub fn scrolls_up(&self) -> bool {
        self.pan.velocity.y < 0.0
    }

    pub fn scrolls_down(&self) -> bool {
        !self.scrolls_up()
    }

    /// The content exactly fills the visible height, so there is nothing to scroll.
    pub fn content_fits_frame(&self) -> bool {
        is_almost_equal(
            self.content_size.height,
            self.frame.height - self.adjusted_content_inset.vertical(),
        )
    }

    pub fn snap_to_top(&mut self) {
        self.content_offset.y = self.top_offset();
    }

    /// Touch location of the current drag, for hit-testing.
    pub fn touch_location(&self) -> Pos<f32> {
        self.pan.location.into()
    }
}

/// Events a scroll view reports to its delegate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    WillBeginDragging,
    DidScroll,
    WillEndDragging {
        /// Release velocity in points per second.
        velocity: Vec2,
    },
}

/// A local scroll observer.
pub trait ScrollObserver {
    fn scroll_event(&mut self, state: &mut ScrollState, event: &ScrollEvent);
}

impl<F> ScrollObserver for F
where
    F: FnMut(&mut ScrollState, &ScrollEvent),
{
    fn scroll_event(&mut self, state: &mut ScrollState, event: &ScrollEvent) {
        self(state, event)
    }
}

enum Registration {
    Local(Box<dyn ScrollObserver>),
    Forwarded,
}

/// Ordered fan-out of scroll events.
#[derive(Default)]
pub struct MulticastScrollDelegate {
    observers: IndexMap<ObserverId, Registration>,
}

impl MulticastScrollDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it receives events after every earlier registration.
    pub fn add_observer(&mut self, observer: impl ScrollObserver + 'static) -> ObserverId {
        let id = ObserverId::new();
        self.observers
            .insert(id, Registration::Local(Box::new(observer)));
        id
    }

    /// Register an observer that the dispatcher resolves by id.
    ///
    /// Registering the same id twice keeps the original position.
    pub fn add_forwarded(&mut self, id: ObserverId) {
        self.observers.entry(id).or_insert(Registration::Forwarded);
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        self.observers.shift_remove(&id).is_some()
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.observers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` to every observer in registration order.
    ///
    /// Forwarded registrations are handed to `forward`.
    pub fn dispatch<F>(&mut self, state: &mut ScrollState, event: &ScrollEvent, mut forward: F)
    where
        F: FnMut(ObserverId, &mut ScrollState, &ScrollEvent),
    {
        tracing::trace!(scroll_view = state.id.0, observers = self.observers.len(), ?event, "dispatch scroll event");
        for (id, registration) in self.observers.iter_mut() {
            match registration {
                Registration::Local(observer) => observer.scroll_event(state, event),
                Registration::Forwarded => forward(*id, state, event),
            }
        }
    }
}

impl fmt::Debug for MulticastScrollDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastScrollDelegate")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// A scroll view: its state plus the delegate fan-out.
#[derive(Debug)]
pub struct ScrollView {
    pub state: ScrollState,
    pub delegate: MulticastScrollDelegate,
}

impl ScrollView {
    pub fn new(frame: Rect<f32>, content_size: Size<f32>) -> Self {
        Self {
            state: ScrollState::new(frame, content_size),
            delegate: MulticastScrollDelegate::new(),
        }
    }

    pub fn id(&self) -> ScrollViewId {
        self.state.id
    }

    /// Deliver an event through the delegate.
    pub fn send<F>(&mut self, event: &ScrollEvent, forward: F)
    where
        F: FnMut(ObserverId, &mut ScrollState, &ScrollEvent),
    {
        let ScrollView { state, delegate } = self;
        delegate.dispatch(state, event, forward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn list_view() -> ScrollView {
        ScrollView::new(
            Rect::new(0.0, 0.0, 390.0, 400.0),
            Size::new(390.0, 1200.0),
        )
    }

    #[test]
    fn test_origin_in_bounds_respects_top_inset() {
        let mut view = list_view();
        view.state.adjusted_content_inset.top = 20.0;
        view.state.content_offset.y = -20.0;
        assert!(view.state.is_content_origin_in_bounds());
        view.state.content_offset.y = -19.0;
        assert!(!view.state.is_content_origin_in_bounds());
        view.state.snap_to_top();
        assert_eq!(view.state.content_offset.y, -20.0);
    }

    #[test]
    fn test_zero_velocity_counts_as_scrolling_down() {
        let mut view = list_view();
        assert!(view.state.scrolls_down());
        view.state.pan.velocity.y = -5.0;
        assert!(view.state.scrolls_up());
    }

    #[test]
    fn test_content_fits_frame() {
        let mut view = list_view();
        assert!(!view.state.content_fits_frame());
        view.state.content_size.height = 360.0;
        view.state.adjusted_content_inset = EdgeInsets::new(20.0, 0.0, 20.0, 0.0);
        assert!(view.state.content_fits_frame());
    }

    #[test]
    fn test_dispatch_preserves_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = list_view();

        let first = log.clone();
        view.delegate
            .add_observer(move |_: &mut ScrollState, _: &ScrollEvent| first.borrow_mut().push("local-1"));
        let forwarded = ObserverId::new();
        view.delegate.add_forwarded(forwarded);
        let second = log.clone();
        view.delegate
            .add_observer(move |_: &mut ScrollState, _: &ScrollEvent| second.borrow_mut().push("local-2"));

        let forward_log = log.clone();
        view.send(&ScrollEvent::DidScroll, |id, _, _| {
            assert_eq!(id, forwarded);
            forward_log.borrow_mut().push("forwarded");
        });

        assert_eq!(*log.borrow(), vec!["local-1", "forwarded", "local-2"]);
    }

    #[test]
    fn test_remove_observer() {
        let mut delegate = MulticastScrollDelegate::new();
        let id = ObserverId::new();
        delegate.add_forwarded(id);
        delegate.add_forwarded(id);
        assert_eq!(delegate.len(), 1);
        assert!(delegate.remove(id));
        assert!(!delegate.remove(id));
        assert!(delegate.is_empty());
    }

    #[test]
    fn test_observers_can_mutate_state() {
        let mut view = list_view();
        view.state.content_offset.y = 42.0;
        view.delegate
            .add_observer(|state: &mut ScrollState, _: &ScrollEvent| state.snap_to_top());
        view.send(&ScrollEvent::DidScroll, |_, _, _| {});
        assert_eq!(view.state.content_offset.y, 0.0);
    }
}
