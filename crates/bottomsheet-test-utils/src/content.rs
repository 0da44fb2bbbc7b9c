//! Mock presented content.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use bottomsheet::host::{ContentHandle, ContentId, PresentedContent, SurfaceStyle};
use bottomsheet_core::geometry::{Rect, Size};
use bottomsheet_input::{ScrollView, ScrollViewId};
use parking_lot::Mutex;

/// Records a call made on [`MockContent`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentCall {
    SetPreferredContentSize(Size<f32>),
    ApplySurfaceStyle(SurfaceStyle),
    SetFrame(Rect<f32>),
}

/// Content that records what the engine does to it.
pub struct MockContent {
    id: ContentId,
    preferred_content_size: Size<f32>,
    view_loaded: bool,
    scroll_view: Option<ScrollView>,
    calls: Arc<Mutex<Vec<ContentCall>>>,
}

impl MockContent {
    /// Content asking for `height` points, full phone width.
    pub fn new(height: f32) -> Self {
        Self {
            id: ContentId::new(),
            preferred_content_size: Size::new(390.0, height),
            view_loaded: true,
            scroll_view: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Embed a scroll view with the given visible frame and content size.
    pub fn with_scroll_view(mut self, frame: Rect<f32>, content_size: Size<f32>) -> Self {
        self.scroll_view = Some(ScrollView::new(frame, content_size));
        self
    }

    /// Content whose view has not been loaded yet.
    pub fn unloaded(mut self) -> Self {
        self.view_loaded = false;
        self
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Swap the embedded scroll view, as a navigation push would.
    pub fn replace_scroll_view(&mut self, scroll_view: Option<ScrollView>) {
        self.scroll_view = scroll_view;
    }

    pub fn into_handle(self) -> MockContentHandle {
        let id = self.id;
        let calls = Arc::clone(&self.calls);
        MockContentHandle {
            id,
            content: Rc::new(RefCell::new(self)),
            calls,
        }
    }
}

impl PresentedContent for MockContent {
    fn id(&self) -> ContentId {
        self.id
    }

    fn preferred_content_size(&self) -> Size<f32> {
        self.preferred_content_size
    }

    fn set_preferred_content_size(&mut self, size: Size<f32>) {
        self.calls.lock().push(ContentCall::SetPreferredContentSize(size));
        self.preferred_content_size = size;
    }

    fn is_view_loaded(&self) -> bool {
        self.view_loaded
    }

    fn apply_surface_style(&mut self, style: SurfaceStyle) {
        self.calls.lock().push(ContentCall::ApplySurfaceStyle(style));
    }

    fn scroll_view_mut(&mut self) -> Option<&mut ScrollView> {
        self.scroll_view.as_mut()
    }

    fn set_frame(&mut self, frame: Rect<f32>) {
        self.calls.lock().push(ContentCall::SetFrame(frame));
    }
}

/// Shared handle to a [`MockContent`] plus its call log.
#[derive(Clone)]
pub struct MockContentHandle {
    id: ContentId,
    content: Rc<RefCell<MockContent>>,
    calls: Arc<Mutex<Vec<ContentCall>>>,
}

impl MockContentHandle {
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Handle to pass to the engine.
    pub fn handle(&self) -> ContentHandle {
        self.content.clone()
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<ContentCall> {
        self.calls.lock().clone()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn count_style_applications(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, ContentCall::ApplySurfaceStyle(_)))
            .count()
    }

    pub fn last_style(&self) -> Option<SurfaceStyle> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            ContentCall::ApplySurfaceStyle(style) => Some(*style),
            _ => None,
        })
    }

    /// Preferred sizes pushed by the engine, oldest first.
    pub fn preferred_size_updates(&self) -> Vec<Size<f32>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ContentCall::SetPreferredContentSize(size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    pub fn preferred_content_size(&self) -> Size<f32> {
        self.content.borrow().preferred_content_size
    }

    /// Resize the content from the application side.
    pub fn set_preferred_content_size(&self, size: Size<f32>) {
        self.content.borrow_mut().preferred_content_size = size;
    }

    pub fn last_frame(&self) -> Option<Rect<f32>> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            ContentCall::SetFrame(frame) => Some(*frame),
            _ => None,
        })
    }

    pub fn scroll_view_id(&self) -> Option<ScrollViewId> {
        self.content
            .borrow()
            .scroll_view
            .as_ref()
            .map(|scroll_view| scroll_view.id())
    }

    /// Run `f` against the embedded scroll view.
    ///
    /// # Panics
    ///
    /// Panics if the content has no scroll view.
    pub fn with_scroll_view<R>(&self, f: impl FnOnce(&mut ScrollView) -> R) -> R {
        let mut content = self.content.borrow_mut();
        let scroll_view = content
            .scroll_view
            .as_mut()
            .expect("mock content has no scroll view");
        f(scroll_view)
    }

    pub fn replace_scroll_view(&self, scroll_view: Option<ScrollView>) {
        self.content.borrow_mut().replace_scroll_view(scroll_view);
    }
}
