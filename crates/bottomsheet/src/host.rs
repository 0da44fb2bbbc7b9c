//! Interfaces between the engine and the content it presents.
//!
//! The presented content is shared between the caller (which keeps a handle
//! to resize it or push navigation screens) and the presenter, so it lives
//! behind a [`ContentHandle`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use bottomsheet_core::geometry::{Rect, Size};
use bottomsheet_input::ScrollView;

static CONTENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a piece of presentable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub u64);

impl ContentId {
    pub fn new() -> Self {
        Self(CONTENT_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

bitflags! {
    /// Corners that receive the corner radius.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaskedCorners: u8 {
        const TOP_LEFT = 0b0001;
        const TOP_RIGHT = 0b0010;
        const BOTTOM_LEFT = 0b0100;
        const BOTTOM_RIGHT = 0b1000;
    }
}

/// Visual treatment of the presented surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub corner_radius: f32,
    pub masked_corners: MaskedCorners,
    pub clips_to_bounds: bool,
}

impl SurfaceStyle {
    /// Rounded top corners, clipped content.
    pub fn sheet(corner_radius: f32) -> Self {
        Self {
            corner_radius,
            masked_corners: MaskedCorners::TOP_LEFT | MaskedCorners::TOP_RIGHT,
            clips_to_bounds: true,
        }
    }
}

/// Content that can be presented in a sheet.
pub trait PresentedContent {
    fn id(&self) -> ContentId;

    /// Size the content asks for. The sheet height follows its `height`.
    fn preferred_content_size(&self) -> Size<f32>;

    fn set_preferred_content_size(&mut self, size: Size<f32>);

    /// Style may only be applied once the content's view exists.
    fn is_view_loaded(&self) -> bool;

    fn apply_surface_style(&mut self, style: SurfaceStyle);

    /// Scroll view of the visible screen, for nested scroll cooperation.
    ///
    /// Content that wraps a navigation stack returns the scroll view of the
    /// top screen.
    fn scroll_view_mut(&mut self) -> Option<&mut ScrollView> {
        None
    }

    /// Called whenever the presenter moves or resizes the surface.
    fn set_frame(&mut self, _frame: Rect<f32>) {}
}

/// Shared handle to presented content.
pub type ContentHandle = Rc<RefCell<dyn PresentedContent>>;

/// Wrap content in a [`ContentHandle`].
pub fn content_handle<C: PresentedContent + 'static>(content: C) -> ContentHandle {
    Rc::new(RefCell::new(content))
}

/// The side that owns the modal presentation.
pub trait DismissalHost {
    /// Dismiss `content` if it is currently presented.
    fn dismiss(&mut self, content: ContentId, animated: bool);

    /// Whether `content` is still the presented surface.
    fn is_presented(&self, content: ContentId) -> bool;
}

/// Decides whether and how a sheet goes away.
pub trait DismissalHandler {
    /// Evaluated each time a dismissal is about to commit.
    fn can_be_dismissed(&self) -> bool;

    fn perform_dismissal(&mut self, host: &mut dyn DismissalHost, animated: bool);

    /// The dismissal transition completed.
    fn did_end_dismissal(&mut self);
}

/// Handler built from a permission closure and an optional completion.
pub struct DefaultDismissalHandler {
    content: ContentId,
    can_be_dismissed: Box<dyn Fn() -> bool>,
    completion: Option<Box<dyn FnOnce()>>,
}

impl DefaultDismissalHandler {
    pub fn new(
        content: ContentId,
        can_be_dismissed: impl Fn() -> bool + 'static,
        completion: Option<Box<dyn FnOnce()>>,
    ) -> Self {
        Self {
            content,
            can_be_dismissed: Box::new(can_be_dismissed),
            completion,
        }
    }
}

impl DismissalHandler for DefaultDismissalHandler {
    fn can_be_dismissed(&self) -> bool {
        (self.can_be_dismissed)()
    }

    fn perform_dismissal(&mut self, host: &mut dyn DismissalHost, animated: bool) {
        host.dismiss(self.content, animated);
    }

    fn did_end_dismissal(&mut self) {
        if let Some(completion) = self.completion.take() {
            completion();
        }
    }
}

impl fmt::Debug for DefaultDismissalHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultDismissalHandler")
            .field("content", &self.content)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}
