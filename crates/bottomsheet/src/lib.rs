//! Bottom sheet and drawer presentation engine.
//!
//! A sheet is a secondary surface that slides in from the bottom edge (or the
//! right edge in landscape), can be dragged down to dismiss, cooperates with a
//! scroll view embedded in it and resizes when its content asks for a new size
//! or the device rotates.
//!
//! The pieces, leaves first:
//! - [`interactive`]: maps a drag onto a cancellable transition and decides
//!   commit or cancel on release
//! - [`presentation`]: the per-presentation state machine, geometry, dismiss
//!   gesture and scroll cooperation
//! - [`presenter`]: the modal host that runs transitions and routes input
//! - [`drawer`]: keeps at most one drawer open and re-presents it on rotation
//!
//! # Quick start
//!
//! ```
//! use bottomsheet::prelude::*;
//! use bottomsheet_core::geometry::Size;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Menu {
//!     id: ContentId,
//!     size: Size<f32>,
//! }
//!
//! impl PresentedContent for Menu {
//!     fn id(&self) -> ContentId { self.id }
//!     fn preferred_content_size(&self) -> Size<f32> { self.size }
//!     fn set_preferred_content_size(&mut self, size: Size<f32>) { self.size = size; }
//!     fn is_view_loaded(&self) -> bool { true }
//!     fn apply_surface_style(&mut self, _style: SurfaceStyle) {}
//! }
//!
//! let notifier = OrientationNotifier::new();
//! let mut presenter = ModalPresenter::new(LayoutEnvironment::fullscreen(Size::new(390.0, 844.0), 3.0));
//! let mut drawers = DrawerManager::new(&presenter, notifier.subscribe());
//!
//! let menu: ContentHandle = Rc::new(RefCell::new(Menu { id: ContentId::new(), size: Size::ZERO }));
//! drawers.present_drawer(&mut presenter, menu, SheetConfiguration::drawer_default(), None);
//! assert_eq!(drawers.drawer_state(), DrawerState::Opened);
//!
//! // Once per frame.
//! presenter.update(1.0 / 60.0);
//! drawers.update(&mut presenter);
//! ```

pub mod animation;
pub mod configuration;
pub mod drawer;
pub mod error;
pub mod host;
pub mod interactive;
pub mod orientation;
pub mod presentation;
pub mod presenter;
pub mod transition;

pub use configuration::{
    DrawerSize, Extents, InterceptRegion, SheetConfiguration, SheetOrientation, SheetTuning, Sizing,
    resolve_extents,
};
pub use drawer::{DrawerDelegate, DrawerManager, DrawerState};
pub use error::ContractViolation;
pub use host::{
    ContentHandle, ContentId, DefaultDismissalHandler, DismissalHandler, DismissalHost,
    MaskedCorners, PresentedContent, SurfaceStyle, content_handle,
};
pub use interactive::{Decision, InteractionSession, InteractiveTransitionCoordinator, projected_progress};
pub use orientation::{DeviceOrientation, OrientationNotifier, OrientationSubscription};
pub use presentation::{LayoutEnvironment, PresentationController, PresentationState, SheetRequest};
pub use presenter::{HostId, ModalPresenter, NavigationEvent, PresentationId};
pub use transition::{PercentDrivenTransition, TransitionAnimator, TransitionId, TransitionOutcome};

/// Commonly used types.
pub mod prelude {
    pub use crate::configuration::{DrawerSize, SheetConfiguration, SheetOrientation};
    pub use crate::drawer::{DrawerManager, DrawerState};
    pub use crate::host::{ContentHandle, ContentId, PresentedContent, SurfaceStyle};
    pub use crate::orientation::{DeviceOrientation, OrientationNotifier};
    pub use crate::presentation::LayoutEnvironment;
    pub use crate::presenter::{ModalPresenter, NavigationEvent};
}
