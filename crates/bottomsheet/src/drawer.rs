//! Drawer lifecycle management.
//!
//! A [`DrawerManager`] keeps at most one drawer open on its presenter. It
//! remembers the drawer's sizing, re-presents the drawer when the device
//! rotates and reports the logical open/closed state to a delegate.
//!
//! Dismissal completions arrive from the presenter after the fact. Each one is
//! tagged with the [`PresentationId`] it belongs to, so completions of a
//! presentation that was already replaced (by a rotation, or by a newer
//! drawer) are dropped instead of closing the current drawer.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bottomsheet_core::geometry::Size;

use crate::configuration::{DrawerSize, Extents, SheetConfiguration, resolve_extents};
use crate::host::{ContentHandle, ContentId};
use crate::orientation::OrientationSubscription;
use crate::presentation::PresentationState;
use crate::presenter::{HostId, ModalPresenter, PresentationId};

/// Logical drawer state surfaced to application code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawerState {
    Opened,
    #[default]
    Closed,
}

/// Observer of [`DrawerState`] changes.
pub trait DrawerDelegate {
    fn drawer_state_did_change(&mut self, state: DrawerState);
}

impl<F> DrawerDelegate for F
where
    F: FnMut(DrawerState),
{
    fn drawer_state_did_change(&mut self, state: DrawerState) {
        self(state)
    }
}

/// Why a drawer is being (re)presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenReason {
    /// A caller asked for a drawer.
    Regular,
    /// The same drawer continues after a rotation.
    OrientationChange,
}

struct ActiveDrawer {
    content: ContentHandle,
    content_id: ContentId,
    configuration: SheetConfiguration,
    on_dismiss: Option<Box<dyn FnOnce()>>,
    generation: PresentationId,
}

/// Shared between the manager and the dismissal completions it hands out.
type DismissalInbox = Rc<RefCell<Vec<PresentationId>>>;

/// Tracks the single active drawer of one presenter.
pub struct DrawerManager {
    host: HostId,
    orientation: OrientationSubscription,
    active: Option<ActiveDrawer>,
    configuration: SheetConfiguration,
    extents: Extents,
    state: DrawerState,
    delegate: Option<Box<dyn DrawerDelegate>>,
    dismissed: DismissalInbox,
}

impl DrawerManager {
    /// Bind a manager to `host`, following rotations through `orientation`.
    ///
    /// Dropping the manager drops the subscription.
    pub fn new(host: &ModalPresenter, orientation: OrientationSubscription) -> Self {
        Self {
            host: host.id(),
            orientation,
            active: None,
            configuration: SheetConfiguration::drawer_default(),
            extents: Extents::ZERO,
            state: DrawerState::Closed,
            delegate: None,
            dismissed: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn drawer_state(&self) -> DrawerState {
        self.state
    }

    pub fn set_delegate(&mut self, delegate: impl DrawerDelegate + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Content of the active drawer.
    pub fn active_content(&self) -> Option<ContentId> {
        self.active.as_ref().map(|active| active.content_id)
    }

    /// Configuration the active drawer was presented with.
    pub fn active_configuration(&self) -> Option<&SheetConfiguration> {
        self.active.as_ref().map(|active| &active.configuration)
    }

    /// Stored configuration; sizing fields reflect the last request.
    pub fn configuration(&self) -> &SheetConfiguration {
        &self.configuration
    }

    /// Resolved extents.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Present `content` as the drawer, replacing any drawer already open.
    ///
    /// The replaced drawer is torn down without animation and its `on_dismiss`
    /// runs. `on_dismiss` runs once this drawer is closed for good.
    pub fn present_drawer(
        &mut self,
        host: &mut ModalPresenter,
        content: ContentHandle,
        configuration: SheetConfiguration,
        on_dismiss: Option<Box<dyn FnOnce()>>,
    ) {
        if !self.is_bound_to(host) {
            return;
        }

        self.configuration = configuration;
        self.extents = resolve_extents(
            &self.configuration.sizing(),
            host.environment().screen,
            self.extents,
        );
        self.open_drawer(host, content, on_dismiss, OpenReason::Regular);
    }

    /// Re-present the active drawer with its sizing resolved for the new screen.
    pub fn orientation_did_change(&mut self, host: &mut ModalPresenter) {
        if !self.is_bound_to(host) {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            tracing::trace!("no active drawer, ignoring orientation change");
            return;
        };
        if Self::is_leaving(host, active.generation) {
            // Its completion closes the drawer.
            tracing::debug!(presentation = active.generation.0, "drawer is being dismissed, ignoring orientation change");
            return;
        }

        let content = active.content.clone();
        let on_dismiss = active.on_dismiss.take();
        self.extents = resolve_extents(
            &self.configuration.sizing(),
            host.environment().screen,
            self.extents,
        );
        self.open_drawer(host, content, on_dismiss, OpenReason::OrientationChange);
    }

    /// Update the stored sizing.
    ///
    /// Explicit extents win over `size`; axes left unset keep their previous value.
    pub fn set_drawer_size(
        &mut self,
        screen: Size<f32>,
        portrait_extent: Option<f32>,
        landscape_extent: Option<f32>,
        size: Option<DrawerSize>,
    ) {
        if let Some(extent) = portrait_extent {
            self.configuration.portrait_extent = Some(extent);
        }
        if let Some(extent) = landscape_extent {
            self.configuration.landscape_extent = Some(extent);
        }
        if let Some(size) = size {
            self.configuration.size_preset = Some(size);
        }
        self.extents = resolve_extents(&self.configuration.sizing(), screen, self.extents);
    }

    /// Change the drawer's extents; the active drawer animates to its new size.
    ///
    /// The preferred size pushed to the content carries the portrait extent as
    /// its height and the landscape extent as its width.
    pub fn refresh_size(&mut self, portrait_extent: Option<f32>, landscape_extent: Option<f32>) {
        if let Some(extent) = portrait_extent {
            self.configuration.portrait_extent = Some(extent);
            self.extents.portrait = extent;
        }
        if let Some(extent) = landscape_extent {
            self.configuration.landscape_extent = Some(extent);
            self.extents.landscape = extent;
        }

        if portrait_extent.is_none() && landscape_extent.is_none() {
            return;
        }
        let size = self.preferred_size();
        if let Some(active) = self.active.as_mut() {
            active.configuration = active.configuration.with_extents(self.extents);
            active.content.borrow_mut().set_preferred_content_size(size);
        }
    }

    /// Close the active drawer.
    ///
    /// With `dispose_drawer` the drawer is forgotten, the state becomes
    /// [`DrawerState::Closed`] and `on_dismiss` runs. Without it the surface
    /// goes away but the drawer stays active, which is how a rotation replaces
    /// it.
    pub fn close_active_drawer(
        &mut self,
        host: &mut ModalPresenter,
        animated: bool,
        dispose_drawer: bool,
    ) {
        if !self.is_bound_to(host) {
            return;
        }
        let Some(active) = self.active.as_ref() else {
            tracing::trace!("no active drawer to close");
            return;
        };

        tracing::debug!(content = active.content_id.0, animated, dispose_drawer, "closing drawer");
        host.dismiss(active.content_id, animated);
        if dispose_drawer {
            self.dispose_active_drawer();
        }
    }

    /// Handle dismissal completions and rotations delivered since the last call.
    ///
    /// Completions go first: a drawer the user already dismissed is closed
    /// rather than re-presented for the new orientation.
    pub fn update(&mut self, host: &mut ModalPresenter) {
        let dismissed = std::mem::take(&mut *self.dismissed.borrow_mut());
        for generation in dismissed {
            let is_current = self
                .active
                .as_ref()
                .is_some_and(|active| active.generation == generation);
            if is_current {
                tracing::debug!(presentation = generation.0, "drawer dismissed by the user");
                self.close_active_drawer(host, true, true);
            } else {
                tracing::trace!(presentation = generation.0, "ignoring completion of a replaced drawer");
            }
        }

        if !self.orientation.drain().is_empty() {
            self.orientation_did_change(host);
        }
    }

    fn open_drawer(
        &mut self,
        host: &mut ModalPresenter,
        content: ContentHandle,
        on_dismiss: Option<Box<dyn FnOnce()>>,
        reason: OpenReason,
    ) {
        self.close_active_drawer(host, false, reason == OpenReason::Regular);
        content
            .borrow_mut()
            .set_preferred_content_size(self.preferred_size());

        let content_id = content.borrow().id();
        let configuration = self.configuration.with_extents(self.extents);
        let inbox = Rc::clone(&self.dismissed);
        let generation = Rc::new(RefCell::new(None::<PresentationId>));
        let completion_generation = Rc::clone(&generation);

        let presented = host.present_bottom_sheet(
            content.clone(),
            configuration.clone(),
            || true,
            Some(Box::new(move || {
                if let Some(generation) = *completion_generation.borrow() {
                    inbox.borrow_mut().push(generation);
                }
            })),
            true,
        );

        let Some(presentation) = presented else {
            tracing::warn!(content = content_id.0, ?reason, "host refused to present the drawer");
            if reason == OpenReason::OrientationChange
                && let Some(active) = self.active.as_mut()
            {
                // The drawer was open and is now gone for good.
                active.on_dismiss = on_dismiss;
                self.dispose_active_drawer();
            }
            self.active = None;
            return;
        };
        *generation.borrow_mut() = Some(presentation);

        tracing::debug!(content = content_id.0, presentation = presentation.0, ?reason, "drawer opened");
        self.active = Some(ActiveDrawer {
            content,
            content_id,
            configuration,
            on_dismiss,
            generation: presentation,
        });
        self.set_state(DrawerState::Opened);
    }

    fn dispose_active_drawer(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.set_state(DrawerState::Closed);
        if let Some(on_dismiss) = active.on_dismiss {
            on_dismiss();
        }
    }

    /// The host is animating `generation` out with no drag holding it.
    fn is_leaving(host: &ModalPresenter, generation: PresentationId) -> bool {
        host.presentation_id() == Some(generation)
            && host.presentation_state() == Some(PresentationState::Dismissing)
            && !host.controller().is_some_and(|controller| controller.has_interaction())
    }

    fn preferred_size(&self) -> Size<f32> {
        Size::new(self.extents.landscape, self.extents.portrait)
    }

    fn set_state(&mut self, state: DrawerState) {
        if self.state == state {
            return;
        }
        self.state = state;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.drawer_state_did_change(state);
        }
    }

    fn is_bound_to(&self, host: &ModalPresenter) -> bool {
        if host.id() != self.host {
            tracing::warn!(expected = self.host.0, actual = host.id().0, "drawer manager used with another host");
            return false;
        }
        true
    }
}

impl fmt::Debug for DrawerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawerManager")
            .field("host", &self.host)
            .field("active", &self.active_content())
            .field("state", &self.state)
            .field("extents", &self.extents)
            .finish()
    }
}
