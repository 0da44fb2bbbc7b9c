//! Recording dismissal handlers and callback counters.

use std::sync::Arc;

use bottomsheet::drawer::DrawerState;
use bottomsheet::host::{ContentId, DismissalHandler, DismissalHost};
use parking_lot::Mutex;

/// Records a call made on [`RecordingDismissalHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalCall {
    CanBeDismissed,
    PerformDismissal { animated: bool },
    DidEndDismissal,
}

/// Dismissal handler whose permission can be flipped from the test.
///
/// `perform_dismissal` forwards to the host like the default handler does.
#[derive(Clone)]
pub struct RecordingDismissalHandler {
    content: ContentId,
    allowed: Arc<Mutex<bool>>,
    calls: Arc<Mutex<Vec<DismissalCall>>>,
}

impl RecordingDismissalHandler {
    pub fn new(content: ContentId) -> Self {
        Self {
            content,
            allowed: Arc::new(Mutex::new(true)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_can_be_dismissed(&self, allowed: bool) {
        *self.allowed.lock() = allowed;
    }

    /// Boxed clone sharing this handler's log, ready to hand to a presenter.
    pub fn boxed(&self) -> Box<dyn DismissalHandler> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<DismissalCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: DismissalCall) -> usize {
        self.calls.lock().iter().filter(|recorded| **recorded == call).count()
    }

    pub fn count_perform_dismissals(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DismissalCall::PerformDismissal { .. }))
            .count()
    }
}

impl DismissalHandler for RecordingDismissalHandler {
    fn can_be_dismissed(&self) -> bool {
        self.calls.lock().push(DismissalCall::CanBeDismissed);
        *self.allowed.lock()
    }

    fn perform_dismissal(&mut self, host: &mut dyn DismissalHost, animated: bool) {
        self.calls
            .lock()
            .push(DismissalCall::PerformDismissal { animated });
        host.dismiss(self.content, animated);
    }

    fn did_end_dismissal(&mut self) {
        self.calls.lock().push(DismissalCall::DidEndDismissal);
    }
}

/// Counts how often the callbacks it hands out run.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Arc<Mutex<usize>>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> Box<dyn FnOnce()> {
        let count = Arc::clone(&self.count);
        Box::new(move || *count.lock() += 1)
    }

    pub fn count(&self) -> usize {
        *self.count.lock()
    }
}

/// Records drawer state notifications.
#[derive(Debug, Clone, Default)]
pub struct StateRecorder {
    states: Arc<Mutex<Vec<DrawerState>>>,
}

impl StateRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delegate(&self) -> impl FnMut(DrawerState) + 'static {
        let states = Arc::clone(&self.states);
        move |state| states.lock().push(state)
    }

    pub fn states(&self) -> Vec<DrawerState> {
        self.states.lock().clone()
    }

    pub fn count(&self, state: DrawerState) -> usize {
        self.states.lock().iter().filter(|recorded| **recorded == state).count()
    }
}
