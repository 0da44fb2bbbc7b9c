//! Device orientation notifications.
//!
//! The platform posts rotations to an [`OrientationNotifier`]. Interested
//! parties hold an [`OrientationSubscription`] and drain it on their own
//! schedule. Dropping the subscription unsubscribes immediately.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bottomsheet_core::alloc::IndexMap;

/// Physical device orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl DeviceOrientation {
    pub fn is_landscape(&self) -> bool {
        matches!(
            self,
            DeviceOrientation::LandscapeLeft | DeviceOrientation::LandscapeRight
        )
    }

    pub fn is_portrait(&self) -> bool {
        !self.is_landscape()
    }
}

#[derive(Debug, Default)]
struct Subscribers {
    next_id: u64,
    queues: IndexMap<u64, Vec<DeviceOrientation>>,
}

/// Fans orientation changes out to subscriptions.
#[derive(Debug, Clone, Default)]
pub struct OrientationNotifier {
    subscribers: Rc<RefCell<Subscribers>>,
}

impl OrientationNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> OrientationSubscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.queues.insert(id, Vec::new());

        OrientationSubscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    /// Queue `orientation` for every live subscription.
    pub fn notify(&self, orientation: DeviceOrientation) {
        let mut subscribers = self.subscribers.borrow_mut();
        tracing::debug!(?orientation, subscribers = subscribers.queues.len(), "orientation changed");
        for queue in subscribers.queues.values_mut() {
            queue.push(orientation);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().queues.len()
    }
}

/// A live subscription; unsubscribes on drop.
#[derive(Debug)]
pub struct OrientationSubscription {
    id: u64,
    subscribers: Weak<RefCell<Subscribers>>,
}

impl OrientationSubscription {
    /// Take the orientations posted since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<DeviceOrientation> {
        let Some(subscribers) = self.subscribers.upgrade() else {
            return Vec::new();
        };
        let mut subscribers = subscribers.borrow_mut();
        subscribers
            .queues
            .get_mut(&self.id)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// False once the notifier is gone.
    pub fn is_connected(&self) -> bool {
        self.subscribers.strong_count() > 0
    }
}

impl Drop for OrientationSubscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().queues.shift_remove(&self.id);
        }
    }
}
