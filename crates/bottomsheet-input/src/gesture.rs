//! Pan gesture samples delivered by the host's gesture recognizers.

use std::sync::atomic::{AtomicU64, Ordering};

use bottomsheet_core::math::Vec2;

static RECOGNIZER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one gesture recognizer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(pub u64);

impl RecognizerId {
    /// Generate a new unique recognizer ID.
    pub fn new() -> Self {
        Self(RECOGNIZER_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for RecognizerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognizer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    /// Whether the gesture is over (ended, cancelled or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed
        )
    }
}

/// One pan sample.
///
/// Translation and velocity are cumulative since the gesture began and are
/// expressed in the coordinate space of the view the recognizer is attached
/// to; positive `y` points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    pub recognizer: RecognizerId,
    pub phase: GesturePhase,
    /// Current touch location.
    pub location: Vec2,
    pub translation: Vec2,
    /// Points per second.
    pub velocity: Vec2,
}

impl PanGesture {
    pub fn new(recognizer: RecognizerId, phase: GesturePhase) -> Self {
        Self {
            recognizer,
            phase,
            location: Vec2::ZERO,
            translation: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_location(mut self, location: Vec2) -> Self {
        self.location = location;
        self
    }

    pub fn with_translation(mut self, translation: Vec2) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

bitflags::bitflags! {
    /// Outcome of offering an input event to a handler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandleStatus: u8 {
        const HANDLED = 0b00000001;
        const CONSUMED = 0b00000010;
    }
}

impl HandleStatus {
    pub const fn is_consumed(&self) -> bool {
        self.contains(Self::CONSUMED)
    }

    pub const fn is_handled(&self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub const fn consumed() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits() | Self::CONSUMED.bits())
    }

    pub const fn handled() -> Self {
        Self::from_bits_truncate(Self::HANDLED.bits())
    }

    pub const fn ignored() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_status_flags() {
        assert!(HandleStatus::consumed().is_consumed());
        assert!(HandleStatus::consumed().is_handled());
        assert!(HandleStatus::handled().is_handled());
        assert!(!HandleStatus::handled().is_consumed());
        assert!(!HandleStatus::ignored().is_handled());
    }

    #[test]
    fn test_recognizer_ids_are_unique() {
        assert_ne!(RecognizerId::new(), RecognizerId::new());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(GesturePhase::Ended.is_terminal());
        assert!(GesturePhase::Cancelled.is_terminal());
        assert!(!GesturePhase::Changed.is_terminal());
    }
}
