//! Input primitives consumed by the bottom sheet engine.
//!
//! The host platform recognizes gestures; this crate only describes what it
//! delivers:
//! - [`PanGesture`] samples with phase, translation, velocity and location
//! - [`GestureQueue`] / [`GestureBatch`] for per-frame delivery
//! - [`ScrollView`] state plus a [`MulticastScrollDelegate`] so more than one
//!   observer can follow the same scroll view

pub mod gesture;
pub mod queue;
pub mod scroll;

pub use gesture::{GesturePhase, HandleStatus, PanGesture, RecognizerId};
pub use queue::{GestureBatch, GestureQueue, GestureStats};
pub use scroll::{
    MulticastScrollDelegate, ObserverId, PanSample, ScrollEvent, ScrollObserver, ScrollState,
    ScrollView, ScrollViewId,
};
