//! Timed tweens for sheet frames.
//!
//! The host's animation engine is modelled as a value that is advanced by the
//! frame delta. [`Animation`] tweens a scalar, [`FrameAnimation`] tweens a
//! whole [`Rect`] between two frames.
//!
//! # Example
//!
//! ```
//! use bottomsheet::animation::{EasingFunction, FrameAnimation};
//! use bottomsheet_core::geometry::Rect;
//!
//! let mut slide = FrameAnimation::new(
//!     Rect::new(0.0, 844.0, 390.0, 300.0),
//!     Rect::new(0.0, 544.0, 390.0, 300.0),
//!     0.3,
//!     EasingFunction::EaseInOut,
//! );
//!
//! while slide.update(1.0 / 60.0) {}
//! assert_eq!(slide.frame().y, 544.0);
//! ```

use bottomsheet_core::geometry::Rect;

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EasingFunction {
    /// Linear interpolation; used while a gesture drives the transition
    #[default]
    Linear,
    /// Ease in and out (slow start and end)
    EaseInOut,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Completed,
}

/// A scalar tween.
#[derive(Debug, Clone)]
pub struct Animation {
    from: f32,
    to: f32,
    /// Duration in seconds
    duration: f32,
    elapsed: f32,
    easing: EasingFunction,
    state: AnimationState,
}

impl Animation {
    /// Create a linear 0 → 1 tween lasting one second.
    pub fn new() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration: 1.0,
            elapsed: 0.0,
            easing: EasingFunction::Linear,
            state: AnimationState::Running,
        }
    }

    /// Set the start value.
    pub fn from(mut self, value: f32) -> Self {
        self.from = value;
        self
    }

    /// Set the end value.
    pub fn to(mut self, value: f32) -> Self {
        self.to = value;
        self
    }

    /// Set the duration in seconds. A non-positive duration completes on the next update.
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Get the current value.
    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.eased_progress()
    }

    /// Eased progress in `0.0..=1.0`.
    pub fn eased_progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.state == AnimationState::Completed {
                1.0
            } else {
                0.0
            };
        }
        self.easing.apply(self.elapsed / self.duration)
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == AnimationState::Completed
    }

    /// Jump to the end value.
    pub fn complete(&mut self) {
        self.elapsed = self.duration.max(0.0);
        self.state = AnimationState::Completed;
    }

    /// Update the animation by delta time.
    ///
    /// Returns true if the animation is still running.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.state == AnimationState::Completed {
            return false;
        }

        self.elapsed += delta_time;
        if self.elapsed >= self.duration {
            self.complete();
            return false;
        }

        true
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

/// Tween between two frames.
#[derive(Debug, Clone)]
pub struct FrameAnimation {
    from: Rect<f32>,
    to: Rect<f32>,
    progress: Animation,
}

impl FrameAnimation {
    pub fn new(from: Rect<f32>, to: Rect<f32>, duration: f32, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            progress: Animation::new().duration(duration).easing(easing),
        }
    }

    /// Current interpolated frame.
    pub fn frame(&self) -> Rect<f32> {
        self.from.lerp(&self.to, self.progress.eased_progress())
    }

    pub fn target(&self) -> Rect<f32> {
        self.to
    }

    /// Retarget the running tween, starting from the frame currently shown.
    pub fn retarget(&mut self, to: Rect<f32>, duration: f32, easing: EasingFunction) {
        *self = FrameAnimation::new(self.frame(), to, duration, easing);
    }

    pub fn is_completed(&self) -> bool {
        self.progress.is_completed()
    }

    pub fn complete(&mut self) {
        self.progress.complete();
    }

    /// Returns true while the tween is still running.
    pub fn update(&mut self, delta_time: f32) -> bool {
        self.progress.update(delta_time)
    }
}
