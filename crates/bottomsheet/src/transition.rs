//! Presentation and dismissal transitions.
//!
//! [`PercentDrivenTransition`] is a cancellable transition whose progress is
//! set from outside (by a gesture) until it is told to finish or cancel, after
//! which it animates the remaining distance on its own. [`TransitionAnimator`]
//! maps a transition onto sheet frames: the sheet slides between its final
//! frame and an off-screen frame below the container.

use std::sync::atomic::{AtomicU64, Ordering};

use bottomsheet_core::geometry::Rect;

use crate::animation::{EasingFunction, FrameAnimation};

static TRANSITION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one cancellable transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

impl TransitionId {
    pub fn new() -> Self {
        Self(TRANSITION_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TransitionId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a transition settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// False when the transition was cancelled and rolled back.
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Interactive,
    Finishing,
    Cancelling,
    Settled { completed: bool },
}

/// A transition driven by an externally supplied percentage.
#[derive(Debug, Clone)]
pub struct PercentDrivenTransition {
    id: TransitionId,
    percent: f32,
    phase: Phase,
}

impl PercentDrivenTransition {
    pub fn new() -> Self {
        Self::with_id(TransitionId::new())
    }

    pub fn with_id(id: TransitionId) -> Self {
        Self {
            id,
            percent: 0.0,
            phase: Phase::Interactive,
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Current completion in `0.0..=1.0`.
    pub fn percent_complete(&self) -> f32 {
        self.percent
    }

    /// The gesture still owns the progress.
    pub fn is_interactive(&self) -> bool {
        self.phase == Phase::Interactive
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Settled { .. })
    }

    /// Set the progress. Ignored once the transition has been finished or cancelled.
    pub fn update(&mut self, percent: f32) {
        if self.is_interactive() {
            self.percent = percent.clamp(0.0, 1.0);
        }
    }

    /// Complete the transition from the current progress.
    pub fn finish(&mut self) {
        if self.is_interactive() {
            self.phase = Phase::Finishing;
        }
    }

    /// Roll the transition back from the current progress.
    pub fn cancel(&mut self) {
        if self.is_interactive() {
            self.phase = Phase::Cancelling;
        }
    }

    /// Animate toward the end chosen by [`finish`](Self::finish) or
    /// [`cancel`](Self::cancel), covering the whole range in `duration` seconds.
    ///
    /// Returns the outcome on the update that settles the transition.
    pub fn advance(&mut self, delta_time: f32, duration: f32) -> Option<TransitionOutcome> {
        let step = if duration > 0.0 {
            delta_time / duration
        } else {
            1.0
        };

        match self.phase {
            Phase::Interactive | Phase::Settled { .. } => None,
            Phase::Finishing => {
                self.percent = (self.percent + step).min(1.0);
                (self.percent >= 1.0).then(|| self.settle(true))
            }
            Phase::Cancelling => {
                self.percent = (self.percent - step).max(0.0);
                (self.percent <= 0.0).then(|| self.settle(false))
            }
        }
    }

    fn settle(&mut self, completed: bool) -> TransitionOutcome {
        self.phase = Phase::Settled { completed };
        TransitionOutcome { completed }
    }

    /// The outcome once settled.
    pub fn outcome(&self) -> Option<TransitionOutcome> {
        match self.phase {
            Phase::Settled { completed } => Some(TransitionOutcome { completed }),
            _ => None,
        }
    }
}

impl Default for PercentDrivenTransition {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Presentation,
    Dismissal,
}

#[derive(Debug, Clone)]
enum Driver {
    Timed(FrameAnimation),
    Interactive(PercentDrivenTransition),
    Immediate,
}

/// Slides the presented surface between its final and off-screen frames.
#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    kind: TransitionKind,
    final_frame: Rect<f32>,
    offscreen_frame: Rect<f32>,
    duration: f32,
    driver: Driver,
}

impl TransitionAnimator {
    /// Off-screen frame for a sheet: same x and size, top edge at the container's bottom.
    pub fn offscreen_frame(final_frame: Rect<f32>, container: Rect<f32>) -> Rect<f32> {
        Rect::new(
            final_frame.x,
            container.height,
            final_frame.width,
            final_frame.height,
        )
    }

    /// A timed (or immediate, when not `animated`) transition.
    pub fn timed(
        kind: TransitionKind,
        final_frame: Rect<f32>,
        container: Rect<f32>,
        duration: f32,
        animated: bool,
    ) -> Self {
        let offscreen_frame = Self::offscreen_frame(final_frame, container);
        let driver = if animated {
            let (from, to) = match kind {
                TransitionKind::Presentation => (offscreen_frame, final_frame),
                TransitionKind::Dismissal => (final_frame, offscreen_frame),
            };
            Driver::Timed(FrameAnimation::new(
                from,
                to,
                duration,
                EasingFunction::EaseInOut,
            ))
        } else {
            Driver::Immediate
        };

        Self {
            kind,
            final_frame,
            offscreen_frame,
            duration,
            driver,
        }
    }

    /// A dismissal whose progress is driven by a gesture.
    pub fn interactive_dismissal(
        transition: PercentDrivenTransition,
        final_frame: Rect<f32>,
        container: Rect<f32>,
        duration: f32,
    ) -> Self {
        Self {
            kind: TransitionKind::Dismissal,
            final_frame,
            offscreen_frame: Self::offscreen_frame(final_frame, container),
            duration,
            driver: Driver::Interactive(transition),
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.driver, Driver::Interactive(_))
    }

    pub fn transition_id(&self) -> Option<TransitionId> {
        match &self.driver {
            Driver::Interactive(transition) => Some(transition.id()),
            _ => None,
        }
    }

    /// Animation curve: linear while a gesture drives it, ease-in-out otherwise.
    pub fn curve(&self) -> EasingFunction {
        if self.is_interactive() {
            EasingFunction::Linear
        } else {
            EasingFunction::EaseInOut
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Frame to show for the surface right now.
    pub fn frame(&self) -> Rect<f32> {
        match &self.driver {
            Driver::Timed(animation) => animation.frame(),
            Driver::Interactive(transition) => self
                .final_frame
                .lerp(&self.offscreen_frame, transition.percent_complete()),
            Driver::Immediate => match self.kind {
                TransitionKind::Presentation => self.final_frame,
                TransitionKind::Dismissal => self.offscreen_frame,
            },
        }
    }

    pub fn update_interactive(&mut self, percent: f32) {
        if let Driver::Interactive(transition) = &mut self.driver {
            transition.update(percent);
        }
    }

    pub fn finish_interactive(&mut self) {
        if let Driver::Interactive(transition) = &mut self.driver {
            transition.finish();
        }
    }

    pub fn cancel_interactive(&mut self) {
        if let Driver::Interactive(transition) = &mut self.driver {
            transition.cancel();
        }
    }

    pub fn percent_complete(&self) -> f32 {
        match &self.driver {
            Driver::Interactive(transition) => transition.percent_complete(),
            Driver::Timed(animation) if animation.is_completed() => 1.0,
            Driver::Timed(_) => 0.0,
            Driver::Immediate => 1.0,
        }
    }

    /// Advance time; returns the outcome on the update that settles the transition.
    pub fn advance(&mut self, delta_time: f32) -> Option<TransitionOutcome> {
        match &mut self.driver {
            Driver::Timed(animation) => {
                if animation.is_completed() {
                    return None;
                }
                (!animation.update(delta_time)).then_some(TransitionOutcome { completed: true })
            }
            Driver::Interactive(transition) => transition.advance(delta_time, self.duration),
            Driver::Immediate => Some(TransitionOutcome { completed: true }),
        }
    }

    /// Jump a non-interactive transition to its end.
    pub fn settle(&mut self) -> TransitionOutcome {
        if let Driver::Timed(animation) = &mut self.driver {
            animation.complete();
        }
        match &self.driver {
            Driver::Interactive(transition) => transition
                .outcome()
                .unwrap_or(TransitionOutcome { completed: false }),
            _ => TransitionOutcome { completed: true },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Rect<f32> = Rect {
        x: 0.0,
        y: 0.0,
        width: 390.0,
        height: 844.0,
    };
    const FINAL: Rect<f32> = Rect {
        x: 0.0,
        y: 544.0,
        width: 390.0,
        height: 300.0,
    };

    #[test]
    fn test_finish_animates_remaining_distance() {
        let mut transition = PercentDrivenTransition::new();
        transition.update(0.4);
        transition.finish();
        // Further gesture updates are ignored once finishing.
        transition.update(0.1);
        assert_eq!(transition.percent_complete(), 0.4);

        assert_eq!(transition.advance(0.15, 0.3), None);
        assert!((transition.percent_complete() - 0.9).abs() < 1e-5);
        assert_eq!(
            transition.advance(0.15, 0.3),
            Some(TransitionOutcome { completed: true })
        );
        assert!(transition.is_settled());
        assert_eq!(transition.advance(0.15, 0.3), None);
    }

    #[test]
    fn test_cancel_rolls_back() {
        let mut transition = PercentDrivenTransition::new();
        transition.update(0.2);
        transition.cancel();
        assert_eq!(
            transition.advance(0.3, 0.3),
            Some(TransitionOutcome { completed: false })
        );
        assert_eq!(transition.percent_complete(), 0.0);
    }

    #[test]
    fn test_interactive_transition_does_not_advance_on_its_own() {
        let mut transition = PercentDrivenTransition::new();
        transition.update(0.5);
        assert_eq!(transition.advance(1.0, 0.3), None);
        assert_eq!(transition.percent_complete(), 0.5);
    }

    #[test]
    fn test_offscreen_frame() {
        let offscreen = TransitionAnimator::offscreen_frame(FINAL, CONTAINER);
        assert_eq!(offscreen, Rect::new(0.0, 844.0, 390.0, 300.0));
    }

    #[test]
    fn test_presentation_slides_up() {
        let mut animator =
            TransitionAnimator::timed(TransitionKind::Presentation, FINAL, CONTAINER, 0.3, true);
        assert_eq!(animator.frame().y, 844.0);
        assert_eq!(animator.curve(), EasingFunction::EaseInOut);
        assert_eq!(animator.advance(0.1), None);
        assert_eq!(animator.advance(0.2), Some(TransitionOutcome { completed: true }));
        assert_eq!(animator.frame(), FINAL);
    }

    #[test]
    fn test_immediate_transition_settles_on_first_advance() {
        let mut animator =
            TransitionAnimator::timed(TransitionKind::Dismissal, FINAL, CONTAINER, 0.3, false);
        assert_eq!(animator.advance(0.0), Some(TransitionOutcome { completed: true }));
        assert_eq!(animator.frame().y, 844.0);
    }

    #[test]
    fn test_interactive_dismissal_tracks_percent() {
        let mut animator = TransitionAnimator::interactive_dismissal(
            PercentDrivenTransition::new(),
            FINAL,
            CONTAINER,
            0.3,
        );
        assert!(animator.is_interactive());
        assert_eq!(animator.curve(), EasingFunction::Linear);
        animator.update_interactive(0.5);
        assert_eq!(animator.frame().y, 694.0);
    }
}
