//! Gesture-driven dismissal.
//!
//! A drag is mapped onto a cancellable transition. While the finger is down
//! the drag's vertical translation, relative to the surface height, becomes the
//! transition's progress. On release the coordinator projects where a
//! decelerating flick would come to rest and commits when that point lies past
//! the threshold:
//!
//! ```text
//! deceleration = 800 * (velocity > 0 ? -1 : 1)
//! final        = (translation - 0.25 * velocity^2 / deceleration) / height
//! final < 0.5  => cancel, otherwise finish
//! ```

use bottomsheet_core::math::is_almost_equal;

use crate::configuration::SheetTuning;
use crate::transition::TransitionId;

/// Result of releasing an interactive dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Complete the dismissal.
    Finish,
    /// Roll the surface back to its presented frame.
    Cancel,
}

/// Progress at which a flick released with `velocity` at `translation` would come to rest.
pub fn projected_progress(
    velocity: f32,
    translation: f32,
    surface_height: f32,
    deceleration_magnitude: f32,
) -> f32 {
    let deceleration = deceleration_magnitude * if velocity > 0.0 { -1.0 } else { 1.0 };
    (translation - 0.25 * velocity * velocity / deceleration) / surface_height
}

/// Live mapping from a drag to one cancellable transition.
#[derive(Debug, Clone)]
pub struct InteractiveTransitionCoordinator {
    transition: TransitionId,
    progress: f32,
    tuning: SheetTuning,
}

impl InteractiveTransitionCoordinator {
    pub fn new(transition: TransitionId, tuning: SheetTuning) -> Self {
        Self {
            transition,
            progress: 0.0,
            tuning,
        }
    }

    pub fn transition_id(&self) -> TransitionId {
        self.transition
    }

    /// Record the drag progress (translation / surface height), unclamped.
    pub fn update(&mut self, progress: f32) {
        self.progress = progress;
    }

    /// Last progress passed to [`update`](Self::update).
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Progress as the underlying transition sees it, bounded to `0.0..=1.0`.
    pub fn percent_complete(&self) -> f32 {
        self.progress.clamp(0.0, 1.0)
    }

    pub fn has_started(&self) -> bool {
        !is_almost_equal(self.percent_complete(), 0.0)
    }

    /// Commit or cancel a release with the given vertical velocity and translation.
    pub fn decide(&self, velocity: f32, translation: f32, surface_height: f32) -> Decision {
        if surface_height <= 0.0 {
            return Decision::Cancel;
        }

        let final_progress = projected_progress(
            velocity,
            translation,
            surface_height,
            self.tuning.deceleration,
        );
        let decision = if final_progress < self.tuning.commit_threshold {
            Decision::Cancel
        } else {
            Decision::Finish
        };

        tracing::debug!(
            transition = self.transition.0,
            velocity,
            translation,
            final_progress,
            ?decision,
            "interactive dismissal released"
        );
        decision
    }

    /// Consume the coordinator, applying the dismissal permission to `decision`.
    pub fn resolve(self, decision: Decision, can_be_dismissed: bool) -> Decision {
        match decision {
            Decision::Finish if can_be_dismissed => Decision::Finish,
            Decision::Finish => {
                tracing::debug!(transition = self.transition.0, "dismissal refused by handler");
                Decision::Cancel
            }
            Decision::Cancel => Decision::Cancel,
        }
    }
}

/// One live drag-to-dismiss interaction.
#[derive(Debug, Clone)]
pub struct InteractionSession {
    pub coordinator: InteractiveTransitionCoordinator,
    /// Translation accumulated while a nested scroll view forwards its drag.
    pub overlay_translation: f32,
}

impl InteractionSession {
    pub fn new(transition: TransitionId, tuning: SheetTuning) -> Self {
        Self {
            coordinator: InteractiveTransitionCoordinator::new(transition, tuning),
            overlay_translation: 0.0,
        }
    }
}
