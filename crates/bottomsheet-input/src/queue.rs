//! Per-frame batching of pan gesture samples.

use std::collections::VecDeque;

use crate::gesture::{GesturePhase, HandleStatus, PanGesture};

/// Gesture queue with batching and coalescing
pub struct GestureQueue {
    /// Pending samples for this frame, in delivery order
    pending: VecDeque<PanGesture>,

    /// Statistics
    stats: GestureStats,
}

impl GestureQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(16),
            stats: GestureStats::default(),
        }
    }

    /// Push a sample (called from the platform gesture callback)
    ///
    /// Consecutive `Changed` samples of the same recognizer are coalesced into
    /// the latest one; translation and velocity are cumulative so nothing is
    /// lost.
    pub fn push(&mut self, gesture: PanGesture) {
        self.stats.samples_received += 1;

        if gesture.phase == GesturePhase::Changed
            && let Some(last) = self
                .pending
                .iter_mut()
                .rev()
                .find(|pending| pending.recognizer == gesture.recognizer)
            && last.phase == GesturePhase::Changed
        {
            *last = gesture;
            self.stats.samples_coalesced += 1;
            return;
        }

        self.pending.push_back(gesture);
    }

    /// Take every pending sample as a batch
    pub fn drain(&mut self) -> GestureBatch {
        let gestures: Vec<PanGesture> = self.pending.drain(..).collect();
        self.stats.samples_processed += gestures.len();
        GestureBatch { gestures }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn stats(&self) -> &GestureStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = GestureStats::default();
    }
}

impl Default for GestureQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GestureBatch {
    gestures: Vec<PanGesture>,
}

impl GestureBatch {
    pub fn from_gestures(gestures: Vec<PanGesture>) -> Self {
        Self { gestures }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanGesture> {
        self.gestures.iter()
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// Offer every sample to `handler`; consumed samples are removed from the batch.
    pub fn dispatch<H>(&mut self, mut handler: H)
    where
        H: FnMut(&PanGesture) -> HandleStatus,
    {
        self.gestures.retain(|gesture| {
            let status = handler(gesture);
            !status.is_consumed()
        });
    }
}

#[derive(Default, Debug, Clone)]
pub struct GestureStats {
    pub samples_received: usize,
    pub samples_coalesced: usize,
    pub samples_processed: usize,
}
