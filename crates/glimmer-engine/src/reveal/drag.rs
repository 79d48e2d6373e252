//! Threshold-drag release: lift an element far enough and let go to commit.

use crate::api::config::DragConfig;
use crate::api::types::TargetId;
use crate::input::sample::GestureSample;
use super::target::{Phase, RevealTarget, Step};

/// A drag along the vertical axis, upward. Releasing at or past the commit
/// threshold reveals the target; anything short snaps back to rest.
#[derive(Debug)]
pub struct ThresholdDrag {
    target: RevealTarget,
    config: DragConfig,
    /// Sample at press; `None` while not dragging.
    start: Option<GestureSample>,
    /// Most recent sample of the current drag.
    latest: Option<GestureSample>,
    /// Current lift, clamped to [0, max_lift].
    offset: f32,
}

impl ThresholdDrag {
    pub fn new(id: TargetId, config: DragConfig) -> Self {
        Self {
            target: RevealTarget::new(id),
            config,
            start: None,
            latest: None,
            offset: 0.0,
        }
    }

    pub fn target(&self) -> &RevealTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut RevealTarget {
        &mut self.target
    }

    /// Current visual lift above rest.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    /// How long the current drag has been held, in ms. 0 when not dragging.
    pub fn held_ms(&self) -> u64 {
        match (self.start, self.latest) {
            (Some(start), Some(latest)) => latest.at_ms.saturating_sub(start.at_ms),
            _ => 0,
        }
    }

    /// Press: record the starting sample.
    pub fn begin(&mut self, sample: GestureSample) -> Step {
        if self.target.is_revealed() || !sample.pos.y.is_finite() {
            return Step::Ignored;
        }
        self.start = Some(sample);
        self.latest = Some(sample);
        self.offset = 0.0;
        self.target.activate();
        Step::Updated
    }

    /// Move: lift by how far the pointer travelled up since the press.
    pub fn update(&mut self, sample: GestureSample) -> Step {
        if self.target.is_revealed() || !sample.pos.y.is_finite() {
            return Step::Ignored;
        }
        let Some(start) = self.start else {
            return Step::Ignored;
        };
        self.latest = Some(sample);
        // Screen y grows downward, so upward travel is the negated y delta
        let displacement = -sample.delta(&start).y;
        self.offset = displacement.clamp(0.0, self.config.max_lift);
        Step::Updated
    }

    /// Release: commit if lifted far enough, otherwise snap back to rest.
    pub fn end(&mut self) -> Step {
        if self.target.is_revealed() || self.start.is_none() {
            return Step::Ignored;
        }
        let held_ms = self.held_ms();
        self.start = None;
        self.latest = None;
        if self.offset >= self.config.commit_threshold {
            log::debug!("target {}: released after {} ms", self.target.id().0, held_ms);
            self.target.reveal()
        } else {
            log::debug!(
                "target {}: drag released at {:.1} after {} ms, snapping back",
                self.target.id().0,
                self.offset,
                held_ms
            );
            self.offset = 0.0;
            self.target.rest();
            Step::Updated
        }
    }

    pub fn phase(&self) -> Phase {
        self.target.phase()
    }
}
