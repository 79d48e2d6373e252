//! The state machine every reveal primitive shares.
//!
//! ```text
//! IDLE ──first qualifying input──▶ ACTIVE ──threshold crossed──▶ REVEALED
//!                                   │  ▲                            (absorbing)
//!                                   └──┘ below threshold
//! ```
//!
//! Transitions return a [`Step`]; `Step::Revealed` is the one-shot completion
//! signal and is produced at most once per target.

use std::fmt;

use crate::api::types::TargetId;

/// Where a reveal target is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Revealed,
}

/// Output of feeding one input to a primitive.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Input had no effect (inactive, out of phase, or already revealed).
    Ignored,
    /// State changed but the target is not revealed.
    Updated,
    /// The target just became revealed. Produced exactly once.
    Revealed,
}

impl Step {
    /// Whether this step fires the completion.
    pub fn fired(self) -> bool {
        self == Step::Revealed
    }
}

type Callback = Box<dyn FnOnce(TargetId)>;

/// One-shot unlock state plus its optional completion callback.
pub struct RevealTarget {
    id: TargetId,
    phase: Phase,
    on_reveal: Option<Callback>,
}

impl RevealTarget {
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            phase: Phase::Idle,
            on_reveal: None,
        }
    }

    /// Attach a completion callback. It runs once, on the reveal transition.
    pub fn set_on_reveal(&mut self, callback: impl FnOnce(TargetId) + 'static) {
        self.on_reveal = Some(Box::new(callback));
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == Phase::Revealed
    }

    /// IDLE → ACTIVE. No-op in any other phase.
    pub(crate) fn activate(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Active;
        }
    }

    /// ACTIVE → IDLE (a drag snapped back). No-op once revealed.
    pub(crate) fn rest(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Idle;
        }
    }

    /// Enter REVEALED. The first call fires the callback and returns
    /// `Step::Revealed`; every later call returns `Step::Ignored`.
    pub(crate) fn reveal(&mut self) -> Step {
        if self.phase == Phase::Revealed {
            return Step::Ignored;
        }
        self.phase = Phase::Revealed;
        log::debug!("target {}: revealed", self.id.0);
        if let Some(callback) = self.on_reveal.take() {
            callback(self.id);
        }
        Step::Revealed
    }
}

impl fmt::Debug for RevealTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealTarget")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("has_callback", &self.on_reveal.is_some())
            .finish()
    }
}

/// A bounded progress scalar in [0, 100].
/// Never decreases; ignores input once it has reached its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressCounter {
    value: f32,
    threshold: f32,
    /// Set by the call that first reaches the threshold.
    reached: bool,
}

impl ProgressCounter {
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() { threshold } else { 100.0 };
        Self {
            value: 0.0,
            threshold: threshold.clamp(0.0, 100.0),
            reached: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_complete(&self) -> bool {
        self.reached
    }

    /// Add `amount` (negative or non-finite amounts add nothing), capped at 100.
    /// Returns true on the first call that leaves the value at or past the
    /// threshold, even when the threshold is 0.
    pub fn advance(&mut self, amount: f32) -> bool {
        if self.reached {
            return false;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.value = (self.value + amount).min(100.0);
        self.reached = self.value >= self.threshold;
        self.reached
    }
}
