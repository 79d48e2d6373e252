//! Flip card: a tap turns it over, another tap turns it back.
//! The first turn counts as revealing the message behind it.

use crate::api::types::TargetId;
use super::target::{Phase, RevealTarget, Step};

#[derive(Debug)]
pub struct FlipCard {
    target: RevealTarget,
    flipped: bool,
    flips: u32,
}

impl FlipCard {
    pub fn new(id: TargetId) -> Self {
        Self {
            target: RevealTarget::new(id),
            flipped: false,
            flips: 0,
        }
    }

    pub fn target(&self) -> &RevealTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut RevealTarget {
        &mut self.target
    }

    pub fn phase(&self) -> Phase {
        self.target.phase()
    }

    /// Showing the back face.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flips(&self) -> u32 {
        self.flips
    }

    /// Turn the card over. Reveals on the first turn; later turns only toggle.
    pub fn flip(&mut self) -> Step {
        self.flipped = !self.flipped;
        self.flips += 1;
        match self.target.reveal() {
            Step::Revealed => Step::Revealed,
            _ => Step::Updated,
        }
    }
}
