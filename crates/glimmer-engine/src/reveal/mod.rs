//! Reveal primitives: each turns a continuous input signal into a one-shot
//! `revealed` transition.

pub mod target;
pub mod drag;
pub mod coverage;
pub mod spike;
pub mod typewriter;
pub mod flip;

pub use target::{Phase, ProgressCounter, RevealTarget, Step};
pub use drag::ThresholdDrag;
pub use coverage::{CoverageAccumulator, CoverageMask};
pub use spike::{MotionSupport, SpikeCounter};
pub use typewriter::Typewriter;
pub use flip::FlipCard;
