pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod reveal;

// Re-export key types at crate root for convenience
pub use api::experience::{Experience, ExperienceConfig, RevealContext};
pub use api::config::{CoverageConfig, DragConfig, RevealConfig, SpikeConfig, TypewriterConfig};
pub use api::types::{
    RevealEvent, TargetId, TargetSnapshot, EVENT_CHAPTER_COMPLETE, EVENT_REVEALED,
    EVENT_USER_BASE, FLAG_PRESSED, FLAG_RUNNING, FLAG_SHAKING,
};
pub use core::board::{BoardEntry, RevealBoard};
pub use core::time::FrameClock;
pub use core::timer::{TimerFired, TimerId, TimerQueue};
pub use input::queue::{InputEvent, InputQueue};
pub use input::sample::{GestureSample, MotionSample};
pub use bridge::protocol::{FrameData, ProtocolLayout};
pub use reveal::{
    CoverageAccumulator, CoverageMask, FlipCard, MotionSupport, Phase, ProgressCounter,
    RevealTarget, SpikeCounter, Step, ThresholdDrag, Typewriter,
};
pub use systems::interaction::{Gadget, Interactions};
