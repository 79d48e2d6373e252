use crate::api::config::RevealConfig;
use crate::api::types::{RevealEvent, TargetId};
use crate::core::board::RevealBoard;
use crate::core::timer::{TimerFired, TimerQueue};
use crate::input::queue::InputQueue;
use crate::reveal::MotionSupport;

/// Configuration for the engine, provided by the experience.
#[derive(Debug, Clone)]
pub struct ExperienceConfig {
    /// Maximum number of targets exported per frame (default: 64).
    pub max_targets: usize,
    /// Maximum number of events exported per frame (default: 32).
    pub max_events: usize,
    /// Longest frame delta honoured, in ms (default: 250).
    pub max_frame_ms: u32,
    /// Thresholds for the reveal primitives.
    pub reveal: RevealConfig,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            max_targets: 64,
            max_events: 32,
            max_frame_ms: 250,
            reveal: RevealConfig::default(),
        }
    }
}

/// The contract every interactive experience fulfils.
pub trait Experience {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> ExperienceConfig {
        ExperienceConfig::default()
    }

    /// Create targets and schedule anything that starts immediately.
    fn init(&mut self, ctx: &mut RevealContext);

    /// One frame: consume input, react to fired timers, advance timed reveals.
    fn update(&mut self, ctx: &mut RevealContext, input: &InputQueue);

    /// Teardown. Timers are already cancelled when this runs.
    fn dispose(&mut self, _ctx: &mut RevealContext) {}

    /// The host found out whether motion samples are available.
    fn motion_support(&mut self, _support: MotionSupport) {}

    /// Text currently shown by a text-bearing target (typewriters).
    fn visible_text(&self, _target: TargetId) -> Option<&str> {
        None
    }
}

/// Mutable session state, passed to `Experience::init` and `Experience::update`.
pub struct RevealContext {
    pub board: RevealBoard,
    pub timers: TimerQueue,
    pub events: Vec<RevealEvent>,
    pub reveal: RevealConfig,
    now_ms: u64,
    dt_ms: u32,
    next_id: u32,
    disposed: bool,
}

impl RevealContext {
    pub fn new(reveal: RevealConfig) -> Self {
        Self {
            board: RevealBoard::new(),
            timers: TimerQueue::new(),
            events: Vec::new(),
            reveal,
            now_ms: 0,
            dt_ms: 0,
            next_id: 1,
            disposed: false,
        }
    }

    /// Generate the next unique target ID.
    pub fn next_id(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit an event to be forwarded to JavaScript.
    pub fn emit_event(&mut self, event: RevealEvent) {
        self.events.push(event);
    }

    /// Record a reveal on the board and emit its event.
    /// Returns false (and emits nothing) if the target was already revealed.
    pub fn announce_reveal(&mut self, id: TargetId) -> bool {
        if !self.board.mark_revealed(id) {
            return false;
        }
        let tag = self.board.get(id).map(|e| e.tag.as_str()).unwrap_or("");
        log::info!(
            "revealed target {} ({}): {}/{} in chapter",
            id.0,
            tag,
            self.board.revealed_in_tag(tag),
            self.board.count_tag(tag)
        );
        self.emit_event(RevealEvent::revealed(id));
        true
    }

    /// Move the session clock forward. Called by the runner once per frame.
    pub fn advance_clock(&mut self, dt_ms: u32) {
        self.dt_ms = dt_ms;
        self.now_ms += dt_ms as u64;
        self.timers.set_now(self.now_ms);
    }

    /// Milliseconds since the session started.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Milliseconds covered by the current frame.
    pub fn dt_ms(&self) -> u32 {
        self.dt_ms
    }

    /// Timers due at the current time. Empty after disposal.
    pub fn poll_timers(&mut self) -> Vec<TimerFired> {
        if self.disposed {
            return Vec::new();
        }
        self.timers.poll(self.now_ms)
    }

    /// Clear per-frame transient data (events).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Cancel every pending timer and refuse further time.
    pub fn dispose(&mut self) {
        self.timers.cancel_all();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for RevealContext {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}
