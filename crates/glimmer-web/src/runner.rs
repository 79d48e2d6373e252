use glimmer_engine::{
    Experience, ExperienceConfig, FrameClock, FrameData, InputEvent, InputQueue, MotionSupport,
    ProtocolLayout, RevealConfig, RevealContext, TargetId, TargetSnapshot,
};

/// Generic experience runner that wires up the frame loop.
///
/// Each concrete experience (e.g., `birthday-greeting`) creates a `thread_local!`
/// ExperienceRunner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct ExperienceRunner<E: Experience> {
    experience: E,
    ctx: RevealContext,
    input: InputQueue,
    clock: FrameClock,
    config: ExperienceConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame: u32,
    /// Target snapshots of the last frame.
    snapshots: Vec<TargetSnapshot>,
    /// Flat frame buffer in `ProtocolLayout` order.
    frame_buffer: Vec<f32>,
    target_count: usize,
    event_count: usize,
}

impl<E: Experience> ExperienceRunner<E> {
    pub fn new(experience: E) -> Self {
        let config = experience.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: RevealContext::new(config.reveal.clone()),
            input: InputQueue::new(),
            clock: FrameClock::new(config.max_frame_ms),
            snapshots: Vec::with_capacity(config.max_targets),
            frame_buffer: vec![0.0; layout.buffer_total_floats],
            experience,
            layout,
            config,
            initialized: false,
            frame: 0,
            target_count: 0,
            event_count: 0,
        }
    }

    /// Initialize the experience. Call once after construction (and after
    /// `load_config`, so targets pick up the loaded thresholds).
    pub fn init(&mut self) {
        if self.initialized || self.ctx.is_disposed() {
            return;
        }
        self.experience.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Replace the reveal thresholds from JSON. Bad JSON keeps the current ones.
    pub fn load_config(&mut self, json: &str) {
        match RevealConfig::from_json(json) {
            Ok(reveal) => {
                if self.initialized {
                    log::warn!("reveal config loaded after init; existing targets keep their thresholds");
                }
                self.config.reveal = reveal.clone();
                self.ctx.reveal = reveal;
            }
            Err(e) => {
                log::warn!("Failed to parse reveal config: {}; keeping defaults", e);
            }
        }
    }

    /// Push an input event into the queue. Dropped after dispose.
    pub fn push_input(&mut self, event: InputEvent) {
        if !self.input.push(event) {
            log::debug!("input after dispose ignored: {:?}", event);
        }
    }

    /// Run one frame tick: advance the clock, update the experience, publish
    /// the frame buffer. `dt` is the browser frame delta in seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.ctx.is_disposed() {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let step_ms = self.clock.accumulate(dt);
        self.ctx.advance_clock(step_ms);
        self.experience.update(&mut self.ctx, &self.input);

        // Drain input after update
        self.input.drain();

        self.frame = self.frame.wrapping_add(1);
        self.publish();
    }

    fn publish(&mut self) {
        self.ctx
            .board
            .write_snapshots(&mut self.snapshots, self.layout.max_targets);
        let (targets, events) = self.layout.pack(
            &mut self.frame_buffer,
            &FrameData {
                frame: self.frame,
                targets: &self.snapshots,
                events: &self.ctx.events,
                revealed_count: self.ctx.board.revealed_count(),
            },
        );
        self.target_count = targets;
        self.event_count = events;
    }

    /// Tear down: cancel timers, stop accepting input, let the experience
    /// release its state. Later ticks and inputs are no-ops.
    pub fn dispose(&mut self) {
        if self.ctx.is_disposed() {
            return;
        }
        self.ctx.dispose();
        self.input.close();
        self.experience.dispose(&mut self.ctx);
        log::info!("experience disposed after {} frames", self.frame);
    }

    /// Forward the host's motion capability to the experience.
    pub fn set_motion_support(&mut self, support: MotionSupport) {
        if self.ctx.is_disposed() {
            return;
        }
        self.experience.motion_support(support);
    }

    /// Visible text of a target, empty if it carries none.
    pub fn visible_text(&self, target: TargetId) -> String {
        self.experience
            .visible_text(target)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    pub fn is_disposed(&self) -> bool {
        self.ctx.is_disposed()
    }

    pub fn experience(&self) -> &E {
        &self.experience
    }

    pub fn context(&self) -> &RevealContext {
        &self.ctx
    }

    // ---- Pointer accessors for the presentation layer ----

    pub fn frame_buffer_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn frame_buffer(&self) -> &[f32] {
        &self.frame_buffer
    }

    pub fn targets_ptr(&self) -> *const f32 {
        self.snapshots.as_ptr() as *const f32
    }

    pub fn target_count(&self) -> u32 {
        self.target_count as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn event_count(&self) -> u32 {
        self.event_count as u32
    }

    pub fn revealed_count(&self) -> u32 {
        self.ctx.board.revealed_count() as u32
    }

    pub fn now_ms(&self) -> f64 {
        self.ctx.now_ms() as f64
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_targets(&self) -> u32 {
        self.layout.max_targets as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_engine::bridge::protocol::{HEADER_EVENT_COUNT, HEADER_FRAME_COUNTER};
    use glimmer_engine::{Gadget, Interactions, EVENT_REVEALED, FLAG_SHAKING};

    /// One lantern and one typewriter, nothing else.
    #[derive(Default)]
    struct Probe {
        interactions: Interactions,
        lantern: Option<TargetId>,
        poem: Option<TargetId>,
        shake: Option<TargetId>,
        disposed: bool,
    }

    impl Experience for Probe {
        fn init(&mut self, ctx: &mut RevealContext) {
            self.lantern = Some(self.interactions.add_drag(ctx, "lanterns"));
            self.poem = Some(self.interactions.add_typewriter(ctx, "poetry", "hi"));
            self.shake = Some(self.interactions.add_shake(ctx, "shake"));
        }

        fn update(&mut self, ctx: &mut RevealContext, input: &InputQueue) {
            self.interactions.dispatch(ctx, input);
            self.interactions.advance(ctx);
        }

        fn dispose(&mut self, _ctx: &mut RevealContext) {
            self.interactions.dispose();
            self.disposed = true;
        }

        fn visible_text(&self, target: TargetId) -> Option<&str> {
            match self.interactions.get(target)? {
                Gadget::Typewriter { writer, .. } => Some(writer.visible()),
                _ => None,
            }
        }
    }

    fn started() -> ExperienceRunner<Probe> {
        let mut runner = ExperienceRunner::new(Probe::default());
        runner.init();
        runner
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = ExperienceRunner::new(Probe::default());
        runner.tick(0.016);
        assert_eq!(runner.context().now_ms(), 0);
        assert_eq!(runner.target_count(), 0);
    }

    #[test]
    fn init_publishes_targets() {
        let runner = started();
        assert_eq!(runner.target_count(), 3);
        assert_eq!(runner.buffer_total_floats(), 8 + 64 * 5 + 32 * 4);
    }

    #[test]
    fn drag_reveal_shows_up_in_the_frame_buffer() {
        let mut runner = started();
        let lantern = runner.experience().lantern.unwrap();
        runner.push_input(InputEvent::PointerDown { target: lantern, x: 0.0, y: 300.0 });
        runner.push_input(InputEvent::PointerMove { target: lantern, x: 0.0, y: 220.0 });
        runner.push_input(InputEvent::PointerUp { target: lantern, x: 0.0, y: 220.0 });
        runner.tick(0.016);

        assert_eq!(runner.event_count(), 1);
        assert_eq!(runner.revealed_count(), 1);
        let buffer = runner.frame_buffer();
        assert_eq!(buffer[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(buffer[HEADER_EVENT_COUNT], 1.0);
        let layout = ProtocolLayout::from_config(&ExperienceConfig::default());
        assert_eq!(buffer[layout.event_data_offset], EVENT_REVEALED);

        // Events are per frame
        runner.tick(0.016);
        assert_eq!(runner.event_count(), 0);
        assert_eq!(runner.revealed_count(), 1);
    }

    #[test]
    fn frames_drive_the_typewriter() {
        let mut runner = started();
        let poem = runner.experience().poem.unwrap();
        runner.push_input(InputEvent::Tap { target: poem });
        runner.tick(0.0);
        runner.tick(0.05);
        assert!(!runner.context().board.is_revealed(poem));
        assert_eq!(runner.visible_text(poem), "h");
        runner.tick(0.05);
        assert!(runner.context().board.is_revealed(poem));
        assert_eq!(runner.visible_text(poem), "hi");
        assert_eq!(runner.visible_text(TargetId(404)), "");
    }

    #[test]
    fn dispose_stops_everything() {
        let mut runner = started();
        let poem = runner.experience().poem.unwrap();
        runner.push_input(InputEvent::Tap { target: poem });
        runner.tick(0.0);
        runner.dispose();
        assert!(runner.experience().disposed);

        runner.push_input(InputEvent::Tap { target: poem });
        runner.tick(1.0);
        assert!(runner.is_disposed());
        assert!(!runner.context().board.is_revealed(poem));
        assert_eq!(runner.context().now_ms(), 0);

        // Second dispose is harmless
        runner.dispose();
    }

    #[test]
    fn load_config_applies_before_init_and_survives_bad_json() {
        let mut runner = ExperienceRunner::new(Probe::default());
        runner.load_config(r#"{"drag": {"commit_threshold": 10, "max_lift": 20}}"#);
        runner.load_config("not json");
        assert_eq!(runner.context().reveal.drag.commit_threshold, 10.0);
        runner.init();

        let lantern = runner.experience().lantern.unwrap();
        runner.push_input(InputEvent::PointerDown { target: lantern, x: 0.0, y: 100.0 });
        runner.push_input(InputEvent::PointerMove { target: lantern, x: 0.0, y: 85.0 });
        runner.push_input(InputEvent::PointerUp { target: lantern, x: 0.0, y: 85.0 });
        runner.tick(0.016);
        assert!(runner.context().board.is_revealed(lantern));
    }

    fn published_flags(runner: &ExperienceRunner<Probe>, id: TargetId) -> u32 {
        let layout = ProtocolLayout::from_config(&ExperienceConfig::default());
        let buffer = runner.frame_buffer();
        let count = runner.target_count() as usize;
        (0..count)
            .map(|i| layout.target_data_offset + i * TargetSnapshot::FLOATS)
            .find(|&at| buffer[at] == id.0 as f32)
            .map(|at| buffer[at + 4] as u32)
            .unwrap_or(0)
    }

    #[test]
    fn shake_flag_is_published_then_clears() {
        let mut runner = started();
        let shake = runner.experience().shake.unwrap();
        runner.push_input(InputEvent::Tap { target: shake });
        runner.tick(0.0);
        assert_eq!(published_flags(&runner, shake), FLAG_SHAKING);

        runner.tick(0.1);
        assert_eq!(published_flags(&runner, shake), FLAG_SHAKING);
        runner.tick(0.1);
        assert_eq!(published_flags(&runner, shake), 0);
    }
}
