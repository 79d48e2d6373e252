use glimmer_engine::*;

// Event kinds (Rust → presentation), after the engine's built-in kinds
const EVENT_FINALE_PHASE: f32 = EVENT_USER_BASE + 1.0;
const EVENT_HIDDEN_POLAROID: f32 = EVENT_USER_BASE + 2.0;

// Timer tags
const TIMER_FINALE_START: u32 = 1;
const TIMER_FINALE_PHASE: u32 = 2;
const TIMER_FINALE_END: u32 = 3;

/// Delay between the canvas filling up and the grand finale.
const FINALE_DELAY_MS: u32 = 500;
/// Finale phase offsets from the finale start.
const FINALE_PHASES_MS: [u32; 3] = [200, 800, 1500];
const FINALE_END_MS: u32 = 4500;

/// Board tags, in chapter order.
pub const CHAPTERS: [&str; 7] = [
    "prologue", "poetry", "scratch", "lanterns", "polaroids", "canvas", "finale",
];

/// The shake gadget sits outside the chapter tags: it only unlocks a card.
const SHAKE_TAG: &str = "shake";

const POEMS: [&str; 4] = [
    "\"In the hush of winter nights, may warmth find you like a gentle falling snow.\"",
    "\"As spring returns with soft blossoms, may your days bloom with new hope and gentle beginnings.\"",
    "\"When summer sunlight fills the sky, may joy shine on you as brightly as the warm golden days.\"",
    "\"As autumn leaves drift softly down, may peace settle into your life like a quiet golden breeze.\"",
];

const MEMORY_CARDS: usize = 6;
const WISHES: usize = 6;
const POLAROIDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finale {
    Waiting,
    Scheduled,
    /// Running; the number of phases shown so far.
    Playing(u8),
    Done,
}

pub struct GreetingExperience {
    interactions: Interactions,
    opening: TargetId,
    poems: Vec<TargetId>,
    memories: Vec<TargetId>,
    lanterns: Vec<TargetId>,
    polaroids: Vec<TargetId>,
    shake: TargetId,
    hidden_polaroid: TargetId,
    canvas: TargetId,
    finale_target: TargetId,
    finale: Finale,
    chapters_done: [bool; CHAPTERS.len()],
}

impl GreetingExperience {
    pub fn new() -> Self {
        Self {
            interactions: Interactions::new(),
            opening: TargetId(0),
            poems: Vec::new(),
            memories: Vec::new(),
            lanterns: Vec::new(),
            polaroids: Vec::new(),
            shake: TargetId(0),
            hidden_polaroid: TargetId(0),
            canvas: TargetId(0),
            finale_target: TargetId(0),
            finale: Finale::Waiting,
            chapters_done: [false; CHAPTERS.len()],
        }
    }

    pub fn finale(&self) -> Finale {
        self.finale
    }

    pub fn chapter_done(&self, chapter: usize) -> bool {
        self.chapters_done.get(chapter).copied().unwrap_or(false)
    }

    /// The hidden polaroid only takes taps once the shake gadget is revealed.
    fn accepts(&self, ctx: &RevealContext, event: &InputEvent) -> bool {
        match event.target() {
            Some(id) if id == self.hidden_polaroid => ctx.board.is_revealed(self.shake),
            _ => true,
        }
    }

    fn on_revealed(&mut self, ctx: &mut RevealContext, id: TargetId) {
        if id == self.shake {
            log::info!("hidden polaroid unlocked");
            ctx.emit_event(RevealEvent {
                kind: EVENT_HIDDEN_POLAROID,
                target: self.hidden_polaroid.0 as f32,
                a: 0.0,
                b: 0.0,
            });
        } else if id == self.canvas && self.finale == Finale::Waiting {
            ctx.timers.schedule_once(FINALE_DELAY_MS, TIMER_FINALE_START);
            self.finale = Finale::Scheduled;
        }
    }

    fn on_timer(&mut self, ctx: &mut RevealContext, fired: TimerFired) {
        match fired.tag {
            TIMER_FINALE_START => {
                log::info!("grand finale");
                for delay in FINALE_PHASES_MS {
                    ctx.timers.schedule_once(delay, TIMER_FINALE_PHASE);
                }
                ctx.timers.schedule_once(FINALE_END_MS, TIMER_FINALE_END);
                self.finale = Finale::Playing(0);
                self.emit_phase(ctx, 0);
            }
            TIMER_FINALE_PHASE => {
                if let Finale::Playing(n) = self.finale {
                    self.finale = Finale::Playing(n + 1);
                    self.emit_phase(ctx, n + 1);
                }
            }
            TIMER_FINALE_END => {
                self.finale = Finale::Done;
                ctx.announce_reveal(self.finale_target);
            }
            other => log::warn!("unknown timer tag {}", other),
        }
    }

    fn emit_phase(&self, ctx: &mut RevealContext, phase: u8) {
        ctx.emit_event(RevealEvent {
            kind: EVENT_FINALE_PHASE,
            target: self.finale_target.0 as f32,
            a: phase as f32,
            b: 0.0,
        });
    }

    fn check_chapters(&mut self, ctx: &mut RevealContext) {
        for (index, tag) in CHAPTERS.iter().enumerate() {
            if self.chapters_done[index] || !ctx.board.is_tag_complete(tag) {
                continue;
            }
            self.chapters_done[index] = true;
            log::info!("chapter {} ({}) complete", index + 1, tag);
            ctx.emit_event(RevealEvent::chapter_complete(index as u32));
        }
    }
}

impl Experience for GreetingExperience {
    fn config(&self) -> ExperienceConfig {
        ExperienceConfig {
            max_targets: 32,
            max_events: 32,
            ..ExperienceConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut RevealContext) {
        self.opening = self.interactions.add_flip(ctx, CHAPTERS[0]);
        self.poems = POEMS
            .iter()
            .map(|poem| self.interactions.add_typewriter(ctx, CHAPTERS[1], *poem))
            .collect();
        self.memories = (0..MEMORY_CARDS)
            .map(|_| self.interactions.add_scratch(ctx, CHAPTERS[2]))
            .collect();
        self.lanterns = (0..WISHES)
            .map(|_| self.interactions.add_drag(ctx, CHAPTERS[3]))
            .collect();
        self.polaroids = (0..POLAROIDS)
            .map(|_| self.interactions.add_flip(ctx, CHAPTERS[4]))
            .collect();
        self.shake = self.interactions.add_shake(ctx, SHAKE_TAG);
        self.hidden_polaroid = self.interactions.add_flip(ctx, CHAPTERS[4]);
        self.canvas = self.interactions.add_canvas(ctx, CHAPTERS[5]);

        // The finale has no gadget: a timer reveals it
        self.finale_target = ctx.next_id();
        ctx.board.spawn(self.finale_target, CHAPTERS[6]);

        log::info!("greeting ready: {} targets", ctx.board.len());
    }

    fn update(&mut self, ctx: &mut RevealContext, input: &InputQueue) {
        for fired in ctx.poll_timers() {
            self.on_timer(ctx, fired);
        }

        let mut revealed = Vec::new();
        for event in input.iter() {
            if self.accepts(ctx, event) {
                revealed.extend(self.interactions.handle(ctx, event));
            } else {
                log::debug!("hidden polaroid still locked");
            }
        }
        revealed.extend(self.interactions.advance(ctx));

        for id in revealed {
            self.on_revealed(ctx, id);
        }
        self.check_chapters(ctx);
    }

    fn dispose(&mut self, _ctx: &mut RevealContext) {
        self.interactions.dispose();
    }

    fn motion_support(&mut self, support: MotionSupport) {
        self.interactions.set_motion_support(support);
    }

    fn visible_text(&self, target: TargetId) -> Option<&str> {
        match self.interactions.get(target)? {
            Gadget::Typewriter { writer, .. } => Some(writer.visible()),
            _ => None,
        }
    }
}
