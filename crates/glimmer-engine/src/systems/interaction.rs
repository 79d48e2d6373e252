//! Interaction system: routes input samples to the reveal primitives that
//! own each target, and mirrors their state onto the board.
//!
//! Usage:
//!   let mut interactions = Interactions::new();
//!   let lantern = interactions.add_drag(ctx, "lanterns");
//!   interactions.dispatch(ctx, input);   // once per frame
//!   interactions.advance(ctx);           // timed reveals

use glam::{Vec2, Vec3};

use crate::api::experience::RevealContext;
use crate::api::types::{TargetId, FLAG_PRESSED, FLAG_RUNNING, FLAG_SHAKING};
use crate::input::queue::{InputEvent, InputQueue};
use crate::input::sample::{GestureSample, MotionSample};
use crate::reveal::{
    CoverageAccumulator, FlipCard, MotionSupport, RevealTarget, SpikeCounter, Step,
    ThresholdDrag, Typewriter,
};

/// A reveal primitive bound to one target.
#[derive(Debug)]
pub enum Gadget {
    Drag(ThresholdDrag),
    Coverage(CoverageAccumulator),
    Spike(SpikeCounter),
    /// A typewriter and the text a tap starts it on. `started_ms` is the
    /// session time of the tap; that frame's delta is not typed.
    Typewriter {
        writer: Typewriter,
        script: String,
        started_ms: Option<u64>,
    },
    Flip(FlipCard),
}

impl Gadget {
    pub fn target(&self) -> &RevealTarget {
        match self {
            Gadget::Drag(g) => g.target(),
            Gadget::Coverage(g) => g.target(),
            Gadget::Spike(g) => g.target(),
            Gadget::Typewriter { writer, .. } => writer.target(),
            Gadget::Flip(g) => g.target(),
        }
    }

    pub fn target_mut(&mut self) -> &mut RevealTarget {
        match self {
            Gadget::Drag(g) => g.target_mut(),
            Gadget::Coverage(g) => g.target_mut(),
            Gadget::Spike(g) => g.target_mut(),
            Gadget::Typewriter { writer, .. } => writer.target_mut(),
            Gadget::Flip(g) => g.target_mut(),
        }
    }

    pub fn id(&self) -> TargetId {
        self.target().id()
    }

    /// Progress as shown to the presentation layer, in [0, 100].
    fn progress(&self) -> f32 {
        match self {
            Gadget::Coverage(g) => g.progress(),
            Gadget::Spike(g) => g.progress(),
            Gadget::Typewriter { writer, .. } => writer.progress(),
            Gadget::Drag(_) | Gadget::Flip(_) => {
                if self.target().is_revealed() {
                    100.0
                } else {
                    0.0
                }
            }
        }
    }

    fn offset(&self) -> f32 {
        match self {
            Gadget::Drag(g) => g.offset(),
            _ => 0.0,
        }
    }

    /// Transient `FLAG_*` bits for the presentation layer.
    pub fn flags(&self) -> u32 {
        match self {
            Gadget::Drag(g) if g.is_dragging() => FLAG_PRESSED,
            Gadget::Coverage(g) if g.is_stroking() => FLAG_PRESSED,
            Gadget::Spike(g) if g.is_shaking() => FLAG_SHAKING,
            Gadget::Typewriter { writer, .. } if writer.caret_visible() => FLAG_RUNNING,
            _ => 0,
        }
    }

    /// Feed one addressed event. Returns `Step::Ignored` for events this kind
    /// of gadget doesn't use.
    fn handle(&mut self, event: &InputEvent, now_ms: u64) -> Step {
        match (self, *event) {
            (Gadget::Drag(g), InputEvent::PointerDown { x, y, .. }) => {
                g.begin(GestureSample::new(Vec2::new(x, y), now_ms))
            }
            (Gadget::Drag(g), InputEvent::PointerMove { x, y, .. }) => {
                g.update(GestureSample::new(Vec2::new(x, y), now_ms))
            }
            (Gadget::Drag(g), InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. }) => {
                g.end()
            }
            (Gadget::Coverage(g), InputEvent::PointerDown { x, y, .. }) => {
                g.start_stroke(GestureSample::new(Vec2::new(x, y), now_ms))
            }
            (Gadget::Coverage(g), InputEvent::PointerMove { x, y, .. }) => {
                g.extend_stroke(GestureSample::new(Vec2::new(x, y), now_ms))
            }
            (
                Gadget::Coverage(g),
                InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. },
            ) => g.end_stroke(),
            (Gadget::Spike(g), InputEvent::Tap { .. }) => g.tap(),
            (
                Gadget::Typewriter {
                    writer,
                    script,
                    started_ms,
                },
                InputEvent::Tap { .. },
            ) => {
                let step = writer.start(script.as_str());
                if step != Step::Ignored {
                    *started_ms = Some(now_ms);
                }
                step
            }
            (Gadget::Flip(g), InputEvent::Tap { .. }) => g.flip(),
            _ => Step::Ignored,
        }
    }
}

/// Every reveal primitive in an experience, keyed by target.
#[derive(Debug, Default)]
pub struct Interactions {
    gadgets: Vec<Gadget>,
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gadget built for a freshly allocated target carrying `tag`.
    pub fn add(
        &mut self,
        ctx: &mut RevealContext,
        tag: &str,
        build: impl FnOnce(TargetId, &RevealContext) -> Gadget,
    ) -> TargetId {
        let id = ctx.next_id();
        ctx.board.spawn(id, tag);
        let gadget = build(id, ctx);
        self.gadgets.push(gadget);
        id
    }

    pub fn add_drag(&mut self, ctx: &mut RevealContext, tag: &str) -> TargetId {
        self.add(ctx, tag, |id, ctx| {
            Gadget::Drag(ThresholdDrag::new(id, ctx.reveal.drag))
        })
    }

    pub fn add_scratch(&mut self, ctx: &mut RevealContext, tag: &str) -> TargetId {
        self.add(ctx, tag, |id, ctx| {
            Gadget::Coverage(CoverageAccumulator::new(id, ctx.reveal.scratch))
        })
    }

    pub fn add_canvas(&mut self, ctx: &mut RevealContext, tag: &str) -> TargetId {
        self.add(ctx, tag, |id, ctx| {
            Gadget::Coverage(CoverageAccumulator::new(id, ctx.reveal.canvas))
        })
    }

    pub fn add_shake(&mut self, ctx: &mut RevealContext, tag: &str) -> TargetId {
        self.add(ctx, tag, |id, ctx| {
            Gadget::Spike(SpikeCounter::new(id, ctx.reveal.shake))
        })
    }

    pub fn add_typewriter(
        &mut self,
        ctx: &mut RevealContext,
        tag: &str,
        script: impl Into<String>,
    ) -> TargetId {
        let script = script.into();
        self.add(ctx, tag, |id, ctx| Gadget::Typewriter {
            writer: Typewriter::new(id, ctx.reveal.typewriter),
            script,
            started_ms: None,
        })
    }

    pub fn add_flip(&mut self, ctx: &mut RevealContext, tag: &str) -> TargetId {
        self.add(ctx, tag, |id, _| Gadget::Flip(FlipCard::new(id)))
    }

    pub fn get(&self, id: TargetId) -> Option<&Gadget> {
        self.gadgets.iter().find(|g| g.id() == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Gadget> {
        self.gadgets.iter_mut().find(|g| g.id() == id)
    }

    /// Attach a completion callback to a target.
    pub fn on_reveal(&mut self, id: TargetId, callback: impl FnOnce(TargetId) + 'static) {
        if let Some(gadget) = self.get_mut(id) {
            gadget.target_mut().set_on_reveal(callback);
        }
    }

    /// Feed one event. Returns the targets revealed by it.
    pub fn handle(&mut self, ctx: &mut RevealContext, event: &InputEvent) -> Vec<TargetId> {
        let now_ms = ctx.now_ms();
        let mut revealed = Vec::new();
        match *event {
            InputEvent::Motion { x, y, z } => {
                let sample = MotionSample::new(Vec3::new(x, y, z), now_ms);
                for gadget in self.gadgets.iter_mut() {
                    let step = match gadget {
                        Gadget::Spike(counter) => counter.on_motion_sample(sample),
                        _ => continue,
                    };
                    Self::sync(ctx, gadget, step, &mut revealed);
                }
            }
            InputEvent::Custom { .. } => {}
            _ => {
                let Some(target) = event.target() else {
                    return revealed;
                };
                match self.gadgets.iter_mut().find(|g| g.id() == target) {
                    Some(gadget) => {
                        let step = gadget.handle(event, now_ms);
                        Self::sync(ctx, gadget, step, &mut revealed);
                    }
                    None => log::debug!("input for unknown target {}", target.0),
                }
            }
        }
        revealed
    }

    /// Route every pending sample. Returns the targets revealed this frame.
    pub fn dispatch(&mut self, ctx: &mut RevealContext, input: &InputQueue) -> Vec<TargetId> {
        let mut revealed = Vec::new();
        for event in input.iter() {
            revealed.extend(self.handle(ctx, event));
        }
        revealed
    }

    /// Let the current frame's time pass for timed primitives.
    /// Returns the targets revealed by it.
    pub fn advance(&mut self, ctx: &mut RevealContext) -> Vec<TargetId> {
        let now_ms = ctx.now_ms();
        let dt_ms = ctx.dt_ms();
        let mut revealed = Vec::new();
        for gadget in self.gadgets.iter_mut() {
            let step = match gadget {
                Gadget::Typewriter {
                    writer, started_ms, ..
                } => {
                    // Time before the tap within this frame isn't typing time
                    let dt = if *started_ms == Some(now_ms) { 0 } else { dt_ms };
                    writer.advance(dt)
                }
                Gadget::Spike(counter) => {
                    counter.advance(dt_ms);
                    Step::Ignored
                }
                _ => Step::Ignored,
            };
            Self::sync(ctx, gadget, step, &mut revealed);
            // Flags decay with time even when nothing else changes
            ctx.board.set_flags(gadget.id(), gadget.flags());
        }
        revealed
    }

    fn sync(ctx: &mut RevealContext, gadget: &Gadget, step: Step, revealed: &mut Vec<TargetId>) {
        if step == Step::Ignored {
            return;
        }
        let id = gadget.id();
        ctx.board.set_progress(id, gadget.progress());
        ctx.board.set_offset(id, gadget.offset());
        ctx.board.set_flags(id, gadget.flags());
        if step.fired() && ctx.announce_reveal(id) {
            revealed.push(id);
        }
    }

    /// Report whether the host can deliver motion samples.
    pub fn set_motion_support(&mut self, support: MotionSupport) {
        for gadget in self.gadgets.iter_mut() {
            if let Gadget::Spike(counter) = gadget {
                counter.set_support(support);
            }
        }
    }

    /// Stop every timed primitive (teardown).
    pub fn dispose(&mut self) {
        for gadget in self.gadgets.iter_mut() {
            match gadget {
                Gadget::Typewriter { writer, .. } => writer.dispose(),
                Gadget::Spike(counter) => counter.cancel(),
                _ => {}
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gadget> {
        self.gadgets.iter()
    }

    pub fn len(&self) -> usize {
        self.gadgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gadgets.is_empty()
    }
}
