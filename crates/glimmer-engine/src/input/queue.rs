use crate::api::types::TargetId;

/// Input samples the engine understands.
/// Technology-neutral: mouse and touch both arrive as pointer samples,
/// device motion as raw acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A press began on `target` at element coordinates (x, y).
    PointerDown { target: TargetId, x: f32, y: f32 },
    /// The pressed pointer moved to (x, y).
    PointerMove { target: TargetId, x: f32, y: f32 },
    /// The press ended at (x, y).
    PointerUp { target: TargetId, x: f32, y: f32 },
    /// The pointer left the element mid-press. Treated as a release.
    PointerLeave { target: TargetId },
    /// A device-motion sample (acceleration including gravity).
    Motion { x: f32, y: f32, z: f32 },
    /// A discrete tap/click on `target`.
    Tap { target: TargetId },
    /// A custom event from the UI layer.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// The target an event is addressed to, if any. Motion and custom events
    /// are broadcast.
    pub fn target(&self) -> Option<TargetId> {
        match *self {
            InputEvent::PointerDown { target, .. }
            | InputEvent::PointerMove { target, .. }
            | InputEvent::PointerUp { target, .. }
            | InputEvent::PointerLeave { target }
            | InputEvent::Tap { target } => Some(target),
            InputEvent::Motion { .. } | InputEvent::Custom { .. } => None,
        }
    }
}

/// A lifetime-scoped queue of input samples.
/// JS pushes samples in; Rust drains them each frame. Once closed (the
/// owning experience was disposed) further samples are dropped.
pub struct InputQueue {
    events: Vec<InputEvent>,
    closed: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            closed: false,
        }
    }

    /// Push a new sample. Returns false if the queue is closed.
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.closed {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Stop accepting samples and discard anything pending.
    pub fn close(&mut self) {
        self.closed = true;
        self.events.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
