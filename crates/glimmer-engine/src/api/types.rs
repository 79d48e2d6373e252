use bytemuck::{Pod, Zeroable};

/// Unique identifier for a reveal target in the experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Event kind: a target transitioned to revealed. `target` is the id.
pub const EVENT_REVEALED: f32 = 1.0;
/// Event kind: every target of a chapter is revealed. `a` is the chapter index.
pub const EVENT_CHAPTER_COMPLETE: f32 = 2.0;
/// First event kind free for experience-defined events.
pub const EVENT_USER_BASE: f32 = 100.0;

/// Snapshot flag: a shake spike happened within the last `shaking_ms`.
pub const FLAG_SHAKING: u32 = 1;
/// Snapshot flag: a typewriter is typing (the caret shows).
pub const FLAG_RUNNING: u32 = 1 << 1;
/// Snapshot flag: a drag or stroke is held down.
pub const FLAG_PRESSED: u32 = 1 << 2;

/// An event communicated from Rust to JavaScript through the output buffer.
/// Generic container: `kind` identifies the event, `target` the subject,
/// `a/b` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RevealEvent {
    pub kind: f32,
    pub target: f32,
    pub a: f32,
    pub b: f32,
}

impl RevealEvent {
    pub const FLOATS: usize = 4;

    pub fn revealed(id: TargetId) -> Self {
        Self {
            kind: EVENT_REVEALED,
            target: id.0 as f32,
            a: 0.0,
            b: 0.0,
        }
    }

    pub fn chapter_complete(chapter: u32) -> Self {
        Self {
            kind: EVENT_CHAPTER_COMPLETE,
            target: 0.0,
            a: chapter as f32,
            b: 0.0,
        }
    }
}

/// Per-target output record read by the presentation layer each frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TargetSnapshot {
    pub id: f32,
    /// 1.0 once revealed, 0.0 before.
    pub revealed: f32,
    /// Progress in [0, 100].
    pub progress: f32,
    /// Visual offset along the release axis (drag targets only).
    pub offset: f32,
    /// Transient `FLAG_*` bits, stored as a float.
    pub flags: f32,
}

impl TargetSnapshot {
    pub const FLOATS: usize = 5;

    pub fn has_flag(&self, flag: u32) -> bool {
        (self.flags as u32) & flag != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_casts_to_four_floats() {
        let events = [RevealEvent::revealed(TargetId(7)), RevealEvent::chapter_complete(3)];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats.len(), 2 * RevealEvent::FLOATS);
        assert_eq!(&floats[..4], &[EVENT_REVEALED, 7.0, 0.0, 0.0]);
        assert_eq!(floats[4], EVENT_CHAPTER_COMPLETE);
        assert_eq!(floats[6], 3.0);
    }

    #[test]
    fn snapshot_is_five_floats() {
        assert_eq!(
            std::mem::size_of::<TargetSnapshot>(),
            TargetSnapshot::FLOATS * 4
        );
    }
}
