use crate::api::types::{TargetId, TargetSnapshot};

/// Output state of one reveal target, as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardEntry {
    pub id: TargetId,
    /// Chapter/group tag for progress queries ("lanterns", "scratch", ...).
    pub tag: String,
    revealed: bool,
    progress: f32,
    offset: f32,
    flags: u32,
}

impl BoardEntry {
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Progress in [0, 100].
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Visual offset along the release axis.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Transient `FLAG_*` bits.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            id: self.id.0 as f32,
            revealed: if self.revealed { 1.0 } else { 0.0 },
            progress: self.progress,
            offset: self.offset,
            flags: self.flags as f32,
        }
    }
}

/// Flat store of every reveal target's output state.
/// Designed for tens of targets, not thousands.
///
/// `revealed` only ever goes from false to true, and progress never decreases.
pub struct RevealBoard {
    entries: Vec<BoardEntry>,
}

impl RevealBoard {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(32),
        }
    }

    /// Add a target. Re-spawning an existing id is ignored.
    pub fn spawn(&mut self, id: TargetId, tag: impl Into<String>) {
        if self.get(id).is_some() {
            log::warn!("board: target {} already spawned", id.0);
            return;
        }
        self.entries.push(BoardEntry {
            id,
            tag: tag.into(),
            revealed: false,
            progress: 0.0,
            offset: 0.0,
            flags: 0,
        });
    }

    pub fn get(&self, id: TargetId) -> Option<&BoardEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: TargetId) -> Option<&mut BoardEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn is_revealed(&self, id: TargetId) -> bool {
        self.get(id).is_some_and(|e| e.revealed)
    }

    /// Mark a target revealed. Returns true only on the first call for that target.
    pub fn mark_revealed(&mut self, id: TargetId) -> bool {
        match self.get_mut(id) {
            Some(entry) if !entry.revealed => {
                entry.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// Raise a target's progress. Values are clamped to [0, 100] and never lower it.
    pub fn set_progress(&mut self, id: TargetId, progress: f32) {
        if let Some(entry) = self.get_mut(id) {
            if progress.is_finite() {
                entry.progress = entry.progress.max(progress.clamp(0.0, 100.0));
            }
        }
    }

    pub fn set_offset(&mut self, id: TargetId, offset: f32) {
        if let Some(entry) = self.get_mut(id) {
            if offset.is_finite() {
                entry.offset = offset;
            }
        }
    }

    /// Replace a target's transient flags. Unlike progress these fall as well as rise.
    pub fn set_flags(&mut self, id: TargetId, flags: u32) {
        if let Some(entry) = self.get_mut(id) {
            entry.flags = flags;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoardEntry> {
        self.entries.iter()
    }

    /// Global revealed count across every chapter.
    pub fn revealed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.revealed).count()
    }

    /// Number of targets carrying `tag`.
    pub fn count_tag(&self, tag: &str) -> usize {
        self.entries.iter().filter(|e| e.tag == tag).count()
    }

    /// Number of revealed targets carrying `tag`.
    pub fn revealed_in_tag(&self, tag: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.tag == tag && e.revealed)
            .count()
    }

    /// Whether every target with `tag` is revealed. False for an empty tag.
    pub fn is_tag_complete(&self, tag: &str) -> bool {
        let total = self.count_tag(tag);
        total > 0 && self.revealed_in_tag(tag) == total
    }

    /// Write snapshots of every target into `out` (cleared first), up to `max`.
    pub fn write_snapshots(&self, out: &mut Vec<TargetSnapshot>, max: usize) {
        out.clear();
        out.extend(self.entries.iter().take(max).map(BoardEntry::snapshot));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RevealBoard {
    fn default() -> Self {
        Self::new()
    }
}
