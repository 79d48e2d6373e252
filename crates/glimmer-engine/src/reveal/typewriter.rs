//! Timed reveal: type a text out one character per cadence tick.

use crate::api::config::TypewriterConfig;
use crate::api::types::TargetId;
use super::target::{Phase, RevealTarget, Step};

#[derive(Debug)]
pub struct Typewriter {
    target: RevealTarget,
    cadence_ms: u32,
    text: String,
    /// Byte offset just past each character of `text`.
    char_ends: Vec<usize>,
    /// Characters shown so far.
    cursor: usize,
    /// Time accumulated toward the next character.
    carry_ms: u32,
    running: bool,
    disposed: bool,
}

impl Typewriter {
    pub fn new(id: TargetId, config: TypewriterConfig) -> Self {
        Self {
            target: RevealTarget::new(id),
            cadence_ms: config.cadence_ms.max(1),
            text: String::new(),
            char_ends: Vec::new(),
            cursor: 0,
            carry_ms: 0,
            running: false,
            disposed: false,
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

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.target.is_revealed()
    }

    /// The caret blinks only while typing.
    pub fn caret_visible(&self) -> bool {
        self.running
    }

    /// Characters shown so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the full text in characters.
    pub fn len_chars(&self) -> usize {
        self.char_ends.len()
    }

    /// Typed fraction as progress in [0, 100].
    pub fn progress(&self) -> f32 {
        if self.is_complete() {
            100.0
        } else if self.char_ends.is_empty() {
            0.0
        } else {
            self.cursor as f32 / self.char_ends.len() as f32 * 100.0
        }
    }

    /// The visible prefix `full_text[0..cursor]`.
    pub fn visible(&self) -> &str {
        match self.cursor {
            0 => "",
            n => &self.text[..self.char_ends[n - 1]],
        }
    }

    /// Begin typing `full_text`. A no-op while running, once complete, or
    /// after disposal.
    pub fn start(&mut self, full_text: &str) -> Step {
        if self.running || self.disposed || self.target.is_revealed() {
            return Step::Ignored;
        }
        self.text = full_text.to_owned();
        self.char_ends = full_text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        self.cursor = 0;
        self.carry_ms = 0;
        self.target.activate();
        if self.char_ends.is_empty() {
            return self.target.reveal();
        }
        self.running = true;
        Step::Updated
    }

    /// Let `dt_ms` pass, typing one character per elapsed cadence tick.
    pub fn advance(&mut self, dt_ms: u32) -> Step {
        if !self.running {
            return Step::Ignored;
        }
        self.carry_ms = self.carry_ms.saturating_add(dt_ms);
        let ticks = (self.carry_ms / self.cadence_ms) as usize;
        if ticks == 0 {
            return Step::Ignored;
        }
        self.carry_ms -= (ticks as u32) * self.cadence_ms;
        self.cursor = (self.cursor + ticks).min(self.char_ends.len());
        if self.cursor == self.char_ends.len() {
            self.running = false;
            self.carry_ms = 0;
            self.target.reveal()
        } else {
            Step::Updated
        }
    }

    /// Stop the cadence for good (teardown). Nothing changes after this.
    pub fn dispose(&mut self) {
        self.running = false;
        self.disposed = true;
    }
}
