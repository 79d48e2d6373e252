/// Frame buffer layout shared with the presentation layer.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Targets: max_targets × 5 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::experience::ExperienceConfig;
use crate::api::types::{RevealEvent, TargetSnapshot};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_TARGETS: usize = 2;
pub const HEADER_TARGET_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_PROTOCOL_VERSION: usize = 6;
pub const HEADER_REVEALED_COUNT: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats per target snapshot: id, revealed, progress, offset, flags.
pub const TARGET_FLOATS: usize = TargetSnapshot::FLOATS;

/// Floats per event: kind, target, a, b.
pub const EVENT_FLOATS: usize = RevealEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum target snapshots per frame.
    pub max_targets: usize,
    /// Maximum events per frame.
    pub max_events: usize,

    /// Size of target data section in floats.
    pub target_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where target data begins.
    pub target_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

/// What one frame writes into the buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    pub frame: u32,
    pub targets: &'a [TargetSnapshot],
    pub events: &'a [RevealEvent],
    pub revealed_count: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_targets: usize, max_events: usize) -> Self {
        let target_data_floats = max_targets * TARGET_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let target_data_offset = HEADER_FLOATS;
        let event_data_offset = target_data_offset + target_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_targets,
            max_events,
            target_data_floats,
            event_data_floats,
            target_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from an ExperienceConfig.
    pub fn from_config(config: &ExperienceConfig) -> Self {
        Self::new(config.max_targets, config.max_events)
    }

    /// Write one frame into `buffer`, which must hold `buffer_total_floats`.
    /// Targets and events beyond capacity are dropped. Returns the
    /// (target, event) counts actually written.
    pub fn pack(&self, buffer: &mut [f32], frame: &FrameData) -> (usize, usize) {
        if buffer.len() < self.buffer_total_floats {
            log::warn!(
                "frame buffer too small: {} < {} floats",
                buffer.len(),
                self.buffer_total_floats
            );
            return (0, 0);
        }

        let target_count = frame.targets.len().min(self.max_targets);
        let event_count = frame.events.len().min(self.max_events);
        if frame.events.len() > event_count {
            log::warn!("dropped {} events over capacity", frame.events.len() - event_count);
        }

        let targets: &[f32] = bytemuck::cast_slice(&frame.targets[..target_count]);
        let target_end = self.target_data_offset + targets.len();
        buffer[self.target_data_offset..target_end].copy_from_slice(targets);

        let events: &[f32] = bytemuck::cast_slice(&frame.events[..event_count]);
        let event_end = self.event_data_offset + events.len();
        buffer[self.event_data_offset..event_end].copy_from_slice(events);

        buffer[HEADER_FRAME_COUNTER] = frame.frame as f32;
        buffer[HEADER_MAX_TARGETS] = self.max_targets as f32;
        buffer[HEADER_TARGET_COUNT] = target_count as f32;
        buffer[HEADER_MAX_EVENTS] = self.max_events as f32;
        buffer[HEADER_EVENT_COUNT] = event_count as f32;
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buffer[HEADER_REVEALED_COUNT] = frame.revealed_count as f32;

        (target_count, event_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{TargetId, EVENT_REVEALED};

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&ExperienceConfig::default());

        assert_eq!(layout.max_targets, 64);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.target_data_floats, 64 * 5);
        assert_eq!(layout.event_data_floats, 32 * 4);
        assert_eq!(layout.target_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_offset, HEADER_FLOATS + 64 * 5);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 64 * 5 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(10, 3);

        assert_eq!(layout.target_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_offset, layout.target_data_offset + layout.target_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn pack_writes_header_targets_and_events() {
        let layout = ProtocolLayout::new(4, 2);
        let mut buffer = vec![0.0; layout.buffer_total_floats];
        let targets = [TargetSnapshot { id: 3.0, revealed: 1.0, progress: 100.0, offset: 62.0, flags: 4.0 }];
        let events = [RevealEvent::revealed(TargetId(3))];

        let counts = layout.pack(&mut buffer, &FrameData {
            frame: 9,
            targets: &targets,
            events: &events,
            revealed_count: 1,
        });

        assert_eq!(counts, (1, 1));
        assert_eq!(buffer[HEADER_FRAME_COUNTER], 9.0);
        assert_eq!(buffer[HEADER_TARGET_COUNT], 1.0);
        assert_eq!(buffer[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(buffer[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(buffer[HEADER_REVEALED_COUNT], 1.0);
        let t = layout.target_data_offset;
        assert_eq!(&buffer[t..t + 5], &[3.0, 1.0, 100.0, 62.0, 4.0]);
        let e = layout.event_data_offset;
        assert_eq!(&buffer[e..e + 2], &[EVENT_REVEALED, 3.0]);
    }

    #[test]
    fn pack_truncates_to_capacity() {
        let layout = ProtocolLayout::new(1, 1);
        let mut buffer = vec![0.0; layout.buffer_total_floats];
        let targets = [TargetSnapshot::default(); 3];
        let events = [RevealEvent::revealed(TargetId(1)), RevealEvent::revealed(TargetId(2))];

        let counts = layout.pack(&mut buffer, &FrameData {
            frame: 1,
            targets: &targets,
            events: &events,
            revealed_count: 2,
        });
        assert_eq!(counts, (1, 1));
        assert_eq!(buffer[layout.event_data_offset + 1], 1.0);
    }

    #[test]
    fn pack_refuses_short_buffers() {
        let layout = ProtocolLayout::new(4, 4);
        let mut buffer = vec![0.0; 4];
        let counts = layout.pack(&mut buffer, &FrameData {
            frame: 1,
            targets: &[],
            events: &[],
            revealed_count: 0,
        });
        assert_eq!(counts, (0, 0));
    }
}
