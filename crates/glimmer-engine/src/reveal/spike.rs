//! Delta-spike counting: shake the device (or tap) enough times to reveal.

use glam::Vec3;

use crate::api::config::SpikeConfig;
use crate::api::types::TargetId;
use crate::input::sample::MotionSample;
use super::target::{Phase, RevealTarget, Step};

/// Whether the host can deliver device-motion samples.
/// Without motion the tap fallback is the only path; it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionSupport {
    /// Not yet known (permission prompt pending, or never asked).
    #[default]
    Unknown,
    Available,
    /// No sensor, or permission denied.
    Unavailable,
}

/// Counts large jumps between consecutive acceleration samples.
#[derive(Debug)]
pub struct SpikeCounter {
    target: RevealTarget,
    config: SpikeConfig,
    previous: Vec3,
    count: u32,
    /// Remaining time the transient "shaking" flag stays up.
    shaking_left_ms: u32,
    support: MotionSupport,
}

impl SpikeCounter {
    pub fn new(id: TargetId, config: SpikeConfig) -> Self {
        Self {
            target: RevealTarget::new(id),
            config: SpikeConfig {
                required_spikes: config.required_spikes.max(1),
                ..config
            },
            previous: Vec3::ZERO,
            count: 0,
            shaking_left_ms: 0,
            support: MotionSupport::Unknown,
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

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Spikes still needed.
    pub fn remaining(&self) -> u32 {
        self.config.required_spikes.saturating_sub(self.count)
    }

    /// Count as progress in [0, 100].
    pub fn progress(&self) -> f32 {
        (self.count as f32 / self.config.required_spikes as f32 * 100.0).min(100.0)
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking_left_ms > 0
    }

    pub fn support(&self) -> MotionSupport {
        self.support
    }

    pub fn set_support(&mut self, support: MotionSupport) {
        if support != self.support {
            log::info!("target {}: motion support {:?}", self.target.id().0, support);
        }
        self.support = support;
    }

    /// Whether the host should offer the tap fallback.
    pub fn prefers_tap(&self) -> bool {
        self.support != MotionSupport::Available
    }

    /// Feed one acceleration sample.
    pub fn on_motion_sample(&mut self, sample: MotionSample) -> Step {
        if self.target.is_revealed() || !sample.is_finite() {
            return Step::Ignored;
        }
        let delta = sample.delta(self.previous);
        self.previous = sample.accel;
        if delta > self.config.spike_threshold {
            self.spike()
        } else {
            Step::Ignored
        }
    }

    /// Manual fallback: exactly one spike.
    pub fn tap(&mut self) -> Step {
        if self.target.is_revealed() {
            return Step::Ignored;
        }
        self.spike()
    }

    fn spike(&mut self) -> Step {
        self.target.activate();
        self.count += 1;
        self.shaking_left_ms = self.config.shaking_ms;
        if self.count >= self.config.required_spikes {
            self.target.reveal()
        } else {
            Step::Updated
        }
    }

    /// Let time pass; clears the shaking flag once it runs out.
    pub fn advance(&mut self, dt_ms: u32) {
        self.shaking_left_ms = self.shaking_left_ms.saturating_sub(dt_ms);
    }

    /// Drop the transient flag immediately (teardown).
    pub fn cancel(&mut self) {
        self.shaking_left_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn shake() -> SpikeCounter {
        SpikeCounter::new(TargetId(1), SpikeConfig::default())
    }

    fn sample(x: f32, y: f32, z: f32) -> MotionSample {
        MotionSample::new(Vec3::new(x, y, z), 0)
    }

    /// Alternate between two far-apart readings so every sample spikes.
    fn jolt(counter: &mut SpikeCounter, i: u32) -> Step {
        let v = if i % 2 == 0 { 40.0 } else { -40.0 };
        counter.on_motion_sample(sample(v, 0.0, 0.0))
    }

    #[test]
    fn fifth_spike_reveals() {
        let fired = Rc::new(Cell::new(0));
        let mut s = shake();
        let counter = fired.clone();
        s.target_mut().set_on_reveal(move |_| counter.set(counter.get() + 1));

        for i in 0..4 {
            assert_eq!(jolt(&mut s, i), Step::Updated);
        }
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(jolt(&mut s, 4), Step::Revealed);
        assert_eq!(jolt(&mut s, 5), Step::Ignored);
        assert_eq!(s.count(), 5);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn small_deltas_never_count() {
        let mut s = shake();
        // Gravity at rest, then jitter: each delta stays at or below 30
        assert_eq!(s.on_motion_sample(sample(0.0, 9.8, 0.0)), Step::Ignored);
        for i in 0..50 {
            let j = if i % 2 == 0 { 10.0 } else { -10.0 };
            let _ = s.on_motion_sample(sample(j, 9.8, 0.0));
        }
        // Exactly at the threshold is not a spike
        let _ = s.on_motion_sample(sample(0.0, 9.8, 0.0));
        assert_eq!(s.on_motion_sample(sample(30.0, 9.8, 0.0)), Step::Ignored);
        assert_eq!(s.count(), 0);
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn delta_sums_all_axes() {
        let mut s = shake();
        assert_eq!(s.on_motion_sample(sample(11.0, 11.0, 11.0)), Step::Updated);
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn taps_share_the_counter() {
        let mut s = shake();
        let _ = jolt(&mut s, 0);
        let _ = jolt(&mut s, 1);
        for _ in 0..2 {
            assert_eq!(s.tap(), Step::Updated);
        }
        assert_eq!(s.tap(), Step::Revealed);
        assert_eq!(s.tap(), Step::Ignored);
        assert_eq!(s.progress(), 100.0);
    }

    #[test]
    fn shaking_flag_clears_after_timeout() {
        let mut s = shake();
        let _ = s.tap();
        assert!(s.is_shaking());
        s.advance(199);
        assert!(s.is_shaking());
        s.advance(1);
        assert!(!s.is_shaking());
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut s = shake();
        assert_eq!(s.on_motion_sample(sample(f32::NAN, 0.0, 0.0)), Step::Ignored);
        // The bad sample must not become the new baseline
        assert_eq!(s.on_motion_sample(sample(5.0, 0.0, 0.0)), Step::Ignored);
    }

    #[test]
    fn missing_sensor_prefers_tap() {
        let mut s = shake();
        assert!(s.prefers_tap());
        s.set_support(MotionSupport::Available);
        assert!(!s.prefers_tap());
        s.set_support(MotionSupport::Unavailable);
        assert!(s.prefers_tap());
    }

    #[test]
    fn zero_required_spikes_means_one() {
        let config = SpikeConfig {
            required_spikes: 0,
            ..SpikeConfig::default()
        };
        let mut s = SpikeCounter::new(TargetId(1), config);
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.tap(), Step::Revealed);
        assert_eq!(s.progress(), 100.0);
    }
}
