//! Coverage accumulation: scratch-off cards and the drawing canvas.
//!
//! Strokes are rasterized into a coarse occupancy mask, but reveal progress
//! counts stroke extensions, not covered cells. The mask is kept for the
//! presentation layer and for coverage queries.

use glam::Vec2;

use crate::api::config::CoverageConfig;
use crate::api::types::TargetId;
use crate::input::sample::GestureSample;
use super::target::{Phase, ProgressCounter, RevealTarget, Step};

/// A grid of painted/cleared cells over a `width × height` pixel surface.
#[derive(Debug, Clone)]
pub struct CoverageMask {
    width: f32,
    height: f32,
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
    covered: usize,
}

impl CoverageMask {
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        let cell = cell_size.max(1);
        let cols = width.max(1).div_ceil(cell) as usize;
        let rows = height.max(1).div_ceil(cell) as usize;
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            cell_size: cell as f32,
            cols,
            rows,
            cells: vec![false; cols * rows],
            covered: 0,
        }
    }

    /// Clamp a point onto the surface.
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        let p = if p.is_finite() { p } else { Vec2::ZERO };
        p.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Paint a round-capped segment of `line_width` from `a` to `b`.
    /// Returns the number of cells newly covered.
    pub fn stamp_segment(&mut self, a: Vec2, b: Vec2, line_width: f32) -> usize {
        let a = self.clamp_point(a);
        let b = self.clamp_point(b);
        let radius = (line_width * 0.5).max(0.5);

        let lo = a.min(b) - Vec2::splat(radius);
        let hi = a.max(b) + Vec2::splat(radius);
        let (c0, r0) = self.cell_of(lo);
        let (c1, r1) = self.cell_of(hi);

        let mut newly = 0;
        for row in r0..=r1 {
            for col in c0..=c1 {
                let center = Vec2::new(
                    (col as f32 + 0.5) * self.cell_size,
                    (row as f32 + 0.5) * self.cell_size,
                );
                if distance_to_segment(center, a, b) <= radius {
                    newly += self.mark(col, row);
                }
            }
        }
        // Endpoints always land, even when the brush is thinner than a cell
        for p in [a, b] {
            let (col, row) = self.cell_of(p);
            newly += self.mark(col, row);
        }
        self.covered += newly;
        newly
    }

    fn mark(&mut self, col: usize, row: usize) -> usize {
        let idx = row * self.cols + col;
        if self.cells[idx] {
            0
        } else {
            self.cells[idx] = true;
            1
        }
    }

    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let col = (p.x / self.cell_size).floor().max(0.0) as usize;
        let row = (p.y / self.cell_size).floor().max(0.0) as usize;
        (col.min(self.cols - 1), row.min(self.rows - 1))
    }

    /// Whether the cell containing `p` is covered.
    pub fn is_covered(&self, p: Vec2) -> bool {
        let (col, row) = self.cell_of(self.clamp_point(p));
        self.cells[row * self.cols + col]
    }

    /// Fraction of cells covered, in [0, 1].
    pub fn coverage(&self) -> f32 {
        self.covered as f32 / self.cells.len() as f32
    }

    pub fn covered_cells(&self) -> usize {
        self.covered
    }

    /// Grid dimensions (cols, rows).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Scratch/draw surface that reveals once enough strokes have been made.
#[derive(Debug)]
pub struct CoverageAccumulator {
    target: RevealTarget,
    config: CoverageConfig,
    mask: CoverageMask,
    progress: ProgressCounter,
    /// Last stroke sample (position clamped); `Some` only while a press is active.
    last: Option<GestureSample>,
    /// Total pointer travel across all strokes, in surface pixels.
    travelled: f32,
    /// Total strokes started, including ones that never extended.
    stroke_count: u32,
}

impl CoverageAccumulator {
    pub fn new(id: TargetId, config: CoverageConfig) -> Self {
        Self {
            target: RevealTarget::new(id),
            mask: CoverageMask::new(config.width, config.height, config.cell_size),
            progress: ProgressCounter::new(config.threshold),
            config,
            last: None,
            travelled: 0.0,
            stroke_count: 0,
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

    /// Progress in [0, 100].
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn mask(&self) -> &CoverageMask {
        &self.mask
    }

    pub fn is_stroking(&self) -> bool {
        self.last.is_some()
    }

    pub fn stroke_count(&self) -> u32 {
        self.stroke_count
    }

    /// Pointer travel painted so far, summed over every extension.
    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    fn clamp_sample(&self, sample: GestureSample) -> GestureSample {
        GestureSample::new(self.mask.clamp_point(sample.pos), sample.at_ms)
    }

    /// Press: begin a stroke at the sample's position.
    pub fn start_stroke(&mut self, sample: GestureSample) -> Step {
        if self.target.is_revealed() {
            return Step::Ignored;
        }
        self.last = Some(self.clamp_sample(sample));
        self.stroke_count += 1;
        self.target.activate();
        Step::Updated
    }

    /// Drag: paint from the previous sample to this one and add one increment.
    pub fn extend_stroke(&mut self, sample: GestureSample) -> Step {
        if self.target.is_revealed() {
            return Step::Ignored;
        }
        let Some(prev) = self.last else {
            return Step::Ignored;
        };
        let sample = self.clamp_sample(sample);
        self.mask.stamp_segment(prev.pos, sample.pos, self.config.line_width);
        self.travelled += sample.delta(&prev).length();
        self.last = Some(sample);

        if self.progress.advance(self.config.increment) {
            self.last = None;
            self.target.reveal()
        } else {
            Step::Updated
        }
    }

    /// Release: stop painting. Later `extend_stroke` calls are ignored until
    /// the next `start_stroke`.
    pub fn end_stroke(&mut self) -> Step {
        if self.last.take().is_some() {
            Step::Updated
        } else {
            Step::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn at(x: f32, y: f32) -> GestureSample {
        GestureSample::new(Vec2::new(x, y), 0)
    }

    fn scratch() -> CoverageAccumulator {
        CoverageAccumulator::new(TargetId(1), CoverageConfig::scratch_card())
    }

    #[test]
    fn reveals_on_twentieth_extension() {
        let fired = Rc::new(Cell::new(0));
        let mut card = scratch();
        let counter = fired.clone();
        card.target_mut().set_on_reveal(move |_| counter.set(counter.get() + 1));

        let _ = card.start_stroke(at(10.0, 10.0));
        for i in 1..20 {
            let step = card.extend_stroke(at(10.0 + i as f32 * 5.0, 10.0));
            assert_eq!(step, Step::Updated, "call {}", i);
        }
        assert_eq!(card.progress(), 38.0);
        assert_eq!(card.extend_stroke(at(200.0, 10.0)), Step::Revealed);
        assert_eq!(card.progress(), 40.0);
        assert_eq!(card.extend_stroke(at(210.0, 10.0)), Step::Ignored);
        assert_eq!(card.progress(), 40.0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn extension_without_press_is_ignored() {
        let mut card = scratch();
        assert_eq!(card.extend_stroke(at(5.0, 5.0)), Step::Ignored);
        let _ = card.start_stroke(at(5.0, 5.0));
        let _ = card.end_stroke();
        assert_eq!(card.extend_stroke(at(50.0, 5.0)), Step::Ignored);
        assert_eq!(card.progress(), 0.0);
    }

    #[test]
    fn progress_counts_calls_not_pixels() {
        let mut card = scratch();
        let _ = card.start_stroke(at(100.0, 100.0));
        // Scrubbing the same spot still advances progress
        for _ in 0..5 {
            let _ = card.extend_stroke(at(100.0, 100.0));
        }
        assert_eq!(card.progress(), 10.0);
    }

    #[test]
    fn canvas_completes_at_one_hundred() {
        let mut canvas = CoverageAccumulator::new(TargetId(2), CoverageConfig::magic_canvas());
        let _ = canvas.start_stroke(at(0.0, 0.0));
        for i in 0..199 {
            assert_eq!(canvas.extend_stroke(at(i as f32, 1.0)), Step::Updated);
        }
        assert_eq!(canvas.extend_stroke(at(200.0, 1.0)), Step::Revealed);
        assert_eq!(canvas.progress(), 100.0);
    }

    #[test]
    fn strokes_spread_over_several_presses() {
        let mut card = scratch();
        for _ in 0..4 {
            let _ = card.start_stroke(at(0.0, 0.0));
            for _ in 0..5 {
                let _ = card.extend_stroke(at(300.0, 300.0));
            }
            let _ = card.end_stroke();
        }
        assert_eq!(card.phase(), Phase::Revealed);
        assert_eq!(card.stroke_count(), 4);
    }

    #[test]
    fn mask_stamps_a_thick_line() {
        let mut mask = CoverageMask::new(100, 100, 1);
        let newly = mask.stamp_segment(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0), 10.0);
        assert!(newly > 0);
        assert!(mask.is_covered(Vec2::new(50.0, 50.0)));
        assert!(mask.is_covered(Vec2::new(50.0, 54.0)));
        assert!(!mask.is_covered(Vec2::new(50.0, 60.0)));
        // Restamping covers nothing new
        assert_eq!(mask.stamp_segment(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0), 10.0), 0);
    }

    #[test]
    fn mask_clamps_out_of_range_points() {
        let mut mask = CoverageMask::new(40, 40, 4);
        mask.stamp_segment(Vec2::new(-100.0, -100.0), Vec2::new(-50.0, -50.0), 4.0);
        assert!(mask.is_covered(Vec2::ZERO));
        assert!(mask.coverage() > 0.0 && mask.coverage() < 0.1);
        mask.stamp_segment(Vec2::new(f32::NAN, 0.0), Vec2::new(1e9, 1e9), 4.0);
        assert!(mask.is_covered(Vec2::new(40.0, 40.0)));
    }

    #[test]
    fn mask_dimensions_round_up() {
        let mask = CoverageMask::new(400, 533, 4);
        assert_eq!(mask.dimensions(), (100, 134));
    }

    #[test]
    fn zero_threshold_card_reveals_on_first_extension() {
        let json = r#"{"scratch": {"increment": 2, "threshold": 0, "line_width": 50,
            "width": 400, "height": 533, "cell_size": 4}}"#;
        let config = crate::api::config::RevealConfig::from_json(json).unwrap();
        let mut card = CoverageAccumulator::new(TargetId(1), config.scratch);
        let _ = card.start_stroke(at(10.0, 10.0));
        assert_eq!(card.extend_stroke(at(20.0, 10.0)), Step::Revealed);
        assert_eq!(card.phase(), Phase::Revealed);
        assert_eq!(card.extend_stroke(at(30.0, 10.0)), Step::Ignored);
    }

    #[test]
    fn travel_sums_sample_deltas() {
        let mut card = scratch();
        let _ = card.start_stroke(at(10.0, 10.0));
        let _ = card.extend_stroke(at(13.0, 14.0));
        let _ = card.extend_stroke(at(13.0, 24.0));
        assert_eq!(card.travelled(), 15.0);
        // Points off the surface are clamped before measuring
        let _ = card.extend_stroke(at(-100.0, 24.0));
        assert_eq!(card.travelled(), 28.0);
    }
}
