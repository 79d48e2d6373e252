use serde::{Deserialize, Serialize};

/// Tunable thresholds for every reveal primitive.
/// Loaded from JSON at runtime; any section left out keeps its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default = "CoverageConfig::scratch_card")]
    pub scratch: CoverageConfig,
    #[serde(default = "CoverageConfig::magic_canvas")]
    pub canvas: CoverageConfig,
    #[serde(default)]
    pub shake: SpikeConfig,
    #[serde(default)]
    pub typewriter: TypewriterConfig,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            drag: DragConfig::default(),
            scratch: CoverageConfig::scratch_card(),
            canvas: CoverageConfig::magic_canvas(),
            shake: SpikeConfig::default(),
            typewriter: TypewriterConfig::default(),
        }
    }
}

/// Threshold-drag release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Lift (px) at or past which a release commits.
    pub commit_threshold: f32,
    /// Largest visual lift the element follows the pointer to.
    pub max_lift: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            commit_threshold: 50.0,
            max_lift: 100.0,
        }
    }
}

/// Coverage accumulation over a rasterized surface.
/// Every field is required when a section is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Progress added per stroke extension.
    pub increment: f32,
    /// Progress at or past which the target reveals.
    pub threshold: f32,
    /// Stroke width in surface pixels.
    pub line_width: f32,
    /// Surface size in pixels.
    pub width: u32,
    pub height: u32,
    /// Edge length of one mask cell in pixels.
    pub cell_size: u32,
}

impl CoverageConfig {
    /// The scratch-off card: wide strokes, reveals at 40%.
    pub fn scratch_card() -> Self {
        Self {
            increment: 2.0,
            threshold: 40.0,
            line_width: 50.0,
            width: 400,
            height: 533,
            cell_size: 4,
        }
    }

    /// The drawing canvas: thin strokes, completes at 100%.
    pub fn magic_canvas() -> Self {
        Self {
            increment: 0.5,
            threshold: 100.0,
            line_width: 4.0,
            width: 350,
            height: 350,
            cell_size: 2,
        }
    }
}

/// Delta-spike counting (shake detection).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// A delta strictly above this counts as a spike.
    pub spike_threshold: f32,
    /// Spikes needed to reveal.
    pub required_spikes: u32,
    /// How long the transient "shaking" flag stays up after a spike.
    pub shaking_ms: u32,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            spike_threshold: 30.0,
            required_spikes: 5,
            shaking_ms: 200,
        }
    }
}

/// Timed reveal (typewriter).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Milliseconds per character.
    pub cadence_ms: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self { cadence_ms: 40 }
    }
}

impl RevealConfig {
    /// Parse a config from a JSON string. Out-of-range values are clamped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: RevealConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp every value into a range the primitives can work with.
    pub fn sanitized(mut self) -> Self {
        self.drag.commit_threshold = finite_or(self.drag.commit_threshold, 50.0).max(0.0);
        self.drag.max_lift = finite_or(self.drag.max_lift, 100.0).max(self.drag.commit_threshold);
        self.scratch = self.scratch.sanitized();
        self.canvas = self.canvas.sanitized();
        self.shake.spike_threshold = finite_or(self.shake.spike_threshold, 30.0).max(0.0);
        self.shake.required_spikes = self.shake.required_spikes.max(1);
        self.typewriter.cadence_ms = self.typewriter.cadence_ms.max(1);
        self
    }
}

impl CoverageConfig {
    fn sanitized(mut self) -> Self {
        self.increment = finite_or(self.increment, 0.0).clamp(0.0, 100.0);
        self.threshold = finite_or(self.threshold, 100.0).clamp(0.0, 100.0);
        self.line_width = finite_or(self.line_width, 1.0).max(1.0);
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.cell_size = self.cell_size.max(1);
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_defaults() {
        let config = RevealConfig::from_json("{}").unwrap();
        assert_eq!(config, RevealConfig::default());
        assert_eq!(config.drag.commit_threshold, 50.0);
        assert_eq!(config.scratch.threshold, 40.0);
        assert_eq!(config.canvas.increment, 0.5);
        assert_eq!(config.shake.required_spikes, 5);
        assert_eq!(config.typewriter.cadence_ms, 40);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{
            "drag": { "commit_threshold": 80 },
            "typewriter": { "cadence_ms": 25 }
        }"#;
        let config = RevealConfig::from_json(json).unwrap();
        assert_eq!(config.drag.commit_threshold, 80.0);
        assert_eq!(config.drag.max_lift, 100.0);
        assert_eq!(config.typewriter.cadence_ms, 25);
        assert_eq!(config.shake, SpikeConfig::default());
    }

    #[test]
    fn values_are_clamped() {
        let json = r#"{
            "drag": { "commit_threshold": 150, "max_lift": 100 },
            "shake": { "required_spikes": 0 },
            "typewriter": { "cadence_ms": 0 },
            "scratch": {
                "increment": 500, "threshold": 140, "line_width": 0,
                "width": 0, "height": 10, "cell_size": 0
            }
        }"#;
        let config = RevealConfig::from_json(json).unwrap();
        assert_eq!(config.drag.max_lift, 150.0);
        assert_eq!(config.shake.required_spikes, 1);
        assert_eq!(config.typewriter.cadence_ms, 1);
        assert_eq!(config.scratch.increment, 100.0);
        assert_eq!(config.scratch.threshold, 100.0);
        assert_eq!(config.scratch.line_width, 1.0);
        assert_eq!(config.scratch.width, 1);
        assert_eq!(config.scratch.cell_size, 1);
    }

    #[test]
    fn incomplete_coverage_section_is_an_error() {
        assert!(RevealConfig::from_json(r#"{ "canvas": { "increment": 1 } }"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(RevealConfig::from_json("{ drag: ").is_err());
    }
}
