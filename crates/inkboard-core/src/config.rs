//! Board configuration, loadable from JSON.

use crate::geometry::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, FreehandOptions};
use crate::hit_test::{FREEHAND_TOLERANCE, HitTester, SEGMENT_TOLERANCE};
use crate::shapes::{SerializableColor, ShapeStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Tunables for hit testing, rendering and export.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Half-size of the eraser square around freehand samples.
    pub freehand_tolerance: f64,
    /// Eraser distance for lines and arrows.
    pub segment_tolerance: f64,
    /// Freehand outline parameters. `size` is replaced per stroke by twice
    /// the stroke width.
    pub freehand: FreehandOptions,
    pub arrow_head_length: f64,
    /// Blade angle in radians.
    pub arrow_head_angle: f64,
    /// Color composited behind the drawing on export.
    pub export_background: SerializableColor,
    /// Starting style for every tool.
    pub default_style: ShapeStyle,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            freehand_tolerance: FREEHAND_TOLERANCE,
            segment_tolerance: SEGMENT_TOLERANCE,
            freehand: FreehandOptions::default(),
            arrow_head_length: ARROW_HEAD_LENGTH,
            arrow_head_angle: ARROW_HEAD_ANGLE,
            export_background: SerializableColor::new(0x12, 0x12, 0x12, 255),
            default_style: ShapeStyle::fallback(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject non-positive tolerances and sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("freehand_tolerance", self.freehand_tolerance),
            ("segment_tolerance", self.segment_tolerance),
            ("arrow_head_length", self.arrow_head_length),
            ("default_style.stroke_width", self.default_style.stroke_width),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if !(-1.0..=1.0).contains(&self.freehand.thinning) {
            return Err(ConfigError::Invalid {
                field: "freehand.thinning",
                value: self.freehand.thinning,
            });
        }
        let unit = [
            ("freehand.smoothing", self.freehand.smoothing),
            ("freehand.streamline", self.freehand.streamline),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if self.default_style.roughness < 0.0 {
            return Err(ConfigError::Invalid {
                field: "default_style.roughness",
                value: self.default_style.roughness,
            });
        }
        Ok(())
    }

    pub fn hit_tester(&self) -> HitTester {
        HitTester::with_tolerances(self.freehand_tolerance, self.segment_tolerance)
    }
}
