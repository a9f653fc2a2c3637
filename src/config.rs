//! Editor configuration.
//!
//! Every field has a default matching the stock dashboard editor, so an empty
//! TOML document (or none at all) yields a working configuration.
//!
//! ```toml
//! curve_offset = 120.0
//!
//! [zoom]
//! min = 0.25
//! max = 3.0
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Zoom limits and step size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            step: 0.1,
        }
    }
}

/// Fixed node box layout used to derive port anchors from the model alone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLayout {
    pub width: f32,
    pub padding: f32,
    pub header_height: f32,
    pub description_height: f32,
    /// Height of one input label row, and spacing between scenario ports.
    pub row_height: f32,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            width: 200.0,
            padding: 16.0,
            header_height: 32.0,
            description_height: 28.0,
            row_height: 24.0,
        }
    }
}

/// Configuration for an [`EditorSession`](crate::session::EditorSession).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub zoom: ZoomConfig,
    pub node: NodeLayout,
    /// Offset subtracted from a drop point so the node lands under the cursor.
    pub drop_anchor_x: f32,
    pub drop_anchor_y: f32,
    /// Horizontal control-point offset of committed connection curves.
    pub curve_offset: f32,
    /// Horizontal control-point offset of the in-progress preview curve.
    pub preview_offset: f32,
    /// Screen-space radius around a port centre that counts as a hit.
    pub port_hit_radius: f32,
    /// Screen-space distance from a curve that counts as a click on it.
    pub connection_hit_tolerance: f32,
    pub connection_hit_samples: usize,
    /// Pointer travel below which a canvas press-release is a click.
    pub click_threshold: f32,
    pub reject_duplicate_connections: bool,
    pub activity_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomConfig::default(),
            node: NodeLayout::default(),
            drop_anchor_x: 100.0,
            drop_anchor_y: 50.0,
            curve_offset: 100.0,
            preview_offset: 50.0,
            port_hit_radius: 8.0,
            connection_hit_tolerance: 6.0,
            connection_hit_samples: 20,
            click_threshold: 3.0,
            reject_duplicate_connections: false,
            activity_capacity: 10,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        for (field, value) in [("zoom.min", zoom.min), ("zoom.max", zoom.max), ("zoom.step", zoom.step)] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite number, got {value}"),
                });
            }
        }
        if zoom.min <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "zoom.min",
                reason: format!("must be positive, got {}", zoom.min),
            });
        }
        if zoom.max < zoom.min {
            return Err(ConfigError::Invalid {
                field: "zoom.max",
                reason: format!("{} is below zoom.min {}", zoom.max, zoom.min),
            });
        }
        if !(zoom.min..=zoom.max).contains(&1.0) {
            return Err(ConfigError::Invalid {
                field: "zoom",
                reason: format!("range {}..={} must include 1.0", zoom.min, zoom.max),
            });
        }
        if zoom.step <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "zoom.step",
                reason: format!("must be positive, got {}", zoom.step),
            });
        }
        if !(self.node.width > 0.0) {
            return Err(ConfigError::Invalid {
                field: "node.width",
                reason: format!("must be positive, got {}", self.node.width),
            });
        }
        if self.activity_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "activity_capacity",
                reason: "must hold at least one entry".to_string(),
            });
        }
        Ok(())
    }
}
