//! Display settings for the run form.

use serde::{Deserialize, Serialize};

use crate::error::ResolverError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFormConfig {
    /// Hue advance, in degrees, for every newly discovered workflow parameter.
    pub hue_step: u32,
    pub saturation: u8,
    pub lightness: u8,
    /// Word placed before a step's version in its title.
    pub version_label: String,
}

impl Default for RunFormConfig {
    fn default() -> Self {
        RunFormConfig {
            hue_step: 100,
            saturation: 70,
            lightness: 30,
            version_label: "Version".into(),
        }
    }
}

impl RunFormConfig {
    /// Parse a partial config object; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Vec<ResolverError>> {
        let invalid = |reason: String| {
            vec![ResolverError::config(
                "C001",
                format!("Failed to parse run form config JSON: {}", reason),
            )]
        };

        let value = serde_json::from_str::<serde_json::Value>(json)
            .map_err(|e| invalid(e.to_string()))?;
        // Serde would otherwise accept a positional array
        if !value.is_object() {
            return Err(invalid("expected an object".into()));
        }
        serde_json::from_value::<RunFormConfig>(value).map_err(|e| invalid(e.to_string()))
    }

    /// Color for the `ordinal`-th discovered parameter, starting at 1.
    ///
    /// The hue wraps around the color wheel.
    pub fn parameter_color(&self, ordinal: u32) -> String {
        let hue = (u64::from(ordinal) * u64::from(self.hue_step)) % 360;
        format!(
            "hsl({}, {}%, {}%)",
            hue,
            self.saturation,
            self.lightness
        )
    }
}
