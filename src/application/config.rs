use serde::{Deserialize, Serialize};

use crate::domain::chart::{Dimensions, ScaleExtent};
use crate::domain::errors::{ChartError, ChartResult};

/// Right axis (0) and left axis (1)
pub const MAX_AXES: usize = 2;

/// Chart configuration, deserializable from the host's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Y axis of each channel. Empty puts every channel on axis 0.
    pub series_axes: Vec<usize>,
    pub scale_extent: [f64; 2],
    pub dimensions: Dimensions,
    /// Highlight the newest sample right after construction.
    pub hover_on_init: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            series_axes: Vec::new(),
            scale_extent: ScaleExtent::default().to_arr(),
            dimensions: Dimensions::default(),
            hover_on_init: true,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.scale_extent()?;
        if !self.dimensions.is_valid() {
            return Err(ChartError::Config(format!(
                "dimensions must be positive and finite, got {}x{}",
                self.dimensions.width, self.dimensions.height
            )));
        }
        if let Some(axis) = self.series_axes.iter().find(|&&a| a >= MAX_AXES) {
            return Err(ChartError::Config(format!("axis index {} exceeds {} axes", axis, MAX_AXES)));
        }
        Ok(())
    }

    pub fn scale_extent(&self) -> ChartResult<ScaleExtent> {
        ScaleExtent::try_from_slice(&self.scale_extent)
    }

    /// Axis per channel for a dataset of `channel_count` channels.
    pub fn resolve_series_axes(&self, channel_count: usize) -> ChartResult<Vec<usize>> {
        if self.series_axes.is_empty() {
            return Ok(vec![0; channel_count]);
        }
        if self.series_axes.len() != channel_count {
            return Err(ChartError::Config(format!(
                "series_axes names {} channels, data has {}",
                self.series_axes.len(),
                channel_count
            )));
        }
        Ok(self.series_axes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = ChartConfig::from_json(r#"{ "series_axes": [0, 1] }"#).unwrap();
        assert_eq!(config.scale_extent, [1.0, 40.0]);
        assert_eq!(config.dimensions, Dimensions::new(800.0, 600.0));
        assert!(config.hover_on_init);
    }

    #[test]
    fn resolve_axes() {
        let config = ChartConfig::default();
        assert_eq!(config.resolve_series_axes(3).unwrap(), vec![0, 0, 0]);
        let config = ChartConfig { series_axes: vec![0, 1], ..ChartConfig::default() };
        assert!(config.resolve_series_axes(3).is_err());
    }
}
