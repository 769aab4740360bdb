use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM_RATIO, MIN_ZOOM_RATIO, VIEWPORT_FIT_PADDING};
use crate::error::Result;
use crate::transform::BoundsPolicy;
use crate::viewport::{AspectRatio, Viewport};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CropboxConfig {
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub stage: StageConfig,
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub bounds: BoundsPolicy,
}

impl CropboxConfig {
    /// The crop window: the configured aspect ratio fitted into the stage
    /// box minus its padding.
    pub fn viewport(&self) -> Result<Viewport> {
        Viewport::fit(
            self.aspect_ratio,
            self.stage.width - self.stage.padding,
            self.stage.height - self.stage.padding,
        )
    }
}

/// The box the crop window is fitted into, e.g. the editor's image area.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StageConfig {
    pub width: f64,
    pub height: f64,
    /// Pixels subtracted from each stage dimension before fitting.
    pub padding: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
            padding: VIEWPORT_FIT_PADDING,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_ratio: MIN_ZOOM_RATIO,
            max_ratio: MAX_ZOOM_RATIO,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, ratio: f64) -> f64 {
        ratio.clamp(self.min_ratio.max(MIN_ZOOM_RATIO), self.max_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport_is_square() {
        let config = CropboxConfig::default();
        let v = config.viewport().unwrap();
        assert_eq!((v.width, v.height), (492, 492));
    }

    #[test]
    fn test_zoom_clamp_never_non_positive() {
        let zoom = ZoomConfig {
            min_ratio: 0.0,
            max_ratio: 4.0,
        };
        assert!(zoom.clamp(-3.0) > 0.0);
    }
}
