//! Aggregated layout configuration
//!
//! Every tunable of the layout core lives in one serde-loadable tree. Missing
//! sections and fields fall back to their defaults, so a config file only
//! needs to name what it changes.

use bubbl_animation::AnimationConfig;
use serde::{Deserialize, Serialize};

use crate::bubble::BubbleConfig;
use crate::mosaic::MosaicConfig;
use crate::reactions::ChipMetrics;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub animation: AnimationConfig,
    pub mosaic: MosaicConfig,
    pub chips: ChipMetrics,
    pub bubble: BubbleConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubbl_animation::Easing;

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "animation": { "duration_ms": 250.0 }, "mosaic": { "spacing": 4.0 } }"#;
        let config: LayoutConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.animation.duration_ms, 250.0);
        assert_eq!(config.animation.easing, Easing::Decelerate);
        assert_eq!(config.mosaic.spacing, 4.0);
        assert_eq!(config.mosaic.max_rows, MosaicConfig::default().max_rows);
        assert_eq!(config.bubble, BubbleConfig::default());
    }

    #[test]
    fn test_easing_variants_deserialize() {
        let config: AnimationConfig =
            serde_json::from_str(r#"{ "easing": { "cubic_bezier": [0.4, 0.0, 0.2, 1.0] } }"#).unwrap();
        assert_eq!(config.easing, Easing::CubicBezier(0.4, 0.0, 0.2, 1.0));
        let config: AnimationConfig = serde_json::from_str(r#"{ "easing": "linear" }"#).unwrap();
        assert_eq!(config.easing, Easing::Linear);
    }
}
