//! Configuration for viewport behaviour, clustering, animation and the simulated feed
//!
//! Every group has a `Default` built from [`crate::core::constants`], and
//! [`MapProfile`] offers a few presets in the same spirit as a performance
//! profile. All groups are serde-friendly so a host can load them from JSON.

use crate::animation::interpolation::EasingType;
use crate::core::constants;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum MapProfile {
    Balanced,
    /// Short transitions and generous hit targets for touch screens
    Responsive,
    /// Long, smooth transitions
    Smooth,
    Custom(MapConfig),
}

impl MapProfile {
    pub fn resolve(&self) -> MapConfig {
        match self {
            Self::Balanced => MapConfig::default(),
            Self::Responsive => MapConfig {
                animation: AnimationOptions {
                    enable_transitions: true,
                    duration_ms: 250,
                    easing: EasingType::EaseOut,
                },
                hit_test: HitTestOptions {
                    marker_radius_px: 20.0,
                    cluster_radius_px: 26.0,
                },
                ..MapConfig::default()
            },
            Self::Smooth => MapConfig {
                animation: AnimationOptions {
                    enable_transitions: true,
                    duration_ms: 800,
                    easing: EasingType::EaseInOut,
                },
                ..MapConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for MapProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: ViewportOptions,
    pub clustering: ClusterOptions,
    pub animation: AnimationOptions,
    pub hit_test: HitTestOptions,
}

impl MapConfig {
    /// Parses a configuration from JSON; missing groups fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the viewport and clustering code cannot honour
    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;

        let radius = self.clustering.base_radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(invalid(format!("base cluster radius must be >= 0, got {}", radius)));
        }

        let hit = &self.hit_test;
        if !(hit.marker_radius_px >= 0.0 && hit.cluster_radius_px >= 0.0) {
            return Err(invalid("hit-test radii must be >= 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub cluster_zoom_increment: f64,
}

impl ViewportOptions {
    /// Clamps `zoom` into the zoom limits. NaN maps to the lower limit.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (min, max) = self.limits();
        if zoom.is_nan() {
            return min;
        }
        zoom.max(min).min(max)
    }

    /// The zoom limits in ascending order. A NaN limit falls back to its default.
    pub fn limits(&self) -> (f64, f64) {
        let min = if self.min_zoom.is_nan() { constants::MIN_ZOOM } else { self.min_zoom };
        let max = if self.max_zoom.is_nan() { constants::MAX_ZOOM } else { self.max_zoom };
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = self.min_zoom.is_finite() && self.max_zoom.is_finite();
        if !finite || self.min_zoom <= 0.0 {
            return Err(invalid(format!(
                "zoom limits must be finite and positive, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(invalid(format!("zoom step must be positive, got {}", self.zoom_step)));
        }
        if !(self.cluster_zoom_increment.is_finite() && self.cluster_zoom_increment >= 0.0) {
            return Err(invalid(format!(
                "cluster zoom increment must be >= 0, got {}",
                self.cluster_zoom_increment
            )));
        }
        Ok(())
    }
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            min_zoom: constants::MIN_ZOOM,
            max_zoom: constants::MAX_ZOOM,
            zoom_step: constants::ZOOM_STEP,
            cluster_zoom_increment: constants::CLUSTER_ZOOM_INCREMENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// Radius in map units at zoom 1
    pub base_radius: f64,
    /// Only cluster points that fall inside the visible map region
    pub cull_to_viewport: bool,
}

impl ClusterOptions {
    /// Effective radius at `zoom`; shrinks as the user zooms in
    pub fn radius_at(&self, zoom: f64) -> f64 {
        crate::spatial::clustering::cluster_radius(self.base_radius, zoom)
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            base_radius: constants::BASE_CLUSTER_RADIUS,
            cull_to_viewport: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// When false, zoom-to-target jumps straight to its final state
    pub enable_transitions: bool,
    pub duration_ms: u64,
    pub easing: EasingType,
}

impl AnimationOptions {
    pub fn duration(&self) -> Duration {
        if self.enable_transitions {
            Duration::from_millis(self.duration_ms)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            enable_transitions: true,
            duration_ms: constants::ZOOM_ANIMATION_MS,
            easing: EasingType::css_ease(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestOptions {
    pub marker_radius_px: f64,
    pub cluster_radius_px: f64,
}

impl Default for HitTestOptions {
    fn default() -> Self {
        Self {
            marker_radius_px: constants::MARKER_HIT_RADIUS,
            cluster_radius_px: constants::CLUSTER_HIT_RADIUS,
        }
    }
}

/// Settings for [`crate::data::feed::SimulatedFeed`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// RNG seed; the same seed and clock produce the same hazards
    pub seed: u64,
    pub initial_count: usize,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub initial_load_delay_ms: u64,
}

impl FeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_interval_ms > self.max_interval_ms {
            return Err(invalid(format!(
                "feed interval range is empty: [{}, {}) ms",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        if self.max_interval_ms == 0 {
            return Err(invalid("feed interval must be longer than zero".to_string()));
        }
        Ok(())
    }

    pub fn initial_load_delay(&self) -> Duration {
        Duration::from_millis(self.initial_load_delay_ms)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            seed: 0x6861_7a61_7264,
            initial_count: constants::INITIAL_HAZARD_COUNT,
            min_interval_ms: constants::FEED_MIN_INTERVAL_MS,
            max_interval_ms: constants::FEED_MAX_INTERVAL_MS,
            initial_load_delay_ms: constants::INITIAL_LOAD_DELAY_MS,
        }
    }
}

fn invalid(message: String) -> MapError {
    log::warn!("rejecting configuration: {}", message);
    MapError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_presets() {
        let balanced = MapProfile::Balanced.resolve();
        let responsive = MapProfile::Responsive.resolve();
        let smooth = MapProfile::Smooth.resolve();

        assert_eq!(balanced.viewport.min_zoom, 0.5);
        assert_eq!(balanced.viewport.max_zoom, 3.0);
        assert_eq!(balanced.animation.duration_ms, 500);
        assert_eq!(balanced.animation.easing, EasingType::css_ease());

        assert!(responsive.animation.duration_ms < balanced.animation.duration_ms);
        assert!(responsive.hit_test.marker_radius_px > balanced.hit_test.marker_radius_px);
        assert!(smooth.animation.duration_ms > balanced.animation.duration_ms);

        for config in [balanced, responsive, smooth] {
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_clamp_zoom() {
        let options = ViewportOptions::default();
        assert_eq!(options.clamp_zoom(0.1), 0.5);
        assert_eq!(options.clamp_zoom(10.0), 3.0);
        assert_eq!(options.clamp_zoom(1.7), 1.7);
        assert_eq!(options.clamp_zoom(f64::NAN), 0.5);
        assert_eq!(options.clamp_zoom(f64::INFINITY), 3.0);

        for zoom in [-4.0, 0.0, 0.5, 1.3, 3.0, 99.0] {
            let once = options.clamp_zoom(zoom);
            assert_eq!(options.clamp_zoom(once), once);
        }
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = MapConfig::default();
        config.viewport.min_zoom = 4.0;
        assert!(matches!(config.validate(), Err(MapError::InvalidConfig(_))));

        let mut config = MapConfig::default();
        config.viewport.min_zoom = 0.0;
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.viewport.zoom_step = -0.2;
        assert!(config.validate().is_err());

        let mut config = MapConfig::default();
        config.clustering.base_radius = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = MapConfig::from_json(r#"{ "viewport": { "max_zoom": 5.0 } }"#).unwrap();
        assert_eq!(config.viewport.max_zoom, 5.0);
        assert_eq!(config.viewport.min_zoom, 0.5);
        assert_eq!(config.clustering, ClusterOptions::default());

        assert!(MapConfig::from_json("{ not json").is_err());
        assert!(MapConfig::from_json(r#"{ "viewport": { "min_zoom": 9.0 } }"#).is_err());
    }

    #[test]
    fn test_disabled_transitions_have_zero_duration() {
        let options = AnimationOptions {
            enable_transitions: false,
            ..AnimationOptions::default()
        };
        assert_eq!(options.duration(), Duration::ZERO);
        assert_eq!(AnimationOptions::default().duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_feed_config_validation() {
        assert!(FeedConfig::default().validate().is_ok());
        let config = FeedConfig {
            min_interval_ms: 10,
            max_interval_ms: 5,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FeedConfig {
            min_interval_ms: 0,
            max_interval_ms: 0,
            ..FeedConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
