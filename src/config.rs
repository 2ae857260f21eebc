//! Configuration management for Veneer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::limit::clamp_delay_millis;

/// Main configuration for the Veneer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeneerConfig {
    /// Behavior timing configuration
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Visibility observer configuration
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Diagnostics configuration
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Default for VeneerConfig {
    fn default() -> Self {
        Self {
            behavior: BehaviorConfig::default(),
            observer: ObserverConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

/// Timing configuration for the behavior handlers.
///
/// Millisecond fields are signed so that hand-written configuration with a
/// negative value deserializes cleanly; negative delays clamp to zero at use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Cool-down between processed scroll events in milliseconds
    #[serde(default = "default_scroll_throttle_ms")]
    pub scroll_throttle_ms: i64,

    /// Quiet window for resize handling in milliseconds
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: i64,

    /// Lifetime of a ripple overlay in milliseconds
    #[serde(default = "default_ripple_duration_ms")]
    pub ripple_duration_ms: i64,

    /// Viewport width at or below which the page uses the mobile layout
    #[serde(default = "default_mobile_breakpoint_px")]
    pub mobile_breakpoint_px: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: default_scroll_throttle_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            ripple_duration_ms: default_ripple_duration_ms(),
            mobile_breakpoint_px: default_mobile_breakpoint_px(),
        }
    }
}

impl BehaviorConfig {
    /// Scroll throttle cool-down as a clamped duration.
    pub fn scroll_throttle(&self) -> Duration {
        clamp_delay_millis(self.scroll_throttle_ms)
    }

    /// Resize debounce quiet window as a clamped duration.
    pub fn resize_debounce(&self) -> Duration {
        clamp_delay_millis(self.resize_debounce_ms)
    }

    /// Ripple overlay lifetime as a clamped duration.
    pub fn ripple_duration(&self) -> Duration {
        clamp_delay_millis(self.ripple_duration_ms)
    }
}

fn default_scroll_throttle_ms() -> i64 {
    100
}

fn default_resize_debounce_ms() -> i64 {
    250
}

fn default_ripple_duration_ms() -> i64 {
    600
}

fn default_mobile_breakpoint_px() -> f64 {
    768.0
}

/// Configuration for the fade-in visibility observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Fraction of an element that must be visible before it fades in
    #[serde(default = "default_observer_threshold")]
    pub threshold: f64,

    /// Adjustment applied to the bottom edge of the viewport, in pixels.
    /// Negative values shrink the observed area so elements fade in only
    /// after scrolling past the very edge of the screen.
    #[serde(default = "default_root_margin_bottom_px")]
    pub root_margin_bottom_px: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: default_observer_threshold(),
            root_margin_bottom_px: default_root_margin_bottom_px(),
        }
    }
}

fn default_observer_threshold() -> f64 {
    0.1
}

fn default_root_margin_bottom_px() -> f64 {
    -50.0
}

/// Diagnostics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Whether load timing and capability reports are emitted
    #[serde(default = "default_diagnostics_enabled")]
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_diagnostics_enabled(),
        }
    }
}

fn default_diagnostics_enabled() -> bool {
    true
}

impl VeneerConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: VeneerConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::VeneerError::Config(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = VeneerConfig::default();
        assert_eq!(config.behavior.scroll_throttle(), Duration::from_millis(100));
        assert_eq!(config.behavior.resize_debounce(), Duration::from_millis(250));
        assert_eq!(config.behavior.ripple_duration(), Duration::from_millis(600));
        assert_eq!(config.behavior.mobile_breakpoint_px, 768.0);
        assert!(config.diagnostics.enabled);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
behavior:
  scroll_throttle_ms: 50
"#;
        let config: VeneerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.behavior.scroll_throttle(), Duration::from_millis(50));
        assert_eq!(config.behavior.resize_debounce_ms, 250);
        assert_eq!(config.observer.threshold, 0.1);
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        let yaml = r#"
behavior:
  resize_debounce_ms: -20
"#;
        let config: VeneerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.behavior.resize_debounce(), Duration::ZERO);
    }
}
