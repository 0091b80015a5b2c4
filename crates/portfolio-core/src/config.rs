#![forbid(unsafe_code)]

//! Page configuration.
//!
//! [`PortfolioConfig`] collects every tunable the controllers read, built
//! once at initialization and passed by reference to each controller. It can
//! be loaded from JSON (or TOML with the `toml-config` feature); any field
//! left out takes the default listed on it.
//!
//! ```json
//! { "animation": { "blink_interval_ms": 2500 }, "submit_delay_ms": 1500 }
//! ```
//!
//! The only runtime mutation is [`PortfolioConfig::apply_mobile_intervals`],
//! applied once after the page load event on small viewports.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Animation cadence and smooth-scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Period of the "smile" retrigger. Default: 30 000.
    pub smile_interval_ms: u32,
    /// Period of the "blink" retrigger. Default: 2 000.
    pub blink_interval_ms: u32,
    /// Pixels kept above a section when scrolling to it (fixed navbar). Default: 80.
    pub scroll_offset_px: i32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            smile_interval_ms: 30_000,
            blink_interval_ms: 2_000,
            scroll_offset_px: 80,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn smile_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.smile_interval_ms))
    }

    #[must_use]
    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.blink_interval_ms))
    }
}

/// Every tunable used by the page controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub animation: AnimationConfig,
    /// Scroll position past which the navbar switches to its scrolled style. Default: 100.
    pub navbar_scroll_threshold_px: f64,
    /// Viewports at or below this width count as mobile. Default: 768.
    pub mobile_breakpoint_px: f64,
    /// Smile period applied on mobile viewports. Default: 60 000.
    pub mobile_smile_interval_ms: u32,
    /// Blink period applied on mobile viewports. Default: 4 000.
    pub mobile_blink_interval_ms: u32,
    /// Simulated network delay of a contact-form submission. Default: 2 000.
    pub submit_delay_ms: u32,
    /// Lifetime of the success banner. Default: 5 000.
    pub success_banner_ms: u32,
    /// Time a notification stays before its exit animation. Default: 4 000.
    pub notification_ms: u32,
    /// Length of the notification exit animation. Default: 300.
    pub notification_exit_ms: u32,
    /// Visible fraction that counts as intersecting for reveal animations. Default: 0.1.
    pub reveal_threshold: f64,
    /// Root margin of the reveal observer. Default: `0px 0px -50px 0px`.
    pub reveal_root_margin: String,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            navbar_scroll_threshold_px: 100.0,
            mobile_breakpoint_px: 768.0,
            mobile_smile_interval_ms: 60_000,
            mobile_blink_interval_ms: 4_000,
            submit_delay_ms: 2_000,
            success_banner_ms: 5_000,
            notification_ms: 4_000,
            notification_exit_ms: 300,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

impl PortfolioConfig {
    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a TOML string.
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load and validate a host-supplied JSON config.
    pub fn load_json(s: &str) -> Result<Self, ConfigError> {
        let config = Self::from_json_str(s)?;
        let problems = config.validate();
        if problems.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Resolve the config the page should run with.
    ///
    /// `None` yields the defaults. A config that fails to parse or validate
    /// is logged and replaced by the defaults.
    #[must_use]
    pub fn resolve(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::load_json(json) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    target: "portfolio.page",
                    error = %err,
                    "rejected page config; using defaults"
                );
                Self::default()
            }
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let periods = [
            ("animation.smile_interval_ms", self.animation.smile_interval_ms),
            ("animation.blink_interval_ms", self.animation.blink_interval_ms),
            ("mobile_smile_interval_ms", self.mobile_smile_interval_ms),
            ("mobile_blink_interval_ms", self.mobile_blink_interval_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                errors.push(format!("{name} must be > 0"));
            }
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            errors.push(format!(
                "reveal_threshold must be in [0, 1], got {}",
                self.reveal_threshold
            ));
        }
        if !self.navbar_scroll_threshold_px.is_finite() {
            errors.push("navbar_scroll_threshold_px must be finite".to_string());
        }
        if !self.mobile_breakpoint_px.is_finite() || self.mobile_breakpoint_px < 0.0 {
            errors.push(format!(
                "mobile_breakpoint_px must be finite and >= 0, got {}",
                self.mobile_breakpoint_px
            ));
        }
        if self.reveal_root_margin.split_whitespace().count() == 0 {
            errors.push("reveal_root_margin must not be empty".to_string());
        }
        errors
    }

    /// Whether a viewport of `width` CSS pixels counts as mobile.
    #[must_use]
    pub fn is_mobile_width(&self, width: f64) -> bool {
        width <= self.mobile_breakpoint_px
    }

    /// Slow both animation timers down to the mobile cadence.
    pub fn apply_mobile_intervals(&mut self) {
        self.animation.smile_interval_ms = self.mobile_smile_interval_ms;
        self.animation.blink_interval_ms = self.mobile_blink_interval_ms;
    }

    #[must_use]
    pub fn submit_delay(&self) -> Duration {
        millis(self.submit_delay_ms)
    }

    #[must_use]
    pub fn success_banner_lifetime(&self) -> Duration {
        millis(self.success_banner_ms)
    }

    #[must_use]
    pub fn notification_lifetime(&self) -> Duration {
        millis(self.notification_ms)
    }

    #[must_use]
    pub fn notification_exit(&self) -> Duration {
        millis(self.notification_exit_ms)
    }
}

/// Errors that can occur when loading a page configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "toml-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
