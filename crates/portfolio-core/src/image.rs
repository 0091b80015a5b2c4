#![forbid(unsafe_code)]

//! Profile image animations.
//!
//! Two repeating timers retrigger the "smile" and "blink" CSS animations;
//! hovering the image container fires both at once and boosts the image
//! filter. Restarting a CSS animation needs the property cleared and a layout
//! flush before the value is assigned again, otherwise the browser keeps the
//! running animation; [`ImageSurface::restart_animation`] owns that sequence.

use serde::{Deserialize, Serialize};

use crate::config::PortfolioConfig;
use crate::error::{SurfaceError, recover};

/// Filter applied while the pointer is over the image container.
pub const HOVER_FILTER: &str = "brightness(1.1) saturate(1.2)";

/// Filter restored when the pointer leaves.
pub const NEUTRAL_FILTER: &str = "brightness(1) saturate(1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Smile,
    Blink,
}

impl AnimationKind {
    /// Selector of the element carrying the animation.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Smile => ".smile-animation",
            Self::Blink => ".blink-animation",
        }
    }

    /// `animation` shorthand assigned on retrigger.
    #[must_use]
    pub const fn animation(self) -> &'static str {
        match self {
            Self::Smile => "smile 3s infinite",
            Self::Blink => "blink 2s infinite",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::Blink => "blink",
        }
    }
}

/// Rendering port for the image animations.
pub trait ImageSurface {
    /// `#profileImage` is in the document.
    fn has_profile_image(&self) -> bool;

    /// Clear the animation, flush layout, assign `kind.animation()` again.
    ///
    /// `Ok(false)` when the animated element is missing.
    fn restart_animation(&mut self, kind: AnimationKind) -> Result<bool, SurfaceError>;

    fn set_profile_filter(&mut self, filter: &str) -> Result<(), SurfaceError>;
}

/// Retrigger one animation. Returns whether its element was found.
pub fn trigger_animation<S: ImageSurface + ?Sized>(
    surface: &mut S,
    kind: AnimationKind,
) -> Result<bool, SurfaceError> {
    let restarted = surface.restart_animation(kind)?;
    if restarted {
        tracing::debug!(target: "portfolio.image", animation = kind.label(), "animation retriggered");
    }
    Ok(restarted)
}

/// Pointer entered the image container: boost the filter, fire both animations.
pub fn hover_enter<S: ImageSurface + ?Sized>(surface: &mut S) -> Result<(), SurfaceError> {
    if !surface.has_profile_image() {
        return Ok(());
    }
    surface.set_profile_filter(HOVER_FILTER)?;
    recover("trigger_smile_animation", || {
        trigger_animation(surface, AnimationKind::Smile)
    });
    recover("trigger_blink_animation", || {
        trigger_animation(surface, AnimationKind::Blink)
    });
    Ok(())
}

/// Pointer left the image container: restore the neutral filter.
pub fn hover_leave<S: ImageSurface + ?Sized>(surface: &mut S) -> Result<(), SurfaceError> {
    if !surface.has_profile_image() {
        return Ok(());
    }
    surface.set_profile_filter(NEUTRAL_FILTER)
}

/// One-shot battery concession for small viewports.
///
/// On a mobile-sized viewport both animation periods are slowed down for the
/// rest of the page lifetime. Returns whether the change was applied.
pub fn optimize_for_mobile(config: &mut PortfolioConfig, viewport_width: f64) -> bool {
    if !config.is_mobile_width(viewport_width) {
        return false;
    }
    config.apply_mobile_intervals();
    tracing::info!(
        target: "portfolio.image",
        viewport_width,
        smile_interval_ms = config.animation.smile_interval_ms,
        blink_interval_ms = config.animation.blink_interval_ms,
        "mobile optimizations applied"
    );
    true
}
