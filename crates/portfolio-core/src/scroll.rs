#![forbid(unsafe_code)]

//! Scroll effects: navbar style swap and one-way reveal animations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Navbar presentation for one side of the scroll threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarStyle {
    pub background: &'static str,
    pub box_shadow: &'static str,
}

pub const NAVBAR_SCROLLED: NavbarStyle = NavbarStyle {
    background: "rgba(8, 64, 3, 0.98)",
    box_shadow: "0 2px 20px rgba(0, 0, 0, 0.3)",
};

pub const NAVBAR_AT_TOP: NavbarStyle = NavbarStyle {
    background: "rgba(8, 64, 3, 0.95)",
    box_shadow: "none",
};

/// Navbar style for a scroll position. No hysteresis.
#[must_use]
pub fn navbar_style_for(scroll_y: f64, threshold_px: f64) -> NavbarStyle {
    if scroll_y > threshold_px {
        NAVBAR_SCROLLED
    } else {
        NAVBAR_AT_TOP
    }
}

/// Index of an element registered for reveal-on-intersection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RevealId(pub u32);

/// One intersection observation delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IntersectionEntry {
    pub target: RevealId,
    pub is_intersecting: bool,
}

/// Rendering port for the scroll effects.
pub trait ScrollSurface {
    fn has_navbar(&self) -> bool;

    fn set_navbar_style(&mut self, style: NavbarStyle) -> Result<(), SurfaceError>;

    /// Show a registered element: full opacity, no vertical offset.
    fn reveal(&mut self, target: RevealId) -> Result<(), SurfaceError>;
}

/// Apply the navbar style for the current scroll position.
///
/// Returns the applied style, `None` without a navbar.
pub fn handle_scroll<S: ScrollSurface + ?Sized>(
    surface: &mut S,
    scroll_y: f64,
    threshold_px: f64,
) -> Result<Option<NavbarStyle>, SurfaceError> {
    if !surface.has_navbar() {
        return Ok(None);
    }
    let style = navbar_style_for(scroll_y, threshold_px);
    surface.set_navbar_style(style)?;
    Ok(Some(style))
}

/// Tracks which registered elements have been revealed.
///
/// Reveals are one-directional: leaving the viewport never hides an element.
#[derive(Debug, Default, Clone)]
pub struct RevealTracker {
    revealed: BTreeSet<RevealId>,
}

impl RevealTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_revealed(&self, target: RevealId) -> bool {
        self.revealed.contains(&target)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Reveal every intersecting entry not revealed yet.
    ///
    /// Returns how many elements were newly revealed.
    pub fn handle_intersection<S: ScrollSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        entries: &[IntersectionEntry],
    ) -> Result<usize, SurfaceError> {
        let mut newly = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if self.revealed.contains(&entry.target) {
                continue;
            }
            surface.reveal(entry.target)?;
            self.revealed.insert(entry.target);
            newly += 1;
        }
        Ok(newly)
    }
}
