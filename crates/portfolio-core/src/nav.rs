#![forbid(unsafe_code)]

//! Navigation controller: hamburger menu, outside-click and Escape close,
//! smooth anchor scrolling.
//!
//! The menu has two presentation states, `active` and inactive, shared by the
//! hamburger trigger and the menu itself. While active, page scrolling is
//! locked. The state lives only in the document; these functions read it
//! back through [`NavSurface`] rather than mirroring it.

use serde::Deserialize;

use crate::error::SurfaceError;

/// Rendering port for the navigation controller.
pub trait NavSurface {
    /// Both the hamburger trigger and the menu are in the document.
    fn has_menu(&self) -> bool;

    /// Whether the menu currently carries the `active` state.
    fn menu_active(&self) -> Result<bool, SurfaceError>;

    /// Set or clear the `active` state on the trigger and the menu.
    fn set_menu_active(&mut self, active: bool) -> Result<(), SurfaceError>;

    /// Lock (`overflow: hidden`) or restore (`overflow: auto`) page scrolling.
    fn set_scroll_locked(&mut self, locked: bool) -> Result<(), SurfaceError>;

    /// Resolve a link `href` (e.g. `#about`) to the target's `offsetTop`.
    ///
    /// `Ok(None)` when nothing in the document matches.
    fn section_offset_top(&self, href: &str) -> Result<Option<f64>, SurfaceError>;

    /// Smooth-scroll the window so its top edge lands on `top`.
    fn scroll_to(&mut self, top: f64) -> Result<(), SurfaceError>;
}

/// Where a document click landed relative to the menu widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClickOrigin {
    /// The click target is the hamburger or inside it.
    pub in_trigger: bool,
    /// The click target is the menu or inside it.
    pub in_menu: bool,
}

/// Result of intercepting a navigation-link click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavClick {
    /// The link carries no `href`; nothing happens.
    NoHref,
    /// The fragment matched nothing; the click is swallowed.
    Unresolved,
    /// The menu was closed and the window scrolled to `top`.
    Scrolled { top: f64 },
}

/// Flip the menu between active and inactive.
///
/// Returns the new state, or `None` when the menu widgets are absent.
pub fn toggle_mobile_menu<S: NavSurface + ?Sized>(
    surface: &mut S,
) -> Result<Option<bool>, SurfaceError> {
    if !surface.has_menu() {
        return Ok(None);
    }
    let active = !surface.menu_active()?;
    surface.set_menu_active(active)?;
    surface.set_scroll_locked(active)?;
    Ok(Some(active))
}

/// Force the inactive state. Safe to call when already closed.
pub fn close_mobile_menu<S: NavSurface + ?Sized>(surface: &mut S) -> Result<(), SurfaceError> {
    if !surface.has_menu() {
        return Ok(());
    }
    surface.set_menu_active(false)?;
    surface.set_scroll_locked(false)
}

/// Handle a click on a navigation link whose default action was prevented.
pub fn handle_nav_click<S: NavSurface + ?Sized>(
    surface: &mut S,
    href: Option<&str>,
    scroll_offset_px: i32,
) -> Result<NavClick, SurfaceError> {
    let Some(href) = href.filter(|href| !href.is_empty()) else {
        return Ok(NavClick::NoHref);
    };
    let Some(offset_top) = surface.section_offset_top(href)? else {
        tracing::debug!(target: "portfolio.nav", href, "navigation target not found");
        return Ok(NavClick::Unresolved);
    };
    close_mobile_menu(surface)?;
    let top = offset_top - f64::from(scroll_offset_px);
    surface.scroll_to(top)?;
    tracing::debug!(target: "portfolio.nav", href, top, "navigating to section");
    Ok(NavClick::Scrolled { top })
}

/// Close the menu when a document click landed outside both menu widgets.
///
/// Returns whether the close was applied.
pub fn handle_document_click<S: NavSurface + ?Sized>(
    surface: &mut S,
    origin: ClickOrigin,
) -> Result<bool, SurfaceError> {
    if !surface.has_menu() || origin.in_trigger || origin.in_menu {
        return Ok(false);
    }
    close_mobile_menu(surface)?;
    Ok(true)
}

/// Close the menu on Escape if it is open. Returns whether it was closed.
pub fn handle_escape<S: NavSurface + ?Sized>(surface: &mut S) -> Result<bool, SurfaceError> {
    if !surface.has_menu() || !surface.menu_active()? {
        return Ok(false);
    }
    close_mobile_menu(surface)?;
    Ok(true)
}
