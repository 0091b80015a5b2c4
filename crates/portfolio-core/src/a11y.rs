#![forbid(unsafe_code)]

//! Keyboard accessibility: Escape closes the menu (see [`crate::nav`]),
//! Enter in a form input moves focus forward.

use serde::Deserialize;

use crate::error::SurfaceError;

/// Keys the page reacts to, normalized from DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

impl Key {
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            _ => Self::Other,
        }
    }
}

/// Where keyboard focus was when a key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyFocus {
    /// A text `input` of a form, at `index` among the form's
    /// `input`/`textarea` controls (`count` in total).
    FormInput { index: usize, count: usize },
    #[default]
    Elsewhere,
}

/// A focus move requested by keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The form control at this index.
    Control(usize),
    /// The form's submit button.
    SubmitButton,
}

/// Rendering port for focus moves.
pub trait FocusSurface {
    /// Move focus within the form the last key event came from.
    fn focus(&mut self, target: FocusTarget) -> Result<(), SurfaceError>;
}

/// Next focus stop after the control at `index`.
#[must_use]
pub fn next_focus(index: usize, count: usize) -> FocusTarget {
    match index.checked_add(1) {
        Some(next) if next < count => FocusTarget::Control(next),
        _ => FocusTarget::SubmitButton,
    }
}

/// Enter inside a form input: advance focus.
///
/// Returns the applied move, `None` when focus was not in a form input.
pub fn handle_enter<S: FocusSurface + ?Sized>(
    surface: &mut S,
    focus: KeyFocus,
) -> Result<Option<FocusTarget>, SurfaceError> {
    let KeyFocus::FormInput { index, count } = focus else {
        return Ok(None);
    };
    let target = next_focus(index, count);
    surface.focus(target)?;
    Ok(Some(target))
}
