#![forbid(unsafe_code)]

//! In-memory page implementing every rendering port.
//!
//! State is public so tests can arrange a page and inspect what the
//! controllers did to it. Any port operation can be made to fail by name
//! with [`MemorySurface::fail`], which is how recovery isolation is tested.

use std::collections::{BTreeMap, BTreeSet};

use portfolio_core::a11y::{FocusSurface, FocusTarget};
use portfolio_core::error::SurfaceError;
use portfolio_core::form::{BannerId, FormSurface};
use portfolio_core::image::{AnimationKind, ImageSurface};
use portfolio_core::nav::NavSurface;
use portfolio_core::notice::{ENTER_ANIMATION, NoticeId, NoticeSurface, Notification};
use portfolio_core::scroll::{NavbarStyle, RevealId, ScrollSurface};
use portfolio_core::validation::{FormField, FormValues};

/// Label of the submit button on [`MemorySurface::full_page`].
pub const SUBMIT_LABEL: &str = "Send Message";

/// Timestamp reported by [`FormSurface::timestamp_iso8601`] unless overridden.
pub const FIXED_TIMESTAMP: &str = "2026-01-01T00:00:00.000Z";

/// A notification attached to the page, with its current animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedNotice {
    pub notice: Notification,
    pub animation: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    // -- elements present in the document --
    pub menu_present: bool,
    pub form_present: bool,
    /// Fields whose control sits inside a `.form-group`.
    pub form_groups: BTreeSet<FormField>,
    /// Submit button label; `None` when the form has no submit button.
    pub submit_button: Option<String>,
    pub navbar_present: bool,
    pub profile_image_present: bool,
    pub animated_elements: BTreeSet<AnimationKind>,
    /// Section offsets keyed by link fragment (`#about`).
    pub sections: BTreeMap<String, f64>,

    // -- state the controllers drive --
    pub menu_active: bool,
    pub scroll_locked: bool,
    pub scroll_calls: Vec<f64>,
    /// Error nodes per field; the controllers must keep each list at most one long.
    pub field_errors: BTreeMap<FormField, Vec<String>>,
    pub field_borders: BTreeMap<FormField, String>,
    pub field_values: BTreeMap<FormField, String>,
    pub submit_disabled: bool,
    pub form_resets: u32,
    pub banners: Vec<BannerId>,
    pub navbar_style: Option<NavbarStyle>,
    pub revealed: BTreeSet<RevealId>,
    pub reveal_calls: Vec<RevealId>,
    pub animation_restarts: Vec<AnimationKind>,
    pub profile_filter: Option<String>,
    pub notifications: Vec<AttachedNotice>,
    pub focus_moves: Vec<FocusTarget>,
    pub timestamp: String,

    /// Port operations that return a host error when called.
    pub failing: BTreeSet<&'static str>,
}

impl MemorySurface {
    /// A page without any of the elements the controllers look for.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            timestamp: FIXED_TIMESTAMP.to_string(),
            ..Self::default()
        }
    }

    /// The complete portfolio page.
    #[must_use]
    pub fn full_page() -> Self {
        let sections = [
            ("#home", 0.0),
            ("#about", 640.0),
            ("#experience", 1400.0),
            ("#projects", 2300.0),
            ("#contact", 3100.0),
        ]
        .into_iter()
        .map(|(href, top)| (href.to_string(), top))
        .collect();
        Self {
            menu_present: true,
            form_present: true,
            form_groups: FormField::ALL.into_iter().collect(),
            submit_button: Some(SUBMIT_LABEL.to_string()),
            navbar_present: true,
            profile_image_present: true,
            animated_elements: [AnimationKind::Smile, AnimationKind::Blink]
                .into_iter()
                .collect(),
            sections,
            ..Self::empty()
        }
    }

    /// Make the named port operation fail from now on.
    #[must_use]
    pub fn fail(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    /// Type `values` into the form controls.
    pub fn fill(&mut self, values: &FormValues) {
        for field in FormField::ALL {
            match values.get(field) {
                Some(value) => {
                    self.field_values.insert(field, value.to_string());
                }
                None => {
                    self.field_values.remove(&field);
                }
            }
        }
    }

    /// What a submit would read from the form right now.
    #[must_use]
    pub fn form_values(&self) -> FormValues {
        FormValues {
            name: self.field_values.get(&FormField::Name).cloned(),
            email: self.field_values.get(&FormField::Email).cloned(),
            message: self.field_values.get(&FormField::Message).cloned(),
        }
    }

    /// The single error message shown for `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.field_errors
            .get(&field)
            .and_then(|nodes| nodes.last())
            .map(String::as_str)
    }

    #[must_use]
    pub fn error_node_count(&self, field: FormField) -> usize {
        self.field_errors.get(&field).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn notification(&self, id: NoticeId) -> Option<&AttachedNotice> {
        self.notifications.iter().find(|n| n.notice.id == id)
    }

    fn check(&self, op: &'static str) -> Result<(), SurfaceError> {
        if self.failing.contains(op) {
            return Err(SurfaceError::Host(format!("{op} rejected")));
        }
        Ok(())
    }

    fn require_form(&self) -> Result<(), SurfaceError> {
        if self.form_present {
            Ok(())
        } else {
            Err(SurfaceError::MissingElement("#contactForm"))
        }
    }
}

impl NavSurface for MemorySurface {
    fn has_menu(&self) -> bool {
        self.menu_present
    }

    fn menu_active(&self) -> Result<bool, SurfaceError> {
        self.check("menu_active")?;
        Ok(self.menu_active)
    }

    fn set_menu_active(&mut self, active: bool) -> Result<(), SurfaceError> {
        self.check("set_menu_active")?;
        self.menu_active = active;
        Ok(())
    }

    fn set_scroll_locked(&mut self, locked: bool) -> Result<(), SurfaceError> {
        self.check("set_scroll_locked")?;
        self.scroll_locked = locked;
        Ok(())
    }

    fn section_offset_top(&self, href: &str) -> Result<Option<f64>, SurfaceError> {
        self.check("section_offset_top")?;
        Ok(self.sections.get(href).copied())
    }

    fn scroll_to(&mut self, top: f64) -> Result<(), SurfaceError> {
        self.check("scroll_to")?;
        self.scroll_calls.push(top);
        Ok(())
    }
}

impl FormSurface for MemorySurface {
    fn has_form(&self) -> bool {
        self.form_present
    }

    fn put_field_error(&mut self, field: FormField, message: &str) -> Result<bool, SurfaceError> {
        self.check("put_field_error")?;
        if !self.form_present || !self.form_groups.contains(&field) {
            return Ok(false);
        }
        let nodes = self.field_errors.entry(field).or_default();
        nodes.clear();
        nodes.push(message.to_string());
        Ok(true)
    }

    fn remove_field_error(&mut self, field: FormField) -> Result<bool, SurfaceError> {
        self.check("remove_field_error")?;
        Ok(self
            .field_errors
            .remove(&field)
            .is_some_and(|nodes| !nodes.is_empty()))
    }

    fn set_field_border(&mut self, field: FormField, color: &str) -> Result<(), SurfaceError> {
        self.check("set_field_border")?;
        self.field_borders.insert(field, color.to_string());
        Ok(())
    }

    fn submit_label(&self) -> Result<Option<String>, SurfaceError> {
        self.check("submit_label")?;
        self.require_form()?;
        Ok(self.submit_button.clone())
    }

    fn set_submit_state(&mut self, label: &str, disabled: bool) -> Result<(), SurfaceError> {
        self.check("set_submit_state")?;
        let button = self
            .submit_button
            .as_mut()
            .ok_or(SurfaceError::MissingElement("button[type=submit]"))?;
        label.clone_into(button);
        self.submit_disabled = disabled;
        Ok(())
    }

    fn reset_form(&mut self) -> Result<(), SurfaceError> {
        self.check("reset_form")?;
        self.require_form()?;
        self.field_values.clear();
        self.form_resets += 1;
        Ok(())
    }

    fn insert_success_banner(&mut self, id: BannerId) -> Result<(), SurfaceError> {
        self.check("insert_success_banner")?;
        self.require_form()?;
        self.banners.push(id);
        Ok(())
    }

    fn remove_success_banner(&mut self, id: BannerId) -> Result<bool, SurfaceError> {
        self.check("remove_success_banner")?;
        let before = self.banners.len();
        self.banners.retain(|&banner| banner != id);
        Ok(self.banners.len() != before)
    }

    fn timestamp_iso8601(&self) -> String {
        self.timestamp.clone()
    }
}

impl ScrollSurface for MemorySurface {
    fn has_navbar(&self) -> bool {
        self.navbar_present
    }

    fn set_navbar_style(&mut self, style: NavbarStyle) -> Result<(), SurfaceError> {
        self.check("set_navbar_style")?;
        self.navbar_style = Some(style);
        Ok(())
    }

    fn reveal(&mut self, target: RevealId) -> Result<(), SurfaceError> {
        self.check("reveal")?;
        self.reveal_calls.push(target);
        self.revealed.insert(target);
        Ok(())
    }
}

impl ImageSurface for MemorySurface {
    fn has_profile_image(&self) -> bool {
        self.profile_image_present
    }

    fn restart_animation(&mut self, kind: AnimationKind) -> Result<bool, SurfaceError> {
        self.check("restart_animation")?;
        if !self.animated_elements.contains(&kind) {
            return Ok(false);
        }
        self.animation_restarts.push(kind);
        Ok(true)
    }

    fn set_profile_filter(&mut self, filter: &str) -> Result<(), SurfaceError> {
        self.check("set_profile_filter")?;
        self.profile_filter = Some(filter.to_string());
        Ok(())
    }
}

impl NoticeSurface for MemorySurface {
    fn append_notification(&mut self, notice: &Notification) -> Result<(), SurfaceError> {
        self.check("append_notification")?;
        self.notifications.push(AttachedNotice {
            notice: notice.clone(),
            animation: ENTER_ANIMATION.to_string(),
        });
        Ok(())
    }

    fn set_notification_animation(
        &mut self,
        id: NoticeId,
        animation: &str,
    ) -> Result<bool, SurfaceError> {
        self.check("set_notification_animation")?;
        let Some(attached) = self.notifications.iter_mut().find(|n| n.notice.id == id) else {
            return Ok(false);
        };
        attached.animation = animation.to_string();
        Ok(true)
    }

    fn remove_notification(&mut self, id: NoticeId) -> Result<bool, SurfaceError> {
        self.check("remove_notification")?;
        let before = self.notifications.len();
        self.notifications.retain(|n| n.notice.id != id);
        Ok(self.notifications.len() != before)
    }
}

impl FocusSurface for MemorySurface {
    fn focus(&mut self, target: FocusTarget) -> Result<(), SurfaceError> {
        self.check("focus")?;
        self.focus_moves.push(target);
        Ok(())
    }
}
