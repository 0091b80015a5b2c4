#![forbid(unsafe_code)]

//! Selectors and ids the page markup provides.

pub const HAMBURGER: &str = ".hamburger";
pub const NAV_MENU: &str = ".nav-menu";
pub const NAV_LINK: &str = ".nav-link";
pub const NAVBAR: &str = ".navbar";
pub const CONTACT_FORM_ID: &str = "contactForm";
pub const FORM_CONTROLS: &str = "input, textarea";
pub const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;
pub const FORM_GROUP: &str = ".form-group";
pub const FIELD_ERROR: &str = ".field-error";
pub const REVEAL_TARGETS: &str = ".experience-card, .project-card, .skill-item";
pub const PROFILE_IMAGE_ID: &str = "profileImage";
pub const PROFILE_IMAGE_CONTAINER: &str = ".profile-image-container";

/// Attribute carrying a reveal target's index.
pub const REVEAL_ID_ATTR: &str = "data-reveal-id";

/// Class toggled on the hamburger and the menu while open.
pub const ACTIVE_CLASS: &str = "active";

/// Selector for a form control by its `name` attribute.
#[must_use]
pub fn named_control(name: &str) -> String {
    format!(r#"[name="{name}"]"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_control_selector() {
        assert_eq!(named_control("mensaje"), r#"[name="mensaje"]"#);
    }
}
