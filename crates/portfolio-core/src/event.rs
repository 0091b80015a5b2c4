#![forbid(unsafe_code)]

//! Host input as plain values.
//!
//! The browser layer translates DOM events into [`PageEvent`]s; tests build
//! them directly. Events also decode from JSON for record/replay:
//!
//! ```text
//! {"kind":"scroll","scroll_y":120}
//! {"kind":"field_blur","field":"email","value":"bad-email"}
//! {"kind":"key_down","key":"Enter","focus":{"kind":"form_input","index":0,"count":3}}
//! ```

use serde::Deserialize;

use crate::a11y::KeyFocus;
use crate::error::PageError;
use crate::nav::ClickOrigin;
use crate::scroll::IntersectionEntry;
use crate::validation::{FormField, FormValues};

/// One input the page reacts to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageEvent {
    HamburgerClick,
    /// Click on a `.nav-link`; its default navigation was prevented.
    NavLinkClick {
        #[serde(default)]
        href: Option<String>,
    },
    /// Any click reaching the document.
    DocumentClick(ClickOrigin),
    KeyDown {
        key: String,
        #[serde(default)]
        focus: KeyFocus,
    },
    FieldBlur {
        field: FormField,
        value: String,
    },
    FieldInput {
        field: FormField,
    },
    Submit(FormValues),
    Scroll {
        scroll_y: f64,
    },
    Intersection {
        entries: Vec<IntersectionEntry>,
    },
    ImageHoverEnter,
    ImageHoverLeave,
    /// The window `load` event.
    Load {
        viewport_width: f64,
        /// Milliseconds since navigation start, when the host knows it.
        #[serde(default)]
        elapsed_ms: Option<f64>,
    },
    /// An uncaught error reached the window.
    Error(PageError),
}

impl PageEvent {
    /// Decode one JSON-encoded event.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Stable snake_case name, used as the log field for dispatch.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HamburgerClick => "hamburger_click",
            Self::NavLinkClick { .. } => "nav_link_click",
            Self::DocumentClick(_) => "document_click",
            Self::KeyDown { .. } => "key_down",
            Self::FieldBlur { .. } => "field_blur",
            Self::FieldInput { .. } => "field_input",
            Self::Submit(_) => "submit",
            Self::Scroll { .. } => "scroll",
            Self::Intersection { .. } => "intersection",
            Self::ImageHoverEnter => "image_hover_enter",
            Self::ImageHoverLeave => "image_hover_leave",
            Self::Load { .. } => "load",
            Self::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::RevealId;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_unit_and_struct_variants() {
        assert_eq!(
            PageEvent::from_json_str(r#"{"kind":"hamburger_click"}"#).expect("event"),
            PageEvent::HamburgerClick
        );
        assert_eq!(
            PageEvent::from_json_str(r#"{"kind":"scroll","scroll_y":120}"#).expect("event"),
            PageEvent::Scroll { scroll_y: 120.0 }
        );
        assert_eq!(
            PageEvent::from_json_str(r##"{"kind":"nav_link_click","href":"#about"}"##)
                .expect("event"),
            PageEvent::NavLinkClick {
                href: Some("#about".into())
            }
        );
    }

    #[test]
    fn decodes_flattened_payloads() {
        let event = PageEvent::from_json_str(r#"{"kind":"document_click","in_menu":true}"#)
            .expect("event");
        assert_eq!(
            event,
            PageEvent::DocumentClick(ClickOrigin {
                in_trigger: false,
                in_menu: true
            })
        );

        let event = PageEvent::from_json_str(
            r#"{"kind":"submit","name":"Al","email":"bad-email","message":"short"}"#,
        )
        .expect("event");
        assert_eq!(event, PageEvent::Submit(FormValues::new("Al", "bad-email", "short")));
    }

    #[test]
    fn decodes_nested_focus_and_entries() {
        let event = PageEvent::from_json_str(
            r#"{"kind":"key_down","key":"Enter","focus":{"kind":"form_input","index":0,"count":3}}"#,
        )
        .expect("event");
        assert_eq!(
            event,
            PageEvent::KeyDown {
                key: "Enter".into(),
                focus: KeyFocus::FormInput { index: 0, count: 3 }
            }
        );

        let event = PageEvent::from_json_str(
            r#"{"kind":"intersection","entries":[{"target":2,"is_intersecting":true}]}"#,
        )
        .expect("event");
        assert_eq!(
            event,
            PageEvent::Intersection {
                entries: vec![IntersectionEntry {
                    target: RevealId(2),
                    is_intersecting: true
                }]
            }
        );
    }

    #[test]
    fn key_down_focus_defaults_to_elsewhere() {
        let event = PageEvent::from_json_str(r#"{"kind":"key_down","key":"Escape"}"#)
            .expect("event");
        assert_eq!(
            event,
            PageEvent::KeyDown {
                key: "Escape".into(),
                focus: KeyFocus::Elsewhere
            }
        );
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        assert!(PageEvent::from_json_str(r#"{"kind":"teleport"}"#).is_err());
        assert!(PageEvent::from_json_str(r#"{"kind":"scroll"}"#).is_err());
        assert!(PageEvent::from_json_str(r#"{"kind":"field_input","field":"phone"}"#).is_err());
        assert!(PageEvent::from_json_str("not json").is_err());
    }

    #[test]
    fn legacy_field_names_are_not_event_names() {
        // Event payloads use canonical field names only.
        assert!(
            PageEvent::from_json_str(r#"{"kind":"field_input","field":"nombre"}"#).is_err()
        );
    }
}
