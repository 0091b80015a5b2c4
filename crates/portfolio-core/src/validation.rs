#![forbid(unsafe_code)]

//! Contact-form field rules.
//!
//! Each field's validity is recomputed on demand from its current text; no
//! result is cached. The email rule is deliberately lax: it only checks for
//! non-space text around an `@` and a `.`, exactly as the page always has.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

const MIN_NAME_LEN: usize = 2;
const MIN_MESSAGE_LEN: usize = 10;

/// Whitespace as the browser's `\s` class defines it.
const JS_WHITESPACE: &str = "\t\n\u{000B}\u{000C}\r \u{00A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}";

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            let part = format!("[^{JS_WHITESPACE}@]+");
            match Regex::new(&format!(r"^{part}@{part}\.{part}$")) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::error!(target: "portfolio.error", error = %err, "email pattern rejected");
                    None
                }
            }
        })
        .as_ref()
}

/// Same set as [`JS_WHITESPACE`], for trimming.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// `String.prototype.trim` semantics: strips BOM, keeps U+0085.
fn js_trim(value: &str) -> &str {
    value.trim_matches(is_js_whitespace)
}

/// Length as the browser counts it (UTF-16 code units).
fn js_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// One of the three validated contact-form controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// Map a control's `name`/`id` attribute to a field.
    ///
    /// The Spanish names used by earlier versions of the markup are accepted too.
    #[must_use]
    pub fn from_control_name(name: &str) -> Option<Self> {
        match name {
            "name" | "nombre" => Some(Self::Name),
            "email" => Some(Self::Email),
            "message" | "mensaje" => Some(Self::Message),
            _ => None,
        }
    }

    /// Candidate element ids / form keys for this field, preferred first.
    #[must_use]
    pub const fn control_names(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name", "nombre"],
            Self::Email => &["email"],
            Self::Message => &["message", "mensaje"],
        }
    }

    #[must_use]
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::Name => "Name must be at least 2 characters.",
            Self::Email => "Enter a valid email.",
            Self::Message => "Message must be at least 10 characters.",
        }
    }

    /// Apply this field's rule to a raw value.
    ///
    /// Name and message are trimmed before measuring; the email is matched
    /// as given. An email pattern that failed to build rejects everything.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Name => js_len(js_trim(value)) >= MIN_NAME_LEN,
            Self::Email => email_pattern().is_some_and(|pattern| pattern.is_match(value)),
            Self::Message => js_len(js_trim(value)) >= MIN_MESSAGE_LEN,
        }
    }
}

/// The values read from the form on submit.
///
/// A control missing from the form reads as `None`, which fails its rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormValues {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl FormValues {
    #[must_use]
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Name => self.name.as_deref(),
            FormField::Email => self.email.as_deref(),
            FormField::Message => self.message.as_deref(),
        }
    }

    /// Fields whose value is missing or fails its rule, in form order.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|&field| !self.get(field).is_some_and(|value| field.accepts(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_rule_trims() {
        assert!(!FormField::Name.accepts("A"));
        assert!(!FormField::Name.accepts("  A  "));
        assert!(FormField::Name.accepts("Al"));
        assert!(FormField::Name.accepts(" Al "));
    }

    #[test]
    fn message_rule_trims() {
        assert!(!FormField::Message.accepts("short"));
        assert!(!FormField::Message.accepts("   123456789   "));
        assert!(FormField::Message.accepts("1234567890"));
    }

    #[test]
    fn trim_follows_browser_whitespace() {
        assert!(!FormField::Name.accepts("\u{FEFF}A"));
        assert!(!FormField::Name.accepts("\u{2003}A\u{3000}"));
        // U+0085 is not whitespace to the browser, so it counts.
        assert!(FormField::Name.accepts("\u{85}A"));
        assert!(FormField::Message.accepts("\u{85}123456789"));
    }

    #[test]
    fn email_pattern_builds() {
        assert!(email_pattern().is_some());
    }

    #[test]
    fn length_counts_utf16_units() {
        // One astral character is two UTF-16 units, as the browser measures it.
        assert!(FormField::Name.accepts("😀"));
    }

    #[test]
    fn email_rule_is_lax() {
        for ok in [
            "heydi@example.com",
            "a@b.c",
            "a@b..c",
            "a.b@c.d.e",
            "weird!#$@x.y",
        ] {
            assert!(FormField::Email.accepts(ok), "{ok} should be accepted");
        }
        for bad in [
            "bad-email",
            "a@b",
            "@b.c",
            "a@.c",
            "a@b.",
            "a b@c.d",
            "a@@b.c",
            " a@b.c",
            "a@b.c\n",
            "a@b\u{00A0}x.c",
            "",
        ] {
            assert!(!FormField::Email.accepts(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn control_names_round_trip() {
        for field in FormField::ALL {
            for name in field.control_names() {
                assert_eq!(FormField::from_control_name(name), Some(field));
            }
        }
        assert_eq!(FormField::from_control_name("phone"), None);
    }

    #[test]
    fn invalid_fields_lists_every_failure() {
        let values = FormValues::new("Al", "bad-email", "short");
        assert_eq!(
            values.invalid_fields(),
            vec![FormField::Email, FormField::Message]
        );
        assert_eq!(
            FormValues::default().invalid_fields(),
            FormField::ALL.to_vec()
        );
    }

    proptest! {
        #[test]
        fn name_rejected_iff_short(value in "[ a\u{85}\u{A0}\u{2003}\u{FEFF}😀]{0,6}") {
            let blank = [' ', '\u{A0}', '\u{2003}', '\u{FEFF}'];
            let expected = value.trim_matches(&blank[..]).encode_utf16().count() >= 2;
            prop_assert_eq!(FormField::Name.accepts(&value), expected);
        }

        #[test]
        fn message_rejected_iff_short(value in "[ a-z\u{85}\u{FEFF}]{0,16}") {
            let blank = [' ', '\u{FEFF}'];
            let expected = value.trim_matches(&blank[..]).chars().count() >= 10;
            prop_assert_eq!(FormField::Message.accepts(&value), expected);
        }

        #[test]
        fn email_accepts_well_formed(local in "[a-z0-9._%+-]{1,8}", host in "[a-z0-9-]{1,8}", tld in "[a-z]{1,4}") {
            let email = format!("{local}@{host}.{tld}");
            prop_assert!(FormField::Email.accepts(&email));
        }

        #[test]
        fn email_rejects_whitespace_or_extra_at(prefix in "[a-z]{1,4}", junk in "[ \t@]", suffix in "[a-z]{1,4}") {
            let email = format!("{prefix}{junk}{suffix}@x.y");
            prop_assert!(!FormField::Email.accepts(&email));
        }
    }
}
