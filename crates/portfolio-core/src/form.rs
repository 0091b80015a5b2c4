#![forbid(unsafe_code)]

//! Contact form controller: field validation and the simulated submission.
//!
//! No network request is ever made. A valid submit disables the button,
//! waits a fixed delay on the timer queue, then shows a success banner,
//! clears the form and restores the button:
//!
//! ```text
//! Idle --valid submit--> Submitting --delay elapsed--> Idle
//! ```
//!
//! Nothing queues or cancels submissions; the disabled button is the only
//! guard against a second submit while one is in flight.

use core::time::Duration;

use serde::Serialize;

use crate::app::PageTask;
use crate::error::{SurfaceError, recover};
use crate::timer::TimerQueue;
use crate::validation::{FormField, FormValues};

/// Submit-button label while a submission is in flight.
pub const SENDING_LABEL: &str = "Sending...";

/// Border color of a field showing an error.
pub const ERROR_BORDER_COLOR: &str = "#ff6b6b";

/// Border color restored once a field's error is cleared.
pub const DEFAULT_BORDER_COLOR: &str = "rgba(123, 200, 50, 0.3)";

/// Presentation of a field-error node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldErrorStyle {
    pub class: &'static str,
    pub color: &'static str,
    pub font_size: &'static str,
    pub margin_top: &'static str,
}

pub const FIELD_ERROR_STYLE: FieldErrorStyle = FieldErrorStyle {
    class: "field-error",
    color: "#ff6b6b",
    font_size: "0.9rem",
    margin_top: "0.5rem",
};

/// Presentation of the success banner inserted after the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerStyle {
    pub class: &'static str,
    pub text: &'static str,
    pub background: &'static str,
    pub color: &'static str,
    pub animation: &'static str,
}

pub const SUCCESS_BANNER: BannerStyle = BannerStyle {
    class: "success-message",
    text: "Message sent successfully! We will contact you soon.",
    background: "#7BC832",
    color: "#084003",
    animation: "fadeInUp 0.5s ease-out",
};

/// Handle to one inserted success banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BannerId(pub u64);

/// Rendering port for the contact form.
pub trait FormSurface {
    /// The contact form is in the document.
    fn has_form(&self) -> bool;

    /// Replace any error node in `field`'s form group with one showing `message`.
    ///
    /// `Ok(false)` when the field or its form group is missing.
    fn put_field_error(&mut self, field: FormField, message: &str) -> Result<bool, SurfaceError>;

    /// Remove `field`'s error node. `Ok(true)` when one was present.
    fn remove_field_error(&mut self, field: FormField) -> Result<bool, SurfaceError>;

    fn set_field_border(&mut self, field: FormField, color: &str) -> Result<(), SurfaceError>;

    /// Label of the submit button, `None` when the form has none.
    fn submit_label(&self) -> Result<Option<String>, SurfaceError>;

    fn set_submit_state(&mut self, label: &str, disabled: bool) -> Result<(), SurfaceError>;

    /// Clear every control of the form.
    fn reset_form(&mut self) -> Result<(), SurfaceError>;

    /// Insert a success banner immediately after the form.
    fn insert_success_banner(&mut self, id: BannerId) -> Result<(), SurfaceError>;

    /// Remove a banner if it is still attached. `Ok(true)` when removed.
    fn remove_success_banner(&mut self, id: BannerId) -> Result<bool, SurfaceError>;

    /// Wall-clock time as an ISO-8601 string, for the submission log.
    fn timestamp_iso8601(&self) -> String;
}

/// Show `field`'s error, replacing any previous one, and mark its border.
pub fn show_field_error<S: FormSurface + ?Sized>(
    surface: &mut S,
    field: FormField,
) -> Result<(), SurfaceError> {
    if surface.put_field_error(field, field.error_message())? {
        surface.set_field_border(field, ERROR_BORDER_COLOR)?;
    }
    Ok(())
}

/// Remove `field`'s error and restore its border. Does not re-validate.
///
/// Returns whether an error node was removed.
pub fn clear_field_error<S: FormSurface + ?Sized>(
    surface: &mut S,
    field: FormField,
) -> Result<bool, SurfaceError> {
    let removed = surface.remove_field_error(field)?;
    if removed {
        surface.set_field_border(field, DEFAULT_BORDER_COLOR)?;
    }
    Ok(removed)
}

/// Blur-time check of one field.
///
/// Shows the error when the trimmed value fails; a passing value leaves any
/// existing error in place (clearing happens on the next input event).
pub fn validate_field<S: FormSurface + ?Sized>(
    surface: &mut S,
    field: FormField,
    value: &str,
) -> Result<bool, SurfaceError> {
    let valid = field.accepts(value.trim());
    if !valid {
        show_field_error(surface, field)?;
    }
    Ok(valid)
}

/// Check all three fields, showing an error for each one that fails.
///
/// Errors are independent; a failure to display one does not stop the others.
pub fn validate_form<S: FormSurface + ?Sized>(surface: &mut S, values: &FormValues) -> bool {
    let invalid = values.invalid_fields();
    for &field in &invalid {
        recover("show_field_error", || show_field_error(surface, field));
    }
    invalid.is_empty()
}

/// Coarse submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// What a submit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; errors are shown.
    Rejected,
    /// Valid, but the form has no submit button, so nothing is sent.
    NoSubmitButton,
    /// Valid; the simulated send is in flight.
    Sending,
}

/// A submission waiting for its simulated delay to elapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub values: FormValues,
    /// Button label to restore afterwards.
    pub original_label: String,
}

#[derive(Serialize)]
struct SubmissionRecord<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    timestamp: String,
}

/// Submission bookkeeping for the contact form.
#[derive(Debug, Default)]
pub struct ContactForm {
    in_flight: u32,
    next_banner: u64,
}

impl ContactForm {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_flight: 0,
            next_banner: 0,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> SubmissionPhase {
        if self.in_flight == 0 {
            SubmissionPhase::Idle
        } else {
            SubmissionPhase::Submitting
        }
    }

    /// Validate and, when everything passes, start the simulated send.
    pub fn submit<S: FormSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut TimerQueue<PageTask>,
        values: FormValues,
        delay: Duration,
    ) -> Result<SubmitOutcome, SurfaceError> {
        if !validate_form(surface, &values) {
            return Ok(SubmitOutcome::Rejected);
        }
        let Some(original_label) = surface.submit_label()? else {
            return Ok(SubmitOutcome::NoSubmitButton);
        };
        surface.set_submit_state(SENDING_LABEL, true)?;
        self.in_flight = self.in_flight.saturating_add(1);
        timers.schedule(
            delay,
            PageTask::FinishSubmission(PendingSubmission {
                values,
                original_label,
            }),
        );
        tracing::debug!(target: "portfolio.form", delay_ms = delay.as_millis() as u64, "submission in flight");
        Ok(SubmitOutcome::Sending)
    }

    /// Complete a submission once its delay elapsed.
    ///
    /// Returns the banner handle when the banner was inserted.
    pub fn finish<S: FormSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut TimerQueue<PageTask>,
        pending: PendingSubmission,
        banner_lifetime: Duration,
    ) -> Result<Option<BannerId>, SurfaceError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        let id = BannerId(self.next_banner);
        self.next_banner += 1;
        let banner = recover("show_success_message", || surface.insert_success_banner(id));
        if banner.is_some() {
            timers.schedule(banner_lifetime, PageTask::RemoveBanner(id));
        }

        surface.reset_form()?;
        surface.set_submit_state(&pending.original_label, false)?;

        let record = SubmissionRecord {
            name: pending.values.name.as_deref().unwrap_or_default(),
            email: pending.values.email.as_deref().unwrap_or_default(),
            message: pending.values.message.as_deref().unwrap_or_default(),
            timestamp: surface.timestamp_iso8601(),
        };
        match serde_json::to_string(&record) {
            Ok(payload) => {
                tracing::info!(target: "portfolio.form", %payload, "contact form submitted");
            }
            Err(err) => {
                tracing::info!(target: "portfolio.form", error = %err, "contact form submitted");
            }
        }
        Ok(banner.map(|()| id))
    }
}
