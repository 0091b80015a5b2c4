#![forbid(unsafe_code)]

//! Contact form: validation display, blur/input handling and the simulated
//! submission timeline.
//!
//! Run:
//!   cargo test -p portfolio-harness --test contact_form

use portfolio_core::form::{
    DEFAULT_BORDER_COLOR, ERROR_BORDER_COLOR, SENDING_LABEL, SubmissionPhase,
};
use portfolio_core::{FormField, FormValues, PageEvent, PageTask, PortfolioApp};
use portfolio_harness::{MemorySurface, SUBMIT_LABEL, app_with, full_page_app, with_captured_events};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn heydi() -> FormValues {
    FormValues::new(
        "Heydi Rivero",
        "heydi@example.com",
        "I would like to know more about your products.",
    )
}

fn pending_submissions(app: &PortfolioApp<MemorySurface>) -> usize {
    app.timers()
        .pending()
        .filter(|(_, task)| matches!(task, PageTask::FinishSubmission(_)))
        .count()
}

#[test]
fn invalid_submit_shows_an_error_per_failing_field() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Submit(FormValues::new("Al", "bad-email", "short")));

    // "Al" is two characters long and passes the name rule.
    let surface = app.surface();
    assert_eq!(surface.field_error(FormField::Name), None);
    assert_eq!(surface.field_error(FormField::Email), Some("Enter a valid email."));
    assert_eq!(
        surface.field_error(FormField::Message),
        Some("Message must be at least 10 characters.")
    );
    assert!(!surface.field_borders.contains_key(&FormField::Name));
    for field in [FormField::Email, FormField::Message] {
        assert_eq!(
            surface.field_borders.get(&field).map(String::as_str),
            Some(ERROR_BORDER_COLOR)
        );
    }
    assert_eq!(surface.submit_button.as_deref(), Some(SUBMIT_LABEL));
    assert!(!surface.submit_disabled);
    assert_eq!(app.submission_phase(), SubmissionPhase::Idle);
    assert_eq!(pending_submissions(&app), 0);
}

#[test]
fn one_letter_name_fails_alongside_the_others() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Submit(FormValues::new(" A ", "bad-email", "short")));

    let surface = app.surface();
    assert_eq!(
        surface.field_error(FormField::Name),
        Some("Name must be at least 2 characters.")
    );
    for field in FormField::ALL {
        assert_eq!(surface.error_node_count(field), 1);
    }
    assert_eq!(pending_submissions(&app), 0);
}

#[test]
fn missing_controls_fail_their_rules() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Submit(FormValues::default()));
    for field in FormField::ALL {
        assert_eq!(app.surface().error_node_count(field), 1);
    }
}

#[test]
fn valid_submit_completes_after_simulated_delay() {
    let mut app = full_page_app();
    app.surface_mut().fill(&heydi());

    let ((), captured) = with_captured_events(|| {
        let values = app.surface().form_values();
        app.dispatch(PageEvent::Submit(values));

        assert_eq!(app.submission_phase(), SubmissionPhase::Submitting);
        assert_eq!(app.surface().submit_button.as_deref(), Some(SENDING_LABEL));
        assert!(app.surface().submit_disabled);

        app.advance_time_ms(1999.0);
        assert!(app.surface().banners.is_empty());
        assert!(!app.surface().field_values.is_empty());

        app.advance_time_ms(1.0);
    });

    let surface = app.surface();
    assert_eq!(surface.banners.len(), 1);
    assert!(surface.field_values.is_empty());
    assert_eq!(surface.form_resets, 1);
    assert_eq!(surface.submit_button.as_deref(), Some(SUBMIT_LABEL));
    assert!(!surface.submit_disabled);
    assert_eq!(app.submission_phase(), SubmissionPhase::Idle);
    for field in FormField::ALL {
        assert_eq!(surface.error_node_count(field), 0);
    }

    let submitted = captured
        .on_target("portfolio.form")
        .find(|event| event.message.as_deref() == Some("contact form submitted"))
        .expect("submission log");
    let payload = submitted.field("payload").expect("payload field");
    assert!(payload.contains(r#""email":"heydi@example.com""#), "{payload}");
    assert!(payload.contains(r#""timestamp":"2026-01-01T00:00:00.000Z""#), "{payload}");
}

#[test]
fn success_banner_removes_itself() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Submit(heydi()));
    app.advance_time_ms(2000.0);
    assert_eq!(app.surface().banners.len(), 1);

    app.advance_time_ms(4999.0);
    assert_eq!(app.surface().banners.len(), 1);
    app.advance_time_ms(1.0);
    assert!(app.surface().banners.is_empty());
}

#[test]
fn second_submit_while_in_flight_is_not_queued_or_cancelled() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Submit(heydi()));
    app.advance_time_ms(500.0);
    app.dispatch(PageEvent::Submit(heydi()));
    assert_eq!(pending_submissions(&app), 2);

    app.advance_time_ms(1500.0);
    assert_eq!(app.surface().banners.len(), 1);
    assert_eq!(app.submission_phase(), SubmissionPhase::Submitting);

    app.advance_time_ms(500.0);
    assert_eq!(app.surface().banners.len(), 2);
    assert_eq!(app.submission_phase(), SubmissionPhase::Idle);
}

#[test]
fn form_without_submit_button_drops_valid_submission() {
    let mut surface = MemorySurface::full_page();
    surface.submit_button = None;
    let mut app = app_with(surface, Default::default());

    let ((), captured) = with_captured_events(|| {
        app.dispatch(PageEvent::Submit(heydi()));
        app.advance_time_ms(10_000.0);
    });
    assert_eq!(pending_submissions(&app), 0);
    assert!(app.surface().banners.is_empty());
    assert_eq!(app.surface().form_resets, 0);
    assert!(captured.recovered_entries().is_empty());
}

#[test]
fn blur_shows_errors_but_never_clears() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::FieldBlur {
        field: FormField::Email,
        value: "nope".into(),
    });
    assert_eq!(app.surface().field_error(FormField::Email), Some("Enter a valid email."));

    app.dispatch(PageEvent::FieldBlur {
        field: FormField::Email,
        value: "  heydi@example.com  ".into(),
    });
    assert_eq!(app.surface().error_node_count(FormField::Email), 1);
}

#[test]
fn blur_trims_before_measuring() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::FieldBlur {
        field: FormField::Name,
        value: "  A  ".into(),
    });
    assert_eq!(app.surface().error_node_count(FormField::Name), 1);

    app.dispatch(PageEvent::FieldBlur {
        field: FormField::Message,
        value: "  ten chars!  ".into(),
    });
    assert_eq!(app.surface().error_node_count(FormField::Message), 0);
}

#[test]
fn input_clears_error_and_restores_border() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::FieldBlur {
        field: FormField::Name,
        value: "A".into(),
    });
    app.dispatch(PageEvent::FieldInput {
        field: FormField::Name,
    });
    assert_eq!(app.surface().error_node_count(FormField::Name), 0);
    assert_eq!(
        app.surface().field_borders.get(&FormField::Name).map(String::as_str),
        Some(DEFAULT_BORDER_COLOR)
    );
}

#[test]
fn input_without_error_leaves_border_alone() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::FieldInput {
        field: FormField::Message,
    });
    assert!(app.surface().field_borders.is_empty());
}

#[test]
fn field_outside_form_group_is_skipped() {
    let mut surface = MemorySurface::full_page();
    surface.form_groups.remove(&FormField::Email);
    let mut app = app_with(surface, Default::default());

    app.dispatch(PageEvent::Submit(FormValues::new("Al", "bad-email", "short")));
    assert_eq!(app.surface().error_node_count(FormField::Email), 0);
    assert!(!app.surface().field_borders.contains_key(&FormField::Email));
    assert_eq!(app.surface().error_node_count(FormField::Message), 1);
}

#[test]
fn one_failing_error_display_does_not_stop_the_others() {
    let surface = MemorySurface::full_page().fail("set_field_border");
    let mut app = app_with(surface, Default::default());

    let ((), captured) = with_captured_events(|| {
        app.dispatch(PageEvent::Submit(FormValues::new("Al", "bad-email", "short")));
    });
    assert_eq!(app.surface().error_node_count(FormField::Name), 0);
    for field in [FormField::Email, FormField::Message] {
        assert_eq!(app.surface().error_node_count(field), 1);
    }
    assert_eq!(captured.recovered_entries(), vec!["show_field_error"; 2]);
}

#[test]
fn banner_failure_still_resets_form() {
    let surface = MemorySurface::full_page().fail("insert_success_banner");
    let mut app = app_with(surface, Default::default());

    let ((), captured) = with_captured_events(|| {
        app.dispatch(PageEvent::Submit(heydi()));
        app.advance_time_ms(2000.0);
    });
    assert!(app.surface().banners.is_empty());
    assert_eq!(app.surface().form_resets, 1);
    assert!(!app.surface().submit_disabled);
    assert_eq!(captured.recovered_entries(), vec!["show_success_message"]);
}

#[test]
fn form_events_without_form_are_ignored() {
    let mut app = app_with(MemorySurface::empty(), Default::default());
    app.dispatch(PageEvent::Submit(heydi()));
    app.dispatch(PageEvent::FieldBlur {
        field: FormField::Name,
        value: String::new(),
    });
    assert_eq!(pending_submissions(&app), 0);
    assert!(app.surface().field_errors.is_empty());
}

#[derive(Debug, Clone)]
enum FormOp {
    Blur(FormField, String),
    Input(FormField),
    Submit(String, String, String),
}

fn field() -> impl Strategy<Value = FormField> {
    prop_oneof![
        Just(FormField::Name),
        Just(FormField::Email),
        Just(FormField::Message),
    ]
}

fn form_op() -> impl Strategy<Value = FormOp> {
    let text = "[ a-z@.]{0,14}";
    prop_oneof![
        (field(), text).prop_map(|(field, value)| FormOp::Blur(field, value)),
        field().prop_map(FormOp::Input),
        (text, text, text).prop_map(|(n, e, m)| FormOp::Submit(n, e, m)),
    ]
}

proptest! {
    #[test]
    fn at_most_one_error_node_per_field(ops in proptest::collection::vec(form_op(), 0..40)) {
        let mut app = full_page_app();
        for op in ops {
            let event = match op {
                FormOp::Blur(field, value) => PageEvent::FieldBlur { field, value },
                FormOp::Input(field) => PageEvent::FieldInput { field },
                FormOp::Submit(n, e, m) => PageEvent::Submit(FormValues::new(&n, &e, &m)),
            };
            app.dispatch(event);
            for field in FormField::ALL {
                prop_assert!(app.surface().error_node_count(field) <= 1);
            }
        }
    }

    #[test]
    fn submit_shows_exactly_the_failing_fields(
        name in "[ a-zA-Z]{0,6}",
        email in "[a-z@. ]{0,10}",
        message in "[ a-z]{0,14}",
    ) {
        let mut app = full_page_app();
        let values = FormValues::new(&name, &email, &message);
        let expected = values.invalid_fields();
        app.dispatch(PageEvent::Submit(values));
        let shown: Vec<FormField> = FormField::ALL
            .into_iter()
            .filter(|&field| app.surface().error_node_count(field) == 1)
            .collect();
        prop_assert_eq!(&shown, &expected);
        let phase = if expected.is_empty() {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Idle
        };
        prop_assert_eq!(app.submission_phase(), phase);
    }
}
