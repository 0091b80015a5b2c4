#![forbid(unsafe_code)]

//! Scroll effects and profile image animations, including the timer cadence
//! and the mobile slowdown applied at load.
//!
//! Run:
//!   cargo test -p portfolio-harness --test scroll_and_image

use portfolio_core::image::{AnimationKind, HOVER_FILTER, NEUTRAL_FILTER};
use portfolio_core::scroll::{IntersectionEntry, NAVBAR_AT_TOP, NAVBAR_SCROLLED, RevealId};
use portfolio_core::{PageEvent, PortfolioConfig};
use portfolio_harness::{MemorySurface, app_with, full_page_app, with_captured_events};
use pretty_assertions::assert_eq;

fn count(restarts: &[AnimationKind], kind: AnimationKind) -> usize {
    restarts.iter().filter(|&&k| k == kind).count()
}

fn entry(target: u32, is_intersecting: bool) -> IntersectionEntry {
    IntersectionEntry {
        target: RevealId(target),
        is_intersecting,
    }
}

#[test]
fn navbar_switches_past_threshold() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Scroll { scroll_y: 150.0 });
    assert_eq!(app.surface().navbar_style, Some(NAVBAR_SCROLLED));

    app.dispatch(PageEvent::Scroll { scroll_y: 100.0 });
    assert_eq!(app.surface().navbar_style, Some(NAVBAR_AT_TOP));

    app.dispatch(PageEvent::Scroll { scroll_y: 101.0 });
    assert_eq!(app.surface().navbar_style, Some(NAVBAR_SCROLLED));
}

#[test]
fn scroll_without_navbar_is_ignored() {
    let mut app = app_with(MemorySurface::empty(), PortfolioConfig::default());
    let ((), captured) = with_captured_events(|| {
        app.dispatch(PageEvent::Scroll { scroll_y: 400.0 });
    });
    assert_eq!(app.surface().navbar_style, None);
    assert!(captured.recovered_entries().is_empty());
}

#[test]
fn revealed_cards_stay_revealed() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Intersection {
        entries: vec![entry(0, true), entry(1, false)],
    });
    assert!(app.surface().revealed.contains(&RevealId(0)));
    assert!(!app.surface().revealed.contains(&RevealId(1)));

    // Scrolled back out of view.
    app.dispatch(PageEvent::Intersection {
        entries: vec![entry(0, false)],
    });
    assert!(app.surface().revealed.contains(&RevealId(0)));
    assert!(app.reveal().is_revealed(RevealId(0)));

    // Re-entering does not touch the element again.
    app.dispatch(PageEvent::Intersection {
        entries: vec![entry(0, true), entry(1, true)],
    });
    assert_eq!(app.surface().reveal_calls, vec![RevealId(0), RevealId(1)]);
    assert_eq!(app.reveal().revealed_count(), 2);
}

#[test]
fn blink_and_smile_follow_their_periods() {
    let mut app = full_page_app();

    for _ in 0..10 {
        app.advance_time_ms(1_000.0);
    }
    let restarts = &app.surface().animation_restarts;
    assert_eq!(count(restarts, AnimationKind::Blink), 5);
    assert_eq!(count(restarts, AnimationKind::Smile), 0);

    for _ in 0..20 {
        app.advance_time_ms(1_000.0);
    }
    let restarts = &app.surface().animation_restarts;
    assert_eq!(count(restarts, AnimationKind::Blink), 15);
    assert_eq!(count(restarts, AnimationKind::Smile), 1);
}

#[test]
fn absolute_clock_fires_same_as_deltas() {
    let mut app = full_page_app();
    app.set_time_ms(4_000.0);
    app.set_time_ms(3_000.0);
    app.set_time_ms(f64::NAN);
    assert_eq!(count(&app.surface().animation_restarts, AnimationKind::Blink), 2);
    assert_eq!(app.next_deadline_ms(), Some(6_000.0));
}

#[test]
fn long_gap_fires_each_animation_once() {
    let mut app = full_page_app();
    app.set_time_ms(3_600_000.0);

    let restarts = &app.surface().animation_restarts;
    assert_eq!(count(restarts, AnimationKind::Blink), 1);
    assert_eq!(count(restarts, AnimationKind::Smile), 1);
    assert_eq!(app.next_deadline_ms(), Some(3_602_000.0));

    app.advance_time_ms(2_000.0);
    assert_eq!(count(&app.surface().animation_restarts, AnimationKind::Blink), 2);
}

#[test]
fn late_blink_resumes_one_period_after_the_clock() {
    let mut app = full_page_app();
    app.advance_time_ms(10_000.0);
    // Blink fired at 2 s and was eight seconds late, so it resumes at 12 s.
    assert_eq!(count(&app.surface().animation_restarts, AnimationKind::Blink), 1);
    assert_eq!(app.next_deadline_ms(), Some(12_000.0));
}

#[test]
fn small_viewport_load_slows_animations() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::Load {
        viewport_width: 500.0,
        elapsed_ms: Some(812.4),
    });
    assert_eq!(app.config().animation.smile_interval_ms, 60_000);
    assert_eq!(app.config().animation.blink_interval_ms, 4_000);

    // The blink armed at init still fires at 2 s, then re-arms at the slower pace.
    app.advance_time_ms(6_000.0);
    assert_eq!(count(&app.surface().animation_restarts, AnimationKind::Blink), 2);
    assert_eq!(app.next_deadline_ms(), Some(10_000.0));
}

#[test]
fn desktop_viewport_load_keeps_cadence() {
    let mut app = full_page_app();
    let ((), captured) = with_captured_events(|| {
        app.dispatch(PageEvent::Load {
            viewport_width: 1280.0,
            elapsed_ms: None,
        });
    });
    assert_eq!(app.config().animation.smile_interval_ms, 30_000);
    assert_eq!(app.config().animation.blink_interval_ms, 2_000);
    assert!(captured.has_message("page loaded"));
    assert!(!captured.has_message("mobile optimizations applied"));
}

#[test]
fn hover_boosts_filter_and_fires_both_animations() {
    let mut app = full_page_app();
    app.dispatch(PageEvent::ImageHoverEnter);
    assert_eq!(app.surface().profile_filter.as_deref(), Some(HOVER_FILTER));
    assert_eq!(
        app.surface().animation_restarts,
        vec![AnimationKind::Smile, AnimationKind::Blink]
    );

    app.dispatch(PageEvent::ImageHoverLeave);
    assert_eq!(app.surface().profile_filter.as_deref(), Some(NEUTRAL_FILTER));
}

#[test]
fn hover_does_not_reset_background_timers() {
    let mut app = full_page_app();
    app.advance_time_ms(1_500.0);
    app.dispatch(PageEvent::ImageHoverEnter);
    app.advance_time_ms(500.0);
    // One from the hover, one from the 2 s timer.
    assert_eq!(count(&app.surface().animation_restarts, AnimationKind::Blink), 2);
}

#[test]
fn missing_profile_image_disables_animations() {
    let mut surface = MemorySurface::full_page();
    surface.profile_image_present = false;
    let mut app = app_with(surface, PortfolioConfig::default());

    assert!(app.timers().is_empty());
    app.dispatch(PageEvent::ImageHoverEnter);
    app.advance_time_ms(60_000.0);
    assert!(app.surface().animation_restarts.is_empty());
    assert_eq!(app.surface().profile_filter, None);
}

#[test]
fn manual_triggers_report_missing_elements() {
    let mut surface = MemorySurface::full_page();
    surface.animated_elements.remove(&AnimationKind::Blink);
    let mut app = app_with(surface, PortfolioConfig::default());

    assert!(app.trigger_smile_animation());
    assert!(!app.trigger_blink_animation());
    assert_eq!(app.surface().animation_restarts, vec![AnimationKind::Smile]);
}

#[test]
fn mobile_query_uses_breakpoint() {
    let app = full_page_app();
    assert!(app.is_mobile_device(768.0));
    assert!(!app.is_mobile_device(769.0));
}
