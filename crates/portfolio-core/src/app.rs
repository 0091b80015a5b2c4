#![forbid(unsafe_code)]

//! Page runner shared by the browser entry point and the native harness.
//!
//! [`PortfolioApp`] owns the rendering surface, the configuration and the
//! timer queue. Hosts feed it [`PageEvent`]s and clock updates; it routes each
//! one to the controller that handles it, inside that entry point's recovery
//! boundary. No JS/WASM types here.

use core::time::Duration;

use crate::a11y::{self, Key, KeyFocus};
use crate::config::PortfolioConfig;
use crate::error::{PageError, recover};
use crate::event::PageEvent;
use crate::form::{self, BannerId, ContactForm, PendingSubmission, SubmissionPhase};
use crate::image::{self, AnimationKind};
use crate::nav;
use crate::notice::{self, NoticeId, Notifier, Severity};
use crate::scroll::{self, RevealTracker};
use crate::surface::Surface;
use crate::timer::{TimerQueue, duration_from_ms};

/// Text of the notification raised for a non-trivial uncaught page error.
pub const PAGE_ERROR_NOTICE: &str = "An error occurred. Please reload the page.";

/// Floor for a repeating timer period so a zero interval cannot spin.
const MIN_REPEAT: Duration = Duration::from_millis(1);

/// Deferred work waiting on the timer queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTask {
    /// The simulated send delay elapsed.
    FinishSubmission(PendingSubmission),
    RemoveBanner(BannerId),
    /// A notification's display time is over; start its exit animation.
    NotificationExit(NoticeId),
    RemoveNotification(NoticeId),
    /// Periodic retrigger; re-arms itself after firing.
    Animate(AnimationKind),
}

/// Which controllers found their elements at initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub navigation: bool,
    pub contact_form: bool,
    pub scroll_effects: bool,
    pub image_animations: bool,
}

/// The page interaction controller.
pub struct PortfolioApp<S> {
    config: PortfolioConfig,
    surface: S,
    timers: TimerQueue<PageTask>,
    form: ContactForm,
    reveal: RevealTracker,
    notices: Notifier,
    features: Features,
    initialized: bool,
}

impl<S: Surface> PortfolioApp<S> {
    #[must_use]
    pub fn new(surface: S, config: PortfolioConfig) -> Self {
        Self {
            config,
            surface,
            timers: TimerQueue::new(),
            form: ContactForm::new(),
            reveal: RevealTracker::new(),
            notices: Notifier::new(),
            features: Features::default(),
            initialized: false,
        }
    }

    /// Bring every controller up. Later calls are no-ops.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        self.features.navigation = self.surface.has_menu();
        if self.features.navigation {
            tracing::info!(target: "portfolio.nav", "navigation initialized");
        }

        self.features.contact_form = self.surface.has_form();
        if self.features.contact_form {
            tracing::info!(target: "portfolio.form", "contact form initialized");
        }

        // Scroll listeners and the reveal observer do not depend on any one element.
        self.features.scroll_effects = true;
        tracing::info!(
            target: "portfolio.scroll",
            navbar = self.surface.has_navbar(),
            "scroll effects initialized"
        );

        self.features.image_animations = self.surface.has_profile_image();
        if self.features.image_animations {
            let now = self.timers.now();
            self.arm_animation(AnimationKind::Smile, now);
            self.arm_animation(AnimationKind::Blink, now);
            tracing::info!(
                target: "portfolio.image",
                smile_interval_ms = self.config.animation.smile_interval_ms,
                blink_interval_ms = self.config.animation.blink_interval_ms,
                "image animations initialized"
            );
        }

        tracing::info!(target: "portfolio.page", features = ?self.features, "controllers initialized");
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Route one host event to its controller.
    pub fn dispatch(&mut self, event: PageEvent) {
        if !self.initialized {
            self.init();
        }
        tracing::trace!(target: "portfolio.page", kind = event.kind(), "dispatch");
        match event {
            PageEvent::HamburgerClick => {
                recover("toggle_mobile_menu", || {
                    nav::toggle_mobile_menu(&mut self.surface)
                });
            }
            PageEvent::NavLinkClick { href } => {
                let offset = self.config.animation.scroll_offset_px;
                recover("handle_nav_click", || {
                    nav::handle_nav_click(&mut self.surface, href.as_deref(), offset)
                });
            }
            PageEvent::DocumentClick(origin) => {
                recover("close_mobile_menu", || {
                    nav::handle_document_click(&mut self.surface, origin)
                });
            }
            PageEvent::KeyDown { key, focus } => self.handle_key(&key, focus),
            PageEvent::FieldBlur { field, value } => {
                if self.features.contact_form {
                    recover("validate_field", || {
                        form::validate_field(&mut self.surface, field, &value)
                    });
                }
            }
            PageEvent::FieldInput { field } => {
                if self.features.contact_form {
                    recover("clear_field_error", || {
                        form::clear_field_error(&mut self.surface, field)
                    });
                }
            }
            PageEvent::Submit(values) => {
                if self.features.contact_form {
                    let delay = self.config.submit_delay();
                    recover("handle_form_submit", || {
                        self.form
                            .submit(&mut self.surface, &mut self.timers, values, delay)
                    });
                }
            }
            PageEvent::Scroll { scroll_y } => {
                let threshold = self.config.navbar_scroll_threshold_px;
                recover("handle_scroll", || {
                    scroll::handle_scroll(&mut self.surface, scroll_y, threshold)
                });
            }
            PageEvent::Intersection { entries } => {
                recover("handle_intersection", || {
                    self.reveal.handle_intersection(&mut self.surface, &entries)
                });
            }
            PageEvent::ImageHoverEnter => {
                if self.features.image_animations {
                    recover("image_hover_enter", || image::hover_enter(&mut self.surface));
                }
            }
            PageEvent::ImageHoverLeave => {
                if self.features.image_animations {
                    recover("image_hover_leave", || image::hover_leave(&mut self.surface));
                }
            }
            PageEvent::Load {
                viewport_width,
                elapsed_ms,
            } => self.handle_load(viewport_width, elapsed_ms),
            PageEvent::Error(err) => self.handle_page_error(&err),
        }
    }

    /// Decode and dispatch a JSON event.
    ///
    /// Returns `false` (dispatching nothing) when the payload is malformed
    /// or names an unknown event kind.
    pub fn push_encoded_event(&mut self, json: &str) -> bool {
        match PageEvent::from_json_str(json) {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(err) => {
                tracing::debug!(target: "portfolio.page", error = %err, "rejected encoded event");
                false
            }
        }
    }

    fn handle_key(&mut self, key: &str, focus: KeyFocus) {
        match Key::from_dom(key) {
            Key::Escape => {
                recover("handle_escape", || nav::handle_escape(&mut self.surface));
            }
            Key::Enter => {
                recover("focus_next_control", || {
                    a11y::handle_enter(&mut self.surface, focus)
                });
            }
            Key::Other => {}
        }
    }

    fn handle_load(&mut self, viewport_width: f64, elapsed_ms: Option<f64>) {
        let load_ms = elapsed_ms.unwrap_or_else(|| self.now_ms());
        tracing::info!(target: "portfolio.page", load_ms, "page loaded");
        image::optimize_for_mobile(&mut self.config, viewport_width);
    }

    fn handle_page_error(&mut self, err: &PageError) {
        tracing::error!(
            target: "portfolio.page",
            error_message = %err.message,
            filename = %err.filename,
            lineno = err.lineno,
            colno = err.colno,
            error_name = err.error_name.as_deref().unwrap_or("<none>"),
            "uncaught page error"
        );
        if err.should_notify() {
            self.show_notification(PAGE_ERROR_NOTICE, Severity::Error);
        }
    }

    // -- time --------------------------------------------------------------

    /// Advance the clock by `dt_ms` and run every timer that became due.
    ///
    /// Non-finite or negative deltas are ignored.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        let Some(dt) = duration_from_ms(dt_ms) else {
            return;
        };
        let until = self.timers.now().saturating_add(dt);
        self.run_due(until);
    }

    /// Move the clock to `ts_ms` since page start and run due timers.
    ///
    /// Non-finite or negative timestamps are ignored; the clock never runs
    /// backwards.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        let Some(ts) = duration_from_ms(ts_ms) else {
            return;
        };
        self.run_due(ts);
    }

    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.timers.now().as_secs_f64() * 1000.0
    }

    /// Earliest pending deadline in ms since page start.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.as_secs_f64() * 1000.0)
    }

    #[must_use]
    pub fn timers(&self) -> &TimerQueue<PageTask> {
        &self.timers
    }

    fn run_due(&mut self, until: Duration) {
        while let Some(task) = self.timers.pop_due(until) {
            self.run_task(task, until);
        }
        self.timers.settle(until);
    }

    fn run_task(&mut self, task: PageTask, until: Duration) {
        match task {
            PageTask::FinishSubmission(pending) => {
                let lifetime = self.config.success_banner_lifetime();
                recover("simulate_form_submission", || {
                    self.form
                        .finish(&mut self.surface, &mut self.timers, pending, lifetime)
                });
            }
            PageTask::RemoveBanner(id) => {
                recover("remove_success_message", || {
                    self.surface.remove_success_banner(id)
                });
            }
            PageTask::NotificationExit(id) => {
                let exit = self.config.notification_exit();
                recover("notification_exit", || {
                    notice::begin_exit(&mut self.surface, &mut self.timers, id, exit)
                });
            }
            PageTask::RemoveNotification(id) => {
                recover("remove_notification", || self.surface.remove_notification(id));
            }
            PageTask::Animate(kind) => {
                self.trigger_animation(kind);
                self.arm_animation(kind, until);
            }
        }
    }

    /// Schedule the next retrigger of `kind` one period from now.
    ///
    /// When the clock is being moved to `until` and the next period would
    /// already be overdue, the missed periods collapse into the firing that
    /// just ran and the timer resumes one period after `until`.
    fn arm_animation(&mut self, kind: AnimationKind, until: Duration) {
        let interval = match kind {
            AnimationKind::Smile => self.config.animation.smile_interval(),
            AnimationKind::Blink => self.config.animation.blink_interval(),
        }
        .max(MIN_REPEAT);
        let lag = until.saturating_sub(self.timers.now());
        let delay = if lag > interval {
            lag.saturating_add(interval)
        } else {
            interval
        };
        self.timers.schedule(delay, PageTask::Animate(kind));
    }

    // -- public namespace --------------------------------------------------

    /// Show a toast notification. Returns its id unless it failed to attach.
    pub fn show_notification(&mut self, message: &str, severity: Severity) -> Option<NoticeId> {
        let lifetime = self.config.notification_lifetime();
        recover("show_notification", || {
            self.notices
                .show(&mut self.surface, &mut self.timers, message, severity, lifetime)
        })
    }

    /// Retrigger the smile animation now. Returns whether it ran.
    pub fn trigger_smile_animation(&mut self) -> bool {
        self.trigger_animation(AnimationKind::Smile)
    }

    /// Retrigger the blink animation now. Returns whether it ran.
    pub fn trigger_blink_animation(&mut self) -> bool {
        self.trigger_animation(AnimationKind::Blink)
    }

    fn trigger_animation(&mut self, kind: AnimationKind) -> bool {
        let entry = match kind {
            AnimationKind::Smile => "trigger_smile_animation",
            AnimationKind::Blink => "trigger_blink_animation",
        };
        recover(entry, || image::trigger_animation(&mut self.surface, kind)).unwrap_or(false)
    }

    /// Whether a viewport this wide counts as mobile.
    #[must_use]
    pub fn is_mobile_device(&self, viewport_width: f64) -> bool {
        self.config.is_mobile_width(viewport_width)
    }

    // -- accessors ---------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    #[must_use]
    pub const fn submission_phase(&self) -> SubmissionPhase {
        self.form.phase()
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealTracker {
        &self.reveal
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
