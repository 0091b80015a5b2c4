#![forbid(unsafe_code)]

//! Transient toast notifications.
//!
//! A notification slides in at the top right, stays for
//! `notification_ms`, plays its exit animation, then is removed
//! `notification_exit_ms` later if still attached.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::PageTask;
use crate::error::SurfaceError;
use crate::timer::TimerQueue;

pub const ENTER_ANIMATION: &str = "slideInRight 0.3s ease-out";
pub const EXIT_ANIMATION: &str = "slideOutRight 0.3s ease-in";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    /// Parse a host-supplied severity. Anything unrecognized is `Info`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Success => "#7BC832",
            Self::Error => "#ff6b6b",
            Self::Info => "#A5EA5C",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Success => "#084003",
            Self::Error | Self::Info => "#FFFFFF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoticeId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NoticeId,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.severity.as_str())
    }
}

/// Rendering port for notifications.
pub trait NoticeSurface {
    /// Attach a notification to the page, playing [`ENTER_ANIMATION`].
    fn append_notification(&mut self, notice: &Notification) -> Result<(), SurfaceError>;

    /// Replace a notification's animation. `Ok(false)` if it is gone.
    fn set_notification_animation(
        &mut self,
        id: NoticeId,
        animation: &str,
    ) -> Result<bool, SurfaceError>;

    /// Detach a notification if still attached. `Ok(true)` when removed.
    fn remove_notification(&mut self, id: NoticeId) -> Result<bool, SurfaceError>;
}

/// Allocates notification ids and schedules their lifecycle.
#[derive(Debug, Default)]
pub struct Notifier {
    next_id: u64,
}

impl Notifier {
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Show a notification and schedule its exit.
    pub fn show<S: NoticeSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        timers: &mut TimerQueue<PageTask>,
        message: &str,
        severity: Severity,
        lifetime: Duration,
    ) -> Result<NoticeId, SurfaceError> {
        let id = NoticeId(self.next_id);
        self.next_id += 1;
        let notice = Notification {
            id,
            message: message.to_string(),
            severity,
        };
        surface.append_notification(&notice)?;
        timers.schedule(lifetime, PageTask::NotificationExit(id));
        tracing::debug!(
            target: "portfolio.notice",
            id = id.0,
            severity = severity.as_str(),
            message,
            "notification shown"
        );
        Ok(id)
    }
}

/// Start a notification's exit animation and schedule its removal.
pub fn begin_exit<S: NoticeSurface + ?Sized>(
    surface: &mut S,
    timers: &mut TimerQueue<PageTask>,
    id: NoticeId,
    exit: Duration,
) -> Result<(), SurfaceError> {
    surface.set_notification_animation(id, EXIT_ANIMATION)?;
    timers.schedule(exit, PageTask::RemoveNotification(id));
    Ok(())
}
