#![forbid(unsafe_code)]

//! Inline styles of the nodes the page creates at runtime.

use portfolio_core::form::SUCCESS_BANNER;
use portfolio_core::notice::{ENTER_ANIMATION, Severity};

/// `cssText` of a toast notification.
#[must_use]
pub fn notification_css(severity: Severity) -> String {
    format!(
        "position: fixed; top: 20px; right: 20px; \
         background: {background}; color: {color}; \
         padding: 1rem 2rem; border-radius: 10px; \
         box-shadow: 0 4px 20px rgba(0, 0, 0, 0.3); z-index: 10000; \
         animation: {ENTER_ANIMATION}; max-width: 300px; font-weight: 500;",
        background = severity.background(),
        color = severity.color(),
    )
}

/// `cssText` of the success banner's inner box.
#[must_use]
pub fn banner_css() -> String {
    format!(
        "background: {background}; color: {color}; \
         padding: 1rem 2rem; border-radius: 10px; margin-top: 1rem; \
         text-align: center; font-weight: 600; animation: {animation};",
        background = SUCCESS_BANNER.background,
        color = SUCCESS_BANNER.color,
        animation = SUCCESS_BANNER.animation,
    )
}
