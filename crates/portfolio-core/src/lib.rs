#![forbid(unsafe_code)]

//! Interaction controllers for the portfolio page.
//!
//! Everything the page decides lives here; the browser crate only translates
//! DOM events into [`PageEvent`]s and implements the rendering ports.
//!
//! | module | role |
//! |---|---|
//! | [`nav`] | hamburger menu, smooth-scroll links, outside-click and Escape close |
//! | [`form`] / [`validation`] | field rules, error nodes, simulated submission |
//! | [`scroll`] | navbar style swap, one-way reveal on intersection |
//! | [`image`] | smile/blink retriggers, hover effect, mobile slowdown |
//! | [`notice`] | toast notifications |
//! | [`a11y`] | Enter-to-advance focus in the form |
//! | [`app`] | [`PortfolioApp`]: event routing, timers, recovery boundaries |
//!
//! Time is host-driven: nothing here reads a wall clock. The host moves the
//! clock with [`PortfolioApp::advance_time_ms`] / [`PortfolioApp::set_time_ms`]
//! and due timers run synchronously inside that call.

pub mod a11y;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod image;
pub mod nav;
pub mod notice;
pub mod scroll;
pub mod surface;
pub mod timer;
pub mod validation;

pub use app::{Features, PAGE_ERROR_NOTICE, PageTask, PortfolioApp};
pub use config::{AnimationConfig, ConfigError, PortfolioConfig};
pub use error::{PageError, SurfaceError, recover};
pub use event::PageEvent;
pub use notice::Severity;
pub use surface::Surface;
pub use validation::{FormField, FormValues};
