#![forbid(unsafe_code)]

//! Browser host for the portfolio page controllers.
//!
//! [`dom::DomSurface`] implements the `portfolio-core` rendering ports over
//! `web-sys`; the `wasm` module wires DOM events, timers and the
//! `window.PortfolioApp` namespace to a [`portfolio_core::PortfolioApp`].
//!
//! Selectors, inline styles and the console log layer are target-independent
//! so they are unit-tested natively.

pub mod console_layer;
pub mod selectors;
pub mod style;

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
mod wasm;
