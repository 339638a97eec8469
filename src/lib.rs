//! Terminal HTTP request tester.
//!
//! The form in [`app`] is frozen into a [`models::RequestSpec`] on send,
//! checked and turned into an [`http::OutboundRequest`] by [`cycle`], and
//! dispatched through the [`http::Dispatch`] capability. The response comes
//! back as a [`models::ResponseSummary`] for [`ui`] to draw.

pub mod app;
pub mod config;
pub mod cycle;
pub mod error;
pub mod format;
pub mod highlight;
pub mod http;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;
pub mod validate;
