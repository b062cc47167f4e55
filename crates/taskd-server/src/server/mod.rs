//! Service internals: configuration, persistence, the bulk-insert pipeline,
//! and the HTTP surface.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration and validation.
//! - [`telemetry`] - tracing subscriber setup.
//! - [`store`] - the `TodoStore` persistence seam and its Postgres impl.
//! - [`bulk`] - dispatch queue, launcher, insert tasks, response aggregation.
//! - [`service`] - axum handlers and router.

pub mod bulk;
pub mod config;
pub mod service;
pub mod store;
pub mod telemetry;
