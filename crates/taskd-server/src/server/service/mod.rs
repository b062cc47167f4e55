//! HTTP service implementation.
//!
//! This module contains the axum surface of the server: the shared service
//! state, the route table, the request envelope parsing, and the handlers
//! that delegate to the store and the bulk pipeline.
//!
//! ## Structure
//!
//! - [`handler`] - service state ([`handler::TodoService`]), router, handlers.

pub mod handler;
