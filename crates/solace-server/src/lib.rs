//! Solace API access gate
//!
//! This crate is the request-authorization core of the Solace platform:
//! everything that stands between an incoming API call and the handler
//! that serves it.
//!
//! # Architecture
//!
//! The gate is built on Axum/Tower and layers, outermost first:
//!
//! - **Tracing**: request spans via `tower-http`
//! - **Rate limiting**: fixed-window counters per client
//! - **Authentication**: bearer token verification plus identity load
//! - **Tier authorization**: subscription-tier checks per route subtree
//! - **Lifecycle**: memorial access-status transitions and downgrades
//!
//! Route handlers, persistence, and credential management live in other
//! services; they mount [`AccessGate`] onto their router and implement
//! the [`store`] traits.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod middleware;
pub mod store;

pub use config::AccessConfig;
pub use error::{ApiError, ApiResult};
pub use gate::AccessGate;
pub use lifecycle::LifecycleService;
