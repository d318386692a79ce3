//! HTTP middleware for request processing and protection.
//!
//! Provides rate limiting, request deadlines, request metrics and tracing.

pub mod deadline;
pub mod metrics;
pub mod rate_limit;
pub mod tracing;
