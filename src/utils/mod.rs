//! Utility functions for code generation, input validation, and request handling.
//!
//! - [`code_generator`] - Short code generation and shape checks
//! - [`url_validator`] - Validation of submitted URLs
//! - [`client_ip`] - Client identity extraction for rate limiting
//! - [`db_error`] - Unique-violation classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
