//! Domain layer containing business entities and gateway contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Persistence gateway trait definitions
//! - [`errors`] - Typed gateway failures
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented by the
//! infrastructure layer; workflows live in [`crate::application::services`].

pub mod entities;
pub mod errors;
pub mod repositories;
