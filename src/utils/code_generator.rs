//! Short code generation and validation utilities.
//!
//! Codes are 6 characters of URL-safe base64 derived from 4 bytes of OS
//! entropy. The space is deliberately small, so uniqueness is enforced by the
//! caller against the store rather than by construction.

use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Number of random bytes drawn per code.
const CODE_LENGTH_BYTES: usize = 4;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Codes that would shadow fixed routes.
const RESERVED_CODES: &[&str] = &["health"];

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{6}$").expect("valid code regex"));

/// Failure of the random source backing code generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("random source failed: {0}")]
    RandomSource(String),
}

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a candidate code. Candidates may collide with existing codes.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if no entropy could be obtained.
    fn generate(&self) -> Result<String, GenerationError>;
}

/// Generator backed by the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, GenerationError> {
        generate_code()
    }
}

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, truncated to [`CODE_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`GenerationError::RandomSource`] if the system random number
/// generator fails.
pub fn generate_code() -> Result<String, GenerationError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| GenerationError::RandomSource(e.to_string()))?;

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(CODE_LENGTH);

    Ok(code)
}

/// Returns true if the code matches the shape of a generated code.
pub fn is_well_formed(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns true if the code is reserved for a system route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
