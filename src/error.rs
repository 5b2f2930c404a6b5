//! The error taxonomy for the numeric tower.
//!
//! The original design (see `SPEC_FULL.md` §7) distinguishes four error
//! *kinds* that are raised and immediately abort the current operation.
//! Rust's `Result` already gives us "abort, no partial result escapes" for
//! free, so the four kinds collapse into one `enum` rather than four
//! distinct exception types.

use thiserror::Error;

/// An error raised by a numeric-tower operation.
///
/// Every variant carries a short, human-readable context string describing
/// what went wrong; callers that need machine-readable detail should match
/// on the variant, not parse the string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumError {
    /// A non-numeric operand where a number was required, or a non-integer
    /// where an integer was required.
    #[error("type error: {0}")]
    Type(String),

    /// Exact division by zero; exact infinity/NaN passed to `Exact`; exact
    /// complex construction; a shift or exponent beyond the implementation
    /// ceiling.
    #[error("domain error: {0}")]
    Domain(String),

    /// A clamped extraction was out of range and the clamp policy was
    /// `Error`.
    #[error("range error: {0}")]
    Range(String),

    /// A malformed number literal, only surfaced when the caller asked the
    /// reader to raise rather than return `None`.
    #[error("parse error: {0}")]
    Parse(String),
}

impl NumError {
    pub fn ty(msg: impl Into<String>) -> Self {
        NumError::Type(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        NumError::Domain(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        NumError::Range(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        NumError::Parse(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type NumResult<T> = Result<T, NumError>;
