//! Error types for `TransferCore`.
//!
//! This module provides the error taxonomy for every failure scenario in a
//! transfer scope. The error design follows these principles:
//!
//! - **One failure per operation**: callers always receive exactly one
//!   primary failure; later failures in the same scope are demoted to
//!   suppressed failures and never replace it
//! - **Type safety**: different error types for acquisition, transfer, and
//!   release
//! - **Composable**: errors convert between layers with `From`
//!
//! # Error Categories
//!
//! - **`AcquisitionError`**: a supplier failed to produce a handle
//! - **`TransferError`**: a failure during the read/write loop, or the
//!   first failure of any kind in a scope
//! - **`ReleaseError`**: a handle failed to release
//! - **`EndOfInputError`**: input was exhausted before a request was
//!   satisfied
//! - **`TransferFailure`**: the outcome surfaced to callers - one primary
//!   `TransferError` plus any release failures suppressed during cleanup

use std::str::Utf8Error;

use thiserror::Error;

/// A supplier failed to produce a handle.
///
/// Acquisition failures are fatal to the operation: no partial work is
/// attempted, and suppliers that have not yet been invoked are never
/// invoked.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The underlying resource could not be opened.
    #[error("acquisition failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A handle failed to release.
///
/// A release failure becomes the primary failure of its scope only when no
/// earlier failure exists; otherwise it is suppressed on the primary or
/// written to the logging fallback. It is never discarded silently.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The handle's release operation reported an I/O failure.
    #[error("release failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Input ended before the requested number of units was consumed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("input exhausted: {remaining} of {requested} requested units remain")]
pub struct EndOfInputError {
    /// The number of units originally requested.
    pub requested: u64,
    /// The number of units still outstanding when input ran out.
    pub remaining: u64,
}

/// The primary failure of a transfer scope.
///
/// Exactly one `TransferError` is surfaced per failed operation: the first
/// failure chronologically (acquisition, then transfer, then release).
/// Failures that occur after it are recorded on [`TransferFailure`] as
/// suppressed, or written to the logging fallback, per the scope's
/// [`SuppressionMode`](crate::logging::SuppressionMode).
#[derive(Debug, Error)]
pub enum TransferError {
    /// A supplier failed to produce its handle.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// The source failed mid-read.
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    /// The sink failed mid-write.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    /// A decoded record was not valid UTF-8.
    #[error("invalid utf-8 in record: {0}")]
    Decode(#[from] Utf8Error),

    /// The record processor rejected a record.
    #[error("record processing failed: {0}")]
    Process(#[source] std::io::Error),

    /// Input was exhausted before the request was satisfied.
    #[error(transparent)]
    EndOfInput(#[from] EndOfInputError),

    /// A handle failed to release and no earlier failure existed.
    #[error(transparent)]
    Release(#[from] ReleaseError),
}

/// The outcome surfaced to callers when a transfer scope fails.
///
/// Holds the one primary failure plus zero or more release failures that
/// were suppressed during cleanup, in release order. The primary failure is
/// always the one reported by `Display`; suppressed failures are secondary
/// and never override it.
#[derive(Debug, Error)]
#[error("{primary}")]
pub struct TransferFailure {
    primary: TransferError,
    suppressed: Vec<ReleaseError>,
}

impl TransferFailure {
    pub(crate) fn new(primary: TransferError, suppressed: Vec<ReleaseError>) -> Self {
        Self {
            primary,
            suppressed,
        }
    }

    /// The first failure chronologically in the scope.
    pub fn primary(&self) -> &TransferError {
        &self.primary
    }

    /// Release failures demoted behind the primary, in release order.
    ///
    /// Empty for closers in log-only mode, where suppressed failures are
    /// written to the logging fallback instead of attached here.
    pub fn suppressed(&self) -> &[ReleaseError] {
        &self.suppressed
    }

    /// Consumes the outcome, returning the primary failure.
    pub fn into_primary(self) -> TransferError {
        self.primary
    }
}

/// Type alias for transfer results.
pub type TransferResult<T> = Result<T, TransferFailure>;
