//! The logging fallback for suppressed release failures.
//!
//! A release failure that happens after a scope already has a primary
//! failure must not replace it, and must not vanish either. Closers in
//! [`SuppressionMode::Attach`] record such failures on the returned
//! [`TransferFailure`](crate::errors::TransferFailure); closers in
//! [`SuppressionMode::LogOnly`] write them here instead. A suppressed
//! failure goes to exactly one of the two destinations, never both and
//! never neither.

use crate::errors::ReleaseError;

/// Target for the append-only suppressed-failure log.
pub(crate) const SUPPRESSION_TARGET: &str = "transfercore::suppressed";

/// How a closer records release failures demoted behind a primary failure.
///
/// The process default is decided once, at startup, and never probed again;
/// `LogOnly` exists for runtimes without a way to attach secondary failures
/// to a primary one and is otherwise only reachable through explicit
/// construction with [`Closer::with_mode`](crate::Closer::with_mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionMode {
    /// Attach suppressed failures to the primary failure's outcome.
    Attach,
    /// Write suppressed failures to the logging fallback.
    LogOnly,
}

impl SuppressionMode {
    /// The mode closers use when none is injected.
    ///
    /// Structured outcomes are always available here, so the constant is
    /// `Attach`; the logging fallback is never used unless asked for.
    pub const fn process_default() -> Self {
        Self::Attach
    }
}

impl Default for SuppressionMode {
    fn default() -> Self {
        Self::process_default()
    }
}

/// Records a release failure that could not be attached to its primary.
///
/// Only the `LogOnly` cleanup branch calls this; no other component writes
/// to the target.
pub(crate) fn log_suppressed_release(failure: &ReleaseError) {
    tracing::warn!(
        target: SUPPRESSION_TARGET,
        error = %failure,
        "suppressed release failure"
    );
}
