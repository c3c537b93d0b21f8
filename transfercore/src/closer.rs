//! Scope-bound release of acquired handles.
//!
//! A [`Closer`] tracks every handle acquired during an operation, in
//! acquisition order, and releases all of them in reverse order when the
//! scope ends - whether the operation returned normally or failed at any
//! point. Release failures are reconciled against the operation's outcome:
//! the first failure chronologically stays primary, and every later one is
//! either attached to it as suppressed or written to the logging fallback.
//!
//! The intended shape of a scope:
//!
//! ```
//! use std::io::Write;
//! use transfercore::{Closer, TransferError, TransferResult};
//!
//! fn greet() -> TransferResult<()> {
//!     let mut closer = Closer::new();
//!     let outcome = run(&mut closer);
//!     closer.finish(outcome)
//! }
//!
//! fn run(closer: &mut Closer) -> Result<(), TransferError> {
//!     let mut sink = closer.register(Vec::new());
//!     sink.write_all(b"hello").map_err(TransferError::Write)?;
//!     Ok(())
//! }
//! # greet().unwrap();
//! ```
//!
//! `finish` runs on every exit path of `run` - normal return, early
//! return, or failure - exactly once.

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::errors::{ReleaseError, TransferError, TransferFailure};
use crate::handle::Close;
use crate::logging::{self, SuppressionMode};

/// A registered handle, shared between the caller and its closer.
///
/// `Registered<T>` forwards [`Read`] and [`Write`] to the handle, so it
/// drops into any code that drives plain readers and writers. The closer
/// keeps its own reference for release; using a handle after its scope has
/// finished observes whatever state `close` left it in.
///
/// Handles are single-threaded by design: a supplier invoked from another
/// thread produces a fresh, independently owned handle instead of sharing
/// this one.
#[derive(Debug)]
pub struct Registered<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Registered<T> {
    /// Runs `f` with exclusive access to the handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}

impl<T> Clone for Registered<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Read> Read for Registered<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.borrow_mut().read(buf)
    }
}

impl<T: Write> Write for Registered<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().flush()
    }
}

/// Tracks acquired handles and releases them when the scope ends.
///
/// Handles are released in reverse registration order (most recently
/// acquired first), mirroring acquisition nesting: a sink wrapping a source
/// closes before the source. A release failure on one handle never blocks
/// releasing the rest - a leaked resource is worse than a lost secondary
/// error.
pub struct Closer {
    stack: Vec<Rc<RefCell<dyn Close>>>,
    mode: SuppressionMode,
}

impl std::fmt::Debug for Closer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closer")
            .field("registered", &self.stack.len())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Closer {
    /// Creates a closer using the process-default suppression mode.
    pub fn new() -> Self {
        Self::with_mode(SuppressionMode::process_default())
    }

    /// Creates a closer with an injected suppression mode.
    pub fn with_mode(mode: SuppressionMode) -> Self {
        Self {
            stack: Vec::new(),
            mode,
        }
    }

    /// Records `handle` for release when the scope ends, passing it back
    /// for immediate use.
    pub fn register<T: Close + 'static>(&mut self, handle: T) -> Registered<T> {
        let shared = Rc::new(RefCell::new(handle));
        let erased: Rc<RefCell<dyn Close>> = shared.clone();
        self.stack.push(erased);
        Registered { inner: shared }
    }

    /// Ends the scope: releases every registered handle and reconciles
    /// release failures against the operation's outcome.
    ///
    /// Handles are released in reverse registration order, all of them,
    /// regardless of prior failures. If `result` is a failure, it stays
    /// primary and every release failure is suppressed per the closer's
    /// mode. If `result` is a success, the first release failure becomes
    /// primary and the remaining ones are suppressed behind it.
    pub fn finish<T>(mut self, result: Result<T, TransferError>) -> Result<T, TransferFailure> {
        let (value, mut primary) = match result {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        };
        let mut suppressed = Vec::new();

        while let Some(handle) = self.stack.pop() {
            if let Err(source) = handle.borrow_mut().close() {
                let failure = ReleaseError::from(source);
                if primary.is_none() {
                    primary = Some(TransferError::from(failure));
                } else {
                    match self.mode {
                        SuppressionMode::Attach => suppressed.push(failure),
                        SuppressionMode::LogOnly => logging::log_suppressed_release(&failure),
                    }
                }
            }
        }

        match primary {
            Some(primary) => Err(TransferFailure::new(primary, suppressed)),
            None => Ok(value.expect("a scope without a primary failure has a value")),
        }
    }

    /// Ends a guard-only scope that produced no value.
    pub fn close(self) -> Result<(), TransferFailure> {
        self.finish(Ok(()))
    }
}

impl Default for Closer {
    fn default() -> Self {
        Self::new()
    }
}

/// Backstop for scopes that never reached `finish`, e.g. because a caller
/// panicked between registrations. Handles are still released; failures can
/// only be logged at this point.
impl Drop for Closer {
    fn drop(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        tracing::error!(
            target: "transfercore::closer",
            remaining = self.stack.len(),
            "closer dropped without finish; releasing remaining handles"
        );
        while let Some(handle) = self.stack.pop() {
            if let Err(error) = handle.borrow_mut().close() {
                tracing::error!(
                    target: "transfercore::closer",
                    error = %error,
                    "release failed during closer drop"
                );
            }
        }
    }
}
