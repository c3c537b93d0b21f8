//! Test doubles for exercising `TransferCore`'s failure-ordering branches.
//!
//! Every double here fails deterministically at exactly one injectable
//! point - producing a handle, using it, or releasing it - so tests can
//! pin down which failure becomes primary and which are suppressed, for
//! every combination of broken source and broken sink.

#![forbid(unsafe_code)]
#![deny(warnings)]

pub mod faults;
pub mod suppliers;
pub mod tracking;

pub use faults::{Fault, FaultyReader, FaultyReaderSupplier, FaultyWriter, FaultyWriterSupplier};
pub use suppliers::{SharedSink, SharedSinkSupplier, ShortReader};
pub use tracking::{CloseLedger, Tracked, TrackingSupplier};
