//! `TransferCore` - Resource-safe stream transfer library
//!
//! This library separates describing an I/O resource from holding one.
//! A [`Supplier`] is a factory producing a fresh handle per call, and a
//! [`Closer`] guarantees that every handle registered during an operation
//! is released exactly once, in reverse registration order, regardless of
//! how the operation terminates. The bulk-copy engine drives a fixed
//! scratch buffer between a source and a sink without ever shrinking the
//! buffer's usable capacity across read cycles.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod closer;
pub mod errors;
pub mod handle;
pub mod lines;
pub mod logging;
pub mod supplier;
pub mod transfer;
pub mod types;

pub use buffer::TransferBuffer;
pub use closer::{Closer, Registered};
pub use errors::{
    AcquisitionError, EndOfInputError, ReleaseError, TransferError, TransferFailure,
    TransferResult,
};
pub use handle::{null_sink, Close, NullSink};
pub use lines::{process_lines, read_lines, LineFlow, LineProcessor, Lines};
pub use logging::SuppressionMode;
pub use supplier::Supplier;
pub use transfer::{
    copy, copy_buffered, copy_into, copy_into_with, copy_with, read_to_string, skip_fully, write,
    TransferConfig,
};
pub use types::BufferCapacity;
