//! The bulk-copy engine and its supplier-level entry points.
//!
//! The engine moves data between a source and a sink through a reusable
//! [`TransferBuffer`], resetting the buffer's fill extent every cycle so a
//! source that returns partial fills can never shrink the next request.
//! Supplier-level operations acquire their handles inside a
//! [`Closer`] scope: the source is acquired first, then the sink, and both
//! are released in reverse order on every exit path.

use std::io::{self, Read, Write};

use crate::buffer::TransferBuffer;
use crate::closer::Closer;
use crate::errors::{EndOfInputError, TransferError, TransferResult};
use crate::handle::Close;
use crate::supplier::Supplier;
use crate::types::BufferCapacity;

/// Tuning for the supplier-level copy operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    buffer_capacity: BufferCapacity,
}

impl TransferConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            buffer_capacity: BufferCapacity::default(),
        }
    }

    /// Sets the scratch capacity used for the transfer.
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: BufferCapacity) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// The scratch capacity used for the transfer.
    pub fn buffer_capacity(&self) -> BufferCapacity {
        self.buffer_capacity
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies everything `from` produces into the sink `to` produces,
/// returning the number of units transferred.
///
/// Both handles are acquired inside the operation's scope - source first -
/// and released when it ends, in reverse order. If acquiring the source
/// fails, the sink is never acquired.
pub fn copy<S, D>(from: &S, to: &D) -> TransferResult<u64>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    D: Supplier,
    D::Handle: Write + Close + 'static,
{
    copy_with(from, to, TransferConfig::default())
}

/// [`copy`] with explicit tuning.
pub fn copy_with<S, D>(from: &S, to: &D, config: TransferConfig) -> TransferResult<u64>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    D: Supplier,
    D::Handle: Write + Close + 'static,
{
    let mut closer = Closer::new();
    let outcome = acquire_and_copy(&mut closer, from, to, config);
    closer.finish(outcome)
}

fn acquire_and_copy<S, D>(
    closer: &mut Closer,
    from: &S,
    to: &D,
    config: TransferConfig,
) -> Result<u64, TransferError>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    D: Supplier,
    D::Handle: Write + Close + 'static,
{
    let mut source = closer.register(from.produce()?);
    let mut sink = closer.register(to.produce()?);
    let mut buffer = TransferBuffer::new(config.buffer_capacity());
    copy_buffered(&mut source, &mut sink, &mut buffer)
}

/// Copies everything `from` produces into an already-open sink the caller
/// owns. The engine does not close `to`.
pub fn copy_into<S, W>(from: &S, to: &mut W) -> TransferResult<u64>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    W: Write,
{
    copy_into_with(from, to, TransferConfig::default())
}

/// [`copy_into`] with explicit tuning.
pub fn copy_into_with<S, W>(from: &S, to: &mut W, config: TransferConfig) -> TransferResult<u64>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    W: Write,
{
    let mut closer = Closer::new();
    let outcome = match from.produce() {
        Ok(handle) => {
            let mut source = closer.register(handle);
            let mut buffer = TransferBuffer::new(config.buffer_capacity());
            copy_buffered(&mut source, to, &mut buffer)
        }
        Err(error) => Err(TransferError::from(error)),
    };
    closer.finish(outcome)
}

/// Drives `buffer` between two open handles until the source is exhausted,
/// returning the number of units transferred.
///
/// Every cycle resets the buffer's fill extent and requests up to the full
/// capacity again; a partial fill on one cycle never shrinks the next
/// request. A read returning zero units ends the loop successfully. A read
/// or write failure aborts immediately and becomes the primary failure of
/// the enclosing scope. Interrupted reads and writes are transparently
/// retried; they are a scheduling artifact, not an outcome.
pub fn copy_buffered<R, W>(
    source: &mut R,
    sink: &mut W,
    buffer: &mut TransferBuffer,
) -> Result<u64, TransferError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut transferred = 0u64;
    loop {
        buffer.clear();
        let read = match source.read(buffer.space()) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(TransferError::Read(error)),
        };
        buffer.set_filled(read);
        sink.write_all(buffer.filled())
            .map_err(TransferError::Write)?;
        transferred += read as u64;
    }
    sink.flush().map_err(TransferError::Write)?;
    Ok(transferred)
}

/// Reads everything `from` produces into a string.
///
/// The handle is released when the operation ends, even on failure.
pub fn read_to_string<S>(from: &S) -> TransferResult<String>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
{
    let mut collected = Vec::new();
    copy_into(from, &mut collected)?;
    match String::from_utf8(collected) {
        Ok(text) => Ok(text),
        Err(error) => {
            let decode = TransferError::from(error.utf8_error());
            Err(crate::errors::TransferFailure::new(decode, Vec::new()))
        }
    }
}

/// Writes `text` to the sink `to` produces, releasing it afterwards.
pub fn write<D>(text: &str, to: &D) -> TransferResult<()>
where
    D: Supplier,
    D::Handle: Write + Close + 'static,
{
    let mut closer = Closer::new();
    let outcome = match to.produce() {
        Ok(handle) => {
            let mut sink = closer.register(handle);
            sink.write_all(text.as_bytes())
                .and_then(|()| sink.flush())
                .map_err(TransferError::Write)
        }
        Err(error) => Err(TransferError::from(error)),
    };
    closer.finish(outcome)
}

/// Discards exactly `count` units from `source`.
///
/// Sources are allowed to return fewer units than requested; the request is
/// retried with the decreasing remainder until it is satisfied. If the
/// source is exhausted first, the operation fails with
/// [`EndOfInputError`] reporting how much was still outstanding.
pub fn skip_fully<R>(source: &mut R, count: u64) -> Result<(), TransferError>
where
    R: Read + ?Sized,
{
    let mut buffer = TransferBuffer::default();
    let mut remaining = count;
    while remaining > 0 {
        buffer.clear();
        let capacity = buffer.capacity() as u64;
        let want = usize::try_from(remaining.min(capacity))
            .expect("skip request is clamped to the buffer capacity");
        let read = match source.read(&mut buffer.space()[..want]) {
            Ok(0) => {
                return Err(TransferError::from(EndOfInputError {
                    requested: count,
                    remaining,
                }))
            }
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(TransferError::Read(error)),
        };
        remaining -= read as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::supplier;

    const TEXT: &str = "The quick brown fox jumped over the lazy dog.";

    #[test]
    fn copy_buffered_transfers_everything() {
        let mut source = Cursor::new(TEXT.as_bytes().to_vec());
        let mut sink = Vec::new();
        let mut buffer = TransferBuffer::new(BufferCapacity::try_new(8).unwrap());

        let transferred = copy_buffered(&mut source, &mut sink, &mut buffer).unwrap();

        assert_eq!(transferred, TEXT.len() as u64);
        assert_eq!(sink, TEXT.as_bytes());
    }

    #[test]
    fn copy_buffered_handles_empty_sources() {
        let mut source = Cursor::new(Vec::new());
        let mut sink = Vec::new();
        let mut buffer = TransferBuffer::default();

        assert_eq!(copy_buffered(&mut source, &mut sink, &mut buffer).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn copy_into_leaves_the_sink_open() {
        let from = supplier::text(TEXT);
        let mut sink = Vec::new();

        let transferred = copy_into(&from, &mut sink).unwrap();
        assert_eq!(transferred, TEXT.len() as u64);

        // The engine did not close the caller's sink; it is still usable.
        sink.extend_from_slice(b"!");
        assert_eq!(sink.len(), TEXT.len() + 1);
    }

    #[test]
    fn read_to_string_round_trips() {
        let from = supplier::text(TEXT);
        assert_eq!(read_to_string(&from).unwrap(), TEXT);
    }

    #[test]
    fn read_to_string_rejects_invalid_utf8() {
        let from = supplier::bytes(vec![0xff, 0xfe]);
        let failure = read_to_string(&from).unwrap_err();
        assert!(matches!(failure.primary(), TransferError::Decode(_)));
    }

    #[test]
    fn skip_fully_consumes_exactly_the_requested_units() {
        let mut reader = Cursor::new(b"abcdef".to_vec());

        let mut first = [0u8; 1];
        reader.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"a");

        skip_fully(&mut reader, 1).unwrap();
        reader.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"c");

        skip_fully(&mut reader, 2).unwrap();
        reader.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"f");

        assert_eq!(reader.read(&mut first).unwrap(), 0);
    }

    #[test]
    fn skip_fully_fails_when_input_ends_early() {
        let mut reader = Cursor::new(b"abcde".to_vec());
        let error = skip_fully(&mut reader, 6).unwrap_err();
        assert!(matches!(
            error,
            TransferError::EndOfInput(EndOfInputError {
                requested: 6,
                remaining: 1,
            })
        ));
    }

    #[test]
    fn skip_fully_of_zero_is_a_no_op() {
        let mut reader = Cursor::new(b"ab".to_vec());
        skip_fully(&mut reader, 0).unwrap();
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"ab");
    }

    #[test]
    fn config_round_trips_capacity() {
        let capacity = BufferCapacity::try_new(32).unwrap();
        let config = TransferConfig::new().with_buffer_capacity(capacity);
        assert_eq!(config.buffer_capacity(), capacity);
    }
}
