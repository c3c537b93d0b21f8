//! Record-oriented reading: line splitting and per-record processing.
//!
//! A record is a run of text ended by a terminator; bare `\n`, bare `\r`,
//! and `\r\n` are equivalent, including a `\r\n` split across two read
//! cycles. A final unterminated run is still a record, and a terminated
//! final run does not produce a trailing empty record.
//!
//! [`Lines`] is the lazy, finite, single-pass view of a source's records;
//! consumption may stop early, and restarting requires a fresh handle from
//! the supplier. [`process_lines`] drives a [`LineProcessor`] callback over
//! that view inside a [`Closer`](crate::Closer) scope.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::mem;

use crate::buffer::TransferBuffer;
use crate::closer::Closer;
use crate::errors::{TransferError, TransferResult};
use crate::handle::Close;
use crate::supplier::Supplier;

/// Whether a processor wants more records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFlow {
    /// Keep delivering records.
    Continue,
    /// Stop: no further records are read or delivered.
    Stop,
}

/// A callback invoked once per record, with an early-termination signal
/// and an accumulated result.
pub trait LineProcessor {
    /// The accumulated result handed back when processing ends.
    type Output;

    /// Handles one record, without its terminator.
    ///
    /// Returning [`LineFlow::Stop`] halts the loop; a failure aborts it and
    /// becomes the primary failure of the enclosing scope.
    fn process_line(&mut self, line: &str) -> io::Result<LineFlow>;

    /// Consumes the processor, returning its accumulated result.
    fn into_result(self) -> Self::Output;
}

/// A lazy iterator over a source's records.
///
/// Reads the source in buffered chunks and splits on `\n`, `\r`, and
/// `\r\n`. Records must be valid UTF-8; terminators are bytes that never
/// occur inside a multi-byte sequence, so splitting happens before
/// decoding and a record is always decoded whole.
#[derive(Debug)]
pub struct Lines<R> {
    source: R,
    buffer: TransferBuffer,
    pending: VecDeque<String>,
    partial: Vec<u8>,
    saw_cr: bool,
    done: bool,
}

impl<R: Read> Lines<R> {
    /// Creates a record iterator over `source`.
    pub fn new(source: R) -> Self {
        Self::with_buffer(source, TransferBuffer::default())
    }

    /// Creates a record iterator reading through the given scratch buffer.
    pub fn with_buffer(source: R, buffer: TransferBuffer) -> Self {
        Self {
            source,
            buffer,
            pending: VecDeque::new(),
            partial: Vec::new(),
            saw_cr: false,
            done: false,
        }
    }

    fn complete(
        partial: &mut Vec<u8>,
        pending: &mut VecDeque<String>,
    ) -> Result<(), TransferError> {
        match String::from_utf8(mem::take(partial)) {
            Ok(line) => {
                pending.push_back(line);
                Ok(())
            }
            Err(error) => Err(TransferError::from(error.utf8_error())),
        }
    }

    /// Splits the last read's bytes into records.
    fn split_chunk(&mut self) -> Result<(), TransferError> {
        for &byte in self.buffer.filled() {
            if self.saw_cr {
                self.saw_cr = false;
                // The second half of a \r\n pair, possibly from the
                // previous chunk, is not a terminator of its own.
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => Self::complete(&mut self.partial, &mut self.pending)?,
                b'\r' => {
                    Self::complete(&mut self.partial, &mut self.pending)?;
                    self.saw_cr = true;
                }
                other => self.partial.push(other),
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for Lines<R> {
    type Item = Result<String, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if self.done {
                return None;
            }
            self.buffer.clear();
            match self.source.read(self.buffer.space()) {
                Ok(0) => {
                    self.done = true;
                    if !self.partial.is_empty() {
                        if let Err(error) = Self::complete(&mut self.partial, &mut self.pending) {
                            return Some(Err(error));
                        }
                    }
                }
                Ok(read) => {
                    self.buffer.set_filled(read);
                    if let Err(error) = self.split_chunk() {
                        self.done = true;
                        return Some(Err(error));
                    }
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => {
                    self.done = true;
                    return Some(Err(TransferError::Read(error)));
                }
            }
        }
    }
}

/// Invokes `processor` once per record of the source `from` produces,
/// returning the processor's accumulated result.
///
/// Stops as soon as the processor signals [`LineFlow::Stop`]; remaining
/// records are not delivered. The handle is released when the operation
/// ends, on every path.
pub fn process_lines<S, P>(from: &S, processor: P) -> TransferResult<P::Output>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    P: LineProcessor,
{
    let mut closer = Closer::new();
    let outcome = acquire_and_process(&mut closer, from, processor);
    closer.finish(outcome)
}

fn acquire_and_process<S, P>(
    closer: &mut Closer,
    from: &S,
    mut processor: P,
) -> Result<P::Output, TransferError>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
    P: LineProcessor,
{
    let source = closer.register(from.produce()?);
    for line in Lines::new(source) {
        match processor.process_line(&line?).map_err(TransferError::Process)? {
            LineFlow::Continue => {}
            LineFlow::Stop => break,
        }
    }
    Ok(processor.into_result())
}

/// Collects every record the source `from` produces.
pub fn read_lines<S>(from: &S) -> TransferResult<Vec<String>>
where
    S: Supplier,
    S::Handle: Read + Close + 'static,
{
    process_lines(from, CollectLines::default())
}

/// The processor behind [`read_lines`].
#[derive(Debug, Default)]
struct CollectLines {
    lines: Vec<String>,
}

impl LineProcessor for CollectLines {
    type Output = Vec<String>;

    fn process_line(&mut self, line: &str) -> io::Result<LineFlow> {
        self.lines.push(line.to_owned());
        Ok(LineFlow::Continue)
    }

    fn into_result(self) -> Self::Output {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::supplier;

    fn lines_of(text: &str) -> Vec<String> {
        Lines::new(Cursor::new(text.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn splits_on_bare_newlines() {
        assert_eq!(lines_of("a\nb\nc"), ["a", "b", "c"]);
    }

    #[test]
    fn terminated_final_line_yields_no_trailing_record() {
        assert_eq!(lines_of("a\nb\nc\n"), ["a", "b", "c"]);
    }

    #[test]
    fn all_terminators_are_equivalent() {
        assert_eq!(lines_of("a\r\nb\rc\nd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_records_between_terminators_survive() {
        assert_eq!(lines_of("\n\n"), ["", ""]);
        assert_eq!(lines_of("a\r\r\nb"), ["a", "", "b"]);
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(lines_of("").is_empty());
    }

    #[test]
    fn crlf_split_across_read_cycles_is_one_terminator() {
        // A one-byte buffer forces every byte into its own read cycle, so
        // the \r and \n of each pair arrive separately.
        let buffer = TransferBuffer::new(crate::types::BufferCapacity::try_new(1).unwrap());
        let lines = Lines::with_buffer(Cursor::new("a\r\nb".to_string()), buffer);

        let collected: Vec<_> = lines.collect::<Result<_, _>>().unwrap();
        assert_eq!(collected, ["a", "b"]);
    }

    #[test]
    fn multibyte_records_decode_whole() {
        assert_eq!(lines_of("héllo\nwörld"), ["héllo", "wörld"]);
    }

    #[test]
    fn invalid_utf8_surfaces_as_decode_error() {
        let mut lines = Lines::new(Cursor::new(vec![0xff, b'\n']));
        let error = lines.next().unwrap().unwrap_err();
        assert!(matches!(error, TransferError::Decode(_)));
    }

    #[test]
    fn read_lines_collects_all_records() {
        let from = supplier::text("a\nb\nc");
        assert_eq!(read_lines(&from).unwrap(), ["a", "b", "c"]);
    }

    struct CountingProcessor {
        seen: u32,
        stop_after: Option<u32>,
    }

    impl LineProcessor for CountingProcessor {
        type Output = u32;

        fn process_line(&mut self, _line: &str) -> io::Result<LineFlow> {
            self.seen += 1;
            match self.stop_after {
                Some(limit) if self.seen >= limit => Ok(LineFlow::Stop),
                _ => Ok(LineFlow::Continue),
            }
        }

        fn into_result(self) -> Self::Output {
            self.seen
        }
    }

    #[test]
    fn stopping_processor_sees_exactly_one_record() {
        let from = supplier::text("a\nb\nc");
        let seen = process_lines(
            &from,
            CountingProcessor {
                seen: 0,
                stop_after: Some(1),
            },
        )
        .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn continuing_processor_sees_every_record() {
        let from = supplier::text("a\nb\nc");
        let seen = process_lines(
            &from,
            CountingProcessor {
                seen: 0,
                stop_after: None,
            },
        )
        .unwrap();
        assert_eq!(seen, 3);
    }

    struct FailingProcessor;

    impl LineProcessor for FailingProcessor {
        type Output = ();

        fn process_line(&mut self, _line: &str) -> io::Result<LineFlow> {
            Err(io::Error::new(io::ErrorKind::Other, "rejected record"))
        }

        fn into_result(self) -> Self::Output {}
    }

    #[test]
    fn processor_failure_is_the_primary_failure() {
        let from = supplier::text("a\nb");
        let failure = process_lines(&from, FailingProcessor).unwrap_err();
        assert!(matches!(failure.primary(), TransferError::Process(_)));
        assert_eq!(
            failure.to_string(),
            "record processing failed: rejected record"
        );
    }
}
