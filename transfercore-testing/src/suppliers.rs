//! Inspectable sinks and awkward-but-legal readers.

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;

use transfercore::{AcquisitionError, Close, Supplier};

/// A supplier of writers that append to one shared buffer.
///
/// Lets a test hand a sink supplier to the transfer engine - which closes
/// the handles it produces - and still inspect what was written afterwards.
#[derive(Debug, Default, Clone)]
pub struct SharedSinkSupplier {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedSinkSupplier {
    /// Creates a supplier over an empty shared buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written through this supplier's handles so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.borrow().clone()
    }

    /// [`contents`](Self::contents) decoded as UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if the written bytes are not valid UTF-8.
    pub fn contents_utf8(&self) -> String {
        String::from_utf8(self.contents()).expect("shared sink holds valid UTF-8")
    }
}

impl Supplier for SharedSinkSupplier {
    type Handle = SharedSink;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        Ok(SharedSink {
            buffer: Rc::clone(&self.buffer),
        })
    }
}

/// A writer appending to its supplier's shared buffer.
#[derive(Debug)]
pub struct SharedSink {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for SharedSink {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A reader that never fills the buffer it is handed.
///
/// Used to prove the copy loop's request size does not shrink after a
/// partial fill: if it did, requests would decay toward zero and the read
/// below would eventually be handed an empty buffer, which fails the test
/// immediately instead of looping forever.
#[derive(Debug)]
pub struct ShortReader<R> {
    inner: R,
    max_per_read: Option<usize>,
}

impl<R> ShortReader<R> {
    /// Wraps `inner`, filling at most half of each requested extent.
    pub fn half_filling(inner: R) -> Self {
        Self {
            inner,
            max_per_read: None,
        }
    }

    /// Wraps `inner`, filling at most `max_per_read` units per call.
    pub fn clamped(inner: R, max_per_read: usize) -> Self {
        Self {
            inner,
            max_per_read: Some(max_per_read.max(1)),
        }
    }
}

impl<R: Read> Read for ShortReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        assert!(
            !buf.is_empty(),
            "read called with an empty buffer: the copy loop's request size shrank to zero"
        );
        let len = match self.max_per_read {
            Some(max) => buf.len().min(max),
            None => (buf.len() / 2).max(1),
        };
        self.inner.read(&mut buf[..len])
    }
}

impl<R: Close> Close for ShortReader<R> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}
