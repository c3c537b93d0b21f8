//! Suppliers that fail deterministically at one injectable point.
//!
//! The three points cover the whole lifecycle of a handle: `Produce` fails
//! before anything is acquired, `Operate` fails mid-transfer, `Release`
//! fails during cleanup. Each double carries a stable, distinct message so
//! tests can assert exactly which failure ended up primary.

use std::io::{self, Cursor, Read, Write};

use transfercore::{AcquisitionError, Close, Supplier};

/// The lifecycle point at which a faulty double fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `produce()` fails; no handle is ever acquired.
    Produce,
    /// Reads or writes on the handle fail.
    Operate,
    /// `close()` fails; the handle otherwise works.
    Release,
}

fn broken(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, message.to_string())
}

/// A supplier of readers over `text` that fail at the configured point.
#[derive(Debug, Clone)]
pub struct FaultyReaderSupplier {
    text: String,
    fault: Fault,
}

impl FaultyReaderSupplier {
    /// Message used when `Fault::Produce` fires.
    pub const BROKEN_OPEN: &'static str = "broken reader open";
    /// Message used when `Fault::Operate` fires.
    pub const BROKEN_READ: &'static str = "broken read";
    /// Message used when `Fault::Release` fires.
    pub const BROKEN_CLOSE: &'static str = "broken reader close";

    /// Creates a reader supplier that fails at `fault`.
    pub fn new(text: impl Into<String>, fault: Fault) -> Self {
        Self {
            text: text.into(),
            fault,
        }
    }
}

impl Supplier for FaultyReaderSupplier {
    type Handle = FaultyReader;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        if self.fault == Fault::Produce {
            return Err(AcquisitionError::from(broken(Self::BROKEN_OPEN)));
        }
        Ok(FaultyReader {
            inner: Cursor::new(self.text.clone()),
            fault: self.fault,
        })
    }
}

/// A reader produced by [`FaultyReaderSupplier`].
#[derive(Debug)]
pub struct FaultyReader {
    inner: Cursor<String>,
    fault: Fault,
}

impl Read for FaultyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fault == Fault::Operate {
            return Err(broken(FaultyReaderSupplier::BROKEN_READ));
        }
        self.inner.read(buf)
    }
}

impl Close for FaultyReader {
    fn close(&mut self) -> io::Result<()> {
        if self.fault == Fault::Release {
            return Err(broken(FaultyReaderSupplier::BROKEN_CLOSE));
        }
        Ok(())
    }
}

/// A supplier of writers that fail at the configured point.
///
/// Writers produced by a `Fault::Release` supplier accept writes normally;
/// only their cleanup fails.
#[derive(Debug, Clone, Copy)]
pub struct FaultyWriterSupplier {
    fault: Fault,
}

impl FaultyWriterSupplier {
    /// Message used when `Fault::Produce` fires.
    pub const BROKEN_OPEN: &'static str = "broken writer open";
    /// Message used when `Fault::Operate` fires.
    pub const BROKEN_WRITE: &'static str = "broken write";
    /// Message used when `Fault::Release` fires.
    pub const BROKEN_CLOSE: &'static str = "broken writer close";

    /// Creates a writer supplier that fails at `fault`.
    pub fn new(fault: Fault) -> Self {
        Self { fault }
    }
}

impl Supplier for FaultyWriterSupplier {
    type Handle = FaultyWriter;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        if self.fault == Fault::Produce {
            return Err(AcquisitionError::from(broken(Self::BROKEN_OPEN)));
        }
        Ok(FaultyWriter {
            written: Vec::new(),
            fault: self.fault,
        })
    }
}

/// A writer produced by [`FaultyWriterSupplier`].
#[derive(Debug)]
pub struct FaultyWriter {
    written: Vec<u8>,
    fault: Fault,
}

impl FaultyWriter {
    /// Everything successfully written before any failure.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Write for FaultyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fault == Fault::Operate {
            return Err(broken(FaultyWriterSupplier::BROKEN_WRITE));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for FaultyWriter {
    fn close(&mut self) -> io::Result<()> {
        if self.fault == Fault::Release {
            return Err(broken(FaultyWriterSupplier::BROKEN_CLOSE));
        }
        Ok(())
    }
}
