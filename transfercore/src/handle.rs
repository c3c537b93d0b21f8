//! The release contract for open handles, and the null sink.

use std::io::{self, Cursor};

/// An open handle that can be released.
///
/// `close` is the single-call release operation of a handle's lifecycle: it
/// may fail, and a failed close still counts as the handle's one release
/// attempt. Handles registered with a [`Closer`](crate::Closer) have their
/// `close` invoked exactly once when the scope ends.
pub trait Close {
    /// Releases the handle, flushing any buffered state.
    fn close(&mut self) -> io::Result<()>;
}

/// In-memory readers release trivially.
impl<T> Close for Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sinks release trivially.
impl Close for Vec<u8> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink that accepts and discards all writes.
///
/// `NullSink` holds no state, so the process shares a single instance:
/// repeated [`null_sink`] calls return the same one.
#[derive(Debug)]
pub struct NullSink {
    _private: (),
}

static NULL_SINK: NullSink = NullSink { _private: () };

/// Returns the process-wide null sink.
pub fn null_sink() -> &'static NullSink {
    &NULL_SINK
}

impl io::Write for &NullSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for NullSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for &NullSink {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for NullSink {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn null_sink_is_identity_stable() {
        assert!(std::ptr::eq(null_sink(), null_sink()));
    }

    #[test]
    fn null_sink_accepts_and_discards_writes() {
        let mut sink = null_sink();
        assert_eq!(sink.write(b"n").unwrap(), 1);
        sink.write_all(b"Test string for the null sink").unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn cursor_and_vec_close_trivially() {
        let mut reader = Cursor::new(String::from("abc"));
        assert!(reader.close().is_ok());

        let mut sink: Vec<u8> = Vec::new();
        sink.write_all(b"abc").unwrap();
        assert!(sink.close().is_ok());
        assert_eq!(sink, b"abc");
    }
}
