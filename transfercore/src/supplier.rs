//! Factories that produce fresh resource handles on demand.
//!
//! A [`Supplier`] describes a resource without holding one. Each call to
//! [`produce`](Supplier::produce) opens a new, independently owned handle;
//! the supplier itself never owns a resource. Operations that consume
//! suppliers acquire handles inside a [`Closer`](crate::Closer) scope so
//! that every handle is released exactly once.

use std::io::{self, Cursor};

use crate::errors::AcquisitionError;

/// A factory producing a fresh, ready-to-use handle on each call.
///
/// Suppliers are pure factories: calling [`produce`](Self::produce) twice
/// yields two independent handles over the same backing resource, with no
/// side effect beyond handle creation. A supplier shared across callers
/// still hands each caller an exclusively owned handle.
pub trait Supplier {
    /// The handle type this supplier opens.
    type Handle;

    /// Opens a new handle, or fails without acquiring anything.
    fn produce(&self) -> Result<Self::Handle, AcquisitionError>;
}

/// Any `Fn() -> io::Result<H>` closure is a supplier.
impl<F, H> Supplier for F
where
    F: Fn() -> io::Result<H>,
{
    type Handle = H;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        self().map_err(AcquisitionError::from)
    }
}

/// A supplier of readers over a fixed text.
///
/// Each [`produce`](Supplier::produce) call yields a fresh reader
/// positioned at the start of the text.
#[derive(Debug, Clone)]
pub struct TextSupplier {
    text: String,
}

/// Creates a supplier of independent readers over `text`.
pub fn text(text: impl Into<String>) -> TextSupplier {
    TextSupplier { text: text.into() }
}

impl Supplier for TextSupplier {
    type Handle = Cursor<String>;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        Ok(Cursor::new(self.text.clone()))
    }
}

/// A supplier of readers over fixed bytes.
#[derive(Debug, Clone)]
pub struct BytesSupplier {
    bytes: Vec<u8>,
}

/// Creates a supplier of independent readers over `bytes`.
pub fn bytes(bytes: Vec<u8>) -> BytesSupplier {
    BytesSupplier { bytes }
}

impl Supplier for BytesSupplier {
    type Handle = Cursor<Vec<u8>>;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        Ok(Cursor::new(self.bytes.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn text_supplier_produces_independent_handles() {
        let supplier = text("abc");

        let mut first = supplier.produce().unwrap();
        let mut second = supplier.produce().unwrap();

        let mut buf = String::new();
        first.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "abc");

        // The second handle is unaffected by the first being read.
        buf.clear();
        second.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "abc");
    }

    #[test]
    fn closure_suppliers_map_failures_to_acquisition_errors() {
        let supplier = || -> io::Result<Cursor<Vec<u8>>> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such resource"))
        };

        let err = supplier.produce().unwrap_err();
        assert_eq!(err.to_string(), "acquisition failed: no such resource");
    }

    #[test]
    fn closure_suppliers_produce_handles() {
        let supplier = || -> io::Result<_> { Ok(Cursor::new(vec![1u8, 2, 3])) };
        let mut handle = supplier.produce().unwrap();

        let mut buf = Vec::new();
        handle.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
    }
}
