//! Instrumentation for asserting that every produced handle is released.

use std::cell::Cell;
use std::io::{self, Read, Write};
use std::rc::Rc;

use transfercore::{AcquisitionError, Close, Supplier};

#[derive(Debug, Default)]
struct LedgerState {
    produced: Cell<usize>,
    released: Cell<usize>,
    double_releases: Cell<usize>,
}

/// Shared counters for the handles of one [`TrackingSupplier`].
#[derive(Debug, Default, Clone)]
pub struct CloseLedger {
    state: Rc<LedgerState>,
}

impl CloseLedger {
    /// How many handles the supplier has produced.
    pub fn produced(&self) -> usize {
        self.state.produced.get()
    }

    /// How many handles have been released at least once.
    pub fn released(&self) -> usize {
        self.state.released.get()
    }

    /// How many release calls hit an already-released handle.
    pub fn double_releases(&self) -> usize {
        self.state.double_releases.get()
    }

    /// Whether at least one handle was produced and each was released
    /// exactly once.
    pub fn all_released(&self) -> bool {
        self.produced() > 0 && self.produced() == self.released() && self.double_releases() == 0
    }

    fn record_produced(&self) {
        self.state.produced.set(self.state.produced.get() + 1);
    }

    fn record_released(&self, first: bool) {
        if first {
            self.state.released.set(self.state.released.get() + 1);
        } else {
            self.state
                .double_releases
                .set(self.state.double_releases.get() + 1);
        }
    }
}

/// Wraps a supplier, counting the handles it produces and their releases.
#[derive(Debug)]
pub struct TrackingSupplier<S> {
    inner: S,
    ledger: CloseLedger,
}

impl<S> TrackingSupplier<S> {
    /// Wraps `inner`, starting a fresh ledger.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ledger: CloseLedger::default(),
        }
    }

    /// A handle on this supplier's ledger.
    pub fn ledger(&self) -> CloseLedger {
        self.ledger.clone()
    }
}

impl<S: Supplier> Supplier for TrackingSupplier<S> {
    type Handle = Tracked<S::Handle>;

    fn produce(&self) -> Result<Self::Handle, AcquisitionError> {
        let inner = self.inner.produce()?;
        self.ledger.record_produced();
        Ok(Tracked {
            inner,
            ledger: self.ledger.clone(),
            released: false,
        })
    }
}

/// A handle whose release is counted on its supplier's ledger.
#[derive(Debug)]
pub struct Tracked<H> {
    inner: H,
    ledger: CloseLedger,
    released: bool,
}

impl<H: Read> Read for Tracked<H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<H: Write> Write for Tracked<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<H: Close> Close for Tracked<H> {
    fn close(&mut self) -> io::Result<()> {
        let first = !self.released;
        self.released = true;
        self.ledger.record_released(first);
        self.inner.close()
    }
}
