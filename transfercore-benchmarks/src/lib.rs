//! TransferCore benchmarks
//!
//! This crate contains performance benchmarks for the TransferCore
//! library: bulk-copy throughput across buffer capacities and record
//! splitting over synthetic corpora.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
