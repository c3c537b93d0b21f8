//! Property tests for the transfer engine and record splitting.

use std::io::Cursor;

use proptest::prelude::*;
use transfercore::{
    copy_buffered, copy_with, skip_fully, supplier, BufferCapacity, Lines, TransferBuffer,
    TransferConfig, TransferError,
};
use transfercore_testing::{SharedSinkSupplier, ShortReader};

fn terminator(index: usize) -> &'static str {
    ["\n", "\r", "\r\n"][index % 3]
}

proptest! {
    /// For every buffer capacity B >= 1 and input length L >= 0, copy
    /// moves exactly L units and returns L.
    #[test]
    fn copy_transfers_exactly_the_input(
        input in prop::collection::vec(any::<u8>(), 0..2048),
        capacity in 1usize..64,
    ) {
        let mut source = Cursor::new(input.clone());
        let mut sink = Vec::new();
        let mut buffer = TransferBuffer::new(BufferCapacity::try_new(capacity).unwrap());

        let transferred = copy_buffered(&mut source, &mut sink, &mut buffer).unwrap();

        prop_assert_eq!(transferred, input.len() as u64);
        prop_assert_eq!(sink, input);
    }

    /// The supplier-level operation agrees with the raw engine.
    #[test]
    fn supplier_copy_round_trips(
        text in "[ -~]{0,512}",
        capacity in 1usize..64,
    ) {
        let from = supplier::text(text.clone());
        let to = SharedSinkSupplier::new();
        let config = TransferConfig::new()
            .with_buffer_capacity(BufferCapacity::try_new(capacity).unwrap());

        let transferred = copy_with(&from, &to, config).unwrap();

        prop_assert_eq!(transferred, text.len() as u64);
        prop_assert_eq!(to.contents_utf8(), text);
    }

    /// A source that returns partial fills indefinitely still terminates,
    /// because the request size never shrinks.
    #[test]
    fn partial_fills_terminate_in_finite_steps(
        input in prop::collection::vec(any::<u8>(), 0..2048),
        capacity in 1usize..64,
    ) {
        let mut source = ShortReader::half_filling(Cursor::new(input.clone()));
        let mut sink = Vec::new();
        let mut buffer = TransferBuffer::new(BufferCapacity::try_new(capacity).unwrap());

        let transferred = copy_buffered(&mut source, &mut sink, &mut buffer).unwrap();

        prop_assert_eq!(transferred, input.len() as u64);
        prop_assert_eq!(sink, input);
    }

    /// Splitting agrees with the segments the text was built from, for
    /// every mix of terminators, with and without a trailing one.
    #[test]
    fn line_splitting_agrees_with_its_reference(
        pairs in prop::collection::vec(("[a-z0-9 ]{1,8}", 0usize..3), 1..16),
        trailing in any::<bool>(),
    ) {
        let mut text = String::new();
        for (index, (segment, term)) in pairs.iter().enumerate() {
            text.push_str(segment);
            if index + 1 < pairs.len() {
                text.push_str(terminator(*term));
            }
        }
        if trailing {
            text.push_str(terminator(pairs[pairs.len() - 1].1));
        }

        let records: Vec<String> = Lines::new(Cursor::new(text))
            .collect::<Result<_, TransferError>>()
            .unwrap();
        let expected: Vec<&str> = pairs.iter().map(|(segment, _)| segment.as_str()).collect();

        prop_assert_eq!(records, expected);
    }

    /// Skipping within bounds leaves exactly the remainder; skipping past
    /// the end reports exhaustion.
    #[test]
    fn skip_consumes_exactly_what_was_asked(
        input in prop::collection::vec(any::<u8>(), 0..512),
        count in 0u64..600,
    ) {
        let mut reader = Cursor::new(input.clone());

        let outcome = skip_fully(&mut reader, count);

        if count <= input.len() as u64 {
            outcome.unwrap();
            let mut rest = Vec::new();
            std::io::Read::read_to_end(&mut reader, &mut rest).unwrap();
            let skipped = usize::try_from(count).unwrap();
            prop_assert_eq!(rest, input[skipped..].to_vec());
        } else {
            prop_assert!(matches!(outcome, Err(TransferError::EndOfInput(_))));
        }
    }
}
