#![no_main]
use core::num::NonZeroUsize;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stdi::{LineEnding, LineReader, MemorySource, ReaderOptions};

#[derive(Debug, Arbitrary)]
struct Input {
    /// Chunk size, folded into 1..=32.
    chunk: u8,
    /// Per-read caps, folded into 1..=16 so the stream never ends early.
    read_sizes: Vec<u8>,
    retain: bool,
    data: Vec<u8>,
}

fn lines(input: Input) {
    let chunk = NonZeroUsize::new(usize::from(input.chunk % 32) + 1).unwrap();
    let sizes = input.read_sizes.iter().map(|s| usize::from(*s % 16) + 1);
    let source = MemorySource::new(input.data.clone()).with_read_sizes(sizes);
    let options = ReaderOptions::default()
        .with_chunk_size(chunk)
        .with_retain_overread(input.retain);
    let mut reader = LineReader::with_options(source, options);

    let mut rebuilt = Vec::new();
    for line in reader.lines() {
        let line = line.expect("in-memory reads cannot fail");
        assert_eq!(line.as_bytes_with_nul().last(), Some(&0));
        assert!(line.capacity() > line.len());
        assert_eq!(
            line.capacity(),
            chunk.get() + 1 + (line.len() / chunk.get()) * chunk.get()
        );
        assert!(!line.contains(&b'\n'));
        rebuilt.extend_from_slice(line.as_bytes());
        if line.ending() == LineEnding::Newline {
            rebuilt.push(b'\n');
        }
    }

    if input.retain {
        assert_eq!(rebuilt, input.data);
    } else {
        // Lines sharing a read are dropped; the first line is always intact.
        assert!(rebuilt.len() <= input.data.len());
        assert!(input.data.starts_with(rebuilt.split(|b| *b == b'\n').next().unwrap_or(&[])));
    }
}

fuzz_target!(|input: Input| lines(input));
