#![allow(missing_docs)]

use core::num::NonZeroUsize;
use std::io::{self, Read};

use rstest::rstest;
use stdi::{IoSource, LineEnding, LineReader, MemorySource, ReadErrorKind, ReaderOptions};

fn chunked(size: usize) -> ReaderOptions {
    ReaderOptions::default().with_chunk_size(NonZeroUsize::new(size).unwrap())
}

#[test]
fn reads_from_any_io_reader() {
    let mut reader = LineReader::new(IoSource::new(&b"hi\n"[..]));
    let line = reader.read_line().unwrap();
    assert_eq!(line, "hi");
    assert_eq!(line.to_str().unwrap(), "hi");
    assert_eq!(line.to_string(), "hi");
}

#[test]
fn documented_growth_sequence() {
    let mut reader = LineReader::with_options(IoSource::new(&b"abcdefghij"[..]), chunked(4));
    let line = reader.read_line().unwrap();
    assert_eq!(line, "abcdefghij");
    assert_eq!(line.capacity(), 13);
    assert_eq!(line.ending(), LineEnding::EndOfStream);
}

#[rstest]
#[case::exactly_one_chunk(4)]
#[case::one_more_than_a_chunk(5)]
fn boundary_lines_survive_intact(#[case] len: usize) {
    let mut input = vec![b'x'; len];
    input.extend_from_slice(b"\ntail");
    let mut reader = LineReader::with_options(
        MemorySource::new(input),
        chunked(4).with_retain_overread(true),
    );
    assert_eq!(reader.read_line().unwrap().as_bytes(), vec![b'x'; len].as_slice());
    assert_eq!(reader.read_line().unwrap(), "tail");
}

#[test]
fn default_options_use_default_chunk() {
    let reader = LineReader::new(MemorySource::new(""));
    assert_eq!(reader.options().chunk_size, stdi::DEFAULT_CHUNK_SIZE);
    assert!(!reader.options().retain_overread);
}

struct Interrupted;

impl Read for Interrupted {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::ErrorKind::Interrupted.into())
    }
}

#[test]
fn interrupted_reads_are_not_retried() {
    let mut reader = LineReader::new(IoSource::new(Interrupted));
    let err = reader.read_line().unwrap_err();
    assert_eq!(err.kind(), ReadErrorKind::Io);
    let stdi::ReadError::Io(inner) = err else {
        unreachable!()
    };
    assert_eq!(inner.kind(), io::ErrorKind::Interrupted);
}

#[test]
fn lines_over_a_shared_source() {
    let mut source = MemorySource::new("alpha\nbeta\n").with_max_read(6);
    {
        let mut reader = LineReader::new(&mut source);
        assert_eq!(reader.read_line().unwrap(), "alpha");
    }
    // The first reader never saw "beta", so a fresh one picks it up.
    let mut reader = LineReader::new(&mut source);
    assert_eq!(reader.read_line().unwrap(), "beta");
    drop(reader);
    let chunk = stdi::DEFAULT_CHUNK_SIZE.get();
    assert_eq!(source.requests(), &[chunk, chunk]);
}
