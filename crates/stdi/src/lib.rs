//! Unbuffered standard input primitives.
//!
//! `stdi` reads raw bytes, single bytes and newline-delimited lines straight
//! from the input descriptor with one `read(2)` per request. There is no
//! hidden buffer between the caller and the stream: the only memory involved
//! is the line being built, which grows in fixed-size chunks.
//!
//! # Quick start
//!
//! ```no_run
//! # #[cfg(unix)]
//! # fn main() -> Result<(), stdi::ReadError> {
//! let line = stdi::read_line()?;
//! println!("got {line}");
//! # Ok(())
//! # }
//! # #[cfg(not(unix))]
//! # fn main() {}
//! ```
//!
//! Any [`RawRead`] implementation can stand in for standard input, which is
//! how the chunking behavior is exercised deterministically:
//!
//! ```rust
//! use core::num::NonZeroUsize;
//! use stdi::{LineReader, MemorySource, ReaderOptions};
//!
//! let options = ReaderOptions::default().with_chunk_size(NonZeroUsize::new(4).unwrap());
//! let mut reader = LineReader::with_options(MemorySource::new(b"abcdefghij"), options);
//! let line = reader.read_line().unwrap();
//! assert_eq!(line, "abcdefghij");
//! assert_eq!(line.capacity(), 13);
//! ```

mod buffer;
mod error;
mod options;
mod reader;
mod source;

#[cfg(test)]
mod tests;

pub use buffer::{Line, LineEnding};
pub use error::{ReadError, ReadErrorKind};
pub use options::{DEFAULT_CHUNK_SIZE, ReaderOptions};
pub use reader::{LineReader, Lines};
#[cfg(unix)]
pub use source::{Stdin, raw_read};
pub use source::{IoSource, MemorySource, RawRead};

/// Reads one byte from standard input.
///
/// Returns `0` both at end-of-stream and on failure. Use
/// [`LineReader::read_byte`] to tell the two apart.
#[cfg(unix)]
#[must_use]
pub fn read_char() -> u8 {
    LineReader::new(Stdin).read_char()
}

/// Reads one line from standard input with the chunked reader.
///
/// Each call starts from a fresh reader, so bytes read past the newline in
/// the same underlying read are not seen by the next call.
///
/// # Errors
///
/// Fails when the line buffer cannot be allocated or the read fails.
#[cfg(unix)]
pub fn read_line() -> Result<Line, ReadError> {
    LineReader::new(Stdin).read_line()
}

/// Reads one line from standard input one byte per syscall.
///
/// # Errors
///
/// Fails when the line buffer cannot be allocated or the read fails.
#[cfg(unix)]
#[deprecated(note = "one syscall per byte; use `read_line` instead")]
#[allow(deprecated)]
pub fn raw_read_line() -> Result<Line, ReadError> {
    LineReader::new(Stdin).raw_read_line()
}
