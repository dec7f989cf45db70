use std::collections::VecDeque;

use bstr::ByteSlice;
use tracing::{debug, trace};

use crate::{Line, LineEnding, RawRead, ReadError, ReaderOptions, buffer::LineBuffer};

/// Reads bytes and lines from a [`RawRead`] source.
///
/// Every line read allocates its own buffer, which becomes the returned
/// [`Line`] on success and is released on failure. The only state carried
/// between calls is the overread kept when
/// [`ReaderOptions::retain_overread`] is set.
#[derive(Debug)]
pub struct LineReader<S> {
    source: S,
    options: ReaderOptions,
    pending: VecDeque<u8>,
}

impl<S: RawRead> LineReader<S> {
    /// Creates a reader with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    /// Creates a reader with the given options.
    pub fn with_options(source: S, options: ReaderOptions) -> Self {
        Self {
            source,
            options,
            pending: VecDeque::new(),
        }
    }

    /// Reads a single byte, `None` at end-of-stream.
    ///
    /// # Errors
    ///
    /// [`ReadError::Io`] if the raw read fails.
    pub fn read_byte(&mut self) -> Result<Option<u8>, ReadError> {
        let mut byte = [0u8; 1];
        match self.fill(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Reads a single byte, `0` at end-of-stream or on failure.
    pub fn read_char(&mut self) -> u8 {
        self.read_byte().ok().flatten().unwrap_or(0)
    }

    /// Reads one line, one chunk at a time.
    ///
    /// Each raw read asks for exactly the room left in the current chunk
    /// window; a full window grows the buffer by one chunk. The line ends at
    /// the first `\n` (not included) or at end-of-stream, so an exhausted
    /// stream yields an empty line.
    ///
    /// Bytes returned by the same raw read after the newline are discarded
    /// unless [`ReaderOptions::retain_overread`] is set.
    ///
    /// # Errors
    ///
    /// [`ReadError::Alloc`] if the buffer cannot grow, [`ReadError::Io`] if a
    /// raw read fails. Nothing read so far is returned in either case.
    pub fn read_line(&mut self) -> Result<Line, ReadError> {
        let chunk = self.options.chunk_size.get();
        let mut buffer = LineBuffer::with_chunk(chunk)?;
        let mut filled = 0;

        loop {
            if filled == chunk {
                buffer.grow(chunk)?;
                filled = 0;
            }

            let start = buffer.len();
            let n = self.fill(buffer.spare(chunk - filled))?;
            if n == 0 {
                return Ok(buffer.finish(LineEnding::EndOfStream));
            }
            buffer.advance(n);
            filled += n;

            if let Some(offset) = buffer.content()[start..].find_byte(b'\n') {
                let end = start + offset;
                self.overread(&buffer.content()[end + 1..]);
                buffer.truncate(end);
                return Ok(buffer.finish(LineEnding::Newline));
            }
        }
    }

    /// Reads one line with one raw read per byte.
    ///
    /// Same result as [`read_line`](Self::read_line) but never reads past the
    /// newline, at the cost of a syscall per byte.
    ///
    /// # Errors
    ///
    /// [`ReadError::Alloc`] if the buffer cannot grow, [`ReadError::Io`] if a
    /// raw read fails.
    #[deprecated(note = "one read per byte; use `read_line` instead")]
    pub fn raw_read_line(&mut self) -> Result<Line, ReadError> {
        let chunk = self.options.chunk_size.get();
        let mut buffer = LineBuffer::with_chunk(chunk)?;
        let mut written = 0;

        loop {
            if written == chunk {
                buffer.grow(chunk)?;
                written = 0;
            }

            match self.read_byte()? {
                None => return Ok(buffer.finish(LineEnding::EndOfStream)),
                Some(b'\n') => return Ok(buffer.finish(LineEnding::Newline)),
                Some(byte) => {
                    buffer.push(byte);
                    written += 1;
                }
            }
        }
    }

    /// Reads one line, `None` once the stream is exhausted.
    ///
    /// Unlike [`read_line`](Self::read_line) this tells an empty last line
    /// (`"\n"`) apart from end-of-stream.
    ///
    /// # Errors
    ///
    /// As for [`read_line`](Self::read_line).
    pub fn next_line(&mut self) -> Result<Option<Line>, ReadError> {
        let line = self.read_line()?;
        if line.is_empty() && line.ending() == LineEnding::EndOfStream {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }

    /// Iterates over the remaining lines.
    ///
    /// Without [`ReaderOptions::retain_overread`] lines that share a raw read
    /// with an earlier one are lost.
    #[must_use]
    pub fn lines(&mut self) -> Lines<'_, S> {
        Lines {
            reader: self,
            done: false,
        }
    }

    /// Serves `dst` from the overread first, then from one raw read.
    fn fill(&mut self, dst: &mut [u8]) -> Result<usize, ReadError> {
        if !self.pending.is_empty() {
            let n = dst.len().min(self.pending.len());
            for (slot, byte) in dst.iter_mut().zip(self.pending.drain(..n)) {
                *slot = byte;
            }
            trace!(requested = dst.len(), served = n, "served from overread");
            return Ok(n);
        }

        match self.source.raw_read(dst) {
            Ok(n) => {
                debug_assert!(n <= dst.len(), "source overran destination");
                trace!(requested = dst.len(), read = n, "raw read");
                Ok(n)
            }
            Err(err) => {
                debug!(requested = dst.len(), error = %err, "raw read failed");
                Err(err.into())
            }
        }
    }

    fn overread(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.options.retain_overread {
            // Bytes may have come from the front of `pending`; put them back there.
            for &byte in bytes.iter().rev() {
                self.pending.push_front(byte);
            }
            trace!(kept = bytes.len(), "kept bytes read past end of line");
        } else {
            debug!(discarded = bytes.len(), "discarded bytes read past end of line");
        }
    }
}

impl<S> LineReader<S> {
    /// The options this reader was built with.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Bytes read past the last line and not yet handed out.
    pub fn pending(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.pending.iter().copied()
    }

    /// Borrows the source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrows the source. Reading from it directly skips any
    /// pending overread.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Returns the source, dropping any pending overread.
    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Iterator returned by [`LineReader::lines`].
///
/// Stops after end-of-stream and after the first error.
#[derive(Debug)]
pub struct Lines<'a, S> {
    reader: &'a mut LineReader<S>,
    done: bool,
}

impl<S: RawRead> Iterator for Lines<'_, S> {
    type Item = Result<Line, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_line() {
            Ok(Some(line)) => {
                self.done = line.ending() == LineEnding::EndOfStream;
                Some(Ok(line))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
