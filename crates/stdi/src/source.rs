use std::{
    collections::VecDeque,
    io::{self, Read},
};

/// A single unbuffered read primitive.
///
/// This is the only thing a [`LineReader`](crate::LineReader) needs from the
/// outside world. Implementations perform exactly one underlying read per
/// call and never buffer: whatever they return is all the reader sees.
pub trait RawRead {
    /// Reads at most `dst.len()` bytes into the start of `dst`.
    ///
    /// Returns the number of bytes written, `0` meaning end-of-stream.
    ///
    /// # Errors
    ///
    /// Any error from the underlying primitive. Callers do not retry, not
    /// even on [`io::ErrorKind::Interrupted`].
    fn raw_read(&mut self, dst: &mut [u8]) -> io::Result<usize>;
}

impl<S: RawRead + ?Sized> RawRead for &mut S {
    fn raw_read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        (**self).raw_read(dst)
    }
}

/// The process's standard input, read with one `read(2)` per call.
///
/// Unlike [`std::io::Stdin`] there is no shared buffer in front of the
/// descriptor. Reads from several threads interleave unpredictably; callers
/// that share the descriptor must serialize access themselves.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdin;

#[cfg(unix)]
impl RawRead for Stdin {
    fn raw_read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let len = dst.len();
        let n = raw_read(dst, len);
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }
}

/// Reads up to `max_len` bytes from standard input into `buf`.
///
/// Never reads more than `buf.len()` bytes, whatever `max_len` says. Returns
/// the byte count, `0` at end-of-stream, or a negative value on failure with
/// the cause left in `errno`.
#[cfg(unix)]
pub fn raw_read(buf: &mut [u8], max_len: usize) -> isize {
    let len = max_len.min(buf.len());
    // SAFETY: `buf` is valid for writes of `len` bytes.
    unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), len) }
}

/// Adapts any [`Read`] into a [`RawRead`] by forwarding a single
/// [`Read::read`] per call.
///
/// Wrap an unbuffered reader (a `File`, a socket, a pipe) to keep the
/// one-syscall-per-read property.
#[derive(Debug, Default)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> RawRead for IoSource<R> {
    fn raw_read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        self.inner.read(dst)
    }
}

/// In-memory [`RawRead`] that replays a byte string.
///
/// The returned read sizes can be shaped to mimic pipes and terminals: a cap
/// on every read, a per-call script, and a failure injected at a given call.
/// Every requested length is recorded.
///
/// ```rust
/// use stdi::{MemorySource, RawRead};
///
/// let mut source = MemorySource::new("hello").with_read_sizes([2]);
/// let mut buf = [0u8; 8];
/// assert_eq!(source.raw_read(&mut buf).unwrap(), 2);
/// assert_eq!(source.raw_read(&mut buf).unwrap(), 3);
/// assert_eq!(source.raw_read(&mut buf).unwrap(), 0);
/// assert_eq!(source.requests(), &[8, 8, 8]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Vec<u8>,
    pos: usize,
    max_read: Option<usize>,
    read_sizes: VecDeque<usize>,
    fail_at: Option<usize>,
    requests: Vec<usize>,
}

impl MemorySource {
    /// Creates a source that yields `data` then end-of-stream.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Caps every read at `max` bytes.
    #[must_use]
    pub fn with_max_read(mut self, max: usize) -> Self {
        self.max_read = Some(max);
        self
    }

    /// Caps the next reads, one entry per call, in order.
    ///
    /// A `0` entry reports end-of-stream for that call even if data remains,
    /// the way a terminal does for an empty `^D` line. Once the script runs
    /// out only [`with_max_read`](Self::with_max_read) applies.
    #[must_use]
    pub fn with_read_sizes(mut self, sizes: impl IntoIterator<Item = usize>) -> Self {
        self.read_sizes.extend(sizes);
        self
    }

    /// Makes the call with zero-based index `call` fail with an I/O error.
    #[must_use]
    pub fn with_failure_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Destination lengths of every call so far, failed ones included.
    #[must_use]
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// Bytes not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl RawRead for MemorySource {
    fn raw_read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let call = self.requests.len();
        self.requests.push(dst.len());
        let scripted = self.read_sizes.pop_front();
        if self.fail_at == Some(call) {
            return Err(io::Error::other("injected read failure"));
        }

        let mut n = dst.len().min(self.data.len() - self.pos);
        if let Some(max) = self.max_read {
            n = n.min(max);
        }
        if let Some(size) = scripted {
            n = n.min(size);
        }

        dst[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
