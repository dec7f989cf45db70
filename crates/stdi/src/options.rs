use core::num::NonZeroUsize;

/// Chunk size used when none is configured.
///
/// 250 bytes, unless the crate was built with `STDI_READ_LINE_BUFFER_SIZE`
/// set to a positive decimal integer in the build environment.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match option_env!("STDI_READ_LINE_BUFFER_SIZE") {
    Some(value) => parse_chunk_size(value),
    None => match NonZeroUsize::new(250) {
        Some(size) => size,
        None => unreachable!(),
    },
};

/// Configuration for a [`LineReader`](crate::LineReader).
///
/// # Examples
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use stdi::ReaderOptions;
///
/// let options = ReaderOptions::default()
///     .with_chunk_size(NonZeroUsize::new(64).unwrap())
///     .with_retain_overread(true);
/// assert_eq!(options.chunk_size.get(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Bytes requested per read and added per buffer growth.
    ///
    /// A line buffer starts at `chunk_size + 1` bytes (the extra byte holds
    /// the terminator) and grows by `chunk_size` every time a window fills.
    ///
    /// # Default
    ///
    /// [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: NonZeroUsize,

    /// Whether bytes read past the end of a line are kept for the next read.
    ///
    /// A single raw read may return more than one line. When `false`, the
    /// bytes after the newline are discarded, which loses data on pipes and
    /// files but never holds input back from other readers of the same
    /// descriptor. When `true`, the reader keeps them and serves them before
    /// issuing another raw read, so calling `read_line` in a loop yields every
    /// line exactly once.
    ///
    /// # Default
    ///
    /// `false`
    pub retain_overread: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            retain_overread: false,
        }
    }
}

impl ReaderOptions {
    /// Sets [`chunk_size`](Self::chunk_size).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets [`retain_overread`](Self::retain_overread).
    #[must_use]
    pub fn with_retain_overread(mut self, retain: bool) -> Self {
        self.retain_overread = retain;
        self
    }
}

#[allow(clippy::cast_lossless)]
const fn parse_chunk_size(value: &str) -> NonZeroUsize {
    let bytes = value.as_bytes();
    assert!(!bytes.is_empty(), "STDI_READ_LINE_BUFFER_SIZE is empty");

    let mut acc: usize = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(
            digit.is_ascii_digit(),
            "STDI_READ_LINE_BUFFER_SIZE must be a decimal integer"
        );
        acc = match acc.checked_mul(10) {
            Some(v) => v,
            None => panic!("STDI_READ_LINE_BUFFER_SIZE overflows usize"),
        };
        acc = match acc.checked_add((digit - b'0') as usize) {
            Some(v) => v,
            None => panic!("STDI_READ_LINE_BUFFER_SIZE overflows usize"),
        };
        i += 1;
    }

    match NonZeroUsize::new(acc) {
        Some(size) => size,
        None => panic!("STDI_READ_LINE_BUFFER_SIZE must be positive"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", 1)]
    #[case("250", 250)]
    #[case("4096", 4096)]
    #[case("007", 7)]
    fn parses_decimal_sizes(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(parse_chunk_size(input).get(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("12a")]
    #[case("-4")]
    #[case("99999999999999999999999999")]
    #[should_panic(expected = "STDI_READ_LINE_BUFFER_SIZE")]
    fn rejects_bad_sizes(#[case] input: &str) {
        let _ = parse_chunk_size(input);
    }

    #[test]
    fn default_matches_build_environment() {
        let expected = option_env!("STDI_READ_LINE_BUFFER_SIZE")
            .map_or(250, |v| v.parse::<usize>().unwrap());
        assert_eq!(ReaderOptions::default().chunk_size.get(), expected);
        assert!(!ReaderOptions::default().retain_overread);
    }
}
