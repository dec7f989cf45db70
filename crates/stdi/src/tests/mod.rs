
use core::num::NonZeroUsize;

use crate::{LineReader, MemorySource, ReaderOptions};

pub(crate) fn chunk(size: usize) -> NonZeroUsize {
    NonZeroUsize::new(size).expect("chunk size must be positive")
}

pub(crate) fn options(size: usize) -> ReaderOptions {
    init_logging();
    ReaderOptions::default().with_chunk_size(chunk(size))
}

pub(crate) fn reader(source: MemorySource, size: usize) -> LineReader<MemorySource> {
    LineReader::with_options(source, options(size))
}

/// Installs a test-writer subscriber once per test binary; `RUST_LOG`
/// overrides the default `trace` filter.
pub(crate) fn init_logging() {
    #[cfg(feature = "test-logging")]
    {
        use std::sync::Once;

        use tracing_subscriber::{EnvFilter, fmt};

        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let env_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
            fmt()
                .with_env_filter(env_filter)
                .with_test_writer()
                .compact()
                .try_init()
                .ok();
        });
    }
}
