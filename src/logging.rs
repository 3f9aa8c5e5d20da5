//! Tracing setup shared by both binaries.
//!
//! Log lines go to stderr through a writer that clears the progress bar first.

use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::progress;

/// Stderr writer that keeps log lines from tearing the active progress bar.
#[derive(Debug, Default)]
pub struct BarAwareWriter;

impl Write for BarAwareWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        progress::suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_logger(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(BarAwareWriter::default),
        )
        .try_init();
}
