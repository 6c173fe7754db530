//! Shared output writer (spec §5): workers run one per contig/candidate in
//! a rayon thread pool and must serialize their results into a single
//! output stream without interleaving partial lines.

use std::io::Write;
use std::sync::Mutex;

/// Wraps a single `Write` sink behind a mutex so that concurrent workers can
/// each emit a whole record atomically (one `write_line` call per record).
pub struct OutputWriter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl OutputWriter {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        OutputWriter {
            sink: Mutex::new(sink),
        }
    }

    /// Write `line` followed by a newline and flush, holding the lock for
    /// the duration so no other worker's line can interleave.
    pub fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(|poison| poison.into_inner());
        writeln!(sink, "{}", line)?;
        sink.flush()
    }
}
