//! Console output sinks.

use std::io::{self, Write};

use tracing::warn;

/// Destination for streamed model text and progress lines.
pub trait OutputSink: Send {
    /// Emit a chunk of model output exactly as received.
    fn write_chunk(&mut self, chunk: &str) -> io::Result<()>;

    /// Emit a progress line (model attempt, retry wait, failure reason).
    fn notice(&mut self, line: &str);
}

/// Writes to standard output, flushing after every chunk.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_chunk(&mut self, chunk: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(chunk.as_bytes())?;
        stdout.flush()
    }

    fn notice(&mut self, line: &str) {
        if let Err(e) = write_line(&mut io::stdout().lock(), line) {
            warn!("Failed to write progress line: {e}");
        }
    }
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(out, "{line}")?;
    out.flush()
}

/// Collects everything in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Chunks in arrival order.
    pub chunks: Vec<String>,
    pub notices: Vec<String>,
    /// Chunks and notice lines interleaved as emitted.
    pub transcript: String,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated model output without progress lines.
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

impl OutputSink for MemorySink {
    fn write_chunk(&mut self, chunk: &str) -> io::Result<()> {
        self.chunks.push(chunk.to_string());
        self.transcript.push_str(chunk);
        Ok(())
    }

    fn notice(&mut self, line: &str) {
        self.notices.push(line.to_string());
        self.transcript.push_str(line);
        self.transcript.push('\n');
    }
}
