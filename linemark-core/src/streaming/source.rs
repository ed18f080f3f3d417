//! Pull-based line source over a buffered async reader
//!
//! Lines are only read when the consumer asks for the next one, so the
//! reader never holds more than one buffer of the file in memory and
//! never runs ahead of the line handler.

use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Why a line source stopped producing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEnd {
    /// The underlying stream reached end of file
    Exhausted,
    /// The consumer ended the source early
    Aborted,
    /// The underlying stream failed
    Failed,
}

/// Lazy sequence of text lines read from a byte stream
///
/// Lines are decoded as UTF-8 and split on `\n` or `\r\n`. A file that
/// ends with a newline does not produce an empty final line. Once the
/// source has ended, for whatever reason, [`next_line`](Self::next_line)
/// keeps returning `Ok(None)`.
#[derive(Debug)]
pub struct LineSource<R> {
    lines: Lines<R>,
    lines_read: u64,
    end: Option<SourceEnd>,
}

impl LineSource<BufReader<File>> {
    /// Open a file with a read buffer of `capacity` bytes
    pub async fn open(path: &Path, capacity: usize) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::with_capacity(capacity, file)))
    }
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    /// Wrap an already buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            lines_read: 0,
            end: None,
        }
    }

    /// Pull the next line
    ///
    /// Returns `Ok(None)` once the source has ended. An I/O or decoding
    /// failure is returned once; the source is ended afterwards.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.end.is_some() {
            return Ok(None);
        }

        match self.lines.next_line().await {
            Ok(Some(line)) => {
                self.lines_read += 1;
                Ok(Some(line))
            }
            Ok(None) => {
                self.end = Some(SourceEnd::Exhausted);
                Ok(None)
            }
            Err(e) => {
                self.end = Some(SourceEnd::Failed);
                Err(e)
            }
        }
    }

    /// End the source early; no further lines are produced
    pub fn end(&mut self) {
        if self.end.is_none() {
            self.end = Some(SourceEnd::Aborted);
        }
    }

    /// Whether the source has stopped producing lines
    pub fn is_ended(&self) -> bool {
        self.end.is_some()
    }

    /// Number of lines produced so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Consume the source and report why it stopped
    ///
    /// A source finished before it ended on its own counts as aborted.
    pub fn finish(self) -> SourceEnd {
        self.end.unwrap_or(SourceEnd::Aborted)
    }

    /// Drain the source and return the number of lines it holds
    pub async fn count(mut self) -> io::Result<u64> {
        while self.next_line().await?.is_some() {}
        Ok(self.lines_read)
    }
}
