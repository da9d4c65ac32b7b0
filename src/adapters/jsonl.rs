//! JSON Lines Adapter
//!
//! Bars in, signals out, one JSON object per line:
//!
//! ```text
//! {"timestamp":"2024-01-02T15:00:00Z","price":471.5,"volume":120000.0}
//! ```
//!
//! Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

use crate::domain::bar::Bar;
use crate::domain::signal::SignalOutput;
use crate::ports::bar_feed::{BarFeed, FeedError};

/// Bar feed reading JSON lines from any buffered reader
pub struct JsonLinesBarFeed<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl JsonLinesBarFeed<BufReader<File>> {
    /// Open a bar file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesBarFeed<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> BarFeed for JsonLinesBarFeed<R> {
    fn next_bar(&mut self) -> Option<Result<Bar, FeedError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(serde_json::from_str::<Bar>(trimmed).map_err(|e| FeedError::Parse {
                line: self.line_no,
                message: e.to_string(),
            }));
        }
    }
}

/// Write outputs as JSON lines
pub fn write_signals<'a, W, I>(writer: &mut W, outputs: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a SignalOutput>,
{
    for output in outputs {
        serde_json::to_writer(&mut *writer, output)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
