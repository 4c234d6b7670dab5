//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Real filesystem implementation.
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Destination for debug dump output, one line at a time.
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

/// Writes lines to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        // a closed pipe is not worth failing a dump over
        let _ = writeln!(out, "{}", line);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StringSink {
    pub lines: Vec<String>,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines joined with trailing newlines.
    pub fn contents(&self) -> String {
        self.lines.iter().map(|l| format!("{}\n", l)).collect()
    }
}

impl LineSink for StringSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
