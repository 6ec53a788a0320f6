//! Destinations for rendered rows

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// An append-only destination for rendered rows
pub trait RowSink {
    /// Appends one row. The sink terminates it with a line break.
    ///
    /// # Errors
    /// Returns `Err` if the row cannot be written; rows appended earlier are kept.
    fn append_row(&mut self, row: &str) -> Result<(), SinkError>;
}

impl RowSink for Vec<String> {
    fn append_row(&mut self, row: &str) -> Result<(), SinkError> {
        self.push(row.to_owned());
        Ok(())
    }
}

/// A file that rows are appended to
///
/// Sinks must not be shared between concurrent renders: appends from different renders would
/// interleave.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates `dir` if needed and empties (or creates) `dir/file`, so that a render always starts
    /// from a blank output file.
    ///
    /// # Errors
    /// Returns `Err` if the directory cannot be created or the file cannot be truncated.
    pub fn create(dir: impl AsRef<Path>, file: impl AsRef<Path>) -> Result<Self, SinkError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| SinkError::CreateDir {
            path: dir.to_owned(),
            source,
        })?;
        let path = dir.join(file);
        File::create(&path).map_err(|source| SinkError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("truncated output file {}", path.display());
        Ok(Self { path })
    }

    /// The file rows are written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, row: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        writeln!(file, "{row}")
    }
}

impl RowSink for FileSink {
    fn append_row(&mut self, row: &str) -> Result<(), SinkError> {
        self.append(row).map_err(|source| SinkError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// An error in writing rendered output
#[derive(Debug, Error)]
pub enum SinkError {
    /// The output directory cannot be created.
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir {
        /// The directory
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
    /// The output file cannot be opened or written.
    #[error("cannot write to {}: {source}", .path.display())]
    Write {
        /// The output file
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::{FileSink, RowSink, SinkError};

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::create(dir.path().join("outputs"), "banner.txt").unwrap();
        sink.append_row("first").unwrap();
        sink.append_row("").unwrap();
        sink.append_row("third").unwrap();
        let written = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(written, "first\n\nthird\n");
    }

    #[test]
    fn create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("banner.txt"), "stale\n").unwrap();
        let mut sink = FileSink::create(dir.path(), "banner.txt").unwrap();
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "");
        sink.append_row("fresh").unwrap();
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "fresh\n");
    }

    #[test]
    fn directory_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("outputs");
        fs::write(&blocker, "").unwrap();
        let error = FileSink::create(&blocker, "banner.txt").unwrap_err();
        assert!(matches!(error, SinkError::CreateDir { ref path, .. } if *path == blocker));
    }

    #[test]
    fn memory_sink() {
        let mut rows: Vec<String> = Vec::new();
        rows.append_row("a").unwrap();
        rows.append_row("b").unwrap();
        assert_eq!(rows, ["a", "b"]);
    }
}
