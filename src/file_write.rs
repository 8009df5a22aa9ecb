//! Unbuffered vs buffered file output.
//!
//! The same fixed line is written `lines` times, once with a syscall per line straight
//! on the [`File`] and once through a [`BufWriter`].

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::info;

use crate::{
    clock::measure,
    config::FILE_LINE,
    error::{BenchError, Result},
    result::{Metric, RunResult},
};

pub struct FileWriteBenchmark {
    dir: PathBuf,
    lines: usize,
}

impl FileWriteBenchmark {
    pub const LABEL: &'static str = "file write";

    pub fn new(dir: impl Into<PathBuf>, lines: usize) -> Self {
        Self {
            dir: dir.into(),
            lines,
        }
    }

    pub fn unbuffered_path(&self) -> PathBuf {
        self.dir.join("unbuffered.txt")
    }

    pub fn buffered_path(&self) -> PathBuf {
        self.dir.join("buffered.txt")
    }

    pub fn run(&self) -> Result<RunResult> {
        info!(lines = self.lines, dir = %self.dir.display(), "{} started", Self::LABEL);
        fs::create_dir_all(&self.dir).map_err(BenchError::io(&self.dir))?;

        let (unbuffered, elapsed_unbuffered) = measure(|| self.write_unbuffered());
        unbuffered?;
        let (buffered, elapsed_buffered) = measure(|| self.write_buffered());
        buffered?;
        info!(
            ?elapsed_unbuffered,
            ?elapsed_buffered,
            "{} finished",
            Self::LABEL
        );

        Ok(RunResult::new(Self::LABEL, elapsed_unbuffered + elapsed_buffered)
            .with("unbuffered", Metric::Duration(elapsed_unbuffered))
            .with("buffered", Metric::Duration(elapsed_buffered))
            .with("lines", Metric::Count(self.lines)))
    }

    fn write_unbuffered(&self) -> Result<()> {
        let path = self.unbuffered_path();
        let mut file = File::create(&path).map_err(BenchError::io(&path))?;
        for _ in 0..self.lines {
            file.write_all(FILE_LINE).map_err(BenchError::io(&path))?;
        }
        Ok(())
    }

    fn write_buffered(&self) -> Result<()> {
        let path = self.buffered_path();
        let file = File::create(&path).map_err(BenchError::io(&path))?;
        let mut writer = BufWriter::new(file);
        for _ in 0..self.lines {
            writer.write_all(FILE_LINE).map_err(BenchError::io(&path))?;
        }
        writer.flush().map_err(BenchError::io(&path))
    }

    /// Removes both output files and the directory if it ended up empty.
    pub fn cleanup(&self) -> Result<()> {
        for path in [self.unbuffered_path(), self.buffered_path()] {
            remove_if_present(&path)?;
        }
        // a non-empty directory belongs to somebody else
        let _ = fs::remove_dir(&self.dir);
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(BenchError::io(path)(e)),
        _ => Ok(()),
    }
}

/// Time saved by buffering, zero if buffering was slower.
pub fn buffering_gain(result: &RunResult) -> Duration {
    match (result.duration("unbuffered"), result.duration("buffered")) {
        (Some(u), Some(b)) => u.saturating_sub(b),
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
mod file_write_test {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("syncbench-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_both_files_hold_every_line() {
        let bench = FileWriteBenchmark::new(scratch("lines"), 1_000);
        let result = bench.run().unwrap();
        for path in [bench.unbuffered_path(), bench.buffered_path()] {
            let content = fs::read(&path).unwrap();
            assert_eq!(content.len(), 1_000 * FILE_LINE.len());
            assert_eq!(content.split(|b| *b == b'\n').count() - 1, 1_000);
        }
        assert_eq!(result.count("lines"), Some(1_000));
        let total = result.duration("unbuffered").unwrap() + result.duration("buffered").unwrap();
        assert_eq!(result.elapsed(), total);
        bench.cleanup().unwrap();
        assert!(!bench.unbuffered_path().exists());
    }

    #[test]
    fn test_cleanup_without_run() {
        FileWriteBenchmark::new(scratch("empty"), 1).cleanup().unwrap();
    }

    #[test]
    fn test_unwritable_dir_is_fatal() {
        let blocker = scratch("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let err = FileWriteBenchmark::new(blocker.join("sub"), 1).run().unwrap_err();
        fs::remove_file(&blocker).unwrap();
        assert!(matches!(err, BenchError::Io { .. }));
    }

    #[test]
    fn test_gain() {
        let result = RunResult::new("w", Duration::ZERO)
            .with("unbuffered", Metric::Duration(Duration::from_millis(9)))
            .with("buffered", Metric::Duration(Duration::from_millis(2)));
        assert_eq!(buffering_gain(&result), Duration::from_millis(7));
    }
}
