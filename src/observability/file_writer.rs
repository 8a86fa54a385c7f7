//! Append-only line writer with size-based rotation.
//!
//! Backups are numbered: when `traces.json` would grow past the size limit it
//! becomes `traces.json.1`, the previous `.1` becomes `.2`, and so on. The
//! oldest backup beyond the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Size limit and backup retention for a rotating file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// The file is rotated before a write that would take it past this size.
    pub max_bytes: u64,
    /// Number of numbered backups kept; 0 discards the old file on rotation.
    pub backups: usize,
}

/// Thread-safe rotating line writer.
///
/// The file is opened lazily on the first write. Its size is read once on
/// open and tracked in memory afterwards.
pub struct FileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    handle: Mutex<Option<OpenFile>>,
}

struct OpenFile {
    file: File,
    len: u64,
}

impl OpenFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }
}

impl FileWriter {
    pub const fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            handle: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline, rotating first if needed.
    ///
    /// # Errors
    ///
    /// Fails if rotation, opening, or writing fails, or if the lock was
    /// poisoned by a panicking writer.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("writer lock poisoned: {e}")))?;

        let incoming = line.len() as u64 + 1;
        if handle.is_none() {
            *handle = Some(OpenFile::open(&self.path)?);
        }
        let current = handle.as_ref().map_or(0, |open| open.len);
        if current > 0 && current + incoming > self.policy.max_bytes {
            *handle = None;
            self.rotate()?;
            *handle = Some(OpenFile::open(&self.path)?);
        }

        let open = handle
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "trace file not open"))?;

        writeln!(open.file, "{line}")?;
        open.file.flush()?;
        open.len += incoming;
        Ok(())
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&self) -> io::Result<()> {
        if self.policy.backups == 0 {
            return remove_if_exists(&self.path);
        }

        remove_if_exists(&self.backup_path(self.policy.backups))?;
        for n in (1..self.policy.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(dir: &Path, max_bytes: u64, backups: usize) -> FileWriter {
        FileWriter::new(dir.join("traces.json"), RotationPolicy { max_bytes, backups })
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let w = writer(dir.path(), 1024, 2);

        w.write_line("a").unwrap();
        w.write_line("b").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("traces.json")).unwrap(), "a\nb\n");
    }

    #[test]
    fn rotates_into_numbered_backups() {
        let dir = tempfile::tempdir().unwrap();
        let w = writer(dir.path(), 6, 2);

        for line in ["one", "two", "three", "four"] {
            w.write_line(line).unwrap();
        }

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("traces.json"), "four\n");
        assert_eq!(read("traces.json.1"), "three\n");
        assert_eq!(read("traces.json.2"), "two\n");
        assert!(!dir.path().join("traces.json.3").exists());
    }

    #[test]
    fn existing_file_counts_toward_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("traces.json"), "left over\n").unwrap();
        let w = writer(dir.path(), 12, 1);

        w.write_line("new").unwrap();

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("traces.json"), "new\n");
        assert_eq!(read("traces.json.1"), "left over\n");
    }

    #[test]
    fn size_is_tracked_across_writes() {
        let dir = tempfile::tempdir().unwrap();
        let w = writer(dir.path(), 8, 1);

        w.write_line("abc").unwrap();
        w.write_line("def").unwrap();
        w.write_line("g").unwrap();

        let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("traces.json.1"), "abc\ndef\n");
        assert_eq!(read("traces.json"), "g\n");
    }

    #[test]
    fn zero_backups_discards_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let w = writer(dir.path(), 4, 0);

        w.write_line("first").unwrap();
        w.write_line("second").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("traces.json")).unwrap(), "second\n");
        assert!(!dir.path().join("traces.json.1").exists());
    }
}
