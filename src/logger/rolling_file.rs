use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// Append-only file writer that rotates by size, keeping numbered backups.
///
/// A write that would push the active file past `max_bytes` rotates first:
/// existing backups shift up one number (`app.log.1` becomes `app.log.2` and
/// so on, the generation past `max_backups` is discarded) and the active file
/// is renamed to `app.log.1`. The active file therefore never exceeds
/// `max_bytes`, except when a single record is larger than the whole
/// threshold; such a record lands whole in a fresh file.
#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    file: File,
    len: u64,
    max_bytes: u64,
    max_backups: usize,
}

impl RollingFile {
    /// Opens `path` for appending, creating missing parent directories.
    /// Existing content counts toward the rotation threshold.
    ///
    /// # Errors
    /// Returns the underlying error when the parent directory or the file
    /// cannot be created, or the existing length cannot be queried.
    pub fn open(path: &Path, max_bytes: u64, max_backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = Self::open_append(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            path: path.to_owned(),
            file,
            len,
            max_bytes,
            max_backups,
        })
    }

    /// Bytes currently in the active file.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn open_append(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn needs_rotation(&self, incoming: usize) -> bool {
        self.len > 0 && self.len + incoming as u64 > self.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.max_backups == 0 {
            fs::remove_file(&self.path)?;
        } else {
            for index in (1..self.max_backups).rev() {
                let src = backup_path(&self.path, index);
                if src.exists() {
                    let dst = backup_path(&self.path, index + 1);
                    if dst.exists() {
                        fs::remove_file(&dst)?;
                    }
                    fs::rename(&src, &dst)?;
                }
            }
            let newest = backup_path(&self.path, 1);
            if newest.exists() {
                fs::remove_file(&newest)?;
            }
            fs::rename(&self.path, &newest)?;
        }
        self.file = Self::open_append(&self.path)?;
        self.len = 0;
        Ok(())
    }
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut backup = path.as_os_str().to_os_string();
    backup.push(format!(".{index}"));
    PathBuf::from(backup)
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.needs_rotation(buf.len()) {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.len += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
