use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};

/// Size limit of the active log file before it is rolled over
pub const LOGS_MAX_SIZE: u64 = 5_000_000;

/// Number of rolled-over backups kept next to the active file
pub const LOGS_MAX_COUNT: usize = 9;

/// File writer that rolls over once the file reaches a size limit
///
/// On rollover `main.log` becomes `main.log.1`, `main.log.1` becomes
/// `main.log.2` and so on; the backup beyond `max_backups` is deleted. With
/// `max_backups == 0` the active file is simply truncated.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: Utf8PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Open (appending to) the log file at `path`
    pub fn open(path: impl AsRef<Utf8Path>, max_bytes: u64, max_backups: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            max_backups,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn backup_path(&self, index: usize) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}.{}", self.path, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_backups > 0 {
            let oldest = self.backup_path(self.max_backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.max_backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0
            && self.written > 0
            && self.written + buf.len() as u64 > self.max_bytes
        {
            self.rotate()?;
        }

        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
