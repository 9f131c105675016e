use super::error::Error;
use super::error::Result;
use super::rolling_file::RollingFile;
use super::severity::Severity;
use std::io;
use std::io::Write;
use std::path::Path;

/// Size threshold at which the fleet's file sinks rotate, in bytes.
pub const LOG_FILE_MAX_BYTES: u64 = 100_000;
/// Rotated generations retained per file sink before the oldest is discarded.
pub const LOG_FILE_MAX_BACKUPS: usize = 100;

/// One output attachment of a logger.
///
/// The level is fixed at attach time; a record reaches the target only when
/// its severity is at least this level.
#[derive(Debug)]
pub(crate) struct Sink {
    pub(crate) level: Severity,
    kind: SinkKind,
}

#[derive(Debug)]
enum SinkKind {
    Console,
    File(RollingFile),
}

impl Sink {
    pub(crate) fn console(level: Severity) -> Self {
        Self {
            level,
            kind: SinkKind::Console,
        }
    }

    /// Opens a rotating file sink at `path` under the fleet rotation policy.
    pub(crate) fn rolling_file(path: &Path, level: Severity) -> Result<Self> {
        let file = RollingFile::open(path, LOG_FILE_MAX_BYTES, LOG_FILE_MAX_BACKUPS).map_err(
            |source| Error::OpenSink {
                path: path.to_owned(),
                source,
            },
        )?;
        Ok(Self {
            level,
            kind: SinkKind::File(file),
        })
    }

    /// Writes one rendered record, terminating newline included.
    pub(crate) fn write(&mut self, record: &[u8]) -> Result<()> {
        match &mut self.kind {
            SinkKind::Console => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(record)
                    .and_then(|()| stdout.flush())
                    .map_err(|source| Error::WriteSink {
                        target: "console",
                        source,
                    })
            }
            SinkKind::File(file) => file
                .write_all(record)
                .and_then(|()| file.flush())
                .map_err(|source| Error::WriteSink {
                    target: "file",
                    source,
                }),
        }
    }
}
