use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the registry and its sinks.
///
/// Configuration problems and sink I/O are kept distinguishable so callers can
/// decide whether to abort startup or handle a failing log target.
#[derive(Debug, Error)]
pub enum Error {
    /// A sink was requested without a severity level.
    #[error("logger {name:?} requests a sink but carries no level; set a log level when attaching sinks")]
    MissingLevel { name: String },

    /// The durable sink could not be opened at configure time.
    #[error("failed to open log file {}", path.display())]
    OpenSink { path: PathBuf, source: io::Error },

    /// A sink write failed while emitting a record.
    #[error("failed to write log record to {target} sink")]
    WriteSink {
        target: &'static str,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
