use super::severity::Severity;
use std::path::Path;
use std::path::PathBuf;

/// Inputs of one configuration call against the registry.
///
/// The default value requests nothing and performs a pure lookup of the named
/// logger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Severity threshold to set. Required whenever a sink is requested.
    pub level: Option<Severity>,
    /// Attach a console sink writing to stdout.
    pub stdout: bool,
    /// Attach a rotating file sink writing to this path.
    pub filepath: Option<PathBuf>,
    /// Offer emitted records to ancestor loggers' sinks.
    pub propagate: bool,
}

impl LoggerConfig {
    /// File sink path, treating an empty path as no file sink at all.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.filepath
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Whether this call asks for any sink to be attached.
    #[must_use]
    pub fn wants_sink(&self) -> bool {
        self.stdout || self.file_path().is_some()
    }
}
