use super::error::Result;
use super::log_registry::LogRegistry;
use super::severity::Severity;

/// A named entry point into a [`LogRegistry`].
///
/// Handles are cheap addressing tokens, not owners: the logger they point at
/// lives in the registry, and every handle for the same identity reaches the
/// same sinks and threshold. Obtained from [`LogRegistry::configure`].
#[derive(Debug, Clone)]
pub struct LoggerHandle<'registry> {
    registry: &'registry LogRegistry,
    name: String,
}

impl<'registry> LoggerHandle<'registry> {
    pub(crate) fn new(registry: &'registry LogRegistry, name: &str) -> Self {
        Self {
            registry,
            name: name.to_owned(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emits at the given severity with extra `field:value` pairs appended in
    /// the order supplied.
    ///
    /// # Errors
    /// Propagates the first sink write failure.
    pub fn log(&self, severity: Severity, message: &str, extra: &[(&str, &str)]) -> Result<()> {
        self.registry.emit(&self.name, severity, message, extra)
    }

    /// # Errors
    /// Propagates the first sink write failure.
    pub fn debug(&self, message: &str) -> Result<()> {
        self.log(Severity::Debug, message, &[])
    }

    /// # Errors
    /// Propagates the first sink write failure.
    pub fn info(&self, message: &str) -> Result<()> {
        self.log(Severity::Info, message, &[])
    }

    /// # Errors
    /// Propagates the first sink write failure.
    pub fn warning(&self, message: &str) -> Result<()> {
        self.log(Severity::Warning, message, &[])
    }

    /// # Errors
    /// Propagates the first sink write failure.
    pub fn error(&self, message: &str) -> Result<()> {
        self.log(Severity::Error, message, &[])
    }
}
