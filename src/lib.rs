//! Library root for the `fleetlog` crate.
//!
//! Fleetlog gives every small tool in a fleet the same logging surface: a
//! process-wide registry of named loggers, an LTSV line format, console and
//! size-rotating file sinks, and the CLI flags that wire them up. The binary
//! is a thin `clap` front end over the same registry the library exposes.

pub mod cli;
pub mod logger;

/// Re-export the registry so callers can do `fleetlog::LogRegistry::global()`.
pub use crate::logger::LogRegistry;

/// Re-export the companion types most callers need alongside the registry.
pub use crate::logger::Error;
pub use crate::logger::LogLine;
pub use crate::logger::LoggerConfig;
pub use crate::logger::LoggerHandle;
pub use crate::logger::Result;
pub use crate::logger::Severity;
