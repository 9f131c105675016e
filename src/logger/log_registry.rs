use super::error::Error;
use super::error::Result;
use super::log_line::LogLine;
use super::log_timestamp::LogTimestamp;
use super::logger_config::LoggerConfig;
use super::logger_handle::LoggerHandle;
use super::severity::Severity;
use super::sink::Sink;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Threshold applied when neither a logger nor any ancestor carries a level.
pub const DEFAULT_THRESHOLD: Severity = Severity::Warning;

static GLOBAL_REGISTRY: LazyLock<LogRegistry> = LazyLock::new(LogRegistry::new);

/// Process-wide mapping from identity to logger state.
///
/// Entries are created lazily on first configuration and live for the process
/// lifetime; at most one logger exists per identity, and repeated
/// configuration mutates that one entry in place. Sinks accumulate across
/// calls, so configuring the same identity twice with a console sink leaves
/// two console sinks attached and every record is written twice.
///
/// Identities form a hierarchy through dot-separated segments: `svc.worker`
/// is a descendant of `svc`, and the empty identity (the root logger) is the
/// final ancestor of everything. A logger whose propagation flag is set
/// offers each emitted record to its ancestors' sinks as well.
///
/// One mutex guards lookup, creation, and sink writes. Instances are plain
/// values, so tests inject their own; [`LogRegistry::global`] is the shared
/// instance the binary uses.
#[derive(Debug)]
pub struct LogRegistry {
    loggers: Mutex<HashMap<String, LoggerState>>,
}

#[derive(Debug, Default)]
struct LoggerState {
    level: Option<Severity>,
    sinks: Vec<Sink>,
    propagate: bool,
}

impl LogRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
        }
    }

    /// The registry shared by every caller in this process.
    #[must_use]
    pub fn global() -> &'static LogRegistry {
        &GLOBAL_REGISTRY
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, LoggerState>> {
        // Logging must keep working even if a panicking thread held the lock.
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves or creates the logger named `name` and applies `config`.
    ///
    /// When `config.level` is present the call sets the logger's threshold,
    /// attaches the requested sinks at that level, and sets the propagation
    /// flag. A level-less, sink-less call is a pure lookup and alters
    /// nothing. Either way the returned handle addresses the single logger
    /// registered under `name`.
    ///
    /// # Errors
    /// [`Error::MissingLevel`] when a sink is requested without a level, and
    /// [`Error::OpenSink`] when the file sink cannot be opened. Both leave
    /// the registry untouched.
    pub fn configure(&self, name: &str, config: LoggerConfig) -> Result<LoggerHandle<'_>> {
        if config.level.is_none() && config.wants_sink() {
            return Err(Error::MissingLevel {
                name: name.to_owned(),
            });
        }
        let mut loggers = self.lock();
        if let Some(level) = config.level {
            // Open the file sink first so a failed open leaves no trace.
            let file_sink = match config.file_path() {
                Some(path) => Some(Sink::rolling_file(path, level)?),
                None => None,
            };
            let state = loggers.entry(name.to_owned()).or_default();
            state.level = Some(level);
            if config.stdout {
                state.sinks.push(Sink::console(level));
            }
            if let Some(sink) = file_sink {
                state.sinks.push(sink);
            }
            state.propagate = config.propagate;
        } else {
            loggers.entry(name.to_owned()).or_default();
        }
        Ok(LoggerHandle::new(self, name))
    }

    /// Emits one record through the logger named `name`, synchronously.
    ///
    /// The record is dropped unless `severity` reaches the logger's effective
    /// threshold. It is then written to every attached sink whose own level
    /// it reaches, and, while the visited logger's propagation flag is set,
    /// offered to the nearest registered ancestor the same way (subject to
    /// that ancestor's effective threshold). The rendered line always carries
    /// the originating identity.
    ///
    /// # Errors
    /// [`Error::WriteSink`] from the first sink that fails to take the
    /// record; later sinks are skipped.
    pub fn emit(
        &self,
        name: &str,
        severity: Severity,
        message: &str,
        extra: &[(&str, &str)],
    ) -> Result<()> {
        let mut loggers = self.lock();
        if severity < effective_threshold(&loggers, name) {
            return Ok(());
        }

        let line = LogLine {
            time: LogTimestamp::now(),
            name: display_name(name).to_owned(),
            severity,
            message: message.to_owned(),
            extra: extra
                .iter()
                .map(|(field, value)| ((*field).to_owned(), (*value).to_owned()))
                .collect(),
        };
        let mut record = line.to_string().into_bytes();
        record.push(b'\n');

        // Delivery plan: the emitter, then ancestors while propagation stays
        // on. Prefix-derived ancestry keeps the walk finite and loop-free.
        let mut targets = vec![name.to_owned()];
        let mut current = name;
        while propagates(&loggers, current) {
            let Some(parent) = registered_parent(&loggers, current) else {
                break;
            };
            if severity >= effective_threshold(&loggers, parent) {
                targets.push(parent.to_owned());
            }
            current = parent;
        }

        for target in &targets {
            if let Some(state) = loggers.get_mut(target.as_str()) {
                for sink in &mut state.sinks {
                    if severity >= sink.level {
                        sink.write(&record)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Forgets every configured logger. Meant for test isolation of the
    /// process-wide registry.
    pub fn reset(&self) {
        self.lock().clear();
    }

    #[cfg(test)]
    pub(crate) fn sink_count(&self, name: &str) -> usize {
        self.lock().get(name).map_or(0, |state| state.sinks.len())
    }

    #[cfg(test)]
    pub(crate) fn threshold(&self, name: &str) -> Severity {
        effective_threshold(&self.lock(), name)
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The root logger renders as `root`; every other identity as itself.
fn display_name(name: &str) -> &str {
    if name.is_empty() { "root" } else { name }
}

/// A logger's own level, else the nearest dotted-prefix ancestor's, else the
/// fleet default.
fn effective_threshold(loggers: &HashMap<String, LoggerState>, name: &str) -> Severity {
    let mut current = name;
    loop {
        if let Some(level) = loggers.get(current).and_then(|state| state.level) {
            return level;
        }
        if current.is_empty() {
            return DEFAULT_THRESHOLD;
        }
        current = parent_prefix(current);
    }
}

fn propagates(loggers: &HashMap<String, LoggerState>, name: &str) -> bool {
    loggers.get(name).is_some_and(|state| state.propagate)
}

/// Nearest registered ancestor of `name`. Unregistered dotted prefixes are
/// placeholders, not blockers, and are skipped; the root logger is the final
/// ancestor of every identity.
fn registered_parent<'a>(loggers: &HashMap<String, LoggerState>, name: &'a str) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    let mut candidate = name;
    while let Some(dot) = candidate.rfind('.') {
        candidate = &candidate[..dot];
        if loggers.contains_key(candidate) {
            return Some(candidate);
        }
    }
    Some("")
}

fn parent_prefix(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LOG_FILE_MAX_BYTES;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn file_config(path: &Path, level: Severity) -> LoggerConfig {
        LoggerConfig {
            level: Some(level),
            filepath: Some(path.to_owned()),
            ..LoggerConfig::default()
        }
    }

    #[test]
    fn repeated_configure_addresses_the_same_logger() -> eyre::Result<()> {
        let registry = LogRegistry::new();
        registry.configure(
            "x",
            LoggerConfig {
                level: Some(Severity::Info),
                stdout: true,
                ..LoggerConfig::default()
            },
        )?;
        registry.configure(
            "x",
            LoggerConfig {
                level: Some(Severity::Debug),
                stdout: true,
                ..LoggerConfig::default()
            },
        )?;

        // One entry, both sinks on it, threshold from the latest call.
        assert_eq!(registry.sink_count("x"), 2);
        assert_eq!(registry.threshold("x"), Severity::Debug);
        Ok(())
    }

    #[test]
    fn rejects_sinks_without_a_level() {
        let registry = LogRegistry::new();
        let err = registry
            .configure(
                "x",
                LoggerConfig {
                    stdout: true,
                    ..LoggerConfig::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::MissingLevel { ref name } if name == "x"));

        let err = registry
            .configure(
                "x",
                LoggerConfig {
                    filepath: Some("x.log".into()),
                    ..LoggerConfig::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::MissingLevel { .. }));

        // The failed calls registered nothing.
        assert_eq!(registry.sink_count("x"), 0);
    }

    #[test]
    fn lookup_without_level_or_sinks_succeeds() -> eyre::Result<()> {
        let registry = LogRegistry::new();
        let handle = registry.configure("plain", LoggerConfig::default())?;
        assert_eq!(handle.name(), "plain");
        assert_eq!(registry.sink_count("plain"), 0);
        assert_eq!(registry.threshold("plain"), DEFAULT_THRESHOLD);
        Ok(())
    }

    #[test]
    fn filters_records_below_the_threshold() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("gate.log");
        let registry = LogRegistry::new();
        let handle = registry.configure("gate", file_config(&path, Severity::Warning))?;

        handle.info("below threshold")?;
        assert_eq!(fs::read_to_string(&path)?, "");

        handle.warning("at threshold")?;
        handle.error("above threshold")?;
        assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn emitted_records_roundtrip_through_the_line_format() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("app.log");
        let registry = LogRegistry::new();
        let handle = registry.configure("app", file_config(&path, Severity::Debug))?;

        handle.log(Severity::Info, "hello", &[("request", "r-1")])?;

        let content = fs::read_to_string(&path)?;
        let line: LogLine = content.trim_end().parse()?;
        assert_eq!(line.name, "app");
        assert_eq!(line.severity, Severity::Info);
        assert_eq!(line.message, "hello");
        assert_eq!(line.extra, vec![("request".to_owned(), "r-1".to_owned())]);
        Ok(())
    }

    #[test]
    fn root_logger_renders_as_root() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("root.log");
        let registry = LogRegistry::new();
        let root = registry.configure("", file_config(&path, Severity::Debug))?;

        root.warning("low disk")?;
        assert!(fs::read_to_string(&path)?.contains("\tname:root\t"));
        Ok(())
    }

    #[test]
    fn accumulated_duplicate_sinks_write_twice() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("dup.log");
        let registry = LogRegistry::new();
        registry.configure("dup", file_config(&path, Severity::Info))?;
        let handle = registry.configure("dup", file_config(&path, Severity::Info))?;
        assert_eq!(registry.sink_count("dup"), 2);

        handle.info("once in, twice out")?;
        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn propagates_to_ancestor_sinks_exactly_once() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let root_log = dir.path().join("root.log");
        let worker_log = dir.path().join("worker.log");
        let registry = LogRegistry::new();
        registry.configure("", file_config(&root_log, Severity::Info))?;
        let worker = registry.configure(
            "svc.worker",
            LoggerConfig {
                propagate: true,
                ..file_config(&worker_log, Severity::Debug)
            },
        )?;

        worker.info("queue drained")?;

        let worker_content = fs::read_to_string(&worker_log)?;
        let root_content = fs::read_to_string(&root_log)?;
        assert_eq!(worker_content.lines().count(), 1);
        assert_eq!(root_content.lines().count(), 1);
        // Propagated records keep the originating identity.
        assert!(root_content.contains("\tname:svc.worker\t"));
        Ok(())
    }

    #[test]
    fn propagation_stops_at_a_non_propagating_ancestor() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let root_log = dir.path().join("root.log");
        let mid_log = dir.path().join("mid.log");
        let registry = LogRegistry::new();
        registry.configure("", file_config(&root_log, Severity::Debug))?;
        registry.configure("a", file_config(&mid_log, Severity::Debug))?;
        let leaf = registry.configure(
            "a.b",
            LoggerConfig {
                level: Some(Severity::Debug),
                propagate: true,
                ..LoggerConfig::default()
            },
        )?;

        leaf.warning("capped")?;

        assert_eq!(fs::read_to_string(&mid_log)?.lines().count(), 1);
        assert_eq!(fs::read_to_string(&root_log)?, "");
        Ok(())
    }

    #[test]
    fn propagation_skips_unregistered_intermediate_identities() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let root_log = dir.path().join("root.log");
        let registry = LogRegistry::new();
        registry.configure("", file_config(&root_log, Severity::Info))?;
        let leaf = registry.configure(
            "x.y.z",
            LoggerConfig {
                level: Some(Severity::Info),
                propagate: true,
                ..LoggerConfig::default()
            },
        )?;

        leaf.info("made it")?;

        let content = fs::read_to_string(&root_log)?;
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("\tname:x.y.z\t"));
        Ok(())
    }

    #[test]
    fn ancestor_thresholds_filter_propagated_records() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let root_log = dir.path().join("root.log");
        let app_log = dir.path().join("app.log");
        let registry = LogRegistry::new();
        registry.configure("", file_config(&root_log, Severity::Error))?;
        let app = registry.configure(
            "app",
            LoggerConfig {
                propagate: true,
                ..file_config(&app_log, Severity::Debug)
            },
        )?;

        app.info("routine")?;
        assert_eq!(fs::read_to_string(&app_log)?.lines().count(), 1);
        assert_eq!(fs::read_to_string(&root_log)?, "");

        app.error("on fire")?;
        assert_eq!(fs::read_to_string(&app_log)?.lines().count(), 2);
        assert_eq!(fs::read_to_string(&root_log)?.lines().count(), 1);
        Ok(())
    }

    #[test]
    fn derives_thresholds_from_the_nearest_ancestor() -> eyre::Result<()> {
        let registry = LogRegistry::new();
        registry.configure(
            "app",
            LoggerConfig {
                level: Some(Severity::Error),
                ..LoggerConfig::default()
            },
        )?;

        assert_eq!(registry.threshold("app.db"), Severity::Error);
        assert_eq!(registry.threshold("other"), DEFAULT_THRESHOLD);

        registry.configure(
            "",
            LoggerConfig {
                level: Some(Severity::Debug),
                ..LoggerConfig::default()
            },
        )?;
        assert_eq!(registry.threshold("other"), Severity::Debug);
        Ok(())
    }

    #[test]
    fn reset_forgets_every_logger() -> eyre::Result<()> {
        let registry = LogRegistry::new();
        registry.configure(
            "x",
            LoggerConfig {
                level: Some(Severity::Info),
                stdout: true,
                ..LoggerConfig::default()
            },
        )?;
        assert_eq!(registry.sink_count("x"), 1);

        registry.reset();
        assert_eq!(registry.sink_count("x"), 0);
        assert_eq!(registry.threshold("x"), DEFAULT_THRESHOLD);
        Ok(())
    }

    #[test]
    fn failed_sink_open_leaves_no_partial_state() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory")?;
        let registry = LogRegistry::new();

        let err = registry
            .configure("io", file_config(&blocker.join("io.log"), Severity::Info))
            .unwrap_err();
        assert!(matches!(err, Error::OpenSink { .. }));
        assert_eq!(registry.sink_count("io"), 0);
        assert_eq!(registry.threshold("io"), DEFAULT_THRESHOLD);
        Ok(())
    }

    #[test]
    fn failed_sink_writes_surface_to_the_emitter() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let sunk = dir.path().join("sunk");
        let path = sunk.join("io.log");
        let registry = LogRegistry::new();
        let handle = registry.configure("io", file_config(&path, Severity::Debug))?;
        handle.info("still healthy")?;

        // Pull the directory out from under the sink; the rotation forced by
        // the oversized record has nowhere to rename the active file.
        fs::remove_file(&path)?;
        fs::remove_dir(&sunk)?;
        let oversized = "x".repeat(usize::try_from(LOG_FILE_MAX_BYTES)? + 1);

        let err = handle.info(&oversized).unwrap_err();
        assert!(matches!(err, Error::WriteSink { target: "file", .. }));
        Ok(())
    }

    #[test]
    fn emit_on_an_unconfigured_identity_is_a_noop() -> eyre::Result<()> {
        let registry = LogRegistry::new();
        registry.emit("ghost", Severity::Error, "nobody listening", &[])?;
        Ok(())
    }

    #[test]
    fn concurrent_emits_all_land_intact() -> eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("pool.log");
        let registry = LogRegistry::new();
        registry.configure("pool", file_config(&path, Severity::Debug))?;

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let registry = &registry;
                scope.spawn(move || {
                    let handle = registry.configure("pool", LoggerConfig::default()).unwrap();
                    for record in 0..25 {
                        handle
                            .info(&format!("worker {worker} record {record}"))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(fs::read_to_string(&path)?.lines().count(), 100);
        Ok(())
    }
}
