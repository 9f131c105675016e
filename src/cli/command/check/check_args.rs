use crate::cli::global_args::GlobalArgs;
use crate::cli::to_args::ToArgs;
use crate::logger::LogLine;
use crate::logger::LogRegistry;
use crate::logger::LoggerConfig;
use crate::logger::Severity;
use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use clap::Args;
use eyre::WrapErr;
use itertools::Itertools;
use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

#[derive(Args, PartialEq, Debug)]
pub struct CheckArgs {
    /// Path to the log file to verify
    pub path: PathBuf,
}

impl CheckArgs {
    /// Verify that every line of a log file parses as a well-formed record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any line is malformed.
    pub fn invoke(self, registry: &LogRegistry, global_args: &GlobalArgs) -> eyre::Result<()> {
        let handle = registry.configure(
            "fleetlog.check",
            LoggerConfig {
                level: Some(global_args.log_level),
                propagate: true,
                ..LoggerConfig::default()
            },
        )?;

        let report = check_file(&self.path)?;

        let path_text = self.path.display().to_string();
        let total = report.total.to_string();
        let malformed = report.malformed.len().to_string();
        handle.log(
            Severity::Info,
            "check finished",
            &[
                ("path", path_text.as_str()),
                ("lines", total.as_str()),
                ("malformed", malformed.as_str()),
            ],
        )?;

        println!("{report}");
        if report.is_clean() {
            Ok(())
        } else {
            eyre::bail!(
                "{} of {} lines in {} are malformed",
                report.malformed.len(),
                report.total,
                self.path.display()
            )
        }
    }
}

impl ToArgs for CheckArgs {
    fn to_args(&self) -> Vec<std::ffi::OsString> {
        vec![self.path.clone().into()]
    }
}

impl<'a> Arbitrary<'a> for CheckArgs {
    // clap rejects an empty path value, so the generated path always carries
    // at least one character from a set that parses cleanly.
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        const PATH_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789/._";
        let mut path = String::new();
        for _ in 0..u.int_in_range(1..=16)? {
            path.push(char::from(*u.choose(PATH_CHARS)?));
        }
        Ok(Self {
            path: PathBuf::from(path),
        })
    }
}

/// Parse every line of the file at `path`, collecting failures by line number.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn check_file(path: &Path) -> eyre::Result<CheckReport> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read log file {}", path.display()))?;
    let mut report = CheckReport::default();
    for (index, line) in content.lines().enumerate() {
        report.total += 1;
        if let Err(error) = line.parse::<LogLine>() {
            report.malformed.push((index + 1, error.to_string()));
        }
    }
    Ok(report)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub total: usize,
    pub malformed: Vec<(usize, String)>,
}

impl CheckReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "checked {} lines, {} malformed",
            self.total,
            self.malformed.len()
        )?;
        if !self.malformed.is_empty() {
            let details = self
                .malformed
                .iter()
                .map(|(number, reason)| format!("line {number}: {reason}"))
                .join("\n");
            write!(f, "\n{details}")?;
        }
        Ok(())
    }
}
