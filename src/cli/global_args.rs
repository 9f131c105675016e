use crate::cli::to_args::ToArgs;
use crate::logger::LoggerConfig;
use crate::logger::Severity;
use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use clap::Args;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

/// Default file sink location shared by every tool in the fleet.
pub const DEFAULT_LOG_FILEPATH: &str = "/var/log/fleetlog/fleetlog.log";

#[derive(Args, PartialEq, Debug)]
pub struct GlobalArgs {
    /// Severity below which records are dropped
    #[clap(long, global = true, value_enum, default_value = "warning")]
    pub log_level: Severity,

    /// Disable log output for stdout
    #[clap(long, global = true)]
    pub log_no_stdout: bool,

    /// Disable log output for file
    #[clap(long, global = true)]
    pub log_no_file: bool,

    /// Set log file path
    #[clap(long, global = true, value_name = "FILE", default_value = DEFAULT_LOG_FILEPATH)]
    pub log_filepath: PathBuf,
}

impl GlobalArgs {
    /// Translate the four log flags into a root logger configuration.
    #[must_use]
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: Some(self.log_level),
            stdout: !self.log_no_stdout,
            filepath: (!self.log_no_file).then(|| self.log_filepath.clone()),
            propagate: false,
        }
    }
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            log_level: Severity::Warning,
            log_no_stdout: false,
            log_no_file: false,
            log_filepath: PathBuf::from(DEFAULT_LOG_FILEPATH),
        }
    }
}

impl ToArgs for GlobalArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if self.log_level != Severity::Warning {
            args.push("--log-level".into());
            args.push(self.log_level.to_string().to_ascii_lowercase().into());
        }
        if self.log_no_stdout {
            args.push("--log-no-stdout".into());
        }
        if self.log_no_file {
            args.push("--log-no-file".into());
        }
        if self.log_filepath != Path::new(DEFAULT_LOG_FILEPATH) {
            args.push("--log-filepath".into());
            args.push(self.log_filepath.clone().into());
        }
        args
    }
}

impl<'a> Arbitrary<'a> for GlobalArgs {
    // clap's `PathBuf` parser rejects empty values, so the generated path
    // always carries at least one character from a set that parses cleanly.
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        const PATH_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789/._";
        let mut filepath = String::new();
        for _ in 0..u.int_in_range(1..=16)? {
            filepath.push(char::from(*u.choose(PATH_CHARS)?));
        }
        Ok(Self {
            log_level: Severity::arbitrary(u)?,
            log_no_stdout: bool::arbitrary(u)?,
            log_no_file: bool::arbitrary(u)?,
            log_filepath: PathBuf::from(filepath),
        })
    }
}
