// Command submodules are declared inside the `command` module directory.

pub mod global_args;
pub mod to_args;
mod command;

pub use command::Command;

use crate::cli::global_args::GlobalArgs;
use crate::logger::LogRegistry;
use arbitrary::Arbitrary;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use to_args::ToArgs;

#[derive(Parser, Arbitrary, PartialEq, Debug)]
#[clap(version)]
pub struct Cli {
    #[clap(flatten)]
    pub global_args: GlobalArgs,
    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Invoke the CLI with the parsed arguments.
    ///
    /// Configures the root logger from the global log flags, then runs the
    /// subcommand against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns an error if logger configuration or the command execution fails.
    pub fn invoke(self) -> eyre::Result<()> {
        let registry = LogRegistry::global();
        let root = registry.configure("", self.global_args.logger_config())?;
        root.debug(&self.display_invocation())?;
        self.command.invoke(registry, &self.global_args)
    }

    #[must_use]
    pub fn display_invocation(&self) -> String {
        let exe = Self::path_to_exe();
        let mut args = self.to_args();
        // Prepend the executable name
        args.insert(0, exe.file_name().unwrap_or(exe.as_os_str()).to_owned());
        args.iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn path_to_exe() -> PathBuf {
        std::env::current_exe().unwrap_or_else(|_| PathBuf::from("fleetlog"))
    }
}

impl ToArgs for Cli {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        args.extend(self.global_args.to_args());
        args.extend(self.command.to_args());
        args
    }
}
