use crate::cli::command::check::CheckArgs;
use crate::cli::command::emit::EmitArgs;
use crate::cli::global_args::GlobalArgs;
use crate::cli::to_args::ToArgs;
use crate::logger::LogRegistry;
use arbitrary::Arbitrary;
use clap::Subcommand;
use std::ffi::OsString;

/// Fleetlog commands
#[derive(Subcommand, Arbitrary, PartialEq, Debug)]
pub enum Command {
    /// Emit one structured record through the registry
    Emit(EmitArgs),
    /// Verify that a log file contains only well-formed records
    Check(CheckArgs),
}

impl Command {
    /// Invoke the command with global arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn invoke(self, registry: &LogRegistry, global_args: &GlobalArgs) -> eyre::Result<()> {
        match self {
            Command::Emit(args) => args.invoke(registry, global_args),
            Command::Check(args) => args.invoke(registry, global_args),
        }
    }
}

impl ToArgs for Command {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        match self {
            Command::Emit(emit_args) => {
                args.push("emit".into());
                args.extend(emit_args.to_args());
            }
            Command::Check(check_args) => {
                args.push("check".into());
                args.extend(check_args.to_args());
            }
        }
        args
    }
}
