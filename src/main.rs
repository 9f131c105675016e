//! CLI entrypoint for the `fleetlog` binary.
//! - Installs color-eyre for better error reports
//! - Parses CLI via `clap` using the `Cli` type from `crate::cli`
//! - Invokes the selected command
use clap::CommandFactory;
use clap::FromArgMatches;
use eyre::Result;
use fleetlog::cli::Cli;

/// Entrypoint for the program to reduce coupling to the name of this crate.
///
/// # Errors
///
/// Returns an error if CLI parsing or command execution fails.
fn main() -> Result<()> {
    // Install error/reporting hooks
    color_eyre::install()?;

    // Build clap command and parse args into our `Cli` type
    let clap_cmd = Cli::command();
    let cli = Cli::from_arg_matches(&clap_cmd.get_matches())?;

    // Invoke the requested command
    cli.invoke()?;

    Ok(())
}
