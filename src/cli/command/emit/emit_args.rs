use crate::cli::command::emit::ExtraField;
use crate::cli::global_args::GlobalArgs;
use crate::cli::to_args::ToArgs;
use crate::logger::LogRegistry;
use crate::logger::LoggerConfig;
use crate::logger::Severity;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;

#[derive(Args, Arbitrary, PartialEq, Debug)]
pub struct EmitArgs {
    /// Message body of the record
    pub message: String,

    /// Severity to emit at
    #[arg(long, value_enum, default_value = "info")]
    pub severity: Severity,

    /// Logger identity to emit through; the root logger when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Extra fields appended to the record, in the order given
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<ExtraField>,
}

impl EmitArgs {
    /// Emit one record through the registry.
    ///
    /// A named emit registers the identity at the threshold from the global
    /// flags with propagation on, so the record also reaches the root sinks.
    ///
    /// # Errors
    ///
    /// Returns an error if logger configuration or a sink write fails.
    pub fn invoke(self, registry: &LogRegistry, global_args: &GlobalArgs) -> eyre::Result<()> {
        let handle = match &self.name {
            Some(name) => registry.configure(
                name,
                LoggerConfig {
                    level: Some(global_args.log_level),
                    propagate: true,
                    ..LoggerConfig::default()
                },
            )?,
            None => registry.configure("", LoggerConfig::default())?,
        };
        let extra = self
            .extra
            .iter()
            .map(|field| (field.key.as_str(), field.value.as_str()))
            .collect::<Vec<_>>();
        handle.log(self.severity, &self.message, &extra)?;
        Ok(())
    }
}

impl ToArgs for EmitArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![self.message.clone().into()];
        if self.severity != Severity::Info {
            args.push("--severity".into());
            args.push(self.severity.to_string().to_ascii_lowercase().into());
        }
        if let Some(name) = &self.name {
            args.push("--name".into());
            args.push(name.into());
        }
        for field in &self.extra {
            args.push("--extra".into());
            args.push(field.to_string().into());
        }
        args
    }
}
