use arbitrary::Arbitrary;
use clap::ValueEnum;
use strum::Display;
use strum::EnumString;

/// Record severity, ordered least to most severe.
///
/// Renders uppercase (`INFO`) in log lines and parses case-insensitively, so
/// the same value works for `--log-level info` and the `severity:INFO` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, ValueEnum, Arbitrary,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}
