use std::ffi::OsString;

/// Render a parsed argument structure back into command-line tokens.
///
/// Implementations are lossless with respect to parsing: feeding the output
/// back through the parser must reconstruct an equal value. Arguments that
/// match their defaults are omitted.
pub trait ToArgs {
    fn to_args(&self) -> Vec<OsString>;
}
