mod emit_args;
mod extra_field;

pub use emit_args::EmitArgs;
pub use extra_field::ExtraField;
