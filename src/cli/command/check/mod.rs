mod check_args;

pub use check_args::CheckArgs;
