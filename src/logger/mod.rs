pub mod error;
pub mod log_line;
pub mod log_registry;
pub mod log_timestamp;
pub mod logger_config;
pub mod logger_handle;
pub mod rolling_file;
pub mod severity;
mod sink;

pub use error::Error;
pub use error::Result;
pub use log_line::LogLine;
pub use log_registry::LogRegistry;
pub use log_timestamp::LogTimestamp;
pub use logger_config::LoggerConfig;
pub use logger_handle::LoggerHandle;
pub use severity::Severity;
pub use sink::LOG_FILE_MAX_BACKUPS;
pub use sink::LOG_FILE_MAX_BYTES;
