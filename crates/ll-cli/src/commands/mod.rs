//! CLI subcommand implementations.

pub mod add;
pub mod analyze;
pub mod export;
pub mod init;
pub mod logs;
pub mod summary;
pub mod tags;
pub mod util;
