pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CheckArgs, CliArgs, Commands, RenderArgs, SourceArgs, UpArgs};
pub use output::{OutputFormat, OutputFormatter};
