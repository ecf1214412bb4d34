use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Local SQL Server container provisioning for development hosts
#[derive(Parser, Debug)]
#[command(
    name = "local-docker-sql",
    about = "Provision a local SQL Server container and print its connection settings",
    version,
    long_about = "local-docker-sql reads Use_Local_Docker_SQL and the Local_Docker_* settings from \
                  the environment or a launch profile, brings up a SQL Server container with \
                  docker compose, and prints the connection string the host should use."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Provision the database and print its connection settings",
        long_about = "Validates settings, checks the container runtime, writes \
                      .docker/docker-compose.yml under the project root and runs compose up.\n\n\
                      Examples:\n  \
                      local-docker-sql up\n  \
                      local-docker-sql up --launch-profile Properties/launchSettings.json\n  \
                      local-docker-sql up --format env"
    )]
    Up(UpArgs),

    #[command(
        about = "Write the compose descriptor without starting anything",
        long_about = "Validates settings and writes .docker/docker-compose.yml, then prints it.\n\n\
                      Examples:\n  \
                      local-docker-sql render\n  \
                      local-docker-sql render --launch-profile Properties/launchSettings.json --profile Site"
    )]
    Render(RenderArgs),

    #[command(about = "Check that the container runtime is installed and running")]
    Check(CheckArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SourceArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Launch settings JSON to read settings from (environment variables fill the gaps)"
    )]
    pub launch_profile: Option<PathBuf>,

    #[arg(
        long,
        value_name = "NAME",
        requires = "launch_profile",
        help = "Profile inside the launch settings (defaults to the one enabling local SQL)"
    )]
    pub profile: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct UpArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "BIN",
        default_value = "docker",
        help = "Container runtime binary"
    )]
    pub runtime: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(
        long,
        value_name = "BIN",
        default_value = "docker",
        help = "Container runtime binary"
    )]
    pub runtime: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
    Env,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => super::output::OutputFormat::Human,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Env => super::output::OutputFormat::Env,
        }
    }
}
