use local_docker_sql::cli::commands::{CliArgs, Commands};
use local_docker_sql::cli::handlers::{handle_check, handle_render, handle_up};
use local_docker_sql::util::logging::{init_logging, parse_level, LoggingConfig};
use local_docker_sql::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("local-docker-sql v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Up(up_args) => handle_up(up_args),
        Commands::Render(render_args) => handle_render(render_args),
        Commands::Check(check_args) => handle_check(check_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
