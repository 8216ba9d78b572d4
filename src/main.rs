use upg::cli::commands::{CliArgs, Commands};
use upg::cli::handlers::{handle_enrich, handle_generate, handle_infer, handle_sweep};
use upg::util::{init_from_env, init_logging, parse_level, LoggingConfig};
use upg::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("upg v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, args.quiet).await,
        Commands::Infer(infer_args) => handle_infer(infer_args).await,
        Commands::Enrich(enrich_args) => handle_enrich(enrich_args, args.quiet).await,
        Commands::Sweep(sweep_args) => handle_sweep(sweep_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str).unwrap_or_else(|| {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        })
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        init_from_env();
        return;
    };

    init_logging(LoggingConfig::with_level(level));
}
