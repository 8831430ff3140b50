use clap::Parser;
use tracing_subscriber::EnvFilter;

use ltrcheck::cli::{self, Commands};
use ltrcheck::commands;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    match args.command {
        Commands::Analyze {
            input_file,
            format,
            coarse_threshold,
            final_threshold,
            gap_open,
            gap_extend,
            output_file,
            json,
            debug,
        } => {
            init_logging(debug);
            commands::analyze::run(commands::analyze::AnalyzeOptions {
                input_file,
                format,
                coarse_threshold,
                final_threshold,
                gap_open,
                gap_extend,
                output_file,
                json,
            })
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ltrcheck=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
