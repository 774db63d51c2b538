use clap::Parser;
use gridkit::cli::{self, Cli};
use gridkit::{init_logging_with, LogFormat};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging_with(format)?;

    cli::run(cli)
}
