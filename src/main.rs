use clap::Parser;
use dualmomentum::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    dualmomentum::logging::init_logging(cli.log_level.as_deref());
    run(cli)
}
