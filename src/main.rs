use clap::Parser;
use std::process::ExitCode;
use trierouter::cli::{run_cli, Cli};
use trierouter::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: {err:#}");
    }

    let mut stdout = std::io::stdout().lock();
    match run_cli(&cli, &config, &mut stdout) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
