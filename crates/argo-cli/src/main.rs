//! `argo` binary entrypoint.

use std::io;
use std::process::ExitCode;

use argo_cli::{App, CliError};

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout();
    match runtime.block_on(App::new().run(std::env::args_os(), &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        // Help and version requests land here too; clap picks the exit code.
        Err(CliError::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
