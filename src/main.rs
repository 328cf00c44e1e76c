//! Binary entrypoint for the `modplan` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match modplan::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
