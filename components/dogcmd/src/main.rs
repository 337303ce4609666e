//! `dogcmd` command line entrypoint.

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Main entrypoint simply delegates control to CLI layer.
    // Commands run one after another on this single thread.
    match dogcmd::cli::cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dogcmd: {err:#}");
            ExitCode::FAILURE
        }
    }
}
