//! Binary entrypoint for the filestate resource handler.

use std::io;
use std::process::ExitCode;

use filestate_config::ProcessEnv;

fn main() -> ExitCode {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    filestate::run(
        std::env::args_os(),
        &ProcessEnv,
        &mut stdin,
        &mut stdout,
        &mut stderr,
    )
}
