//! tasktree - render task records as aligned terminal trees

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tasktree_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
