//! knitshape - knitting shaping from measurements and gauge

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = knitshape::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
