#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    prizenation_cli::main_entry()
}
