//! spritecut - Command-line tool for turning sprite sheets into animation descriptors

use std::process::ExitCode;

use spritecut::cli;

fn main() -> ExitCode {
    cli::run()
}
