// pcmshift-cli/src/main.rs
//
// Entry point for the pcmshift binary: parses arguments, runs the batch and
// turns the outcome into a process exit code.

use clap::Parser;
use pcmshift_cli::error::EXIT_SUCCESS;
use pcmshift_cli::{Cli, exit_code_for, run_convert};
use std::process;

fn main() {
    // Usage errors exit with code 2 inside clap.
    let cli = Cli::parse();

    let code = match run_convert(&cli) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold().for_stderr(), e);
            exit_code_for(&e)
        }
    };

    process::exit(code);
}
