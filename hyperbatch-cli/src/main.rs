// hyperbatch-cli/src/main.rs
//
// Entry point for the `hyperbatch` binary.
//
// Parses arguments (clap exits with a usage error before anything else
// runs), installs logging, runs the batch and maps the outcome to the
// process exit code: 0 when every file succeeded, 1 otherwise. An aborted
// batch still prints the files it got through.

use clap::Parser;
use hyperbatch_cli::commands::process::suggestion_for;
use hyperbatch_cli::config::EXIT_FAILURE;
use hyperbatch_cli::{Cli, logging, run_process, terminal};
use hyperbatch_core::CoreError;
use std::process;

fn main() {
    let cli = Cli::parse();

    let use_color = terminal::color_from_env();
    terminal::set_color(use_color);
    logging::init(cli.verbose, use_color);

    match run_process(cli.process) {
        Ok(summary) => {
            terminal::print_summary(&summary);
            if !summary.all_succeeded() {
                process::exit(EXIT_FAILURE);
            }
        }
        Err(e) => {
            log::debug!("Batch error: {:?}", e);
            if let CoreError::BatchAborted { completed, .. } = &e {
                terminal::print_summary(completed);
            }
            terminal::print_error("Batch failed", &e.to_string(), suggestion_for(&e));
            process::exit(EXIT_FAILURE);
        }
    }
}
