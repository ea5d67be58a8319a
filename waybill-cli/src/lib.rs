//! Command-line interface for the Waybill routing engine.
//!
//! `waybill solve <request.json>` reads a JSON solve request, routes it with
//! the selected engine and writes the JSON result to stdout or `--output`.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod solve;

pub use error::CliError;

use solve::SolveArgs;

const ARG_SOLVE_REQUEST: &str = "request-path";
const ARG_SOLVE_ENGINE: &str = "engine";
const ARG_SOLVE_TIME_LIMIT_MS: &str = "time-limit-ms";
const ARG_SOLVE_MAX_ROUTE_DURATION: &str = "max-route-duration";
const ARG_SOLVE_OUTPUT: &str = "output";
const ENV_SOLVE_REQUEST: &str = "WAYBILL_CMDS_SOLVE_REQUEST_PATH";

/// Run the Waybill CLI with the current process arguments and environment.
///
/// A solve that finds no feasible plan still writes its error document
/// before returning [`CliError::NoSolution`].
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => solve::run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waybill",
    about = "Capacitated vehicle routing from JSON requests",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Route a JSON solve request and print the resulting plan.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
