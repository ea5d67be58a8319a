//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use waybill_cli::CliError;

fn main() {
    if let Err(err) = waybill_cli::run() {
        if let CliError::ArgumentParsing(clap_err) = &err {
            clap_err.exit();
        }
        eprintln!("waybill: {err}");
        std::process::exit(1);
    }
}
