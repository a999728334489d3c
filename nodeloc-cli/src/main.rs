//! Entry point for the `get-lonlat` command.
#![forbid(unsafe_code)]

use env_logger::Env;
use nodeloc_cli::CliError;

fn main() {
    // Silent unless RUST_LOG asks otherwise; stderr is reserved for usage and
    // start-up failures.
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    match nodeloc_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            #[expect(clippy::print_stderr, reason = "start-up failures are reported on stderr")]
            eprintln!("get-lonlat: {err}");
            std::process::exit(1);
        }
    }
}
