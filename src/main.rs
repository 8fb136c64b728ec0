//! dupescan - duplicate file finder
//!
//! Entry point: parses the command line, wires up logging and progress,
//! then runs the scan, classification and reporting or deletion phases.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use dupescan::actions;
use dupescan::cli::Cli;
use dupescan::config::Config;
use dupescan::duplicates::{classify, FileStore};
use dupescan::logging;
use dupescan::output;
use dupescan::progress::Progress;
use dupescan::scanner::Scanner;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Version exits 0; help and every usage error exit 1
            let code = match err.kind() {
                ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_cli(cli)?;
    if let Some(min) = config.min_size {
        log::info!("minimum file size to consider: more than {} byte(s)", min);
    }

    let progress = Progress::new(config.quiet);
    let mut store = FileStore::new();

    let mut scanner = Scanner::new(&config, &progress);
    for root in &config.roots {
        scanner.scan_tree(&mut store, root);
    }
    scanner.finish();

    classify(&mut store, &progress);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if config.delete {
        let stdin = io::stdin();
        actions::delete_duplicates(&store, &config, &mut stdin.lock(), &mut out)?;
    } else if config.summarize {
        output::summarize(&store, &mut out)?;
    } else {
        output::print_matches(&store, &config, &mut out)?;
    }
    out.flush()?;

    Ok(())
}
