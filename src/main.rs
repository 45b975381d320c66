mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose, args.quiet);
    cli::context::init(args.config.as_deref());

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(),
        Commands::Decrypt {
            file,
            text,
            output,
            key,
        } => cli::commands::decrypt::execute(
            file.as_deref(),
            text.as_deref(),
            output.as_deref(),
            key,
        ),
        Commands::Batch {
            files,
            out_dir,
            max_size,
            key,
        } => cli::commands::batch::execute(files, out_dir.as_deref(), *max_size, key, args.quiet),
        Commands::Encrypt {
            file,
            text,
            recipient,
            output,
            no_sign,
            key,
        } => cli::commands::encrypt::execute(
            file.as_deref(),
            text.as_deref(),
            recipient.as_deref(),
            output.as_deref(),
            (!*no_sign).then_some(key),
        ),
        Commands::History { last } => cli::commands::history::execute(*last),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the flag-derived level.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csirt_pgp={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
