//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured database through the core and report shelf size.
//! - Keep output deterministic for quick local sanity checks.

use log::error;
use movieshelf_core::{core_version, init_logging, MovieRepository, Store, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = StoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("movieshelf logging disabled: {err}");
        }
    }

    println!("movieshelf_core version={}", core_version());

    let store = match Store::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("failed to open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let outcome = store.movies.get_all();
    let closed = store.close();

    match (outcome, closed) {
        (Ok(movies), Ok(())) => {
            println!(
                "movieshelf db={} movies_first_page={}",
                config.db_path.display(),
                movies.len()
            );
            ExitCode::SUCCESS
        }
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("movieshelf probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}
