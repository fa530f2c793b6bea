//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `library_core` linkage and storage bootstrap from a shell.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `library_cli [config.toml]`. Without a config file an in-memory
//! catalog is opened.

use library_core::{init_logging_from_config, Library, LibraryConfig};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("library_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => LibraryConfig::load(&path).map_err(|err| err.to_string())?,
        None => LibraryConfig::in_memory(),
    };
    init_logging_from_config(&config.logging)?;

    let library = Library::open(config).map_err(|err| err.to_string())?;
    let books = library.list_books().map_err(|err| err.to_string())?;
    info!("event=cli_smoke module=cli status=ok books={}", books.len());

    println!("library_core ping={}", library_core::ping());
    println!("library_core version={}", library_core::core_version());
    println!("database={}", library.config().database_path);
    println!("books={}", books.len());
    Ok(())
}
