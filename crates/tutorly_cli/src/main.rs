//! CLI roster summary.
//!
//! # Responsibility
//! - Load preferences and the address book exactly as an embedding app would.
//! - Print a deterministic summary for quick local sanity checks.
//!
//! Usage: `tutorly_cli [preferences.json]`

use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use tutorly_core::{core_version, init_logging, read_address_book, CoreConfig};

const DEFAULT_PREFERENCES_FILE: &str = "preferences.json";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tutorly: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let preferences = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_FILE));
    let config = CoreConfig::load(&preferences).map_err(|err| err.to_string())?;

    if let Some(log_dir) = &config.log_dir {
        let log_dir = std::path::absolute(log_dir).map_err(|err| err.to_string())?;
        init_logging(&config.log_level, &log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok data_file={}",
        config.data_file.display()
    );

    println!("tutorly_core version={}", core_version());
    println!("data_file={}", config.data_file.display());

    let Some(report) = read_address_book(&config.data_file).map_err(|err| err.to_string())?
    else {
        println!("no data file found; starting with an empty address book");
        return Ok(());
    };

    println!("students={}", report.book.persons().len());
    println!("sessions={}", report.book.sessions().len());
    println!("attendance={}", report.book.attendance_records().len());
    for skipped in &report.skipped {
        println!("skipped {skipped}");
    }
    Ok(())
}
