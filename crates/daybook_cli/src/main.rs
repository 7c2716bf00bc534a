//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `daybook_core` linkage and schema bootstrap without a UI.
//! - Keep output deterministic for quick local sanity checks.

use daybook_core::db::migrations::latest_version;
use daybook_core::db::open_db_in_memory;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("daybook_core ping={}", daybook_core::ping());
    println!("daybook_core version={}", daybook_core::core_version());

    match open_db_in_memory() {
        Ok(_) => {
            println!("daybook_core schema_version={}", latest_version());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("daybook_core db_bootstrap_failed error={err}");
            ExitCode::FAILURE
        }
    }
}
