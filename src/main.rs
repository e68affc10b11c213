//! # photoping CLI
//!
//! ## Usage
//! ```bash
//! photoping select "Alice Smith"
//! photoping list-persons
//! photoping compose --output today.html
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
