//! # image-dedup CLI
//!
//! Command-line interface for the duplicate image mover.
//!
//! ## Usage
//! ```bash
//! image-dedup scan ~/Pictures ~/dupes --strategy perceptual
//! image-dedup scan ~/Pictures ~/dupes --verbose --output json
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
