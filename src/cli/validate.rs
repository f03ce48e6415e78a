use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate container integrity
pub fn run(file: PathBuf) -> Result<()> {
    use mzpeaklist::validator::validate_container;

    info!("Validating {}", file.display());

    match validate_container(&file) {
        Ok(report) => {
            println!("{}", report.format_colored());

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
