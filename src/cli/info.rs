use anyhow::{Context, Result};
use std::path::PathBuf;

use mzpeaklist::container::{ContainerAddress, ContainerReader};

/// Display information about a container
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mut reader = ContainerReader::open(&file)
        .with_context(|| format!("Failed to open container: {}", file.display()))?;

    println!("mzPeakList Container Information");
    println!("================================");
    println!("File: {}", file.display());
    println!();

    println!("Root Attributes:");
    for (key, value) in reader.root_attributes() {
        println!("  {}: {}", key, value);
    }
    println!();

    let scans = reader.scans();
    println!("Scans: {}", scans.len());
    for scan in scans {
        let keys = reader.time_keys(&scan)?;
        let has_raw = reader
            .index()
            .group(&scan)
            .map(|g| g.has_raw)
            .unwrap_or(false);
        println!(
            "  {} ({} snapshots{})",
            scan,
            keys.len(),
            if has_raw { ", raw profile" } else { "" }
        );

        for key in keys {
            let address = ContainerAddress::new(scan.clone(), key);
            let table = reader
                .read_table(&address)
                .with_context(|| format!("Failed to read dataset {}", address))?;
            let attrs = reader.dataset_attributes(&address)?;
            println!(
                "    [{}] {} rows, {} columns, written {}",
                address.time_key,
                table.len(),
                table.labels.len(),
                attrs.get("date_utc").map(String::as_str).unwrap_or("?")
            );
        }
    }

    Ok(())
}
