use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use std::path::PathBuf;

use mzpeaklist::attributes::{AcquisitionInfo, Settings, SettingsSnapshot};
use mzpeaklist::container::{CompressionType, ExportWorker, WriterConfig};
use mzpeaklist::peak_list::{
    FormulaCandidate, IonType, Peak, PeakList, PeakListBuilder, RawProfile,
};

use super::config::Config;

const MASS_C: f64 = 12.0;
const MASS_13C: f64 = 13.003_354_835;
const MASS_H: f64 = 1.007_825_032;
const MASS_O: f64 = 15.994_914_622;
const MASS_PROTON: f64 = 1.007_276_467;

/// Write synthetic annotated peak lists
pub fn run(
    output: PathBuf,
    scans: i64,
    snapshots: usize,
    profile_mode: bool,
    config_path: Option<PathBuf>,
    compression_level: Option<i32>,
) -> Result<()> {
    let mut config = WriterConfig::default();
    if let Some(path) = &config_path {
        Config::from_file(path)?.export.apply(&mut config);
    }
    if let Some(level) = compression_level {
        config.compression = CompressionType::Zstd(level);
    }

    info!("Creating container: {}", output.display());
    let worker = ExportWorker::new(&output, config).context("Failed to start export worker")?;

    let mut tasks = Vec::new();
    for scan in 0..scans {
        let list = demo_peak_list(scan, profile_mode);
        for _ in 0..snapshots {
            tasks.push(worker.submit(list.clone(), demo_settings(profile_mode))?);
        }
    }

    for task in tasks {
        let address = task.wait().context("Export failed")?;
        info!("  Wrote {}", address);
    }
    worker.finish()?;

    let file_size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    info!("Demo complete!");
    info!("  Output file: {}", output.display());
    info!("  Scans: {}, snapshots per scan: {}", scans, snapshots);
    info!(
        "  File size: {} bytes ({:.2} MB)",
        file_size,
        file_size as f64 / 1024.0 / 1024.0
    );
    Ok(())
}

/// Deprotonated m/z of a CcHhOo formula with `c13` carbons as 13C
fn deprotonated_mz(c: u32, c13: u32, h: u32, o: u32) -> f64 {
    (c - c13) as f64 * MASS_C + c13 as f64 * MASS_13C + h as f64 * MASS_H + o as f64 * MASS_O
        - MASS_PROTON
}

/// A negative-mode spectrum of an oxygenated homologous series.
///
/// Every third assigned peak is followed by its 13C isotopologue and every
/// fifth by an unassigned noise peak.
fn demo_peak_list(scan: i64, profile_mode: bool) -> PeakList {
    let mut builder = PeakListBuilder::new(scan)
        .polarity(-1)
        .retention_time(scan as f64 * 0.5)
        .tic(2.5e9)
        .baseline_noise(1.2e4, 900.0)
        .info(AcquisitionInfo {
            file_name: "demo_run.raw".to_string(),
            analyzer: "ICR".to_string(),
            instrument_label: "15T".to_string(),
            sample_name: "demo".to_string(),
        });

    let mut peaks: Vec<Peak> = Vec::new();
    for i in 0..24u32 {
        let c = 12 + i;
        let o = 2 + i % 4;
        let h = 2 * c - 8;
        let ppm = ((i * 7) % 11) as f64 * 0.05 - 0.25;
        let calc = deprotonated_mz(c, 0, h, o);
        let measured = calc * (1.0 + ppm * 1e-6);
        let abundance = 1.0e7 * (1.0 + (i % 6) as f64);

        let mono_index = peaks.len();
        let mono =
            FormulaCandidate::new([("C", c), ("H", h), ("O", o)], calc, IonType::DeOrProtonated)
                .mz_error_ppm(ppm)
                .mz_error_score(1.0 - ppm.abs())
                .confidence_score(0.95 - ppm.abs());
        peaks.push(
            Peak::new(measured, abundance, -1)
                .resolving_power(4.0e5)
                .signal_to_noise(abundance / 1.2e4)
                .with_candidate(mono),
        );

        if i % 3 == 0 {
            let iso_calc = deprotonated_mz(c, 1, h, o);
            let iso = FormulaCandidate::new(
                [("C", c - 1), ("H", h), ("O", o), ("13C", 1)],
                iso_calc,
                IonType::DeOrProtonated,
            )
            .mz_error_ppm(ppm)
            .isotopologue_similarity(0.9)
            .confidence_score(0.8)
            .isotopologue_of(mono_index);
            peaks.push(
                Peak::new(iso_calc * (1.0 + ppm * 1e-6), abundance * 0.011 * c as f64, -1)
                    .with_candidate(iso),
            );
        }

        if i % 5 == 4 {
            peaks.push(Peak::new(measured + 0.3137, abundance * 0.02, -1));
        }
    }

    if profile_mode {
        let mz: Vec<f64> = peaks.iter().map(|p| p.mz_exp).collect();
        let abundance: Vec<f64> = peaks.iter().map(|p| p.abundance).collect();
        if let Some(raw) = RawProfile::new(mz, abundance) {
            builder = builder.raw_profile(raw);
        }
    }

    for peak in peaks {
        builder = builder.add_peak(peak);
    }
    builder.build()
}

fn demo_settings(profile_mode: bool) -> SettingsSnapshot {
    let mut search = Settings::new();
    search.insert("min_ppm_error".into(), json!(-1.0));
    search.insert("max_ppm_error".into(), json!(1.0));
    search.insert("usedAtoms".into(), json!({"C": [1, 90], "H": [4, 200], "O": [1, 12]}));

    let mut peak = Settings::new();
    peak.insert("peak_min_prominence_percent".into(), json!(0.1));

    let mut spectrum = Settings::new();
    spectrum.insert("noise_threshold_method".into(), json!("log"));

    let transient = profile_mode.then(|| {
        let mut t = Settings::new();
        t.insert("apodization_method".into(), json!("Hanning"));
        t.insert("number_of_truncations".into(), json!(0));
        t
    });

    SettingsSnapshot {
        molecular_search: search,
        mass_spec_peak: peak,
        mass_spectrum: spectrum,
        transient,
    }
}
