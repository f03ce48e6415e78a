/// Column names as constants for type safety
/// Position of the originating peak in the peak list (join key)
pub const INDEX: &str = "Index";
/// Experimental m/z as measured
pub const MZ: &str = "m/z";
/// Experimental m/z after calibration
pub const CALIBRATED_MZ: &str = "Calibrated m/z";
/// Theoretical m/z of the assigned formula
pub const CALCULATED_MZ: &str = "Calculated m/z";
/// Peak apex abundance
pub const PEAK_HEIGHT: &str = "Peak Height";
/// Integrated peak area
pub const PEAK_AREA: &str = "Peak Area";
/// Resolving power at the peak
pub const RESOLVING_POWER: &str = "Resolving Power";
/// Signal-to-noise ratio
pub const SIGNAL_TO_NOISE: &str = "S/N";
/// Ion charge (signed)
pub const ION_CHARGE: &str = "Ion Charge";
/// Mass error in parts per million
pub const MZ_ERROR_PPM: &str = "m/z Error (ppm)";
/// Mass error score
pub const MZ_ERROR_SCORE: &str = "m/z Error Score";
/// Isotopologue abundance similarity
pub const ISOTOPOLOGUE_SIMILARITY: &str = "Isotopologue Similarity";
/// Combined confidence score
pub const CONFIDENCE_SCORE: &str = "Confidence Score";
/// Double bond equivalents
pub const DBE: &str = "DBE";
/// Oxygen to carbon ratio
pub const O_C: &str = "O/C";
/// Hydrogen to carbon ratio
pub const H_C: &str = "H/C";
/// Heteroatom class label
pub const HETEROATOM_CLASS: &str = "Heteroatom Class";
/// Ion type label (lower case)
pub const ION_TYPE: &str = "Ion Type";
/// Adduct atom, when the ion is an adduct
pub const ADDUCT: &str = "Adduct";
/// 1 for isotopologue candidates, 0 otherwise
pub const IS_ISOTOPOLOGUE: &str = "Is Isotopologue";
/// Index of the monoisotopic parent peak of an isotopologue
pub const MONO_ISOTOPIC_INDEX: &str = "Mono Isotopic Index";
/// Molecular formula text
pub const MOLECULAR_FORMULA: &str = "Molecular Formula";

// Optional derived columns

/// Aromaticity index
pub const AROMATICITY_INDEX: &str = "Aromaticity Index";
/// Modified aromaticity index
pub const AROMATICITY_INDEX_MODIFIED: &str = "Aromaticity Index (modified)";
/// Nominal oxidation state of carbon
pub const NOSC: &str = "NOSC";

/// The fixed core columns, in on-disk order. Atom columns follow.
pub const CORE_COLUMNS: [&str; 22] = [
    INDEX,
    MZ,
    CALIBRATED_MZ,
    CALCULATED_MZ,
    PEAK_HEIGHT,
    PEAK_AREA,
    RESOLVING_POWER,
    SIGNAL_TO_NOISE,
    ION_CHARGE,
    MZ_ERROR_PPM,
    MZ_ERROR_SCORE,
    ISOTOPOLOGUE_SIMILARITY,
    CONFIDENCE_SCORE,
    DBE,
    O_C,
    H_C,
    HETEROATOM_CLASS,
    ION_TYPE,
    ADDUCT,
    IS_ISOTOPOLOGUE,
    MONO_ISOTOPIC_INDEX,
    MOLECULAR_FORMULA,
];

/// Columns whose presence marks a table as a valid peak table.
pub const SENTINEL_COLUMNS: [&str; 5] = [H_C, O_C, HETEROATOM_CLASS, ION_TYPE, IS_ISOTOPOLOGUE];

/// Integer-typed core columns
pub const INTEGER_COLUMNS: [&str; 4] = [INDEX, ION_CHARGE, IS_ISOTOPOLOGUE, MONO_ISOTOPIC_INDEX];

/// Text-typed core columns
pub const TEXT_COLUMNS: [&str; 4] = [HETEROATOM_CLASS, ION_TYPE, ADDUCT, MOLECULAR_FORMULA];

/// Returns true if `name` is one of the 22 core columns.
pub fn is_core_column(name: &str) -> bool {
    CORE_COLUMNS.contains(&name)
}

/// Columns of the raw profile dataset
pub mod raw {
    /// Row 0 of the profile array
    pub const MZ_PROFILE: &str = "mz";
    /// Row 1 of the profile array
    pub const ABUNDANCE_PROFILE: &str = "abundance";
}
