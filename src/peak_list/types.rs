use crate::attributes::{AcquisitionInfo, MassSpecAttrs};

use super::formula::FormulaCandidate;

/// One detected spectral feature and its formula candidates.
///
/// A peak without candidates is a "no match": it stays in the list and is
/// exported as an unassigned row.
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    /// Experimental m/z as measured
    pub mz_exp: f64,
    /// Experimental m/z after calibration
    pub mz_calibrated: f64,
    /// Apex abundance
    pub abundance: f64,
    /// Integrated area
    pub area: Option<f64>,
    /// Resolving power
    pub resolving_power: Option<f64>,
    /// Signal-to-noise ratio
    pub signal_to_noise: Option<f64>,
    /// Signed ion charge
    pub ion_charge: i64,
    /// Formula candidates, monoisotopic and isotopologue
    pub candidates: Vec<FormulaCandidate>,
}

impl Peak {
    /// Create an unassigned peak; the calibrated m/z starts equal to the measured one.
    pub fn new(mz_exp: f64, abundance: f64, ion_charge: i64) -> Self {
        Self {
            mz_exp,
            mz_calibrated: mz_exp,
            abundance,
            area: None,
            resolving_power: None,
            signal_to_noise: None,
            ion_charge,
            candidates: Vec::new(),
        }
    }

    /// Set the calibrated m/z
    pub fn calibrated_mz(mut self, mz: f64) -> Self {
        self.mz_calibrated = mz;
        self
    }

    /// Set the peak area
    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    /// Set the resolving power
    pub fn resolving_power(mut self, rp: f64) -> Self {
        self.resolving_power = Some(rp);
        self
    }

    /// Set the signal-to-noise ratio
    pub fn signal_to_noise(mut self, sn: f64) -> Self {
        self.signal_to_noise = Some(sn);
        self
    }

    /// Attach a formula candidate
    pub fn with_candidate(mut self, candidate: FormulaCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// True when at least one candidate is assigned
    pub fn is_assigned(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Candidate with the highest confidence score; unscored candidates rank
    /// lowest and ties keep the first one.
    pub fn best_candidate(&self) -> Option<&FormulaCandidate> {
        let score = |c: &FormulaCandidate| c.confidence_score.unwrap_or(f64::NEG_INFINITY);
        self.candidates.iter().fold(None, |best, c| match best {
            Some(b) if score(b) >= score(c) => Some(b),
            _ => Some(c),
        })
    }
}

/// Profile arrays of a non-centroided spectrum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProfile {
    /// m/z channel
    pub mz: Vec<f64>,
    /// Abundance channel
    pub abundance: Vec<f64>,
}

impl RawProfile {
    /// Pair the two channels. Returns `None` if their lengths differ.
    pub fn new(mz: Vec<f64>, abundance: Vec<f64>) -> Option<Self> {
        (mz.len() == abundance.len()).then_some(Self { mz, abundance })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.mz.len()
    }

    /// True when the profile has no points
    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }
}

/// An annotated peak list for one scan.
///
/// Peaks are addressed by position; that position is the `Index` written to
/// every row derived from the peak.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakList {
    /// Scan number, used as the scan group label
    pub scan_number: i64,
    /// Spectrum-level attributes
    pub attrs: MassSpecAttrs,
    /// Instrument and sample labels
    pub info: AcquisitionInfo,
    /// True for centroid data (no raw profile is exported)
    pub is_centroid: bool,
    /// Raw profile, for profile-mode spectra
    pub raw: Option<RawProfile>,
    /// Peaks in index order
    pub peaks: Vec<Peak>,
}

impl PeakList {
    /// Number of peaks
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// True when there are no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Peak at `index`
    pub fn get(&self, index: usize) -> Option<&Peak> {
        self.peaks.get(index)
    }

    /// Iterate over `(index, peak)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Peak)> {
        self.peaks.iter().enumerate()
    }

    /// Number of peaks carrying at least one candidate
    pub fn assigned_count(&self) -> usize {
        self.peaks.iter().filter(|p| p.is_assigned()).count()
    }

    /// Every candidate symbol used across all peaks, unordered
    pub fn used_symbols(&self) -> impl Iterator<Item = &str> {
        self.peaks
            .iter()
            .flat_map(|p| p.candidates.iter())
            .flat_map(|c| c.atoms.keys().map(String::as_str))
    }

    /// Group label of this scan inside the container
    pub fn scan_label(&self) -> String {
        self.scan_number.to_string()
    }
}

/// Builder for [`PeakList`].
#[derive(Debug, Clone)]
pub struct PeakListBuilder {
    list: PeakList,
}

impl PeakListBuilder {
    /// Start a centroid peak list for `scan_number`
    pub fn new(scan_number: i64) -> Self {
        Self {
            list: PeakList {
                scan_number,
                attrs: MassSpecAttrs::default(),
                info: AcquisitionInfo::default(),
                is_centroid: true,
                raw: None,
                peaks: Vec::new(),
            },
        }
    }

    /// Set the polarity (1 or -1)
    pub fn polarity(mut self, polarity: i32) -> Self {
        self.list.attrs.polarity = polarity;
        self
    }

    /// Set the retention time
    pub fn retention_time(mut self, rt: f64) -> Self {
        self.list.attrs.rt = rt;
        self
    }

    /// Set the total ion current
    pub fn tic(mut self, tic: f64) -> Self {
        self.list.attrs.tic = tic;
        self
    }

    /// Set the baseline noise and its standard deviation
    pub fn baseline_noise(mut self, noise: f64, std: f64) -> Self {
        self.list.attrs.baseline_noise = noise;
        self.list.attrs.baseline_noise_std = std;
        self
    }

    /// Replace all spectrum-level attributes
    pub fn attrs(mut self, attrs: MassSpecAttrs) -> Self {
        self.list.attrs = attrs;
        self
    }

    /// Set instrument and sample labels
    pub fn info(mut self, info: AcquisitionInfo) -> Self {
        self.list.info = info;
        self
    }

    /// Attach a raw profile and mark the list as profile-mode
    pub fn raw_profile(mut self, raw: RawProfile) -> Self {
        self.list.is_centroid = false;
        self.list.raw = Some(raw);
        self
    }

    /// Append a peak
    pub fn add_peak(mut self, peak: Peak) -> Self {
        self.list.peaks.push(peak);
        self
    }

    /// Finish building
    pub fn build(self) -> PeakList {
        self.list
    }
}
