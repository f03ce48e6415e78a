use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::schema::{base_element, ElementOrdering, DEFAULT_ELEMENT_ORDER};

/// How the ion was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IonType {
    /// Protonated or deprotonated molecule
    DeOrProtonated,
    /// Radical ion
    Radical,
    /// Adduct ion
    Adduct,
}

impl IonType {
    /// Lower-case label written to the `Ion Type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            IonType::DeOrProtonated => "de_or_protonated",
            IonType::Radical => "radical",
            IonType::Adduct => "adduct",
        }
    }
}

impl fmt::Display for IonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de_or_protonated" => Ok(IonType::DeOrProtonated),
            "radical" => Ok(IonType::Radical),
            "adduct" => Ok(IonType::Adduct),
            other => Err(format!("unknown ion type '{}'", other)),
        }
    }
}

/// Whether a candidate is the monoisotopic assignment or an isotopologue of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// Monoisotopic assignment
    Monoisotopic,
    /// Isotopologue of the monoisotopic candidate on peak `mono_index`
    Isotopologue {
        /// Position of the parent peak in the peak list
        mono_index: usize,
    },
}

/// A proposed elemental composition for one peak.
///
/// Atom counts are kept per symbol, isotope labels (`13C`, `18O`, `D`)
/// as their own entries. Ratios and indices derived from the counts fold
/// isotopes back into their parent element.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCandidate {
    /// Element symbol to atom count
    pub atoms: BTreeMap<String, u32>,
    /// Theoretical m/z of the ion
    pub calculated_mz: f64,
    /// Mass error in ppm
    pub mz_error_ppm: f64,
    /// Mass error score
    pub mz_error_score: Option<f64>,
    /// Isotopologue abundance similarity
    pub isotopologue_similarity: Option<f64>,
    /// Combined confidence score
    pub confidence_score: Option<f64>,
    /// Double bond equivalents
    pub dbe: f64,
    /// Heteroatom class label
    pub heteroatom_class: String,
    /// Ion type
    pub ion_type: IonType,
    /// Adduct atom for adduct ions
    pub adduct: Option<String>,
    /// Monoisotopic or isotopologue
    pub kind: CandidateKind,
}

impl FormulaCandidate {
    /// Create a monoisotopic candidate. DBE and heteroatom class are derived
    /// from the atom counts; scores start empty.
    pub fn new<I, S>(atoms: I, calculated_mz: f64, ion_type: IonType) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let atoms: BTreeMap<String, u32> = atoms
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(s, n)| (s.into(), n))
            .collect();
        let heteroatom_class = class_label(&atoms);
        let dbe = dbe(&atoms);
        Self {
            atoms,
            calculated_mz,
            mz_error_ppm: 0.0,
            mz_error_score: None,
            isotopologue_similarity: None,
            confidence_score: None,
            dbe,
            heteroatom_class,
            ion_type,
            adduct: None,
            kind: CandidateKind::Monoisotopic,
        }
    }

    /// Set the mass error in ppm
    pub fn mz_error_ppm(mut self, ppm: f64) -> Self {
        self.mz_error_ppm = ppm;
        self
    }

    /// Set the mass error score
    pub fn mz_error_score(mut self, score: f64) -> Self {
        self.mz_error_score = Some(score);
        self
    }

    /// Set the isotopologue similarity
    pub fn isotopologue_similarity(mut self, similarity: f64) -> Self {
        self.isotopologue_similarity = Some(similarity);
        self
    }

    /// Set the confidence score
    pub fn confidence_score(mut self, score: f64) -> Self {
        self.confidence_score = Some(score);
        self
    }

    /// Set the adduct atom
    pub fn adduct(mut self, atom: impl Into<String>) -> Self {
        self.adduct = Some(atom.into());
        self
    }

    /// Override the heteroatom class label
    pub fn heteroatom_class(mut self, label: impl Into<String>) -> Self {
        self.heteroatom_class = label.into();
        self
    }

    /// Mark as an isotopologue of the candidate on peak `mono_index`
    pub fn isotopologue_of(mut self, mono_index: usize) -> Self {
        self.kind = CandidateKind::Isotopologue { mono_index };
        self
    }

    /// True for isotopologue candidates
    pub fn is_isotopologue(&self) -> bool {
        matches!(self.kind, CandidateKind::Isotopologue { .. })
    }

    /// Parent peak index for isotopologues
    pub fn mono_index(&self) -> Option<usize> {
        match self.kind {
            CandidateKind::Isotopologue { mono_index } => Some(mono_index),
            CandidateKind::Monoisotopic => None,
        }
    }

    /// Count of an element with its isotopes folded in (`C` includes `13C`).
    pub fn element_total(&self, element: &str) -> f64 {
        element_total(&self.atoms, element)
    }

    /// Hydrogen to carbon ratio, `None` without carbon
    pub fn h_c(&self) -> Option<f64> {
        self.ratio_to_carbon("H")
    }

    /// Oxygen to carbon ratio, `None` without carbon
    pub fn o_c(&self) -> Option<f64> {
        self.ratio_to_carbon("O")
    }

    fn ratio_to_carbon(&self, element: &str) -> Option<f64> {
        let c = self.element_total("C");
        (c > 0.0).then(|| self.element_total(element) / c)
    }

    /// Aromaticity index (Koch & Dittmar)
    pub fn aromaticity_index(&self) -> f64 {
        self.aromaticity(1.0)
    }

    /// Modified aromaticity index, counting half of the oxygen atoms
    pub fn aromaticity_index_modified(&self) -> f64 {
        self.aromaticity(0.5)
    }

    fn aromaticity(&self, oxygen_weight: f64) -> f64 {
        let c = self.element_total("C");
        let h = self.element_total("H");
        let o = self.element_total("O") * oxygen_weight;
        let n = self.element_total("N");
        let p = self.element_total("P");
        let s = self.element_total("S");

        let dbe_ai = 1.0 + c - o - s - 0.5 * (h + n + p);
        let c_ai = c - o - s - n - p;
        if dbe_ai <= 0.0 || c_ai <= 0.0 {
            0.0
        } else {
            dbe_ai / c_ai
        }
    }

    /// Nominal oxidation state of carbon, `None` without carbon
    pub fn nosc(&self) -> Option<f64> {
        let c = self.element_total("C");
        if c <= 0.0 {
            return None;
        }
        let h = self.element_total("H");
        let n = self.element_total("N");
        let o = self.element_total("O");
        let p = self.element_total("P");
        let s = self.element_total("S");
        Some(4.0 - (4.0 * c + h - 3.0 * n - 2.0 * o + 5.0 * p - 2.0 * s) / c)
    }

    /// Formula text, `SYMBOL COUNT` tokens in priority order: `C6 H12 O6 13C1`
    pub fn formula_string(&self, ordering: &ElementOrdering) -> String {
        ordering
            .sorted(self.atoms.keys())
            .iter()
            .map(|symbol| format!("{}{}", symbol, self.atoms[symbol]))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn element_total(atoms: &BTreeMap<String, u32>, element: &str) -> f64 {
    atoms
        .iter()
        .filter(|(symbol, _)| base_element(symbol) == element)
        .map(|(_, n)| f64::from(*n))
        .sum()
}

/// Double bond equivalents: `1 + C - H/2 + N/2` over folded counts, with
/// halogens counted as hydrogen and trivalent P as N.
fn dbe(atoms: &BTreeMap<String, u32>) -> f64 {
    let c = element_total(atoms, "C") + element_total(atoms, "Si");
    let h = ["H", "F", "Cl", "Br", "I", "Li", "Na", "K"]
        .iter()
        .map(|e| element_total(atoms, e))
        .sum::<f64>();
    let n = element_total(atoms, "N") + element_total(atoms, "P") + element_total(atoms, "B");
    1.0 + c - h / 2.0 + n / 2.0
}

/// Heteroatom class label: heteroatoms (not C, H or isotope labels) with
/// counts in priority order, `HC` for pure hydrocarbons.
fn class_label(atoms: &BTreeMap<String, u32>) -> String {
    let mut hetero: Vec<(&str, u32)> = atoms
        .iter()
        .filter(|(symbol, _)| {
            let s = symbol.as_str();
            s != "C" && s != "H" && base_element(s) == s
        })
        .map(|(s, n)| (s.as_str(), *n))
        .collect();
    if hetero.is_empty() {
        return "HC".to_string();
    }
    hetero.sort_by_key(|(symbol, _)| {
        DEFAULT_ELEMENT_ORDER
            .iter()
            .position(|s| s == symbol)
            .unwrap_or(usize::MAX)
    });
    hetero
        .iter()
        .map(|(s, n)| format!("{}{}", s, n))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a formula string into atom counts.
///
/// Whitespace separated `SYMBOL COUNT` tokens are read first; the symbol
/// may carry a leading isotope mass (`13C1`), and a token without a digit
/// run counts as one atom. Tokens that are not a single element (compact
/// text like `C6H12O6`) are split at each upper-case letter instead.
/// Unparseable fragments, and counts that would overflow, are skipped.
pub fn parse_formula(text: &str) -> BTreeMap<String, u32> {
    let mut atoms = BTreeMap::new();
    for token in text.split_whitespace() {
        if let Some((symbol, count)) = parse_token(token) {
            add_count(&mut atoms, symbol, count);
            continue;
        }
        for (symbol, count) in split_compact(token) {
            add_count(&mut atoms, symbol, count);
        }
    }
    atoms
}

fn add_count(atoms: &mut BTreeMap<String, u32>, symbol: String, count: u32) {
    let total = atoms.get(&symbol).copied().unwrap_or(0).checked_add(count);
    if let Some(total) = total {
        atoms.insert(symbol, total);
    }
}

/// `13C1` -> ("13C", 1), `Cl2` -> ("Cl", 2), `Na` -> ("Na", 1)
fn parse_token(token: &str) -> Option<(String, u32)> {
    let digits_end = token
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, c)| i + c.len_utf8())?;
    let (symbol, count) = token.split_at(digits_end);

    let letters = symbol.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = letters.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() || !chars.all(|c| c.is_ascii_lowercase()) {
        return None;
    }

    let count = if count.is_empty() {
        1
    } else {
        count.parse().ok()?
    };
    Some((symbol.to_string(), count))
}

fn split_compact(token: &str) -> Vec<(String, u32)> {
    let mut out = Vec::new();
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            i += 1;
            continue;
        }
        let mut symbol = chars[i].to_string();
        i += 1;
        while i < chars.len() && chars[i].is_ascii_lowercase() {
            symbol.push(chars[i]);
            i += 1;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let digits: String = chars[start..i].iter().collect();
        let count = if digits.is_empty() {
            Some(1)
        } else {
            digits.parse::<u32>().ok()
        };
        if let Some(count) = count.filter(|n| *n > 0) {
            out.push((symbol, count));
        }
    }
    out
}
