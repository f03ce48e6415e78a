use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TableError;
use crate::peak_list::FormulaCandidate;
use crate::schema::columns;

/// Which candidates of a peak become rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSelection {
    /// Every candidate of every peak
    #[default]
    All,
    /// Only the highest-scoring monoisotopic candidate per peak, followed by
    /// the isotopologues pointing back at that peak
    BestScore,
}

/// Derived columns the codec can compute from a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdditionalColumn {
    /// Aromaticity index
    AromaticityIndex,
    /// Modified aromaticity index
    AromaticityIndexModified,
    /// Nominal oxidation state of carbon
    Nosc,
}

impl AdditionalColumn {
    /// All supported derived columns
    pub const ALL: [AdditionalColumn; 3] = [
        AdditionalColumn::AromaticityIndex,
        AdditionalColumn::AromaticityIndexModified,
        AdditionalColumn::Nosc,
    ];

    /// Column label
    pub fn name(&self) -> &'static str {
        match self {
            AdditionalColumn::AromaticityIndex => columns::AROMATICITY_INDEX,
            AdditionalColumn::AromaticityIndexModified => columns::AROMATICITY_INDEX_MODIFIED,
            AdditionalColumn::Nosc => columns::NOSC,
        }
    }

    /// Compute the value for a candidate
    pub fn compute(&self, candidate: &FormulaCandidate) -> Option<f64> {
        match self {
            AdditionalColumn::AromaticityIndex => Some(candidate.aromaticity_index()),
            AdditionalColumn::AromaticityIndexModified => {
                Some(candidate.aromaticity_index_modified())
            }
            AdditionalColumn::Nosc => candidate.nosc(),
        }
    }

    /// True when `name` is a supported derived column label
    pub fn is_additional(name: &str) -> bool {
        Self::ALL.iter().any(|c| c.name() == name)
    }
}

impl fmt::Display for AdditionalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdditionalColumn {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| TableError::UnsupportedColumn(s.to_string()))
    }
}

/// Row selection policy for flattening a peak list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Emit rows for peaks without candidates
    pub include_no_match: bool,
    /// Emit rows for isotopologue candidates
    pub include_isotopologues: bool,
    /// Isotopologue rows follow their peak; otherwise they are appended after the main pass.
    ///
    /// Deferred rows come back after every monoisotopic row of their peak, so
    /// a peak listing an isotopologue before a monoisotopic candidate is
    /// rebuilt with the monoisotopic candidate first.
    pub isotopologue_inline: bool,
    /// Unassigned rows sit at their peak position; otherwise they are appended at the end
    pub no_match_inline: bool,
    /// Candidate selection mode
    pub selection: CandidateSelection,
    /// Candidates scoring below this are exported as unassigned rows
    pub min_confidence_score: Option<f64>,
    /// Derived columns to add, by label
    pub additional_columns: Vec<String>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            include_no_match: true,
            include_isotopologues: true,
            isotopologue_inline: true,
            no_match_inline: true,
            selection: CandidateSelection::All,
            min_confidence_score: None,
            additional_columns: Vec::new(),
        }
    }
}

impl FlattenOptions {
    /// Request one derived column by label
    pub fn with_additional_column(mut self, name: impl Into<String>) -> Self {
        self.additional_columns.push(name.into());
        self
    }

    /// Parse the requested derived columns, rejecting unknown labels.
    pub fn resolve_additional_columns(&self) -> Result<Vec<AdditionalColumn>, TableError> {
        let mut resolved: Vec<AdditionalColumn> = Vec::new();
        for name in &self.additional_columns {
            let column: AdditionalColumn = name.parse()?;
            if !resolved.contains(&column) {
                resolved.push(column);
            }
        }
        Ok(resolved)
    }

    /// True when the candidate meets the minimum confidence score
    pub fn passes_score(&self, candidate: &FormulaCandidate) -> bool {
        match self.min_confidence_score {
            Some(min) => candidate.confidence_score.unwrap_or(0.0) >= min,
            None => true,
        }
    }
}
