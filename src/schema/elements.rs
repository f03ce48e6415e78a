//! Element priority ordering for atom-count columns.
//!
//! Atom columns are not sorted alphabetically and not by first appearance:
//! they follow a fixed priority table (carbon, hydrogen, the common
//! heteroatoms, halogens, metals, then isotope labels). The table is an
//! ordinary immutable value handed to the row codec, so a caller can supply
//! its own ordering without touching global state.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Default priority order used by [`ElementOrdering::default`].
pub const DEFAULT_ELEMENT_ORDER: &[&str] = &[
    "C", "H", "O", "N", "P", "S", "F", "Cl", "Br", "I", "Si", "B", "Li", "Na", "K", "Mg", "Ca",
    "Al", "Fe", "Cu", "Zn", "Mn", "Co", "Ni", "Cr", "V", "Ti", "Se", "As", "Sn", "Hg", "Pb",
    "Ag", "Au", "Pt", "13C", "D", "T", "15N", "17O", "18O", "33S", "34S", "36S", "37Cl", "81Br",
    "6Li", "10B", "25Mg", "26Mg", "29Si", "30Si", "41K", "44Ca", "54Fe", "57Fe", "65Cu", "66Zn",
    "68Zn",
];

/// Immutable element priority table.
#[derive(Debug, Clone)]
pub struct ElementOrdering {
    order: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl Default for ElementOrdering {
    fn default() -> Self {
        Self::new(DEFAULT_ELEMENT_ORDER.iter().copied())
    }
}

impl ElementOrdering {
    /// Build an ordering from symbols in priority order. Later duplicates are ignored.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Vec::new();
        let mut ranks = HashMap::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if ranks.contains_key(&symbol) {
                continue;
            }
            ranks.insert(symbol.clone(), order.len());
            order.push(symbol);
        }
        Self { order, ranks }
    }

    /// Priority rank of a symbol, `None` for symbols outside the table
    pub fn rank(&self, symbol: &str) -> Option<usize> {
        self.ranks.get(symbol).copied()
    }

    /// Known symbols in priority order
    pub fn symbols(&self) -> &[String] {
        &self.order
    }

    /// Compare two symbols by priority. Unknown symbols sort after every
    /// known one, alphabetically among themselves.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.rank(a), self.rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    /// Sort and deduplicate a set of symbols by priority.
    pub fn sorted<I, S>(&self, symbols: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if !out.iter().any(|s| s == symbol) {
                out.push(symbol.to_string());
            }
        }
        out.sort_by(|a, b| self.compare(a, b));
        out
    }
}

/// Element an isotope label belongs to: `13C` -> `C`, `D` -> `H`.
pub fn base_element(symbol: &str) -> &str {
    match symbol {
        "D" | "T" => "H",
        _ => symbol.trim_start_matches(|c: char| c.is_ascii_digit()),
    }
}

/// Returns true for isotope labels such as `13C`, `18O` or `D`.
pub fn is_isotope_label(symbol: &str) -> bool {
    base_element(symbol) != symbol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_not_alphabetical() {
        let ordering = ElementOrdering::default();
        let sorted = ordering.sorted(["S", "Na", "O", "H", "C", "13C", "N"]);
        assert_eq!(sorted, vec!["C", "H", "O", "N", "S", "Na", "13C"]);
    }

    #[test]
    fn test_unknown_symbols_sort_last() {
        let ordering = ElementOrdering::default();
        let sorted = ordering.sorted(["Xe", "C", "Ar"]);
        assert_eq!(sorted, vec!["C", "Ar", "Xe"]);
    }

    #[test]
    fn test_custom_ordering() {
        let ordering = ElementOrdering::new(["O", "C"]);
        assert_eq!(ordering.sorted(["C", "O", "C"]), vec!["O", "C"]);
        assert_eq!(ordering.rank("C"), Some(1));
        assert_eq!(ordering.rank("H"), None);
    }

    #[test]
    fn test_base_element() {
        assert_eq!(base_element("13C"), "C");
        assert_eq!(base_element("37Cl"), "Cl");
        assert_eq!(base_element("D"), "H");
        assert_eq!(base_element("Cl"), "Cl");
        assert!(is_isotope_label("18O"));
        assert!(!is_isotope_label("O"));
    }
}
