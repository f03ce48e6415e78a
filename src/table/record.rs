use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::schema::{columns, is_core_column};

/// One scalar cell of a flat record.
///
/// Float NaN never appears: it is folded into [`Value::Null`] on
/// construction, matching how the container stores missing numbers.
#[derive(Debug, Clone)]
pub enum Value {
    /// Missing value
    Null,
    /// Integer
    Int(i64),
    /// Floating point number (never NaN)
    Float(f64),
    /// Text
    Text(String),
}

impl Value {
    /// Float value, NaN becomes null
    pub fn float(value: f64) -> Self {
        if value.is_nan() {
            Value::Null
        } else {
            Value::Float(value)
        }
    }

    /// Text value, the literal `nan` becomes null
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.eq_ignore_ascii_case("nan") {
            Value::Null
        } else {
            Value::Text(value)
        }
    }

    /// True for null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view. Text is parsed, null and unparseable text give `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
        }
    }

    /// Integer view. Floats must be integral; text is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Null => None,
            Value::Int(i) => Some(*i),
            Value::Float(f) => (f.fract() == 0.0).then_some(*f as i64),
            Value::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| Value::Float(s.parse().ok()?).as_i64())
            }
        }
    }

    /// Text view, only for text values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("nan"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Value::Null, Value::float)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::text(value)
    }
}

static NULL: Value = Value::Null;

/// One output row: column name to value.
///
/// Null cells are not stored, so two records that differ only in an
/// explicit null compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FlatRecord {
    values: BTreeMap<String, Value>,
}

impl FlatRecord {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. Setting null clears it.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        match value.into() {
            Value::Null => {
                self.values.remove(&column);
            }
            value => {
                self.values.insert(column, value);
            }
        }
    }

    /// Cell value, [`Value::Null`] when unset
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    /// True when the cell holds a non-null value
    pub fn has(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Non-null cells in column-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `Index` cell as a non-negative integer
    pub fn index(&self) -> Option<usize> {
        self.get(columns::INDEX)
            .as_i64()
            .and_then(|i| usize::try_from(i).ok())
    }

    /// Values in `labels` order, nulls included
    pub fn values_for<'a>(&'a self, labels: &'a [String]) -> impl Iterator<Item = &'a Value> + 'a {
        labels.iter().map(move |l| self.get(l))
    }
}

/// A resolved column label list plus its records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    /// Column labels in on-disk order
    pub labels: Vec<String>,
    /// Rows
    pub records: Vec<FlatRecord>,
}

impl RecordTable {
    /// Create a table
    pub fn new(labels: Vec<String>, records: Vec<FlatRecord>) -> Self {
        Self { labels, records }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when `name` is one of the labels
    pub fn has_column(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    /// All values of one column
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().map(move |r| r.get(name))
    }

    /// Labels that are neither core nor derived columns, i.e. atom counts
    pub fn atom_labels(&self) -> Vec<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|l| !is_core_column(l) && !super::AdditionalColumn::is_additional(l))
            .collect()
    }
}
