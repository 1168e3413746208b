//! Version comparison.
//!
//! Versions are compared segment by segment. A version string is split at
//! every non-alphanumeric character and at every digit/letter boundary, so
//! `5.7.32-log` becomes `5`, `7`, `32`, `log` and `1.0rc1` becomes `1`, `0`,
//! `rc`, `1`.
//!
//! - Numeric segments compare numerically, whatever their length.
//! - Alphabetic segments compare alphabetically, ignoring case.
//! - A numeric segment outranks an alphabetic one (`1.0.1 > 1.0rc1`).
//! - Missing trailing segments count as `0` (`1.0 == 1.0.0`, `1.0 > 1.0rc1`).
//!
//! # Example
//!
//! ```
//! use wp_requirements::version::{version_compare, CompareOperator};
//!
//! assert!(version_compare("7.4.3", "7.4", CompareOperator::Ge));
//! assert!(!version_compare("7.2", "7.4", CompareOperator::Ge));
//! assert!(version_compare("5.7.32-log", "5.7.32", CompareOperator::Lt));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RequirementsError;

/// Operator applied when comparing a current version against a required one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    Lt,
    Le,
    Eq,
    #[default]
    Ge,
    Gt,
    Ne,
}

impl CompareOperator {
    /// All operators, in symbol order.
    pub const ALL: [CompareOperator; 6] = [
        CompareOperator::Lt,
        CompareOperator::Le,
        CompareOperator::Eq,
        CompareOperator::Ge,
        CompareOperator::Gt,
        CompareOperator::Ne,
    ];

    /// The canonical symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOperator::Lt => "<",
            CompareOperator::Le => "<=",
            CompareOperator::Eq => "==",
            CompareOperator::Ge => ">=",
            CompareOperator::Gt => ">",
            CompareOperator::Ne => "!=",
        }
    }

    /// Whether an ordering of `current` relative to `required` satisfies this operator.
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOperator::Lt => ordering == Ordering::Less,
            CompareOperator::Le => ordering != Ordering::Greater,
            CompareOperator::Eq => ordering == Ordering::Equal,
            CompareOperator::Ge => ordering != Ordering::Less,
            CompareOperator::Gt => ordering == Ordering::Greater,
            CompareOperator::Ne => ordering != Ordering::Equal,
        }
    }

    /// The operator that holds exactly when this one does not.
    pub fn negate(self) -> Self {
        match self {
            CompareOperator::Lt => CompareOperator::Ge,
            CompareOperator::Le => CompareOperator::Gt,
            CompareOperator::Eq => CompareOperator::Ne,
            CompareOperator::Ge => CompareOperator::Lt,
            CompareOperator::Gt => CompareOperator::Le,
            CompareOperator::Ne => CompareOperator::Eq,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOperator {
    type Err = RequirementsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "lt" => Ok(CompareOperator::Lt),
            "<=" | "le" => Ok(CompareOperator::Le),
            "==" | "=" | "eq" => Ok(CompareOperator::Eq),
            ">=" | "ge" => Ok(CompareOperator::Ge),
            ">" | "gt" => Ok(CompareOperator::Gt),
            "!=" | "<>" | "ne" => Ok(CompareOperator::Ne),
            other => Err(RequirementsError::UnknownOperator {
                operator: other.to_string(),
            }),
        }
    }
}

impl Serialize for CompareOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for CompareOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    /// Digits with leading zeros removed.
    Number(&'a str),
    Tag(String),
}

fn segments(version: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (idx, ch) in version.char_indices() {
        let class = if ch.is_ascii_digit() {
            Some(true)
        } else if ch.is_alphabetic() {
            Some(false)
        } else {
            None
        };

        match (start, class) {
            (Some((_, numeric)), Some(is_digit)) if numeric == is_digit => {}
            (Some((begin, numeric)), _) => {
                out.push(make_segment(&version[begin..idx], numeric));
                start = class.map(|is_digit| (idx, is_digit));
            }
            (None, _) => start = class.map(|is_digit| (idx, is_digit)),
        }
    }

    if let Some((begin, numeric)) = start {
        out.push(make_segment(&version[begin..], numeric));
    }

    out
}

fn make_segment(raw: &str, numeric: bool) -> Segment<'_> {
    if numeric {
        Segment::Number(raw.trim_start_matches('0'))
    } else {
        Segment::Tag(raw.to_lowercase())
    }
}

fn compare_segments(a: &Segment<'_>, b: &Segment<'_>) -> Ordering {
    match (a, b) {
        (Segment::Number(x), Segment::Number(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Segment::Tag(x), Segment::Tag(y)) => x.cmp(y),
        (Segment::Number(_), Segment::Tag(_)) => Ordering::Greater,
        (Segment::Tag(_), Segment::Number(_)) => Ordering::Less,
    }
}

/// Compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);
    let len = left.len().max(right.len());
    let zero = Segment::Number("");

    for i in 0..len {
        let x = left.get(i).unwrap_or(&zero);
        let y = right.get(i).unwrap_or(&zero);
        let ordering = compare_segments(x, y);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

/// Check `current` against `required` with the given operator.
pub fn version_compare(current: &str, required: &str, operator: CompareOperator) -> bool {
    operator.matches(compare_versions(current, required))
}
