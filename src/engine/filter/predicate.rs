use std::collections::BTreeSet;

use crate::engine::errors::RecordError;

/// A test over a single field of a raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact equality against an allow-set.
    InSet(BTreeSet<String>),
    /// The first `len` characters belong to the allow-set (postal-code department).
    PrefixInSet { len: usize, values: BTreeSet<String> },
    /// Year of a `YYYY-...` date, inclusive on both ends.
    YearRange { min: i32, max: i32 },
    /// Inclusive numeric range; a missing bound is open.
    NumericRange { min: Option<f64>, max: Option<f64> },
    /// Absent, empty, or numerically zero.
    MissingOrZero,
    /// Substring match.
    Contains {
        needle: String,
        case_insensitive: bool,
    },
}

impl Predicate {
    pub fn in_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::InSet(values.into_iter().map(Into::into).collect())
    }

    pub fn prefix_in_set<I, S>(len: usize, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::PrefixInSet {
            len,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn year_range(min: i32, max: i32) -> Self {
        Predicate::YearRange { min, max }
    }

    pub fn contains(needle: impl Into<String>, case_insensitive: bool) -> Self {
        Predicate::Contains {
            needle: needle.into(),
            case_insensitive,
        }
    }

    /// Evaluates the predicate. `value` is `None` when the field is absent.
    ///
    /// Returns `Err` only when the field is present but cannot be read as the
    /// number or date the predicate needs.
    pub fn evaluate(&self, field: &str, value: Option<&str>) -> Result<bool, RecordError> {
        let Some(value) = value else {
            return Ok(matches!(self, Predicate::MissingOrZero));
        };

        match self {
            Predicate::InSet(values) => Ok(values.contains(value)),
            Predicate::PrefixInSet { len, values } => {
                let prefix: String = value.chars().take(*len).collect();
                Ok(prefix.chars().count() == *len && values.contains(&prefix))
            }
            Predicate::YearRange { min, max } => {
                let year = year_of(field, value)?;
                Ok(*min <= year && year <= *max)
            }
            Predicate::NumericRange { min, max } => {
                let n = parse_number(field, value)?;
                Ok(min.is_none_or(|lo| lo <= n) && max.is_none_or(|hi| n <= hi))
            }
            Predicate::MissingOrZero => {
                if value.trim().is_empty() {
                    return Ok(true);
                }
                Ok(parse_number(field, value)? == 0.0)
            }
            Predicate::Contains {
                needle,
                case_insensitive,
            } => {
                if *case_insensitive {
                    Ok(value.to_uppercase().contains(&needle.to_uppercase()))
                } else {
                    Ok(value.contains(needle.as_str()))
                }
            }
        }
    }
}

/// Year component of a date-shaped field: the integer before the first `-`.
pub fn year_of(field: &str, value: &str) -> Result<i32, RecordError> {
    let head = value.split('-').next().unwrap_or_default().trim();
    head.parse::<i32>()
        .map_err(|_| RecordError::malformed(field, value, "expected a YYYY-MM-DD date"))
}

pub(crate) fn parse_number(field: &str, value: &str) -> Result<f64, RecordError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .ok_or_else(|| RecordError::malformed(field, value, "not a number"))
}

pub(crate) fn parse_integer(field: &str, value: &str) -> Result<i64, RecordError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RecordError::malformed(field, value, "expected a whole number"))
}
