use crate::engine::errors::RecordError;
use crate::engine::filter::year_of;
use crate::engine::types::{Amount, GroupKey, Projection};

/// One component of a group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    Field(String),
    /// The year of a `YYYY-MM-DD` field.
    YearOf(String),
}

/// A running sum over one projected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumSpec {
    pub field: String,
    pub scale: u8,
    /// Absent or empty values count as zero instead of failing the record.
    pub missing_as_zero: bool,
}

/// Describes how projections are bucketed and what each bucket accumulates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatePlan {
    pub key: Vec<KeyPart>,
    pub sums: Vec<SumSpec>,
    /// Last-seen fields copied onto the bucket on every merge.
    pub descriptive: Vec<String>,
}

/// Group key part for a year. Zero-padded to four digits so that keys order
/// like the years they name.
pub fn year_key(year: i32) -> String {
    format!("{year:04}")
}

/// The parsed, ready-to-merge form of one projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub sums: Vec<Amount>,
    pub descriptive: Vec<(String, String)>,
}

impl AggregatePlan {
    pub fn keyed_by(field: impl Into<String>) -> Self {
        Self {
            key: vec![KeyPart::Field(field.into())],
            ..Self::default()
        }
    }

    pub fn keyed_by_year_of(field: impl Into<String>) -> Self {
        Self {
            key: vec![KeyPart::YearOf(field.into())],
            ..Self::default()
        }
    }

    pub fn sum(mut self, field: impl Into<String>, scale: u8) -> Self {
        self.sums.push(SumSpec {
            field: field.into(),
            scale,
            missing_as_zero: false,
        });
        self
    }

    pub fn sum_or_zero(mut self, field: impl Into<String>, scale: u8) -> Self {
        self.sums.push(SumSpec {
            field: field.into(),
            scale,
            missing_as_zero: true,
        });
        self
    }

    pub fn describe<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptive.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Every record field the plan reads, in key, sum, descriptive order.
    pub fn fields(&self) -> Vec<&str> {
        let key = self.key.iter().map(|part| match part {
            KeyPart::Field(f) | KeyPart::YearOf(f) => f.as_str(),
        });
        let mut fields: Vec<&str> = Vec::new();
        for field in key
            .chain(self.sums.iter().map(|s| s.field.as_str()))
            .chain(self.descriptive.iter().map(String::as_str))
        {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }

    pub fn sum_index(&self, field: &str) -> Option<usize> {
        self.sums.iter().position(|s| s.field == field)
    }

    pub fn group_key(&self, projection: &Projection) -> Result<GroupKey, RecordError> {
        let mut parts = Vec::with_capacity(self.key.len());
        for part in &self.key {
            match part {
                KeyPart::Field(field) => {
                    let value = projection
                        .get(field)
                        .ok_or_else(|| RecordError::missing(field))?;
                    parts.push(value.to_string());
                }
                KeyPart::YearOf(field) => {
                    let value = projection
                        .get(field)
                        .ok_or_else(|| RecordError::missing(field))?;
                    parts.push(year_key(year_of(field, value)?));
                }
            }
        }
        Ok(GroupKey::new(parts))
    }
}

impl Contribution {
    /// Parses every value `plan` needs. Nothing is merged unless this succeeds.
    pub fn from_projection(
        plan: &AggregatePlan,
        projection: &Projection,
    ) -> Result<(GroupKey, Contribution), RecordError> {
        let key = plan.group_key(projection)?;

        let mut sums = Vec::with_capacity(plan.sums.len());
        for spec in &plan.sums {
            let amount = match projection.get(&spec.field) {
                Some(v) if !v.trim().is_empty() => Amount::parse(&spec.field, v, spec.scale)?,
                _ if spec.missing_as_zero => Amount::zero(spec.scale),
                Some(v) => return Err(RecordError::malformed(&spec.field, v, "empty value")),
                None => return Err(RecordError::missing(&spec.field)),
            };
            sums.push(amount);
        }

        let descriptive = plan
            .descriptive
            .iter()
            .filter_map(|f| projection.get(f).map(|v| (f.clone(), v.to_string())))
            .collect();

        Ok((key, Contribution { sums, descriptive }))
    }
}
