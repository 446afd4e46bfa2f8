use super::predicate::Predicate;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub field: String,
    pub predicate: Predicate,
}

/// Which records a job keeps and which of their fields it retains.
///
/// Predicates are evaluated in order and stop at the first one that fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub required: Vec<String>,
    pub predicates: Vec<FieldPredicate>,
    /// Fields that must parse as numbers for the record to be usable.
    pub numeric: Vec<String>,
    /// Fields that must parse as whole numbers.
    pub integer: Vec<String>,
    pub extract: Vec<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.predicates.push(FieldPredicate {
            field: field.into(),
            predicate,
        });
        self
    }

    pub fn numeric(mut self, field: impl Into<String>) -> Self {
        self.numeric.push(field.into());
        self
    }

    pub fn integer(mut self, field: impl Into<String>) -> Self {
        self.integer.push(field.into());
        self
    }

    pub fn extract<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extract.extend(fields.into_iter().map(Into::into));
        self
    }
}
