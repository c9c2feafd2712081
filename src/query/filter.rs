//! Filter predicates
//!
//! The pager forwards these to the query collaborator untouched. Only the
//! collaborator decides what a predicate means for its data store.

use crate::types::JsonValue;

/// A single predicate on one field
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value
    Equals { field: String, value: JsonValue },
    /// Field equals any of the values
    In { field: String, values: Vec<JsonValue> },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn any_of<V: Into<JsonValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Field the predicate applies to
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::In { field, .. } => field,
        }
    }

    /// Same predicate on a renamed field
    pub fn with_field(self, name: impl Into<String>) -> Self {
        match self {
            Self::Equals { value, .. } => Self::Equals {
                field: name.into(),
                value,
            },
            Self::In { values, .. } => Self::In {
                field: name.into(),
                values,
            },
        }
    }

    /// Check a JSON value against this predicate
    pub fn matches(&self, candidate: Option<&JsonValue>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        match self {
            Self::Equals { value, .. } => loosely_equal(candidate, value),
            Self::In { values, .. } => values.iter().any(|v| loosely_equal(candidate, v)),
        }
    }
}

/// Compare values, treating string-encoded query input as equal to the
/// number or boolean it spells
fn loosely_equal(candidate: &JsonValue, expected: &JsonValue) -> bool {
    match (candidate, expected) {
        (JsonValue::Number(n), JsonValue::String(s)) | (JsonValue::String(s), JsonValue::Number(n)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        (JsonValue::Bool(b), JsonValue::String(s)) | (JsonValue::String(s), JsonValue::Bool(b)) => {
            s.parse::<bool>().ok() == Some(*b)
        }
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64() == b.as_f64(),
        _ => candidate == expected,
    }
}

/// Ordered set of predicates, all of which must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn extend(&mut self, other: FilterSet) {
        self.filters.extend(other.filters);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    /// Rename every field, keeping the predicates
    pub fn map_fields<F: FnMut(&str) -> String>(self, mut f: F) -> Self {
        Self {
            filters: self
                .filters
                .into_iter()
                .map(|filter| {
                    let name = f(filter.field());
                    filter.with_field(name)
                })
                .collect(),
        }
    }

    /// Check a JSON object against every predicate
    pub fn matches(&self, record: &JsonValue) -> bool {
        self.filters
            .iter()
            .all(|filter| filter.matches(record.get(filter.field())))
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}
