//! Sort specifications
//!
//! Parses the JSON:API `sort` parameter and appends the identifier
//! column as a final tie-break so page boundaries stay stable.

use crate::error::{Error, Result};
use crate::types::SortDirection;
use std::fmt;

/// One field of a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField {
    field: String,
    direction: SortDirection,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction.is_desc() {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Ordered list of sort fields, most significant first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    pub fn new(fields: Vec<SortField>) -> Self {
        Self { fields }
    }

    /// Parse the wire format, e.g. `-createdAt,title`
    ///
    /// A leading `-` sorts that field descending. An empty string is an
    /// empty specification.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let fields = raw
            .split(',')
            .map(|part| {
                let part = part.trim();
                let (name, direction) = match part.strip_prefix('-') {
                    Some(name) => (name, SortDirection::Desc),
                    None => (part, SortDirection::Asc),
                };
                if name.is_empty() {
                    return Err(Error::invalid_sort(format!(
                        "empty sort field in '{raw}'"
                    )));
                }
                Ok(SortField::new(name, direction))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortField> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether any field sorts by `field`, in either direction
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    pub fn push(&mut self, field: SortField) {
        self.fields.push(field);
    }

    /// Append `id_column` ascending unless it already orders by it
    pub fn with_tie_break(mut self, id_column: &str) -> Self {
        if !self.contains(id_column) {
            self.fields.push(SortField::asc(id_column));
        }
        self
    }

    /// Rename every field, keeping directions
    pub fn map_fields<F: FnMut(&str) -> String>(self, mut f: F) -> Self {
        Self {
            fields: self
                .fields
                .into_iter()
                .map(|s| SortField::new(f(&s.field), s.direction))
                .collect(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl FromIterator<SortField> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
