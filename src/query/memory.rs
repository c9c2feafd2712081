//! In-memory query collaborator
//!
//! Evaluates filters, sort and bounds over a vector of JSON objects. Used
//! for fixtures and for resources that are already held in memory.

use super::filter::FilterSet;
use super::sort::SortSpec;
use super::types::Query;
use crate::error::Result;
use crate::types::JsonValue;
use std::cell::Cell;
use std::cmp::Ordering;

/// Query over records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    records: Vec<JsonValue>,
    filters: FilterSet,
    sort: SortSpec,
    count_calls: Cell<usize>,
    fetch_calls: Cell<usize>,
}

impl MemoryQuery {
    pub fn new(records: Vec<JsonValue>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Number of `count` calls issued so far
    pub fn count_calls(&self) -> usize {
        self.count_calls.get()
    }

    /// Number of `fetch` calls issued so far
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    fn matching(&self) -> impl Iterator<Item = &JsonValue> {
        self.records.iter().filter(|r| self.filters.matches(r))
    }
}

impl Query for MemoryQuery {
    type Record = JsonValue;

    fn apply_filter(&mut self, filters: &FilterSet) -> Result<()> {
        self.filters.extend(filters.clone());
        Ok(())
    }

    fn apply_sort(&mut self, sort: &SortSpec) -> Result<()> {
        self.sort = sort.clone();
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        self.count_calls.set(self.count_calls.get() + 1);
        Ok(self.matching().count() as u64)
    }

    fn fetch(&self, offset: u64, limit: Option<u64>) -> Result<Vec<JsonValue>> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);

        let mut rows: Vec<&JsonValue> = self.matching().collect();
        // stable sort keeps insertion order for rows equal on every field
        rows.sort_by(|a, b| {
            self.sort
                .iter()
                .map(|field| {
                    let ord = compare_values(a.get(field.field()), b.get(field.field()));
                    if field.direction().is_desc() {
                        ord.reverse()
                    } else {
                        ord
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(rows.into_iter().skip(skip).take(take).cloned().collect())
    }
}

/// Total order over JSON scalars: missing and null first, then booleans,
/// numbers, strings, and anything else by its serialized form
fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    fn rank(v: Option<&JsonValue>) -> u8 {
        match v {
            None | Some(JsonValue::Null) => 0,
            Some(JsonValue::Bool(_)) => 1,
            Some(JsonValue::Number(_)) => 2,
            Some(JsonValue::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => compare_numbers(x, y),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(x), Some(y)) if rank(a) == 4 && rank(b) == 4 => x.to_string().cmp(&y.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Integers compare exactly; floats fall back to `f64`
fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    match (x.as_i64(), y.as_i64(), x.as_u64(), y.as_u64()) {
        (Some(a), Some(b), _, _) => a.cmp(&b),
        (_, _, Some(a), Some(b)) => a.cmp(&b),
        // one side is a u64 beyond i64 and the other a negative i64
        (Some(_), None, _, Some(_)) => Ordering::Less,
        (None, Some(_), Some(_), _) => Ordering::Greater,
        _ => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
    }
}
