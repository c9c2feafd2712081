//! DuckDB-based query collaborator
//!
//! Runs count and page queries against tables of an embedded DuckDB
//! database. Identifiers are validated and quoted, filter values are bound
//! as parameters, and rows come back as JSON objects.

use crate::error::{Error, Result};
use crate::query::{Filter, FilterSet, Query, SortSpec};
use crate::types::{JsonObject, JsonValue};
use duckdb::types::Value as DbValue;
use duckdb::Connection;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Largest OFFSET DuckDB accepts
const MAX_OFFSET: u64 = (1 << 62) - 1;

/// Plain, unqualified SQL identifier
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Embedded DuckDB database
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: Connection,
    /// File path or `:memory:` (for logging)
    location: String,
}

impl DatabaseEngine {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!(
                "Failed to open DuckDB database '{}': {e}",
                path.display()
            ))
        })?;

        Ok(Self {
            conn,
            location: path.display().to_string(),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;

        Ok(Self {
            conn,
            location: ":memory:".to_string(),
        })
    }

    /// Run one or more statements, e.g. schema setup or fixtures
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Test database connection
    pub fn check_connection(&self) -> Result<()> {
        self.conn.execute("SELECT 1", [])?;
        Ok(())
    }

    /// Get list of tables in the database
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables ORDER BY table_schema, table_name",
        )?;

        let tables = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(tables)
    }

    /// Start a query over `table`
    pub fn query(&self, table: &str) -> Result<DuckDbQuery<'_>> {
        let table = ensure_identifier(table).map_err(Error::config)?;

        let columns = self.table_columns(table).map_err(|e| {
            Error::config(format!(
                "Table '{table}' is not available in {}: {e}",
                self.location
            ))
        })?;

        if columns.is_empty() {
            return Err(Error::config(format!(
                "Table '{table}' does not exist in {}",
                self.location
            )));
        }

        Ok(DuckDbQuery {
            conn: &self.conn,
            table: table.to_string(),
            columns,
            filters: FilterSet::new(),
            sort: SortSpec::default(),
        })
    }

    /// File path or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }

    fn table_columns(&self, table: &str) -> std::result::Result<Vec<String>, duckdb::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name FROM pragma_table_info('{table}') ORDER BY cid"
        ))?;
        let columns = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(columns)
    }
}

// ============================================================================
// Query
// ============================================================================

/// Query over one DuckDB table
pub struct DuckDbQuery<'c> {
    conn: &'c Connection,
    table: String,
    columns: Vec<String>,
    filters: FilterSet,
    sort: SortSpec,
}

impl DuckDbQuery<'_> {
    /// Columns of the table, in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// `WHERE` clause and its bound values
    fn where_clause(&self) -> (String, Vec<DbValue>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        for filter in self.filters.iter() {
            let column = quote(filter.field());
            match filter {
                Filter::Equals { value, .. } => {
                    let column = comparand(&column, value.is_string());
                    clauses.push(format!("{column} = ?"));
                    params.push(json_to_db_value(value));
                }
                Filter::In { values, .. } if values.is_empty() => {
                    clauses.push("FALSE".to_string());
                }
                Filter::In { values, .. } => {
                    let column = comparand(&column, values.iter().all(JsonValue::is_string));
                    let placeholders = vec!["?"; values.len()].join(", ");
                    clauses.push(format!("{column} IN ({placeholders})"));
                    params.extend(values.iter().map(json_to_db_value));
                }
            }
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), params)
        }
    }

    fn order_clause(&self) -> String {
        if self.sort.is_empty() {
            return String::new();
        }

        // nulls sort before any value, matching the in-memory collaborator
        let fields = self
            .sort
            .iter()
            .map(|field| {
                let nulls = if field.direction().is_desc() {
                    "NULLS LAST"
                } else {
                    "NULLS FIRST"
                };
                format!(
                    "{} {} {nulls}",
                    quote(field.field()),
                    field.direction().as_sql()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(" ORDER BY {fields}")
    }
}

impl Query for DuckDbQuery<'_> {
    type Record = JsonValue;

    fn apply_filter(&mut self, filters: &FilterSet) -> Result<()> {
        for filter in filters.iter() {
            if !self.has_column(filter.field()) {
                return Err(Error::invalid_filter(format!(
                    "unknown column '{}' on '{}'",
                    filter.field(),
                    self.table
                )));
            }
        }
        self.filters.extend(filters.clone());
        Ok(())
    }

    fn apply_sort(&mut self, sort: &SortSpec) -> Result<()> {
        for field in sort.iter() {
            if !self.has_column(field.field()) {
                return Err(Error::invalid_sort(format!(
                    "unknown column '{}' on '{}'",
                    field.field(),
                    self.table
                )));
            }
        }
        self.sort = sort.clone();
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let (where_sql, params) = self.where_clause();
        let sql = format!("SELECT COUNT(*) FROM {}{where_sql}", quote(&self.table));

        tracing::debug!("Executing count query: {}", sql);

        let count: i64 = self
            .conn
            .query_row(&sql, duckdb::params_from_iter(params), |row| row.get(0))?;

        u64::try_from(count)
            .map_err(|_| Error::query(format!("count on '{}' returned {count}", self.table)))
    }

    fn fetch(&self, offset: u64, limit: Option<u64>) -> Result<Vec<JsonValue>> {
        if offset > MAX_OFFSET {
            tracing::debug!(offset, "Offset beyond any table, skipping page query");
            return Ok(Vec::new());
        }

        let (where_sql, params) = self.where_clause();
        let select = self
            .columns
            .iter()
            .map(|c| quote(c))
            .collect::<Vec<_>>()
            .join(", ");
        let limit_sql = limit.map(|l| format!(" LIMIT {l}")).unwrap_or_default();
        let sql = format!(
            "SELECT {select} FROM {}{where_sql}{}{limit_sql} OFFSET {offset}",
            quote(&self.table),
            self.order_clause(),
        );

        tracing::debug!("Executing page query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let columns = &self.columns;
        let rows = stmt
            .query_map(duckdb::params_from_iter(params), |row| {
                let mut record = JsonObject::new();
                for (i, name) in columns.iter().enumerate() {
                    let value: DbValue = row.get(i)?;
                    record.insert(name.clone(), duckdb_value_to_json(value));
                }
                Ok(JsonValue::Object(record))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn ensure_identifier(name: &str) -> std::result::Result<&str, String> {
    if IDENTIFIER_REGEX.is_match(name) {
        Ok(name)
    } else {
        Err(format!("'{name}' is not a valid identifier"))
    }
}

/// Query strings carry every filter value as text, so text values are
/// compared against the column's text form
fn comparand(column: &str, textual: bool) -> String {
    if textual {
        format!("CAST({column} AS VARCHAR)")
    } else {
        column.to_string()
    }
}

/// Double-quote an identifier
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Convert a filter value to a bindable DuckDB value
fn json_to_db_value(value: &JsonValue) -> DbValue {
    match value {
        JsonValue::Null => DbValue::Null,
        JsonValue::Bool(b) => DbValue::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => DbValue::BigInt(i),
            None => n.as_f64().map_or(DbValue::Null, DbValue::Double),
        },
        JsonValue::String(s) => DbValue::Text(s.clone()),
        other => DbValue::Text(other.to_string()),
    }
}

/// Convert DuckDB Value to JSON Value
fn duckdb_value_to_json(value: DbValue) -> JsonValue {
    match value {
        DbValue::Null => JsonValue::Null,
        DbValue::Boolean(b) => JsonValue::Bool(b),
        DbValue::TinyInt(i) => JsonValue::Number(i.into()),
        DbValue::SmallInt(i) => JsonValue::Number(i.into()),
        DbValue::Int(i) => JsonValue::Number(i.into()),
        DbValue::BigInt(i) => JsonValue::Number(i.into()),
        DbValue::HugeInt(i) => JsonValue::String(i.to_string()),
        DbValue::UTinyInt(i) => JsonValue::Number(i.into()),
        DbValue::USmallInt(i) => JsonValue::Number(i.into()),
        DbValue::UInt(i) => JsonValue::Number(i.into()),
        DbValue::UBigInt(i) => JsonValue::Number(i.into()),
        DbValue::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        DbValue::Double(f) => serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        DbValue::Text(s) => JsonValue::String(s),
        DbValue::Blob(b) => JsonValue::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        DbValue::Timestamp(_, i) => {
            // microseconds since epoch
            let secs = i.div_euclid(1_000_000);
            let nsecs = (i.rem_euclid(1_000_000) * 1000) as u32;
            chrono::DateTime::from_timestamp(secs, nsecs)
                .map(|dt| JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
                .unwrap_or(JsonValue::Number(i.into()))
        }
        DbValue::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
                .map(|date| JsonValue::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(JsonValue::Number(d.into()))
        }
        DbValue::Time64(_, t) => {
            // Microseconds since midnight
            let secs = t / 1_000_000;
            let micros = t % 1_000_000;
            JsonValue::String(format!(
                "{:02}:{:02}:{:02}.{:06}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                micros
            ))
        }
        other => JsonValue::String(format!("{other:?}")),
    }
}
