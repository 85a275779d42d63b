//! Data sources for raw sales records.
//!
//! A [`DataSource`] hands the pipeline a batch of [`RawRecord`]s: opaque
//! column name → string value maps. Nothing here interprets cell contents;
//! coercion and filtering happen in [`crate::aggregate`].
//!
//! ## Supported Formats
//!
//! - CSV with a header row ([`CsvSource`])
//! - JSON array of flat objects ([`JsonSource`])
//!
//! [`open_source`] picks between them by file extension.
//!
//! Header names that match the [`RecordSchema`] columns or a known
//! [`Region`] column case-insensitively are rewritten to their canonical
//! spelling, so `year,genre,platform,global_sales` loads the same as the
//! canonical `Year,Genre,Platform,Global_Sales`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use genre_trends::import::{CsvSource, DataSource};
//!
//! let records = CsvSource::new("vgsales.csv").load()?;
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::region::Region;

/// One row as supplied by a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Look up a column value by exact name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Number of columns present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Column names the pipeline reads besides the region metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Column holding the release year.
    pub year_column: String,
    /// Column holding the genre.
    pub genre_column: String,
    /// Column holding the platform label.
    pub platform_column: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            year_column: "Year".to_string(),
            genre_column: "Genre".to_string(),
            platform_column: "Platform".to_string(),
        }
    }
}

impl RecordSchema {
    /// Create a schema builder.
    #[must_use]
    pub fn builder() -> RecordSchemaBuilder {
        RecordSchemaBuilder::default()
    }

    /// Canonical column names a source should normalize headers to.
    fn canonical_columns(&self) -> Vec<&str> {
        let mut columns = vec![
            self.year_column.as_str(),
            self.genre_column.as_str(),
            self.platform_column.as_str(),
        ];
        columns.extend(Region::all().iter().map(|r| r.column()));
        columns
    }

    /// Rewrite headers that match a canonical column case-insensitively.
    fn canonicalize(&self, headers: &mut [String]) {
        let canonical = self.canonical_columns();
        for header in headers.iter_mut() {
            let trimmed = header.trim();
            if let Some(idx) = find_header_index(&canonical, trimmed) {
                *header = canonical[idx].to_string();
            } else if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
    }

    /// Fail when the year column is absent; without it no row can survive.
    fn require_year(&self, headers: &[String], source_name: &str) -> Result<()> {
        if headers.iter().any(|h| *h == self.year_column) {
            Ok(())
        } else {
            Err(Error::Load {
                source_name: source_name.to_string(),
                reason: format!("no '{}' column", self.year_column),
            })
        }
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug, Default)]
pub struct RecordSchemaBuilder {
    schema: RecordSchema,
}

impl RecordSchemaBuilder {
    /// Set the year column name.
    #[must_use]
    pub fn year_column(mut self, name: impl Into<String>) -> Self {
        self.schema.year_column = name.into();
        self
    }

    /// Set the genre column name.
    #[must_use]
    pub fn genre_column(mut self, name: impl Into<String>) -> Self {
        self.schema.genre_column = name.into();
        self
    }

    /// Set the platform column name.
    #[must_use]
    pub fn platform_column(mut self, name: impl Into<String>) -> Self {
        self.schema.platform_column = name.into();
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> RecordSchema {
        self.schema
    }
}

/// Anything that can supply a dataset on demand.
pub trait DataSource {
    /// Human-readable name, used in logs and errors.
    fn name(&self) -> String;

    /// Read the full dataset.
    fn load(&self) -> Result<Vec<RawRecord>>;
}

/// CSV file source.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    schema: RecordSchema,
}

impl CsvSource {
    /// Create a source reading the given file with the default schema.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schema: RecordSchema::default(),
        }
    }

    /// Use a custom schema for header normalization.
    #[must_use]
    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl DataSource for CsvSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<RawRecord>> {
        let file = std::fs::File::open(&self.path)?;
        let records = read_csv(file, &self.schema, &self.name())?;
        log::info!("loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// JSON file source: an array of flat objects.
///
/// Scalar values are stringified; `null` cells are treated as missing.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
    schema: RecordSchema,
}

impl JsonSource {
    /// Create a source reading the given file with the default schema.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schema: RecordSchema::default(),
        }
    }

    /// Use a custom schema for header normalization.
    #[must_use]
    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl DataSource for JsonSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<RawRecord>> {
        let content = std::fs::read_to_string(&self.path)?;
        let records = parse_json(&content, &self.schema, &self.name())?;
        log::info!("loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Pick a source for a file by extension: `.json` reads as JSON, anything
/// else as CSV.
#[must_use]
pub fn open_source(path: impl Into<PathBuf>, schema: RecordSchema) -> Box<dyn DataSource> {
    let path = path.into();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonSource::new(path).with_schema(schema))
    } else {
        Box::new(CsvSource::new(path).with_schema(schema))
    }
}

/// Read CSV records from any reader.
pub fn read_csv<R: Read>(
    reader: R,
    schema: &RecordSchema,
    source_name: &str,
) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    schema.canonicalize(&mut headers);
    schema.require_year(&headers, source_name)?;

    let mut records: Vec<RawRecord> = Vec::new();
    for (line_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::CsvRecord {
            line: line_num + 2, // +2 for 1-based and header
            reason: e.to_string(),
        })?;

        records.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), v))
                .collect(),
        );
    }

    Ok(records)
}

/// Parse a JSON array of flat objects.
pub fn parse_json(content: &str, schema: &RecordSchema, source_name: &str) -> Result<Vec<RawRecord>> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(content)?;

    let mut records = Vec::with_capacity(rows.len());
    let mut saw_year = rows.is_empty();
    for row in rows {
        let mut keys: Vec<String> = row.keys().cloned().collect();
        schema.canonicalize(&mut keys);
        saw_year |= keys.iter().any(|k| *k == schema.year_column);

        let record: RawRecord = keys
            .into_iter()
            .zip(row.into_iter())
            .filter_map(|(key, (_, value))| json_cell(value).map(|v| (key, v)))
            .collect();
        records.push(record);
    }

    if !saw_year {
        return Err(Error::Load {
            source_name: source_name.to_string(),
            reason: format!("no '{}' column", schema.year_column),
        });
    }

    Ok(records)
}

fn json_cell(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[&str], name: &str) -> Option<usize> {
    let name_lower = name.to_lowercase();
    headers.iter().position(|h| h.to_lowercase() == name_lower)
}
