//! Row filtering and per-genre sum aggregation.
//!
//! [`aggregate`] turns raw records into one [`Series`] per surviving genre.
//! Cell problems never fail the pass:
//!
//! - a non-numeric, non-finite or missing metric cell contributes `0.0`
//! - sums saturate at `f64::MAX` rather than overflowing to infinity
//! - a missing or empty genre becomes `"Unknown"`
//! - a year that is not an integer `>= 2000` drops the row
//!
//! Series come out in the order their genre was first seen among surviving
//! rows. That order seeds color assignment; nothing else may depend on it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::import::{RawRecord, RecordSchema};
use crate::platform::FamilyFilter;

/// Earliest year kept by the aggregator.
pub const MIN_YEAR: i32 = 2000;

/// Genre used when a record has none.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// A record after coercion, before grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// Release year.
    pub year: i32,
    /// Genre, or [`UNKNOWN_GENRE`].
    pub genre: String,
    /// Raw platform label (possibly empty).
    pub platform_label: String,
    /// Selected metric value.
    pub value: f64,
}

impl ParsedRow {
    /// Coerce a raw record, returning `None` when the year disqualifies it.
    #[must_use]
    pub fn parse(record: &RawRecord, schema: &RecordSchema, region_key: &str) -> Option<Self> {
        let year = parse_year(record.get(&schema.year_column)?)?;

        let genre = match record.get(&schema.genre_column) {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => UNKNOWN_GENRE.to_string(),
        };

        Some(Self {
            year,
            genre,
            platform_label: record.get(&schema.platform_column).unwrap_or("").to_string(),
            value: record.get(region_key).map_or(0.0, coerce_value),
        })
    }
}

/// One (year, value) sample of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Year.
    pub year: i32,
    /// Summed metric for the year.
    pub value: f64,
}

/// Summed values for one genre, ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Genre name.
    pub genre: String,
    /// Points with unique, strictly ascending years.
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// Sum of all point values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Value for a year, if present.
    #[must_use]
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|i| self.points[i].value)
    }
}

/// Aggregate records using the default column names.
///
/// # Example
///
/// ```
/// use genre_trends::aggregate::aggregate;
/// use genre_trends::import::RawRecord;
/// use genre_trends::platform::FamilyFilter;
///
/// let rows = vec![
///     RawRecord::new().with("Year", "2001").with("Genre", "Action")
///         .with("Platform", "PS2").with("Global_Sales", "1.5"),
///     RawRecord::new().with("Year", "2001").with("Genre", "Action")
///         .with("Platform", "PS3").with("Global_Sales", "2.0"),
/// ];
///
/// let series = aggregate(&rows, "Global_Sales", FamilyFilter::All);
/// assert_eq!(series.len(), 1);
/// assert_eq!(series[0].points[0].value, 3.5);
/// ```
#[must_use]
pub fn aggregate(rows: &[RawRecord], region_key: &str, family: FamilyFilter) -> Vec<Series> {
    aggregate_with(rows, &RecordSchema::default(), region_key, family)
}

/// Aggregate records with custom column names.
#[must_use]
pub fn aggregate_with(
    rows: &[RawRecord],
    schema: &RecordSchema,
    region_key: &str,
    family: FamilyFilter,
) -> Vec<Series> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, BTreeMap<i32, f64>> = HashMap::new();
    let mut kept = 0usize;

    for row in rows
        .iter()
        .filter_map(|r| ParsedRow::parse(r, schema, region_key))
        .filter(|r| family.accepts(&r.platform_label))
    {
        kept += 1;
        if !groups.contains_key(&row.genre) {
            order.push(row.genre.clone());
        }
        let sum = groups
            .entry(row.genre)
            .or_default()
            .entry(row.year)
            .or_insert(0.0);
        *sum = saturating_add(*sum, row.value);
    }

    log::debug!(
        "aggregated {} of {} rows into {} series (region={}, family={})",
        kept,
        rows.len(),
        order.len(),
        region_key,
        family
    );

    order
        .into_iter()
        .filter_map(|genre| {
            let years = groups.remove(&genre)?;
            Some(Series {
                genre,
                points: years
                    .into_iter()
                    .map(|(year, value)| SeriesPoint { year, value })
                    .collect(),
            })
        })
        .collect()
}

/// Parse a year cell; accepts only integral values `>= MIN_YEAR`.
fn parse_year(cell: &str) -> Option<i32> {
    let year: f64 = cell.trim().parse().ok()?;
    if !year.is_finite()
        || year.fract() != 0.0
        || year < f64::from(MIN_YEAR)
        || year > f64::from(i32::MAX)
    {
        return None;
    }
    Some(year as i32)
}

/// Add two finite values, clamping to `±f64::MAX` instead of overflowing to infinity.
fn saturating_add(a: f64, b: f64) -> f64 {
    (a + b).clamp(f64::MIN, f64::MAX)
}

/// Coerce a metric cell; anything unusable is `0.0`.
fn coerce_value(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
