//! Axis domains and genre color assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::Series;

/// Categorical palette (Tableau 10).
pub const PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// Upper bound used when the data gives nothing positive to scale to.
pub const MIN_VALUE_CEILING: f64 = 1.0;

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearDomain {
    /// Earliest year.
    pub min: i32,
    /// Latest year.
    pub max: i32,
}

/// Value range, always starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    /// Lower bound (zero).
    pub min: f64,
    /// Upper bound, at least [`MIN_VALUE_CEILING`] when the data is empty or all zero.
    pub max: f64,
}

/// Both axis domains for one pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domains {
    /// Year range, `None` when there are no points.
    pub years: Option<YearDomain>,
    /// Value range.
    pub values: ValueDomain,
}

impl Domains {
    /// Compute domains over every series, visible or not.
    #[must_use]
    pub fn compute(series: &[Series]) -> Self {
        let points = || series.iter().flat_map(|s| s.points.iter());

        let years = points().fold(None, |acc: Option<YearDomain>, p| {
            Some(match acc {
                None => YearDomain {
                    min: p.year,
                    max: p.year,
                },
                Some(d) => YearDomain {
                    min: d.min.min(p.year),
                    max: d.max.max(p.year),
                },
            })
        });

        let max = points()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        let max = if max > 0.0 { max } else { MIN_VALUE_CEILING };

        Self {
            years,
            values: ValueDomain { min: 0.0, max },
        }
    }
}

/// Genre → palette color, assigned in first-seen order.
///
/// Assignments only grow: a genre that drops out of the filtered series
/// keeps its color for when it comes back. [`ColorAssignment::reset`] starts
/// over and is reserved for dataset replacement.
#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    slots: HashMap<String, usize>,
}

impl ColorAssignment {
    /// Create an empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign colors to any genre in `series` not seen before.
    pub fn assign(&mut self, series: &[Series]) {
        for s in series {
            if !self.slots.contains_key(&s.genre) {
                let slot = self.slots.len();
                self.slots.insert(s.genre.clone(), slot);
            }
        }
    }

    /// Color for a genre, if assigned.
    #[must_use]
    pub fn color(&self, genre: &str) -> Option<&'static str> {
        self.slot(genre).map(|slot| PALETTE[slot % PALETTE.len()])
    }

    /// Order in which the genre was first assigned.
    #[must_use]
    pub fn slot(&self, genre: &str) -> Option<usize> {
        self.slots.get(genre).copied()
    }

    /// Assigned genres with their colors, in assignment order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, &'static str)> {
        let mut entries: Vec<(&String, usize)> = self.slots.iter().map(|(g, s)| (g, *s)).collect();
        entries.sort_by_key(|(_, slot)| *slot);
        entries
            .into_iter()
            .map(|(genre, slot)| (genre.clone(), PALETTE[slot % PALETTE.len()]))
            .collect()
    }

    /// Drop every assignment.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Number of assigned genres.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
