//! Render entities and their identity keys.

use std::fmt;

use crate::aggregate::Series;
use crate::chart::domain::{ColorAssignment, PALETTE};
use crate::chart::scale::Scales;
use crate::config::ChartConfig;
use crate::visibility::VisibilityState;

/// Stable identity of a rendered element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    /// A series line, keyed by genre.
    Line(String),
    /// A point marker, keyed by genre and year.
    Point(String, i32),
    /// A legend row, keyed by genre.
    LegendItem(String),
}

impl EntityKey {
    /// Genre the entity belongs to.
    #[must_use]
    pub fn genre(&self) -> &str {
        match self {
            Self::Line(g) | Self::Point(g, _) | Self::LegendItem(g) => g,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(g) => write!(f, "line:{g}"),
            Self::Point(g, year) => write!(f, "point:{g}-{year}"),
            Self::LegendItem(g) => write!(f, "legend:{g}"),
        }
    }
}

/// Polyline for one visible series.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEntity {
    /// Genre.
    pub genre: String,
    /// Stroke color.
    pub color: &'static str,
    /// Vertices in plot-area pixels, ascending by year.
    pub path: Vec<(f64, f64)>,
}

/// Marker for one (genre, year) sample of a visible series.
#[derive(Debug, Clone, PartialEq)]
pub struct PointEntity {
    /// Genre.
    pub genre: String,
    /// Year.
    pub year: i32,
    /// Summed value, kept for tooltips.
    pub value: f64,
    /// Center x in plot-area pixels.
    pub x: f64,
    /// Center y in plot-area pixels.
    pub y: f64,
    /// Fill color.
    pub color: &'static str,
}

/// Legend row for one series, visible or not.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntity {
    /// Genre.
    pub genre: String,
    /// Swatch color.
    pub color: &'static str,
    /// Swatch opacity: 1.0 when visible, dimmed otherwise.
    pub opacity: f64,
    /// Whether the series is shown.
    pub visible: bool,
    /// Row index within the legend.
    pub slot: usize,
}

/// Anything the render surface draws.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEntity {
    /// Series line.
    Line(LineEntity),
    /// Point marker.
    Point(PointEntity),
    /// Legend row.
    LegendItem(LegendEntity),
}

impl RenderEntity {
    /// Identity used for reconciliation.
    #[must_use]
    pub fn key(&self) -> EntityKey {
        match self {
            Self::Line(l) => EntityKey::Line(l.genre.clone()),
            Self::Point(p) => EntityKey::Point(p.genre.clone(), p.year),
            Self::LegendItem(l) => EntityKey::LegendItem(l.genre.clone()),
        }
    }
}

/// Build the full target entity set for one pass.
///
/// Lines and points come from visible series only; legend rows come from
/// every series so hidden genres stay clickable. Legend rows are ordered by
/// color assignment.
#[must_use]
pub fn target_entities(
    series: &[Series],
    visibility: &VisibilityState,
    colors: &ColorAssignment,
    scales: &Scales,
    config: &ChartConfig,
) -> Vec<RenderEntity> {
    let color_of = |genre: &str| colors.color(genre).unwrap_or(PALETTE[0]);
    let mut entities = Vec::new();

    for s in series.iter().filter(|s| visibility.is_visible(&s.genre)) {
        let color = color_of(&s.genre);
        entities.push(RenderEntity::Line(LineEntity {
            genre: s.genre.clone(),
            color,
            path: s
                .points
                .iter()
                .map(|p| scales.position(p.year, p.value))
                .collect(),
        }));
        entities.extend(s.points.iter().map(|p| {
            let (x, y) = scales.position(p.year, p.value);
            RenderEntity::Point(PointEntity {
                genre: s.genre.clone(),
                year: p.year,
                value: p.value,
                x,
                y,
                color,
            })
        }));
    }

    let mut legend: Vec<&Series> = series.iter().collect();
    legend.sort_by_key(|s| colors.slot(&s.genre).unwrap_or(usize::MAX));
    entities.extend(legend.into_iter().enumerate().map(|(slot, s)| {
        let visible = visibility.is_visible(&s.genre);
        RenderEntity::LegendItem(LegendEntity {
            genre: s.genre.clone(),
            color: color_of(&s.genre),
            opacity: if visible { 1.0 } else { config.hidden_opacity },
            visible,
            slot,
        })
    }));

    entities
}
