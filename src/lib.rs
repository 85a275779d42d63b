//! # genre-trends
//!
//! Sales-by-genre time chart pipeline.
//!
//! Raw tabular records go through a fixed pipeline: filter and sum them into
//! one series per genre, derive axis domains and genre colors, then diff the
//! resulting lines, point markers and legend rows against what is already on
//! screen. The output of each pass is an explicit enter/update/exit batch, so
//! any drawing backend can apply it; an SVG backend is included.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use genre_trends::{ChartConfig, Controller, CsvSource, RenderSurface, SvgSurface, Trigger};
//!
//! let mut controller = Controller::new(ChartConfig::default());
//! let mut surface = SvgSurface::new(ChartConfig::default());
//!
//! let frame = controller.load_from(&CsvSource::new("vgsales.csv"))?;
//! surface.apply(&frame);
//!
//! let frame = controller.handle(Trigger::VisibilityToggled("Sports".into()));
//! surface.apply(&frame);
//!
//! std::fs::write("chart.svg", surface.to_svg())?;
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`import`]: Data sources (CSV, JSON) and raw records
//! - [`platform`]: Platform family classification and the family filter
//! - [`region`]: Sales region selector
//! - [`aggregate`]: Filtering and per-genre sum aggregation
//! - [`visibility`]: Per-genre shown/hidden state
//! - [`chart`]: Domains, colors, scales, entities, reconciliation, SVG output
//! - [`controller`]: The trigger-driven interaction controller
//! - [`config`]: Chart layout configuration
//! - [`report`]: JSON snapshot of a pipeline pass

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod import;
pub mod platform;
pub mod region;
pub mod report;
pub mod visibility;

// Re-export commonly used types
pub use aggregate::{Series, SeriesPoint, aggregate, aggregate_with};
pub use chart::{
    ColorAssignment, Domains, EntityKey, Gesture, RenderBatch, RenderEntity, RenderFrame,
    RenderSurface, SvgSurface, Tooltip,
};
pub use config::ChartConfig;
pub use controller::{Controller, FilterChange, GestureResponse, LoadOutcome, LoadTicket, Trigger};
pub use error::{Error, Result};
pub use import::{CsvSource, DataSource, JsonSource, RawRecord, RecordSchema, open_source};
pub use platform::{FamilyFilter, PlatformFamily, classify};
pub use region::Region;
pub use report::SeriesReport;
pub use visibility::VisibilityState;
