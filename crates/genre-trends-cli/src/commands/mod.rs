//! CLI subcommands.

pub mod render;
pub mod series;
pub mod session;

use std::path::Path;

use anyhow::{Context, Result};
use genre_trends::{ChartConfig, Controller, RenderFrame};

use crate::Selection;

/// Load the selected dataset into the controller.
///
/// The source is picked by file extension and reads the selection's columns.
pub fn load(controller: &mut Controller, selection: &Selection) -> Result<RenderFrame> {
    let source = genre_trends::open_source(selection.input.clone(), selection.schema());
    let frame = controller
        .load_from(source.as_ref())
        .with_context(|| format!("Failed to load {}", source.name()))?;
    log::info!("{} genres from {}", controller.series().len(), source.name());
    Ok(frame)
}

/// Read a chart config file, or use defaults.
pub fn chart_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display())),
        None => Ok(ChartConfig::default()),
    }
}

/// Controller preset with the selection's filters and columns.
pub fn controller(selection: &Selection, config: ChartConfig) -> Controller {
    Controller::new(config)
        .with_schema(selection.schema())
        .with_region(selection.region)
        .with_family(selection.family)
}
