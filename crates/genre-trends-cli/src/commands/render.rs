//! Render command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use genre_trends::{Controller, RenderSurface, SvgSurface, Trigger};

use crate::Selection;

pub fn run(
    selection: &Selection,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    hide: &[String],
) -> Result<()> {
    let config = super::chart_config(config.as_deref())?;
    let mut controller = super::controller(selection, config.clone());
    let mut surface = SvgSurface::new(config);

    let frame = super::load(&mut controller, selection)?;
    surface.apply(&frame);
    let hidden = hide_genres(&mut controller, &mut surface, hide);
    log::debug!("{} entities on the surface", surface.scene().len());

    let svg = surface.to_svg();
    match output {
        Some(path) => {
            std::fs::write(&path, svg)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            eprintln!(
                "Rendered {} genres ({} hidden) to {}",
                controller.series().len(),
                hidden,
                path.display()
            );
        }
        None => print!("{svg}"),
    }

    Ok(())
}

/// Hide each listed genre present in the current series. Returns how many
/// genres ended up hidden by this call.
fn hide_genres(
    controller: &mut Controller,
    surface: &mut dyn RenderSurface,
    hide: &[String],
) -> usize {
    let mut hidden = 0;
    for genre in hide {
        if !controller.series().iter().any(|s| &s.genre == genre) {
            log::warn!("--hide {}: no such genre in the current selection", genre);
            continue;
        }
        if controller.visibility().is_visible(genre) {
            controller.dispatch(Trigger::VisibilityToggled(genre.clone()), surface);
            hidden += 1;
        }
    }
    hidden
}
