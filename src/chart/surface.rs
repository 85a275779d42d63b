//! The seam between the pipeline and whatever draws the chart.

use crate::chart::domain::Domains;
use crate::chart::entity::EntityKey;
use crate::chart::reconcile::RenderBatch;

/// Everything a surface needs for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Enter/update/exit instructions.
    pub batch: RenderBatch,
    /// Axis domains for this pass.
    pub domains: Domains,
    /// Color assignment snapshot, in assignment order.
    pub colors: Vec<(String, &'static str)>,
}

/// User gestures a surface reports back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Pointer entered an entity.
    Hover(EntityKey),
    /// Pointer left the hovered entity.
    HoverEnd,
    /// A legend row was clicked.
    LegendClick(String),
}

/// Tooltip content anchored at a point marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Entity the tooltip describes.
    pub key: EntityKey,
    /// Text lines, top to bottom.
    pub lines: Vec<String>,
    /// Anchor in plot-area pixels.
    pub anchor: (f64, f64),
}

/// Something that draws render frames.
pub trait RenderSurface {
    /// Apply a frame: enter, then update, then exit.
    fn apply(&mut self, frame: &RenderFrame);

    /// Show or clear the tooltip.
    fn set_tooltip(&mut self, tooltip: Option<Tooltip>);
}
