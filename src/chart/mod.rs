//! Everything between aggregated series and pixels.
//!
//! - [`domain`]: axis domains and genre colors
//! - [`scale`]: linear scales and tick generation
//! - [`entity`]: render entities, identity keys, target-set construction
//! - [`reconcile`]: keyed enter/update/exit diffing
//! - [`surface`]: the render-surface seam
//! - [`svg`]: SVG implementation of the surface

pub mod domain;
pub mod entity;
pub mod reconcile;
pub mod scale;
pub mod surface;
pub mod svg;

pub use domain::{ColorAssignment, Domains, PALETTE, ValueDomain, YearDomain};
pub use entity::{EntityKey, LegendEntity, LineEntity, PointEntity, RenderEntity, target_entities};
pub use reconcile::{Reconciler, RenderBatch, diff};
pub use scale::{LinearScale, Scales};
pub use surface::{Gesture, RenderFrame, RenderSurface, Tooltip};
pub use svg::{ApplyStats, SvgSurface};
