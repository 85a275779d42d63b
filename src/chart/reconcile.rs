//! Keyed enter/update/exit reconciliation.
//!
//! Each pass compares the entities currently on the surface with the target
//! set and splits them by [`EntityKey`]:
//!
//! - **enter**: in the target, not on the surface
//! - **update**: in both; carries the new attributes
//! - **exit**: on the surface, not in the target
//!
//! Surfaces apply enter, then update, then exit.

use std::collections::BTreeMap;

use crate::chart::entity::{EntityKey, RenderEntity};

/// Instructions for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatch {
    /// Entities to create.
    pub enter: Vec<RenderEntity>,
    /// Entities to restyle or move.
    pub update: Vec<RenderEntity>,
    /// Entities to remove.
    pub exit: Vec<EntityKey>,
}

impl RenderBatch {
    /// Whether the batch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }

    /// Keys entering the surface.
    pub fn enter_keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.enter.iter().map(RenderEntity::key)
    }

    /// Keys being updated.
    pub fn update_keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.update.iter().map(RenderEntity::key)
    }
}

/// Split a target set against the previously rendered set.
///
/// If `target` repeats a key, the last entity wins.
#[must_use]
pub fn diff(previous: &BTreeMap<EntityKey, RenderEntity>, target: &[RenderEntity]) -> RenderBatch {
    let mut wanted: BTreeMap<EntityKey, &RenderEntity> = BTreeMap::new();
    for entity in target {
        wanted.insert(entity.key(), entity);
    }

    let mut batch = RenderBatch::default();
    for (key, entity) in &wanted {
        if previous.contains_key(key) {
            batch.update.push((*entity).clone());
        } else {
            batch.enter.push((*entity).clone());
        }
    }
    batch.exit = previous
        .keys()
        .filter(|key| !wanted.contains_key(*key))
        .cloned()
        .collect();
    batch
}

/// Remembers what is on the surface between passes.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    rendered: BTreeMap<EntityKey, RenderEntity>,
}

impl Reconciler {
    /// Create a reconciler for an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff against the target and record the target as rendered.
    pub fn pass(&mut self, target: Vec<RenderEntity>) -> RenderBatch {
        let batch = diff(&self.rendered, &target);
        log::debug!(
            "reconcile: {} enter, {} update, {} exit",
            batch.enter.len(),
            batch.update.len(),
            batch.exit.len()
        );
        self.rendered = target.into_iter().map(|e| (e.key(), e)).collect();
        batch
    }

    /// Entities currently on the surface.
    #[must_use]
    pub fn rendered(&self) -> &BTreeMap<EntityKey, RenderEntity> {
        &self.rendered
    }

    /// Look up a rendered entity.
    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<&RenderEntity> {
        self.rendered.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::entity::{LegendEntity, LineEntity, PointEntity};

    fn line(genre: &str) -> RenderEntity {
        RenderEntity::Line(LineEntity {
            genre: genre.to_string(),
            color: "#4e79a7",
            path: vec![(0.0, 0.0)],
        })
    }

    fn point(genre: &str, year: i32, y: f64) -> RenderEntity {
        RenderEntity::Point(PointEntity {
            genre: genre.to_string(),
            year,
            value: 1.0,
            x: 0.0,
            y,
            color: "#4e79a7",
        })
    }

    fn legend(genre: &str, opacity: f64) -> RenderEntity {
        RenderEntity::LegendItem(LegendEntity {
            genre: genre.to_string(),
            color: "#4e79a7",
            opacity,
            visible: opacity == 1.0,
            slot: 0,
        })
    }

    #[test]
    fn test_first_pass_is_all_enter() {
        let mut reconciler = Reconciler::new();
        let batch = reconciler.pass(vec![line("Action"), point("Action", 2001, 5.0)]);
        assert_eq!(batch.enter.len(), 2);
        assert!(batch.update.is_empty());
        assert!(batch.exit.is_empty());
        assert_eq!(reconciler.rendered().len(), 2);
    }

    #[test]
    fn test_sets_are_disjoint_by_key() {
        let mut reconciler = Reconciler::new();
        reconciler.pass(vec![line("Action"), point("Action", 2001, 5.0), legend("Action", 1.0)]);

        let batch = reconciler.pass(vec![
            point("Action", 2001, 7.0),
            point("Action", 2002, 3.0),
            legend("Action", 1.0),
        ]);

        assert_eq!(
            batch.enter_keys().collect::<Vec<_>>(),
            vec![EntityKey::Point("Action".into(), 2002)]
        );
        assert_eq!(
            batch.update_keys().collect::<Vec<_>>(),
            vec![
                EntityKey::Point("Action".into(), 2001),
                EntityKey::LegendItem("Action".into()),
            ]
        );
        assert_eq!(batch.exit, vec![EntityKey::Line("Action".into())]);
    }

    #[test]
    fn test_update_carries_new_attributes() {
        let mut reconciler = Reconciler::new();
        reconciler.pass(vec![legend("Action", 1.0)]);
        let batch = reconciler.pass(vec![legend("Action", 0.25)]);
        assert_eq!(batch.update, vec![legend("Action", 0.25)]);
        assert_eq!(
            reconciler.get(&EntityKey::LegendItem("Action".into())),
            Some(&legend("Action", 0.25))
        );
    }

    #[test]
    fn test_empty_target_exits_everything() {
        let mut reconciler = Reconciler::new();
        reconciler.pass(vec![line("Action"), line("Puzzle")]);
        let batch = reconciler.pass(Vec::new());
        assert_eq!(batch.exit.len(), 2);
        assert!(reconciler.rendered().is_empty());
    }

    #[test]
    fn test_identical_pass_is_update_only() {
        let mut reconciler = Reconciler::new();
        let target = vec![line("Action"), point("Action", 2001, 1.0)];
        reconciler.pass(target.clone());
        let batch = reconciler.pass(target);
        assert!(batch.enter.is_empty());
        assert!(batch.exit.is_empty());
        assert_eq!(batch.update.len(), 2);
        assert!(!batch.is_empty());
    }
}
