//! Transform Cache
//!
//! Last observed scale per tracked object, plus the selection/filter snapshot
//! used to decide when the candidate list must be rebuilt.

use crate::object::{ObjectId, ObjectSnapshot, ObjectType};
use crate::Vec3;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Cache of baseline scales for selected, filter-eligible objects
#[derive(Debug, Default)]
pub struct TransformCache {
    /// Object -> last observed scale
    entries: HashMap<ObjectId, Vec3>,
    /// Selection seen at the last invalidation check
    last_selection: BTreeSet<ObjectId>,
    /// Enabled types seen at the last invalidation check
    last_types: BTreeSet<ObjectType>,
    /// Candidate ids computed at the last rebuild
    candidates: BTreeSet<ObjectId>,
}

impl TransformCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current scale of every object not already tracked
    pub fn seed(&mut self, objects: &[ObjectSnapshot]) {
        for obj in objects {
            self.entries.entry(obj.id.clone()).or_insert(obj.scale);
        }
    }

    /// Baseline scale of an object, if it has been observed
    pub fn get(&self, id: &ObjectId) -> Option<Vec3> {
        self.entries.get(id).copied()
    }

    /// Overwrite the baseline of a tracked object
    pub fn update(&mut self, id: &ObjectId, scale: Vec3) {
        if let Some(entry) = self.entries.get_mut(id) {
            *entry = scale;
        }
    }

    /// Rebuild the candidate set if the selection or the enabled types changed.
    ///
    /// `selected` is the full current selection. On a rebuild, entries that are
    /// no longer candidates or for which `exists` returns false are dropped.
    /// Returns true if a rebuild happened.
    pub fn invalidate_if_changed<F>(
        &mut self,
        selected: &[ObjectSnapshot],
        enabled_types: &BTreeSet<ObjectType>,
        exists: F,
    ) -> bool
    where
        F: Fn(&ObjectId) -> bool,
    {
        let selection: BTreeSet<ObjectId> = selected.iter().map(|o| o.id.clone()).collect();
        if selection == self.last_selection && *enabled_types == self.last_types {
            return false;
        }

        self.candidates = selected
            .iter()
            .filter(|o| enabled_types.contains(&o.object_type))
            .map(|o| o.id.clone())
            .collect();

        let before = self.entries.len();
        let candidates = &self.candidates;
        self.entries
            .retain(|id, _| candidates.contains(id) && exists(id));

        debug!(
            "Candidate set rebuilt: {} of {} selected (types {:?}), pruned {} entries",
            self.candidates.len(),
            selection.len(),
            enabled_types,
            before - self.entries.len()
        );

        self.last_selection = selection;
        self.last_types = enabled_types.clone();
        true
    }

    /// Filter a selection down to the candidates of the last rebuild
    pub fn candidates_in(&self, selected: &[ObjectSnapshot]) -> Vec<ObjectSnapshot> {
        selected
            .iter()
            .filter(|o| self.candidates.contains(&o.id))
            .cloned()
            .collect()
    }

    /// Whether the object is tracked
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.entries.contains_key(id)
    }

    /// Tracked object ids
    pub fn tracked(&self) -> impl Iterator<Item = &ObjectId> {
        self.entries.keys()
    }

    /// Number of tracked objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and snapshots
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_selection.clear();
        self.last_types.clear();
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(name: &str, s: f32) -> ObjectSnapshot {
        ObjectSnapshot::new(name, ObjectType::Mesh, Vec3::splat(s))
    }

    fn mesh_only() -> BTreeSet<ObjectType> {
        BTreeSet::from([ObjectType::Mesh])
    }

    #[test]
    fn test_seed_does_not_overwrite() {
        let mut cache = TransformCache::new();
        cache.seed(&[mesh("A", 1.0)]);
        cache.seed(&[mesh("A", 3.0)]);
        assert_eq!(cache.get(&"A".into()), Some(Vec3::ONE));
        assert_eq!(cache.get(&"B".into()), None);
    }

    #[test]
    fn test_update_ignores_untracked() {
        let mut cache = TransformCache::new();
        cache.update(&"A".into(), Vec3::splat(2.0));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidation_only_on_change() {
        let mut cache = TransformCache::new();
        let selection = vec![mesh("A", 1.0)];
        assert!(cache.invalidate_if_changed(&selection, &mesh_only(), |_| true));
        assert!(!cache.invalidate_if_changed(&selection, &mesh_only(), |_| true));

        let types = BTreeSet::from([ObjectType::Mesh, ObjectType::Curve]);
        assert!(cache.invalidate_if_changed(&selection, &types, |_| true));
    }

    #[test]
    fn test_invalidation_prunes_deselected_and_deleted() {
        let mut cache = TransformCache::new();
        let both = vec![mesh("A", 1.0), mesh("B", 1.0)];
        cache.invalidate_if_changed(&both, &mesh_only(), |_| true);
        let candidates = cache.candidates_in(&both);
        cache.seed(&candidates);
        assert_eq!(cache.len(), 2);

        // B deselected, and A gone from the scene
        let only_a = vec![mesh("A", 1.0)];
        cache.invalidate_if_changed(&only_a, &mesh_only(), |id| id.as_str() != "A");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_candidates_follow_type_filter() {
        let mut cache = TransformCache::new();
        let selection = vec![
            mesh("A", 1.0),
            ObjectSnapshot::new("Path", ObjectType::Curve, Vec3::ONE),
        ];
        cache.invalidate_if_changed(&selection, &mesh_only(), |_| true);
        let candidates = cache.candidates_in(&selection);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id.as_str(), "A");
    }

    #[test]
    fn test_clear_forces_rebuild() {
        let mut cache = TransformCache::new();
        let selection = vec![mesh("A", 1.0)];
        cache.invalidate_if_changed(&selection, &mesh_only(), |_| true);
        cache.seed(&selection);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.invalidate_if_changed(&selection, &mesh_only(), |_| true));
    }
}
