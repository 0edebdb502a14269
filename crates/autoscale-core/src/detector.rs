//! Change Detector

use crate::cache::TransformCache;
use crate::object::ObjectSnapshot;
use crate::scale::scale_changed;

/// Return the candidates whose scale moved away from their cached baseline.
///
/// Flagged objects have their baseline updated to the observed scale, so a
/// repeated call without further change flags nothing. Candidates without a
/// baseline are skipped.
pub fn detect_changes(
    candidates: &[ObjectSnapshot],
    cache: &mut TransformCache,
) -> Vec<ObjectSnapshot> {
    let mut changed = Vec::new();

    for obj in candidates {
        let Some(cached) = cache.get(&obj.id) else {
            continue;
        };
        if scale_changed(obj.scale, cached) {
            cache.update(&obj.id, obj.scale);
            changed.push(obj.clone());
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;
    use crate::Vec3;
    use proptest::prelude::*;

    fn mesh(name: &str, scale: Vec3) -> ObjectSnapshot {
        ObjectSnapshot::new(name, ObjectType::Mesh, scale)
    }

    #[test]
    fn test_detects_and_updates_baseline() {
        let mut cache = TransformCache::new();
        cache.seed(&[mesh("A", Vec3::ONE)]);

        let now = [mesh("A", Vec3::new(2.0, 1.0, 1.0))];
        let changed = detect_changes(&now, &mut cache);
        assert_eq!(changed.len(), 1);
        assert_eq!(cache.get(&"A".into()), Some(Vec3::new(2.0, 1.0, 1.0)));

        // Second release without a new gesture
        assert!(detect_changes(&now, &mut cache).is_empty());
    }

    #[test]
    fn test_unbaselined_objects_are_skipped() {
        let mut cache = TransformCache::new();
        let changed = detect_changes(&[mesh("New", Vec3::splat(5.0))], &mut cache);
        assert!(changed.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sub_tolerance_jitter_ignored() {
        let mut cache = TransformCache::new();
        cache.seed(&[mesh("A", Vec3::ONE)]);
        let jitter = [mesh("A", Vec3::new(1.00001, 0.99999, 1.0))];
        assert!(detect_changes(&jitter, &mut cache).is_empty());
        assert_eq!(cache.get(&"A".into()), Some(Vec3::ONE));
    }

    proptest! {
        #[test]
        fn prop_flag_iff_max_delta_exceeds_tolerance(
            base in prop::array::uniform3(-10.0f32..10.0),
            delta in prop::array::uniform3(-0.01f32..0.01),
        ) {
            let cached = Vec3::from_array(base);
            let current = cached + Vec3::from_array(delta);
            let expected = (current - cached)
                .to_array()
                .iter()
                .any(|d| d.abs() > crate::CHANGE_TOLERANCE);

            let mut cache = TransformCache::new();
            cache.seed(&[mesh("A", cached)]);
            let changed = detect_changes(&[mesh("A", current)], &mut cache);

            prop_assert_eq!(changed.len() == 1, expected);
            if expected {
                prop_assert_eq!(cache.get(&"A".into()), Some(current));
                prop_assert!(detect_changes(&[mesh("A", current)], &mut cache).is_empty());
            } else {
                prop_assert_eq!(cache.get(&"A".into()), Some(cached));
            }
        }
    }
}
