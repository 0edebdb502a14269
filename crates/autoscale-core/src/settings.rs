//! Filter Settings
//!
//! Per-document switches that decide what gets auto-applied. The host owns
//! and persists these; the engine re-reads them on every event.

use crate::object::{ObjectCategory, ObjectType};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// User-facing switches for auto-apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Master switch
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Apply-scale sub-toggle
    #[serde(default = "default_true")]
    pub apply_scale: bool,
    /// Panel disclosure state for the type list
    #[serde(default = "default_true")]
    pub show_object_types: bool,
    /// Per-type switches. A stored map is layered over the defaults, so
    /// types it does not name keep their default.
    #[serde(default = "default_per_type", deserialize_with = "deserialize_per_type")]
    pub per_type: BTreeMap<ObjectType, bool>,
}

fn default_true() -> bool {
    true
}

fn default_per_type() -> BTreeMap<ObjectType, bool> {
    ObjectType::WATCHED
        .into_iter()
        .map(|t| (t, t == ObjectType::Mesh))
        .collect()
}

fn deserialize_per_type<'de, D>(deserializer: D) -> Result<BTreeMap<ObjectType, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = BTreeMap::<ObjectType, bool>::deserialize(deserializer)?;
    let mut per_type = default_per_type();
    per_type.extend(stored.into_iter().filter(|(t, _)| t.is_watched()));
    Ok(per_type)
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            apply_scale: true,
            show_object_types: true,
            per_type: default_per_type(),
        }
    }
}

/// A single settings edit, as delivered by the host's change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "setting", content = "value")]
pub enum SettingChange {
    /// Master switch
    Enabled(bool),
    /// Apply-scale sub-toggle
    ApplyScale(bool),
    /// Per-type switch
    ObjectType(ObjectType, bool),
    /// Panel disclosure state
    ShowObjectTypes(bool),
}

impl FilterSettings {
    /// Whether objects of this type may be auto-applied
    pub fn is_type_enabled(&self, object_type: ObjectType) -> bool {
        object_type.is_watched() && self.per_type.get(&object_type).copied().unwrap_or(false)
    }

    /// Set a per-type switch. Unwatched types are ignored.
    pub fn set_type_enabled(&mut self, object_type: ObjectType, enabled: bool) {
        if object_type.is_watched() {
            self.per_type.insert(object_type, enabled);
        }
    }

    /// Set of currently enabled types
    pub fn enabled_types(&self) -> BTreeSet<ObjectType> {
        self.per_type
            .iter()
            .filter(|(t, on)| **on && t.is_watched())
            .map(|(t, _)| *t)
            .collect()
    }

    /// Whether the monitor should be running under these settings
    pub fn wants_monitor(&self) -> bool {
        self.enabled && self.apply_scale
    }

    /// Enable every type in a category
    pub fn select_category(&mut self, category: &ObjectCategory) {
        for t in category.types {
            self.set_type_enabled(*t, true);
        }
    }

    /// Disable every type in a category
    pub fn deselect_category(&mut self, category: &ObjectCategory) {
        for t in category.types {
            self.set_type_enabled(*t, false);
        }
    }

    /// Apply an edit. Returns true if a value actually changed.
    pub fn apply_change(&mut self, change: SettingChange) -> bool {
        match change {
            SettingChange::Enabled(v) => std::mem::replace(&mut self.enabled, v) != v,
            SettingChange::ApplyScale(v) => std::mem::replace(&mut self.apply_scale, v) != v,
            SettingChange::ShowObjectTypes(v) => {
                std::mem::replace(&mut self.show_object_types, v) != v
            }
            SettingChange::ObjectType(t, v) => {
                let before = self.is_type_enabled(t);
                self.set_type_enabled(t, v);
                before != self.is_type_enabled(t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_only_mesh() {
        let settings = FilterSettings::default();
        assert!(settings.enabled);
        assert!(settings.apply_scale);
        assert!(settings.show_object_types);
        assert_eq!(
            settings.enabled_types(),
            BTreeSet::from([ObjectType::Mesh])
        );
        assert!(!settings.is_type_enabled(ObjectType::Curve));
        assert!(!settings.is_type_enabled(ObjectType::Other));
    }

    #[test]
    fn test_category_toggle() {
        let mut settings = FilterSettings::default();
        settings.select_category(&ObjectCategory::OBJECTS);
        assert_eq!(settings.enabled_types().len(), ObjectType::WATCHED.len());

        settings.deselect_category(&ObjectCategory::OBJECTS);
        assert!(settings.enabled_types().is_empty());
    }

    #[test]
    fn test_other_type_cannot_be_enabled() {
        let mut settings = FilterSettings::default();
        settings.set_type_enabled(ObjectType::Other, true);
        assert!(!settings.is_type_enabled(ObjectType::Other));
        assert!(!settings.apply_change(SettingChange::ObjectType(ObjectType::Other, true)));
    }

    #[test]
    fn test_apply_change_reports_difference() {
        let mut settings = FilterSettings::default();
        assert!(!settings.apply_change(SettingChange::Enabled(true)));
        assert!(settings.apply_change(SettingChange::Enabled(false)));
        assert!(!settings.enabled);
        assert!(settings.apply_change(SettingChange::ObjectType(ObjectType::Curve, true)));
        assert!(settings.is_type_enabled(ObjectType::Curve));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let settings: FilterSettings = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!settings.enabled);
        assert!(settings.apply_scale);
        assert!(settings.is_type_enabled(ObjectType::Mesh));
    }

    #[test]
    fn test_partial_type_map_keeps_other_defaults() {
        let settings: FilterSettings =
            serde_json::from_str(r#"{"per_type": {"CURVE": true, "LIGHT": true}}"#).unwrap();
        assert!(settings.is_type_enabled(ObjectType::Mesh));
        assert!(settings.is_type_enabled(ObjectType::Curve));
        assert!(!settings.is_type_enabled(ObjectType::Lattice));
        assert_eq!(settings.per_type.len(), ObjectType::WATCHED.len());

        let settings: FilterSettings =
            serde_json::from_str(r#"{"per_type": {"MESH": false}}"#).unwrap();
        assert!(settings.enabled_types().is_empty());
    }
}
