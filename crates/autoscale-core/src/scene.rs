//! In-Memory Scene - Reference Host
//!
//! A small, deterministic [`Host`] used by the tests and the headless session
//! replayer. Apply behaves like an editor's apply-transform operator: it acts
//! on every selected object, which is why the executor isolates the target
//! before calling it.
//!
//! # Features
//!
//! - **SceneObject**: Object with scale, baked geometry factor, selection and lock.
//! - **InMemoryScene**: Ordered object list, active object, mode, settings,
//!   timers and a log of reports and applies.

use crate::host::{DocumentId, Host, HostError, ReportLevel, TimerHandle};
use crate::object::{InteractionMode, ObjectId, ObjectSnapshot, ObjectType};
use crate::settings::{FilterSettings, SettingChange};
use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// An object in the in-memory scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name
    pub id: ObjectId,
    /// Type tag
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Local scale
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    /// Accumulated scale baked into the geometry
    #[serde(default = "default_scale")]
    pub geometry_scale: Vec3,
    /// Selection flag
    #[serde(default)]
    pub selected: bool,
    /// Locked objects refuse apply
    #[serde(default)]
    pub locked: bool,
}

impl SceneObject {
    /// Create an unselected object with identity scale
    pub fn new(id: impl Into<ObjectId>, object_type: ObjectType) -> Self {
        Self {
            id: id.into(),
            object_type,
            scale: Vec3::ONE,
            geometry_scale: Vec3::ONE,
            selected: false,
            locked: false,
        }
    }

    /// Builder: set the local scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: mark selected
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Snapshot as seen through [`Host::selected_objects`]
    pub fn snapshot(&self) -> ObjectSnapshot {
        ObjectSnapshot::new(self.id.clone(), self.object_type, self.scale)
    }
}

/// Record of one call to [`Host::apply_scale`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedScale {
    /// Object passed to apply
    pub object: ObjectId,
    /// Scale that was baked
    pub baked: Vec3,
    /// Objects selected at the moment of the bake
    pub selected_during: Vec<ObjectId>,
    /// Active object at the moment of the bake
    pub active_during: Option<ObjectId>,
}

/// Deterministic in-memory host
#[derive(Debug, Clone)]
pub struct InMemoryScene {
    document: DocumentId,
    mode: InteractionMode,
    settings: FilterSettings,
    objects: Vec<SceneObject>,
    active: Option<ObjectId>,
    timers: Vec<(TimerHandle, Duration)>,
    next_timer: u64,
    refuse_timers: bool,
    unavailable: Option<String>,
    reports: Vec<(ReportLevel, String)>,
    apply_log: Vec<AppliedScale>,
}

impl InMemoryScene {
    /// Create an empty scene in object mode with default settings
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: DocumentId::new(document),
            mode: InteractionMode::Object,
            settings: FilterSettings::default(),
            objects: Vec::new(),
            active: None,
            timers: Vec::new(),
            next_timer: 1,
            refuse_timers: false,
            unavailable: None,
            reports: Vec::new(),
            apply_log: Vec::new(),
        }
    }

    /// Add an object, replacing any object with the same name
    pub fn add(&mut self, object: SceneObject) {
        if let Some(existing) = self.objects.iter_mut().find(|o| o.id == object.id) {
            *existing = object;
        } else {
            self.objects.push(object);
        }
    }

    /// Delete an object
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let pos = self.objects.iter().position(|o| &o.id == id)?;
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(self.objects.remove(pos))
    }

    /// Get an object
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    fn object_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// All objects in insertion order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Replace the selection with exactly these objects
    pub fn select(&mut self, names: &[&str]) {
        for obj in &mut self.objects {
            obj.selected = names.contains(&obj.id.as_str());
        }
    }

    /// Set the active object by name
    pub fn set_active(&mut self, name: Option<&str>) {
        let id = name.map(ObjectId::new);
        self.set_active_object(id.as_ref());
    }

    /// Set an object's local scale, as an interactive gesture would
    pub fn set_scale(&mut self, id: &ObjectId, scale: Vec3) -> bool {
        match self.object_mut(id) {
            Some(obj) => {
                obj.scale = scale;
                true
            }
            None => false,
        }
    }

    /// Make apply fail for this object
    pub fn lock(&mut self, id: &ObjectId) {
        if let Some(obj) = self.object_mut(id) {
            obj.locked = true;
        }
    }

    /// Allow apply again
    pub fn unlock(&mut self, id: &ObjectId) {
        if let Some(obj) = self.object_mut(id) {
            obj.locked = false;
        }
    }

    /// Switch interaction mode
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    /// Replace the document settings
    pub fn set_settings(&mut self, settings: FilterSettings) {
        self.settings = settings;
    }

    /// Edit the document settings in place
    pub fn settings_mut(&mut self) -> &mut FilterSettings {
        &mut self.settings
    }

    /// Make timer registration fail
    pub fn refuse_timers(&mut self, refuse: bool) {
        self.refuse_timers = refuse;
    }

    /// Make scene queries fail with the given reason, or succeed again with `None`
    pub fn set_unavailable(&mut self, reason: Option<String>) {
        self.unavailable = reason;
    }

    /// Registered timers
    pub fn timers(&self) -> &[(TimerHandle, Duration)] {
        &self.timers
    }

    /// Drop all timers without notifying anyone, as a file reload does
    pub fn drop_timers(&mut self) {
        self.timers.clear();
    }

    /// All reports in order
    pub fn reports(&self) -> &[(ReportLevel, String)] {
        &self.reports
    }

    /// Messages reported at one level
    pub fn reports_at(&self, level: ReportLevel) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Forget all reports
    pub fn clear_reports(&mut self) {
        self.reports.clear();
    }

    /// Every apply performed so far
    pub fn apply_log(&self) -> &[AppliedScale] {
        &self.apply_log
    }

    /// Selection flag of every object, in order
    pub fn selection_state(&self) -> Vec<(ObjectId, bool)> {
        self.objects
            .iter()
            .map(|o| (o.id.clone(), o.selected))
            .collect()
    }

    fn check_available(&self) -> Result<(), HostError> {
        match &self.unavailable {
            Some(reason) => Err(HostError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Host for InMemoryScene {
    fn document_id(&self) -> DocumentId {
        self.document.clone()
    }

    fn mode(&self) -> InteractionMode {
        self.mode
    }

    fn settings(&self) -> FilterSettings {
        self.settings.clone()
    }

    fn set_setting(&mut self, change: SettingChange) {
        self.settings.apply_change(change);
    }

    fn selected_objects(&self) -> Result<Vec<ObjectSnapshot>, HostError> {
        self.check_available()?;
        Ok(self
            .objects
            .iter()
            .filter(|o| o.selected)
            .map(SceneObject::snapshot)
            .collect())
    }

    fn scene_objects(&self) -> Result<Vec<ObjectId>, HostError> {
        self.check_available()?;
        Ok(self.objects.iter().map(|o| o.id.clone()).collect())
    }

    fn contains_object(&self, id: &ObjectId) -> bool {
        self.object(id).is_some()
    }

    fn is_selected(&self, id: &ObjectId) -> bool {
        self.object(id).is_some_and(|o| o.selected)
    }

    fn set_selected(&mut self, id: &ObjectId, selected: bool) {
        if let Some(obj) = self.object_mut(id) {
            obj.selected = selected;
        }
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.active.clone()
    }

    fn set_active_object(&mut self, id: Option<&ObjectId>) {
        self.active = id.filter(|id| self.contains_object(id)).cloned();
    }

    fn apply_scale(&mut self, id: &ObjectId) -> Result<(), HostError> {
        let target = self
            .object(id)
            .ok_or_else(|| HostError::ObjectNotFound(id.clone()))?;
        if target.locked {
            return Err(HostError::ObjectLocked(id.clone()));
        }
        if !target.selected {
            return Err(HostError::ApplyFailed {
                object: id.clone(),
                reason: "object is not selected".to_string(),
            });
        }
        let baked = target.scale;

        let selected_during: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.id.clone())
            .collect();

        // Like the editor operator, apply acts on the whole selection.
        for obj in self.objects.iter_mut().filter(|o| o.selected && !o.locked) {
            obj.geometry_scale *= obj.scale;
            obj.scale = Vec3::ONE;
        }

        self.apply_log.push(AppliedScale {
            object: id.clone(),
            baked,
            selected_during,
            active_during: self.active.clone(),
        });
        Ok(())
    }

    fn add_timer(&mut self, interval: Duration) -> Result<TimerHandle, HostError> {
        if self.refuse_timers {
            return Err(HostError::Registration(
                "window manager refused the timer".to_string(),
            ));
        }
        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        self.timers.push((handle, interval));
        Ok(handle)
    }

    fn remove_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }

    fn report(&mut self, level: ReportLevel, message: &str) {
        self.reports.push((level, message.to_string()));
    }
}
