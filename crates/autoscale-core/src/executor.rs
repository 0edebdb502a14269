//! Apply Executor
//!
//! Applies scale to one object at a time in isolation: the whole selection is
//! captured, the target is made the only selected and active object, the host
//! bakes the scale, and the captured selection is put back. Restoration is
//! tied to a guard so it also runs when the bake fails.
//!
//! Batches run strictly sequentially since every step mutates the single,
//! shared selection state of the host.

use crate::host::{Host, HostError, ReportLevel};
use crate::object::{ObjectId, ObjectSnapshot};
use std::ops::{Deref, DerefMut};
use tracing::{debug, error};

/// Captured selection of a whole scene, restored on drop
pub struct SelectionGuard<'a, H: Host + ?Sized> {
    host: &'a mut H,
    selected: Vec<(ObjectId, bool)>,
    active: Option<ObjectId>,
}

impl<'a, H: Host + ?Sized> SelectionGuard<'a, H> {
    /// Snapshot every object's selection flag and the active object
    pub fn capture(host: &'a mut H) -> Result<Self, HostError> {
        let selected = host
            .scene_objects()?
            .into_iter()
            .map(|id| {
                let was_selected = host.is_selected(&id);
                (id, was_selected)
            })
            .collect();
        let active = host.active_object();

        Ok(Self {
            host,
            selected,
            active,
        })
    }

    /// Deselect everything, then select and activate `id` alone
    pub fn isolate(&mut self, id: &ObjectId) {
        for (other, _) in &self.selected {
            self.host.set_selected(other, false);
        }
        self.host.set_selected(id, true);
        self.host.set_active_object(Some(id));
    }

    /// Active object at capture time
    pub fn captured_active(&self) -> Option<&ObjectId> {
        self.active.as_ref()
    }

    /// Number of objects whose selection flag was captured
    pub fn captured_len(&self) -> usize {
        self.selected.len()
    }
}

impl<H: Host + ?Sized> Deref for SelectionGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: Host + ?Sized> DerefMut for SelectionGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: Host + ?Sized> Drop for SelectionGuard<'_, H> {
    fn drop(&mut self) {
        for (id, was_selected) in &self.selected {
            self.host.set_selected(id, *was_selected);
        }
        self.host.set_active_object(self.active.as_ref());
    }
}

/// A per-object failure inside a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyFailure {
    /// Object that failed
    pub object: ObjectId,
    /// Host error
    pub error: HostError,
}

/// Result of a batch apply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Objects whose scale was applied, in order
    pub applied: Vec<ObjectId>,
    /// Objects that failed, in order
    pub failures: Vec<ApplyFailure>,
}

impl BatchReport {
    /// Number of successful applies
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// Whether any object failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Apply scale to a single object, restoring selection afterwards
pub fn apply_one<H: Host + ?Sized>(host: &mut H, object: &ObjectId) -> Result<(), HostError> {
    let mut guard = SelectionGuard::capture(host)?;
    guard.isolate(object);
    guard.apply_scale(object)
}

/// Apply scale to each object in turn. Failures are logged, reported to the
/// user and collected; they never stop the batch.
pub fn apply_batch<H: Host + ?Sized>(host: &mut H, objects: &[ObjectSnapshot]) -> BatchReport {
    let mut report = BatchReport::default();

    for obj in objects {
        match apply_one(host, &obj.id) {
            Ok(()) => {
                debug!("Applied scale {:?} to object: {}", obj.scale, obj.id);
                report.applied.push(obj.id.clone());
            }
            Err(e) => {
                error!("Failed to apply scale to object {}: {}", obj.id, e);
                host.report(
                    ReportLevel::Error,
                    &format!("Failed to apply scale: {}", e),
                );
                report.failures.push(ApplyFailure {
                    object: obj.id.clone(),
                    error: e,
                });
            }
        }
    }

    report
}
