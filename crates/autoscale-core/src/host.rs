//! Host - External Capability Boundary
//!
//! Everything the engine needs from the 3D editor goes through [`Host`].
//! The cache, filter and detector never touch it; only the executor and the
//! monitor call into it, which keeps the state machine testable against
//! a fake host and a scripted event stream.

use crate::object::{InteractionMode, ObjectId, ObjectSnapshot};
use crate::settings::{FilterSettings, SettingChange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Identifies one open document (scene) in the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create a document id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of a registered recurring timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Severity of a user-visible report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLevel {
    /// Informational message
    Info,
    /// Something was skipped or refused
    Warning,
    /// An operation failed
    Error,
}

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Primary button, the one that confirms a transform gesture
    Left,
    /// Secondary button
    Right,
    /// Middle button
    Middle,
}

/// Press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Button went down
    Press,
    /// Button went up
    Release,
}

/// An event delivered by the host to the modal handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Recurring timer tick
    Timer,
    /// Pointer button change
    Pointer {
        /// Which button
        button: PointerButton,
        /// Press or release
        action: ButtonAction,
    },
    /// Key event, passed through untouched
    Key(String),
    /// Any other input
    Other,
}

impl HostEvent {
    /// The release that ends an interactive transform gesture
    pub const GESTURE_RELEASE: HostEvent = HostEvent::Pointer {
        button: PointerButton::Left,
        action: ButtonAction::Release,
    };

    /// Check for the gesture release
    pub fn is_gesture_release(&self) -> bool {
        *self == Self::GESTURE_RELEASE
    }
}

/// Errors raised by the host
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// Object does not exist in the scene
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Object cannot be modified (library data, locked, ...)
    #[error("Object {0} is locked")]
    ObjectLocked(ObjectId),

    /// Apply primitive failed for another reason
    #[error("Apply failed for {object}: {reason}")]
    ApplyFailed {
        /// Object being applied
        object: ObjectId,
        /// Host-provided reason
        reason: String,
    },

    /// Timer or handler registration was refused
    #[error("Registration failed: {0}")]
    Registration(String),

    /// Scene data is not readable right now (e.g. during a file load)
    #[error("Scene unavailable: {0}")]
    Unavailable(String),
}

/// Capability surface of the host editor
pub trait Host {
    /// Document this host context belongs to
    fn document_id(&self) -> DocumentId;

    /// Current interaction mode
    fn mode(&self) -> InteractionMode;

    /// Current per-document settings
    fn settings(&self) -> FilterSettings;

    /// Write one setting to the per-document store
    fn set_setting(&mut self, change: SettingChange);

    /// Currently selected objects
    fn selected_objects(&self) -> Result<Vec<ObjectSnapshot>, HostError>;

    /// Every object in the active view layer
    fn scene_objects(&self) -> Result<Vec<ObjectId>, HostError>;

    /// Whether the object still exists
    fn contains_object(&self, id: &ObjectId) -> bool;

    /// Selection flag of one object
    fn is_selected(&self, id: &ObjectId) -> bool;

    /// Set the selection flag of one object. Unknown ids are ignored.
    fn set_selected(&mut self, id: &ObjectId, selected: bool);

    /// Active object, if any
    fn active_object(&self) -> Option<ObjectId>;

    /// Set the active object. Unknown ids clear it.
    fn set_active_object(&mut self, id: Option<&ObjectId>);

    /// Bake scale into geometry for the selected object and reset it to identity.
    /// Location and rotation are left untouched.
    fn apply_scale(&mut self, id: &ObjectId) -> Result<(), HostError>;

    /// Register a recurring timer
    fn add_timer(&mut self, interval: Duration) -> Result<TimerHandle, HostError>;

    /// Remove a timer. Unknown handles are ignored.
    fn remove_timer(&mut self, handle: TimerHandle);

    /// Show a transient, non-blocking message
    fn report(&mut self, level: ReportLevel, message: &str);
}
