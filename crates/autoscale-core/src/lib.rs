//! AutoScale Core - Scale Auto-Apply Engine
//!
//! This crate contains the editor-independent core of AutoScale, including:
//! - Object handles, type tags and interaction modes
//! - Per-document filter settings and the category commands
//! - The host capability boundary ([`Host`])
//! - Transform cache, eligibility filter and change detector
//! - The apply executor with scoped selection restore
//! - The monitor loop state machine and its single-instance registry
//! - An in-memory reference host for tests and headless replay

#![warn(missing_docs)]

pub use glam::Vec3;
use thiserror::Error;

// Data model
pub mod object;
pub mod scale;
pub mod settings;

// Host boundary
pub mod host;
pub mod scene;

// Detection & apply pipeline
pub mod cache;
pub mod detector;
pub mod eligibility;
pub mod executor;

// Lifecycle
pub mod addon;
pub mod monitor;
pub mod registry;

pub mod logging;

// --- Re-exports grouped by category ---

// Objects & Settings
pub use object::{InteractionMode, ObjectCategory, ObjectId, ObjectSnapshot, ObjectType};
pub use scale::{is_identity_scale, scale_changed, CHANGE_TOLERANCE, IDENTITY_TOLERANCE};
pub use settings::{FilterSettings, SettingChange};

// Host
pub use host::{
    ButtonAction, DocumentId, Host, HostError, HostEvent, PointerButton, ReportLevel,
    TimerHandle,
};
pub use scene::{AppliedScale, InMemoryScene, SceneObject};

// Pipeline
pub use cache::TransformCache;
pub use detector::detect_changes;
pub use eligibility::{candidate_filter, check_eligibility, is_eligible, Eligibility};
pub use executor::{apply_batch, apply_one, ApplyFailure, BatchReport, SelectionGuard};

// Lifecycle
pub use addon::{Addon, CategoryCommand};
pub use monitor::{
    tick_interval, EventResponse, Monitor, MonitorState, MonitorStats, StartOutcome,
};
pub use registry::MonitorRegistry;

// Logging
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// The host rejected or failed a request
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// A category name did not match any known category
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
