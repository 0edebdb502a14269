//! Session Replay
//!
//! A session script describes a scene and a list of user and host steps. The
//! replayer drives an [`Addon`] against an [`InMemoryScene`] step by step, the
//! way the editor would deliver the same events.
//!
//! ```toml
//! document = "demo.blend"
//!
//! [[objects]]
//! id = "Cube"
//! type = "MESH"
//! selected = true
//!
//! [[steps]]
//! action = "auto_start"
//!
//! [[steps]]
//! action = "scale"
//! object = "Cube"
//! scale = [2.0, 1.0, 1.0]
//!
//! [[steps]]
//! action = "release"
//! ```

use anyhow::{Context, Result};
use autoscale_core::{
    Addon, AppliedScale, CategoryCommand, FilterSettings, Host, HostEvent, InMemoryScene,
    InteractionMode, ObjectId, ReportLevel, SceneObject, SettingChange, Vec3,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

fn default_document() -> String {
    "untitled.blend".to_string()
}

/// One replayed step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Deferred start after registration
    AutoStart,
    /// Timer tick
    Tick,
    /// End of an interactive transform gesture
    Release,
    /// Key press delivered to the modal handler
    Key {
        /// Key name
        key: String,
    },
    /// Replace the selection
    Select {
        /// Objects to select
        objects: Vec<String>,
    },
    /// Set or clear the active object
    SetActive {
        /// Object to activate
        #[serde(default)]
        object: Option<String>,
    },
    /// Change an object's scale, as a transform gesture does
    Scale {
        /// Target object
        object: String,
        /// New scale
        scale: Vec3,
    },
    /// Add an object to the scene
    Add {
        /// New object
        object: SceneObject,
    },
    /// Delete an object
    Delete {
        /// Target object
        object: String,
    },
    /// Make apply fail for an object
    Lock {
        /// Target object
        object: String,
    },
    /// Allow apply again
    Unlock {
        /// Target object
        object: String,
    },
    /// Switch interaction mode
    SetMode {
        /// New mode
        mode: InteractionMode,
    },
    /// Edit a setting and notify the add-on
    Setting {
        /// The edit
        change: SettingChange,
    },
    /// Enable every type of a category
    SelectCategory {
        /// Category name
        category: String,
    },
    /// Disable every type of a category
    DeselectCategory {
        /// Category name
        category: String,
    },
    /// Make scene queries fail, or succeed again without a reason
    Unavailable {
        /// Failure reason
        #[serde(default)]
        reason: Option<String>,
    },
    /// File reload: the host drops its timers and the add-on is re-registered
    Reload,
    /// Stop the monitor
    Stop,
}

/// A session script
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Document name
    #[serde(default = "default_document")]
    pub document: String,
    /// Initial mode
    #[serde(default)]
    pub mode: InteractionMode,
    /// Document settings; the config's settings are used when absent
    #[serde(default)]
    pub settings: Option<FilterSettings>,
    /// Initial active object
    #[serde(default)]
    pub active: Option<String>,
    /// Scene contents in order
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Steps to replay
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Outcome of a replay
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    /// Document name
    pub document: String,
    /// Steps replayed
    pub steps: usize,
    /// Steps that returned an error
    pub step_errors: Vec<(usize, String)>,
    /// Every apply in order
    pub applies: Vec<AppliedScale>,
    /// Every user-visible report in order
    pub reports: Vec<(ReportLevel, String)>,
    /// Whether the monitor was running at the end
    pub running: bool,
    /// Final scene contents
    pub objects: Vec<SceneObject>,
}

impl ReplaySummary {
    /// Print a human-readable summary to stdout
    pub fn print(&self) {
        println!("Session {}: {} steps", self.document, self.steps);
        for apply in &self.applies {
            println!(
                "  applied {} ({:.3}, {:.3}, {:.3})",
                apply.object, apply.baked.x, apply.baked.y, apply.baked.z
            );
        }
        for (level, message) in &self.reports {
            println!("  [{:?}] {}", level, message);
        }
        for (index, error) in &self.step_errors {
            println!("  step {} failed: {}", index + 1, error);
        }
        for obj in &self.objects {
            let s = obj.scale;
            let g = obj.geometry_scale;
            println!(
                "  {} {}: scale ({:.3}, {:.3}, {:.3}) geometry ({:.3}, {:.3}, {:.3})",
                obj.object_type, obj.id, s.x, s.y, s.z, g.x, g.y, g.z
            );
        }
        println!(
            "  monitor {}",
            if self.running { "running" } else { "stopped" }
        );
    }
}

impl Session {
    /// Parse a session script
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse session script")
    }

    /// Load a session script from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid session script: {:?}", path))
    }

    /// Build the initial scene
    pub fn build_scene(&self, defaults: &FilterSettings) -> InMemoryScene {
        let mut scene = InMemoryScene::new(self.document.clone());
        scene.set_mode(self.mode);
        scene.set_settings(self.settings.clone().unwrap_or_else(|| defaults.clone()));
        for obj in &self.objects {
            scene.add(obj.clone());
        }
        scene.set_active(self.active.as_deref());
        scene
    }

    /// Replay every step. Step errors are collected and the replay goes on.
    pub fn replay(&self, defaults: &FilterSettings) -> ReplaySummary {
        let mut scene = self.build_scene(defaults);
        let mut addon = Addon::register();
        let mut step_errors = Vec::new();

        info!(
            "Replaying {} steps on {} ({} objects)",
            self.steps.len(),
            self.document,
            self.objects.len()
        );

        for (index, step) in self.steps.iter().enumerate() {
            debug!("Step {}: {:?}", index + 1, step);
            if let Err(e) = run_step(&mut addon, &mut scene, step) {
                warn!("Step {} failed: {:#}", index + 1, e);
                step_errors.push((index, format!("{:#}", e)));
            }
        }

        let running = addon.registry().is_running(&scene.document_id());
        ReplaySummary {
            document: self.document.clone(),
            steps: self.steps.len(),
            step_errors,
            applies: scene.apply_log().to_vec(),
            reports: scene.reports().to_vec(),
            running,
            objects: scene.objects().to_vec(),
        }
    }
}

fn require(scene: &InMemoryScene, name: &str) -> Result<ObjectId> {
    let id = ObjectId::new(name);
    if !scene.contains_object(&id) {
        anyhow::bail!("Unknown object: {}", name);
    }
    Ok(id)
}

fn run_step(addon: &mut Addon, scene: &mut InMemoryScene, step: &Step) -> Result<()> {
    match step {
        Step::AutoStart => {
            addon.auto_start(scene)?;
        }
        Step::Tick => {
            addon.handle_event(scene, &HostEvent::Timer);
        }
        Step::Release => {
            addon.handle_event(scene, &HostEvent::GESTURE_RELEASE);
        }
        Step::Key { key } => {
            addon.handle_event(scene, &HostEvent::Key(key.clone()));
        }
        Step::Select { objects } => {
            for name in objects {
                require(scene, name)?;
            }
            let names: Vec<&str> = objects.iter().map(String::as_str).collect();
            scene.select(&names);
        }
        Step::SetActive { object } => {
            if let Some(name) = object {
                require(scene, name)?;
            }
            scene.set_active(object.as_deref());
        }
        Step::Scale { object, scale } => {
            let id = require(scene, object)?;
            scene.set_scale(&id, *scale);
        }
        Step::Add { object } => {
            scene.add(object.clone());
        }
        Step::Delete { object } => {
            let id = require(scene, object)?;
            scene.remove(&id);
        }
        Step::Lock { object } => {
            let id = require(scene, object)?;
            scene.lock(&id);
        }
        Step::Unlock { object } => {
            let id = require(scene, object)?;
            scene.unlock(&id);
        }
        Step::SetMode { mode } => {
            scene.set_mode(*mode);
        }
        Step::Setting { change } => {
            scene.set_setting(*change);
            addon.on_setting_changed(scene, *change)?;
        }
        Step::SelectCategory { category } => {
            addon.run_command(scene, &CategoryCommand::Select(category.clone()))?;
        }
        Step::DeselectCategory { category } => {
            addon.run_command(scene, &CategoryCommand::Deselect(category.clone()))?;
        }
        Step::Unavailable { reason } => {
            scene.set_unavailable(reason.clone());
        }
        Step::Reload => {
            scene.drop_timers();
            addon.reregister();
        }
        Step::Stop => {
            addon.stop(scene);
        }
    }
    Ok(())
}
