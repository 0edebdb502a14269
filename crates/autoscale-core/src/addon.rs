//! Add-on Lifecycle
//!
//! Glue between the host's registration hooks, the settings-change
//! callback, the panel commands and the monitor registry.

use crate::host::{Host, HostEvent, ReportLevel};
use crate::monitor::{EventResponse, StartOutcome};
use crate::object::ObjectCategory;
use crate::registry::MonitorRegistry;
use crate::settings::{FilterSettings, SettingChange};
use crate::{CoreError, Result};
use std::time::Duration;
use tracing::{error, info, warn};

/// Delay between registration and the deferred auto-start
pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);

/// Panel command acting on a whole category of object types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryCommand {
    /// Enable every type in the named category
    Select(String),
    /// Disable every type in the named category
    Deselect(String),
}

/// Registered add-on instance
#[derive(Debug, Default)]
pub struct Addon {
    registry: MonitorRegistry,
}

impl Addon {
    /// Register the add-on
    pub fn register() -> Self {
        info!("Auto apply scale registered");
        Self::default()
    }

    /// Register again after a reload. Run state left from the previous
    /// registration is discarded, since the host may have destroyed those
    /// loops without cancelling them.
    pub fn reregister(&mut self) {
        self.registry.reset_all();
        info!("Auto apply scale re-registered, run state reset");
    }

    /// Settings a new document starts with
    pub fn default_settings() -> FilterSettings {
        FilterSettings::default()
    }

    /// Deferred start, run once by the host [`AUTO_START_DELAY`] after
    /// registration. Resets the document's run state, then behaves like a
    /// settings update.
    pub fn auto_start<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Option<StartOutcome>> {
        if !host.mode().is_object() {
            return Ok(None);
        }
        self.registry.reset(&host.document_id());
        info!("Auto apply scale run state reset for {}", host.document_id());
        self.sync(host)
    }

    /// Settings-change callback. `change` has already been written to the
    /// host's store. Only starting is handled here; the loop observes a
    /// disabled master switch on its own.
    pub fn on_setting_changed<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        change: SettingChange,
    ) -> Result<Option<StartOutcome>> {
        match change {
            SettingChange::Enabled(_) | SettingChange::ApplyScale(_) => self.sync(host),
            SettingChange::ObjectType(..) | SettingChange::ShowObjectTypes(_) => Ok(None),
        }
    }

    fn sync<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Option<StartOutcome>> {
        if !host.mode().is_object() {
            warn!("Auto apply scale works only in Object Mode");
            return Ok(None);
        }

        let settings = host.settings();
        if !settings.wants_monitor() || self.registry.is_running(&host.document_id()) {
            return Ok(None);
        }

        match self.registry.start(host) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                error!("Failed to start auto apply scale: {}", e);
                Err(e)
            }
        }
    }

    /// Run a category command against the host's settings store
    pub fn run_command<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        command: &CategoryCommand,
    ) -> Result<()> {
        let (name, enable) = match command {
            CategoryCommand::Select(name) => (name, true),
            CategoryCommand::Deselect(name) => (name, false),
        };
        let category =
            ObjectCategory::by_name(name).ok_or_else(|| CoreError::UnknownCategory(name.clone()))?;

        for object_type in category.types {
            host.set_setting(SettingChange::ObjectType(*object_type, enable));
        }

        let message = if enable {
            format!("Selected all types in category {}", category.name)
        } else {
            format!("Deselected all types in category {}", category.name)
        };
        info!("{}", message);
        host.report(ReportLevel::Info, &message);
        Ok(())
    }

    /// Forward a modal event to the document's monitor
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: &HostEvent) -> EventResponse {
        self.registry.dispatch(host, event)
    }

    /// Stop the monitor of one document
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        self.registry.stop(host)
    }

    /// Unregister: stop the monitor of the given host, then drop any other run state
    pub fn unregister<H: Host + ?Sized>(mut self, host: &mut H) {
        self.registry.stop(host);
        self.registry.reset_all();
        info!("Auto apply scale unregistered");
    }

    /// The monitor registry
    pub fn registry(&self) -> &MonitorRegistry {
        &self.registry
    }
}
