//! Monitor Loop
//!
//! The modal driver. While running it owns a recurring host timer and
//! reacts to two events:
//!
//! - **Timer**: baseline newly selected candidates in the cache.
//! - **Gesture release**: detect scale changes and apply them.
//!
//! Every other event passes through untouched. The loop stops itself once the
//! master switch is seen off; leaving object mode only pauses it.
//!
//! Settings are re-read from the host on every event, so a toggle made while
//! another event is being processed takes effect on the next event.

use crate::cache::TransformCache;
use crate::detector::detect_changes;
use crate::eligibility::{check_eligibility, Eligibility};
use crate::executor::{apply_batch, BatchReport};
use crate::host::{Host, HostEvent, ReportLevel, TimerHandle};
use crate::object::ObjectSnapshot;
use crate::settings::FilterSettings;
use crate::Result;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Shortest tick interval, used for large selections
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Longest tick interval, used for a single object or an empty selection
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Tick interval for a selection of `selected` objects.
///
/// Shrinks inversely with selection size, bounded to
/// [`MIN_TICK_INTERVAL`]..=[`MAX_TICK_INTERVAL`].
pub fn tick_interval(selected: usize) -> Duration {
    let divisor = u32::try_from(selected.max(1)).unwrap_or(u32::MAX);
    (MAX_TICK_INTERVAL / divisor).clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL)
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// No timer, empty cache
    #[default]
    Stopped,
    /// Timer registered with the host
    Running {
        /// Host timer
        timer: TimerHandle,
        /// Tick interval chosen at start
        interval: Duration,
    },
}

/// Result of [`Monitor::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The loop is now running
    Started,
    /// Refused: a loop is already running
    AlreadyRunning,
    /// Refused: the host is not in object mode
    NotInObjectMode,
}

/// What the host should do with the event after the handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Deliver the event to the rest of the host unchanged
    PassThrough,
    /// The loop stopped; unregister the modal handler
    Cancelled,
}

/// Running totals since the last start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Timer events handled
    pub ticks: usize,
    /// Gesture releases handled
    pub releases: usize,
    /// Objects applied
    pub applied: usize,
    /// Objects that failed to apply
    pub failed: usize,
}

/// The auto-apply state machine for one document
#[derive(Debug, Default)]
pub struct Monitor {
    state: MonitorState,
    cache: TransformCache,
    stats: MonitorStats,
}

impl Monitor {
    /// Create a stopped monitor
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Check for [`MonitorState::Running`]
    pub fn is_running(&self) -> bool {
        matches!(self.state, MonitorState::Running { .. })
    }

    /// The transform cache
    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    /// Totals since the last start
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Start the loop: register the timer and baseline the current selection.
    ///
    /// A no-op if already running or outside object mode.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<StartOutcome> {
        if self.is_running() {
            debug!("Auto apply scale already running, start ignored");
            return Ok(StartOutcome::AlreadyRunning);
        }
        if !host.mode().is_object() {
            debug!("Auto apply scale start refused outside object mode");
            return Ok(StartOutcome::NotInObjectMode);
        }

        let selected = host.selected_objects()?;
        let interval = tick_interval(selected.len());
        let timer = host.add_timer(interval)?;

        self.cache.clear();
        self.stats = MonitorStats::default();
        self.state = MonitorState::Running { timer, interval };

        let settings = host.settings();
        let candidates = self.refresh_candidates(&*host, &settings, &selected);
        self.cache.seed(&candidates);

        info!(
            "Auto apply scale started (tick {:?}, {} objects baselined)",
            interval,
            self.cache.len()
        );
        Ok(StartOutcome::Started)
    }

    /// Stop the loop. Safe to call when already stopped.
    /// Returns true if the loop was running.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        let was_running = match std::mem::take(&mut self.state) {
            MonitorState::Running { timer, .. } => {
                host.remove_timer(timer);
                true
            }
            MonitorState::Stopped => false,
        };
        self.cache.clear();
        if was_running {
            info!("Auto apply scale stopped");
        }
        was_running
    }

    /// Drop the run state without touching the host. Used when the host has
    /// already destroyed the loop (e.g. a file reload).
    pub fn force_reset(&mut self) {
        if self.is_running() {
            warn!("Resetting orphaned auto apply scale run state");
        }
        self.state = MonitorState::Stopped;
        self.cache.clear();
    }

    /// Modal handler entry point. Never fails; errors are logged and reported.
    pub fn handle_event<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: &HostEvent,
    ) -> EventResponse {
        if !self.is_running() {
            return EventResponse::PassThrough;
        }

        let is_tick = matches!(event, HostEvent::Timer);
        let is_release = event.is_gesture_release();
        if !is_tick && !is_release {
            return EventResponse::PassThrough;
        }

        if !host.mode().is_object() {
            return EventResponse::PassThrough;
        }

        let settings = host.settings();
        if !settings.enabled {
            self.stop(host);
            return EventResponse::Cancelled;
        }

        if is_tick {
            self.stats.ticks += 1;
            if let Err(e) = self.on_tick(host, &settings) {
                warn!("Auto apply scale tick skipped: {}", e);
            }
        } else {
            self.stats.releases += 1;
            match self.on_release(host, &settings) {
                Ok(report) => {
                    self.stats.applied += report.applied_count();
                    self.stats.failed += report.failures.len();
                    info!("Applied scale to {} objects", report.applied_count());
                }
                Err(e) => {
                    error!("Auto apply scale failed on release: {}", e);
                    host.report(ReportLevel::Error, &format!("Auto apply scale error: {}", e));
                }
            }
        }

        EventResponse::PassThrough
    }

    fn on_tick<H: Host + ?Sized>(&mut self, host: &mut H, settings: &FilterSettings) -> Result<()> {
        let selected = host.selected_objects()?;
        let candidates = self.refresh_candidates(&*host, settings, &selected);
        self.cache.seed(&candidates);
        Ok(())
    }

    fn on_release<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        settings: &FilterSettings,
    ) -> Result<BatchReport> {
        let selected = host.selected_objects()?;
        let candidates = self.refresh_candidates(&*host, settings, &selected);
        let changed = detect_changes(&candidates, &mut self.cache);
        if changed.is_empty() {
            return Ok(BatchReport::default());
        }
        debug!("Detected {} objects with changed scale", changed.len());

        let to_apply: Vec<ObjectSnapshot> = changed
            .into_iter()
            .filter(|obj| match check_eligibility(obj, settings) {
                Eligibility::Eligible => true,
                reason => {
                    debug!("Skipping object {}: {:?}", obj.id, reason);
                    false
                }
            })
            .collect();

        Ok(apply_batch(host, &to_apply))
    }

    fn refresh_candidates<H: Host + ?Sized>(
        &mut self,
        host: &H,
        settings: &FilterSettings,
        selected: &[ObjectSnapshot],
    ) -> Vec<ObjectSnapshot> {
        self.cache.invalidate_if_changed(selected, &settings.enabled_types(), |id| {
            host.contains_object(id)
        });
        self.cache.candidates_in(selected)
    }
}
