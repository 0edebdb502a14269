//! Monitor Registry
//!
//! Owns one [`Monitor`] per document so that independent documents never
//! share run state. A document has at most one running monitor at a time.

use crate::host::{DocumentId, Host, HostEvent};
use crate::monitor::{EventResponse, Monitor, StartOutcome};
use crate::Result;
use std::collections::HashMap;
use tracing::debug;

/// Single-instance registry keyed by document
#[derive(Debug, Default)]
pub struct MonitorRegistry {
    monitors: HashMap<DocumentId, Monitor>,
}

impl MonitorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the monitor of the host's document if it is not running
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<StartOutcome> {
        let document = host.document_id();
        let monitor = self.monitors.entry(document.clone()).or_default();
        let outcome = monitor.start(host);
        if !monitor.is_running() {
            self.monitors.remove(&document);
        }
        outcome
    }

    /// Route a host event to the document's monitor
    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, event: &HostEvent) -> EventResponse {
        let document = host.document_id();
        let Some(monitor) = self.monitors.get_mut(&document) else {
            return EventResponse::PassThrough;
        };
        let response = monitor.handle_event(host, event);
        if response == EventResponse::Cancelled {
            debug!("Monitor for document {} cancelled", document);
            self.monitors.remove(&document);
        }
        response
    }

    /// Stop the monitor of the host's document. Idempotent.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        match self.monitors.remove(&host.document_id()) {
            Some(mut monitor) => monitor.stop(host),
            None => false,
        }
    }

    /// Drop the run state of one document without touching the host
    pub fn reset(&mut self, document: &DocumentId) {
        if let Some(mut monitor) = self.monitors.remove(document) {
            monitor.force_reset();
        }
    }

    /// Drop every document's run state without touching any host
    pub fn reset_all(&mut self) {
        for (_, mut monitor) in self.monitors.drain() {
            monitor.force_reset();
        }
    }

    /// Whether the document has a running monitor
    pub fn is_running(&self, document: &DocumentId) -> bool {
        self.monitors
            .get(document)
            .is_some_and(Monitor::is_running)
    }

    /// Monitor of a document, if any
    pub fn monitor(&self, document: &DocumentId) -> Option<&Monitor> {
        self.monitors.get(document)
    }

    /// Documents with a running monitor
    pub fn running_documents(&self) -> Vec<DocumentId> {
        let mut documents: Vec<DocumentId> = self
            .monitors
            .iter()
            .filter(|(_, m)| m.is_running())
            .map(|(d, _)| d.clone())
            .collect();
        documents.sort();
        documents
    }
}
