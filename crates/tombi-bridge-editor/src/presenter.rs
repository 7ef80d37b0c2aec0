//! Observer-based status presenter with stale-response discard.

use tracing::debug;

use crate::document::EditorDocument;
use crate::slot::SessionSlot;
use crate::status::{StatusRender, StatusSnapshot, render_failure, render_success};

/// Log target for status presentation.
const STATUS_TARGET: &str = "tombi_bridge::status";

/// Receives indicator updates from the presenter.
///
/// The editor's status-bar item is the canonical observer; tests attach
/// recording observers.
pub trait StatusObserver {
    /// A new render should be shown.
    fn status_changed(&self, render: &StatusRender);

    /// The indicator should be hidden entirely.
    fn status_hidden(&self);
}

/// Identifies one issued status query.
///
/// Tickets are handed out in increasing order; only the newest issued
/// ticket is allowed to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Drives the status indicator from editor events.
///
/// Triggers (active document changed, document saved) each issue an
/// independent query. Overlapping queries can complete out of order;
/// the ticket check discards every completion but the newest, so a
/// stale snapshot can never overwrite a fresher one.
#[derive(Default)]
pub struct StatusPresenter {
    observers: Vec<Box<dyn StatusObserver>>,
    issued: u64,
}

impl StatusPresenter {
    /// Builds a presenter with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an observer for subsequent updates.
    pub fn subscribe(&mut self, observer: Box<dyn StatusObserver>) {
        self.observers.push(observer);
    }

    /// Handles a trigger for the supplied active document.
    ///
    /// A missing or non-TOML-family document hides the indicator
    /// without issuing a query.
    pub fn refresh(
        &mut self,
        document: Option<&EditorDocument>,
        server_version: &str,
        slot: &SessionSlot,
    ) {
        let Some(document) = document.filter(|doc| doc.is_toml_family()) else {
            self.hide();
            return;
        };

        let ticket = self.begin_refresh();
        let outcome = slot
            .with_client(|client| StatusSnapshot::query(client, server_version, &document.uri))
            .map_err(|error| error.to_string());
        self.complete_refresh(ticket, server_version, outcome);
    }

    /// Issues a ticket for a new query, invalidating all older tickets.
    pub fn begin_refresh(&mut self) -> QueryTicket {
        self.issued += 1;
        QueryTicket(self.issued)
    }

    /// Applies a completed query unless a newer one was issued since.
    ///
    /// Returns whether the completion was rendered. A failed query
    /// discards the previous snapshot and renders the error state; a
    /// stale ticket is dropped without touching the indicator.
    pub fn complete_refresh(
        &mut self,
        ticket: QueryTicket,
        server_version: &str,
        outcome: Result<StatusSnapshot, String>,
    ) -> bool {
        if ticket.0 != self.issued {
            debug!(
                target: STATUS_TARGET,
                ticket = ticket.0,
                newest = self.issued,
                "discarding stale status response"
            );
            return false;
        }

        let render = match outcome {
            Ok(snapshot) => render_success(server_version, &snapshot),
            Err(message) => render_failure(server_version, &message),
        };
        for observer in &self.observers {
            observer.status_changed(&render);
        }
        true
    }

    /// Hides the indicator on every observer.
    pub fn hide(&mut self) {
        for observer in &self.observers {
            observer.status_hidden();
        }
    }
}

impl std::fmt::Debug for StatusPresenter {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StatusPresenter")
            .field("observers", &self.observers.len())
            .field("issued", &self.issued)
            .finish()
    }
}
