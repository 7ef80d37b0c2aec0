//! Single-slot holder for the live engine client.
//!
//! One engine session exists per editor window; the slot makes that
//! explicit and serializes session replacement (restart) against every
//! in-flight protocol operation.

use std::sync::Mutex;

use tombi_bridge_engine::{EngineClient, EngineClientError};
use tracing::{debug, warn};

/// Log target for session management.
const SLOT_TARGET: &str = "tombi_bridge::slot";

/// Builds a fresh engine client for the slot.
///
/// The production factory spawns and initializes a
/// [`ProcessEngineClient`](tombi_bridge_engine::adapter::ProcessEngineClient);
/// tests supply recording implementations.
pub trait EngineClientFactory: Send + Sync {
    /// Creates and starts a client.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineClientError`] when the client cannot be
    /// launched.
    fn create(&self) -> Result<Box<dyn EngineClient>, EngineClientError>;
}

struct SlotInner {
    client: Box<dyn EngineClient>,
    generation: u64,
}

/// Mutex-guarded holder of the one live engine client.
///
/// Every protocol operation borrows the client through the same lock
/// that guards replacement, so a restart is mutually exclusive with
/// itself and with any in-flight operation.
pub struct SessionSlot {
    inner: Mutex<SlotInner>,
}

impl SessionSlot {
    /// Wraps an already-started client.
    #[must_use]
    pub fn new(client: Box<dyn EngineClient>) -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                client,
                generation: 0,
            }),
        }
    }

    /// Runs an operation against the live client, holding the slot lock.
    pub fn with_client<T>(&self, operation: impl FnOnce(&mut dyn EngineClient) -> T) -> T {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        operation(inner.client.as_mut())
    }

    /// How many times the session has been replaced.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .generation
    }

    /// Replaces the session with a freshly created client.
    ///
    /// The new client is created before the old one is shut down, so a
    /// failed restart leaves the previous session in place.
    ///
    /// # Errors
    ///
    /// Propagates the factory's [`EngineClientError`]; the slot is
    /// unchanged in that case.
    pub fn restart(&self, factory: &dyn EngineClientFactory) -> Result<(), EngineClientError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        let replacement = factory.create()?;

        if let Err(error) = inner.client.shutdown() {
            warn!(
                target: SLOT_TARGET,
                error = %error,
                "previous session did not shut down cleanly"
            );
        }

        inner.client = replacement;
        inner.generation += 1;
        debug!(
            target: SLOT_TARGET,
            generation = inner.generation,
            "engine session replaced"
        );
        Ok(())
    }

    /// Shuts the live client down in place.
    pub fn shutdown(&self) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        if let Err(error) = inner.client.shutdown() {
            warn!(
                target: SLOT_TARGET,
                error = %error,
                "session shutdown reported an error"
            );
        }
    }
}

impl std::fmt::Debug for SessionSlot {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionSlot")
            .field("generation", &self.generation())
            .finish()
    }
}
