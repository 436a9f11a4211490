//! Save flow: create-or-update, then apply
//!
//! A save is split into [`EditorSession::begin_save`], which snapshots the
//! theme into a [`SaveTicket`], the gateway round trip
//! ([`SaveTicket::submit`]), and [`EditorSession::finish_save`]. Only the save
//! indicator waits on the round trip; the session stays editable in between.

use super::EditorSession;
use crate::error::{Error, Result, ValidationError};
use crate::gateway::ThemeGateway;
use crate::normalize::to_write_payload;
use crate::types::{SaveStatus, ThemeRecord, ThemeVariant};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Id a new theme receives from its first successful create
///
/// Shared by every save started before that id is known, so overlapping saves
/// of a new theme create one record and update it afterwards.
pub(crate) type PendingCreate = Arc<OnceCell<String>>;

#[derive(Debug, Clone)]
enum SaveTarget {
    Existing(String),
    New(PendingCreate),
}

/// Snapshot of the theme taken when a save starts
#[derive(Debug, Clone)]
pub struct SaveTicket {
    generation: u64,
    revision: u64,
    variant: ThemeVariant,
    target: SaveTarget,
    payload: ThemeRecord,
}

/// Result of a gateway round trip
#[derive(Debug)]
pub enum SaveOutcome {
    Saved {
        id: String,
    },
    Failed {
        /// Set when the theme has a stored record but a later step failed
        assigned_id: Option<String>,
        error: Error,
    },
}

impl SaveTicket {
    pub fn payload(&self) -> &ThemeRecord {
        &self.payload
    }

    /// Write the snapshot and broadcast it; apply runs only after the write succeeded
    pub async fn submit(&self, gateway: &dyn ThemeGateway) -> SaveOutcome {
        let (id, assigned_id) = match &self.target {
            SaveTarget::Existing(id) => {
                if let Err(error) = gateway.update(self.variant, id, &self.payload).await {
                    return SaveOutcome::Failed {
                        assigned_id: None,
                        error,
                    };
                }
                (id.clone(), None)
            }
            SaveTarget::New(pending) => match self.write_new(gateway, pending).await {
                Ok(id) => (id.clone(), Some(id)),
                Err((assigned_id, error)) => return SaveOutcome::Failed { assigned_id, error },
            },
        };

        let record = self.payload.clone().with_id(id.clone());
        match gateway.apply(self.variant, &record).await {
            Ok(()) => SaveOutcome::Saved { id },
            Err(error) => SaveOutcome::Failed { assigned_id, error },
        }
    }

    /// Create the record, or update it when an earlier save already created it
    async fn write_new(
        &self,
        gateway: &dyn ThemeGateway,
        pending: &OnceCell<String>,
    ) -> std::result::Result<String, (Option<String>, Error)> {
        let created = AtomicBool::new(false);
        let id = pending
            .get_or_try_init(|| async {
                created.store(true, Ordering::SeqCst);
                gateway.create(self.variant, &self.payload).await
            })
            .await
            .map_err(|error| (None, error))?
            .clone();

        if !created.load(Ordering::SeqCst) {
            debug!("Theme already created as {}, updating", id);
            gateway
                .update(self.variant, &id, &self.payload)
                .await
                .map_err(|error| (Some(id.clone()), error))?;
        }
        Ok(id)
    }
}

impl EditorSession {
    /// Save indicator, with the timed saved -> idle transition applied
    pub fn save_status(&self) -> SaveStatus {
        self.save_status_at(Instant::now())
    }

    fn save_status_at(&self, now: Instant) -> SaveStatus {
        match (self.save_status, self.saved_until) {
            (SaveStatus::Saved, Some(until)) if now >= until => SaveStatus::Idle,
            (status, _) => status,
        }
    }

    /// When a visible "saved" indicator is due to clear
    pub fn saved_status_deadline(&self) -> Option<Instant> {
        match self.save_status() {
            SaveStatus::Saved => self.saved_until,
            _ => None,
        }
    }

    /// Commit an elapsed saved -> idle transition
    pub fn tick(&mut self) {
        let status = self.save_status();
        if status != self.save_status {
            debug!("Save status {:?} -> {:?}", self.save_status, status);
            self.save_status = status;
            self.saved_until = None;
        }
    }

    /// Start a save: idle/saved -> saving, superseding any pending saved timer
    pub fn begin_save(&mut self) -> Result<SaveTicket> {
        if self.theme.is_built_in {
            warn!("Refusing to save built-in theme {}", self.theme.id);
            return Err(ValidationError::ReadOnlyTheme(self.theme.name.clone()).into());
        }

        self.save_generation += 1;
        self.save_status = SaveStatus::Saving;
        self.saved_until = None;

        let target = if self.theme.id.is_empty() {
            SaveTarget::New(self.pending_create.get_or_insert_with(Default::default).clone())
        } else {
            SaveTarget::Existing(self.theme.id.clone())
        };

        Ok(SaveTicket {
            generation: self.save_generation,
            revision: self.revision,
            variant: self.theme.variant,
            target,
            payload: to_write_payload(&self.theme),
        })
    }

    /// Apply the outcome of a submitted ticket to the session
    pub fn finish_save(&mut self, ticket: SaveTicket, outcome: SaveOutcome) -> Result<()> {
        let current = ticket.generation == self.save_generation;

        match outcome {
            SaveOutcome::Saved { id } => {
                self.adopt_id(&id);
                if id != self.theme.id {
                    warn!(
                        "Save wrote to {} but the session edits {}, staying dirty",
                        id, self.theme.id
                    );
                } else if ticket.revision == self.revision {
                    self.dirty = false;
                } else {
                    debug!("Theme changed while saving, staying dirty");
                }
                if current {
                    self.save_status = SaveStatus::Saved;
                    self.saved_until = Some(Instant::now() + self.config.saved_status_display());
                }
                info!("Saved {} theme '{}' ({})", ticket.variant, self.theme.name, id);
                Ok(())
            }
            SaveOutcome::Failed { assigned_id, error } => {
                if let Some(id) = assigned_id {
                    self.adopt_id(&id);
                }
                if current {
                    self.save_status = SaveStatus::Idle;
                    self.saved_until = None;
                }
                warn!("Failed to save theme '{}': {}", self.theme.name, error);
                Err(error)
            }
        }
    }

    /// Full save against `gateway`
    pub async fn save(&mut self, gateway: &dyn ThemeGateway) -> Result<()> {
        let ticket = self.begin_save()?;
        let outcome = ticket.submit(gateway).await;
        self.finish_save(ticket, outcome)
    }

    fn adopt_id(&mut self, id: &str) {
        if self.theme.id.is_empty() {
            debug!("Theme assigned id {}", id);
            self.theme.id = id.to_string();
            self.pending_create = None;
        }
    }
}
