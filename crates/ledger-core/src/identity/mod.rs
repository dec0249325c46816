//! Local participant identity.
//!
//! The identity is a generated id plus a display name, both cached in
//! [`LocalStorage`]. Nothing here is verified by the backend.

mod storage;

pub use storage::{default_storage_path, FileLocalStorage, LocalStorage, MemoryLocalStorage};

use crate::models::{Participant, ParticipantId};
use crate::{Error, Result};

/// Storage key of the generated participant id
pub const LOCAL_ID_KEY: &str = "investigator_uid";
/// Storage key of the chosen display name
pub const DISPLAY_NAME_KEY: &str = "investigator_name";

/// Read the cached participant id, generating and caching one if absent.
pub fn get_or_create_local_id<S: LocalStorage>(storage: &S) -> Result<ParticipantId> {
    if let Some(existing) = storage
        .get_item(LOCAL_ID_KEY)?
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(ParticipantId::from_stored(existing));
    }

    let id = ParticipantId::generate();
    storage.set_item(LOCAL_ID_KEY, id.as_str())?;
    tracing::info!("Generated new participant id {}", id);
    Ok(id)
}

/// Owns the local identity and its persistence.
#[derive(Debug, Clone)]
pub struct IdentityManager<S: LocalStorage> {
    storage: S,
    id: ParticipantId,
    display_name: Option<String>,
}

impl<S: LocalStorage> IdentityManager<S> {
    /// Load (or create) the identity from storage
    pub fn load(storage: S) -> Result<Self> {
        let id = get_or_create_local_id(&storage)?;
        let display_name = storage
            .get_item(DISPLAY_NAME_KEY)?
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        Ok(Self {
            storage,
            id,
            display_name,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &ParticipantId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Whether the name gate must be shown before anything else
    #[must_use]
    pub const fn needs_name(&self) -> bool {
        self.display_name.is_none()
    }

    /// The participant, once a name has been chosen
    #[must_use]
    pub fn participant(&self) -> Option<Participant> {
        self.display_name.as_ref().map(|name| Participant {
            id: self.id.clone(),
            name: name.clone(),
        })
    }

    /// Cache a new display name. Blank names are rejected and nothing is stored.
    pub fn submit_name(&mut self, name: &str) -> Result<Participant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("display name must not be empty".to_string()));
        }

        self.storage.set_item(DISPLAY_NAME_KEY, name)?;
        self.display_name = Some(name.to_string());
        tracing::info!("Participant {} is now known as {}", self.id, name);
        Ok(Participant {
            id: self.id.clone(),
            name: name.to_string(),
        })
    }

    /// Forget the display name only; the generated id is kept.
    pub fn change_identity(&mut self) -> Result<()> {
        self.storage.remove_item(DISPLAY_NAME_KEY)?;
        self.display_name = None;
        Ok(())
    }
}
