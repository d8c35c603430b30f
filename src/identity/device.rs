use crate::error::StorageError;
use crate::identity::storage::KeyValueStore;
use serde::Serialize;
use uuid::Uuid;

pub const DEVICE_ID_KEY: &str = "device_id";
pub const DEVICE_ID_PREFIX: &str = "dev_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    Durable,
    /// Storage failed; the id only lives as long as this process.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub persistence: Persistence,
}

impl DeviceIdentity {
    /// Resolves the device identity once, falling back to an in-memory id when
    /// the store cannot be read or written.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match get_or_create_device_id(store) {
            Ok(device_id) => DeviceIdentity {
                device_id,
                persistence: Persistence::Durable,
            },
            Err(e) => {
                warn!("device storage unavailable, using ephemeral identity: {}", e);
                DeviceIdentity {
                    device_id: generate_device_id(),
                    persistence: Persistence::Ephemeral,
                }
            }
        }
    }

    pub fn is_durable(&self) -> bool {
        self.persistence == Persistence::Durable
    }
}

pub fn generate_device_id() -> String {
    format!("{}{}", DEVICE_ID_PREFIX, Uuid::new_v4().simple())
}

/// Returns the stored device id, creating and persisting one on first use.
/// An empty stored value counts as absent, and a corrupt store is rewritten
/// with a fresh id.
pub fn get_or_create_device_id(store: &dyn KeyValueStore) -> Result<String, StorageError> {
    match store.get(DEVICE_ID_KEY) {
        Ok(Some(existing)) if !existing.is_empty() => return Ok(existing),
        Ok(_) => {}
        Err(StorageError::Corrupt(e)) => {
            warn!("device store is corrupt, replacing it: {}", e);
        }
        Err(e) => return Err(e),
    }

    let device_id = generate_device_id();
    store.set(DEVICE_ID_KEY, &device_id)?;
    debug!("created device id {}", device_id);
    Ok(device_id)
}
