//! # Session Store
//!
//! The narrow persistence port for the POS session: the full session state
//! (active cart plus held orders) round-trips through here verbatim.
//!
//! ## Port & Adapters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SessionStore Port                                 │
//! │                                                                         │
//! │   PosState ────► trait SessionStore { save / load / clear }            │
//! │                          │                                              │
//! │            ┌─────────────┴──────────────┐                               │
//! │            ▼                            ▼                               │
//! │   ┌────────────────┐          ┌────────────────┐                       │
//! │   │ JsonFileStore  │          │  MemoryStore   │                       │
//! │   │ pretty JSON at │          │ serialized to  │                       │
//! │   │ platform data  │          │ a String slot  │                       │
//! │   │ dir, tmp+rename│          │ (tests, demo)  │                       │
//! │   └────────────────┘          └────────────────┘                       │
//! │                                                                         │
//! │  The pricing engine never sees this trait - persistence stays out of   │
//! │  the arithmetic entirely.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use aymur_core::session::PosSession;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// The Port
// =============================================================================

/// Save/load interface for the full POS session.
///
/// Implementations must round-trip a [`PosSession`] verbatim: items,
/// discounts, customer, notes, and every held order.
pub trait SessionStore: Send + Sync {
    /// Persists the full session, replacing any previous snapshot.
    fn save(&self, session: &PosSession) -> StoreResult<()>;

    /// Loads the persisted session, `None` when nothing has been saved.
    fn load(&self) -> StoreResult<Option<PosSession>>;

    /// Removes the persisted snapshot, if any.
    fn clear(&self) -> StoreResult<()>;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// Persists the session as pretty JSON at a platform-standard path.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing to an explicit path.
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    /// Creates a store at the platform data directory
    /// (e.g. `~/.local/share/aymur/session.json` on Linux).
    pub fn at_default_path() -> StoreResult<Self> {
        let dirs = directories::ProjectDirs::from("com", "aymur", "aymur")
            .ok_or(StoreError::NoPath)?;
        Ok(JsonFileStore::new(dirs.data_dir().join("session.json")))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn save(&self, session: &PosSession) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)?;

        // tmp + rename keeps the old snapshot intact if the write dies
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = ?self.path, "session snapshot saved");
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<PosSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&contents)?;
        debug!(path = ?self.path, "session snapshot loaded");
        Ok(Some(session))
    }

    fn clear(&self) -> StoreResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store for tests and the demo binary.
///
/// Holds the snapshot as serialized JSON rather than a cloned struct, so the
/// round-trip exercises the same serde path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// True when a snapshot is currently held.
    pub fn has_snapshot(&self) -> bool {
        self.slot.lock().expect("store mutex poisoned").is_some()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &PosSession) -> StoreResult<()> {
        let json = serde_json::to_string(session)?;
        *self.slot.lock().expect("store mutex poisoned") = Some(json);
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<PosSession>> {
        let slot = self.slot.lock().expect("store mutex poisoned");
        match slot.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        *self.slot.lock().expect("store mutex poisoned") = None;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
