//! # Access State
//!
//! Holds the resolved permissions for the signed-in user behind an `RwLock`.
//!
//! ## Read/Write Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AccessState Lifecycle                             │
//! │                                                                         │
//! │  sign-in / shop switch                                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  set_access_record(record)  ── write lock, resolves role + overrides   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  can / cannot / can_any / can_all / is_at_least  ── read lock only     │
//! │        │                        (called per UI element, per render)     │
//! │        ▼                                                                │
//! │  sign-out: set_access_record(None) ── back to deny-everything          │
//! │                                                                         │
//! │  Predicate reads vastly outnumber record updates, hence RwLock rather  │
//! │  than Mutex.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::RwLock;

use aymur_core::permissions::{AccessRecord, PermissionKey, Permissions, ResolvedPermissions, Role};
use tracing::info;

/// Shared container for the current user's resolved permissions.
///
/// Starts in the deny-everything state; every predicate is false until a
/// record is set.
#[derive(Debug, Default)]
pub struct AccessState {
    permissions: RwLock<Permissions>,
}

impl AccessState {
    /// Creates a state with no access (all predicates false).
    pub fn new() -> Self {
        AccessState::default()
    }

    /// Resolves and installs a fetched access record.
    ///
    /// `None` or an inactive record clears access back to deny-everything;
    /// both are normal sign-out/revocation paths, not errors.
    pub fn set_access_record(&self, record: Option<&AccessRecord>) {
        let permissions = Permissions::from_record(record);
        match permissions.role() {
            Some(role) => info!(%role, "access record resolved"),
            None => info!("access cleared"),
        }
        *self.write() = permissions;
    }

    /// Drops access entirely (sign-out).
    pub fn clear(&self) {
        self.set_access_record(None);
    }

    /// The resolved role, `None` when signed out or inactive.
    pub fn role(&self) -> Option<Role> {
        self.read().role()
    }

    /// True when the user may perform the keyed action.
    pub fn can(&self, key: PermissionKey) -> bool {
        self.read().can(key)
    }

    /// Negation of [`can`](Self::can).
    pub fn cannot(&self, key: PermissionKey) -> bool {
        self.read().cannot(key)
    }

    /// True when ANY of the keys is allowed. False without access, even for
    /// an empty key list.
    pub fn can_any(&self, keys: &[PermissionKey]) -> bool {
        self.read().can_any(keys)
    }

    /// True when ALL of the keys are allowed. False without access, even for
    /// an empty key list.
    pub fn can_all(&self, keys: &[PermissionKey]) -> bool {
        self.read().can_all(keys)
    }

    /// True when the resolved role ranks at or above `target`.
    pub fn is_at_least(&self, target: Role) -> bool {
        self.read().is_at_least(target)
    }

    /// A copy of the full resolved map, for handing to the UI in one piece.
    pub fn snapshot(&self) -> Option<ResolvedPermissions> {
        self.read().resolved().cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Permissions> {
        self.permissions.read().expect("access lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Permissions> {
        self.permissions.write().expect("access lock poisoned")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
