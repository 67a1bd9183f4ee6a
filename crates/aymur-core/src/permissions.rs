//! # Permission Resolver
//!
//! Merges a role's default permission set with per-user overrides into a final
//! allow/deny map, and answers boolean predicate queries for UI gating.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Permission Resolution                                │
//! │                                                                         │
//! │  AccessRecord (fetched by external auth/data layer)                    │
//! │  ├── role: "manager"          ──► Role::Manager  (unknown → Staff)     │
//! │  ├── is_active: true          ──► inactive record = NO ACCESS          │
//! │  └── overrides (JSONB):                                                │
//! │        { "sales.create": false,   ──► honored (bool, known key)        │
//! │          "billing.manage": "yes", ──► dropped  (non-boolean)           │
//! │          "moon.landing": true }   ──► dropped  (unknown key)           │
//! │                                                                         │
//! │  defaults(Manager) + honored overrides ──► ResolvedPermissions         │
//! │                                                                         │
//! │  can / cannot / can_any / can_all / is_at_least ──► UI gating          │
//! │                                                                         │
//! │  FAIL-CLOSED: no record, inactive record, or garbage overrides never   │
//! │  raise - every predicate degrades to false                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Owner Bypass
//! The owner role satisfies every permission check regardless of the resolved
//! map (an owner cannot lock themselves out via overrides). The bypass lives
//! in exactly one place - [`Role::has_universal_access`] - and every predicate
//! checks it first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

// =============================================================================
// Role
// =============================================================================

/// Privilege level of a user within one shop.
///
/// Roles are totally ordered by hierarchy rank: lower rank = more privileged.
/// Owner is rank 0 and additionally bypasses the permission table entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shop owner - universal access, bypasses permission checks.
    Owner,
    /// Day-to-day operations lead.
    Manager,
    /// Accounts: expenses, billing, reminders.
    Finance,
    /// Counter staff - sales and lookups only.
    Staff,
}

impl Role {
    /// Hierarchy rank: lower = more privileged. Owner is 0.
    #[inline]
    pub const fn rank(&self) -> u8 {
        match self {
            Role::Owner => 0,
            Role::Manager => 1,
            Role::Finance => 2,
            Role::Staff => 3,
        }
    }

    /// True for roles that bypass permission tables entirely.
    ///
    /// This is the single source of the owner-bypass rule; predicates check
    /// it first and never special-case owner inline.
    #[inline]
    pub const fn has_universal_access(&self) -> bool {
        matches!(self, Role::Owner)
    }

    /// Parses a role name from an access record.
    ///
    /// Unknown names coerce to [`Role::Staff`] - the lowest privilege level -
    /// once, at this boundary. A typo in a tenant-authored role string must
    /// never grant more than floor access, and a closed enum downstream keeps
    /// "unknown role" unrepresentable.
    pub fn from_name(name: &str) -> Role {
        match name.trim().to_lowercase().as_str() {
            "owner" => Role::Owner,
            "manager" => Role::Manager,
            "finance" => Role::Finance,
            "staff" => Role::Staff,
            _ => Role::Staff,
        }
    }

    /// Returns the canonical lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Finance => "finance",
            Role::Staff => "staff",
        }
    }

    /// All roles in hierarchy order (most privileged first).
    pub const ALL: [Role; 4] = [Role::Owner, Role::Manager, Role::Finance, Role::Staff];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Permission Key
// =============================================================================

/// One gated capability, serialized as `"<domain>.<action>"`.
///
/// ## Why a Closed Enum?
/// The key universe is fixed per build. Modeling it as an enum means a typo in
/// a permission check is a compile error, and unknown strings arriving in
/// override JSON are rejected (denied) at the parse boundary instead of being
/// trusted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum PermissionKey {
    #[serde(rename = "sales.create")]
    SalesCreate,
    #[serde(rename = "sales.view")]
    SalesView,
    #[serde(rename = "inventory.view")]
    InventoryView,
    #[serde(rename = "inventory.edit")]
    InventoryEdit,
    #[serde(rename = "purchases.create")]
    PurchasesCreate,
    #[serde(rename = "purchases.view")]
    PurchasesView,
    #[serde(rename = "suppliers.manage")]
    SuppliersManage,
    #[serde(rename = "expenses.create")]
    ExpensesCreate,
    #[serde(rename = "expenses.view")]
    ExpensesView,
    #[serde(rename = "deliveries.manage")]
    DeliveriesManage,
    #[serde(rename = "reminders.manage")]
    RemindersManage,
    #[serde(rename = "billing.manage")]
    BillingManage,
    #[serde(rename = "team.manage")]
    TeamManage,
    #[serde(rename = "settings.manage")]
    SettingsManage,
}

impl PermissionKey {
    /// The full key universe for this build.
    pub const ALL: [PermissionKey; 14] = [
        PermissionKey::SalesCreate,
        PermissionKey::SalesView,
        PermissionKey::InventoryView,
        PermissionKey::InventoryEdit,
        PermissionKey::PurchasesCreate,
        PermissionKey::PurchasesView,
        PermissionKey::SuppliersManage,
        PermissionKey::ExpensesCreate,
        PermissionKey::ExpensesView,
        PermissionKey::DeliveriesManage,
        PermissionKey::RemindersManage,
        PermissionKey::BillingManage,
        PermissionKey::TeamManage,
        PermissionKey::SettingsManage,
    ];

    /// Returns the serialized `"<domain>.<action>"` form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PermissionKey::SalesCreate => "sales.create",
            PermissionKey::SalesView => "sales.view",
            PermissionKey::InventoryView => "inventory.view",
            PermissionKey::InventoryEdit => "inventory.edit",
            PermissionKey::PurchasesCreate => "purchases.create",
            PermissionKey::PurchasesView => "purchases.view",
            PermissionKey::SuppliersManage => "suppliers.manage",
            PermissionKey::ExpensesCreate => "expenses.create",
            PermissionKey::ExpensesView => "expenses.view",
            PermissionKey::DeliveriesManage => "deliveries.manage",
            PermissionKey::RemindersManage => "reminders.manage",
            PermissionKey::BillingManage => "billing.manage",
            PermissionKey::TeamManage => "team.manage",
            PermissionKey::SettingsManage => "settings.manage",
        }
    }

    /// Parses a key string; `None` for anything outside the universe.
    pub fn parse(s: &str) -> Option<PermissionKey> {
        PermissionKey::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Default Permission Matrix
// =============================================================================

/// The default allow/deny decision for one role and one key.
///
/// ## Structural Invariant
/// Because this is an exhaustive match over both enums, every key has a value
/// for every role by construction - no missing entries are possible.
pub const fn default_allow(role: Role, key: PermissionKey) -> bool {
    use PermissionKey::*;
    match role {
        // Owner defaults are all-true; the bypass makes them unreachable in
        // practice, but the matrix stays total
        Role::Owner => true,
        Role::Manager => match key {
            SalesCreate | SalesView | InventoryView | InventoryEdit | PurchasesCreate
            | PurchasesView | SuppliersManage | ExpensesCreate | ExpensesView
            | DeliveriesManage | RemindersManage | TeamManage => true,
            BillingManage | SettingsManage => false,
        },
        Role::Finance => match key {
            SalesView | InventoryView | PurchasesView | ExpensesCreate | ExpensesView
            | RemindersManage | BillingManage => true,
            SalesCreate | InventoryEdit | PurchasesCreate | SuppliersManage
            | DeliveriesManage | TeamManage | SettingsManage => false,
        },
        Role::Staff => match key {
            SalesCreate | SalesView | InventoryView => true,
            InventoryEdit | PurchasesCreate | PurchasesView | SuppliersManage
            | ExpensesCreate | ExpensesView | DeliveriesManage | RemindersManage
            | BillingManage | TeamManage | SettingsManage => false,
        },
    }
}

/// The full resolved map: every key in the universe, with a boolean decision.
pub type ResolvedPermissions = BTreeMap<PermissionKey, bool>;

/// Builds the default permission set for a role.
///
/// Contains exactly the keys of [`PermissionKey::ALL`], no more, no less.
pub fn default_permissions(role: Role) -> ResolvedPermissions {
    PermissionKey::ALL
        .iter()
        .map(|&key| (key, default_allow(role, key)))
        .collect()
}

/// Resolves a role's defaults against per-user override JSON.
///
/// ## Override Semantics
/// The overrides value is the raw JSONB column from the access record:
/// - Not an object (null, array, string, ...) ⇒ pure defaults
/// - Entry with a key outside the universe ⇒ dropped
/// - Entry with a non-boolean value ⇒ dropped
/// - Entry with a known key and a boolean ⇒ replaces the default
///
/// Dropping is silent by design - fail-safe, not an error condition.
pub fn resolve_permissions(role: Role, overrides: &Value) -> ResolvedPermissions {
    let mut resolved = default_permissions(role);

    if let Value::Object(entries) = overrides {
        for (name, value) in entries {
            let (Some(key), Value::Bool(allow)) = (PermissionKey::parse(name), value) else {
                continue;
            };
            resolved.insert(key, *allow);
        }
    }

    resolved
}

// =============================================================================
// Access Record
// =============================================================================

/// A per-user-per-shop access record, as fetched by the external data layer.
///
/// This crate only consumes these; creating and storing them belongs to the
/// access-control subsystem of the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccessRecord {
    /// The user this record grants access to.
    pub user_id: String,

    /// The shop (tenant) scope of the grant.
    pub shop_id: String,

    /// Role name as stored ("owner", "manager", ...). Unknown names coerce
    /// to staff at resolution time.
    pub role: String,

    /// Revoked/suspended records stay in the table with this flag cleared.
    pub is_active: bool,

    /// Raw per-user override JSON (the JSONB column, verbatim).
    #[ts(type = "Record<string, unknown>")]
    pub overrides: Value,
}

// =============================================================================
// Permissions (the resolved query surface)
// =============================================================================

/// Resolved permission state for one user in one shop.
///
/// ## Lifecycle
/// Recomputed whenever the access record changes; never persisted. A user
/// with no active record resolves to [`Permissions::none`], on which every
/// predicate answers false.
#[derive(Debug, Clone, Default)]
pub struct Permissions {
    /// `None` = no access at all (no record, or record inactive).
    inner: Option<Resolved>,
}

#[derive(Debug, Clone)]
struct Resolved {
    role: Role,
    map: ResolvedPermissions,
}

impl Permissions {
    /// The empty permission state: every predicate answers false.
    pub fn none() -> Self {
        Permissions { inner: None }
    }

    /// Resolves permissions from a fetched access record.
    ///
    /// `None` or an inactive record yields the empty state - fail-closed.
    pub fn from_record(record: Option<&AccessRecord>) -> Self {
        match record {
            Some(rec) if rec.is_active => {
                let role = Role::from_name(&rec.role);
                Permissions {
                    inner: Some(Resolved {
                        role,
                        map: resolve_permissions(role, &rec.overrides),
                    }),
                }
            }
            _ => Permissions::none(),
        }
    }

    /// Resolves permissions directly from a role and override JSON.
    pub fn from_role(role: Role, overrides: &Value) -> Self {
        Permissions {
            inner: Some(Resolved {
                role,
                map: resolve_permissions(role, overrides),
            }),
        }
    }

    /// The resolved role, if any access exists.
    pub fn role(&self) -> Option<Role> {
        self.inner.as_ref().map(|r| r.role)
    }

    /// True iff the user holds the permission.
    ///
    /// Deny-by-default: no access, or a key resolved to false, answers false.
    /// Owner answers true for every key regardless of the map.
    pub fn can(&self, key: PermissionKey) -> bool {
        match &self.inner {
            Some(resolved) => {
                if resolved.role.has_universal_access() {
                    return true;
                }
                resolved.map.get(&key).copied().unwrap_or(false)
            }
            None => false,
        }
    }

    /// Logical negation of [`Permissions::can`].
    pub fn cannot(&self, key: PermissionKey) -> bool {
        !self.can(key)
    }

    /// True iff the user holds at least one of the keys.
    ///
    /// Answers false with no access even for an empty key list - absence of
    /// access trumps vacuous truth. Universal access answers true.
    pub fn can_any(&self, keys: &[PermissionKey]) -> bool {
        match &self.inner {
            Some(resolved) => {
                resolved.role.has_universal_access() || keys.iter().any(|&k| self.can(k))
            }
            None => false,
        }
    }

    /// True iff the user holds every one of the keys.
    ///
    /// Answers false with no access even for an empty key list, same as
    /// [`Permissions::can_any`].
    pub fn can_all(&self, keys: &[PermissionKey]) -> bool {
        match &self.inner {
            Some(resolved) => {
                resolved.role.has_universal_access() || keys.iter().all(|&k| self.can(k))
            }
            None => false,
        }
    }

    /// True iff the user's role ranks at or above `target` in the hierarchy.
    ///
    /// Reflexive for every valid role; false whenever there is no access.
    pub fn is_at_least(&self, target: Role) -> bool {
        match &self.inner {
            Some(resolved) => resolved.role.rank() <= target.rank(),
            None => false,
        }
    }

    /// Read access to the full resolved map (for settings screens that show
    /// the whole grid).
    pub fn resolved(&self) -> Option<&ResolvedPermissions> {
        self.inner.as_ref().map(|r| &r.map)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(role: &str, active: bool, overrides: Value) -> AccessRecord {
        AccessRecord {
            user_id: "u1".to_string(),
            shop_id: "s1".to_string(),
            role: role.to_string(),
            is_active: active,
            overrides,
        }
    }

    #[test]
    fn test_role_rank_order() {
        // owner < manager < finance < staff
        assert!(Role::Owner.rank() < Role::Manager.rank());
        assert!(Role::Manager.rank() < Role::Finance.rank());
        assert!(Role::Finance.rank() < Role::Staff.rank());
    }

    #[test]
    fn test_role_from_name_coerces_unknown_to_staff() {
        assert_eq!(Role::from_name("owner"), Role::Owner);
        assert_eq!(Role::from_name("  Manager "), Role::Manager);
        assert_eq!(Role::from_name("FINANCE"), Role::Finance);
        assert_eq!(Role::from_name("supervisor"), Role::Staff);
        assert_eq!(Role::from_name(""), Role::Staff);
    }

    #[test]
    fn test_only_owner_has_universal_access() {
        assert!(Role::Owner.has_universal_access());
        assert!(!Role::Manager.has_universal_access());
        assert!(!Role::Finance.has_universal_access());
        assert!(!Role::Staff.has_universal_access());
    }

    #[test]
    fn test_permission_key_roundtrip() {
        for key in PermissionKey::ALL {
            assert_eq!(PermissionKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(PermissionKey::parse("moon.landing"), None);
        assert_eq!(PermissionKey::parse("sales.CREATE"), None);
    }

    #[test]
    fn test_defaults_cover_full_universe_for_every_role() {
        for role in Role::ALL {
            let defaults = default_permissions(role);
            assert_eq!(defaults.len(), PermissionKey::ALL.len());
            for key in PermissionKey::ALL {
                assert!(defaults.contains_key(&key), "{role} missing {key}");
            }
        }
    }

    #[test]
    fn test_resolve_keeps_exact_key_set() {
        // Overrides never add or drop keys, only flip values
        let overrides = json!({
            "sales.create": false,
            "moon.landing": true,
            "billing.manage": "yes"
        });
        let resolved = resolve_permissions(Role::Manager, &overrides);

        assert_eq!(resolved.len(), PermissionKey::ALL.len());
        assert_eq!(resolved[&PermissionKey::SalesCreate], false); // honored
        assert_eq!(
            resolved[&PermissionKey::BillingManage],
            default_allow(Role::Manager, PermissionKey::BillingManage)
        ); // non-boolean dropped
    }

    #[test]
    fn test_resolve_non_object_overrides_yield_defaults() {
        for overrides in [json!(null), json!([1, 2]), json!("nope"), json!(42)] {
            let resolved = resolve_permissions(Role::Finance, &overrides);
            assert_eq!(resolved, default_permissions(Role::Finance));
        }
    }

    #[test]
    fn test_owner_bypasses_explicit_false_overrides() {
        let perms = Permissions::from_record(Some(&record(
            "owner",
            true,
            json!({ "sales.create": false, "settings.manage": false }),
        )));

        for key in PermissionKey::ALL {
            assert!(perms.can(key), "owner denied {key}");
        }
    }

    #[test]
    fn test_manager_override_denies() {
        let perms = Permissions::from_record(Some(&record(
            "manager",
            true,
            json!({ "sales.create": false }),
        )));

        assert!(perms.cannot(PermissionKey::SalesCreate));
        assert!(perms.can(PermissionKey::SalesView));
        assert!(perms.cannot(PermissionKey::BillingManage)); // default false
    }

    #[test]
    fn test_staff_override_grants() {
        let perms = Permissions::from_record(Some(&record(
            "staff",
            true,
            json!({ "expenses.view": true }),
        )));

        assert!(perms.can(PermissionKey::ExpensesView));
        assert!(perms.cannot(PermissionKey::ExpensesCreate));
    }

    #[test]
    fn test_unknown_role_gets_staff_defaults() {
        let perms = Permissions::from_record(Some(&record("supervisor", true, json!({}))));

        assert_eq!(perms.role(), Some(Role::Staff));
        assert!(perms.can(PermissionKey::SalesCreate));
        assert!(perms.cannot(PermissionKey::TeamManage));
    }

    #[test]
    fn test_no_record_is_all_false() {
        let perms = Permissions::from_record(None);

        assert_eq!(perms.role(), None);
        for key in PermissionKey::ALL {
            assert!(!perms.can(key));
        }
        assert!(!perms.can_any(&[]));
        assert!(!perms.can_all(&[]));
        assert!(!perms.is_at_least(Role::Staff));
    }

    #[test]
    fn test_inactive_record_is_all_false() {
        let perms = Permissions::from_record(Some(&record("owner", false, json!({}))));

        assert_eq!(perms.role(), None);
        assert!(!perms.can(PermissionKey::SalesView));
        assert!(!perms.is_at_least(Role::Staff));
    }

    #[test]
    fn test_can_any_and_can_all() {
        let perms = Permissions::from_record(Some(&record("staff", true, json!({}))));

        assert!(perms.can_any(&[PermissionKey::SalesCreate, PermissionKey::TeamManage]));
        assert!(!perms.can_any(&[PermissionKey::TeamManage, PermissionKey::BillingManage]));

        assert!(perms.can_all(&[PermissionKey::SalesCreate, PermissionKey::SalesView]));
        assert!(!perms.can_all(&[PermissionKey::SalesCreate, PermissionKey::TeamManage]));

        // With access, the empty list follows standard quantification
        assert!(perms.can_all(&[]));
        assert!(!perms.can_any(&[]));
    }

    #[test]
    fn test_is_at_least_reflexive_and_ordered() {
        for role in Role::ALL {
            let perms = Permissions::from_role(role, &json!({}));
            assert!(perms.is_at_least(role), "{role} not reflexive");
        }

        let manager = Permissions::from_role(Role::Manager, &json!({}));
        assert!(manager.is_at_least(Role::Finance));
        assert!(manager.is_at_least(Role::Staff));
        assert!(!manager.is_at_least(Role::Owner));

        let owner = Permissions::from_role(Role::Owner, &json!({}));
        for role in Role::ALL {
            assert!(owner.is_at_least(role));
        }
    }
}
