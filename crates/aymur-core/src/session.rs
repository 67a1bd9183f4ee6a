//! # POS Session & Held Orders
//!
//! One active cart plus the list of held-order snapshots: the unit of state
//! the persistence adapter round-trips verbatim.
//!
//! ## Held-Order State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Held Order Lifecycle (per snapshot)                     │
//! │                                                                         │
//! │              hold_order                restore_order                    │
//! │   absent ────────────────► held ──────────────────────► absent         │
//! │                              │                                          │
//! │                              └──────────────────────────► absent        │
//! │                                   delete_held_order                     │
//! │                                                                         │
//! │  No other transitions exist. A held order is NEVER mutated in place;   │
//! │  restore consumes it (a snapshot cannot be restored twice).            │
//! │                                                                         │
//! │  hold_order:    refuses on an empty cart (returns None); otherwise    │
//! │                 snapshot + clear happen as ONE transition              │
//! │  restore_order: replace cart wholesale + remove snapshot as ONE       │
//! │                 transition; prior cart contents are discarded          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;

// =============================================================================
// Held Order
// =============================================================================

/// An immutable snapshot of a cart set aside for later resumption.
///
/// Typical use: a customer steps away mid-sale ("walk-away hold") and the
/// counter serves the next customer on a fresh cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeldOrder {
    /// Snapshot identity (UUID v4), generated at hold time.
    pub id: String,

    /// Optional label ("Mrs. Khan - bangles").
    pub label: Option<String>,

    /// When the hold was taken.
    #[ts(as = "String")]
    pub held_at: DateTime<Utc>,

    /// The full cart at hold time: items, customer, discount, notes.
    pub cart: Cart,
}

// =============================================================================
// POS Session
// =============================================================================

/// The per-session POS state: one active cart plus held-order snapshots.
///
/// All transitions here are synchronous and atomic from the caller's point
/// of view: a hold or restore is observed either fully applied or not at
/// all, never half-cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PosSession {
    /// The active cart.
    pub cart: Cart,

    /// Snapshots awaiting restore, newest last.
    pub held_orders: Vec<HeldOrder>,
}

impl PosSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        PosSession::default()
    }

    /// Holds the active cart as a new snapshot.
    ///
    /// ## Behavior
    /// - Empty cart: refused, returns `None`, held list untouched
    /// - Otherwise: the snapshot is appended and the active cart (items,
    ///   customer, discount, notes) is cleared in the same transition
    ///
    /// ## Returns
    /// The new snapshot's id on success.
    pub fn hold_order(&mut self, label: Option<String>) -> Option<String> {
        if self.cart.is_empty() {
            return None;
        }

        let held = HeldOrder {
            id: Uuid::new_v4().to_string(),
            label,
            held_at: Utc::now(),
            cart: std::mem::take(&mut self.cart),
        };
        let id = held.id.clone();
        self.held_orders.push(held);
        Some(id)
    }

    /// Restores a held snapshot into the active cart.
    ///
    /// ## Behavior
    /// - Unknown id: returns false, cart and held list untouched
    /// - Known id: the active cart is replaced wholesale (prior contents are
    ///   discarded - callers hold first if they want to keep them) and the
    ///   snapshot is removed, in the same transition
    pub fn restore_order(&mut self, id: &str) -> bool {
        let Some(pos) = self.held_orders.iter().position(|h| h.id == id) else {
            return false;
        };

        let held = self.held_orders.remove(pos);
        self.cart = held.cart;
        true
    }

    /// Deletes a held snapshot without touching the active cart.
    ///
    /// Returns false if no snapshot with that id exists.
    pub fn delete_held_order(&mut self, id: &str) -> bool {
        let before = self.held_orders.len();
        self.held_orders.retain(|h| h.id != id);
        self.held_orders.len() != before
    }

    /// Clears the active cart only. Held orders survive - they are meant to
    /// outlive an active-cart clear.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Clears the active cart AND drops every held order.
    pub fn reset(&mut self) {
        self.cart.clear();
        self.held_orders.clear();
    }

    /// Number of snapshots currently held.
    pub fn held_count(&self) -> usize {
        self.held_orders.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Discount;
    use crate::types::{CatalogItem, CustomerRef};
    use crate::DEFAULT_SHOP_ID;

    fn catalog_item(id: &str, price_cents: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            shop_id: DEFAULT_SHOP_ID.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Item {}", id),
            category: None,
            price_cents,
            weight_grams: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn loaded_session() -> PosSession {
        let mut session = PosSession::new();
        session.cart.add_item(&catalog_item("ring", 10_000), 2);
        session.cart.set_customer(Some(CustomerRef {
            id: "c1".to_string(),
            name: "Mrs. Khan".to_string(),
            phone: Some("0300-0000000".to_string()),
        }));
        session.cart.set_order_discount(Some(Discount::Fixed(500)));
        session.cart.set_notes("resize to 17".to_string());
        session
    }

    #[test]
    fn test_hold_empty_cart_refused() {
        let mut session = PosSession::new();
        assert_eq!(session.hold_order(Some("nope".to_string())), None);
        assert_eq!(session.held_count(), 0);
    }

    #[test]
    fn test_hold_snapshots_and_clears_atomically() {
        let mut session = loaded_session();

        let id = session.hold_order(Some("Mrs. Khan".to_string())).unwrap();

        // Snapshot appended...
        assert_eq!(session.held_count(), 1);
        let held = &session.held_orders[0];
        assert_eq!(held.id, id);
        assert_eq!(held.label.as_deref(), Some("Mrs. Khan"));
        assert_eq!(held.cart.items.len(), 1);
        assert_eq!(held.cart.notes, "resize to 17");
        assert!(held.cart.customer.is_some());
        assert_eq!(held.cart.order_discount, Some(Discount::Fixed(500)));

        // ...and the active cart fully cleared in the same transition
        assert!(session.cart.is_empty());
        assert_eq!(session.cart.customer, None);
        assert_eq!(session.cart.order_discount, None);
        assert_eq!(session.cart.notes, "");
    }

    #[test]
    fn test_restore_unknown_id_changes_nothing() {
        let mut session = loaded_session();
        session.hold_order(None);
        session.cart.add_item(&catalog_item("chain", 5000), 1);

        assert!(!session.restore_order("no-such-hold"));
        assert_eq!(session.held_count(), 1);
        assert_eq!(session.cart.items.len(), 1);
        assert_eq!(session.cart.items[0].item_id, "chain");
    }

    #[test]
    fn test_restore_replaces_wholesale_and_consumes_snapshot() {
        let mut session = loaded_session();
        let id = session.hold_order(None).unwrap();

        // Work on a different cart in the meantime
        session.cart.add_item(&catalog_item("chain", 5000), 3);

        assert!(session.restore_order(&id));

        // Prior contents discarded, not merged
        assert_eq!(session.cart.items.len(), 1);
        assert_eq!(session.cart.items[0].item_id, "ring");
        assert_eq!(session.cart.notes, "resize to 17");

        // Consumed: cannot restore twice
        assert_eq!(session.held_count(), 0);
        assert!(!session.restore_order(&id));
    }

    #[test]
    fn test_multiple_holds_coexist_and_restore_removes_exactly_one() {
        let mut session = PosSession::new();
        session.cart.add_item(&catalog_item("a", 100), 1);
        let first = session.hold_order(Some("first".to_string())).unwrap();
        session.cart.add_item(&catalog_item("b", 200), 1);
        let second = session.hold_order(Some("second".to_string())).unwrap();

        assert_eq!(session.held_count(), 2);
        assert!(session.restore_order(&first));
        assert_eq!(session.held_count(), 1);
        assert_eq!(session.held_orders[0].id, second);
        assert_eq!(session.cart.items[0].item_id, "a");
    }

    #[test]
    fn test_delete_held_order() {
        let mut session = loaded_session();
        let id = session.hold_order(None).unwrap();
        session.cart.add_item(&catalog_item("chain", 5000), 1);

        assert!(session.delete_held_order(&id));
        assert_eq!(session.held_count(), 0);
        // Active cart untouched
        assert_eq!(session.cart.items.len(), 1);

        assert!(!session.delete_held_order(&id));
    }

    #[test]
    fn test_clear_cart_keeps_held_orders() {
        let mut session = loaded_session();
        session.hold_order(None);
        session.cart.add_item(&catalog_item("chain", 5000), 1);

        session.clear_cart();

        assert!(session.cart.is_empty());
        assert_eq!(session.held_count(), 1);
    }

    #[test]
    fn test_reset_drops_held_orders() {
        let mut session = loaded_session();
        session.hold_order(None);

        session.reset();

        assert!(session.cart.is_empty());
        assert_eq!(session.held_count(), 0);
    }
}
