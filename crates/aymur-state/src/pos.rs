//! # POS State
//!
//! The injectable container owning one POS session.
//!
//! ## Thread Safety & Write-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PosState Mutation Path                             │
//! │                                                                         │
//! │  caller ──► validate input ──► lock Mutex<PosSession>                   │
//! │                                   │                                     │
//! │                                   ├── apply core transition             │
//! │                                   ├── store.save(&session)  ◄── inside  │
//! │                                   │     └── on Err: warn!, keep going   │
//! │                                   └── build CartView                    │
//! │                                unlock                                   │
//! │                                                                         │
//! │  The write-through happens INSIDE the critical section, so cart        │
//! │  mutations are atomically visible before a hold/restore completes      │
//! │  even with a persistence layer attached.                                │
//! │                                                                         │
//! │  Store failures never fail the mutation: the in-memory session is the  │
//! │  source of truth (browser local-storage semantics - a failed write     │
//! │  must not take down the POS floor).                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Mutex, Not RwLock?
//! Nearly every operation on the session mutates it, and each completes in
//! microseconds. An RwLock would add complexity with minimal benefit.

use std::sync::Mutex;

use aymur_core::cart::{CartItem, CartTotals, Discount};
use aymur_core::error::{CoreError, CoreResult};
use aymur_core::session::PosSession;
use aymur_core::types::{CatalogItem, CustomerRef, TaxRate};
use aymur_core::validation::{
    validate_cart_size, validate_fixed_discount_cents, validate_label, validate_notes,
    validate_percentage_bps, validate_quantity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::StateError;
use crate::store::SessionStore;

// =============================================================================
// View Types
// =============================================================================

/// Full cart view returned by every mutation, for display layers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub customer: Option<CustomerRef>,
    pub order_discount: Option<Discount>,
    pub notes: String,
    pub totals: CartTotals,
    pub held_count: usize,
}

/// Listing entry for the held-orders panel; the full cart stays server-side
/// until restore.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeldOrderSummary {
    pub id: String,
    pub label: Option<String>,
    #[ts(as = "String")]
    pub held_at: DateTime<Utc>,
    pub line_count: usize,
    pub customer_name: Option<String>,
}

// =============================================================================
// POS State
// =============================================================================

/// Owns the POS session behind a `Mutex`, with an injected [`SessionStore`].
///
/// Constructed once by the application root and passed by reference; its
/// methods are the only mutation surface for cart and held-order state.
pub struct PosState {
    session: Mutex<PosSession>,
    store: Box<dyn SessionStore>,
    tax_rate: TaxRate,
}

impl PosState {
    /// Creates a fresh state with the given store and shop tax rate.
    pub fn new(store: Box<dyn SessionStore>, tax_rate: TaxRate) -> Self {
        PosState {
            session: Mutex::new(PosSession::new()),
            store,
            tax_rate,
        }
    }

    /// Replaces the in-memory session with the store's snapshot, when one
    /// exists. Returns whether anything was loaded.
    ///
    /// Unlike the write-through, load failures ARE surfaced: a corrupt
    /// snapshot at startup is something the caller should know about.
    pub fn load_persisted(&self) -> Result<bool, StateError> {
        let Some(persisted) = self.store.load().map_err(StateError::from)? else {
            return Ok(false);
        };

        let mut session = self.lock();
        *session = persisted;
        info!(
            lines = session.cart.line_count(),
            held = session.held_count(),
            "restored persisted session"
        );
        Ok(true)
    }

    /// Current cart view (read-only).
    pub fn view(&self) -> CartView {
        self.build_view(&self.lock())
    }

    /// Held-order summaries, newest last.
    pub fn held_orders(&self) -> Vec<HeldOrderSummary> {
        self.lock()
            .held_orders
            .iter()
            .map(|h| HeldOrderSummary {
                id: h.id.clone(),
                label: h.label.clone(),
                held_at: h.held_at,
                line_count: h.cart.line_count(),
                customer_name: h.cart.customer.as_ref().map(|c| c.name.clone()),
            })
            .collect()
    }

    // =========================================================================
    // Cart Mutations
    // =========================================================================

    /// Adds a catalog item to the cart (coalescing onto an existing line).
    pub fn add_item(&self, item: &CatalogItem, quantity: i64) -> CoreResult<CartView> {
        validate_quantity(quantity)?;
        if !item.is_active {
            return Err(CoreError::ItemInactive(item.sku.clone()));
        }

        let mut session = self.lock();

        // The line cap only applies when a NEW line would be created
        match session.cart.items.iter().find(|l| l.item_id == item.id) {
            None => {
                validate_cart_size(session.cart.line_count()).map_err(|_| {
                    CoreError::CartTooLarge {
                        max: aymur_core::MAX_CART_LINES,
                    }
                })?;
            }
            Some(line) if line.quantity + quantity > aymur_core::MAX_LINE_QUANTITY => {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity + quantity,
                    max: aymur_core::MAX_LINE_QUANTITY,
                });
            }
            Some(_) => {}
        }

        session.cart.add_item(item, quantity);
        debug!(sku = %item.sku, quantity, "add_item");
        Ok(self.commit(&session))
    }

    /// Removes a line; no-op for an unknown id.
    pub fn remove_item(&self, id: &str) -> CartView {
        let mut session = self.lock();
        session.cart.remove_item(id);
        debug!(line = %id, "remove_item");
        self.commit(&session)
    }

    /// Replaces a line's quantity; a quantity below 1 removes the line.
    pub fn update_quantity(&self, id: &str, quantity: i64) -> CoreResult<CartView> {
        if quantity >= 1 {
            validate_quantity(quantity)?;
        }

        let mut session = self.lock();
        session.cart.update_quantity(id, quantity);
        debug!(line = %id, quantity, "update_quantity");
        Ok(self.commit(&session))
    }

    /// Sets or clears a line discount.
    pub fn set_item_discount(&self, id: &str, discount: Option<Discount>) -> CoreResult<CartView> {
        validate_discount(&discount)?;

        let mut session = self.lock();
        session.cart.set_item_discount(id, discount);
        debug!(line = %id, ?discount, "set_item_discount");
        Ok(self.commit(&session))
    }

    /// Sets or clears the order-level discount.
    pub fn set_order_discount(&self, discount: Option<Discount>) -> CoreResult<CartView> {
        validate_discount(&discount)?;

        let mut session = self.lock();
        session.cart.set_order_discount(discount);
        debug!(?discount, "set_order_discount");
        Ok(self.commit(&session))
    }

    /// Attaches or detaches the customer.
    pub fn set_customer(&self, customer: Option<CustomerRef>) -> CartView {
        let mut session = self.lock();
        session.cart.set_customer(customer);
        self.commit(&session)
    }

    /// Replaces the cart notes.
    pub fn set_notes(&self, notes: &str) -> CoreResult<CartView> {
        validate_notes(notes)?;

        let mut session = self.lock();
        session.cart.set_notes(notes.to_string());
        Ok(self.commit(&session))
    }

    // =========================================================================
    // Hold / Restore
    // =========================================================================

    /// Holds the active cart under an optional label.
    ///
    /// Returns `Ok(None)` for an empty cart (the core sentinel), the new
    /// snapshot id otherwise. Snapshot-append and cart-clear are one
    /// transition; the write-through sees only the final state.
    pub fn hold_order(&self, label: &str) -> CoreResult<Option<String>> {
        let label = validate_label(label)?;

        let mut session = self.lock();
        let held_id = session.hold_order(label);
        match &held_id {
            Some(id) => info!(held = %id, "order held"),
            None => debug!("hold refused: empty cart"),
        }
        if held_id.is_some() {
            self.persist(&session);
        }
        Ok(held_id)
    }

    /// Restores a held order into the active cart, consuming the snapshot.
    /// False for an unknown id; nothing changes in that case.
    pub fn restore_order(&self, id: &str) -> bool {
        let mut session = self.lock();
        let restored = session.restore_order(id);
        if restored {
            info!(held = %id, "order restored");
            self.persist(&session);
        }
        restored
    }

    /// Deletes a held snapshot without touching the active cart.
    pub fn delete_held_order(&self, id: &str) -> bool {
        let mut session = self.lock();
        let deleted = session.delete_held_order(id);
        if deleted {
            self.persist(&session);
        }
        deleted
    }

    /// Clears the active cart; held orders survive.
    pub fn clear_cart(&self) -> CartView {
        let mut session = self.lock();
        session.clear_cart();
        debug!("clear_cart");
        self.commit(&session)
    }

    /// Clears the active cart AND all held orders.
    pub fn reset(&self) -> CartView {
        let mut session = self.lock();
        session.reset();
        debug!("reset");
        self.commit(&session)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> std::sync::MutexGuard<'_, PosSession> {
        self.session.lock().expect("session mutex poisoned")
    }

    /// Write-through + view, called with the lock still held.
    fn commit(&self, session: &PosSession) -> CartView {
        self.persist(session);
        self.build_view(session)
    }

    fn persist(&self, session: &PosSession) {
        if let Err(err) = self.store.save(session) {
            // In-memory session stays the source of truth
            warn!(error = %err, "session write-through failed");
        }
    }

    fn build_view(&self, session: &PosSession) -> CartView {
        CartView {
            items: session.cart.items.clone(),
            customer: session.cart.customer.clone(),
            order_discount: session.cart.order_discount,
            notes: session.cart.notes.clone(),
            totals: session.cart.totals(self.tax_rate),
            held_count: session.held_count(),
        }
    }
}

fn validate_discount(discount: &Option<Discount>) -> CoreResult<()> {
    match discount {
        Some(Discount::Percentage(bps)) => validate_percentage_bps(*bps)?,
        Some(Discount::Fixed(cents)) => validate_fixed_discount_cents(*cents)?,
        None => {}
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
