//! # Cart Pricing Engine
//!
//! The in-memory line-item cart with per-line and order-level discounts, and
//! the pure arithmetic that derives every displayed amount.
//!
//! ## Derivation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Totals Derivation                              │
//! │                                                                         │
//! │  per line:   unit_price × qty = line base                               │
//! │              line base − line discount (capped at base) = line total    │
//! │                                                                         │
//! │  cart:       Σ line totals                = subtotal                    │
//! │              order discount vs subtotal   = order discount amount       │
//! │                (percentage: bps of subtotal; fixed: min(v, subtotal))   │
//! │              subtotal − order discount    = taxable base  (≥ 0)         │
//! │              taxable base × tax rate      = tax                         │
//! │              taxable base + tax           = grand total   (≥ 0)         │
//! │                                                                         │
//! │  Tax is ALWAYS computed on the post-discount base, never the raw        │
//! │  subtotal. Every stage floors at zero; no discount can produce a        │
//! │  negative line, base, or total.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `item_id` (adding the same catalog item coalesces)
//! - Quantity is always ≥ 1 (a quantity below 1 removes the line)
//! - An order discount is only retained when its value is > 0
//! - Derived values are recomputed on read, never cached as mutable state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{CatalogItem, CustomerRef, TaxRate};

// =============================================================================
// Discount
// =============================================================================

/// A discount, applied either to one line or to the whole order.
///
/// ## Units
/// - `Percentage` carries basis points: 1000 = 10%. Conversion from the
///   display percentage happens at the API boundary, not in the engine.
/// - `Fixed` carries cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage of the base, in basis points.
    Percentage(u32),
    /// Flat amount in cents.
    Fixed(i64),
}

impl Discount {
    /// True when the discount would actually subtract something.
    ///
    /// Used by [`Cart::set_order_discount`] to refuse "0% discount" entries
    /// that would pollute totals displays.
    pub const fn is_positive(&self) -> bool {
        match self {
            Discount::Percentage(bps) => *bps > 0,
            Discount::Fixed(cents) => *cents > 0,
        }
    }

    /// The amount this discount removes from `base`.
    ///
    /// Clamped into `[0, base]` in both directions: a fixed discount larger
    /// than the base is capped at the base, and a (never-validated) negative
    /// fixed value subtracts nothing.
    pub fn amount_of(&self, base: Money) -> Money {
        let raw = match self {
            Discount::Percentage(bps) => base.portion_bps(*bps),
            Discount::Fixed(cents) => Money::from_cents(*cents),
        };
        raw.clamp_non_negative().min(base.clamp_non_negative())
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line in the cart.
///
/// ## Design Notes
/// - `id`: line identity, generated at add time; all mutations address it
/// - `item_id`: catalog reference used for coalescing
/// - Price, name, sku, and weight are frozen at add time so the cart stays
///   consistent even if inventory is edited mid-sale
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line identity (UUID v4), generated at add time.
    pub id: String,

    /// Catalog item reference (coalescing key).
    pub item_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    /// This is critical: we lock in the price when added to cart.
    pub unit_price_cents: i64,

    /// Piece weight in grams at time of adding (frozen), for receipts.
    pub weight_grams: Option<i64>,

    /// Quantity in cart, always ≥ 1.
    pub quantity: i64,

    /// Optional per-line discount.
    pub discount: Option<Discount>,

    /// When this line was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new line from a catalog item, freezing its price.
    pub fn from_catalog(item: &CatalogItem, quantity: i64) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            item_id: item.id.clone(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            unit_price_cents: item.price_cents,
            weight_grams: item.weight_grams,
            quantity,
            discount: None,
            added_at: Utc::now(),
        }
    }

    /// Line base: `unit_price × quantity`, before any discount.
    pub fn line_base(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Amount removed by this line's own discount (0 when none).
    pub fn line_discount(&self) -> Money {
        match &self.discount {
            Some(d) => d.amount_of(self.line_base()),
            None => Money::zero(),
        }
    }

    /// Line total after the line discount, ≥ 0 by construction.
    pub fn line_total(&self) -> Money {
        (self.line_base() - self.line_discount()).clamp_non_negative()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The active cart: ordered lines, an optional customer, an optional
/// order-level discount, and free-text notes.
///
/// One active cart exists per session; hold/restore snapshots live in
/// [`crate::session::PosSession`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines, in insertion order.
    pub items: Vec<CartItem>,

    /// Customer attached to the sale, if any.
    pub customer: Option<CustomerRef>,

    /// Order-level discount, applied once to the whole cart.
    pub order_discount: Option<Discount>,

    /// Free-text notes carried onto the sale.
    pub notes: String,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a catalog item to the cart, coalescing onto an existing line.
    ///
    /// ## Behavior
    /// - Same `item_id` already present: its quantity increases - no two
    ///   lines with the same catalog reference ever coexist
    /// - Otherwise: a new line is appended with a fresh identity and a
    ///   price snapshot
    /// - `quantity < 1`: no-op (the quantity ≥ 1 invariant holds at
    ///   insertion too)
    ///
    /// ## Returns
    /// The id of the line that now holds the item, `None` on the no-op.
    pub fn add_item(&mut self, item: &CatalogItem, quantity: i64) -> Option<String> {
        if quantity < 1 {
            return None;
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity += quantity;
            return Some(line.id.clone());
        }

        let line = CartItem::from_catalog(item, quantity);
        let id = line.id.clone();
        self.items.push(line);
        Some(id)
    }

    /// Removes the line with the given identity; no-op if absent.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|l| l.id != id);
    }

    /// Replaces a line's quantity.
    ///
    /// `quantity < 1` removes the line entirely - it is never clamped to
    /// zero-and-kept.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity < 1 {
            self.remove_item(id);
            return;
        }

        if let Some(line) = self.items.iter_mut().find(|l| l.id == id) {
            line.quantity = quantity;
        }
    }

    /// Sets or clears a line's discount.
    ///
    /// `None` clears both the type and the value; no-op for an unknown id.
    pub fn set_item_discount(&mut self, id: &str, discount: Option<Discount>) {
        if let Some(line) = self.items.iter_mut().find(|l| l.id == id) {
            line.discount = discount;
        }
    }

    /// Sets or clears the order-level discount.
    ///
    /// Retained only when present AND its value is > 0; a `Some` with a zero
    /// value clears to `None`, so a "0% discount" never pollutes totals.
    pub fn set_order_discount(&mut self, discount: Option<Discount>) {
        self.order_discount = discount.filter(Discount::is_positive);
    }

    /// Attaches or detaches the customer.
    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        self.customer = customer;
    }

    /// Replaces the cart notes.
    pub fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    /// Resets items, customer, discount, and notes in one step.
    ///
    /// Held orders are not this type's concern; see
    /// [`crate::session::PosSession::clear_cart`] vs
    /// [`crate::session::PosSession::reset`].
    pub fn clear(&mut self) {
        self.items.clear();
        self.customer = None;
        self.order_discount = None;
        self.notes.clear();
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal: sum of line totals (post line-discount, pre order-discount).
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }

    /// Sum of all line-level discount amounts.
    pub fn line_discount_total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_discount())
    }

    /// Amount removed by the order-level discount.
    ///
    /// Percentage: bps of the subtotal. Fixed: `min(value, subtotal)` - an
    /// order-level fixed discount can never exceed the subtotal.
    pub fn order_discount_amount(&self) -> Money {
        match &self.order_discount {
            Some(d) => d.amount_of(self.subtotal()),
            None => Money::zero(),
        }
    }

    /// Taxable base: `subtotal − order discount`, ≥ 0 by construction.
    pub fn taxable_base(&self) -> Money {
        (self.subtotal() - self.order_discount_amount()).clamp_non_negative()
    }

    /// Tax on the post-discount taxable base - never on the raw subtotal.
    pub fn tax_amount(&self, rate: TaxRate) -> Money {
        self.taxable_base().calculate_tax(rate)
    }

    /// Grand total: `taxable base + tax`, floored at zero as a final
    /// safety net.
    pub fn grand_total(&self, rate: TaxRate) -> Money {
        (self.taxable_base() + self.tax_amount(rate)).clamp_non_negative()
    }

    /// Computes the full totals summary in one pass.
    pub fn totals(&self, rate: TaxRate) -> CartTotals {
        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            subtotal_cents: self.subtotal().cents(),
            line_discount_cents: self.line_discount_total().cents(),
            order_discount_cents: self.order_discount_amount().cents(),
            taxable_cents: self.taxable_base().cents(),
            tax_cents: self.tax_amount(rate).cents(),
            total_cents: self.grand_total(rate).cents(),
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Totals summary for display layers.
///
/// Plain computed values: recomputed from the cart on every read, never
/// stored or mutated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub line_discount_cents: i64,
    pub order_discount_cents: i64,
    pub taxable_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SHOP_ID;

    fn catalog_item(id: &str, price_cents: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            shop_id: DEFAULT_SHOP_ID.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Item {}", id),
            category: Some("Rings".to_string()),
            price_cents,
            weight_grams: Some(10),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item_coalesces_same_catalog_reference() {
        let mut cart = Cart::new();
        let ring = catalog_item("ring", 10_000);

        let first = cart.add_item(&ring, 1).unwrap();
        let second = cart.add_item(&ring, 2).unwrap();

        // One line, quantity 3, never two lines
        assert_eq!(first, second);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[test]
    fn test_add_item_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(&catalog_item("ring", 10_000), 0), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_freezes_price() {
        let mut cart = Cart::new();
        let mut ring = catalog_item("ring", 10_000);
        cart.add_item(&ring, 1);

        // Inventory edit after adding must not touch the cart
        ring.price_cents = 99_000;
        assert_eq!(cart.items[0].unit_price_cents, 10_000);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&catalog_item("a", 1000), 2);
        let id = cart.add_item(&catalog_item("b", 2000), 3).unwrap();
        assert_eq!(cart.total_quantity(), 5);

        cart.update_quantity(&id, 0);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_remove_item_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&catalog_item("a", 1000), 1);
        cart.remove_item("no-such-line");
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_line_percentage_discount() {
        // price 100, qty 2, 10% off: 200 − 20 = 180
        let mut cart = Cart::new();
        let id = cart.add_item(&catalog_item("a", 100), 2).unwrap();
        cart.set_item_discount(&id, Some(Discount::Percentage(1000)));

        assert_eq!(cart.items[0].line_total().cents(), 180);
        assert_eq!(cart.subtotal().cents(), 180);
        assert_eq!(cart.line_discount_total().cents(), 20);
    }

    #[test]
    fn test_line_fixed_discount_floors_at_zero() {
        // price 100, qty 2, fixed 250: floors to 0, not −50
        let mut cart = Cart::new();
        let id = cart.add_item(&catalog_item("a", 100), 2).unwrap();
        cart.set_item_discount(&id, Some(Discount::Fixed(250)));

        assert_eq!(cart.items[0].line_total().cents(), 0);
        assert_eq!(cart.items[0].line_discount().cents(), 200); // capped at base
    }

    #[test]
    fn test_clear_item_discount() {
        let mut cart = Cart::new();
        let id = cart.add_item(&catalog_item("a", 100), 1).unwrap();
        cart.set_item_discount(&id, Some(Discount::Percentage(1000)));
        cart.set_item_discount(&id, None);

        assert_eq!(cart.items[0].discount, None);
        assert_eq!(cart.items[0].line_total().cents(), 100);
    }

    #[test]
    fn test_order_discount_zero_value_is_cleared() {
        let mut cart = Cart::new();
        cart.set_order_discount(Some(Discount::Percentage(0)));
        assert_eq!(cart.order_discount, None);

        cart.set_order_discount(Some(Discount::Fixed(0)));
        assert_eq!(cart.order_discount, None);

        cart.set_order_discount(Some(Discount::Fixed(500)));
        assert_eq!(cart.order_discount, Some(Discount::Fixed(500)));

        cart.set_order_discount(None);
        assert_eq!(cart.order_discount, None);
    }

    #[test]
    fn test_order_fixed_discount_clamped_to_subtotal() {
        // fixed 500 against subtotal 300 removes exactly 300
        let mut cart = Cart::new();
        cart.add_item(&catalog_item("a", 300), 1);
        cart.set_order_discount(Some(Discount::Fixed(500)));

        assert_eq!(cart.order_discount_amount().cents(), 300);
        assert_eq!(cart.taxable_base().cents(), 0);
        assert_eq!(cart.grand_total(TaxRate::from_bps(1000)).cents(), 0);
    }

    #[test]
    fn test_tax_on_post_discount_base() {
        // subtotal 1000, fixed order discount 200, 10% tax ⇒ tax 80, total 880
        let mut cart = Cart::new();
        cart.add_item(&catalog_item("a", 1000), 1);
        cart.set_order_discount(Some(Discount::Fixed(200)));

        let totals = cart.totals(TaxRate::from_bps(1000));
        assert_eq!(totals.taxable_cents, 800);
        assert_eq!(totals.tax_cents, 80);
        assert_eq!(totals.total_cents, 880);
    }

    #[test]
    fn test_order_percentage_discount() {
        let mut cart = Cart::new();
        cart.add_item(&catalog_item("a", 5000), 2); // subtotal 10,000
        cart.set_order_discount(Some(Discount::Percentage(500))); // 5%

        let totals = cart.totals(TaxRate::zero());
        assert_eq!(totals.order_discount_cents, 500);
        assert_eq!(totals.taxable_cents, 9500);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.total_cents, 9500);
    }

    #[test]
    fn test_totals_combined_line_and_order_discounts() {
        let mut cart = Cart::new();
        let a = cart.add_item(&catalog_item("a", 100), 2).unwrap(); // base 200
        cart.add_item(&catalog_item("b", 300), 1); // base 300
        cart.set_item_discount(&a, Some(Discount::Percentage(1000))); // −20
        cart.set_order_discount(Some(Discount::Fixed(80)));

        let totals = cart.totals(TaxRate::from_bps(1000)); // 10% tax
        assert_eq!(totals.subtotal_cents, 480); // 180 + 300
        assert_eq!(totals.line_discount_cents, 20);
        assert_eq!(totals.order_discount_cents, 80);
        assert_eq!(totals.taxable_cents, 400);
        assert_eq!(totals.tax_cents, 40);
        assert_eq!(totals.total_cents, 440);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 3);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_item(&catalog_item("a", 100), 1);
        cart.set_customer(Some(CustomerRef {
            id: "c1".to_string(),
            name: "Mrs. Khan".to_string(),
            phone: None,
        }));
        cart.set_order_discount(Some(Discount::Fixed(10)));
        cart.set_notes("engrave initials".to_string());

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.customer, None);
        assert_eq!(cart.order_discount, None);
        assert_eq!(cart.notes, "");
    }
}
