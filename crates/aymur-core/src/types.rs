//! # Domain Types
//!
//! Shared reference types consumed by the Aymur rule engines.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │  CustomerRef    │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  bps (u32)      │       │
//! │  │  sku (business) │   │  name           │   │  825 = 8.25%    │       │
//! │  │  price_cents    │   │  phone          │   └─────────────────┘       │
//! │  │  weight_grams   │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  These are REFERENCES: inventory and customer records are owned by     │
//! │  the external data layer. The cart only snapshots what it needs at     │
//! │  add time and never writes back.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for coalescing and lookups
//! - Business ID: (sku) - human-readable, potentially mutable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%; GST-style rates like 17% are 1700 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// An inventory item available for sale, as supplied by inventory lookup.
///
/// ## Jewelry Specifics
/// Pieces are sold by unit but tracked by weight: a bangle set has one price
/// but its gram weight drives repurchase and valuation workflows elsewhere.
/// The cart carries the weight through for receipts, never recomputes price
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shop (tenant) this item belongs to.
    pub shop_id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in search and on receipts.
    pub name: String,

    /// Category label ("Rings", "Necklaces", ...).
    pub category: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Piece weight in grams, when tracked.
    pub weight_grams: Option<i64>,

    /// Whether the item is active (soft delete).
    pub is_active: bool,

    /// When the item was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Customer Reference
// =============================================================================

/// A customer attached to a cart, opaque to pricing.
///
/// The full customer record (addresses, purchase history, dues) lives in the
/// external data layer; the cart only needs enough to label the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerRef {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact phone, if on file.
    pub phone: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(17.0);
        assert_eq!(rate.bps(), 1700);
    }

    #[test]
    fn test_catalog_item_price() {
        let item = CatalogItem {
            id: "i1".to_string(),
            shop_id: "s1".to_string(),
            sku: "RING-001".to_string(),
            name: "Gold Ring 22k".to_string(),
            category: Some("Rings".to_string()),
            price_cents: 125_000,
            weight_grams: Some(8),
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(item.price().cents(), 125_000);
    }
}
