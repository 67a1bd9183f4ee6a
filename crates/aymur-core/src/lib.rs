//! # aymur-core: Pure Business Logic for Aymur
//!
//! This crate is the **heart** of Aymur. It contains the product's two rule
//! engines plus their supporting arithmetic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Aymur Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Frontend (web pages, POS UI)                  │   │
//! │  │    Inventory ──► POS Cart ──► Checkout ──► Receipt              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              aymur-state (containers & persistence)             │   │
//! │  │    PosState, AccessState, SessionStore, ShopConfig              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ aymur-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────────┐ ┌───────────────┐  │   │
//! │  │  │  money   │ │   cart   │ │ permissions  │ │    session    │  │   │
//! │  │  │  Money   │ │   Cart   │ │ Role, keys   │ │  PosSession   │  │   │
//! │  │  │ TaxRate  │ │ Discount │ │ Permissions  │ │  HeldOrder    │  │   │
//! │  │  └──────────┘ └──────────┘ └──────────────┘ └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Shared reference types (CatalogItem, CustomerRef, TaxRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`permissions`] - Role/permission resolution and predicate queries
//! - [`cart`] - The cart pricing engine (lines, discounts, derived totals)
//! - [`session`] - Hold/restore order snapshots around the active cart
//! - [`expense`] - Recurring-expense cadence and due-date arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every derivation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Fail-Closed Engines**: The permission and cart engines never panic and
//!    never return `Result` - missing or malformed input degrades to the most
//!    restrictive deterministic answer (denied / ignored / sentinel `None`)
//!
//! ## Example Usage
//!
//! ```rust
//! use aymur_core::money::Money;
//! use aymur_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(125_000); // a gold ring at 1,250.00
//!
//! // 10% line discount as basis points
//! let discount = price.portion_bps(1000);
//! assert_eq!(discount.cents(), 12_500);
//!
//! // Tax on the discounted base
//! let tax = (price - discount).calculate_tax(TaxRate::from_bps(825));
//! assert_eq!(tax.cents(), 9_281);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod expense;
pub mod money;
pub mod permissions;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use aymur_core::Money` instead of
// `use aymur_core::money::Money`

pub use cart::{Cart, CartItem, CartTotals, Discount};
pub use error::{CoreError, ValidationError};
pub use expense::{Cadence, DueStatus, RecurringExpense};
pub use money::Money;
pub use permissions::{AccessRecord, PermissionKey, Permissions, Role};
pub use session::{HeldOrder, PosSession};
pub use types::{CatalogItem, CustomerRef, TaxRate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default shop ID for single-tenant development runs.
///
/// ## Why a constant?
/// The schema is multi-tenant (every record carries a shop id), but local
/// development and the demo binary run against one fixed shop. Production
/// resolves the shop id from the authenticated session instead.
pub const DEFAULT_SHOP_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps a single sale reviewable at the counter.
/// Enforced at the boundary (`validation`), never inside the engine.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Jewelry sales are low-quantity; 999 is already generous.
pub const MAX_LINE_QUANTITY: i64 = 999;
