//! # POS Session Walkthrough
//!
//! Scripted demo of a counter session: add items, apply discounts, hold an
//! order mid-sale, serve a walk-in, restore, and print the totals ledger.
//!
//! ## Usage
//! ```bash
//! cargo run -p aymur-state --bin demo
//!
//! # With mutation-level logging
//! RUST_LOG=debug cargo run -p aymur-state --bin demo
//! ```
//!
//! This is a developer tool for eyeballing engine behavior, not a product
//! surface. It runs entirely in memory.

use aymur_core::cart::Discount;
use aymur_core::permissions::{AccessRecord, PermissionKey};
use aymur_core::types::{CatalogItem, CustomerRef};
use aymur_core::DEFAULT_SHOP_ID;
use aymur_state::{AccessState, MemoryStore, PosState, ShopConfig};
use chrono::Utc;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Sample catalog: (sku, name, category, price in cents, weight in grams)
const CATALOG: &[(&str, &str, &str, i64, i64)] = &[
    ("RING-22K-001", "Gold Ring 22k Classic", "Rings", 8_500_000, 8),
    ("BANG-22K-004", "Gold Bangle 22k Pair", "Bangles", 24_000_000, 24),
    ("CHAIN-21K-002", "Gold Chain 21k Rope", "Chains", 15_500_000, 16),
    ("EAR-22K-007", "Gold Earrings 22k Jhumka", "Earrings", 9_200_000, 10),
];

fn catalog_item(index: usize) -> CatalogItem {
    let (sku, name, category, price_cents, weight_grams) = CATALOG[index];
    CatalogItem {
        id: format!("item-{}", index + 1),
        shop_id: DEFAULT_SHOP_ID.to_string(),
        sku: sku.to_string(),
        name: name.to_string(),
        category: Some(category.to_string()),
        price_cents,
        weight_grams: Some(weight_grams),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn print_ledger(config: &ShopConfig, pos: &PosState) {
    let view = pos.view();
    println!();
    for line in &view.items {
        println!(
            "  {:<28} x{:<3} {:>14}",
            line.name,
            line.quantity,
            config.format_currency(line.line_total().cents())
        );
    }
    let t = &view.totals;
    println!("  {:-<50}", "");
    println!("  {:<32} {:>14}", "Subtotal", config.format_currency(t.subtotal_cents));
    if t.line_discount_cents > 0 {
        println!(
            "  {:<32} {:>14}",
            "Line discounts",
            config.format_currency(-t.line_discount_cents)
        );
    }
    if t.order_discount_cents > 0 {
        println!(
            "  {:<32} {:>14}",
            "Order discount",
            config.format_currency(-t.order_discount_cents)
        );
    }
    println!("  {:<32} {:>14}", "Tax", config.format_currency(t.tax_cents));
    println!("  {:<32} {:>14}", "TOTAL", config.format_currency(t.total_cents));
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("💍 Aymur POS Walkthrough");
    println!("========================");

    let config = ShopConfig::load_or_default()?;
    println!("✓ Config: {} ({})", config.shop_name, config.currency_code);

    let pos = PosState::new(Box::new(MemoryStore::new()), config.tax_rate());

    // Who is behind the counter matters before anything else
    let access = AccessState::new();
    access.set_access_record(Some(&AccessRecord {
        user_id: "demo-user".to_string(),
        shop_id: config.shop_id.clone(),
        role: "staff".to_string(),
        is_active: true,
        overrides: json!({ "expenses.view": true }),
    }));
    println!(
        "✓ Signed in as {} (can create sales: {})",
        access.role().map(|r| r.to_string()).unwrap_or_default(),
        access.can(PermissionKey::SalesCreate)
    );

    // ---- Sale 1: Mrs. Khan's bridal set -------------------------------------
    println!();
    println!("Sale 1: bridal set for Mrs. Khan");
    pos.add_item(&catalog_item(0), 2)?;
    pos.add_item(&catalog_item(1), 1)?;
    pos.add_item(&catalog_item(0), 1)?; // same ring again: coalesces to x3
    pos.set_customer(Some(CustomerRef {
        id: "cust-1".to_string(),
        name: "Mrs. Khan".to_string(),
        phone: Some("0300-1234567".to_string()),
    }));
    pos.set_order_discount(Some(Discount::Percentage(500)))?; // 5% off
    print_ledger(&config, &pos);

    // Customer steps out to the bank; hold the order
    let held_id = pos
        .hold_order("Mrs. Khan - bridal set")?
        .expect("non-empty cart holds");
    println!("✓ Order held ({} waiting)", pos.view().held_count);

    // ---- Sale 2: walk-in chain ----------------------------------------------
    println!();
    println!("Sale 2: walk-in chain purchase");
    let view = pos.add_item(&catalog_item(2), 1)?;
    pos.set_item_discount(&view.items[0].id, Some(Discount::Fixed(500_000)))?;
    print_ledger(&config, &pos);
    pos.clear_cart(); // walk-in paid and left (checkout is out of scope here)

    // ---- Mrs. Khan returns --------------------------------------------------
    println!("Mrs. Khan is back:");
    assert!(pos.restore_order(&held_id));
    print_ledger(&config, &pos);

    pos.reset();
    println!("✓ Session reset ({} lines, {} held)", pos.view().items.len(), pos.view().held_count);

    Ok(())
}
