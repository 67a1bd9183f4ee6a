//! # aymur-state: Session Containers & Persistence for Aymur
//!
//! The injectable state layer around the pure engines in `aymur-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Application root (UI shell, out of scope)                            │
//! │        │ constructs once, passes by reference                          │
//! │        ▼                                                                │
//! │  ┌────────────────┐      ┌────────────────┐     ┌────────────────┐    │
//! │  │    PosState    │      │  AccessState   │     │   ShopConfig   │    │
//! │  │ Mutex<Session> │      │RwLock<Permiss.>│     │  TOML + env    │    │
//! │  └───────┬────────┘      └────────────────┘     └────────────────┘    │
//! │          │ write-through inside the lock                               │
//! │          ▼                                                              │
//! │  ┌────────────────┐                                                    │
//! │  │ SessionStore   │  trait: save / load / clear                        │
//! │  │ (JSON file or  │  failures are logged, never fail the mutation      │
//! │  │  in-memory)    │                                                    │
//! │  └────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pos`] - `PosState`: the cart/session container and its mutation surface
//! - [`access`] - `AccessState`: resolved permissions behind an `RwLock`
//! - [`store`] - the `SessionStore` trait and its implementations
//! - [`config`] - `ShopConfig`: TOML + `AYMUR_*` environment overrides
//! - [`error`] - store/config error types

pub mod access;
pub mod config;
pub mod error;
pub mod pos;
pub mod store;

pub use access::AccessState;
pub use config::ShopConfig;
pub use error::{ConfigError, StateError, StoreError};
pub use pos::{CartView, HeldOrderSummary, PosState};
pub use store::{JsonFileStore, MemoryStore, SessionStore};
