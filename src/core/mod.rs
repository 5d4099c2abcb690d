//! # Core bus components.
//!
//! Wiring:
//! ```text
//!   EventBusBuilder ──build──► EventBus
//!        │ extends/implements      ├─ Config
//!        ▼                         ├─ TypeHierarchy (frozen)
//!   TypeHierarchy                  └─ RwLock<{ Ledger, ResolutionCache }>
//! ```
//!
//! - [`EventBus`] registration, removal and dispatch
//! - [`EventBusBuilder`] declares type relationships, then builds the bus
//! - [`Config`] / [`ResolutionOrder`] bus settings
//! - [`Scope`] identity markers for scoped bindings

mod builder;
mod bus;
mod cache;
mod config;
mod ledger;
mod scope;

pub use builder::EventBusBuilder;
pub use bus::EventBus;
pub use config::{Config, ResolutionOrder};
pub use scope::Scope;
