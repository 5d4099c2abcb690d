//! # typebus
//!
//! **typebus** is a small in-process event bus for Rust.
//!
//! Components register listeners for an event *type*; publishers hand events to
//! the bus, which delivers each one synchronously to every listener declared for
//! the event's concrete type or any of its declared supertypes and interfaces.
//! Resolution is cached per concrete type, so repeated dispatch of the same type
//! is a lookup plus a walk over a precomputed list.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐
//!     │ Listener<A>  │   │ Listener<B>  │   │ Listener<dyn Trait>│
//!     └──────┬───────┘   └──────┬───────┘   └─────────┬──────────┘
//!            ▼ register         ▼ register_before     ▼ register_scoped
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus                                                         │
//! │  - Ledger          (every binding, registration order)            │
//! │  - ResolutionCache (concrete type → ordered bindings + upcasts)   │
//! │  - TypeHierarchy   (extends / implements table, frozen)           │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 ▲ dispatch(&event, scope?)
//!                           ┌─────┴─────┐
//!                           │ publisher │
//!                           └───────────┘
//! ```
//!
//! ### Dispatch
//! ```text
//! dispatch(&C)
//!   ├─► cache[C] exists? ── no ──► scan ledger, keep bindings whose declared type
//!   │                              is assignable from C, store as cache[C]
//!   ├─► snapshot cache[C], release lock
//!   └─► for (binding, upcast) in snapshot:
//!         ├─ scope mismatch ─► skip
//!         ├─ handle(upcast(&C)) Ok  ─► next
//!         └─ handle(upcast(&C)) Err ─► return DispatchError (fail-fast)
//! ```
//!
//! ## Features
//! | Area            | Description                                                 | Key types / traits                         |
//! |-----------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Dispatch**    | Register, remove, and synchronously deliver events.         | [`EventBus`]                               |
//! | **Listeners**   | Typed handlers, closures, before/after ordering, scopes.    | [`Listener`], [`ListenerFn`], [`Scope`]    |
//! | **Type graph**  | Declared supertypes and interfaces, transitive.             | [`EventBusBuilder`], [`TypeHierarchy`]     |
//! | **Errors**      | Typed listener and dispatch errors.                         | [`ListenerError`], [`DispatchError`]       |
//! | **Configuration** | First-build ordering, unhandled-event logging.            | [`Config`], [`ResolutionOrder`]            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogListener` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use typebus::{EventBus, ListenerError, ListenerFn, Scope};
//!
//! trait Priced { fn cents(&self) -> u64; }
//!
//! struct Order { cents: u64 }
//! struct RushOrder { order: Order }
//!
//! impl Priced for Order { fn cents(&self) -> u64 { self.cents } }
//!
//! let bus = EventBus::builder()
//!     .extends::<RushOrder, Order>(|r| &r.order)
//!     .implements::<Order, dyn Priced>(|o| o)
//!     .build();
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let l = Arc::clone(&log);
//! let totals = ListenerFn::arc("totals", move |p: &(dyn Priced + 'static)| {
//!     l.lock().unwrap().push(format!("total {}", p.cents()));
//!     Ok::<_, ListenerError>(())
//! });
//! let l = Arc::clone(&log);
//! let audit = ListenerFn::arc("audit", move |_: &Order| {
//!     l.lock().unwrap().push("audit".to_string());
//!     Ok::<_, ListenerError>(())
//! });
//!
//! bus.register(&totals);
//! bus.register_before(&audit);
//!
//! bus.dispatch(&RushOrder { order: Order { cents: 250 } })?;
//! assert_eq!(*log.lock().unwrap(), ["audit", "total 250"]);
//!
//! // Scoped bindings only see dispatches tagged with their scope (or untagged ones).
//! let tenant = Scope::new();
//! bus.remove_listener(&audit);
//! bus.register_scoped(&audit, tenant);
//! bus.dispatch_scoped(&Order { cents: 1 }, &Scope::new())?;
//! assert_eq!(log.lock().unwrap().len(), 3);
//! # Ok::<(), typebus::DispatchError>(())
//! ```
mod core;
mod error;
mod listeners;
mod types;

// ---- Public re-exports ----

pub use core::{Config, EventBus, EventBusBuilder, ResolutionOrder, Scope};
pub use error::{BoxError, DispatchError, ListenerError};
pub use listeners::{Listener, ListenerFn};
pub use types::TypeHierarchy;

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogListener;
