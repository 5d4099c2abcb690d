//! # Core listener trait
//!
//! `Listener` is the extension point for plugging event handlers into an
//! [`EventBus`](crate::EventBus). Each listener declares exactly one event type
//! through its associated [`Listener::Event`] type; the bus derives the binding's
//! declared type from it once, at registration.
//!
//! ## Contract
//! - `handle` runs synchronously on the dispatching thread.
//! - Returning an error aborts the dispatch (fail-fast); listeners registered
//!   after the failing one do not see the event.
//! - The declared type may be a sized event type, a supertype declared through
//!   [`EventBusBuilder::extends`](crate::EventBusBuilder::extends), an interface
//!   (`dyn Trait`) declared through
//!   [`EventBusBuilder::implements`](crate::EventBusBuilder::implements), or
//!   `dyn Any` to observe every event.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use typebus::{EventBus, Listener, ListenerError};
//!
//! struct OrderPlaced { total: u64 }
//!
//! #[derive(Default)]
//! struct Revenue(AtomicUsize);
//!
//! impl Listener for Revenue {
//!     type Event = OrderPlaced;
//!
//!     fn handle(&self, event: &OrderPlaced) -> Result<(), ListenerError> {
//!         self.0.fetch_add(event.total as usize, Ordering::Relaxed);
//!         Ok(())
//!     }
//! }
//!
//! let bus = EventBus::new();
//! let revenue = Arc::new(Revenue::default());
//! bus.register(&revenue);
//!
//! bus.dispatch(&OrderPlaced { total: 30 }).unwrap();
//! assert_eq!(revenue.0.load(Ordering::Relaxed), 30);
//! ```

use crate::error::ListenerError;

/// Contract for event listeners.
pub trait Listener: Send + Sync + 'static {
    /// The event type this listener accepts.
    type Event: ?Sized + 'static;

    /// Handle a single event.
    fn handle(&self, event: &Self::Event) -> Result<(), ListenerError>;

    /// Human-readable name (for logs/errors).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
