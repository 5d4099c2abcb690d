//! # Event listeners
//!
//! This module provides the [`Listener`] trait and ready-made implementations
//! that can be registered on an [`EventBus`](crate::EventBus).
//!
//! ## Listener types
//! - **Typed listeners**: implement [`Listener`] with a concrete `Event` type.
//! - **Closures**: wrap a function with [`ListenerFn`].
//! - **Built-in**: [`LogListener`] (feature `logging`).
//!
//! ## Dispatch path
//! ```text
//!   dispatch(&Circle) ──► cache[Circle] ──► [binding, upcast] ──► Listener::handle(&Shape)
//!                                        └─► [binding, upcast] ──► Listener::handle(&dyn Drawable)
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod listener;
mod listener_fn;

#[cfg(feature = "logging")]
pub use embedded::LogListener;
pub use listener::Listener;
pub use listener_fn::ListenerFn;
