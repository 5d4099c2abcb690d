//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(&T) -> Result<(), ListenerError>`. The
//! declared type `T` is taken from the closure's argument.
//!
//! ## Example
//! ```rust
//! use typebus::{EventBus, ListenerError, ListenerFn};
//!
//! struct Ping;
//!
//! let bus = EventBus::new();
//! let pong = ListenerFn::arc("pong", |_: &Ping| Ok::<_, ListenerError>(()));
//! bus.register(&pong);
//!
//! assert_eq!(bus.len(), 1);
//! bus.dispatch(&Ping).unwrap();
//! ```
//!
//! ## Interface listeners
//! A closure parameter written `&dyn Trait` means `&'a (dyn Trait + 'a)`, which is not
//! the `dyn Trait + 'static` a listener declares. Spell the bound out, or name the
//! event type with a turbofish and let the closure infer its argument:
//!
//! ```rust
//! use typebus::{EventBus, ListenerError, ListenerFn};
//!
//! trait Audited { fn actor(&self) -> &str; }
//! struct Login { user: String }
//! impl Audited for Login { fn actor(&self) -> &str { &self.user } }
//!
//! let bus = EventBus::builder()
//!     .implements::<Login, dyn Audited>(|l| l)
//!     .build();
//!
//! let explicit = ListenerFn::arc("explicit", |a: &(dyn Audited + 'static)| {
//!     assert_eq!(a.actor(), "ana");
//!     Ok::<_, ListenerError>(())
//! });
//! let inferred = ListenerFn::<dyn Audited, _>::arc("inferred", |a| {
//!     assert_eq!(a.actor(), "ana");
//!     Ok(())
//! });
//! bus.register(&explicit);
//! bus.register(&inferred);
//! bus.dispatch(&Login { user: "ana".into() }).unwrap();
//! ```

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ListenerError;
use crate::listeners::listener::Listener;

/// Function-backed listener implementation.
pub struct ListenerFn<T: ?Sized, F> {
    name: Cow<'static, str>,
    f: F,
    _event: PhantomData<fn(&T)>,
}

impl<T, F> ListenerFn<T, F>
where
    T: ?Sized + 'static,
    F: Fn(&T) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately register it.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _event: PhantomData,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// The name this listener was created with.
    pub fn label(&self) -> &str {
        &self.name
    }
}

impl<T, F> Listener for ListenerFn<T, F>
where
    T: ?Sized + 'static,
    F: Fn(&T) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    type Event = T;

    fn handle(&self, event: &T) -> Result<(), ListenerError> {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        match &self.name {
            Cow::Borrowed(name) => *name,
            Cow::Owned(_) => std::any::type_name::<Self>(),
        }
    }
}

impl<T: ?Sized, F> std::fmt::Debug for ListenerFn<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerFn")
            .field("name", &self.name)
            .field("event", &std::any::type_name::<T>())
            .finish()
    }
}
