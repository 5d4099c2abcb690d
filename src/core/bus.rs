//! # EventBus: synchronous, type-aware dispatch.
//!
//! [`EventBus`] delivers each dispatched event to every listener whose declared
//! type is assignable from the event's concrete type, in a stable order.
//!
//! ## Architecture
//! ```text
//! register(L) ─────► Ledger (registration order)
//!      │                   │ first dispatch of C: scan + resolve
//!      │                   ▼
//!      └─ admit ───► ResolutionCache[C] = [(binding, upcast), ...]   (dispatch order)
//!                          │
//! dispatch(&C) ──► snapshot (locks released) ──► scope filter ──► Listener::handle(&D)
//! ```
//!
//! ## Rules
//! - **Synchronous**: `dispatch` runs every listener on the caller's thread and returns
//!   once all of them ran or one failed.
//! - **Fail-fast**: the first listener error aborts the dispatch and is returned.
//! - **Reentrant**: listeners may call `dispatch`, `register` and `remove_listener` on
//!   the same bus; changes apply from the next dispatch on.
//! - **Thread-safe**: ledger and cache sit behind one `RwLock`, never held while a
//!   listener runs.

use std::any::{Any, TypeId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::core::builder::EventBusBuilder;
use crate::core::cache::{Resolved, ResolutionCache};
use crate::core::config::Config;
use crate::core::ledger::{Binding, Ledger, ListenerKey, Placement};
use crate::core::scope::Scope;
use crate::error::DispatchError;
use crate::listeners::Listener;
use crate::types::{self, TypeHierarchy};

#[derive(Default)]
struct State {
    ledger: Ledger,
    cache: ResolutionCache,
}

/// In-process publish/dispatch registry keyed by event type.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use typebus::{EventBus, ListenerError, ListenerFn};
///
/// struct Base { id: u32 }
/// struct Derived { base: Base }
///
/// let bus = EventBus::builder()
///     .extends::<Derived, Base>(|d| &d.base)
///     .build();
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let s = Arc::clone(&seen);
/// let on_base = ListenerFn::arc("on-base", move |b: &Base| {
///     s.fetch_add(b.id as usize, Ordering::SeqCst);
///     Ok::<_, ListenerError>(())
/// });
/// bus.register(&on_base);
///
/// bus.dispatch(&Base { id: 1 }).unwrap();
/// bus.dispatch(&Derived { base: Base { id: 10 } }).unwrap();
/// assert_eq!(seen.load(Ordering::SeqCst), 11);
/// ```
pub struct EventBus {
    cfg: Config,
    types: TypeHierarchy,
    state: RwLock<State>,
    next_id: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus with the default [`Config`] and no declared type relationships.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a bus with the given configuration and no declared type relationships.
    pub fn with_config(cfg: Config) -> Self {
        EventBusBuilder::new(cfg).build()
    }

    /// Returns a builder for declaring the type hierarchy.
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new(Config::default())
    }

    pub(crate) fn from_parts(cfg: Config, types: TypeHierarchy) -> Self {
        Self {
            cfg,
            types,
            state: RwLock::new(State::default()),
            next_id: AtomicU64::new(0),
        }
    }

    // ---- registration ----

    /// Registers `listener` after every listener already registered for the same types.
    ///
    /// Registering the same listener twice creates two bindings; both fire.
    pub fn register<L: Listener>(&self, listener: &Arc<L>) {
        self.bind(listener, None, Placement::Append);
    }

    /// Like [`register`](Self::register), restricted to dispatches tagged with `scope`
    /// (or untagged).
    pub fn register_scoped<L: Listener>(&self, listener: &Arc<L>, scope: Scope) {
        self.bind(listener, Some(scope), Placement::Append);
    }

    /// Registers `listener` ahead of every listener already registered for the same types.
    pub fn register_before<L: Listener>(&self, listener: &Arc<L>) {
        self.bind(listener, None, Placement::Front);
    }

    /// Like [`register_before`](Self::register_before), restricted to `scope`.
    pub fn register_before_scoped<L: Listener>(&self, listener: &Arc<L>, scope: Scope) {
        self.bind(listener, Some(scope), Placement::Front);
    }

    fn bind<L: Listener>(&self, listener: &Arc<L>, scope: Option<Scope>, placement: Placement) {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let binding = Arc::new(Binding::new(id, listener, scope, placement));

        let mut state = self.state.write();
        let touched = state.cache.admit(&binding, &self.types);
        trace!(
            listener = binding.name(),
            declared = binding.declared_name(),
            placement = placement.as_str(),
            scoped = scope.is_some(),
            cached_types = touched,
            "listener registered"
        );
        state.ledger.push(binding);
    }

    // ---- removal ----

    /// Removes the binding of `listener` registered without a scope.
    ///
    /// Returns `false` (and does nothing) if there is none.
    pub fn remove_listener<L: Listener>(&self, listener: &Arc<L>) -> bool {
        self.unbind(ListenerKey::of(listener), None)
    }

    /// Removes the binding of `listener` registered with `scope`.
    pub fn remove_listener_scoped<L: Listener>(&self, listener: &Arc<L>, scope: &Scope) -> bool {
        self.unbind(ListenerKey::of(listener), Some(scope))
    }

    fn unbind(&self, listener: ListenerKey, scope: Option<&Scope>) -> bool {
        let mut state = self.state.write();
        let Some(binding) = state.ledger.remove(listener, scope) else {
            trace!(scoped = scope.is_some(), "remove_listener: no such binding");
            return false;
        };
        state.cache.evict(binding.id());
        trace!(
            listener = binding.name(),
            declared = binding.declared_name(),
            "listener removed"
        );
        true
    }

    // ---- dispatch ----

    /// Delivers `event` to every applicable listener, in dispatch order.
    ///
    /// # Errors
    /// Returns [`DispatchError::Listener`] with the first listener failure; later
    /// listeners are not invoked.
    pub fn dispatch<E: Any>(&self, event: &E) -> Result<(), DispatchError> {
        self.deliver(event, None)
    }

    /// Delivers `event` tagged with `scope`: scoped bindings fire only if their scope
    /// is `scope`.
    ///
    /// # Errors
    /// Same as [`dispatch`](Self::dispatch).
    pub fn dispatch_scoped<E: Any>(&self, event: &E, scope: &Scope) -> Result<(), DispatchError> {
        self.deliver(event, Some(scope))
    }

    fn deliver<E: Any>(&self, event: &E, scope: Option<&Scope>) -> Result<(), DispatchError> {
        let name = std::any::type_name::<E>();
        let resolved = self.resolve::<E>();

        if resolved.is_empty() {
            if self.cfg.warn_unhandled {
                warn!(event = name, "event has no listeners");
            } else {
                debug!(event = name, "event has no listeners");
            }
            return Ok(());
        }

        debug!(
            event = name,
            listeners = resolved.len(),
            scoped = scope.is_some(),
            "dispatching"
        );
        let any: &dyn Any = event;
        for Resolved { binding, path } in resolved.iter() {
            if !binding.admits(scope) {
                continue;
            }
            match binding.invoke(any, path) {
                Some(Ok(())) => {}
                Some(Err(source)) => {
                    warn!(
                        listener = binding.name(),
                        event = name,
                        label = source.as_label(),
                        error = %source,
                        "listener failed; aborting dispatch"
                    );
                    return Err(DispatchError::Listener {
                        listener: binding.name(),
                        event: name,
                        source,
                    });
                }
                None => {
                    warn!(
                        listener = binding.name(),
                        event = name,
                        declared = binding.declared_name(),
                        "resolved path does not reach declared type; skipping"
                    );
                }
            }
        }
        Ok(())
    }

    /// Dispatch order for `E`, building the cache entry on first use.
    fn resolve<E: Any>(&self) -> Arc<Vec<Resolved>> {
        let concrete = TypeId::of::<E>();
        if let Some(resolved) = self.state.read().cache.snapshot(concrete) {
            return resolved;
        }

        let mut guard = self.state.write();
        let state = &mut *guard;
        let candidates = state.ledger.ordered(self.cfg.resolution_order);
        let resolved = state
            .cache
            .build(concrete, types::identity::<E>(), candidates, &self.types);
        debug!(
            event = std::any::type_name::<E>(),
            listeners = resolved.len(),
            max_depth = resolved.iter().map(|r| r.path.depth()).max().unwrap_or(0),
            in_hierarchy = self.types.name_of(concrete).is_some(),
            priority = self.cfg.preserves_priority(),
            "resolved listeners"
        );
        resolved
    }

    // ---- introspection ----

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.state.read().ledger.len()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().ledger.is_empty()
    }

    /// Number of distinct concrete event types resolved so far.
    pub fn cached_types(&self) -> usize {
        self.state.read().cache.len()
    }

    /// True if dispatch order for `E` has already been resolved.
    pub fn is_cached<E: Any>(&self) -> bool {
        self.state.read().cache.contains(TypeId::of::<E>())
    }

    /// The type relationships this bus resolves against.
    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.types
    }

    /// The configuration this bus was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("EventBus")
            .field("config", &self.cfg)
            .field("types", &self.types)
            .field("bindings", &state.ledger.len())
            .field("cached_types", &state.cache.len())
            .finish()
    }
}
