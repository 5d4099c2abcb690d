//! # Bindings and the registration ledger.
//!
//! A [`Binding`] ties one listener (by `Arc` identity) and an optional [`Scope`]
//! to the listener's declared event type. The [`Ledger`] keeps every live binding
//! in registration order; it is the source cache entries are built from.
//!
//! ## Rules
//! - Binding equality is identity: same listener allocation, same scope.
//! - The declared type is captured once, from `L::Event`, at registration.
//! - Ledger order is registration order; dispatch priority is tracked by the cache.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::core::config::ResolutionOrder;
use crate::core::scope::Scope;
use crate::error::ListenerError;
use crate::listeners::Listener;
use crate::types::Upcast;

/// Per-bus unique binding id.
pub(crate) type BindingId = u64;

/// Identity of a listener allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ListenerKey(usize);

impl ListenerKey {
    pub(crate) fn of<L>(listener: &Arc<L>) -> Self {
        ListenerKey(Arc::as_ptr(listener) as *const () as usize)
    }
}

/// Where a binding lands in already-resolved cache entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// `register`: after existing bindings.
    Append,
    /// `register_before`: ahead of existing bindings.
    Front,
}

impl Placement {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Placement::Append => "append",
            Placement::Front => "front",
        }
    }
}

/// Type-erased handle on a listener.
trait Invoke: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when `path` does not end in this listener's declared type.
    fn invoke(&self, event: &dyn Any, path: &Upcast) -> Option<Result<(), ListenerError>>;
}

struct Typed<L>(Arc<L>);

impl<L: Listener> Invoke for Typed<L> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn invoke(&self, event: &dyn Any, path: &Upcast) -> Option<Result<(), ListenerError>> {
        let view = path.apply::<L::Event>(event)?;
        Some(self.0.handle(view))
    }
}

/// A registered (listener, scope) pair with its declared type.
pub(crate) struct Binding {
    id: BindingId,
    listener: ListenerKey,
    scope: Option<Scope>,
    declared: TypeId,
    declared_name: &'static str,
    placement: Placement,
    target: Box<dyn Invoke>,
}

impl Binding {
    pub(crate) fn new<L: Listener>(
        id: BindingId,
        listener: &Arc<L>,
        scope: Option<Scope>,
        placement: Placement,
    ) -> Self {
        Self {
            id,
            listener: ListenerKey::of(listener),
            scope,
            declared: TypeId::of::<L::Event>(),
            declared_name: std::any::type_name::<L::Event>(),
            placement,
            target: Box::new(Typed(Arc::clone(listener))),
        }
    }

    pub(crate) fn id(&self) -> BindingId {
        self.id
    }

    pub(crate) fn declared(&self) -> TypeId {
        self.declared
    }

    pub(crate) fn declared_name(&self) -> &'static str {
        self.declared_name
    }

    pub(crate) fn placement(&self) -> Placement {
        self.placement
    }

    pub(crate) fn name(&self) -> &'static str {
        self.target.name()
    }

    /// Identity equality against a (listener, scope) pair.
    pub(crate) fn is(&self, listener: ListenerKey, scope: Option<&Scope>) -> bool {
        self.listener == listener && self.scope.as_ref() == scope
    }

    /// Scope filter for a dispatch tagged with `scope`.
    pub(crate) fn admits(&self, scope: Option<&Scope>) -> bool {
        Scope::admits(self.scope.as_ref(), scope)
    }

    pub(crate) fn invoke(
        &self,
        event: &dyn Any,
        path: &Upcast,
    ) -> Option<Result<(), ListenerError>> {
        self.target.invoke(event, path)
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("listener", &self.name())
            .field("declared", &self.declared_name)
            .field("scoped", &self.scope.is_some())
            .field("placement", &self.placement)
            .finish()
    }
}

/// Every live binding, in registration order.
#[derive(Default)]
pub(crate) struct Ledger {
    bindings: Vec<Arc<Binding>>,
}

impl Ledger {
    pub(crate) fn push(&mut self, binding: Arc<Binding>) {
        self.bindings.push(binding);
    }

    /// Removes the earliest binding equal to (listener, scope).
    pub(crate) fn remove(&mut self, listener: ListenerKey, scope: Option<&Scope>) -> Option<Arc<Binding>> {
        let pos = self.bindings.iter().position(|b| b.is(listener, scope))?;
        Some(self.bindings.remove(pos))
    }

    /// Bindings in the order a freshly built cache entry should list them.
    pub(crate) fn ordered(&self, order: ResolutionOrder) -> Vec<&Arc<Binding>> {
        match order {
            ResolutionOrder::Ledger => self.bindings.iter().collect(),
            ResolutionOrder::Priority => {
                let front = self
                    .bindings
                    .iter()
                    .rev()
                    .filter(|b| b.placement == Placement::Front);
                let back = self
                    .bindings
                    .iter()
                    .filter(|b| b.placement == Placement::Append);
                front.chain(back).collect()
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ListenerFn;

    struct Ping;

    fn listener() -> Arc<impl Listener<Event = Ping>> {
        ListenerFn::arc("ping", |_: &Ping| Ok(()))
    }

    fn names(ledger: &Ledger, order: ResolutionOrder) -> Vec<BindingId> {
        ledger.ordered(order).into_iter().map(|b| b.id()).collect()
    }

    #[test]
    fn test_priority_order_matches_incremental_insertion() {
        let l = listener();
        let mut ledger = Ledger::default();
        ledger.push(Arc::new(Binding::new(0, &l, None, Placement::Append)));
        ledger.push(Arc::new(Binding::new(1, &l, None, Placement::Front)));
        ledger.push(Arc::new(Binding::new(2, &l, None, Placement::Append)));
        ledger.push(Arc::new(Binding::new(3, &l, None, Placement::Front)));

        assert_eq!(names(&ledger, ResolutionOrder::Priority), vec![3, 1, 0, 2]);
        assert_eq!(names(&ledger, ResolutionOrder::Ledger), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_matches_identity_and_scope() {
        let a = listener();
        let b = listener();
        let scope = Scope::new();
        let mut ledger = Ledger::default();
        ledger.push(Arc::new(Binding::new(0, &a, Some(scope), Placement::Append)));
        ledger.push(Arc::new(Binding::new(1, &a, None, Placement::Append)));

        assert!(ledger.remove(ListenerKey::of(&b), None).is_none());
        assert!(ledger.remove(ListenerKey::of(&a), Some(&Scope::new())).is_none());

        let removed = ledger.remove(ListenerKey::of(&a), Some(&scope)).map(|b| b.id());
        assert_eq!(removed, Some(0));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_duplicate_removal_takes_earliest() {
        let a = listener();
        let mut ledger = Ledger::default();
        ledger.push(Arc::new(Binding::new(0, &a, None, Placement::Append)));
        ledger.push(Arc::new(Binding::new(1, &a, None, Placement::Front)));

        let first = ledger.remove(ListenerKey::of(&a), None).map(|b| b.id());
        assert_eq!(first, Some(0));
        let second = ledger.remove(ListenerKey::of(&a), None).map(|b| b.id());
        assert_eq!(second, Some(1));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_binding_captures_declared_type() {
        let b = Binding::new(7, &listener(), None, Placement::Append);
        assert_eq!(b.declared(), TypeId::of::<Ping>());
        assert!(b.declared_name().ends_with("Ping"));
        assert_eq!(b.name(), "ping");
        assert_eq!(b.placement().as_str(), "append");
    }
}
