//! # Resolution cache
//!
//! Maps each concrete event type already dispatched to the ordered list of
//! bindings that apply to it, each paired with its resolved [`Upcast`] path.
//!
//! ## Rules
//! - An entry is built once, on the first dispatch of its type.
//! - From then on it is maintained incrementally: new bindings are appended
//!   (`Placement::Append`) or prepended (`Placement::Front`); removed bindings are
//!   evicted without disturbing the order of the rest.
//! - Entries are never invalidated: the type hierarchy is frozen, so a resolved path
//!   stays valid for the life of the bus.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::ledger::{Binding, BindingId, Placement};
use crate::types::{Finish, TypeHierarchy, Upcast};

/// A binding applicable to one concrete type, with the path to its declared type.
#[derive(Clone)]
pub(crate) struct Resolved {
    pub(crate) binding: Arc<Binding>,
    pub(crate) path: Arc<Upcast>,
}

struct Entry {
    /// Identity view of the entry's concrete type.
    own: Finish,
    /// Dispatch order; copied on write while a dispatch holds a snapshot.
    resolved: Arc<Vec<Resolved>>,
}

/// Concrete type → ordered applicable bindings.
#[derive(Default)]
pub(crate) struct ResolutionCache {
    entries: HashMap<TypeId, Entry>,
}

impl ResolutionCache {
    /// Shared view of the entry for `concrete`, if it has been built.
    pub(crate) fn snapshot(&self, concrete: TypeId) -> Option<Arc<Vec<Resolved>>> {
        self.entries.get(&concrete).map(|e| Arc::clone(&e.resolved))
    }

    /// Builds and stores the entry for `concrete` from `candidates`, kept in the given order.
    ///
    /// An entry that already exists is authoritative and is returned unchanged.
    pub(crate) fn build<'a>(
        &mut self,
        concrete: TypeId,
        own: Finish,
        candidates: impl IntoIterator<Item = &'a Arc<Binding>>,
        types: &TypeHierarchy,
    ) -> Arc<Vec<Resolved>> {
        let entry = self.entries.entry(concrete).or_insert_with(|| {
            let resolved = candidates
                .into_iter()
                .filter_map(|binding| {
                    let path = types.resolve(concrete, &own, binding.declared())?;
                    Some(Resolved {
                        binding: Arc::clone(binding),
                        path: Arc::new(path),
                    })
                })
                .collect();
            Entry {
                own,
                resolved: Arc::new(resolved),
            }
        });
        Arc::clone(&entry.resolved)
    }

    /// Adds `binding` to every entry whose concrete type is assignable to its declared type.
    ///
    /// Returns the number of entries touched.
    pub(crate) fn admit(&mut self, binding: &Arc<Binding>, types: &TypeHierarchy) -> usize {
        let mut touched = 0;
        for (concrete, entry) in &mut self.entries {
            let Some(path) = types.resolve(*concrete, &entry.own, binding.declared()) else {
                continue;
            };
            let resolved = Resolved {
                binding: Arc::clone(binding),
                path: Arc::new(path),
            };
            let list = Arc::make_mut(&mut entry.resolved);
            match binding.placement() {
                Placement::Append => list.push(resolved),
                Placement::Front => list.insert(0, resolved),
            }
            touched += 1;
        }
        touched
    }

    /// Removes the binding with `id` from every entry.
    pub(crate) fn evict(&mut self, id: BindingId) {
        for entry in self.entries.values_mut() {
            if let Some(pos) = entry.resolved.iter().position(|r| r.binding.id() == id) {
                Arc::make_mut(&mut entry.resolved).remove(pos);
            }
        }
    }

    /// Number of concrete types resolved so far.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, concrete: TypeId) -> bool {
        self.entries.contains_key(&concrete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ResolutionOrder;
    use crate::core::ledger::{Ledger, ListenerKey};
    use crate::listeners::ListenerFn;
    use crate::types::identity;

    struct Base;
    struct Derived {
        base: Base,
    }
    struct Other;

    fn types() -> TypeHierarchy {
        let mut t = TypeHierarchy::new();
        t.add_extends::<Derived, Base>(|d| &d.base);
        t
    }

    fn ids(resolved: &[Resolved]) -> Vec<BindingId> {
        resolved.iter().map(|r| r.binding.id()).collect()
    }

    #[test]
    fn test_build_filters_by_assignability() {
        let types = types();
        let on_base = ListenerFn::arc("base", |_: &Base| Ok(()));
        let on_other = ListenerFn::arc("other", |_: &Other| Ok(()));

        let mut ledger = Ledger::default();
        ledger.push(Arc::new(Binding::new(0, &on_base, None, Placement::Append)));
        ledger.push(Arc::new(Binding::new(1, &on_other, None, Placement::Append)));

        let mut cache = ResolutionCache::default();
        let built = cache.build(
            TypeId::of::<Derived>(),
            identity::<Derived>(),
            ledger.ordered(ResolutionOrder::Priority),
            &types,
        );
        assert_eq!(ids(&built), vec![0]);
        assert_eq!(built[0].path.depth(), 1);
        assert!(cache.contains(TypeId::of::<Derived>()));
    }

    #[test]
    fn test_admit_respects_placement() {
        let types = types();
        let l = ListenerFn::arc("base", |_: &Base| Ok(()));
        let mut cache = ResolutionCache::default();
        cache.build(TypeId::of::<Derived>(), identity::<Derived>(), [], &types);
        cache.build(TypeId::of::<Other>(), identity::<Other>(), [], &types);

        let first = Arc::new(Binding::new(0, &l, None, Placement::Append));
        let second = Arc::new(Binding::new(1, &l, None, Placement::Front));
        let third = Arc::new(Binding::new(2, &l, None, Placement::Append));
        assert_eq!(cache.admit(&first, &types), 1);
        assert_eq!(cache.admit(&second, &types), 1);
        assert_eq!(cache.admit(&third, &types), 1);

        let entry = cache.snapshot(TypeId::of::<Derived>()).unwrap_or_default();
        assert_eq!(ids(&entry), vec![1, 0, 2]);
        assert_eq!(cache.snapshot(TypeId::of::<Other>()).map(|e| e.len()), Some(0));
    }

    #[test]
    fn test_evict_preserves_order() {
        let types = types();
        let l = ListenerFn::arc("base", |_: &Base| Ok(()));
        let mut ledger = Ledger::default();
        for id in 0..4 {
            ledger.push(Arc::new(Binding::new(id, &l, None, Placement::Append)));
        }
        let mut cache = ResolutionCache::default();
        cache.build(
            TypeId::of::<Base>(),
            identity::<Base>(),
            ledger.ordered(ResolutionOrder::Ledger),
            &types,
        );

        let removed = ledger.remove(ListenerKey::of(&l), None).map(|b| b.id());
        assert_eq!(removed, Some(0));
        cache.evict(0);
        cache.evict(2);
        cache.evict(99);

        let entry = cache.snapshot(TypeId::of::<Base>()).unwrap_or_default();
        assert_eq!(ids(&entry), vec![1, 3]);
    }

    #[test]
    fn test_snapshot_is_shared_until_modified() {
        let types = types();
        let l = ListenerFn::arc("base", |_: &Base| Ok(()));
        let mut cache = ResolutionCache::default();
        let built = cache.build(TypeId::of::<Base>(), identity::<Base>(), [], &types);

        let held = cache.snapshot(TypeId::of::<Base>()).unwrap_or_default();
        assert!(Arc::ptr_eq(&built, &held));

        let binding = Arc::new(Binding::new(0, &l, None, Placement::Append));
        cache.admit(&binding, &types);
        let after = cache.snapshot(TypeId::of::<Base>()).unwrap_or_default();
        assert!(held.is_empty());
        assert_eq!(ids(&after), vec![0]);
        assert!(!Arc::ptr_eq(&held, &after));

        drop((built, held));
        let again = cache.snapshot(TypeId::of::<Base>()).unwrap_or_default();
        assert!(Arc::ptr_eq(&after, &again));
    }

    #[test]
    fn test_existing_entry_is_authoritative() {
        let types = types();
        let l = ListenerFn::arc("base", |_: &Base| Ok(()));
        let binding = Arc::new(Binding::new(0, &l, None, Placement::Append));
        let mut cache = ResolutionCache::default();
        cache.build(TypeId::of::<Base>(), identity::<Base>(), [], &types);

        let again = cache.build(TypeId::of::<Base>(), identity::<Base>(), [&binding], &types);
        assert!(again.is_empty());
        assert_eq!(cache.len(), 1);
    }
}
