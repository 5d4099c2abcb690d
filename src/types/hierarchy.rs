//! # TypeHierarchy: the assignability oracle
//!
//! Rust has no runtime subtyping, so the relationships between event types are
//! declared up front and kept in an explicit table:
//!
//! - **extends** `C → P`: `P` is a supertype of `C`; a `&C` can be viewed as a `&P`
//!   (usually an embedded field).
//! - **implements** `C → I`: `C` satisfies the interface `I` (usually a `dyn Trait`).
//! - every event is assignable to `dyn Any`, the universal root.
//!
//! Assignability is transitive over `extends` edges, and an interface implemented by
//! any supertype is implemented by all of its subtypes:
//!
//! ```text
//!   Circle ──extends──► Shape ──extends──► Entity
//!                         └──implements──► dyn Drawable
//!
//!   Circle is assignable to: Circle, Shape, Entity, dyn Drawable, dyn Any
//! ```
//!
//! The table is frozen once the bus is built; resolved paths can be cached forever.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};

use super::upcast::{self, Finish, Step, Upcast};

/// Outgoing `extends` edge.
#[derive(Clone)]
struct Edge {
    to: TypeId,
    step: Step,
}

/// Immutable table of declared type relationships.
///
/// Built through [`EventBusBuilder`](crate::EventBusBuilder); read through
/// [`EventBus::hierarchy`](crate::EventBus::hierarchy).
pub struct TypeHierarchy {
    parents: HashMap<TypeId, Vec<Edge>>,
    identities: HashMap<TypeId, Finish>,
    views: HashMap<(TypeId, TypeId), Finish>,
    names: HashMap<TypeId, &'static str>,
    universal: Finish,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
            identities: HashMap::new(),
            views: HashMap::new(),
            names: HashMap::new(),
            universal: upcast::universal(),
        }
    }
}

impl TypeHierarchy {
    /// Creates an empty hierarchy: types are only assignable to themselves and `dyn Any`.
    pub fn new() -> Self {
        Self::default()
    }

    fn learn<T: ?Sized + 'static>(&mut self) -> TypeId {
        let id = TypeId::of::<T>();
        self.names.entry(id).or_insert_with(std::any::type_name::<T>);
        id
    }

    fn learn_sized<T: Any>(&mut self) -> TypeId {
        let id = self.learn::<T>();
        self.identities.entry(id).or_insert_with(upcast::identity::<T>);
        id
    }

    /// Declares `P` a supertype of `C`.
    ///
    /// Declaring the same edge twice keeps the first view.
    pub(crate) fn add_extends<C: Any, P: Any>(&mut self, view: fn(&C) -> &P) {
        let from = self.learn_sized::<C>();
        let to = self.learn_sized::<P>();
        if from == to {
            return;
        }

        let edges = self.parents.entry(from).or_default();
        if edges.iter().any(|e| e.to == to) {
            return;
        }
        edges.push(Edge {
            to,
            step: upcast::step(move |any| any.downcast_ref::<C>().map(|c| view(c) as &dyn Any)),
        });
    }

    /// Declares that `C` satisfies the interface `I`.
    pub(crate) fn add_implements<C: Any, I: ?Sized + 'static>(&mut self, view: fn(&C) -> &I) {
        let from = self.learn_sized::<C>();
        let to = self.learn::<I>();
        self.views
            .entry((from, to))
            .or_insert_with(|| upcast::finish::<I, _>(move |any| any.downcast_ref::<C>().map(view)));
    }

    /// Returns true if a value of type `concrete` may be delivered to a listener
    /// declared for `declared`.
    ///
    /// # Example
    /// ```
    /// use std::any::{Any, TypeId};
    /// use typebus::EventBus;
    ///
    /// struct Base;
    /// struct Derived { base: Base }
    ///
    /// let bus = EventBus::builder()
    ///     .extends::<Derived, Base>(|d| &d.base)
    ///     .build();
    ///
    /// let types = bus.hierarchy();
    /// assert!(types.is_assignable(TypeId::of::<Derived>(), TypeId::of::<Base>()));
    /// assert!(types.is_assignable(TypeId::of::<Derived>(), TypeId::of::<dyn Any>()));
    /// assert!(!types.is_assignable(TypeId::of::<Base>(), TypeId::of::<Derived>()));
    /// ```
    pub fn is_assignable(&self, concrete: TypeId, declared: TypeId) -> bool {
        if concrete == declared || declared == TypeId::of::<dyn Any>() {
            return true;
        }
        self.ancestors(concrete)
            .any(|node| node == declared || self.views.contains_key(&(node, declared)))
    }

    /// Human-readable name for a type seen by this table, if any.
    pub fn name_of(&self, id: TypeId) -> Option<&'static str> {
        self.names.get(&id).copied()
    }

    /// Number of declared `extends` edges.
    pub fn extends_count(&self) -> usize {
        self.parents.values().map(Vec::len).sum()
    }

    /// Number of declared `implements` relations.
    pub fn implements_count(&self) -> usize {
        self.views.len()
    }

    /// `concrete` followed by every type reachable over `extends` edges (BFS order).
    fn ancestors(&self, concrete: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        let mut queue = VecDeque::from([concrete]);
        let mut seen = HashSet::from([concrete]);
        std::iter::from_fn(move || {
            let node = queue.pop_front()?;
            for edge in self.parents.get(&node).into_iter().flatten() {
                if seen.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
            Some(node)
        })
    }

    /// Resolves the shortest upcast path from `concrete` to `declared`.
    ///
    /// `own` is the identity view of `concrete` itself, supplied by the caller that
    /// still knows the concrete type statically.
    pub(crate) fn resolve(&self, concrete: TypeId, own: &Finish, declared: TypeId) -> Option<Upcast> {
        if concrete == declared {
            return Some(Upcast::new(Vec::new(), own.clone()));
        }
        if declared == TypeId::of::<dyn Any>() {
            return Some(Upcast::new(Vec::new(), self.universal.clone()));
        }

        let mut queue: VecDeque<(TypeId, Vec<Step>)> = VecDeque::from([(concrete, Vec::new())]);
        let mut seen = HashSet::from([concrete]);

        while let Some((node, steps)) = queue.pop_front() {
            let found = if node == declared {
                self.identities.get(&node)
            } else {
                self.views.get(&(node, declared))
            };
            if let Some(finish) = found {
                return Some(Upcast::new(steps, finish.clone()));
            }

            for edge in self.parents.get(&node).into_iter().flatten() {
                if seen.insert(edge.to) {
                    let mut next = steps.clone();
                    next.push(edge.step.clone());
                    queue.push_back((edge.to, next));
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for TypeHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeHierarchy")
            .field("types", &self.names.len())
            .field("extends", &self.extends_count())
            .field("implements", &self.implements_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entity {
        id: u64,
    }

    struct Shape {
        entity: Entity,
        sides: u8,
    }

    struct Circle {
        shape: Shape,
    }

    struct Unrelated;

    trait Drawable {
        fn sides(&self) -> u8;
    }

    impl Drawable for Shape {
        fn sides(&self) -> u8 {
            self.sides
        }
    }

    fn table() -> TypeHierarchy {
        let mut h = TypeHierarchy::new();
        h.add_extends::<Circle, Shape>(|c| &c.shape);
        h.add_extends::<Shape, Entity>(|s| &s.entity);
        h.add_implements::<Shape, dyn Drawable>(|s| s);
        h
    }

    fn circle() -> Circle {
        Circle {
            shape: Shape {
                entity: Entity { id: 42 },
                sides: 0,
            },
        }
    }

    #[test]
    fn test_assignable_reflexive_and_universal() {
        let h = TypeHierarchy::new();
        let id = TypeId::of::<Unrelated>();
        assert!(h.is_assignable(id, id));
        assert!(h.is_assignable(id, TypeId::of::<dyn Any>()));
        assert!(!h.is_assignable(id, TypeId::of::<Entity>()));
    }

    #[test]
    fn test_assignable_transitive() {
        let h = table();
        let c = TypeId::of::<Circle>();
        assert!(h.is_assignable(c, TypeId::of::<Shape>()));
        assert!(h.is_assignable(c, TypeId::of::<Entity>()));
        assert!(h.is_assignable(c, TypeId::of::<dyn Drawable>()));
        assert!(!h.is_assignable(TypeId::of::<Entity>(), TypeId::of::<Circle>()));
        assert!(!h.is_assignable(TypeId::of::<Entity>(), TypeId::of::<dyn Drawable>()));
    }

    #[test]
    fn test_resolve_walks_to_supertype() {
        let h = table();
        let own = upcast::identity::<Circle>();
        let path = h
            .resolve(TypeId::of::<Circle>(), &own, TypeId::of::<Entity>())
            .expect("circle extends entity");
        assert_eq!(path.depth(), 2);

        let ev = circle();
        assert_eq!(path.apply::<Entity>(&ev).map(|e| e.id), Some(42));
    }

    #[test]
    fn test_resolve_inherited_interface() {
        let h = table();
        let own = upcast::identity::<Circle>();
        let path = h
            .resolve(TypeId::of::<Circle>(), &own, TypeId::of::<dyn Drawable>())
            .expect("circle inherits drawable from shape");

        let ev = circle();
        assert_eq!(path.apply::<dyn Drawable>(&ev).map(|d| d.sides()), Some(0));
    }

    #[test]
    fn test_resolve_unrelated_is_none() {
        let h = table();
        let own = upcast::identity::<Unrelated>();
        assert!(
            h.resolve(TypeId::of::<Unrelated>(), &own, TypeId::of::<Shape>())
                .is_none()
        );
    }

    #[test]
    fn test_name_of_declared_types_only() {
        let h = table();
        let circle = h.name_of(TypeId::of::<Circle>());
        assert!(circle.is_some_and(|n| n.ends_with("Circle")));
        assert!(h.name_of(TypeId::of::<dyn Drawable>()).is_some());
        assert!(h.name_of(TypeId::of::<Unrelated>()).is_none());
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let mut h = table();
        h.add_extends::<Circle, Shape>(|c| &c.shape);
        h.add_implements::<Shape, dyn Drawable>(|s| s);
        assert_eq!(h.extends_count(), 2);
        assert_eq!(h.implements_count(), 1);
    }

    #[test]
    fn test_cycle_terminates() {
        struct A {
            b: Box<B>,
        }
        struct B {
            a: Option<Box<A>>,
        }
        let mut h = TypeHierarchy::new();
        h.add_extends::<A, B>(|a| &*a.b);
        h.add_extends::<B, A>(|b| b.a.as_deref().unwrap_or_else(|| unreachable!()));
        assert!(!h.is_assignable(TypeId::of::<A>(), TypeId::of::<Unrelated>()));
    }
}
