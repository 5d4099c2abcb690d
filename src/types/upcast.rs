//! # Type-erased upcast paths
//!
//! An [`Upcast`] turns a `&dyn Any` holding a concrete event into a typed view
//! `&D` of one of its declared supertypes/interfaces.
//!
//! ```text
//!   &dyn Any (Circle) ─► step ─► &dyn Any (Shape) ─► step ─► &dyn Any (Entity) ─► finish ─► &dyn Drawable
//!                       (extends edges, erased)                                  (typed view, D)
//! ```
//!
//! Steps only ever move between sized types, so they can be chained without knowing
//! the declared type. The final view is stored erased as `Arc<dyn Any>` and is
//! downcast back to [`Caster<D>`] by the binding, which is the only place that knows `D`.

use std::any::Any;
use std::sync::Arc;

/// One `extends` edge: views a sized type as its sized supertype.
pub(crate) type Step = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

/// Final typed view onto the declared type `D`.
pub(crate) type Caster<D> = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a D> + Send + Sync>;

/// A [`Caster<D>`] with `D` erased.
pub(crate) type Finish = Arc<dyn Any + Send + Sync>;

pub(crate) fn step<F>(f: F) -> Step
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn finish<D, F>(f: F) -> Finish
where
    D: ?Sized + 'static,
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a D> + Send + Sync + 'static,
{
    let caster: Caster<D> = Arc::new(f);
    Arc::new(caster)
}

/// Identity view for a sized type.
pub(crate) fn identity<T: Any>() -> Finish {
    finish::<T, _>(|any| any.downcast_ref::<T>())
}

/// View of any event as `dyn Any`.
pub(crate) fn universal() -> Finish {
    finish::<dyn Any, _>(|any| Some(any))
}

/// Resolved path from one concrete type to one declared type.
#[derive(Clone)]
pub(crate) struct Upcast {
    steps: Vec<Step>,
    finish: Finish,
}

impl Upcast {
    pub(crate) fn new(steps: Vec<Step>, finish: Finish) -> Self {
        Self { steps, finish }
    }

    /// Number of `extends` hops walked before the final view.
    pub(crate) fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Applies the path, yielding `None` if `D` is not the type this path ends in.
    pub(crate) fn apply<'a, D: ?Sized + 'static>(&self, event: &'a dyn Any) -> Option<&'a D> {
        let mut current = event;
        for step in &self.steps {
            current = step(current)?;
        }
        let caster = self.finish.downcast_ref::<Caster<D>>()?;
        caster(current)
    }
}

impl std::fmt::Debug for Upcast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upcast")
            .field("depth", &self.steps.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base {
        id: u32,
    }

    struct Derived {
        base: Base,
    }

    trait Named {
        fn label(&self) -> String;
    }

    impl Named for Base {
        fn label(&self) -> String {
            format!("base-{}", self.id)
        }
    }

    #[test]
    fn test_identity_path() {
        let path = Upcast::new(Vec::new(), identity::<Base>());
        let ev = Base { id: 7 };
        let view = path.apply::<Base>(&ev).map(|b| b.id);
        assert_eq!(view, Some(7));
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn test_step_then_interface_view() {
        let up = step(|any| {
            any.downcast_ref::<Derived>()
                .map(|d| &d.base as &dyn Any)
        });
        let view = finish::<dyn Named, _>(|any| {
            any.downcast_ref::<Base>().map(|b| b as &dyn Named)
        });
        let path = Upcast::new(vec![up], view);

        let ev = Derived { base: Base { id: 3 } };
        let named = path.apply::<dyn Named>(&ev).map(|n| n.label());
        assert_eq!(named.as_deref(), Some("base-3"));
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn test_wrong_declared_type_yields_none() {
        let path = Upcast::new(Vec::new(), identity::<Base>());
        let ev = Base { id: 1 };
        assert!(path.apply::<Derived>(&ev).is_none());
    }

    #[test]
    fn test_universal_view() {
        let path = Upcast::new(Vec::new(), universal());
        let ev = Base { id: 9 };
        let any = path.apply::<dyn Any>(&ev);
        assert!(any.and_then(|a| a.downcast_ref::<Base>()).is_some());
    }
}
