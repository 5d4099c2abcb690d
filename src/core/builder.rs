use std::any::Any;

use crate::core::{Config, EventBus};
use crate::types::TypeHierarchy;

/// Builder for constructing an [`EventBus`] with declared type relationships.
///
/// The hierarchy is frozen by [`build`](Self::build); declare every relationship
/// before the first listener is registered.
pub struct EventBusBuilder {
    cfg: Config,
    types: TypeHierarchy,
}

impl EventBusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            types: TypeHierarchy::new(),
        }
    }

    /// Replaces the configuration.
    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Declares `P` a supertype of `C`: listeners for `P` receive `C` events,
    /// viewed through `view`.
    ///
    /// Supertypes are transitive: if `P` extends `Q`, listeners for `Q` receive `C` too.
    pub fn extends<C: Any, P: Any>(mut self, view: fn(&C) -> &P) -> Self {
        self.types.add_extends(view);
        self
    }

    /// Declares that `C` (and everything extending it) satisfies interface `I`,
    /// typically a `dyn Trait`.
    ///
    /// ## Example
    /// ```rust
    /// use std::any::TypeId;
    /// use typebus::EventBus;
    ///
    /// trait Audited { fn actor(&self) -> &str; }
    ///
    /// struct Login { user: String }
    /// impl Audited for Login { fn actor(&self) -> &str { &self.user } }
    ///
    /// let bus = EventBus::builder()
    ///     .implements::<Login, dyn Audited>(|l| l)
    ///     .build();
    /// assert!(bus.hierarchy().is_assignable(TypeId::of::<Login>(), TypeId::of::<dyn Audited>()));
    /// ```
    pub fn implements<C: Any, I: ?Sized + 'static>(mut self, view: fn(&C) -> &I) -> Self {
        self.types.add_implements(view);
        self
    }

    /// Builds and returns the bus.
    pub fn build(self) -> EventBus {
        EventBus::from_parts(self.cfg, self.types)
    }
}
