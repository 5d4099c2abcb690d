//! # Bus configuration.
//!
//! Provides [`Config`], the settings an [`EventBus`](crate::EventBus) is built with.
//!
//! ## Resolution order
//! A type's cache entry is maintained incrementally once it exists: `register`
//! appends to it and `register_before` prepends. When a type is dispatched for
//! the first time its entry is built by scanning the ledger, and
//! [`ResolutionOrder`] decides how that scan orders bindings:
//!
//! ```text
//! register(A) ; register_before(B) ; register(C) ; register_before(D)
//!
//!   Priority: D, B, A, C   (same as an entry maintained since the start)
//!   Ledger:   A, B, C, D   (raw registration order)
//! ```

/// How a cache entry is ordered when it is built for the first time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolutionOrder {
    /// Before-registrations first (latest first), then the rest in registration order.
    #[default]
    Priority,
    /// Registration order, ignoring before-registrations.
    Ledger,
}

/// Configuration for an [`EventBus`](crate::EventBus).
///
/// ## Field semantics
/// - `resolution_order`: ordering of lazily built cache entries
/// - `warn_unhandled`: log dispatches that reach no listener at `WARN` instead of `DEBUG`
#[derive(Clone, Debug)]
pub struct Config {
    /// Ordering applied when a cache entry is first built from the ledger.
    pub resolution_order: ResolutionOrder,

    /// Raise the log level of dispatches with no matching listener.
    pub warn_unhandled: bool,
}

impl Config {
    /// Returns true if lazily built entries honor before-registration.
    #[inline]
    pub fn preserves_priority(&self) -> bool {
        self.resolution_order == ResolutionOrder::Priority
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `resolution_order = Priority`
    /// - `warn_unhandled = false`
    fn default() -> Self {
        Self {
            resolution_order: ResolutionOrder::default(),
            warn_unhandled: false,
        }
    }
}
