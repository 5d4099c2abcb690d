//! # Scope markers
//!
//! A [`Scope`] is an opaque identity used to narrow a binding to dispatches
//! tagged with the same identity. Two scopes are equal only if they were
//! created by the same [`Scope::new`] call (or copied from it), or were both
//! derived from the same allocation with [`Scope::of`].
//!
//! ## Matching
//! ```text
//!   binding scope │ dispatch scope │ fires?
//!   ──────────────┼────────────────┼───────
//!   none          │ any            │ yes
//!   any           │ none           │ yes
//!   S1            │ S1             │ yes
//!   S1            │ S2             │ no
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter for token scopes.
static SCOPE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ScopeKey {
    Token(u64),
    Addr(usize),
}

/// Identity value restricting a binding to matching dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scope(ScopeKey);

impl Scope {
    /// Creates a scope distinct from every other scope.
    ///
    /// # Example
    /// ```
    /// use typebus::Scope;
    ///
    /// let a = Scope::new();
    /// let b = Scope::new();
    /// assert_ne!(a, b);
    /// let copy = a;
    /// assert_eq!(a, copy);
    /// ```
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Scope(ScopeKey::Token(SCOPE_SEQ.fetch_add(1, AtomicOrdering::Relaxed)))
    }

    /// Derives a scope from the identity of a shared allocation.
    ///
    /// Scopes derived from clones of the same `Arc` are equal; the scope stays
    /// meaningful only while the allocation is alive.
    pub fn of<T: ?Sized>(owner: &Arc<T>) -> Self {
        Scope(ScopeKey::Addr(Arc::as_ptr(owner) as *const () as usize))
    }

    /// Scope filter rule shared by every binding.
    #[inline]
    pub(crate) fn admits(bound: Option<&Scope>, requested: Option<&Scope>) -> bool {
        match (bound, requested) {
            (Some(bound), Some(requested)) => bound == requested,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_of_same_allocation() {
        let owner = Arc::new(String::from("session"));
        let other = Arc::new(String::from("session"));
        assert_eq!(Scope::of(&owner), Scope::of(&Arc::clone(&owner)));
        assert_ne!(Scope::of(&owner), Scope::of(&other));
    }

    #[test]
    fn test_admits_table() {
        let s1 = Scope::new();
        let s2 = Scope::new();
        assert!(Scope::admits(None, None));
        assert!(Scope::admits(None, Some(&s1)));
        assert!(Scope::admits(Some(&s1), None));
        assert!(Scope::admits(Some(&s1), Some(&s1)));
        assert!(!Scope::admits(Some(&s1), Some(&s2)));
    }
}
